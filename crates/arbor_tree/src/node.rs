use serde::{Deserialize, Serialize};

/// A named attribute of a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element of a labeled document tree.
///
/// A node holds either text or children. Condensed arrays are the one
/// exception the codec makes: their text is a delimited list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TreeNode {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -------------------------------------------------------------------------
    // Attributes

    /// Returns the value of the attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    /// Replaces the value of `name`, or appends the attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Removes the attribute `name`, keeping the order of the others.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    // -------------------------------------------------------------------------
    // Children

    /// The first child named `name`.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Children named `name`, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TreeNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Appends `child` and returns it.
    pub fn push_child(&mut self, child: TreeNode) -> &mut TreeNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    #[inline]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.children
    }

    /// Appends an empty child named `name` and returns it.
    #[inline]
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut TreeNode {
        self.push_child(TreeNode::new(name))
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    // -------------------------------------------------------------------------
    // Text

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    #[inline]
    pub fn take_text(&mut self) -> Option<String> {
        self.text.take()
    }

    /// Removes attributes, children and text, keeping the name.
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.children.clear();
        self.text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::TreeNode;

    #[test]
    fn attributes_replace_or_append() {
        let mut node = TreeNode::new("n");
        node.set_attribute("a", "1");
        node.set_attribute("b", "2");
        node.set_attribute("a", "3");

        assert_eq!(node.attributes.len(), 2);
        assert_eq!(node.attribute("a"), Some("3"));
        assert_eq!(node.attributes[0].name, "a");

        assert_eq!(node.remove_attribute("a").as_deref(), Some("3"));
        assert!(!node.has_attribute("a"));
        assert_eq!(node.remove_attribute("a"), None);
        assert_eq!(node.attributes[0].name, "b");
    }

    #[test]
    fn child_lookup() {
        let mut node = TreeNode::new("n");
        node.add_child("x").set_text("1");
        node.add_child("y");
        node.add_child("x").set_text("2");

        assert_eq!(node.child("x").and_then(TreeNode::text), Some("1"));
        assert_eq!(node.children_named("x").count(), 2);
        assert!(node.child("z").is_none());

        node.child_mut("y").unwrap().set_text("t");
        assert_eq!(node.children[1].text(), Some("t"));
    }

    #[test]
    fn serde_shape_skips_empty_parts() {
        let mut node = TreeNode::new("root");
        node.add_child("leaf").set_text("v");

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "root",
                "children": [{ "name": "leaf", "text": "v" }],
            }),
        );

        let back: TreeNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
