use core::fmt;

use crate::TreeNode;

/// Writes `text` with the XML special characters escaped.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let mut last = 0;
    for (index, ch) in text.char_indices() {
        let escaped = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            _ => continue,
        };
        f.write_str(&text[last..index])?;
        f.write_str(escaped)?;
        last = index + ch.len_utf8();
    }
    f.write_str(&text[last..])
}

/// XML-flavoured single line rendering, for diagnostics.
impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}=\"", attr.name)?;
            write_escaped(f, &attr.value)?;
            f.write_str("\"")?;
        }

        if self.text.is_none() && self.children.is_empty() {
            return f.write_str("/>");
        }

        f.write_str(">")?;
        if let Some(text) = &self.text {
            write_escaped(f, text)?;
        }
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use crate::TreeNode;

    #[test]
    fn escapes_text_and_attributes() {
        let mut node = TreeNode::new("a");
        node.set_attribute("k", "\"<&>\"");
        node.set_text("x < y");
        assert_eq!(node.to_string(), r#"<a k="&quot;&lt;&amp;&gt;&quot;">x &lt; y</a>"#);
    }

    #[test]
    fn empty_node_is_self_closing() {
        let mut node = TreeNode::new("outer");
        node.add_child("inner");
        assert_eq!(node.to_string(), "<outer><inner/></outer>");
    }
}
