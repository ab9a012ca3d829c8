//! Object identity while encoding.
//!
//! The first occurrence of an identity carries a provisional reference id
//! attribute. Ids are assigned only when a later occurrence is found, and
//! [`References::finalize`] rewrites or removes the provisional attributes
//! once the tree is complete.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use arbor_tree::TreeNode;
use arbor_utils::hash::HashMap;
use log::debug;

const PROVISIONAL: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RefKey {
    /// A `Shared` allocation.
    Object(usize),
    /// A deduplicated string.
    Text(String),
}

/// What a node should carry for an identity.
pub(crate) enum Occurrence {
    /// First time seen: write this provisional id.
    First(String),
    /// Seen before: refer to this id.
    Repeat(u32),
}

#[derive(Default)]
pub(crate) struct References {
    slots: HashMap<RefKey, usize>,
    ids: Vec<Option<u32>>,
    next_id: u32,
}

impl References {
    pub fn clear(&mut self) {
        self.slots.clear();
        self.ids.clear();
        self.next_id = 0;
    }

    pub fn visit(&mut self, key: RefKey) -> Occurrence {
        if let Some(&slot) = self.slots.get(&key) {
            let id = *self.ids[slot].get_or_insert_with(|| {
                self.next_id += 1;
                debug!("assigned reference id {} to {key:?}", self.next_id);
                self.next_id
            });
            return Occurrence::Repeat(id);
        }
        let slot = self.ids.len();
        self.ids.push(None);
        self.slots.insert(key, slot);
        Occurrence::First(format!("{PROVISIONAL}{slot}"))
    }

    /// Replaces provisional ids under `node` with assigned ones and removes
    /// those never referred to.
    pub fn finalize(&self, node: &mut TreeNode, attribute: &str) {
        if let Some(value) = node.attribute(attribute)
            && let Some(slot) = value.strip_prefix(PROVISIONAL)
        {
            let id = slot
                .parse::<usize>()
                .ok()
                .and_then(|slot| self.ids.get(slot).copied().flatten());
            match id {
                Some(id) => node.set_attribute(attribute, id.to_string()),
                None => {
                    node.remove_attribute(attribute);
                }
            }
        }
        for child in node.children_mut() {
            self.finalize(child, attribute);
        }
    }
}

#[cfg(test)]
mod tests {
    use arbor_tree::TreeNode;

    use super::{Occurrence, RefKey, References};

    #[test]
    fn ids_are_assigned_on_repeat() {
        let mut refs = References::default();
        let Occurrence::First(a) = refs.visit(RefKey::Object(10)) else {
            panic!("first visit");
        };
        let Occurrence::First(b) = refs.visit(RefKey::Text("t".into())) else {
            panic!("first visit");
        };
        assert!(matches!(refs.visit(RefKey::Text("t".into())), Occurrence::Repeat(1)));
        assert!(matches!(refs.visit(RefKey::Text("t".into())), Occurrence::Repeat(1)));

        let mut root = TreeNode::new("r");
        root.add_child("a").set_attribute("_RefID", a);
        root.add_child("b").set_attribute("_RefID", b);
        refs.finalize(&mut root, "_RefID");

        assert!(!root.children[0].has_attribute("_RefID"));
        assert_eq!(root.children[1].attribute("_RefID"), Some("1"));
    }
}
