//! Entity traversal: public properties instead of serialized fields.

use alloc::boxed::Box;
use alloc::collections::{LinkedList, VecDeque};
use alloc::vec::Vec;

use arbor_reflect::info::{PreferredCollection, TypeInfo};
use arbor_reflect::ops::ReflectRef;
use arbor_reflect::{DynValue, Reflect};
use arbor_tree::TreeNode;

use crate::context::Token;
use crate::decoder::{Decoder, WorkingObject};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::metadata::{CollectionShape, EntityDescriptor, EntityProperty};

fn property<'v>(mut value: &'v dyn Reflect, path: &[usize]) -> Option<&'v dyn Reflect> {
    for index in path {
        value = value.reflect_ref().as_struct().ok()?.field_at(*index)?;
    }
    Some(value)
}

fn property_mut<'v>(mut value: &'v mut dyn Reflect, path: &[usize]) -> Option<&'v mut dyn Reflect> {
    for index in path {
        value = value.reflect_mut().as_struct().ok()?.field_at_mut(*index)?;
    }
    Some(value)
}

/// The elements of a collection property.
fn items(value: &dyn Reflect) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
    match value.reflect_ref() {
        ReflectRef::Array(array) => array.iter(),
        ReflectRef::List(list) => list.iter(),
        ReflectRef::Set(set) => set.iter(),
        ReflectRef::Dynamic(dynamic) => items(dynamic.inner()),
        _ => Box::new(core::iter::empty()),
    }
}

impl Encoder {
    pub(crate) fn encode_entity(
        &mut self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        entity: &EntityDescriptor,
    ) -> Result<(), EncodeError> {
        let ctx = self.context_handle();
        node.set_attribute(ctx.token(Token::EntitySemantics), "1");

        for property_info in entity.plain() {
            if let Some(field_value) = property(value, property_info.path()) {
                let expected = Some(property_info.field().type_info());
                self.encode_into(property_info.name(), field_value, node, expected)?;
            }
        }

        for property_info in entity.collections() {
            let (Some(field_value), Some(shape)) =
                (property(value, property_info.path()), property_info.collection())
            else {
                continue;
            };
            let mut wrapper = TreeNode::new(property_info.name());
            for item in items(field_value) {
                self.encode_into(
                    ctx.token(Token::ArrayElement),
                    item,
                    &mut wrapper,
                    Some(shape.item_info()),
                )?;
            }
            node.push_child(wrapper);
        }
        Ok(())
    }
}

impl Decoder<'_> {
    pub(crate) fn decode_entity(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        entity: &EntityDescriptor,
    ) -> Result<(), DecodeError> {
        let target = working.get_existing_or_create_new()?;

        for property_info in entity.properties() {
            let Some(child) = node.child(property_info.name()) else {
                continue;
            };
            let field_info = property_info.field().type_info();
            let value = match property_info.collection() {
                None => self.decode_node(child, Some(field_info))?,
                Some(shape) => self.decode_collection(child, property_info, shape)?,
            };

            let Some(slot) = property_mut(&mut *target, property_info.path()) else {
                continue;
            };
            slot.set(value).map_err(|value| DecodeError::TypeMismatch {
                expected: field_info.type_path(),
                found: value.reflect_type_path(),
            })?;
        }
        Ok(())
    }

    fn decode_collection(
        &mut self,
        node: &TreeNode,
        property_info: &EntityProperty,
        shape: CollectionShape,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let mut elements = Vec::with_capacity(node.children().len());
        for child in node.children() {
            elements.push(self.decode_node(child, Some(shape.item_info()))?);
        }

        let field_info = property_info.field().type_info();
        match (shape, field_info) {
            (CollectionShape::Array(_), TypeInfo::Array(info)) => {
                Ok(info.build(&[elements.len()], &[0], elements)?)
            }
            (CollectionShape::List(_), TypeInfo::List(info)) => Ok(info.from_items(elements)?),
            (CollectionShape::Set(_), TypeInfo::Set(info)) => Ok(info.from_items(elements)?),
            (CollectionShape::Dynamic(preferred), _) => {
                let elements = elements.into_iter().map(into_dyn);
                let collection = match preferred {
                    PreferredCollection::Vec => DynValue::new(elements.collect::<Vec<_>>()),
                    PreferredCollection::VecDeque => DynValue::new(elements.collect::<VecDeque<_>>()),
                    PreferredCollection::LinkedList => {
                        DynValue::new(elements.collect::<LinkedList<_>>())
                    }
                };
                Ok(Box::new(collection))
            }
            _ => Err(DecodeError::UnsupportedType {
                type_path: field_info.type_path(),
                kind: field_info.kind(),
            }),
        }
    }
}

fn into_dyn(value: Box<dyn Reflect>) -> DynValue {
    value.take::<DynValue>().unwrap_or_else(DynValue::from_boxed)
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;

    use arbor_reflect::derive::Reflect;
    use arbor_reflect::registry::TypeRegistry;
    use arbor_reflect::DynValue;

    use crate::{Decoder, Encoder};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Named")]
    pub struct Named {
        pub name: String,
    }

    #[derive(Reflect, Debug)]
    #[reflect(default, entity(collection = VecDeque), type_path = "tests::Order")]
    pub struct Order {
        #[reflect(base)]
        named: Named,
        pub total: u32,
        pub lines: Vec<String>,
        #[reflect(collection)]
        pub notes: DynValue,
        #[reflect(rename = "ignored")]
        hidden: u8,
    }

    impl Default for Order {
        fn default() -> Self {
            Self {
                named: Named::default(),
                total: 0,
                lines: Vec::new(),
                notes: DynValue::new(Vec::<DynValue>::new()),
                hidden: 0,
            }
        }
    }

    #[test]
    fn public_properties_through_the_base() {
        let order = Order {
            named: Named { name: "n1".into() },
            total: 3,
            lines: vec!["a".into(), "b".into()],
            notes: DynValue::new(vec![DynValue::new(1_u8)]),
            hidden: 9,
        };
        let node = Encoder::new().encode_typed(&order).unwrap();
        assert_eq!(node.attribute("_UseEntitySemantics"), Some("1"));
        assert_eq!(node.child("total").unwrap().text(), Some("3"));
        assert_eq!(node.child("name").unwrap().text(), Some("n1"));
        assert!(node.child("hidden").is_none() && node.child("ignored").is_none());

        let lines = node.child("lines").unwrap();
        assert_eq!(lines.children().len(), 2);
        assert_eq!(lines.children()[1].name(), "_");
        assert_eq!(lines.children()[1].text(), Some("b"));

        let registry = TypeRegistry::new();
        let back: Order = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back.named, order.named);
        assert_eq!(back.total, 3);
        assert_eq!(back.lines, order.lines);
        assert_eq!(back.hidden, 0);

        let notes = back.notes.downcast_ref::<VecDeque<DynValue>>().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].downcast_ref::<u8>(), Some(&1));
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(default, entity, type_path = "tests::Ledger")]
    pub struct Ledger {
        pub entries: Vec<u32>,
        #[reflect(never_serialize)]
        pub secret: String,
        #[reflect(always_serialize)]
        kept: u8,
        pub owner: String,
    }

    #[test]
    fn field_markers_do_not_apply_to_entities() {
        let ledger = Ledger {
            entries: vec![4, 5],
            secret: "s".into(),
            kept: 2,
            owner: "o".into(),
        };
        let node = Encoder::new().encode_typed(&ledger).unwrap();
        assert_eq!(node.child("secret").unwrap().text(), Some("s"));
        assert!(node.child("kept").is_none());

        // Plain properties come before collections.
        let names: Vec<&str> = node.children().iter().map(|child| child.name()).collect();
        assert_eq!(names, ["secret", "owner", "entries"]);

        let registry = TypeRegistry::new();
        let back: Ledger = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back.secret, "s");
        assert_eq!(back.entries, [4, 5]);
        assert_eq!(back.kept, 0);
    }
}
