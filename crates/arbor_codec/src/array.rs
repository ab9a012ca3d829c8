//! Array encoding shared by the encoder and the decoder.
//!
//! Arrays of scalars and strings are written as one condensed text body
//! unless explicit elements are requested. Everything else gets one child
//! per element, in row-major order.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use arbor_reflect::Reflect;
use arbor_reflect::info::{ArrayInfo, TypeInfo};
use arbor_reflect::ops::{self, ReflectRef};
use arbor_tree::TreeNode;
use arbor_utils::hash::HashSet;

use crate::context::{ContextFlags, SerializationContext, Token};
use crate::decoder::{Decoder, WorkingObject};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::metadata::TypeDescriptor;
use crate::strings::{join_condensed, split_condensed};

/// Element types written as condensed text.
fn is_condensable(item: &TypeInfo) -> bool {
    match item {
        TypeInfo::Scalar(_) | TypeInfo::String(_) => true,
        TypeInfo::Option(option) => matches!(option.inner_info(), TypeInfo::String(_)),
        _ => false,
    }
}

fn condensed_text(item: &dyn Reflect) -> Option<String> {
    match item.reflect_ref() {
        ReflectRef::Scalar(scalar) => Some(scalar.to_text()),
        ReflectRef::String(text) => Some(text.as_str().into()),
        ReflectRef::Option(option) => option.value().and_then(condensed_text),
        _ => None,
    }
}

fn is_none(item: &dyn Reflect) -> bool {
    matches!(item.reflect_ref(), ReflectRef::Option(option) if option.value().is_none())
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_list<T: core::str::FromStr>(text: &str, what: &str) -> Result<Vec<T>, DecodeError> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| DecodeError::malformed(format!("invalid {what} `{text}`")))
        })
        .collect()
}

/// The number of elements `lengths` spans, at most `limit`.
fn element_count(lengths: &[usize], limit: usize) -> Result<usize, DecodeError> {
    lengths
        .iter()
        .try_fold(1_usize, |count, &length| count.checked_mul(length))
        .filter(|count| *count <= limit)
        .ok_or_else(|| {
            DecodeError::malformed(format!(
                "lengths `{}` exceed the limit of {limit} elements",
                join(lengths)
            ))
        })
}

/// The absolute index of the element at `flat`, per dimension.
fn absolute_index(mut flat: usize, lengths: &[usize], lower_bounds: &[isize]) -> String {
    let mut index = vec![0_isize; lengths.len()];
    for dimension in (0..lengths.len()).rev() {
        let length = lengths[dimension].max(1);
        index[dimension] = (flat % length) as isize + lower_bounds[dimension];
        flat /= length;
    }
    join(&index)
}

// -----------------------------------------------------------------------------
// Encode

impl Encoder {
    pub(crate) fn encode_array(
        &mut self,
        array: &dyn ops::Array,
        node: &mut TreeNode,
    ) -> Result<(), EncodeError> {
        let ctx = self.context_handle();
        let lengths = array.lengths();
        let lower_bounds = array.lower_bounds();
        let item_info = array
            .reflect_type_info()
            .as_array()
            .ok()
            .map(ArrayInfo::item_info);

        if lengths.len() == 1 {
            node.set_attribute(ctx.token(Token::ArrayAttribute), lengths[0].to_string());
            if lower_bounds[0] != 0 {
                node.set_attribute(ctx.token(Token::LowerBound), lower_bounds[0].to_string());
            }
        } else {
            node.set_attribute(ctx.token(Token::ArrayAttribute), join(&lengths));
            node.set_attribute(ctx.token(Token::LowerBound), join(&lower_bounds));
        }

        if !ctx.flag(ContextFlags::EXPLICIT_ARRAY_ELEMENTS) && item_info.is_some_and(is_condensable)
        {
            let items: Vec<Option<String>> = array.iter().map(condensed_text).collect();
            let body = join_condensed(items.iter().map(Option::as_deref));
            if !body.is_empty() {
                node.set_text(body);
            }
            return Ok(());
        }

        let element = self.element_name();
        let remove_nulls = ctx.flag(ContextFlags::REMOVE_NULLS);
        let mut indexed = ctx.flag(ContextFlags::ARRAY_INDICES);

        for (flat, item) in array.iter().enumerate() {
            if remove_nulls && is_none(item) {
                indexed = true;
                continue;
            }
            let mut child = TreeNode::new(element.as_str());
            if indexed {
                child.set_attribute(
                    ctx.token(Token::ArrayIndex),
                    absolute_index(flat, &lengths, &lower_bounds),
                );
            }
            self.encode_node(item, &mut child, item_info)?;
            node.push_child(child);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Decode

impl Decoder<'_> {
    pub(crate) fn decode_array(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        info: &'static ArrayInfo,
    ) -> Result<(), DecodeError> {
        let ctx = self.context_handle();
        let item_info = info.item_info();

        let declared = node
            .attribute(ctx.token(Token::ArrayAttribute))
            .map(|text| parse_list::<usize>(text, "array lengths"))
            .transpose()?;
        let declared_bounds = node
            .attribute(ctx.token(Token::LowerBound))
            .map(|text| parse_list::<isize>(text, "lower bounds"))
            .transpose()?;
        let rank = match (&declared, &declared_bounds) {
            (Some(lengths), _) => lengths.len(),
            (None, Some(bounds)) => bounds.len(),
            (None, None) => info.rank().unwrap_or(1),
        };
        if let Some(expected) = info.rank()
            && expected != rank
        {
            return Err(DecodeError::malformed(format!(
                "`{}` has rank {expected}, the node declares {rank}",
                info.type_path()
            )));
        }
        let lower_bounds = declared_bounds.unwrap_or_else(|| vec![0; rank]);
        if lower_bounds.len() != rank {
            return Err(DecodeError::malformed(format!(
                "{} lower bounds for rank {rank}",
                lower_bounds.len()
            )));
        }

        let condensed = node.text().is_some() && !node.has_children();
        let (lengths, slots) = if condensed {
            self.read_condensed(node, item_info, declared, &ctx)?
        } else if node.has_children() {
            self.read_elements(node, item_info, declared, &lower_bounds, &ctx)?
        } else {
            let lengths = match declared {
                Some(lengths) => lengths,
                None if rank == 1 => vec![0],
                None => return Err(DecodeError::malformed("missing array lengths")),
            };
            let total = element_count(&lengths, ctx.max_array_len())?;
            (lengths, (0..total).map(|_| None).collect())
        };

        let mut items = Vec::with_capacity(slots.len());
        for slot in slots {
            items.push(match slot {
                Some(item) => item,
                None => self.missing_item(item_info)?,
            });
        }
        working.set(info.build(&lengths, &lower_bounds, items)?)
    }

    fn read_condensed(
        &mut self,
        node: &TreeNode,
        item_info: &'static TypeInfo,
        declared: Option<Vec<usize>>,
        ctx: &SerializationContext,
    ) -> Result<(Vec<usize>, Vec<Option<Box<dyn Reflect>>>), DecodeError> {
        let parts = split_condensed(node.text().unwrap_or_default());
        let lengths = declared.unwrap_or_else(|| vec![parts.len()]);
        let total = element_count(&lengths, ctx.max_array_len())?;
        if parts.len() != total {
            return Err(DecodeError::malformed(format!(
                "{} condensed elements, {total} declared",
                parts.len()
            )));
        }

        let mut slots = Vec::with_capacity(total);
        for part in parts {
            slots.push(Some(self.condensed_item(part, item_info, node)?));
        }
        Ok((lengths, slots))
    }

    fn condensed_item(
        &self,
        part: Option<String>,
        info: &'static TypeInfo,
        node: &TreeNode,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        match (info, part) {
            (TypeInfo::Option(option), None) => Ok(option.none()),
            (TypeInfo::Option(option), Some(text)) => {
                let inner = self.condensed_item(Some(text), option.inner_info(), node)?;
                Ok(option.some(inner)?)
            }
            (_, None) => Err(DecodeError::UnexpectedNull {
                node: node.name().into(),
                type_path: info.type_path(),
            }),
            (TypeInfo::Scalar(scalar), Some(text)) => self.read_scalar(&text, scalar, info),
            (TypeInfo::String(string), Some(text)) => Ok(string.from_string(self.read_text(&text))),
            _ => Err(DecodeError::UnsupportedType {
                type_path: info.type_path(),
                kind: info.kind(),
            }),
        }
    }

    fn read_elements(
        &mut self,
        node: &TreeNode,
        item_info: &'static TypeInfo,
        declared: Option<Vec<usize>>,
        lower_bounds: &[isize],
        ctx: &SerializationContext,
    ) -> Result<(Vec<usize>, Vec<Option<Box<dyn Reflect>>>), DecodeError> {
        let rank = lower_bounds.len();
        if rank > 1 && declared.is_none() {
            return Err(DecodeError::malformed("missing array lengths"));
        }
        // Undeclared arrays grow up to the limit.
        let limit = match &declared {
            Some(lengths) => element_count(lengths, ctx.max_array_len())?,
            None => ctx.max_array_len(),
        };

        let children = node.children();
        let mut placed: Vec<(usize, Box<dyn Reflect>)> = Vec::with_capacity(children.len());
        let mut seen = HashSet::with_capacity_and_hasher(children.len(), Default::default());
        let mut next = 0_usize;
        for child in children {
            let flat = match child.attribute(ctx.token(Token::ArrayIndex)) {
                Some(text) => flat_index(text, declared.as_deref(), lower_bounds)?,
                None => next,
            };
            if flat >= limit {
                return Err(match declared {
                    Some(_) => DecodeError::malformed("more elements than declared"),
                    None => DecodeError::malformed(format!(
                        "element {flat} is beyond the limit of {limit} elements"
                    )),
                });
            }
            if !seen.insert(flat) {
                return Err(DecodeError::malformed(format!("element {flat} appears twice")));
            }
            placed.push((flat, self.decode_node(child, Some(item_info))?));
            next = flat + 1;
        }

        let (lengths, total) = match declared {
            Some(lengths) => (lengths, limit),
            None => {
                let length = placed.iter().map(|(at, _)| at + 1).max().unwrap_or(0);
                (vec![length], length)
            }
        };
        let mut slots: Vec<Option<Box<dyn Reflect>>> = (0..total).map(|_| None).collect();
        for (flat, item) in placed {
            slots[flat] = Some(item);
        }
        Ok((lengths, slots))
    }

    /// The value of a skipped element: `None`, or a constructed default.
    fn missing_item(&self, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, DecodeError> {
        if let TypeInfo::Option(option) = info {
            return Ok(option.none());
        }
        let descriptor = TypeDescriptor::of(info)?;
        match self.constructor(descriptor) {
            Some(constructor) => Ok(constructor()),
            None => Err(DecodeError::NoConstructor {
                type_path: info.type_path(),
            }),
        }
    }
}

/// Converts an index attribute to a row-major position.
fn flat_index(
    text: &str,
    lengths: Option<&[usize]>,
    lower_bounds: &[isize],
) -> Result<usize, DecodeError> {
    let index = parse_list::<isize>(text, "element index")?;
    if index.len() != lower_bounds.len() {
        return Err(DecodeError::malformed(format!(
            "index `{text}` does not match rank {}",
            lower_bounds.len()
        )));
    }

    let out_of_range = || DecodeError::malformed(format!("index `{text}` is out of range"));
    let mut flat = 0_usize;
    for (dimension, (absolute, bound)) in index.iter().zip(lower_bounds).enumerate() {
        let offset = absolute
            .checked_sub(*bound)
            .and_then(|offset| usize::try_from(offset).ok())
            .ok_or_else(out_of_range)?;
        let length = match lengths {
            Some(lengths) => {
                if offset >= lengths[dimension] {
                    return Err(out_of_range());
                }
                lengths[dimension]
            }
            None => 0,
        };
        flat = flat
            .checked_mul(length)
            .and_then(|flat| flat.checked_add(offset))
            .ok_or_else(out_of_range)?;
    }
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use arbor_reflect::NdArray;
    use arbor_reflect::derive::Reflect;
    use arbor_reflect::registry::TypeRegistry;
    use arbor_tree::TreeNode;

    use super::{absolute_index, flat_index};
    use crate::context::{ContextFlags, SerializationContext};
    use crate::error::DecodeError;
    use crate::{Decoder, Encoder};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Tagged")]
    struct Tagged {
        names: Vec<Option<String>>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Grid")]
    struct Grid {
        cells: NdArray<i32>,
    }

    fn context(flags: &[(ContextFlags, bool)]) -> Arc<SerializationContext> {
        let mut ctx = SerializationContext::new();
        for (flag, value) in flags {
            ctx.set_flag(*flag, *value);
        }
        Arc::new(ctx)
    }

    #[test]
    fn index_conversions() {
        assert_eq!(absolute_index(5, &[2, 3], &[0, 1]), "1,3");
        assert_eq!(absolute_index(2, &[4], &[-1]), "1");
        assert_eq!(flat_index("1,3", Some(&[2, 3]), &[0, 1]).unwrap(), 5);
        assert_eq!(flat_index("7", None, &[0]).unwrap(), 7);
        assert!(flat_index("2,0", Some(&[2, 3]), &[0, 0]).is_err());
        assert!(flat_index("-1", None, &[0]).is_err());
        assert!(flat_index("1", Some(&[2, 3]), &[0, 0]).is_err());
    }

    #[test]
    fn condensed_keeps_empty_and_null_apart() {
        let value = Tagged {
            names: vec![Some("a,b".into()), Some(String::new()), None, Some("c".into())],
        };
        let node = Encoder::new().encode_typed(&value).unwrap();
        let names = node.child("names").unwrap();
        assert_eq!(names.attribute("_Array"), Some("4"));
        assert_eq!(names.text(), Some("a\\`b,\\_,,c"));
        assert!(!names.has_children());

        let registry = TypeRegistry::new();
        let back: Tagged = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn explicit_elements_with_removed_nulls() {
        let ctx = context(&[
            (ContextFlags::EXPLICIT_ARRAY_ELEMENTS, true),
            (ContextFlags::REMOVE_NULLS, true),
        ]);
        let value = Tagged {
            names: vec![Some("x".into()), None, Some("y".into())],
        };
        let node = Encoder::with_context(ctx.clone()).encode_typed(&value).unwrap();
        let names = node.child("names").unwrap();
        assert_eq!(names.children().len(), 2);
        assert_eq!(names.children()[0].attribute("_Index"), None);
        assert_eq!(names.children()[1].attribute("_Index"), Some("2"));

        let registry = TypeRegistry::new();
        let back: Tagged = Decoder::with_context(&registry, ctx).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn length_is_inferred_from_the_highest_index() {
        let mut node = TreeNode::new("_ROOT_");
        let names = node.add_child("names");
        names.add_child("_").set_text("p");
        names.add_child("_").set_attribute("_Index", "3");
        names.children_mut()[1].set_text("q");

        let registry = TypeRegistry::new();
        let back: Tagged = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back.names, [Some("p".into()), None, None, Some("q".into())]);
    }

    #[test]
    fn rank_two_round_trip() {
        let cells = NdArray::with_lower_bounds(vec![2, 3], vec![1, 0], (1..=6).collect()).unwrap();
        let value = Grid { cells };
        let node = Encoder::new().encode_typed(&value).unwrap();
        let cells = node.child("cells").unwrap();
        assert_eq!(cells.attribute("_Array"), Some("2,3"));
        assert_eq!(cells.attribute("_LowerBound"), Some("1,0"));
        assert_eq!(cells.text(), Some("1,2,3,4,5,6"));

        let registry = TypeRegistry::new();
        let back: Grid = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn malformed_arrays_are_rejected() {
        let registry = TypeRegistry::new();

        let mut node = TreeNode::new("_ROOT_");
        let names = node.add_child("names");
        names.set_attribute("_Array", "1");
        names.add_child("_").set_text("a");
        names.add_child("_").set_text("b");
        let err = Decoder::new(&registry).decode_typed::<Tagged>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedArray { .. }));

        let mut node = TreeNode::new("_ROOT_");
        let cells = node.add_child("cells");
        cells.set_attribute("_LowerBound", "0,0");
        cells.add_child("_").set_text("1");
        let err = Decoder::new(&registry).decode_typed::<Grid>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedArray { .. }));
    }

    #[test]
    fn rank_two_explicit_elements() {
        let ctx = SerializationContext::verbose();
        let cells = NdArray::with_lower_bounds(vec![3, 2], vec![-1, 4], (0..6).collect()).unwrap();
        let value = Grid { cells };
        let node = Encoder::with_context(Arc::new(ctx)).encode_typed(&value).unwrap();
        let cells = node.child("cells").unwrap();
        assert_eq!(cells.children().len(), 6);
        assert_eq!(cells.children()[3].attribute("_Index"), Some("0,5"));

        let registry = TypeRegistry::new();
        let back: Grid = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn oversized_arrays_are_rejected() {
        let registry = TypeRegistry::new();
        let malformed = |node: &TreeNode, ctx: Arc<SerializationContext>| {
            let mut decoder = Decoder::with_context(&registry, ctx);
            let err = match node.child("cells") {
                Some(_) => decoder.decode_typed::<Grid>(node).err(),
                None => decoder.decode_typed::<Tagged>(node).err(),
            };
            assert!(matches!(err, Some(DecodeError::MalformedArray { .. })), "{err:?}");
        };
        let global = SerializationContext::global();

        let mut node = TreeNode::new("_ROOT_");
        let cells = node.add_child("cells");
        cells.set_attribute("_Array", "18446744073709551615,2");
        cells.set_attribute("_LowerBound", "0,0");
        malformed(&node, global.clone());

        let mut node = TreeNode::new("_ROOT_");
        node.add_child("names").set_attribute("_Array", "100000000000");
        malformed(&node, global.clone());

        let mut node = TreeNode::new("_ROOT_");
        let element = node.add_child("names").add_child("_");
        element.set_attribute("_Index", "1000000000");
        element.set_text("far");
        malformed(&node, global.clone());

        let mut node = TreeNode::new("_ROOT_");
        let names = node.add_child("names");
        names.set_attribute("_LowerBound", "-9223372036854775808");
        names.add_child("_").set_attribute("_Index", "9223372036854775807");
        malformed(&node, global);

        let mut ctx = SerializationContext::new();
        ctx.set_max_array_len(3);
        let value = Tagged {
            names: vec![None; 4],
        };
        let node = Encoder::new().encode_typed(&value).unwrap();
        malformed(&node, Arc::new(ctx));
    }

    #[test]
    fn many_explicit_elements() {
        let ctx = context(&[(ContextFlags::EXPLICIT_ARRAY_ELEMENTS, true)]);
        let value = Tagged {
            names: (0..50_000).map(|i| Some(i.to_string())).collect(),
        };
        let node = Encoder::with_context(ctx.clone()).encode_typed(&value).unwrap();
        assert_eq!(node.child("names").unwrap().children().len(), 50_000);

        let registry = TypeRegistry::new();
        let back: Tagged = Decoder::with_context(&registry, ctx).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }
}
