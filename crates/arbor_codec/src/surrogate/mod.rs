//! Custom codecs for specific types.
//!
//! A [`Surrogate`] takes over encoding or decoding of a type before the
//! default walk. Surrogates are found by exact type first and by generic
//! shape second, in the [`SerializationContext`] scopes before the builtin
//! set, and are tried in that order until one reports the value handled.
//!
//! [`SerializationContext`]: crate::context::SerializationContext

// -----------------------------------------------------------------------------
// Modules

mod builtin;

// -----------------------------------------------------------------------------
// Surrogate

use arbor_reflect::Reflect;
use arbor_reflect::info::Type;
use arbor_tree::TreeNode;

use crate::context::SerializationContext;
use crate::decoder::{Decoder, WorkingObject};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};

/// A custom codec for one type or generic shape.
///
/// Both methods report whether they handled the value. Returning
/// `Ok(false)` passes the value to the next surrogate in the chain and
/// finally to the default walk, which sees the node as the surrogate left
/// it.
///
/// # Examples
///
/// ```
/// use arbor_codec::{Decoder, Encoder, Surrogate, WorkingObject};
/// use arbor_codec::context::SerializationContext;
/// use arbor_codec::error::{DecodeError, EncodeError};
/// use arbor_reflect::{Reflect, derive::Reflect, registry::TypeRegistry};
/// use arbor_tree::TreeNode;
/// use std::sync::Arc;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(default, auto_register)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// struct PointText;
///
/// impl Surrogate for PointText {
///     fn encode(
///         &self,
///         value: &dyn Reflect,
///         node: &mut TreeNode,
///         _: &mut Encoder,
///     ) -> Result<bool, EncodeError> {
///         let point = value.downcast_ref::<Point>().unwrap();
///         node.set_text(format!("{};{}", point.x, point.y));
///         Ok(true)
///     }
///
///     fn decode(
///         &self,
///         working: &mut WorkingObject<'_>,
///         node: &TreeNode,
///         _: &mut Decoder<'_>,
///     ) -> Result<bool, DecodeError> {
///         let (x, y) = node.text().and_then(|t| t.split_once(';')).ok_or_else(|| DecodeError::custom("bad point"))?;
///         let point = Point {
///             x: x.parse().map_err(DecodeError::custom)?,
///             y: y.parse().map_err(DecodeError::custom)?,
///         };
///         working.set(Box::new(point))?;
///         Ok(true)
///     }
/// }
///
/// let mut ctx = SerializationContext::new();
/// ctx.add_surrogate::<Point>(PointText);
/// let ctx = Arc::new(ctx);
///
/// let node = Encoder::with_context(ctx.clone()).encode_typed(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(node.text(), Some("1;-2"));
///
/// let mut registry = TypeRegistry::new();
/// registry.auto_register();
/// let point: Point = arbor_codec::Decoder::with_context(&registry, ctx).decode_typed(&node).unwrap();
/// assert_eq!(point, Point { x: 1, y: -2 });
/// ```
pub trait Surrogate: Send + Sync {
    /// Writes `value` into `node`.
    fn encode(
        &self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        encoder: &mut Encoder,
    ) -> Result<bool, EncodeError> {
        let _ = (value, node, encoder);
        Ok(false)
    }

    /// Reads `node` into `working`.
    fn decode(
        &self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        decoder: &mut Decoder<'_>,
    ) -> Result<bool, DecodeError> {
        let _ = (working, node, decoder);
        Ok(false)
    }
}

/// Every surrogate that applies to `ty`, in the order they are tried.
pub(crate) fn chain<'a>(
    ctx: &'a SerializationContext,
    ty: &'a Type,
) -> impl Iterator<Item = &'a dyn Surrogate> {
    let shape = ty.is_generic().then(|| ty.shape());

    let exact = ctx
        .exact_surrogates(ty.id())
        .map(|s| -> &'a dyn Surrogate { &**s })
        .chain(builtin::lookup(ty.path()).map(|s| -> &'a dyn Surrogate { s }));
    let shaped = shape.into_iter().flat_map(move |shape| {
        ctx.shape_surrogates(shape)
            .map(|s| -> &'a dyn Surrogate { &**s })
            .chain(builtin::lookup(shape).map(|s| -> &'a dyn Surrogate { s }))
    });
    exact.chain(shaped)
}
