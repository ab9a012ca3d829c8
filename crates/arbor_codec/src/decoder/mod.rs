//! Tree to object.

// -----------------------------------------------------------------------------
// Modules

mod working;

// -----------------------------------------------------------------------------
// Exports

pub use working::WorkingObject;

pub(crate) use working::{ReferenceTable, SharedReferences};

// -----------------------------------------------------------------------------
// Decoder

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::mem;

use arbor_reflect::info::{NamedField, ScalarInfo, SharedInfo, TypeInfo, Typed};
use arbor_reflect::ops::{ReflectMut, ReflectRef};
use arbor_reflect::registry::{TypeRegistry, TypeTraitDefault};
use arbor_reflect::{DynValue, Reflect};
use arbor_tree::TreeNode;
use log::{trace, warn};

use crate::context::{ContextFlags, SerializationContext, Token};
use crate::error::DecodeError;
use crate::metadata::{ConstructFn, TypeDescriptor};
use crate::strings::expand_environment;
use crate::surrogate;

/// Converts [`TreeNode`]s back into values.
///
/// Type attributes are resolved through a [`TypeRegistry`]: by full type
/// path first, then by short name. A decoder owns the reference table of
/// one decode.
///
/// # Examples
///
/// ```
/// use arbor_codec::{Decoder, Encoder};
/// use arbor_reflect::derive::Reflect;
/// use arbor_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(default, auto_register, type_path = "demo::Leaf")]
/// struct Leaf {
///     weight: f32,
///     tag: Option<String>,
/// }
///
/// let leaf = Leaf { weight: 2.5, tag: Some("oak".into()) };
/// let node = Encoder::new().encode(&leaf).unwrap();
///
/// let mut registry = TypeRegistry::new();
/// registry.auto_register();
/// let value = Decoder::new(&registry).decode(&node).unwrap();
/// assert_eq!(value.downcast_ref::<Leaf>(), Some(&leaf));
/// ```
pub struct Decoder<'r> {
    registry: &'r TypeRegistry,
    context: Arc<SerializationContext>,
    references: SharedReferences,
    ignored: Vec<String>,
    fields: Vec<&'static NamedField>,
    depth: usize,
}

impl<'r> Decoder<'r> {
    /// A decoder using the global context.
    #[inline]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_context(registry, SerializationContext::global())
    }

    pub fn with_context(registry: &'r TypeRegistry, context: Arc<SerializationContext>) -> Self {
        Self {
            registry,
            context,
            references: Rc::new(RefCell::new(ReferenceTable::default())),
            ignored: Vec::new(),
            fields: Vec::new(),
            depth: 0,
        }
    }

    #[inline]
    pub fn context(&self) -> &SerializationContext {
        &self.context
    }

    #[inline]
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Decodes a root node. The node must name its type.
    pub fn decode(&mut self, node: &TreeNode) -> Result<Box<dyn Reflect>, DecodeError> {
        self.reset();
        self.decode_node(node, None)
    }

    /// Decodes a root node as `T`.
    pub fn decode_typed<T: Reflect + Typed>(&mut self, node: &TreeNode) -> Result<T, DecodeError> {
        self.reset();
        let value = self.decode_node(node, Some(T::type_info()))?;
        value.take::<T>().map_err(|value| DecodeError::TypeMismatch {
            expected: T::type_info().type_path(),
            found: value.reflect_type_path(),
        })
    }

    fn reset(&mut self) {
        *self.references.borrow_mut() = ReferenceTable::default();
        self.ignored.clear();
        self.fields.clear();
        self.depth = 0;
    }

    /// Decodes `node`, whose static type is `expected` when known.
    ///
    /// The node's type attribute wins over `expected`. The result is of
    /// the expected type, or wrapped in a [`DynValue`] when a dynamic value
    /// is expected.
    pub fn decode_node(
        &mut self,
        node: &TreeNode,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        self.enter(|this| this.decode_marked(node, expected, true))
    }

    /// Decodes `node` as exactly `info`, ignoring its type attribute.
    ///
    /// For surrogates of wrappers whose contents are written into the
    /// wrapper's own node.
    pub fn decode_in_place(
        &mut self,
        node: &TreeNode,
        info: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        self.enter(|this| this.decode_marked(node, Some(info), false))
    }

    fn enter<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let limit = self.context.max_depth();
        if self.depth >= limit {
            return Err(DecodeError::DepthExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn decode_marked(
        &mut self,
        node: &TreeNode,
        expected: Option<&'static TypeInfo>,
        typed: bool,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let ctx = self.context.clone();
        trace!(
            "decoding <{}> as `{}`",
            node.name(),
            expected.map_or("?", TypeInfo::type_path)
        );

        if is_null(node, &ctx) {
            match expected {
                Some(TypeInfo::Option(info)) => return Ok(info.none()),
                Some(TypeInfo::Wrapper(_)) => {}
                _ => {
                    return Err(DecodeError::UnexpectedNull {
                        node: node.name().into(),
                        type_path: expected.map_or("dyn Reflect", TypeInfo::type_path),
                    });
                }
            }
        }

        if let Some(TypeInfo::Option(info)) = expected {
            let inner = self.decode_marked(node, Some(info.inner_info()), typed)?;
            return Ok(info.some(inner)?);
        }

        if !matches!(expected, Some(TypeInfo::Wrapper(_)))
            && let Some(id) = node.attribute(ctx.token(Token::ReferTo))
        {
            let value = self.resolve_reference(id, expected)?;
            return coerce(value, expected);
        }

        let info = if typed {
            self.resolve_type(node, expected, &ctx)?
        } else {
            expected.ok_or_else(|| DecodeError::MissingType {
                node: node.name().into(),
            })?
        };
        let descriptor = TypeDescriptor::of(info)?;
        let reference_id = node.attribute(ctx.token(Token::ReferenceId)).map(String::from);

        let mut working = WorkingObject::new(
            info,
            self.constructor(descriptor),
            reference_id,
            self.references.clone(),
        );
        self.decode_body(&mut working, node, descriptor)?;
        let value = working.into_value().ok_or_else(|| {
            DecodeError::custom(format!("no value was read for `{}`", info.type_path()))
        })?;
        coerce(value, expected)
    }

    fn resolve_type(
        &self,
        node: &TreeNode,
        expected: Option<&'static TypeInfo>,
        ctx: &SerializationContext,
    ) -> Result<&'static TypeInfo, DecodeError> {
        let Some(name) = node.attribute(ctx.token(Token::TypeAttribute)) else {
            return match expected {
                Some(info) if !matches!(info, TypeInfo::Dynamic(_)) => Ok(info),
                _ => Err(DecodeError::MissingType {
                    node: node.name().into(),
                }),
            };
        };

        if let Some(info) = expected {
            if info.type_path() == name {
                return Ok(info);
            }
            // A proxy is written under the name of the type it stands for.
            if let Ok(descriptor) = TypeDescriptor::of(info)
                && let Some(base) = descriptor.proxied_base()
                && base.descriptor.type_info().type_path() == name
            {
                return Ok(info);
            }
        }

        if let Some(meta) = self
            .registry
            .get_with_type_path(name)
            .or_else(|| self.registry.get_with_type_name(name))
        {
            return Ok(meta.type_info());
        }

        if self.registry.is_ambiguous(name) {
            warn!("type name `{name}` is ambiguous, write the full type path");
        }

        // Entities tolerate foreign type names.
        if let Some(info) = expected
            && TypeDescriptor::of(info).is_ok_and(|d| d.entity().is_some())
        {
            return Ok(info);
        }

        Err(DecodeError::UnresolvableType { name: name.into() })
    }

    fn resolve_reference(
        &self,
        id: &str,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let references = self.references.borrow();
        let stored = references
            .resolve(id)
            .ok_or_else(|| DecodeError::UnresolvedReference { id: id.into() })?;

        match stored.reflect_ref() {
            ReflectRef::Shared(shared) => Ok(shared.share()),
            ReflectRef::String(text) => {
                let text = String::from(text.as_str());
                Ok(match expected {
                    Some(TypeInfo::String(info)) => info.from_string(text),
                    _ => Box::new(text),
                })
            }
            other => Err(DecodeError::UnsupportedType {
                type_path: stored.reflect_type_path(),
                kind: other.kind(),
            }),
        }
    }

    pub(crate) fn constructor(&self, descriptor: &TypeDescriptor) -> Option<ConstructFn> {
        descriptor.constructor().or_else(|| {
            self.registry
                .get_type_trait::<TypeTraitDefault>(descriptor.type_info().ty_id())
                .map(TypeTraitDefault::func)
        })
    }

    fn decode_body(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), DecodeError> {
        if let Some(entity) = descriptor.entity() {
            return self.decode_entity(working, node, entity);
        }

        let ctx = self.context.clone();
        for surrogate in surrogate::chain(&ctx, descriptor.type_info().ty()) {
            if surrogate.decode(working, node, self)? {
                return Ok(());
            }
        }

        if let Some(deserialize) = descriptor.implicit().deserializer
            && deserialize(working, node, self)?
        {
            return Ok(());
        }

        self.read_contents(working, node, descriptor)
    }

    /// Reads `node` with the default walk, skipping surrogates and codec
    /// methods of the working object's own type.
    pub fn decode_contents(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
    ) -> Result<(), DecodeError> {
        let descriptor = TypeDescriptor::of(working.type_info())?;
        self.read_contents(working, node, descriptor)
    }

    fn read_contents(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), DecodeError> {
        let info = descriptor.type_info();
        match info {
            TypeInfo::Scalar(scalar) => {
                let value = self.read_scalar(node.text().unwrap_or_default(), scalar, info)?;
                working.set(value)
            }
            TypeInfo::String(string) => {
                let text = self.read_text(node.text().unwrap_or_default());
                working.set(string.from_string(text))
            }
            TypeInfo::Enum(enum_info) => {
                let name = node.text().unwrap_or_default().trim();
                let value = match enum_info.from_name(name) {
                    Some(value) => value,
                    None => self.conversion_failed(name, info)?,
                };
                working.set(value)
            }
            TypeInfo::Option(option) => {
                let value = if is_null(node, &self.context) {
                    option.none()
                } else {
                    option.some(self.decode_in_place(node, option.inner_info())?)?
                };
                working.set(value)
            }
            TypeInfo::Struct(_) => {
                let target = working.get_existing_or_create_new()?;
                self.populate(target, node, descriptor)
            }
            TypeInfo::Array(array) => self.decode_array(working, node, array),
            TypeInfo::Shared(shared) => self.read_shared(working, node, shared),
            _ => Err(DecodeError::UnsupportedType {
                type_path: info.type_path(),
                kind: info.kind(),
            }),
        }
    }

    /// Reads the fields of `target` from the children of `node`. Missing
    /// children leave fields at their constructed values.
    fn populate(
        &mut self,
        target: &mut dyn Reflect,
        node: &TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), DecodeError> {
        let ignored = mem::take(&mut self.ignored);
        let ctx = self.context.clone();
        let found = target.reflect_type_path();
        let ReflectMut::Struct(value) = target.reflect_mut() else {
            return Err(DecodeError::TypeMismatch {
                expected: descriptor.type_info().type_path(),
                found,
            });
        };

        for field in descriptor.fields() {
            let name = field.name_in(&ctx);
            if ignored.iter().any(|i| *i == name || i == field.name()) {
                continue;
            }
            let Some(child) = node.child(&name) else {
                continue;
            };

            self.fields.push(field.field());
            let decoded = self.decode_node(child, Some(field.type_info()));
            self.fields.pop();
            let decoded = decoded?;

            if let Some(slot) = value.field_at_mut(field.index()) {
                slot.set(decoded).map_err(|decoded| DecodeError::TypeMismatch {
                    expected: field.type_info().type_path(),
                    found: decoded.reflect_type_path(),
                })?;
            }
        }

        if let Some(base) = descriptor.base()
            && let Some(slot) = value.field_at_mut(base.field.index())
        {
            let mut working = WorkingObject::borrowed(
                slot,
                base.descriptor.type_info(),
                self.references.clone(),
            );
            self.decode_body(&mut working, node, base.descriptor)?;
        }
        Ok(())
    }

    /// Shared objects are registered before their contents are read, so
    /// the contents can refer back to them.
    fn read_shared(
        &mut self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        info: &'static SharedInfo,
    ) -> Result<(), DecodeError> {
        let inner_info = info.inner_info();
        let inner_descriptor = TypeDescriptor::of(inner_info)?;

        match self.constructor(inner_descriptor) {
            Some(constructor) if !working.is_set() => {
                working.set(info.wrap(constructor())?)?;
                let placeholder = working.get().map(|value| value.reflect_ref());
                let Some(ReflectRef::Shared(shared)) = placeholder else {
                    return Err(DecodeError::TypeMismatch {
                        expected: info.type_path(),
                        found: working.get().map_or("?", |value| value.reflect_type_path()),
                    });
                };
                let mut guard = shared.write_inner();
                let mut inner =
                    WorkingObject::borrowed(&mut **guard, inner_info, self.references.clone());
                self.decode_body(&mut inner, node, inner_descriptor)
            }
            _ => {
                let inner = self.decode_in_place(node, inner_info)?;
                working.set(info.wrap(inner)?)
            }
        }
    }

    /// Parses scalar text as written, then with surrounding whitespace
    /// removed. Whitespace is content for `char`.
    pub(crate) fn read_scalar(
        &self,
        text: &str,
        scalar: &ScalarInfo,
        info: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        if let Ok(value) = scalar.parse(text) {
            return Ok(value);
        }
        let trimmed = text.trim();
        match scalar.parse(trimmed) {
            Ok(value) => Ok(value),
            Err(_) => self.conversion_failed(trimmed, info),
        }
    }

    /// Handles text that does not convert to `info`.
    ///
    /// The context's conversion handler may substitute a value. Otherwise
    /// this is a [`DecodeError::Conversion`].
    pub fn conversion_failed(
        &self,
        text: &str,
        info: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let field = self.current_field().map(NamedField::name);
        if let Some(handler) = self.context.conversion_handler()
            && let Some(value) = handler(text, info, field)
        {
            warn!(
                "substituted `{}` for unconvertible `{text}` ({})",
                value.reflect_type_path(),
                info.type_path()
            );
            return Ok(value);
        }
        Err(DecodeError::Conversion {
            text: text.into(),
            type_path: info.type_path(),
            field,
        })
    }

    // -------------------------------------------------------------------------
    // Surrogate helpers

    /// The name of collection element nodes in the current field.
    pub fn element_name(&self) -> String {
        match self.fields.last().and_then(|field| field.element_name()) {
            Some(name) => name.into(),
            None => self.context.token(Token::ArrayElement).into(),
        }
    }

    #[inline]
    pub fn current_field(&self) -> Option<&'static NamedField> {
        self.fields.last().copied()
    }

    /// Makes the default walk of the current value skip `name`.
    pub fn ignore_field(&mut self, name: impl Into<String>) {
        self.ignored.push(name.into());
    }

    pub fn is_ignored_field(&self, name: &str) -> bool {
        self.ignored.iter().any(|i| i == name)
    }

    pub(crate) fn context_handle(&self) -> Arc<SerializationContext> {
        self.context.clone()
    }

    /// String text as stored, with `%NAME%` expanded when enabled.
    pub(crate) fn read_text(&self, text: &str) -> String {
        if self.context.flag(ContextFlags::EXPAND_ENVIRONMENT) {
            expand_environment(text).into_owned()
        } else {
            text.into()
        }
    }
}

fn is_null(node: &TreeNode, ctx: &SerializationContext) -> bool {
    node.attribute(ctx.token(Token::NullAttribute)) == Some(ctx.token(Token::NullValue))
}

/// Checks a decoded value against the expected type.
fn coerce(
    value: Box<dyn Reflect>,
    expected: Option<&'static TypeInfo>,
) -> Result<Box<dyn Reflect>, DecodeError> {
    match expected {
        None => Ok(value),
        Some(info) if info.ty_id() == value.ty_id() => Ok(value),
        Some(TypeInfo::Dynamic(_)) => Ok(Box::new(DynValue::from_boxed(value))),
        Some(info) => Err(DecodeError::TypeMismatch {
            expected: info.type_path(),
            found: value.reflect_type_path(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use arbor_reflect::derive::Reflect;
    use arbor_reflect::info::TypeInfo;
    use arbor_reflect::registry::TypeRegistry;
    use arbor_reflect::{DynValue, Reflect, Shared};
    use arbor_tree::TreeNode;

    use super::{Decoder, WorkingObject};
    use crate::context::{ContextFlags, SerializationContext};
    use crate::error::{DecodeError, EncodeError};
    use crate::{Encoder, Surrogate};

    #[derive(Reflect, Default, Debug, PartialEq, Clone, Copy)]
    #[reflect(default, type_path = "tests::Shape")]
    enum Shape {
        #[default]
        Round,
        Square,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Part")]
    struct Part {
        name: String,
        weight: f32,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Scene")]
    struct Scene {
        title: String,
        count: u64,
        ratio: f64,
        visible: bool,
        shape: Shape,
        scores: Vec<i32>,
        parts: Vec<Part>,
        fixed: [u8; 3],
        extra: Option<Part>,
        lookup: BTreeMap<String, u32>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Glyphs")]
    struct Glyphs {
        one: char,
        many: Vec<char>,
        shapes: Vec<Shape>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default, type_path = "tests::Pair")]
    struct Pair {
        left: Shared<Part>,
        right: Shared<Part>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default, type_path = "tests::Link")]
    struct Link {
        label: String,
        next: Option<Shared<Link>>,
    }

    #[derive(Reflect, Debug)]
    #[reflect(default, type_path = "tests::Holder")]
    struct Holder {
        value: DynValue,
    }

    impl Default for Holder {
        fn default() -> Self {
            Self {
                value: DynValue::new(0_u8),
            }
        }
    }

    fn scene() -> Scene {
        Scene {
            title: "demo".into(),
            count: 7,
            ratio: -0.125,
            visible: true,
            shape: Shape::Square,
            scores: vec![3, -1, 4],
            parts: vec![
                Part { name: "axle".into(), weight: 1.5 },
                Part { name: String::new(), weight: 0.0 },
            ],
            fixed: [1, 2, 3],
            extra: None,
            lookup: BTreeMap::from([("a".into(), 1), ("b,c".into(), 2)]),
        }
    }

    fn with_flag(flag: ContextFlags, value: bool) -> Arc<SerializationContext> {
        let mut ctx = SerializationContext::new();
        ctx.set_flag(flag, value);
        Arc::new(ctx)
    }

    #[test]
    fn round_trip() {
        let value = scene();
        let node = Encoder::new().encode_typed(&value).unwrap();
        assert_eq!(node.attribute("_Type"), None);
        assert_eq!(node.child("shape").unwrap().text(), Some("Square"));
        assert_eq!(node.child("scores").unwrap().text(), Some("3,-1,4"));

        let registry = TypeRegistry::new();
        let back: Scene = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn whitespace_chars_and_enum_elements() {
        let value = Glyphs {
            one: ' ',
            many: vec!['a', ' ', '\t', ','],
            shapes: vec![Shape::Square, Shape::Round],
        };
        let node = Encoder::new().encode_typed(&value).unwrap();
        assert_eq!(node.child("one").unwrap().text(), Some(" "));
        assert_eq!(node.child("many").unwrap().text(), Some("a, ,\t,\\`"));
        let shapes = node.child("shapes").unwrap();
        assert_eq!(shapes.children().len(), 2);
        assert_eq!(shapes.children()[0].text(), Some("Square"));

        let registry = TypeRegistry::new();
        let back: Glyphs = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, value);

        // Padding around numbers is still accepted.
        let mut node = Encoder::new().encode_typed(&scene()).unwrap();
        node.child_mut("count").unwrap().set_text(" 7\n");
        let back: Scene = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back.count, 7);

        let mut node = Encoder::new().encode_typed(&value).unwrap();
        node.child_mut("shapes").unwrap().children_mut()[1].set_text("Oval");
        let err = Decoder::new(&registry).decode_typed::<Glyphs>(&node).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Conversion {
                text: "Oval".into(),
                type_path: "tests::Shape",
                field: Some("shapes"),
            }
        );
    }

    #[test]
    fn root_type_is_resolved_through_the_registry() {
        let value = scene();
        let node = Encoder::new().encode(&value).unwrap();
        assert_eq!(node.attribute("_Type"), Some("tests::Scene"));

        let mut registry = TypeRegistry::new();
        let err = Decoder::new(&registry).decode(&node).unwrap_err();
        assert_eq!(err, DecodeError::UnresolvableType { name: "tests::Scene".into() });

        registry.register::<Scene>();
        let back = Decoder::new(&registry).decode(&node).unwrap();
        assert_eq!(back.downcast_ref::<Scene>(), Some(&value));

        let err = Decoder::new(&registry).decode(&TreeNode::new("_ROOT_")).unwrap_err();
        assert!(matches!(err, DecodeError::MissingType { .. }));
    }

    #[test]
    fn dynamic_values_carry_their_type() {
        let value = Holder {
            value: DynValue::new(Part { name: "p".into(), weight: 2.0 }),
        };
        let node = Encoder::new().encode_typed(&value).unwrap();
        assert_eq!(node.child("value").unwrap().attribute("_Type"), Some("tests::Part"));

        let mut registry = TypeRegistry::new();
        registry.register::<Part>();
        let back: Holder = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(
            back.value.downcast_ref::<Part>(),
            Some(&Part { name: "p".into(), weight: 2.0 })
        );
    }

    #[test]
    fn null_fields_in_both_flag_states() {
        let registry = TypeRegistry::new();
        for remove_nulls in [false, true] {
            let ctx = with_flag(ContextFlags::REMOVE_NULLS, remove_nulls);
            let node = Encoder::with_context(ctx.clone()).encode_typed(&scene()).unwrap();
            let extra = node.child("extra").unwrap();
            assert_eq!(extra.attribute("_Null"), Some("_NULL_"));

            let back: Scene = Decoder::with_context(&registry, ctx).decode_typed(&node).unwrap();
            assert_eq!(back.extra, None);
        }
    }

    #[test]
    fn shared_values_are_written_once() {
        let part = Shared::new(Part { name: "hub".into(), weight: 3.0 });
        let pair = Pair {
            left: part.clone(),
            right: part,
        };
        let node = Encoder::new().encode_typed(&pair).unwrap();
        let left = node.child("left").unwrap();
        let right = node.child("right").unwrap();
        assert_eq!(left.attribute("_RefID"), Some("1"));
        assert_eq!(right.attribute("_ReferTo"), Some("1"));
        assert!(!right.has_children());

        let registry = TypeRegistry::new();
        let back: Pair = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert!(back.left.ptr_eq(&back.right));
        assert_eq!(back.left.read().name, "hub");

        let single = Pair::default();
        let node = Encoder::new().encode_typed(&single).unwrap();
        assert_eq!(node.child("left").unwrap().attribute("_RefID"), None);
    }

    #[test]
    fn cycles_resolve_to_the_same_object() {
        let a = Shared::new(Link { label: "a".into(), next: None });
        let b = Shared::new(Link {
            label: "b".into(),
            next: Some(a.clone()),
        });
        a.write().next = Some(b);

        let node = Encoder::new().encode_typed(&a).unwrap();
        assert_eq!(node.attribute("_RefID"), Some("1"));
        let inner = node.child("next").unwrap();
        assert_eq!(inner.attribute("_RefID"), None);
        assert_eq!(inner.child("next").unwrap().attribute("_ReferTo"), Some("1"));

        let registry = TypeRegistry::new();
        let back: Shared<Link> = Decoder::new(&registry).decode_typed(&node).unwrap();
        let b = back.read().next.clone().unwrap();
        assert_eq!(b.read().label, "b");
        let again = b.read().next.clone().unwrap();
        assert!(again.ptr_eq(&back));

        // Break the cycles so the test does not leak.
        a.write().next = None;
        back.write().next = None;
    }

    #[test]
    fn unresolved_reference() {
        let mut node = TreeNode::new("_ROOT_");
        node.add_child("left").set_attribute("_ReferTo", "9");

        let registry = TypeRegistry::new();
        let err = Decoder::new(&registry).decode_typed::<Pair>(&node).err();
        assert_eq!(err, Some(DecodeError::UnresolvedReference { id: "9".into() }));
    }

    struct Stamp;

    impl Surrogate for Stamp {
        fn encode(
            &self,
            _: &dyn Reflect,
            node: &mut TreeNode,
            _: &mut Encoder,
        ) -> Result<bool, EncodeError> {
            node.set_attribute("stamped", "1");
            Ok(false)
        }

        fn decode(
            &self,
            working: &mut WorkingObject<'_>,
            node: &TreeNode,
            _: &mut Decoder<'_>,
        ) -> Result<bool, DecodeError> {
            assert!(!working.is_set());
            Ok(node.attribute("stamped").is_none())
        }
    }

    #[test]
    fn declining_surrogates_fall_through() {
        let mut ctx = SerializationContext::new();
        ctx.add_surrogate::<Part>(Stamp);
        let ctx = Arc::new(ctx);

        let part = Part { name: "x".into(), weight: 1.0 };
        let node = Encoder::with_context(ctx.clone()).encode_typed(&part).unwrap();
        assert_eq!(node.attribute("stamped"), Some("1"));
        assert_eq!(node.child("name").unwrap().text(), Some("x"));

        let registry = TypeRegistry::new();
        let back: Part = Decoder::with_context(&registry, ctx).decode_typed(&node).unwrap();
        assert_eq!(back, part);
    }

    struct Decline;

    impl Surrogate for Decline {}

    #[test]
    fn declining_surrogates_change_nothing() {
        let mut ctx = SerializationContext::new();
        ctx.add_surrogate::<Part>(Decline);
        ctx.add_surrogate::<Scene>(Decline);
        let ctx = Arc::new(ctx);

        let plain = Encoder::new().encode_typed(&scene()).unwrap();
        let declined = Encoder::with_context(ctx.clone()).encode_typed(&scene()).unwrap();
        assert_eq!(plain, declined);

        let registry = TypeRegistry::new();
        let back: Scene = Decoder::with_context(&registry, ctx).decode_typed(&plain).unwrap();
        assert_eq!(back, scene());
    }

    #[test]
    fn conversion_errors_and_handler() {
        let mut node = Encoder::new().encode_typed(&scene()).unwrap();
        node.child_mut("count").unwrap().set_text("many");

        let registry = TypeRegistry::new();
        let err = Decoder::new(&registry).decode_typed::<Scene>(&node).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Conversion {
                text: "many".into(),
                type_path: "u64",
                field: Some("count"),
            }
        );

        let mut ctx = SerializationContext::new();
        ctx.set_conversion_handler(|text: &str, info: &'static TypeInfo, field: Option<&str>| {
            (text == "many" && field == Some("count") && info.type_path() == "u64")
                .then(|| Box::new(u64::MAX) as Box<dyn Reflect>)
        });
        let back: Scene = Decoder::with_context(&registry, Arc::new(ctx))
            .decode_typed(&node)
            .unwrap();
        assert_eq!(back.count, u64::MAX);
    }

    #[test]
    fn depth_limit() {
        let mut ctx = SerializationContext::new();
        ctx.set_max_depth(2);
        let err = Encoder::with_context(Arc::new(ctx)).encode_typed(&scene()).unwrap_err();
        assert_eq!(err, EncodeError::DepthExceeded { limit: 2 });
    }
}
