//! Object to tree.

// -----------------------------------------------------------------------------
// Modules

mod references;

// -----------------------------------------------------------------------------
// Encoder

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use arbor_reflect::Reflect;
use arbor_reflect::info::{NamedField, TypeInfo, Typed};
use arbor_reflect::ops::{ReflectRef, Struct};
use arbor_tree::TreeNode;
use log::trace;

use crate::context::{ContextFlags, SerializationContext, Token};
use crate::error::EncodeError;
use crate::metadata::TypeDescriptor;
use crate::surrogate;

use references::{Occurrence, RefKey, References};

/// Converts values into [`TreeNode`]s.
///
/// An encoder owns the identity table of one encode and must not be shared
/// between threads. Encoders created from the same context may run in
/// parallel.
///
/// # Examples
///
/// ```
/// use arbor_codec::Encoder;
/// use arbor_reflect::derive::Reflect;
///
/// #[derive(Reflect)]
/// #[reflect(type_path = "demo::Leaf")]
/// struct Leaf {
///     weight: f32,
///     tag: Option<String>,
/// }
///
/// let node = Encoder::new().encode(&Leaf { weight: 2.5, tag: None }).unwrap();
/// assert_eq!(node.name(), "_ROOT_");
/// assert_eq!(node.attribute("_Type"), Some("demo::Leaf"));
/// assert_eq!(node.child("weight").unwrap().text(), Some("2.5"));
/// assert_eq!(node.child("tag").unwrap().attribute("_Null"), Some("_NULL_"));
/// ```
pub struct Encoder {
    context: Arc<SerializationContext>,
    references: References,
    ignored: Vec<String>,
    fields: Vec<&'static NamedField>,
    depth: usize,
}

impl Encoder {
    /// An encoder using the global context.
    #[inline]
    pub fn new() -> Self {
        Self::with_context(SerializationContext::global())
    }

    pub fn with_context(context: Arc<SerializationContext>) -> Self {
        Self {
            context,
            references: References::default(),
            ignored: Vec::new(),
            fields: Vec::new(),
            depth: 0,
        }
    }

    #[inline]
    pub fn context(&self) -> &SerializationContext {
        &self.context
    }

    /// Encodes `value` into a root node that names its type.
    pub fn encode(&mut self, value: &dyn Reflect) -> Result<TreeNode, EncodeError> {
        self.encode_root(value, None)
    }

    /// Encodes `value` into a root node. The type attribute is left out,
    /// so decoding needs the same static type.
    pub fn encode_typed<T: Reflect + Typed>(&mut self, value: &T) -> Result<TreeNode, EncodeError> {
        self.encode_root(value, Some(T::type_info()))
    }

    fn encode_root(
        &mut self,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<TreeNode, EncodeError> {
        self.references.clear();
        self.ignored.clear();
        self.fields.clear();
        self.depth = 0;

        let ctx = self.context.clone();
        let mut root = TreeNode::new(ctx.token(Token::Root));
        self.encode_node(value, &mut root, expected)?;
        self.references
            .finalize(&mut root, ctx.token(Token::ReferenceId));
        Ok(root)
    }

    /// Encodes `value` as a new child `name` of `parent`.
    ///
    /// `expected` is the static type the reader will know, usually the
    /// field type. The node names the value's type when it differs.
    pub fn encode_into(
        &mut self,
        name: &str,
        value: &dyn Reflect,
        parent: &mut TreeNode,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), EncodeError> {
        let mut node = TreeNode::new(name);
        self.encode_node(value, &mut node, expected)?;
        parent.push_child(node);
        Ok(())
    }

    /// Encodes `value` into the existing `node`.
    ///
    /// Writes the null, type and reference markers, then hands the value to
    /// the first of: entity traversal, surrogates, the type's codec
    /// methods, the default walk.
    pub fn encode_node(
        &mut self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), EncodeError> {
        let limit = self.context.max_depth();
        if self.depth >= limit {
            return Err(EncodeError::DepthExceeded { limit });
        }
        self.depth += 1;
        let result = self.encode_marked(value, node, expected);
        self.depth -= 1;
        result
    }

    fn encode_marked(
        &mut self,
        mut value: &dyn Reflect,
        node: &mut TreeNode,
        mut expected: Option<&'static TypeInfo>,
    ) -> Result<(), EncodeError> {
        let ctx = self.context.clone();
        trace!("encoding `{}` into <{}>", value.reflect_type_path(), node.name());

        loop {
            match value.reflect_ref() {
                ReflectRef::Option(option) => match option.value() {
                    Some(inner) => {
                        value = inner;
                        if let Some(TypeInfo::Option(info)) = expected {
                            expected = Some(info.inner_info());
                        }
                    }
                    None => {
                        node.set_attribute(ctx.token(Token::NullAttribute), ctx.token(Token::NullValue));
                        return Ok(());
                    }
                },
                ReflectRef::Dynamic(dynamic) => value = dynamic.inner(),
                _ => break,
            }
        }

        let mut descriptor = TypeDescriptor::of(value.reflect_type_info())?;
        while let Some(base) = descriptor.proxied_base() {
            let Some(inner) = value
                .reflect_ref()
                .as_struct()
                .ok()
                .and_then(|s| s.field_at(base.field.index()))
            else {
                break;
            };
            value = inner;
            descriptor = base.descriptor;
        }

        if expected.map(TypeInfo::ty_id) != Some(value.ty_id()) {
            node.set_attribute(ctx.token(Token::TypeAttribute), value.reflect_type_path());
        }

        if let Some(key) = identity(value, &ctx) {
            match self.references.visit(key) {
                Occurrence::Repeat(id) => {
                    node.set_attribute(ctx.token(Token::ReferTo), id.to_string());
                    node.remove_attribute(ctx.token(Token::TypeAttribute));
                    return Ok(());
                }
                Occurrence::First(provisional) => {
                    node.set_attribute(ctx.token(Token::ReferenceId), provisional);
                }
            }
        }

        self.encode_body(value, node, descriptor)
    }

    fn encode_body(
        &mut self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), EncodeError> {
        if let Some(entity) = descriptor.entity() {
            return self.encode_entity(value, node, entity);
        }

        let ctx = self.context.clone();
        for surrogate in surrogate::chain(&ctx, descriptor.type_info().ty()) {
            if surrogate.encode(value, node, self)? {
                return Ok(());
            }
        }

        if let Some(serialize) = descriptor.implicit().serializer
            && serialize(value, node, self)?
        {
            return Ok(());
        }

        self.write_contents(value, node, descriptor)
    }

    /// Writes `value` with the default walk, skipping surrogates and codec
    /// methods of its own type.
    ///
    /// For surrogates that only prepare the node.
    pub fn encode_contents(
        &mut self,
        value: &dyn Reflect,
        node: &mut TreeNode,
    ) -> Result<(), EncodeError> {
        let descriptor = TypeDescriptor::of(value.reflect_type_info())?;
        self.write_contents(value, node, descriptor)
    }

    fn write_contents(
        &mut self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), EncodeError> {
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => node.set_text(scalar.to_text()),
            ReflectRef::String(text) => node.set_text(text.as_str()),
            ReflectRef::Enum(value) => node.set_text(value.variant_name()),
            ReflectRef::Struct(value) => self.write_struct(value, node, descriptor)?,
            ReflectRef::Array(array) => self.encode_array(array, node)?,
            ReflectRef::Shared(shared) => {
                let inner = shared.read_inner();
                let descriptor = TypeDescriptor::of(inner.reflect_type_info())?;
                self.encode_body(&*inner, node, descriptor)?;
            }
            other => {
                return Err(EncodeError::UnsupportedType {
                    type_path: value.reflect_type_path(),
                    kind: other.kind(),
                });
            }
        }
        Ok(())
    }

    fn write_struct(
        &mut self,
        value: &dyn Struct,
        node: &mut TreeNode,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), EncodeError> {
        let ignored = mem::take(&mut self.ignored);
        let ctx = self.context.clone();

        for field in descriptor.fields() {
            let name = field.name_in(&ctx);
            if ignored.iter().any(|i| *i == name || i == field.name()) {
                continue;
            }
            let Some(field_value) = value.field_at(field.index()) else {
                continue;
            };
            self.fields.push(field.field());
            let result = self.encode_into(&name, field_value, node, Some(field.type_info()));
            self.fields.pop();
            result?;
        }

        if let Some(base) = descriptor.base()
            && let Some(base_value) = value.field_at(base.field.index())
        {
            self.encode_body(base_value, node, base.descriptor)?;
        }
        Ok(())
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

    /// The field being encoded, if any.
    #[inline]
    pub fn current_field(&self) -> Option<&'static NamedField> {
        self.fields.last().copied()
    }

    /// Makes the default walk of the current value skip `name`.
    ///
    /// Called by codec methods that wrote the field themselves and return
    /// `false`. The list is cleared when the walk of a struct level starts.
    pub fn ignore_field(&mut self, name: impl Into<String>) {
        self.ignored.push(name.into());
    }

    pub fn is_ignored_field(&self, name: &str) -> bool {
        self.ignored.iter().any(|i| i == name)
    }

    pub(crate) fn context_handle(&self) -> Arc<SerializationContext> {
        self.context.clone()
    }
}

impl Default for Encoder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The identity `value` takes part in reference sharing with.
fn identity(value: &dyn Reflect, ctx: &SerializationContext) -> Option<RefKey> {
    match value.reflect_ref() {
        ReflectRef::Shared(shared) => Some(RefKey::Object(shared.identity())),
        ReflectRef::String(text) if ctx.flag(ContextFlags::DEDUPLICATE_STRINGS) => {
            Some(RefKey::Text(text.as_str().into()))
        }
        _ => None,
    }
}
