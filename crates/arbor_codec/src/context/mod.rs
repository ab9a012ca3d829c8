//! Hierarchical codec configuration.

// -----------------------------------------------------------------------------
// Modules

mod flags;
mod token;

// -----------------------------------------------------------------------------
// Exports

pub use flags::ContextFlags;
pub use token::Token;

// -----------------------------------------------------------------------------
// SerializationContext

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::LazyLock;

use arbor_reflect::Reflect;
use arbor_reflect::info::{FieldRenamer, TypeInfo, Typed};
use arbor_utils::TypeIdMap;
use arbor_utils::hash::HashMap;

use crate::surrogate::Surrogate;

/// Substitutes a value for text that can not be converted.
///
/// Receives the raw text, the target type and the field name when known.
/// Returning `None` lets the conversion error propagate.
pub type ConversionHandler =
    dyn Fn(&str, &'static TypeInfo, Option<&str>) -> Option<Box<dyn Reflect>> + Send + Sync;

/// The traversal depth limit of the global context.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// The largest element count a decoded array may declare in the global
/// context.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 24;

/// One scope of codec configuration.
///
/// Every token and flag not set in a scope resolves through its parent,
/// ending at the immutable [`global`](Self::global) scope. Encoders and
/// decoders hold an `Arc` to a context and never change it.
///
/// # Examples
///
/// ```
/// use arbor_codec::context::{ContextFlags, SerializationContext, Token};
///
/// let mut ctx = SerializationContext::new();
/// assert_eq!(ctx.token(Token::TypeAttribute), "_Type");
/// assert!(ctx.flag(ContextFlags::EXPAND_ENVIRONMENT));
///
/// ctx.set_token(Token::TypeAttribute, "kind");
/// ctx.set_flag(ContextFlags::EXPAND_ENVIRONMENT, false);
/// assert_eq!(ctx.token(Token::TypeAttribute), "kind");
/// assert!(!ctx.flag(ContextFlags::EXPAND_ENVIRONMENT));
///
/// ctx.clear_flag(ContextFlags::EXPAND_ENVIRONMENT);
/// assert!(ctx.flag(ContextFlags::EXPAND_ENVIRONMENT));
/// ```
pub struct SerializationContext {
    parent: Option<Arc<SerializationContext>>,
    tokens: [Option<Box<str>>; Token::COUNT],
    flags_exist: ContextFlags,
    flags_value: ContextFlags,
    renamer: Option<Arc<dyn FieldRenamer>>,
    surrogates: TypeIdMap<Vec<Arc<dyn Surrogate>>>,
    shape_surrogates: HashMap<Box<str>, Vec<Arc<dyn Surrogate>>>,
    conversion: Option<Arc<ConversionHandler>>,
    max_depth: Option<usize>,
    max_array_len: Option<usize>,
}

static GLOBAL: LazyLock<Arc<SerializationContext>> = LazyLock::new(|| {
    let mut global = SerializationContext::empty(None);
    for token in Token::ALL {
        global.tokens[token.index()] = Some(token.verbose().into());
    }
    global.flags_exist = ContextFlags::all();
    global.flags_value = ContextFlags::EXPAND_ENVIRONMENT;
    global.max_depth = Some(DEFAULT_MAX_DEPTH);
    global.max_array_len = Some(DEFAULT_MAX_ARRAY_LEN);
    Arc::new(global)
});

impl SerializationContext {
    fn empty(parent: Option<Arc<SerializationContext>>) -> Self {
        Self {
            parent,
            tokens: Default::default(),
            flags_exist: ContextFlags::empty(),
            flags_value: ContextFlags::empty(),
            renamer: None,
            surrogates: TypeIdMap::new(),
            shape_surrogates: HashMap::default(),
            conversion: None,
            max_depth: None,
            max_array_len: None,
        }
    }

    /// The root of every context chain.
    ///
    /// Verbose tokens, only [`EXPAND_ENVIRONMENT`] set, no surrogates.
    ///
    /// [`EXPAND_ENVIRONMENT`]: ContextFlags::EXPAND_ENVIRONMENT
    #[inline]
    pub fn global() -> Arc<SerializationContext> {
        GLOBAL.clone()
    }

    /// An empty scope under the global context.
    #[inline]
    pub fn new() -> Self {
        Self::empty(Some(Self::global()))
    }

    /// An empty scope under `parent`.
    #[inline]
    pub fn with_parent(parent: Arc<SerializationContext>) -> Self {
        Self::empty(Some(parent))
    }

    /// Short tokens, null array elements removed, condensed arrays, string
    /// deduplication and hex dates.
    pub fn concise() -> Self {
        let mut ctx = Self::new();
        for token in Token::ALL {
            ctx.set_token(token, token.concise());
        }
        ctx.set_flag(ContextFlags::REMOVE_NULLS, true);
        ctx.set_flag(ContextFlags::FIX_M_PREFIX, true);
        ctx.set_flag(ContextFlags::ARRAY_INDICES, false);
        ctx.set_flag(ContextFlags::EXPLICIT_ARRAY_ELEMENTS, false);
        ctx.set_flag(ContextFlags::DEDUPLICATE_STRINGS, true);
        ctx.set_flag(ContextFlags::FULL_UTC_DATES, false);
        ctx
    }

    /// Long tokens, explicit indexed array elements and RFC 3339 dates.
    pub fn verbose() -> Self {
        let mut ctx = Self::new();
        for token in Token::ALL {
            ctx.set_token(token, token.verbose());
        }
        ctx.set_flag(ContextFlags::REMOVE_NULLS, false);
        ctx.set_flag(ContextFlags::FIX_M_PREFIX, true);
        ctx.set_flag(ContextFlags::ARRAY_INDICES, true);
        ctx.set_flag(ContextFlags::EXPLICIT_ARRAY_ELEMENTS, true);
        ctx.set_flag(ContextFlags::DEDUPLICATE_STRINGS, false);
        ctx.set_flag(ContextFlags::FULL_UTC_DATES, true);
        ctx
    }

    #[inline]
    pub fn parent(&self) -> Option<&Arc<SerializationContext>> {
        self.parent.as_ref()
    }

    fn scopes(&self) -> impl Iterator<Item = &SerializationContext> {
        core::iter::successors(Some(self), |ctx| ctx.parent.as_deref())
    }

    // -------------------------------------------------------------------------
    // Tokens

    pub fn token(&self, token: Token) -> &str {
        self.scopes()
            .find_map(|ctx| ctx.tokens[token.index()].as_deref())
            .unwrap_or(token.verbose())
    }

    pub fn set_token(&mut self, token: Token, name: impl Into<Box<str>>) {
        self.tokens[token.index()] = Some(name.into());
    }

    /// Removes the local override of `token`.
    pub fn clear_token(&mut self, token: Token) {
        self.tokens[token.index()] = None;
    }

    // -------------------------------------------------------------------------
    // Flags

    /// Resolves a single flag through the scope chain.
    pub fn flag(&self, flag: ContextFlags) -> bool {
        self.scopes()
            .find(|ctx| ctx.parent.is_none() || ctx.flags_exist.contains(flag))
            .is_some_and(|ctx| ctx.flags_value.contains(flag))
    }

    pub fn set_flag(&mut self, flag: ContextFlags, value: bool) {
        self.flags_exist |= flag;
        self.flags_value.set(flag, value);
    }

    /// Removes the local override of `flag`.
    pub fn clear_flag(&mut self, flag: ContextFlags) {
        self.flags_exist.remove(flag);
        self.flags_value.remove(flag);
    }

    /// Every flag, resolved.
    pub fn flags(&self) -> ContextFlags {
        ContextFlags::all()
            .iter()
            .filter(|flag| self.flag(*flag))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Renaming

    /// The field renamer applied after type level naming.
    pub fn renamer(&self) -> Option<&dyn FieldRenamer> {
        self.scopes().find_map(|ctx| ctx.renamer.as_deref())
    }

    pub fn set_renamer(&mut self, renamer: impl FieldRenamer + 'static) {
        self.renamer = Some(Arc::new(renamer));
    }

    // -------------------------------------------------------------------------
    // Surrogates

    /// Registers `surrogate` for exactly `T`.
    ///
    /// Surrogates registered for the same type form a chain in registration
    /// order.
    pub fn add_surrogate<T: Typed>(&mut self, surrogate: impl Surrogate + 'static) {
        self.surrogates
            .get_or_insert(TypeId::of::<T>(), Vec::new)
            .push(Arc::new(surrogate));
    }

    /// Registers `surrogate` for every instantiation of a generic type.
    ///
    /// `shape` is a type path without generic arguments, such as
    /// `alloc::collections::VecDeque`.
    pub fn add_shape_surrogate(&mut self, shape: &str, surrogate: impl Surrogate + 'static) {
        self.shape_surrogates
            .entry(shape.into())
            .or_default()
            .push(Arc::new(surrogate));
    }

    /// Exact surrogates of every scope, nearest scope first.
    pub(crate) fn exact_surrogates(
        &self,
        type_id: TypeId,
    ) -> impl Iterator<Item = &Arc<dyn Surrogate>> {
        self.scopes()
            .filter_map(move |ctx| ctx.surrogates.get(&type_id))
            .flatten()
    }

    /// Shape surrogates of every scope, nearest scope first.
    pub(crate) fn shape_surrogates<'a>(
        &'a self,
        shape: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn Surrogate>> {
        self.scopes()
            .filter_map(move |ctx| ctx.shape_surrogates.get(shape))
            .flatten()
    }

    // -------------------------------------------------------------------------
    // Decoding

    pub fn conversion_handler(&self) -> Option<&ConversionHandler> {
        self.scopes().find_map(|ctx| ctx.conversion.as_deref())
    }

    pub fn set_conversion_handler(
        &mut self,
        handler: impl Fn(&str, &'static TypeInfo, Option<&str>) -> Option<Box<dyn Reflect>>
        + Send
        + Sync
        + 'static,
    ) {
        self.conversion = Some(Arc::new(handler));
    }

    /// The deepest nesting an encode or decode may reach.
    pub fn max_depth(&self) -> usize {
        self.scopes()
            .find_map(|ctx| ctx.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = Some(depth);
    }

    /// The largest element count the decoder accepts for one array,
    /// counting skipped positions.
    pub fn max_array_len(&self) -> usize {
        self.scopes()
            .find_map(|ctx| ctx.max_array_len)
            .unwrap_or(DEFAULT_MAX_ARRAY_LEN)
    }

    pub fn set_max_array_len(&mut self, len: usize) {
        self.max_array_len = Some(len);
    }
}

impl Default for SerializationContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerializationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationContext")
            .field("is_global", &self.parent.is_none())
            .field("flags", &self.flags())
            .field("max_depth", &self.max_depth())
            .field("max_array_len", &self.max_array_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ContextFlags, SerializationContext, Token};

    #[test]
    fn global_defaults() {
        let global = SerializationContext::global();
        assert!(global.parent().is_none());
        assert_eq!(global.flags(), ContextFlags::EXPAND_ENVIRONMENT);
        assert_eq!(global.token(Token::Root), "_ROOT_");
        assert_eq!(global.token(Token::NullValue), "_NULL_");
        assert_eq!(global.max_depth(), 512);
        assert_eq!(global.max_array_len(), 1 << 24);
    }

    #[test]
    fn overrides_resolve_through_parents() {
        let mut outer = SerializationContext::new();
        outer.set_flag(ContextFlags::ARRAY_INDICES, true);
        outer.set_token(Token::ArrayElement, "Item");
        let outer = Arc::new(outer);

        let mut inner = SerializationContext::with_parent(outer.clone());
        assert!(inner.flag(ContextFlags::ARRAY_INDICES));
        assert_eq!(inner.token(Token::ArrayElement), "Item");

        inner.set_flag(ContextFlags::ARRAY_INDICES, false);
        inner.set_token(Token::ArrayElement, "Entry");
        assert!(!inner.flag(ContextFlags::ARRAY_INDICES));
        assert_eq!(inner.token(Token::ArrayElement), "Entry");

        inner.clear_flag(ContextFlags::ARRAY_INDICES);
        inner.clear_token(Token::ArrayElement);
        assert!(inner.flag(ContextFlags::ARRAY_INDICES));
        assert_eq!(inner.token(Token::ArrayElement), "Item");
    }

    #[test]
    fn presets() {
        let concise = SerializationContext::concise();
        assert_eq!(concise.token(Token::TypeAttribute), "_T");
        assert_eq!(concise.token(Token::ReferTo), "_RT");
        assert!(concise.flag(ContextFlags::REMOVE_NULLS));
        assert!(concise.flag(ContextFlags::DEDUPLICATE_STRINGS));
        assert!(!concise.flag(ContextFlags::FULL_UTC_DATES));
        assert!(concise.flag(ContextFlags::EXPAND_ENVIRONMENT));

        let verbose = SerializationContext::verbose();
        assert_eq!(verbose.token(Token::LowerBound), "_LowerBound");
        assert!(verbose.flag(ContextFlags::EXPLICIT_ARRAY_ELEMENTS));
        assert!(verbose.flag(ContextFlags::ARRAY_INDICES));
        assert!(!verbose.flag(ContextFlags::REMOVE_NULLS));
    }
}
