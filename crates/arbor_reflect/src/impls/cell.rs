//! Containers for static storage of type information.
//!
//! ## NonGenericTypeInfoCell
//!
//! A [`OnceLock`] around a [`TypeInfo`], for non-generic types. Type paths
//! of non-generic types are string literals and need no cell.
//!
//! ## GenericTypeCell
//!
//! A `static CELL` inside a generic function is shared by every
//! instantiation, so the generic cells keep one entry per [`TypeId`]:
//!
//! - [`GenericTypeInfoCell`] stores [`TypeInfo`].
//! - [`GenericTypePathCell`] stores [`String`].

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use arbor_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

/// Static storage for the [`TypeInfo`] of a non-generic type.
///
/// ```
/// use arbor_reflect::impls::NonGenericTypeInfoCell;
/// use arbor_reflect::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
///
/// struct Handle;
///
/// impl TypePath for Handle {
///     fn type_path() -> &'static str { "demo::Handle" }
///     fn type_name() -> &'static str { "Handle" }
///     fn type_ident() -> &'static str { "Handle" }
/// }
///
/// impl Typed for Handle {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert_eq!(Handle::type_info().type_name(), "Handle");
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Static storage for generic types, keyed by [`TypeId`].
///
/// Entries are leaked, so references stay valid for `'static`.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Static storage for the [`TypeInfo`] of generic types.
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Static storage for the type paths of generic types.
///
/// ```
/// use arbor_reflect::impls::{self, GenericTypePathCell};
/// use arbor_reflect::info::TypePath;
///
/// struct Slot<T>(T);
///
/// impl<T: TypePath> TypePath for Slot<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| impls::concat(&["demo::Slot<", T::type_path(), ">"]))
///     }
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| impls::concat(&["Slot<", T::type_name(), ">"]))
///     }
///     fn type_ident() -> &'static str { "Slot" }
/// }
///
/// assert_eq!(<Slot<u8>>::type_path(), "demo::Slot<u8>");
/// assert_eq!(<Slot<String>>::type_name(), "Slot<String>");
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the entry of `G`, creating it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            // `f` may recurse into other cells, so it runs without the lock.
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: TypedProperty> Default for GenericTypeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
