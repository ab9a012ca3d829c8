use crate::info::{TypeInfo, TypePath};

/// Static access to a type's [`TypeInfo`].
///
/// Implementations cache the info in a [`NonGenericTypeInfoCell`] or a
/// [`GenericTypeInfoCell`] so that the returned reference is `'static`.
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

/// Dynamic dispatch for [`Typed`].
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
