use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Dynamic, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta};

/// A value whose concrete type is only known at run time.
///
/// The codec writes the type attribute for the inner value and resolves it
/// through the registry when reading.
///
/// # Examples
///
/// ```
/// use arbor_reflect::DynValue;
///
/// let value = DynValue::new(String::from("bud"));
/// assert_eq!(value.inner().reflect_type_path(), "alloc::string::String");
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "bud");
/// ```
pub struct DynValue(Box<dyn Reflect>);

impl DynValue {
    #[inline]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Box::new(value))
    }

    #[inline]
    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> &dyn Reflect {
        &*self.0
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.0
    }

    #[inline]
    pub fn into_inner(self) -> Box<dyn Reflect> {
        self.0
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl From<Box<dyn Reflect>> for DynValue {
    #[inline]
    fn from(value: Box<dyn Reflect>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynValue").field(&self.0).finish()
    }
}

impl TypePath for DynValue {
    #[inline]
    fn type_path() -> &'static str {
        "arbor_reflect::DynValue"
    }

    #[inline]
    fn type_name() -> &'static str {
        "DynValue"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "DynValue"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("arbor_reflect")
    }
}

impl Typed for DynValue {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

impl Reflect for DynValue {
    /// Accepts either another `DynValue` or any value to store inside.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.0 = match value.take::<Self>() {
            Ok(other) => other.0,
            Err(value) => value,
        };
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Dynamic
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(self)
    }
}

impl Dynamic for DynValue {
    #[inline]
    fn inner(&self) -> &dyn Reflect {
        &*self.0
    }

    #[inline]
    fn inner_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.0
    }
}

impl GetTypeMeta for DynValue {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::DynValue;
    use crate::Reflect;

    #[test]
    fn set_replaces_the_inner_value() {
        let mut value = DynValue::new(1_u8);
        value.set(2_i64.into_boxed_reflect()).unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&2));

        value.set(DynValue::new(3_u8).into_boxed_reflect()).unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&3));
    }
}
