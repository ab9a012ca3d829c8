use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{BuildError, OptionInfo, TypeInfo, Typed};
use crate::ops::Nullable;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impls::impl_type_path!("core::option" :: Option<T>);

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Option(OptionInfo::new::<Self, T>(none::<T>, some::<T>))
        })
    }
}

fn none<T: Reflect + Typed>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

fn some<T: Reflect + Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError> {
    let inner = BuildError::take::<T>(inner)?;
    Ok(Box::new(Some(inner)))
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    crate::reflection::impl_reflect_cast_fn!(Option);
}

impl<T: Reflect + Typed> Nullable for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn option_info_builds_both_states() {
        assert_eq!(<Option<String>>::type_path(), "core::option::Option<alloc::string::String>");
        assert_eq!(<Option<String>>::type_name(), "Option<String>");

        let info = <Option<u8>>::type_info().as_option().unwrap();
        assert!(info.none().take::<Option<u8>>().unwrap().is_none());

        let some = info.some(7_u8.into_boxed_reflect()).unwrap();
        assert_eq!(some.take::<Option<u8>>().unwrap(), Some(7));
        assert!(info.some(String::new().into_boxed_reflect()).is_err());
    }
}
