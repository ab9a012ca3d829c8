use alloc::boxed::Box;
use core::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{BuildError, TypeInfo, Typed, WrapperInfo};
use crate::ops::{ReadGuard, Synchronized, WriteGuard};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

// -----------------------------------------------------------------------------
// Guard adapter

/// Exposes a typed lock guard as a guard over `dyn Reflect`.
pub(crate) struct ReflectGuard<G>(pub G);

impl<G> Deref for ReflectGuard<G>
where
    G: Deref,
    G::Target: Reflect + Sized,
{
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &dyn Reflect {
        &*self.0
    }
}

impl<G> DerefMut for ReflectGuard<G>
where
    G: DerefMut,
    G::Target: Reflect + Sized,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.0
    }
}

// -----------------------------------------------------------------------------
// Mutex / RwLock

impls::impl_type_path!("std::sync" :: Mutex<T>);
impls::impl_type_path!("std::sync" :: RwLock<T>);

macro_rules! impl_wrapper {
    ($ty:ident, $wrap:ident, |$s:ident| read: $read:expr, write: $write:expr) => {
        fn $wrap<T: Reflect + Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError> {
            let inner = BuildError::take::<T>(inner)?;
            Ok(Box::new($ty::new(inner)))
        }

        impl<T: Reflect + Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Wrapper(WrapperInfo::new::<Self, T>($wrap::<T>))
                })
            }
        }

        impl<T: Reflect + Typed> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Wrapper);
        }

        impl<T: Reflect + Typed> Synchronized for $ty<T> {
            fn read_inner(&self) -> ReadGuard<'_> {
                let $s = self;
                Box::new(ReflectGuard($read.unwrap_or_else(PoisonError::into_inner)))
            }

            fn write_inner(&self) -> WriteGuard<'_> {
                let $s = self;
                Box::new(ReflectGuard($write.unwrap_or_else(PoisonError::into_inner)))
            }
        }

        impl<T: Reflect + Typed + Default + GetTypeMeta> GetTypeMeta for $ty<T> {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

impl_wrapper!(Mutex, wrap_mutex, |lock| read: lock.lock(), write: lock.lock());
impl_wrapper!(RwLock, wrap_rw_lock, |lock| read: lock.read(), write: lock.write());

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use std::sync::Mutex;

    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn wrapper_exposes_inner_value() {
        let lock = Mutex::new(String::from("oak"));
        let view = lock.reflect_ref().as_wrapper().unwrap();
        assert_eq!(view.read_inner().downcast_ref::<String>().unwrap(), "oak");

        view.write_inner()
            .set(String::from("elm").into_boxed_reflect())
            .unwrap();
        assert_eq!(lock.lock().unwrap().as_str(), "elm");
    }

    #[test]
    fn wrapper_info_wraps() {
        let info = <Mutex<u8>>::type_info().as_wrapper().unwrap();
        let value = info.wrap(3_u8.into_boxed_reflect()).unwrap();
        let lock = value.take::<Mutex<u8>>().unwrap();
        assert_eq!(lock.into_inner().unwrap(), 3);
    }
}
