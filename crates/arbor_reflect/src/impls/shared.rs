use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{BuildError, SharedInfo, TypeInfo, Typed};
use crate::ops::{ReadGuard, SharedObject, WriteGuard};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

use super::sync::ReflectGuard;

// -----------------------------------------------------------------------------
// Shared

/// A shared, lockable value with object identity.
///
/// Cloning a `Shared` creates another handle to the same value. Handles to
/// the same allocation are written once by the codec and referred to by id
/// afterwards.
///
/// # Examples
///
/// ```
/// use arbor_reflect::Shared;
///
/// let a = Shared::new(1_u32);
/// let b = a.clone();
/// *b.write() += 1;
///
/// assert_eq!(*a.read(), 2);
/// assert!(a.ptr_eq(&b));
/// assert!(!a.ptr_eq(&Shared::new(2)));
/// ```
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Locks the value for reading, ignoring poison.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the value for writing, ignoring poison.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point to the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The number of handles to the value.
    #[inline]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    #[inline]
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&*self.read()).finish()
    }
}

// -----------------------------------------------------------------------------
// Reflect

impls::impl_type_path!("arbor_reflect" :: Shared<T>);

fn wrap<T: Reflect + Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError> {
    let inner = BuildError::take::<T>(inner)?;
    Ok(Box::new(Shared::new(inner)))
}

impl<T: Reflect + Typed> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Shared(SharedInfo::new::<Self, T>(wrap::<T>)))
    }
}

impl<T: Reflect + Typed> Reflect for Shared<T> {
    crate::reflection::impl_reflect_cast_fn!(Shared);
}

impl<T: Reflect + Typed> SharedObject for Shared<T> {
    #[inline]
    fn identity(&self) -> usize {
        self.addr()
    }

    #[inline]
    fn share(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn read_inner(&self) -> ReadGuard<'_> {
        Box::new(ReflectGuard(self.read()))
    }

    fn write_inner(&self) -> WriteGuard<'_> {
        Box::new(ReflectGuard(self.write()))
    }
}

impl<T: Reflect + Typed + Default + GetTypeMeta> GetTypeMeta for Shared<T> {
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

    use super::Shared;
    use crate::Reflect;
    use crate::info::TypePath;

    #[test]
    fn identity_follows_the_allocation() {
        let a = Shared::new(String::from("root"));
        let b = a.clone();
        let c = Shared::new(String::from("root"));

        let id = |s: &Shared<String>| s.reflect_ref().as_shared().unwrap().identity();
        assert_eq!(id(&a), id(&b));
        assert_ne!(id(&a), id(&c));
        assert_eq!(a.handle_count(), 2);
    }

    #[test]
    fn share_returns_a_new_handle() {
        let a = Shared::new(5_u8);
        let other = a.reflect_ref().as_shared().unwrap().share();
        let b = other.take::<Shared<u8>>().unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(<Shared<u8>>::type_path(), "arbor_reflect::Shared<u8>");
    }
}
