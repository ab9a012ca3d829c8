use alloc::boxed::Box;
use core::ops::{Deref, DerefMut};

use crate::Reflect;

/// A read guard over a wrapped value.
pub type ReadGuard<'a> = Box<dyn Deref<Target = dyn Reflect> + 'a>;

/// A write guard over a wrapped value.
pub type WriteGuard<'a> = Box<dyn DerefMut<Target = dyn Reflect> + 'a>;

/// `Option<T>`.
pub trait Nullable: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;
    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;
}

/// A handle to a value with object identity.
///
/// Handles that point at the same allocation return the same
/// [`identity`](SharedObject::identity).
pub trait SharedObject: Reflect {
    /// An address that is equal for all handles to the same object.
    fn identity(&self) -> usize;

    /// Creates another handle to the same object.
    fn share(&self) -> Box<dyn Reflect>;

    fn read_inner(&self) -> ReadGuard<'_>;

    fn write_inner(&self) -> WriteGuard<'_>;
}

/// A lock around a single value, such as `Mutex<T>`.
pub trait Synchronized: Reflect {
    fn read_inner(&self) -> ReadGuard<'_>;
    fn write_inner(&self) -> WriteGuard<'_>;
}

/// A value whose concrete type is chosen at run time.
pub trait Dynamic: Reflect {
    fn inner(&self) -> &dyn Reflect;
    fn inner_mut(&mut self) -> &mut dyn Reflect;
}
