use core::any::Any;

mod default;

pub use default::TypeTraitDefault;

/// A capability that can be stored in a [`TypeMeta`](crate::registry::TypeMeta).
pub trait TypeTrait: Any + Send + Sync {}

impl<T: Any + Send + Sync> TypeTrait for T {}
