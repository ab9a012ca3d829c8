//! Kind specific operations on reflected values.

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod collection_ops;
mod reflect_ref;
mod scalar_ops;
mod struct_ops;
mod wrapper_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use collection_ops::{List, Map, Set};
pub use reflect_ref::{ReflectMut, ReflectRef};
pub use scalar_ops::{Enum, Scalar, Text};
pub use struct_ops::Struct;
pub use wrapper_ops::{Dynamic, Nullable, ReadGuard, SharedObject, Synchronized, WriteGuard};
