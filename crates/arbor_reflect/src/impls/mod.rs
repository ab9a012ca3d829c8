//! Reflection for std types, plus utilities for hand-written impls.
//!
//! - [`concat`]: string concatenation for type paths.
//! - [`NonGenericTypeInfoCell`]: for the `Typed` impl of non-generic types.
//! - [`GenericTypePathCell`]: for the `TypePath` impl of generic types.
//! - [`GenericTypeInfoCell`]: for the `Typed` impl of generic types.
//!
//! ## Implemented types
//!
//! - Scalar: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//! - String: `String`, `Box<str>`, `Arc<str>`
//! - Array: `Vec<T>`, `Box<[T]>`, `[T; N]`, [`NdArray<T>`]
//! - List: `VecDeque<T>`, `LinkedList<T>`, `Arc<[T]>`
//! - Set: `HashSet<T>`, `BTreeSet<T>`
//! - Map: `HashMap<K, V>`, `BTreeMap<K, V>`
//! - Option: `Option<T>`
//! - Shared: [`Shared<T>`]
//! - Wrapper: `Mutex<T>`, `RwLock<T>`
//! - Dynamic: [`DynValue`]
//! - Opaque: `chrono::DateTime<Utc>`

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod array;
mod datetime;
mod dyn_value;
mod list;
mod map;
mod nd_array;
mod option;
mod scalar;
mod set;
mod shared;
mod string;
mod sync;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use dyn_value::DynValue;
pub use nd_array::{NdArray, ShapeError};
pub use shared::Shared;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{BuildError, TypePath};

/// String concatenation with a single allocation.
///
/// ```
/// use arbor_reflect::impls;
///
/// let s = impls::concat(&["module", "::", "name", "<", "T", ">"]);
/// assert_eq!(s, "module::name<T>");
/// assert_eq!(s.capacity(), 15);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = String::with_capacity(len);
    for item in arr {
        res.push_str(item);
    }
    res
}

/// Joins `prefix` and its generic arguments: `prefix<A, B>`.
#[inline(never)]
pub fn generic_path(prefix: &str, args: &[&str]) -> String {
    let mut res = String::with_capacity(prefix.len() + 2 + args.len() * 8);
    res.push_str(prefix);
    res.push('<');
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            res.push_str(", ");
        }
        res.push_str(arg);
    }
    res.push('>');
    res
}

/// Implements [`TypePath`] for a generic std type.
macro_rules! impl_type_path {
    ($module:literal :: $ident:ident < $($param:ident),+ >) => {
        impl<$($param: $crate::info::TypePath),+> $crate::info::TypePath for $ident<$($param),+> {
            fn type_path() -> &'static str {
                static CELL: $crate::impls::GenericTypePathCell =
                    $crate::impls::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    $crate::impls::generic_path(
                        concat!($module, "::", stringify!($ident)),
                        &[$(<$param as $crate::info::TypePath>::type_path()),+],
                    )
                })
            }

            fn type_name() -> &'static str {
                static CELL: $crate::impls::GenericTypePathCell =
                    $crate::impls::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    $crate::impls::generic_path(
                        stringify!($ident),
                        &[$(<$param as $crate::info::TypePath>::type_name()),+],
                    )
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ident)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }
    };
}

pub(crate) use impl_type_path;

// -----------------------------------------------------------------------------
// Builder helpers

/// Unboxes every item as `T`.
pub(crate) fn take_items<T: Reflect + TypePath>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Vec<T>, BuildError> {
    items.into_iter().map(BuildError::take::<T>).collect()
}

/// Checks the shape passed to a rank-1, zero-based array builder.
pub(crate) fn check_vector_shape<A: TypePath>(
    lengths: &[usize],
    lower_bounds: &[isize],
    found: usize,
) -> Result<(), BuildError> {
    if lengths.len() != 1 {
        return Err(BuildError::Rank {
            expected: 1,
            found: lengths.len(),
        });
    }
    if lower_bounds.iter().any(|bound| *bound != 0) {
        return Err(BuildError::LowerBound {
            type_path: A::type_path(),
        });
    }
    if lengths[0] != found {
        return Err(BuildError::Length {
            expected: lengths[0],
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::generic_path;

    #[test]
    fn generic_path_joins_arguments() {
        assert_eq!(generic_path("a::Map", &["u8", "String"]), "a::Map<u8, String>");
        assert_eq!(generic_path("Vec", &["u8"]), "Vec<u8>");
    }
}
