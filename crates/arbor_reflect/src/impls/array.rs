use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{ArrayInfo, BuildError, TypeInfo, TypePath, Typed};
use crate::ops::Array;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

// -----------------------------------------------------------------------------
// Type paths

impls::impl_type_path!("alloc::vec" :: Vec<T>);

impl<T: TypePath> TypePath for Box<[T]> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| impls::concat(&["alloc::boxed::Box<[", T::type_path(), "]>"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| impls::concat(&["Box<[", T::type_name(), "]>"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::boxed")
    }
}

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            impls::concat(&["[", T::type_path(), "; ", &N.to_string(), "]"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            impls::concat(&["[", T::type_name(), "; ", &N.to_string(), "]"])
        })
    }

    fn type_ident() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            impls::concat(&["[", T::type_ident(), "; ", &N.to_string(), "]"])
        })
    }
}

// -----------------------------------------------------------------------------
// Builders

fn build_vec<T: Reflect + Typed>(
    lengths: &[usize],
    lower_bounds: &[isize],
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, BuildError> {
    impls::check_vector_shape::<Vec<T>>(lengths, lower_bounds, items.len())?;
    Ok(Box::new(impls::take_items::<T>(items)?))
}

fn build_boxed_slice<T: Reflect + Typed>(
    lengths: &[usize],
    lower_bounds: &[isize],
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, BuildError> {
    impls::check_vector_shape::<Box<[T]>>(lengths, lower_bounds, items.len())?;
    Ok(Box::new(impls::take_items::<T>(items)?.into_boxed_slice()))
}

fn build_fixed<T: Reflect + Typed, const N: usize>(
    lengths: &[usize],
    lower_bounds: &[isize],
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, BuildError> {
    impls::check_vector_shape::<[T; N]>(lengths, lower_bounds, items.len())?;
    let found = items.len();
    let items = impls::take_items::<T>(items)?;
    match <[T; N]>::try_from(items) {
        Ok(array) => Ok(Box::new(array)),
        Err(_) => Err(BuildError::Length { expected: N, found }),
    }
}

// -----------------------------------------------------------------------------
// Reflect

macro_rules! impl_vector_array {
    ($ty:ty, [$($generics:tt)*], $build:expr) => {
        impl<$($generics)*> Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Array(ArrayInfo::new::<Self, T>(Some(1), $build))
                })
            }
        }

        impl<$($generics)*> Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(Array);
        }

        impl<$($generics)*> Array for $ty {
            #[inline]
            fn rank(&self) -> usize {
                1
            }

            #[inline]
            fn length(&self, dimension: usize) -> usize {
                if dimension == 0 { <[T]>::len(self) } else { 0 }
            }

            #[inline]
            fn len(&self) -> usize {
                <[T]>::len(self)
            }

            fn get(&self, flat_index: usize) -> Option<&dyn Reflect> {
                <[T]>::get(self, flat_index).map(Reflect::as_reflect)
            }

            fn get_mut(&mut self, flat_index: usize) -> Option<&mut dyn Reflect> {
                <[T]>::get_mut(self, flat_index).map(Reflect::as_reflect_mut)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(<[T]>::iter(self).map(Reflect::as_reflect))
            }
        }
    };
}

impl_vector_array!(Vec<T>, [T: Reflect + Typed], build_vec::<T>);
impl_vector_array!(Box<[T]>, [T: Reflect + Typed], build_boxed_slice::<T>);
impl_vector_array!([T; N], [T: Reflect + Typed, const N: usize], build_fixed::<T, N>);

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Box<[T]> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Reflect + Typed + GetTypeMeta, const N: usize> GetTypeMeta for [T; N] {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use crate::Reflect;
    use crate::info::{BuildError, TypePath, Typed};

    #[test]
    fn fixed_array_paths() {
        assert_eq!(<[u8; 4]>::type_path(), "[u8; 4]");
        assert_eq!(<Box<[u8]>>::type_name(), "Box<[u8]>");
    }

    #[test]
    fn fixed_array_build_checks_length() {
        let info = <[u16; 2]>::type_info().as_array().unwrap();
        let items = vec![1_u16.into_boxed_reflect(), 2_u16.into_boxed_reflect()];
        let value = info.build(&[2], &[0], items).unwrap();
        assert_eq!(value.take::<[u16; 2]>().unwrap(), [1, 2]);

        let err = info.build(&[1], &[0], vec![1_u16.into_boxed_reflect()]).unwrap_err();
        assert_eq!(err, BuildError::Length { expected: 2, found: 1 });
    }

    #[test]
    fn vector_rejects_lower_bounds_and_rank() {
        let info = <Vec<u8>>::type_info().as_array().unwrap();
        assert!(matches!(
            info.build(&[0], &[3], vec![]),
            Err(BuildError::LowerBound { .. })
        ));
        assert!(matches!(
            info.build(&[0, 0], &[0, 0], vec![]),
            Err(BuildError::Rank { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn array_view_iterates_in_order() {
        let value = vec![3_i32, 4, 5];
        let array = value.reflect_ref().as_array().unwrap();
        assert_eq!(array.rank(), 1);
        assert_eq!(array.lengths(), [3]);
        let items: vec::Vec<i32> = array
            .iter()
            .map(|item| *item.downcast_ref::<i32>().unwrap())
            .collect();
        assert_eq!(items, [3, 4, 5]);
    }
}
