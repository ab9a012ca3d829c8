use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::HashSet;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{BuildError, SetInfo, TypeInfo, Typed};
use crate::ops::Set;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impls::impl_type_path!("std::collections" :: HashSet<T>);
impls::impl_type_path!("alloc::collections" :: BTreeSet<T>);

fn from_items<C, T>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, BuildError>
where
    C: Reflect + FromIterator<T>,
    T: Reflect + Typed,
{
    let items = impls::take_items::<T>(items)?;
    Ok(Box::new(items.into_iter().collect::<C>()))
}

macro_rules! impl_set {
    ($ty:ident, $($bound:tt)*) => {
        impl<T: Reflect + Typed + $($bound)*> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Set(SetInfo::new::<Self, T>(from_items::<Self, T>))
                })
            }
        }

        impl<T: Reflect + Typed + $($bound)*> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Set);
        }

        impl<T: Reflect + Typed + $($bound)*> Set for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new($ty::iter(self).map(Reflect::as_reflect))
            }
        }

        impl<T: Reflect + Typed + GetTypeMeta + $($bound)*> GetTypeMeta for $ty<T> {
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

impl_set!(HashSet, Eq + Hash);
impl_set!(BTreeSet, Ord);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec;

    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn set_build_drops_duplicates() {
        let info = <BTreeSet<u8>>::type_info().as_set().unwrap();
        let items = vec![
            2_u8.into_boxed_reflect(),
            1_u8.into_boxed_reflect(),
            2_u8.into_boxed_reflect(),
        ];
        let set = info.from_items(items).unwrap();
        let view = set.reflect_ref().as_set().unwrap();
        assert_eq!(view.len(), 2);
        let first = view.iter().next().unwrap();
        assert_eq!(first.downcast_ref::<u8>(), Some(&1));
    }
}
