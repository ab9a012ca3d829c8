use alloc::boxed::Box;
use alloc::collections::{LinkedList, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{BuildError, ListInfo, TypeInfo, TypePath, Typed};
use crate::ops::List;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impls::impl_type_path!("alloc::collections" :: VecDeque<T>);
impls::impl_type_path!("alloc::collections" :: LinkedList<T>);

impl<T: TypePath> TypePath for Arc<[T]> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| impls::concat(&["alloc::sync::Arc<[", T::type_path(), "]>"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| impls::concat(&["Arc<[", T::type_name(), "]>"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Arc"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::sync")
    }
}

fn from_items<C, T>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, BuildError>
where
    C: Reflect + FromIterator<T>,
    T: Reflect + Typed,
{
    let items = impls::take_items::<T>(items)?;
    Ok(Box::new(items.into_iter().collect::<C>()))
}

macro_rules! impl_list {
    ($ty:ty, |$s:ident| $iter:expr) => {
        impl<T: Reflect + Typed> Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(ListInfo::new::<Self, T>(from_items::<Self, T>))
                })
            }
        }

        impl<T: Reflect + Typed> Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(List);
        }

        impl<T: Reflect + Typed> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                let $s = self;
                ExactSizeIterator::len(&$iter)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                let $s = self;
                Box::new($iter.map(Reflect::as_reflect))
            }
        }

        impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for $ty {
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

impl_list!(VecDeque<T>, |list| VecDeque::iter(list));
impl_list!(LinkedList<T>, |list| LinkedList::iter(list));
impl_list!(Arc<[T]>, |list| <[T]>::iter(list));

#[cfg(test)]
mod tests {
    use alloc::collections::{LinkedList, VecDeque};
    use alloc::sync::Arc;
    use alloc::vec;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn lists_build_in_order() {
        let info = <LinkedList<u8>>::type_info().as_list().unwrap();
        let items = vec![1_u8.into_boxed_reflect(), 2_u8.into_boxed_reflect()];
        let list = info.from_items(items).unwrap().take::<LinkedList<u8>>().unwrap();
        assert_eq!(list.into_iter().collect::<vec::Vec<_>>(), [1, 2]);
    }

    #[test]
    fn shared_slices_are_lists() {
        let slice: Arc<[u32]> = Arc::from([5_u32, 6]);
        let list = slice.reflect_ref().as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(<Arc<[u32]>>::type_path(), "alloc::sync::Arc<[u32]>");
        assert_eq!(<VecDeque<u32>>::type_path(), "alloc::collections::VecDeque<u32>");
    }
}
