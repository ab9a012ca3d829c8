use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::HashMap;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{BuildError, MapInfo, TypeInfo, Typed};
use crate::ops::Map;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impls::impl_type_path!("std::collections" :: HashMap<K, V>);
impls::impl_type_path!("alloc::collections" :: BTreeMap<K, V>);

fn from_entries<C, K, V>(
    entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
) -> Result<Box<dyn Reflect>, BuildError>
where
    C: Reflect + FromIterator<(K, V)>,
    K: Reflect + Typed,
    V: Reflect + Typed,
{
    let entries = entries
        .into_iter()
        .map(|(key, value)| Ok((BuildError::take::<K>(key)?, BuildError::take::<V>(value)?)))
        .collect::<Result<Vec<_>, BuildError>>()?;
    Ok(Box::new(entries.into_iter().collect::<C>()))
}

macro_rules! impl_map {
    ($ty:ident, $($bound:tt)*) => {
        impl<K, V> Typed for $ty<K, V>
        where
            K: Reflect + Typed + $($bound)*,
            V: Reflect + Typed,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(from_entries::<Self, K, V>))
                })
            }
        }

        impl<K, V> Reflect for $ty<K, V>
        where
            K: Reflect + Typed + $($bound)*,
            V: Reflect + Typed,
        {
            crate::reflection::impl_reflect_cast_fn!(Map);
        }

        impl<K, V> Map for $ty<K, V>
        where
            K: Reflect + Typed + $($bound)*,
            V: Reflect + Typed,
        {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new($ty::iter(self).map(|(key, value)| (key.as_reflect(), value.as_reflect())))
            }
        }

        impl<K, V> GetTypeMeta for $ty<K, V>
        where
            K: Reflect + Typed + GetTypeMeta + $($bound)*,
            V: Reflect + Typed + GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_map!(HashMap, Eq + Hash);
impl_map!(BTreeMap, Ord);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use crate::Reflect;
    use crate::info::{BuildError, TypePath, Typed};

    #[test]
    fn map_builds_from_entries() {
        assert_eq!(
            <BTreeMap<String, u8>>::type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, u8>"
        );

        let info = <BTreeMap<String, u8>>::type_info().as_map().unwrap();
        let entries = vec![(String::from("a").into_boxed_reflect(), 1_u8.into_boxed_reflect())];
        let map = info.from_entries(entries).unwrap().take::<BTreeMap<String, u8>>().unwrap();
        assert_eq!(map.get("a"), Some(&1));

        let wrong = vec![(1_u8.into_boxed_reflect(), 1_u8.into_boxed_reflect())];
        assert!(matches!(info.from_entries(wrong), Err(BuildError::ItemType { .. })));
    }
}
