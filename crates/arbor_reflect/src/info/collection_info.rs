use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{BuildError, Type, TypeInfo, TypePath, Typed};

/// Builds a collection from its items in iteration order.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, BuildError>;

/// Builds a map from its entries.
pub type FromEntriesFn =
    fn(Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>, BuildError>;

macro_rules! impl_item_collection {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            ty: Type,
            item_ty: Type,
            item_info: fn() -> &'static TypeInfo,
            from_items: FromItemsFn,
        }

        impl $name {
            pub fn new<T: TypePath, Item: Typed>(from_items: FromItemsFn) -> Self {
                Self {
                    ty: Type::of::<T>(),
                    item_ty: Type::of::<Item>(),
                    item_info: Item::type_info,
                    from_items,
                }
            }

            crate::info::impl_type_fn!(ty);

            #[inline]
            pub fn item_ty(&self) -> &Type {
                &self.item_ty
            }

            #[inline]
            pub fn item_info(&self) -> &'static TypeInfo {
                (self.item_info)()
            }

            #[inline]
            pub fn from_items(
                &self,
                items: Vec<Box<dyn Reflect>>,
            ) -> Result<Box<dyn Reflect>, BuildError> {
                (self.from_items)(items)
            }
        }
    };
}

impl_item_collection! {
    /// Information about ordered, non-array collections.
    ListInfo
}

impl_item_collection! {
    /// Information about set collections.
    SetInfo
}

/// Information about key-value collections.
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key_info: fn() -> &'static TypeInfo,
    value_info: fn() -> &'static TypeInfo,
    from_entries: FromEntriesFn,
}

impl MapInfo {
    pub fn new<T: TypePath, K: Typed, V: Typed>(from_entries: FromEntriesFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            key_info: K::type_info,
            value_info: V::type_info,
            from_entries,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    #[inline]
    pub fn from_entries(
        &self,
        entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
    ) -> Result<Box<dyn Reflect>, BuildError> {
        (self.from_entries)(entries)
    }
}
