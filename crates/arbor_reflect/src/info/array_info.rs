use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{BuildError, Type, TypeInfo, TypePath, Typed};

/// Builds an array from its lengths, lower bounds and row-major items.
pub type ArrayBuildFn =
    fn(&[usize], &[isize], Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, BuildError>;

/// Information about an array type of any rank.
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    rank: Option<usize>,
    build: ArrayBuildFn,
}

impl ArrayInfo {
    /// `rank` is `None` when the rank is only known per value.
    pub fn new<T: TypePath, Item: Typed>(rank: Option<usize>, build: ArrayBuildFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_ty: Type::of::<Item>(),
            item_info: Item::type_info,
            rank,
            build,
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

    /// The rank shared by every value of the type, if fixed.
    #[inline]
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    /// Builds a value from `lengths`, `lower_bounds` and row-major `items`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_reflect::{Reflect, info::Typed};
    ///
    /// let info = <Vec<u8>>::type_info().as_array().unwrap();
    /// let items = vec![1_u8.into_boxed_reflect(), 2_u8.into_boxed_reflect()];
    /// let value = info.build(&[2], &[0], items).unwrap();
    /// assert_eq!(value.take::<Vec<u8>>().unwrap(), [1, 2]);
    /// ```
    #[inline]
    pub fn build(
        &self,
        lengths: &[usize],
        lower_bounds: &[isize],
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, BuildError> {
        (self.build)(lengths, lower_bounds, items)
    }
}
