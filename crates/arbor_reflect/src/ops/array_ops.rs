use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;

/// An array of any rank, stored in row-major order.
pub trait Array: Reflect {
    fn rank(&self) -> usize;

    /// The number of elements along `dimension`.
    fn length(&self, dimension: usize) -> usize;

    /// The index of the first element along `dimension`.
    fn lower_bound(&self, dimension: usize) -> isize {
        let _ = dimension;
        0
    }

    /// Total number of elements.
    fn len(&self) -> usize;

    fn get(&self, flat_index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, flat_index: usize) -> Option<&mut dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

impl dyn Array {
    /// Lengths of every dimension.
    pub fn lengths(&self) -> Vec<usize> {
        (0..self.rank()).map(|d| self.length(d)).collect()
    }

    /// Lower bounds of every dimension.
    pub fn lower_bounds(&self) -> Vec<isize> {
        (0..self.rank()).map(|d| self.lower_bound(d)).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
