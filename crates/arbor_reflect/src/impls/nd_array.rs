use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{self, GenericTypeInfoCell};
use crate::info::{ArrayInfo, BuildError, TypeInfo, Typed};
use crate::ops::Array;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

// -----------------------------------------------------------------------------
// NdArray

/// Returned when the shape of an [`NdArray`] does not fit its items.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("an array needs at least one dimension")]
    NoDimension,
    #[error("{lengths} length(s) but {lower_bounds} lower bound(s)")]
    BoundsRank { lengths: usize, lower_bounds: usize },
    #[error("the shape holds {expected} element(s), found {found}")]
    Length { expected: usize, found: usize },
    #[error("the element count of the shape overflows `usize`")]
    Overflow,
}

/// The element count of `lengths`, `None` on overflow.
fn element_count(lengths: &[usize]) -> Option<usize> {
    lengths.iter().try_fold(1_usize, |count, &length| count.checked_mul(length))
}

/// A multi-dimensional array with per-dimension lower bounds.
///
/// Items are stored in row-major order: the last dimension varies fastest.
///
/// # Examples
///
/// ```
/// use arbor_reflect::NdArray;
///
/// let grid = NdArray::with_lower_bounds(vec![2, 3], vec![1, 0], (0..6).collect()).unwrap();
///
/// assert_eq!(grid.rank(), 2);
/// assert_eq!(grid.get(&[1, 0]), Some(&0));
/// assert_eq!(grid.get(&[2, 2]), Some(&5));
/// assert_eq!(grid.get(&[0, 0]), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdArray<T> {
    lengths: Box<[usize]>,
    lower_bounds: Box<[isize]>,
    items: Vec<T>,
}

impl<T> NdArray<T> {
    /// Creates a zero-based array.
    pub fn new(lengths: Vec<usize>, items: Vec<T>) -> Result<Self, ShapeError> {
        let lower_bounds = alloc::vec![0; lengths.len()];
        Self::with_lower_bounds(lengths, lower_bounds, items)
    }

    pub fn with_lower_bounds(
        lengths: Vec<usize>,
        lower_bounds: Vec<isize>,
        items: Vec<T>,
    ) -> Result<Self, ShapeError> {
        if lengths.is_empty() {
            return Err(ShapeError::NoDimension);
        }
        if lengths.len() != lower_bounds.len() {
            return Err(ShapeError::BoundsRank {
                lengths: lengths.len(),
                lower_bounds: lower_bounds.len(),
            });
        }
        let expected = element_count(&lengths).ok_or(ShapeError::Overflow)?;
        if items.len() != expected {
            return Err(ShapeError::Length {
                expected,
                found: items.len(),
            });
        }
        Ok(Self {
            lengths: lengths.into_boxed_slice(),
            lower_bounds: lower_bounds.into_boxed_slice(),
            items,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    #[inline]
    pub fn lower_bounds(&self) -> &[isize] {
        &self.lower_bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The row-major position of an absolute index.
    pub fn flat_index(&self, index: &[isize]) -> Option<usize> {
        if index.len() != self.rank() {
            return None;
        }
        let mut flat = 0_usize;
        let bounds = self.lengths.as_ref().iter().zip(self.lower_bounds.as_ref());
        for (&i, (&length, &lower)) in index.iter().zip(bounds) {
            let offset = usize::try_from(i.checked_sub(lower)?).ok()?;
            if offset >= length {
                return None;
            }
            flat = flat * length + offset;
        }
        Some(flat)
    }

    pub fn get(&self, index: &[isize]) -> Option<&T> {
        self.flat_index(index).map(|flat| &self.items[flat])
    }

    pub fn get_mut(&mut self, index: &[isize]) -> Option<&mut T> {
        self.flat_index(index).map(|flat| &mut self.items[flat])
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for NdArray<T> {
    fn default() -> Self {
        Self {
            lengths: Box::new([0]),
            lower_bounds: Box::new([0]),
            items: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Reflect

impls::impl_type_path!("arbor_reflect" :: NdArray<T>);

fn build<T: Reflect + Typed>(
    lengths: &[usize],
    lower_bounds: &[isize],
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, BuildError> {
    let items = impls::take_items::<T>(items)?;
    match NdArray::with_lower_bounds(lengths.to_vec(), lower_bounds.to_vec(), items) {
        Ok(array) => Ok(Box::new(array)),
        Err(ShapeError::NoDimension) => Err(BuildError::Rank {
            expected: 1,
            found: 0,
        }),
        Err(ShapeError::BoundsRank {
            lengths,
            lower_bounds,
        }) => Err(BuildError::Rank {
            expected: lengths,
            found: lower_bounds,
        }),
        Err(ShapeError::Length { expected, found }) => {
            Err(BuildError::Length { expected, found })
        }
        Err(ShapeError::Overflow) => Err(BuildError::Length {
            expected: usize::MAX,
            found: 0,
        }),
    }
}

impl<T: Reflect + Typed> Typed for NdArray<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(None, build::<T>)))
    }
}

impl<T: Reflect + Typed> Reflect for NdArray<T> {
    crate::reflection::impl_reflect_cast_fn!(Array);
}

impl<T: Reflect + Typed> Array for NdArray<T> {
    #[inline]
    fn rank(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    fn length(&self, dimension: usize) -> usize {
        <[usize]>::get(&self.lengths, dimension).copied().unwrap_or(0)
    }

    #[inline]
    fn lower_bound(&self, dimension: usize) -> isize {
        <[isize]>::get(&self.lower_bounds, dimension).copied().unwrap_or(0)
    }

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, flat_index: usize) -> Option<&dyn Reflect> {
        self.items.as_slice().get(flat_index).map(Reflect::as_reflect)
    }

    fn get_mut(&mut self, flat_index: usize) -> Option<&mut dyn Reflect> {
        self.items.as_mut_slice().get_mut(flat_index).map(Reflect::as_reflect_mut)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.items.as_slice().iter().map(Reflect::as_reflect))
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for NdArray<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{NdArray, ShapeError};
    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn shape_is_validated() {
        assert_eq!(
            NdArray::new(vec![2, 2], vec![1, 2, 3]),
            Err(ShapeError::Length { expected: 4, found: 3 })
        );
        assert_eq!(NdArray::<u8>::new(vec![], vec![]), Err(ShapeError::NoDimension));
        assert_eq!(
            NdArray::<u8>::new(vec![usize::MAX, 2], vec![]),
            Err(ShapeError::Overflow)
        );
    }

    #[test]
    fn flat_index_is_row_major() {
        let array = NdArray::with_lower_bounds(vec![2, 3], vec![-1, 5], vec![0_u8; 6]).unwrap();
        assert_eq!(array.flat_index(&[-1, 5]), Some(0));
        assert_eq!(array.flat_index(&[-1, 7]), Some(2));
        assert_eq!(array.flat_index(&[0, 5]), Some(3));
        assert_eq!(array.flat_index(&[0, 8]), None);
        assert_eq!(array.flat_index(&[0]), None);
    }

    #[test]
    fn info_builds_any_rank() {
        let info = <NdArray<i8>>::type_info().as_array().unwrap();
        assert_eq!(info.rank(), None);

        let items = (0..4_i8).map(Reflect::into_boxed_reflect).collect();
        let value = info.build(&[2, 2], &[1, 1], items).unwrap();
        let array = value.reflect_ref().as_array().unwrap();
        assert_eq!(array.lengths(), [2, 2]);
        assert_eq!(array.lower_bounds(), [1, 1]);
        assert_eq!(array.get(3).unwrap().downcast_ref::<i8>(), Some(&3));
    }
}
