use alloc::boxed::Box;

use crate::Reflect;

/// Ordered collections that are not arrays.
pub trait List: Reflect {
    fn len(&self) -> usize;
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

/// Collections of unique items.
pub trait Set: Reflect {
    fn len(&self) -> usize;
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

/// Key-value collections.
pub trait Map: Reflect {
    fn len(&self) -> usize;
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;
}
