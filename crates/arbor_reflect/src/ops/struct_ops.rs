use crate::Reflect;

/// A struct with named fields.
///
/// Fields flagged `UNSERIALIZABLE` are listed in the struct info but are
/// not reachable through these accessors.
///
/// # Examples
///
/// ```
/// use arbor_reflect::{derive::Reflect, ops::Struct};
///
/// #[derive(Reflect)]
/// struct Pair {
///     left: u8,
///     right: String,
/// }
///
/// let mut pair = Pair { left: 1, right: "r".into() };
/// assert_eq!(pair.field("left").unwrap().downcast_ref::<u8>(), Some(&1));
/// *pair.field_at_mut(1).unwrap().downcast_mut::<String>().unwrap() = "x".into();
/// assert_eq!(pair.right, "x");
/// ```
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Access by declaration position.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_len(&self) -> usize;
}
