/// Returned by the builder functions recorded in container infos.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("expected an item of type `{expected}`, found `{found}`")]
    ItemType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected {expected} dimension(s), found {found}")]
    Rank { expected: usize, found: usize },
    #[error("expected {expected} element(s), found {found}")]
    Length { expected: usize, found: usize },
    #[error("`{type_path}` does not support non-zero lower bounds")]
    LowerBound { type_path: &'static str },
}

impl BuildError {
    /// Downcasts `value` to `T`, or reports which type was found instead.
    pub fn take<T: crate::Reflect + crate::info::TypePath>(
        value: alloc::boxed::Box<dyn crate::Reflect>,
    ) -> Result<T, Self> {
        value.take::<T>().map_err(|value| Self::ItemType {
            expected: T::type_path(),
            found: value.reflect_type_path(),
        })
    }
}
