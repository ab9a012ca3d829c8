use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypePath};

/// Information about an enum made only of unit variants.
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: &'static [&'static str],
    from_name: fn(&str) -> Option<Box<dyn Reflect>>,
    default: Option<fn() -> Box<dyn Reflect>>,
}

impl EnumInfo {
    pub fn new<T: TypePath>(
        variants: &'static [&'static str],
        from_name: fn(&str) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants,
            from_name,
            default: None,
        }
    }

    #[inline]
    pub fn with_default(mut self, default: fn() -> Box<dyn Reflect>) -> Self {
        self.default = Some(default);
        self
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn variant_names(&self) -> &'static [&'static str] {
        self.variants
    }

    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| *v == name)
    }

    /// Creates the variant called `name`.
    #[inline]
    pub fn from_name(&self, name: &str) -> Option<Box<dyn Reflect>> {
        (self.from_name)(name)
    }

    #[inline]
    pub fn default_fn(&self) -> Option<fn() -> Box<dyn Reflect>> {
        self.default
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::ops::Enum;

    #[derive(crate::derive::Reflect, Default, Debug, PartialEq)]
    #[reflect(default, type_path = "tests::Tide")]
    enum Tide {
        #[default]
        Low,
        Rising,
        High,
    }

    #[test]
    fn derived_variants_are_created_by_name() {
        let info = Tide::type_info().as_enum().unwrap();
        assert_eq!(info.variant_names(), &["Low", "Rising", "High"]);
        assert_eq!(info.variant_index("High"), Some(2));

        let rising = info.from_name("Rising").unwrap();
        assert_eq!(rising.take::<Tide>().unwrap(), Tide::Rising);
        assert!(info.from_name("Ebb").is_none());

        let default = info.default_fn().unwrap()();
        assert_eq!(default.take::<Tide>().unwrap(), Tide::Low);
        assert_eq!(Tide::High.variant_name(), "High");
        assert_eq!(Tide::High.variant_index(), 2);
    }
}
