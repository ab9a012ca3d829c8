use alloc::string::String;

use crate::Reflect;

/// Numbers, `bool` and `char`.
pub trait Scalar: Reflect {
    /// The text form written to a tree. Parsable by `ScalarInfo::parse`.
    fn to_text(&self) -> String;
}

/// Owned text.
pub trait Text: Reflect {
    fn as_str(&self) -> &str;
}

/// Enums made only of unit variants.
pub trait Enum: Reflect {
    fn variant_name(&self) -> &'static str;
    fn variant_index(&self) -> usize;
}
