use core::fmt;

/// The shape of a reflected type, without any data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Numbers, `bool` and `char`.
    Scalar,
    /// Owned text.
    String,
    /// Enums made only of unit variants.
    Enum,
    /// Structs with named fields.
    Struct,
    /// Arrays of any rank.
    Array,
    /// Ordered collections that are not arrays.
    List,
    Set,
    Map,
    /// `Option<T>`, the nullable carrier.
    Option,
    /// Values with object identity.
    Shared,
    /// Lock wrappers around a single value.
    Wrapper,
    /// A boxed value of a run-time chosen type.
    Dynamic,
    /// Anything else.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "Scalar",
            Self::String => "String",
            Self::Enum => "Enum",
            Self::Struct => "Struct",
            Self::Array => "Array",
            Self::List => "List",
            Self::Set => "Set",
            Self::Map => "Map",
            Self::Option => "Option",
            Self::Shared => "Shared",
            Self::Wrapper => "Wrapper",
            Self::Dynamic => "Dynamic",
            Self::Opaque => "Opaque",
        })
    }
}

/// Returned when a value or info is cast to the wrong kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("kind mismatch: expected {expected}, received {received}")]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}
