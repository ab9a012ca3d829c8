use core::fmt;

use arbor_reflect::info::{BuildError, ReflectKind};

/// A type declares its codec markers or implicit methods incorrectly.
///
/// Raised when the type's descriptor is first built. The error is cached
/// with the descriptor and reported again on every later use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{type_path}::{member}`: {reason}")]
    InvalidMember {
        type_path: &'static str,
        member: &'static str,
        reason: &'static str,
    },
    #[error("`{type_path}` declares more than one {marker}: `{first}` and `{second}`")]
    DuplicateMember {
        type_path: &'static str,
        marker: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("`{type_path}`: base field `{field}` must be a struct, found {kind}")]
    InvalidBase {
        type_path: &'static str,
        field: &'static str,
        kind: ReflectKind,
    },
}

/// Failure while writing a value to a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("traversal exceeded the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
    #[error("no surrogate or default encoding for `{type_path}` ({kind})")]
    UnsupportedType {
        type_path: &'static str,
        kind: ReflectKind,
    },
    #[error("{0}")]
    Custom(String),
}

impl EncodeError {
    /// An error raised by a surrogate.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Failure while reading a value from a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("type `{name}` is not registered")]
    UnresolvableType { name: String },
    #[error("node `{node}` carries no type and none is expected")]
    MissingType { node: String },
    #[error("reference `{id}` is not defined before its use")]
    UnresolvedReference { id: String },
    #[error("malformed array: {reason}")]
    MalformedArray { reason: String },
    #[error("can not convert `{text}` to `{type_path}`{}", field_suffix(.field))]
    Conversion {
        text: String,
        type_path: &'static str,
        field: Option<&'static str>,
    },
    #[error("expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("the working object of `{type_path}` was already set")]
    AlreadySet { type_path: &'static str },
    #[error("`{type_path}` has no constructor")]
    NoConstructor { type_path: &'static str },
    #[error("node `{node}` is null but `{type_path}` is not nullable")]
    UnexpectedNull {
        node: String,
        type_path: &'static str,
    },
    #[error("node `{node}` has no `{entry}` child")]
    MissingEntry { node: String, entry: &'static str },
    #[error("traversal exceeded the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
    #[error("no surrogate or default decoding for `{type_path}` ({kind})")]
    UnsupportedType {
        type_path: &'static str,
        kind: ReflectKind,
    },
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// An error raised by a surrogate.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }

    pub(crate) fn malformed(reason: impl fmt::Display) -> Self {
        Self::MalformedArray {
            reason: reason.to_string(),
        }
    }
}

fn field_suffix(field: &Option<&'static str>) -> String {
    match field {
        Some(name) => format!(" for field `{name}`"),
        None => String::new(),
    }
}

impl From<BuildError> for DecodeError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::ItemType { expected, found } => Self::TypeMismatch { expected, found },
            other => Self::malformed(other),
        }
    }
}
