use alloc::boxed::Box;
use alloc::string::String;

use crate::Reflect;
use crate::info::{Type, TypePath};

/// Returned when text cannot be parsed as a scalar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {text:?} as `{type_path}`: {message}")]
pub struct ParseScalarError {
    pub text: String,
    pub type_path: &'static str,
    pub message: String,
}

/// Information about numbers, `bool` and `char`.
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Type,
    parse: fn(&str) -> Result<Box<dyn Reflect>, ParseScalarError>,
}

impl ScalarInfo {
    pub fn new<T: TypePath>(parse: fn(&str) -> Result<Box<dyn Reflect>, ParseScalarError>) -> Self {
        Self {
            ty: Type::of::<T>(),
            parse,
        }
    }

    crate::info::impl_type_fn!(ty);

    /// Parses `text` into a value of this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_reflect::info::Typed;
    ///
    /// let info = u16::type_info().as_scalar().unwrap();
    /// let value = info.parse(" 42 ").unwrap();
    /// assert_eq!(value.take::<u16>().unwrap(), 42);
    /// assert!(info.parse("-1").is_err());
    /// ```
    #[inline]
    pub fn parse(&self, text: &str) -> Result<Box<dyn Reflect>, ParseScalarError> {
        (self.parse)(text)
    }
}

/// Information about owned text types.
#[derive(Debug)]
pub struct StringInfo {
    ty: Type,
    from_string: fn(String) -> Box<dyn Reflect>,
}

impl StringInfo {
    pub fn new<T: TypePath>(from_string: fn(String) -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            from_string,
        }
    }

    crate::info::impl_type_fn!(ty);

    /// Converts a `String` into this text type.
    #[inline]
    pub fn from_string(&self, text: String) -> Box<dyn Reflect> {
        (self.from_string)(text)
    }
}
