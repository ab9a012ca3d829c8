use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::Display;
use core::str::FromStr;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ParseScalarError, ScalarInfo, TypeInfo, TypePath, Typed};
use crate::ops::Scalar;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};

fn parse_error<T: TypePath>(text: &str, message: impl Display) -> ParseScalarError {
    ParseScalarError {
        text: text.to_string(),
        type_path: T::type_path(),
        message: message.to_string(),
    }
}

fn parse_from_str<T>(text: &str) -> Result<Box<dyn Reflect>, ParseScalarError>
where
    T: FromStr + Reflect + TypePath,
    T::Err: Display,
{
    match text.trim().parse::<T>() {
        Ok(value) => Ok(Box::new(value)),
        Err(e) => Err(parse_error::<T>(text, e)),
    }
}

fn parse_bool(text: &str) -> Result<Box<dyn Reflect>, ParseScalarError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(Box::new(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Box::new(false))
    } else {
        Err(parse_error::<bool>(text, "expected `true` or `false`"))
    }
}

fn parse_char(text: &str) -> Result<Box<dyn Reflect>, ParseScalarError> {
    // A lone whitespace character is a valid value, so trim only longer text.
    let mut chars = text.chars();
    let candidate = match (chars.next(), chars.next()) {
        (Some(c), None) => return Ok(Box::new(c)),
        _ => text.trim(),
    };
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Box::new(c)),
        _ => Err(parse_error::<char>(text, "expected exactly one character")),
    }
}

macro_rules! impl_scalar {
    ($($ty:ident => $parse:expr),* $(,)?) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Self>($parse)))
            }
        }

        impl Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(Scalar);
        }

        impl Scalar for $ty {
            #[inline]
            fn to_text(&self) -> String {
                self.to_string()
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }
        }
    )*};
}

impl_scalar! {
    bool => parse_bool,
    char => parse_char,
    u8 => parse_from_str::<u8>,
    u16 => parse_from_str::<u16>,
    u32 => parse_from_str::<u32>,
    u64 => parse_from_str::<u64>,
    u128 => parse_from_str::<u128>,
    usize => parse_from_str::<usize>,
    i8 => parse_from_str::<i8>,
    i16 => parse_from_str::<i16>,
    i32 => parse_from_str::<i32>,
    i64 => parse_from_str::<i64>,
    i128 => parse_from_str::<i128>,
    isize => parse_from_str::<isize>,
    f32 => parse_from_str::<f32>,
    f64 => parse_from_str::<f64>,
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::Typed;

    fn parse<T: Typed>(text: &str) -> Result<alloc::boxed::Box<dyn Reflect>, crate::info::ParseScalarError> {
        T::type_info().as_scalar().unwrap().parse(text)
    }

    #[test]
    fn bool_parsing_ignores_case() {
        assert_eq!(parse::<bool>("True").unwrap().take::<bool>().unwrap(), true);
        assert_eq!(parse::<bool>(" false ").unwrap().take::<bool>().unwrap(), false);
        assert!(parse::<bool>("yes").is_err());
    }

    #[test]
    fn char_keeps_lone_whitespace() {
        assert_eq!(parse::<char>(" ").unwrap().take::<char>().unwrap(), ' ');
        assert_eq!(parse::<char>(" x ").unwrap().take::<char>().unwrap(), 'x');
        assert!(parse::<char>("xy").is_err());
    }

    #[test]
    fn float_text_round_trips() {
        let value = 0.1_f64 + 0.2;
        let text = value.reflect_ref().as_scalar().unwrap().to_text();
        assert_eq!(parse::<f64>(&text).unwrap().take::<f64>().unwrap(), value);
    }

    #[test]
    fn overflow_reports_type_path() {
        let err = parse::<u8>("256").unwrap_err();
        assert_eq!(err.type_path, "u8");
        assert_eq!(err.text, "256");
    }
}
