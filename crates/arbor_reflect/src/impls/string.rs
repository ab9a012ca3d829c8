use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{StringInfo, TypeInfo, TypePath, Typed};
use crate::ops::Text;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};

macro_rules! impl_text {
    ($ty:ty, $path:literal, $name:literal, $ident:literal, $module:literal, $from_string:expr) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::String(StringInfo::new::<Self>($from_string)))
            }
        }

        impl Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(String);
        }

        impl Text for $ty {
            #[inline]
            fn as_str(&self) -> &str {
                self
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }
        }
    };
}

impl_text!(
    String,
    "alloc::string::String",
    "String",
    "String",
    "alloc::string",
    |text| Box::new(text)
);

impl_text!(
    Box<str>,
    "alloc::boxed::Box<str>",
    "Box<str>",
    "Box",
    "alloc::boxed",
    |text| Box::new(text.into_boxed_str())
);

impl_text!(
    Arc<str>,
    "alloc::sync::Arc<str>",
    "Arc<str>",
    "Arc",
    "alloc::sync",
    |text| Box::new(Arc::<str>::from(text))
);

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;

    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn text_types_share_the_string_kind() {
        let info = <Arc<str>>::type_info().as_string().unwrap();
        let value = info.from_string(String::from("bark"));
        assert_eq!(value.reflect_ref().as_string().unwrap().as_str(), "bark");
        assert_eq!(value.reflect_type_path(), "alloc::sync::Arc<str>");
    }
}
