use chrono::{DateTime, Utc};

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};

impl TypePath for DateTime<Utc> {
    #[inline]
    fn type_path() -> &'static str {
        "chrono::DateTime<chrono::Utc>"
    }

    #[inline]
    fn type_name() -> &'static str {
        "DateTime<Utc>"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "DateTime"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("chrono")
    }
}

impl Typed for DateTime<Utc> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl Reflect for DateTime<Utc> {
    crate::reflection::impl_reflect_cast_fn!(Opaque);
}

impl GetTypeMeta for DateTime<Utc> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }
}
