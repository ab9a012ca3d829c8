//! Paths of `arbor_reflect` items, rooted at the resolved crate path.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

macro_rules! item_paths {
    ($($name:ident => $($segment:ident)::+;)*) => {$(
        #[inline]
        pub(crate) fn $name(path: &Path) -> TokenStream {
            quote!(#path::$($segment)::+)
        }
    )*};
}

item_paths! {
    reflect_ => Reflect;
    type_path_ => info::TypePath;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    struct_info_ => info::StructInfo;
    enum_info_ => info::EnumInfo;
    named_field_ => info::NamedField;
    field_flags_ => info::FieldFlags;
    type_flags_ => info::TypeFlags;
    renamer_spec_ => info::RenamerSpec;
    preferred_collection_ => info::PreferredCollection;
    reflect_kind_ => info::ReflectKind;
    struct_ => ops::Struct;
    enum_ => ops::Enum;
    reflect_ref_ => ops::ReflectRef;
    reflect_mut_ => ops::ReflectMut;
    get_type_meta_ => registry::GetTypeMeta;
    type_meta_ => registry::TypeMeta;
    type_registry_ => registry::TypeRegistry;
    from_type_ => registry::FromType;
    type_trait_default_ => registry::TypeTraitDefault;
    non_generic_type_info_cell_ => impls::NonGenericTypeInfoCell;
    generic_type_info_cell_ => impls::GenericTypeInfoCell;
    generic_type_path_cell_ => impls::GenericTypePathCell;
    generic_path_ => impls::generic_path;
    auto_register_ => __macro_exports::auto_register;
}
