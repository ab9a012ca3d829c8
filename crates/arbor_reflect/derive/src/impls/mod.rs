// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod struct_kind;
mod trait_get_type_meta;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

// -----------------------------------------------------------------------------
// Internal API

/// Generates every impl of `#[derive(Reflect)]`.
pub(crate) fn match_reflect_impls(input: &ReflectDerive) -> TokenStream {
    let meta = input.meta();

    let (info, kind_impl, kind) = match input {
        ReflectDerive::Struct(data) => (
            struct_kind::struct_type_info(data),
            struct_kind::impl_struct(data),
            "Struct",
        ),
        ReflectDerive::Enum(data) => (
            enum_kind::enum_type_info(data),
            enum_kind::impl_enum(data),
            "Enum",
        ),
    };

    let type_path = trait_type_path::impl_trait_type_path(meta);
    let typed = trait_typed::impl_trait_typed(meta, info);
    let reflect = trait_reflect::impl_trait_reflect(meta, kind);
    let get_type_meta = trait_get_type_meta::impl_trait_get_type_meta(meta);
    let auto_register = auto_register::get_auto_register_impl(meta);

    quote! {
        const _: () = {
            #type_path

            #typed

            #reflect

            #kind_impl

            #get_type_meta

            #auto_register
        };
    }
}
