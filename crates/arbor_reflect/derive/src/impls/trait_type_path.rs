use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;
use crate::path::{generic_path_, generic_type_path_cell_, type_path_};

/// Generates the `TypePath` impl.
///
/// Non-generic types return string literals. Generic types build their
/// paths once per instantiation and cache them in a `GenericTypePathCell`.
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let path = meta.arbor_reflect_path();
    let type_path_ = type_path_(path);
    let ident = meta.ident();
    let (type_ident, module_path) = meta.path_parts();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(false);

    let full_path = match &module_path {
        Some(module) => quote!(::core::concat!(#module, "::", #type_ident)),
        None => quote!(#type_ident),
    };
    let module_path = match module_path {
        Some(module) => quote!(::core::option::Option::Some(#module)),
        None => quote!(::core::option::Option::None),
    };

    let (type_path, type_name) = if meta.is_generic() {
        let cell_ = generic_type_path_cell_(path);
        let generic_path_ = generic_path_(path);
        let path_args = meta.generic_args("type_path");
        let name_args = meta.generic_args("type_name");
        (
            quote! {
                static CELL: #cell_ = #cell_::new();
                CELL.get_or_insert::<Self>(|| #generic_path_(#full_path, &[#(#path_args),*]))
            },
            quote! {
                static CELL: #cell_ = #cell_::new();
                CELL.get_or_insert::<Self>(|| #generic_path_(#type_ident, &[#(#name_args),*]))
            },
        )
    } else {
        (full_path.clone(), quote!(#type_ident))
    };

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}
