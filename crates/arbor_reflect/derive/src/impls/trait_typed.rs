use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;
use crate::path::{generic_type_info_cell_, non_generic_type_info_cell_, type_info_, typed_};

/// Generates the `Typed` impl around `info`, an expression of type `TypeInfo`.
pub(crate) fn impl_trait_typed(meta: &ReflectMeta, info: TokenStream) -> TokenStream {
    let path = meta.arbor_reflect_path();
    let typed_ = typed_(path);
    let type_info_ = type_info_(path);
    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(false);

    let body = if meta.is_generic() {
        let cell_ = generic_type_info_cell_(path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #info)
        }
    } else {
        let cell_ = non_generic_type_info_cell_(path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #info)
        }
    };

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}
