use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;
use crate::path::{from_type_, get_type_meta_, type_meta_, type_registry_, type_trait_default_};
use crate::utils;

/// Generates the `GetTypeMeta` impl.
///
/// Field types are registered as dependencies. `#[reflect(default)]`
/// inserts `TypeTraitDefault`.
pub(crate) fn impl_trait_get_type_meta(meta: &ReflectMeta) -> TokenStream {
    let path = meta.arbor_reflect_path();
    let get_type_meta_ = get_type_meta_(path);
    let type_meta_ = type_meta_(path);
    let type_registry_ = type_registry_(path);
    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);

    let insert_default = if meta.attrs().default.is_some() {
        let from_type_ = from_type_(path);
        let default_ = type_trait_default_(path);
        quote! {
            meta.insert_trait::<#default_>(<#default_ as #from_type_<Self>>::from_type());
        }
    } else {
        utils::empty()
    };

    let dependencies = meta.active_types();
    let register_deps = if dependencies.is_empty() {
        utils::empty()
    } else {
        quote! {
            fn register_dependencies(registry: &mut #type_registry_) {
                #(registry.register::<#dependencies>();)*
            }
        }
    };

    quote! {
        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                #[allow(unused_mut, reason = "traits are inserted conditionally")]
                let mut meta = #type_meta_::of::<Self>();
                #insert_default
                meta
            }

            #register_deps
        }
    }
}
