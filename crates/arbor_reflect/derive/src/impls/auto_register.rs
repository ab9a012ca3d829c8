use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;
use crate::path::auto_register_;
use crate::utils;

/// Submits the type to the automatic registry.
///
/// Generic types can not be submitted: there is no single instantiation.
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> TokenStream {
    if !cfg!(feature = "auto_register") || meta.attrs().auto_register.is_none() || meta.is_generic() {
        return utils::empty();
    }

    let auto_register_ = auto_register_(meta.arbor_reflect_path());
    let ident = meta.ident();

    quote! {
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}
