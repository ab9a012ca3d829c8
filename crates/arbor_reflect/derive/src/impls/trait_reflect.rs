use proc_macro2::{Ident, TokenStream};
use quote::quote;

use arbor_macro_utils::full_path::{BoxFP, ResultFP};

use crate::derive_data::ReflectMeta;
use crate::path::{reflect_, reflect_kind_, reflect_mut_, reflect_ref_};

/// Generates the `Reflect` impl for a type of the given kind.
pub(crate) fn impl_trait_reflect(meta: &ReflectMeta, kind: &str) -> TokenStream {
    let path = meta.arbor_reflect_path();
    let reflect_ = reflect_(path);
    let reflect_kind_ = reflect_kind_(path);
    let reflect_ref_ = reflect_ref_(path);
    let reflect_mut_ = reflect_mut_(path);
    let ident = meta.ident();
    let kind = Ident::new(kind, proc_macro2::Span::call_site());
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(false);

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            fn set(
                &mut self,
                value: #BoxFP<dyn #reflect_>,
            ) -> #ResultFP<(), #BoxFP<dyn #reflect_>> {
                *self = <dyn #reflect_>::take::<Self>(value)?;
                #ResultFP::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::#kind
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::#kind(self)
            }
        }
    }
}
