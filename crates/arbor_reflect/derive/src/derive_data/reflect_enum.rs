use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Fields, Ident, LitStr, Token, Variant};

use crate::derive_data::ReflectMeta;

/// An enum made only of unit variants.
pub(crate) struct ReflectEnum<'a> {
    meta: ReflectMeta<'a>,
    variants: Vec<&'a Ident>,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(
        meta: ReflectMeta<'a>,
        variants: &'a Punctuated<Variant, Token![,]>,
        span: Span,
    ) -> syn::Result<Self> {
        if variants.is_empty() {
            return Err(syn::Error::new(span, "Reflect can not be derived for empty enums"));
        }
        if meta.is_generic() {
            return Err(syn::Error::new(span, "Reflect can not be derived for generic enums"));
        }

        let variants = variants
            .iter()
            .map(|variant| match variant.fields {
                Fields::Unit => Ok(&variant.ident),
                _ => Err(syn::Error::new_spanned(
                    variant,
                    "Reflect can only be derived for enums with unit variants",
                )),
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self { meta, variants })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[&'a Ident] {
        &self.variants
    }

    pub fn variant_names(&self) -> Vec<LitStr> {
        self.variants
            .iter()
            .map(|ident| LitStr::new(&ident.unraw().to_string(), ident.span()))
            .collect()
    }
}
