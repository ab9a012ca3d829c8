use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{GenericParam, Generics, Ident, LitStr, Path, Type, WhereClause, parse_quote};

use arbor_macro_utils::full_path::{AnyFP, SendFP, SyncFP};

use crate::derive_data::TypeAttributes;
use crate::path::{get_type_meta_, reflect_, type_path_, typed_};

/// Data shared by every kind of reflected type.
pub(crate) struct ReflectMeta<'a> {
    arbor_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    /// Field types that must satisfy the reflection bounds.
    active_types: Vec<Type>,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(
        arbor_reflect_path: Path,
        attrs: TypeAttributes,
        ident: &'a Ident,
        generics: &'a Generics,
    ) -> Self {
        Self {
            arbor_reflect_path,
            attrs,
            ident,
            generics,
            active_types: Vec::new(),
        }
    }

    #[inline]
    pub fn arbor_reflect_path(&self) -> &Path {
        &self.arbor_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn active_types(&self) -> &[Type] {
        &self.active_types
    }

    pub fn push_active_type(&mut self, ty: &Type) {
        if !self.active_types.contains(ty) {
            self.active_types.push(ty.clone());
        }
    }

    /// Whether the type has type or const parameters.
    ///
    /// Lifetimes are ignored: reflected types are `'static`.
    pub fn is_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|param| !matches!(param, GenericParam::Lifetime(_)))
    }

    /// `type_ident` and the module path, honoring `#[reflect(type_path = "...")]`.
    pub fn path_parts(&self) -> (LitStr, Option<TokenStream>) {
        match &self.attrs.type_path {
            Some(custom) => match custom.value().rsplit_once("::") {
                Some((module, ident)) => (
                    LitStr::new(ident, custom.span()),
                    Some(LitStr::new(module, custom.span()).into_token_stream()),
                ),
                None => (custom.clone(), None),
            },
            None => {
                let ident = LitStr::new(&self.ident.to_string(), self.ident.span());
                (ident, Some(quote!(::core::module_path!())))
            }
        }
    }

    /// Generic parameters of the type as `TypePath` strings, in declaration
    /// order. `fn_name` is `type_path` or `type_name`.
    pub fn generic_args(&self, fn_name: &str) -> Vec<TokenStream> {
        let type_path_ = type_path_(&self.arbor_reflect_path);
        let fn_ident = Ident::new(fn_name, Span::call_site());
        self.generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(ty) => {
                    let ident = &ty.ident;
                    Some(quote!(<#ident as #type_path_>::#fn_ident()))
                }
                GenericParam::Const(c) => {
                    let ident = &c.ident;
                    Some(quote!(&::std::string::ToString::to_string(&#ident)))
                }
                GenericParam::Lifetime(_) => None,
            })
            .collect()
    }

    /// Returns the generics split for an impl block, with the bounds every
    /// reflection impl needs.
    ///
    /// With `add_meta`, field types must also implement `GetTypeMeta`.
    pub fn split_generics(&self, add_meta: bool) -> (TokenStream, TokenStream, WhereClause) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut where_clause = where_clause.cloned().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });

        if self.is_generic() {
            let path = &self.arbor_reflect_path;
            let type_path_ = type_path_(path);
            let reflect_ = reflect_(path);
            let typed_ = typed_(path);
            let get_type_meta_ = get_type_meta_(path);

            where_clause
                .predicates
                .push(parse_quote!(Self: #AnyFP + #SendFP + #SyncFP));

            for param in self.generics.type_params() {
                let ident = &param.ident;
                where_clause.predicates.push(parse_quote!(#ident: #type_path_));
            }

            for ty in &self.active_types {
                if add_meta {
                    where_clause
                        .predicates
                        .push(parse_quote!(#ty: #reflect_ + #typed_ + #get_type_meta_));
                } else {
                    where_clause
                        .predicates
                        .push(parse_quote!(#ty: #reflect_ + #typed_));
                }
            }
        }

        (
            impl_generics.into_token_stream(),
            ty_generics.into_token_stream(),
            where_clause,
        )
    }
}
