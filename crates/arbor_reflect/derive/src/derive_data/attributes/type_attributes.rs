use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitStr, Path, Token};

use crate::REFLECT_ATTRIBUTE_NAME;

/// A `renamer = Path` or `renamer(Path, dynamic)` attribute.
#[derive(Debug, Clone)]
pub(crate) struct RenamerAttribute {
    pub path: Path,
    pub dynamic: bool,
}

/// Type level `#[reflect(...)]` attributes.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    /// `default`: the type implements `Default`.
    pub default: Option<Span>,
    /// `auto_register`: submit the type to the automatic registry.
    pub auto_register: Option<Span>,
    /// `type_path = "..."`: custom path, without generics.
    pub type_path: Option<LitStr>,
    pub never_serialize: bool,
    pub explicit_only: bool,
    pub entity: bool,
    pub proxy: Option<Span>,
    /// `entity(collection = Vec | VecDeque | LinkedList)`.
    pub preferred_collection: Option<Ident>,
    pub renamer: Option<RenamerAttribute>,
}

const COLLECTIONS: &[&str] = &["Vec", "VecDeque", "LinkedList"];

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut res = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| res.parse_meta(meta))?;
            }
        }
        Ok(res)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;
        if path.is_ident("default") {
            self.default = Some(path.span());
        } else if path.is_ident("auto_register") {
            self.auto_register = Some(path.span());
        } else if path.is_ident("type_path") {
            let lit: LitStr = meta.value()?.parse()?;
            let value = lit.value();
            if value.starts_with("::") || value.contains('<') || value.is_empty() {
                return Err(meta.error("`type_path` must be a plain path without `::` prefix or generics"));
            }
            self.type_path = Some(lit);
        } else if path.is_ident("never_serialize") {
            self.never_serialize = true;
        } else if path.is_ident("explicit_only") {
            self.explicit_only = true;
        } else if path.is_ident("proxy") {
            self.proxy = Some(path.span());
        } else if path.is_ident("entity") {
            self.entity = true;
            if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|inner| {
                    if !inner.path.is_ident("collection") {
                        return Err(inner.error("expected `collection = Vec | VecDeque | LinkedList`"));
                    }
                    let ident: Ident = inner.value()?.parse()?;
                    if !COLLECTIONS.iter().any(|name| ident == name) {
                        return Err(syn::Error::new(
                            ident.span(),
                            "expected one of `Vec`, `VecDeque`, `LinkedList`",
                        ));
                    }
                    self.preferred_collection = Some(ident);
                    Ok(())
                })?;
            }
        } else if path.is_ident("renamer") {
            self.renamer = Some(Self::parse_renamer(&meta)?);
        } else {
            return Err(meta.error("unknown reflect attribute"));
        }
        Ok(())
    }

    fn parse_renamer(meta: &ParseNestedMeta<'_>) -> syn::Result<RenamerAttribute> {
        if meta.input.peek(Token![=]) {
            let path: Path = meta.value()?.parse()?;
            return Ok(RenamerAttribute {
                path,
                dynamic: false,
            });
        }

        let content;
        syn::parenthesized!(content in meta.input);
        let path: Path = content.parse()?;
        let mut dynamic = false;
        if content.parse::<Option<Token![,]>>()?.is_some() && !content.is_empty() {
            let flag: Ident = content.parse()?;
            if flag != "dynamic" {
                return Err(syn::Error::new(flag.span(), "expected `dynamic`"));
            }
            dynamic = true;
        }
        Ok(RenamerAttribute { path, dynamic })
    }
}
