use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Field level `#[reflect(...)]` attributes.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub never_serialize: bool,
    pub always_serialize: bool,
    pub base: bool,
    pub collection: bool,
    pub rename: Option<LitStr>,
    pub element_name: Option<LitStr>,
}

impl FieldAttributes {
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
        if path.is_ident("never_serialize") {
            self.never_serialize = true;
        } else if path.is_ident("always_serialize") {
            self.always_serialize = true;
        } else if path.is_ident("base") {
            self.base = true;
        } else if path.is_ident("collection") {
            self.collection = true;
        } else if path.is_ident("rename") {
            self.rename = Some(meta.value()?.parse()?);
        } else if path.is_ident("element_name") {
            self.element_name = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unknown reflect field attribute"));
        }
        Ok(())
    }
}
