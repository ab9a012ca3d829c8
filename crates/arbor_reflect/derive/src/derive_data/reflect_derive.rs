use syn::spanned::Spanned;
use syn::{Data, DeriveInput};

use arbor_macro_utils::Manifest;

use crate::derive_data::{ReflectEnum, ReflectMeta, ReflectStruct, TypeAttributes};

/// The kinds of items `#[derive(Reflect)]` accepts.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let arbor_reflect_path = Manifest::shared(|m| m.get_crate_path("arbor_reflect"));
        let meta = ReflectMeta::new(arbor_reflect_path, attrs, &input.ident, &input.generics);

        match &input.data {
            Data::Struct(data) => {
                ReflectStruct::new(meta, &data.fields, input.ident.span()).map(Self::Struct)
            }
            Data::Enum(data) => {
                if meta.attrs().entity || meta.attrs().proxy.is_some() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`entity` and `proxy` only apply to structs",
                    ));
                }
                ReflectEnum::new(meta, &data.variants, input.ident.span()).map(Self::Enum)
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span(),
                "Reflect can not be derived for unions",
            )),
        }
    }

    pub fn meta(&self) -> &ReflectMeta<'a> {
        match self {
            Self::Struct(data) => data.meta(),
            Self::Enum(data) => data.meta(),
        }
    }
}
