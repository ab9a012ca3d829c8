use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Field, Fields, Ident, LitStr, Type, TypeParamBound, Visibility};

use arbor_macro_utils::full_path::OptionFP;

use crate::derive_data::{FieldAttributes, ReflectMeta};
use crate::path::reflect_;

/// A named field of a reflected struct.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// Declaration position.
    pub index: usize,
    /// Pointer, reference or function typed: listed but never reachable.
    pub unserializable: bool,
}

impl StructField<'_> {
    pub fn ident(&self) -> &Ident {
        // Only structs with named fields reach this point.
        self.data.ident.as_ref().unwrap_or_else(|| unreachable!())
    }

    /// The declared name without the `r#` prefix.
    pub fn name(&self) -> LitStr {
        let ident = self.ident();
        LitStr::new(&ident.unraw().to_string(), ident.span())
    }

    pub fn is_public(&self) -> bool {
        matches!(self.data.vis, Visibility::Public(_))
    }
}

/// A struct with named fields, or a unit struct.
pub(crate) struct ReflectStruct<'a> {
    meta: ReflectMeta<'a>,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(mut meta: ReflectMeta<'a>, fields: &'a Fields, span: Span) -> syn::Result<Self> {
        let named = match fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new(
                    span,
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        };

        let mut res = Vec::with_capacity(named.len());
        let mut base_seen = false;
        for (index, data) in named.into_iter().enumerate() {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
            if attrs.base {
                if base_seen {
                    return Err(syn::Error::new_spanned(
                        data,
                        "only one field can be marked `#[reflect(base)]`",
                    ));
                }
                base_seen = true;
            }
            let unserializable = is_unserializable(&data.ty);
            if !unserializable {
                meta.push_active_type(&data.ty);
            }
            res.push(StructField {
                data,
                attrs,
                index,
                unserializable,
            });
        }

        if let Some(span) = meta.attrs().proxy
            && !base_seen
        {
            return Err(syn::Error::new(
                span,
                "a `proxy` type needs a `#[reflect(base)]` field",
            ));
        }

        Ok(Self { meta, fields: res })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }

    /// Fields reachable through the `Struct` accessors.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| !field.unserializable)
    }

    /// Match arms for the `Struct` accessors.
    pub fn accessors(&self) -> FieldAccessors {
        let reflect_ = reflect_(self.meta.arbor_reflect_path());
        let mut res = FieldAccessors::default();
        for field in self.active_fields() {
            let ident = field.ident();
            let name = field.name();
            let index = field.index;
            res.by_name
                .push(quote!(#name => #OptionFP::Some(&self.#ident as &dyn #reflect_)));
            res.by_name_mut
                .push(quote!(#name => #OptionFP::Some(&mut self.#ident as &mut dyn #reflect_)));
            res.by_index
                .push(quote!(#index => #OptionFP::Some(&self.#ident as &dyn #reflect_)));
            res.by_index_mut
                .push(quote!(#index => #OptionFP::Some(&mut self.#ident as &mut dyn #reflect_)));
        }
        res
    }
}

/// Match arms of the four `Struct` accessors.
#[derive(Default)]
pub(crate) struct FieldAccessors {
    pub by_name: Vec<TokenStream>,
    pub by_name_mut: Vec<TokenStream>,
    pub by_index: Vec<TokenStream>,
    pub by_index_mut: Vec<TokenStream>,
}

/// Raw pointers, references, function pointers and closures (anywhere in
/// the type) can not take part in serialization.
fn is_unserializable(ty: &Type) -> bool {
    match ty {
        Type::Ptr(_) | Type::Reference(_) | Type::BareFn(_) => true,
        Type::TraitObject(obj) => obj.bounds.iter().any(is_fn_bound),
        Type::ImplTrait(_) => true,
        Type::Paren(inner) => is_unserializable(&inner.elem),
        Type::Group(inner) => is_unserializable(&inner.elem),
        Type::Array(inner) => is_unserializable(&inner.elem),
        Type::Slice(inner) => is_unserializable(&inner.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(is_unserializable),
        Type::Path(path) => path.path.segments.iter().any(|segment| {
            let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
                return false;
            };
            args.args.iter().any(|arg| match arg {
                syn::GenericArgument::Type(ty) => is_unserializable(ty),
                _ => false,
            })
        }),
        _ => false,
    }
}

fn is_fn_bound(bound: &TypeParamBound) -> bool {
    let TypeParamBound::Trait(bound) = bound else {
        return false;
    };
    bound
        .path
        .segments
        .last()
        .is_some_and(|segment| ["Fn", "FnMut", "FnOnce"].iter().any(|name| segment.ident == name))
}

#[cfg(test)]
mod tests {
    use super::is_unserializable;
    use syn::parse_quote;

    #[test]
    fn pointer_like_types() {
        assert!(is_unserializable(&parse_quote!(*const u8)));
        assert!(is_unserializable(&parse_quote!(fn(u8) -> u8)));
        assert!(is_unserializable(&parse_quote!(Box<dyn Fn() + Send + Sync>)));
        assert!(is_unserializable(&parse_quote!(Option<fn()>)));
        assert!(is_unserializable(&parse_quote!(std::sync::Arc<dyn FnMut(&str) -> bool>)));
        assert!(is_unserializable(&parse_quote!(Rc<dyn Send + FnOnce()>)));
        assert!(is_unserializable(&parse_quote!(Vec<(u8, Box<dyn Fn()>)>)));
        assert!(!is_unserializable(&parse_quote!(Box<dyn Reflect>)));
        assert!(!is_unserializable(&parse_quote!(Vec<Option<String>>)));
        assert!(!is_unserializable(&parse_quote!(u32)));
    }
}
