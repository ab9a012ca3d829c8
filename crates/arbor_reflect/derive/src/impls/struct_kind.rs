use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use arbor_macro_utils::full_path::{BoxFP, DefaultFP, OptionFP};

use crate::derive_data::{ReflectStruct, StructField};
use crate::path::{
    field_flags_, named_field_, preferred_collection_, reflect_, renamer_spec_, struct_,
    struct_info_, type_flags_, type_info_,
};
use crate::utils;

/// The `TypeInfo` expression of a struct.
pub(crate) fn struct_type_info(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let path = meta.arbor_reflect_path();
    let attrs = meta.attrs();
    let type_info_ = type_info_(path);
    let struct_info_ = struct_info_(path);

    let fields = info.fields().iter().map(|field| named_field(path, field));

    let mut type_flags = Vec::new();
    if attrs.never_serialize {
        type_flags.push("NEVER_SERIALIZE");
    }
    if attrs.explicit_only {
        type_flags.push("EXPLICIT_ONLY");
    }
    if attrs.entity {
        type_flags.push("ENTITY");
    }
    if attrs.proxy.is_some() {
        type_flags.push("PROXY");
    }
    let with_flags = with_flags(&type_flags_(path), &type_flags);

    let with_renamer = match &attrs.renamer {
        Some(renamer) => {
            let renamer_spec_ = renamer_spec_(path);
            let renamer_path = &renamer.path;
            let dynamic = renamer.dynamic;
            quote!(.with_renamer(#renamer_spec_::new::<#renamer_path>(#dynamic)))
        }
        None => utils::empty(),
    };

    let with_default = if attrs.default.is_some() {
        quote!(.with_default(|| #BoxFP::new(<Self as #DefaultFP>::default())))
    } else {
        utils::empty()
    };

    let with_collection = match &attrs.preferred_collection {
        Some(collection) => {
            let preferred_collection_ = preferred_collection_(path);
            quote!(.with_preferred_collection(#preferred_collection_::#collection))
        }
        None => utils::empty(),
    };

    quote! {
        #type_info_::Struct(
            #struct_info_::new::<Self>(&[#(#fields),*])
                #with_flags
                #with_renamer
                #with_default
                #with_collection
        )
    }
}

fn named_field(path: &syn::Path, field: &StructField) -> TokenStream {
    let named_field_ = named_field_(path);
    let name = field.name();
    let index = field.index;
    let attrs = &field.attrs;

    let mut flags = Vec::new();
    if attrs.never_serialize {
        flags.push("NEVER_SERIALIZE");
    }
    if attrs.always_serialize {
        flags.push("ALWAYS_SERIALIZE");
    }
    if attrs.base {
        flags.push("BASE");
    }
    if attrs.collection {
        flags.push("COLLECTION");
    }
    if field.is_public() {
        flags.push("PUBLIC");
    }
    let with_flags = with_flags(&field_flags_(path), &flags);

    let with_rename = match &attrs.rename {
        Some(rename) => quote!(.with_rename(#rename)),
        None => utils::empty(),
    };
    let with_element_name = match &attrs.element_name {
        Some(element_name) => quote!(.with_element_name(#element_name)),
        None => utils::empty(),
    };

    let constructor = if field.unserializable {
        quote!(#named_field_::unserializable(#name, #index))
    } else {
        let ty = &field.data.ty;
        quote!(#named_field_::new::<#ty>(#name, #index))
    };

    quote!(#constructor #with_flags #with_rename #with_element_name)
}

/// `.with_flags(A | B)`, or nothing when `names` is empty.
fn with_flags(flags_: &TokenStream, names: &[&str]) -> TokenStream {
    if names.is_empty() {
        return utils::empty();
    }
    let names = names.iter().map(|name| Ident::new(name, Span::call_site()));
    quote!(.with_flags(#(#flags_::#names)|*))
}

/// The `Struct` impl.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let path = meta.arbor_reflect_path();
    let struct_ = struct_(path);
    let reflect_ = reflect_(path);
    let ident = meta.ident();
    let field_len = info.fields().len();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(false);

    let accessors = info.accessors();
    let by_name = &accessors.by_name;
    let by_name_mut = &accessors.by_name_mut;
    let by_index = &accessors.by_index;
    let by_index_mut = &accessors.by_index_mut;

    quote! {
        impl #impl_generics #struct_ for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #OptionFP<&dyn #reflect_> {
                match name {
                    #(#by_name,)*
                    _ => #OptionFP::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #OptionFP<&mut dyn #reflect_> {
                match name {
                    #(#by_name_mut,)*
                    _ => #OptionFP::None,
                }
            }

            fn field_at(&self, index: usize) -> #OptionFP<&dyn #reflect_> {
                match index {
                    #(#by_index,)*
                    _ => #OptionFP::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> #OptionFP<&mut dyn #reflect_> {
                match index {
                    #(#by_index_mut,)*
                    _ => #OptionFP::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}
