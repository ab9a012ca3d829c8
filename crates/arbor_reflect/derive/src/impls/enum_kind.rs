use proc_macro2::TokenStream;
use quote::quote;

use arbor_macro_utils::full_path::{BoxFP, DefaultFP, OptionFP};

use crate::derive_data::ReflectEnum;
use crate::path::{enum_, enum_info_, reflect_, type_info_};
use crate::utils;

/// The `TypeInfo` expression of a unit enum.
pub(crate) fn enum_type_info(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let path = meta.arbor_reflect_path();
    let type_info_ = type_info_(path);
    let enum_info_ = enum_info_(path);
    let reflect_ = reflect_(path);
    let names = info.variant_names();
    let variants = info.variants();
    let some = OptionFP;
    let boxed = BoxFP;

    let with_default = if meta.attrs().default.is_some() {
        quote!(.with_default(|| #BoxFP::new(<Self as #DefaultFP>::default())))
    } else {
        utils::empty()
    };

    quote! {
        #type_info_::Enum(
            #enum_info_::new::<Self>(
                &[#(#names),*],
                |name| match name {
                    #(#names => #some::Some(#boxed::new(Self::#variants) as #boxed<dyn #reflect_>),)*
                    _ => #OptionFP::None,
                },
            )
            #with_default
        )
    }
}

/// The `Enum` impl.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let enum_ = enum_(meta.arbor_reflect_path());
    let ident = meta.ident();
    let names = info.variant_names();
    let variants = info.variants();
    let indices = 0..variants.len();

    quote! {
        impl #enum_ for #ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#variants => #indices,)*
                }
            }
        }
    }
}
