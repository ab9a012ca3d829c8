//! Fully qualified paths of `core`/`alloc` items for generated code.
//!
//! Generated code must not depend on what the caller has in scope, so every
//! std item it names goes through one of these.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

macro_rules! full_path {
    ($($(#[$meta:meta])* $name:ident => $path:path;)*) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name;

        impl ToTokens for $name {
            fn to_tokens(&self, tokens: &mut TokenStream) {
                quote!($path).to_tokens(tokens);
            }
        }
    )*};
}

full_path! {
    /// `::core::any::Any`
    AnyFP => ::core::any::Any;
    /// `::core::any::TypeId`
    TypeIdFP => ::core::any::TypeId;
    /// `::core::option::Option`
    OptionFP => ::core::option::Option;
    /// `::core::result::Result`
    ResultFP => ::core::result::Result;
    /// `::core::default::Default`
    DefaultFP => ::core::default::Default;
    /// `::core::marker::Send`
    SendFP => ::core::marker::Send;
    /// `::core::marker::Sync`
    SyncFP => ::core::marker::Sync;
    /// `::std::boxed::Box`
    BoxFP => ::std::boxed::Box;
}
