#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

//! Attribute macro for [`arbor_codec`].
//!
//! [`arbor_codec`]: https://docs.rs/arbor_codec

// -----------------------------------------------------------------------------
// Modules

mod member;

// -----------------------------------------------------------------------------
// Macros

use proc_macro::TokenStream;
use syn::{ItemImpl, parse_macro_input};

/// Registers the codec methods of an inherent `impl` block.
///
/// Methods are marked with one of:
///
/// - `#[serializer]`: `&self`, a `&mut TreeNode` and optionally a
///   `&mut Encoder`, in any order.
/// - `#[deserializer]`: no receiver, a `&mut WorkingObject`, a `&TreeNode`
///   and optionally a `&mut Decoder`.
/// - `#[constructor]`: no receiver and no parameters, returns `Self`.
///
/// Serializers and deserializers return `()`, `bool`, `Result<(), E>` or
/// `Result<bool, E>`; `false` hands the value on to the default walk. A
/// marked method with another signature does not fail to compile: the type
/// reports a `ConfigError` the first time it is encoded or decoded.
///
/// The `impl` block must not be generic.
///
/// # Example
///
/// ```ignore
/// #[codec_methods]
/// impl Color {
///     #[serializer]
///     fn write(&self, node: &mut TreeNode) {
///         node.set_text(self.to_hex());
///     }
///
///     #[deserializer]
///     fn read(working: &mut WorkingObject<'_>, node: &TreeNode) -> Result<(), DecodeError> {
///         working.set(Box::new(Color::from_hex(node.text().unwrap_or_default())?))
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn codec_methods(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        let args = proc_macro2::TokenStream::from(args);
        return syn::Error::new_spanned(args, "`codec_methods` takes no arguments")
            .into_compile_error()
            .into();
    }

    let mut item = parse_macro_input!(input as ItemImpl);
    match member::expand(&mut item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
