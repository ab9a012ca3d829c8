#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

//! Derive macro for [`arbor_reflect`].
//!
//! [`arbor_reflect`]: https://docs.rs/arbor_reflect

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

pub(crate) const REFLECT_ATTRIBUTE_NAME: &str = "reflect";

/// Implements `TypePath`, `Typed`, `Reflect`, `GetTypeMeta` and the kind
/// trait (`Struct` or `Enum`) for a type.
///
/// Accepted inputs are structs with named fields, unit structs, and enums
/// whose variants are all unit variants.
///
/// # Type attributes
///
/// - `#[reflect(default)]`: the type implements `Default`. The default is
///   recorded in the type info and as a `TypeTraitDefault`.
/// - `#[reflect(auto_register)]`: submit the type to
///   `TypeRegistry::auto_register`. Ignored for generic types.
/// - `#[reflect(type_path = "path::to::Name")]`: replace the module path
///   and identifier.
/// - `#[reflect(never_serialize)]`: the codec writes no field of the type.
/// - `#[reflect(explicit_only)]`: only `always_serialize` fields are written.
/// - `#[reflect(entity)]` or `#[reflect(entity(collection = VecDeque))]`:
///   public-field traversal, with the collection built for dynamic
///   collection fields.
/// - `#[reflect(proxy)]`: the type stands in for its `base` field's type.
/// - `#[reflect(renamer = R)]` or `#[reflect(renamer(R, dynamic))]`: rename
///   fields with `R: FieldRenamer + Default`.
///
/// # Field attributes
///
/// - `never_serialize`, `always_serialize`
/// - `base`: at most one per struct.
/// - `collection`: a dynamic field holding an entity collection.
/// - `rename = "name"` and `element_name = "name"`
///
/// Fields of pointer, reference or function type are recorded as
/// unserializable and are not reachable through `Struct`.
///
/// # Example
///
/// ```ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default, auto_register)]
/// pub struct Leaf {
///     pub weight: f32,
///     #[reflect(rename = "Label")]
///     name: String,
///     #[reflect(never_serialize)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(data) => impls::match_reflect_impls(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
