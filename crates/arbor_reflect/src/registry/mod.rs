//! Type registry for lookups by id, path or name.
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: creates a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`] plus its `TypeTrait` table.
//! - [`GetTypeMeta`]: creates the `TypeMeta` of a type and registers the
//!   types it depends on.
//! - [`TypeRegistry`]: the container.
//! - [`TypeTraitDefault`]: the public default constructor of a type.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types deriving `Reflect` with
//! `#[reflect(auto_register)]` are collected through [`inventory`] and
//! added by [`TypeRegistry::auto_register`].
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{TypeTrait, TypeTraitDefault};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
