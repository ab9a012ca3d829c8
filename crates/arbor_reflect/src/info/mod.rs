//! Static type information.
//!
//! - [`TypePath`] / [`Typed`]: static accessors implemented per type.
//! - [`TypeInfo`]: one info struct per [`ReflectKind`].
//! - [`FieldFlags`], [`TypeFlags`], [`FieldRenamer`]: marker tags resolved
//!   by `#[derive(Reflect)]`.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod build_error;
mod collection_info;
mod enum_info;
mod field_info;
mod kind;
mod markers;
mod scalar_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;
mod wrapper_info;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::{ArrayBuildFn, ArrayInfo};
pub use build_error::BuildError;
pub use collection_info::{FromEntriesFn, FromItemsFn, ListInfo, MapInfo, SetInfo};
pub use enum_info::EnumInfo;
pub use field_info::{NamedField, Unserializable};
pub use kind::{ReflectKind, ReflectKindError};
pub use markers::{FieldFlags, FieldRenamer, PreferredCollection, RenamerSpec, TypeFlags};
pub use scalar_info::{ParseScalarError, ScalarInfo, StringInfo};
pub use struct_info::StructInfo;
pub use type_info::TypeInfo;
pub use type_path::{DynamicTypePath, Type, TypePath, TypePathTable};
pub use typed::{DynamicTyped, Typed};
pub use wrapper_info::{DynamicInfo, OpaqueInfo, OptionInfo, SharedInfo, WrapFn, WrapperInfo};

pub(crate) use type_path::impl_type_fn;
