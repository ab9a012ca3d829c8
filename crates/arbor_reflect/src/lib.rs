#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `arbor_reflect`, including inside the
// crate itself and its doctests.
extern crate self as arbor_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use arbor_reflect_derive as derive;
pub use impls::{DynValue, NdArray, Shared};
pub use reflection::Reflect;
