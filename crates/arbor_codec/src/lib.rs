#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Extern Self

// `#[codec_methods]` expands to paths under `arbor_codec`, including in
// this crate's own tests.
extern crate self as arbor_codec;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod entity;
mod strings;

pub mod context;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metadata;
pub mod renamer;
pub mod surrogate;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use arbor_codec_derive::codec_methods;
pub use decoder::{Decoder, WorkingObject};
pub use encoder::Encoder;
pub use surrogate::Surrogate;
