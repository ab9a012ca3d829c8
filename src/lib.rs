#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

extern crate alloc;

mod error;
mod io;

// -----------------------------------------------------------------------------
// Exports

pub use arbor_codec as codec;
pub use arbor_reflect as reflect;
pub use arbor_tree as tree;
pub use arbor_utils as utils;

pub use error::Error;
pub use io::{from_file, from_str, from_str_with, to_file, to_string, to_string_with};
