#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

mod display;
mod node;

// -----------------------------------------------------------------------------
// Exports

pub use node::{Attribute, TreeNode};
