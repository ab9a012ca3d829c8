//! Items referenced by code that `#[codec_methods]` generates.
//!
//! Not public API.

pub use alloc::boxed::Box;
pub use core::any::TypeId;

pub use arbor_reflect::Reflect;
pub use arbor_tree::TreeNode;
pub use inventory;

pub use crate::decoder::{Decoder, WorkingObject};
pub use crate::encoder::Encoder;
pub use crate::error::{DecodeError, EncodeError};
pub use crate::metadata::{ImplicitMember, MemberKind, SurrogateOutcome};
