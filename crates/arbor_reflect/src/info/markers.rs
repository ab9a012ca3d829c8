//! Marker tags attached to types and fields by `#[derive(Reflect)]`.

use alloc::boxed::Box;
use alloc::string::String;

use crate::info::NamedField;

bitflags::bitflags! {
    /// Field level markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// `#[reflect(never_serialize)]`: the codec drops the field.
        const NEVER_SERIALIZE = 1 << 0;
        /// `#[reflect(always_serialize)]`: kept in explicit-only types.
        const ALWAYS_SERIALIZE = 1 << 1;
        /// `#[reflect(base)]`: the field holds the "base class" part of the value.
        const BASE = 1 << 2;
        /// Pointer or function typed field, never reachable through reflection.
        const UNSERIALIZABLE = 1 << 3;
        /// The field is `pub`.
        const PUBLIC = 1 << 4;
        /// `#[reflect(collection)]`: a dynamic field that holds a collection.
        const COLLECTION = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Type level markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// `#[reflect(never_serialize)]`: no field of the type is written.
        const NEVER_SERIALIZE = 1 << 0;
        /// `#[reflect(explicit_only)]`: only `always_serialize` fields are written.
        const EXPLICIT_ONLY = 1 << 1;
        /// `#[reflect(entity)]`: use public-field entity traversal.
        const ENTITY = 1 << 2;
        /// `#[reflect(proxy)]`: the type stands in for its base field's type.
        const PROXY = 1 << 3;
    }
}

// -----------------------------------------------------------------------------
// Renaming

/// Maps a declared field name to the name written to the tree.
///
/// Attach one to a type with `#[reflect(renamer = MyRenamer)]`, or install
/// one for a whole codec scope.
///
/// # Examples
///
/// ```
/// use arbor_reflect::info::{FieldRenamer, NamedField};
///
/// #[derive(Default)]
/// struct Upper;
///
/// impl FieldRenamer for Upper {
///     fn convert_field_name(&self, name: &str, _field: &NamedField) -> String {
///         name.to_uppercase()
///     }
/// }
///
/// let field = NamedField::new::<u8>("id", 0);
/// assert_eq!(Upper.convert_field_name("id", &field), "ID");
/// ```
pub trait FieldRenamer: Send + Sync {
    fn convert_field_name(&self, name: &str, field: &NamedField) -> String;
}

/// How a type creates its [`FieldRenamer`].
///
/// A static renamer is consulted once when field metadata is built and then
/// dropped. A dynamic renamer is kept and consulted on every lookup.
#[derive(Clone, Copy)]
pub struct RenamerSpec {
    create: fn() -> Box<dyn FieldRenamer>,
    dynamic: bool,
}

impl RenamerSpec {
    pub fn new<R: FieldRenamer + Default + 'static>(dynamic: bool) -> Self {
        Self {
            create: || Box::new(R::default()),
            dynamic,
        }
    }

    #[inline]
    pub fn create(&self) -> Box<dyn FieldRenamer> {
        (self.create)()
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

impl core::fmt::Debug for RenamerSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenamerSpec")
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Entity collections

/// The collection built for an entity collection field declared as a
/// dynamic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferredCollection {
    #[default]
    Vec,
    VecDeque,
    LinkedList,
}
