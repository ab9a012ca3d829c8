use alloc::boxed::Box;

use arbor_utils::hash::HashMap;

use crate::Reflect;
use crate::info::{FieldFlags, NamedField, PreferredCollection, RenamerSpec, Type, TypeFlags, TypePath};

/// Information about a struct with named fields.
///
/// Built by `#[derive(Reflect)]`, together with the type and field markers.
///
/// # Examples
///
/// ```
/// use arbor_reflect::{derive::Reflect, info::{FieldFlags, Typed}};
///
/// #[derive(Reflect)]
/// struct Point {
///     pub x: i32,
///     #[reflect(rename = "Y")]
///     y: i32,
/// }
///
/// let info = Point::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert!(info.field("x").unwrap().has_flag(FieldFlags::PUBLIC));
/// assert_eq!(info.field_at(1).unwrap().rename(), Some("Y"));
/// ```
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    field_indices: HashMap<&'static str, usize>,
    flags: TypeFlags,
    base: Option<usize>,
    renamer: Option<RenamerSpec>,
    default: Option<fn() -> Box<dyn Reflect>>,
    preferred_collection: PreferredCollection,
}

impl StructInfo {
    pub fn new<T: TypePath>(fields: &[NamedField]) -> Self {
        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect();
        let base = fields.iter().position(|f| f.has_flag(FieldFlags::BASE));

        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
            field_indices,
            flags: TypeFlags::empty(),
            base,
            renamer: None,
            default: None,
            preferred_collection: PreferredCollection::Vec,
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn with_renamer(mut self, renamer: RenamerSpec) -> Self {
        self.renamer = Some(renamer);
        self
    }

    #[inline]
    pub fn with_default(mut self, default: fn() -> Box<dyn Reflect>) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn with_preferred_collection(mut self, preferred: PreferredCollection) -> Self {
        self.preferred_collection = preferred;
        self
    }

    crate::info::impl_type_fn!(ty);

    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.field_indices.get(name).map(|&index| &self.fields[index])
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn has_flag(&self, flag: TypeFlags) -> bool {
        self.flags.contains(flag)
    }

    /// The field marked `#[reflect(base)]`, if any.
    #[inline]
    pub fn base_field(&self) -> Option<&NamedField> {
        self.base.map(|index| &self.fields[index])
    }

    #[inline]
    pub fn renamer(&self) -> Option<&RenamerSpec> {
        self.renamer.as_ref()
    }

    #[inline]
    pub fn default_fn(&self) -> Option<fn() -> Box<dyn Reflect>> {
        self.default
    }

    #[inline]
    pub fn preferred_collection(&self) -> PreferredCollection {
        self.preferred_collection
    }
}
