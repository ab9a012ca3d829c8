use alloc::vec::Vec;

use arbor_reflect::DynValue;
use arbor_reflect::info::{FieldFlags, NamedField, PreferredCollection, StructInfo, TypeInfo, Typed};

/// The element type of an entity collection property.
#[derive(Debug, Clone, Copy)]
pub enum CollectionShape {
    /// A rank 1 array.
    Array(&'static TypeInfo),
    List(&'static TypeInfo),
    Set(&'static TypeInfo),
    /// A `DynValue` marked `collection`, decoded as the preferred collection.
    Dynamic(PreferredCollection),
}

impl CollectionShape {
    /// The expected type of every element.
    pub fn item_info(&self) -> &'static TypeInfo {
        match self {
            Self::Array(info) | Self::List(info) | Self::Set(info) => info,
            Self::Dynamic(_) => DynValue::type_info(),
        }
    }

    fn of(field: &'static NamedField, preferred: PreferredCollection) -> Option<Self> {
        match field.type_info() {
            TypeInfo::Array(info) if info.rank() == Some(1) => Some(Self::Array(info.item_info())),
            TypeInfo::List(info) => Some(Self::List(info.item_info())),
            TypeInfo::Set(info) => Some(Self::Set(info.item_info())),
            TypeInfo::Dynamic(_) if field.has_flag(FieldFlags::COLLECTION) => {
                Some(Self::Dynamic(preferred))
            }
            _ => None,
        }
    }
}

/// A public field reached from the entity type, possibly through its base
/// fields.
#[derive(Debug)]
pub struct EntityProperty {
    path: Vec<usize>,
    field: &'static NamedField,
    collection: Option<CollectionShape>,
}

impl EntityProperty {
    /// Field indices from the entity value down to the property.
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub fn field(&self) -> &'static NamedField {
        self.field
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    #[inline]
    pub fn collection(&self) -> Option<CollectionShape> {
        self.collection
    }
}

/// Public properties of an entity type, split into plain and collection
/// properties.
#[derive(Debug)]
pub struct EntityDescriptor {
    properties: Vec<EntityProperty>,
}

impl EntityDescriptor {
    pub(crate) fn new(info: &'static StructInfo) -> Self {
        let mut properties = Vec::new();
        collect(info, &mut Vec::new(), info.preferred_collection(), &mut properties);
        Self { properties }
    }

    pub fn properties(&self) -> &[EntityProperty] {
        &self.properties
    }

    pub fn plain(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter().filter(|p| p.collection.is_none())
    }

    pub fn collections(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter().filter(|p| p.collection.is_some())
    }
}

// Own fields first, then the base's.
fn collect(
    info: &'static StructInfo,
    prefix: &mut Vec<usize>,
    preferred: PreferredCollection,
    out: &mut Vec<EntityProperty>,
) {
    for field in info.fields() {
        if !field.has_flag(FieldFlags::PUBLIC)
            || field.has_flag(FieldFlags::BASE)
            || field.has_flag(FieldFlags::UNSERIALIZABLE)
        {
            continue;
        }
        let mut path = prefix.clone();
        path.push(field.index());
        out.push(EntityProperty {
            path,
            field,
            collection: CollectionShape::of(field, preferred),
        });
    }

    if let Some(base) = info.base_field()
        && let TypeInfo::Struct(base_info) = base.type_info()
    {
        prefix.push(base.index());
        collect(base_info, prefix, preferred, out);
        prefix.pop();
    }
}
