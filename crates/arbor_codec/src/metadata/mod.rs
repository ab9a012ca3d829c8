//! Per-type codec metadata.
//!
//! A [`TypeDescriptor`] is built from a type's [`TypeInfo`] the first time
//! the codec meets the type and lives until the process exits. It resolves
//! the type's markers once:
//!
//! - which fields are written, and under which name ([`FieldDescriptor`]);
//! - the base field and its descriptor;
//! - the codec methods declared with `#[codec_methods]` ([`ImplicitMembers`]);
//! - the public property layout of entity types ([`EntityDescriptor`]).
//!
//! Errors in the markers are [`ConfigError`]s. They are cached with the
//! type and reported on every use.

// -----------------------------------------------------------------------------
// Modules

mod entity;
mod implicit;

// -----------------------------------------------------------------------------
// Exports

pub use entity::{CollectionShape, EntityDescriptor, EntityProperty};
pub use implicit::{ConstructFn, DeserializeFn, ImplicitMember, ImplicitMembers, MemberKind};
pub use implicit::{SerializeFn, SurrogateOutcome};

// -----------------------------------------------------------------------------
// TypeDescriptor

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use arbor_reflect::info::{FieldFlags, FieldRenamer, NamedField, StructInfo, TypeFlags, TypeInfo};
use arbor_utils::TypeIdMap;
use log::debug;

use crate::context::{ContextFlags, SerializationContext};
use crate::error::ConfigError;
use crate::renamer::{fix_m_prefix, fix_member_name};

/// A field the codec writes.
pub struct FieldDescriptor {
    field: &'static NamedField,
    serialized_name: Box<str>,
    renamer: Option<Arc<dyn FieldRenamer>>,
}

impl FieldDescriptor {
    fn new(field: &'static NamedField, renamer: Option<&TypeRenamer>) -> Self {
        let (serialized_name, dynamic) = match (field.rename(), renamer) {
            (Some(rename), _) => (rename.into(), None),
            (None, Some(TypeRenamer::Static(renamer))) => {
                (renamer.convert_field_name(field.name(), field).into(), None)
            }
            (None, Some(TypeRenamer::Dynamic(renamer))) => {
                (field.name().into(), Some(renamer.clone()))
            }
            (None, None) => (field.name().into(), None),
        };
        Self {
            field,
            serialized_name,
            renamer: dynamic,
        }
    }

    #[inline]
    pub fn field(&self) -> &'static NamedField {
        self.field
    }

    /// The declared name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.field.index()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.field.type_info()
    }

    /// The name after the rename marker and a static type renamer.
    #[inline]
    pub fn serialized_name(&self) -> &str {
        &self.serialized_name
    }

    /// The element name in `ctx`.
    ///
    /// Applies, in order, a dynamic type renamer, the context renamer and
    /// the `m_` prefix rule. Empty names become `_`.
    pub fn name_in(&self, ctx: &SerializationContext) -> String {
        let mut name: Cow<'_, str> = match &self.renamer {
            Some(renamer) => renamer.convert_field_name(&self.serialized_name, self.field).into(),
            None => Cow::Borrowed(&self.serialized_name),
        };
        if let Some(renamer) = ctx.renamer() {
            name = renamer.convert_field_name(&name, self.field).into();
        }
        if ctx.flag(ContextFlags::FIX_M_PREFIX)
            && let Some(fixed) = fix_m_prefix(&name)
        {
            name = fixed.into();
        }
        fix_member_name(name.into_owned())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.field.name())
            .field("serialized_name", &self.serialized_name)
            .field("dynamic_renamer", &self.renamer.is_some())
            .finish()
    }
}

enum TypeRenamer {
    Static(Box<dyn FieldRenamer>),
    Dynamic(Arc<dyn FieldRenamer>),
}

/// The base part of a struct.
#[derive(Debug, Clone, Copy)]
pub struct BaseDescriptor {
    pub field: &'static NamedField,
    pub descriptor: &'static TypeDescriptor,
}

/// Codec metadata of one type.
pub struct TypeDescriptor {
    info: &'static TypeInfo,
    fields: Vec<FieldDescriptor>,
    base: Option<BaseDescriptor>,
    implicit: ImplicitMembers,
    entity: Option<EntityDescriptor>,
}

type Slot = OnceLock<Result<&'static TypeDescriptor, ConfigError>>;

/// One slot per type. The map lock is held only to find or add a slot;
/// building happens in the slot, so a type is built once and a base type
/// can build its own descriptor meanwhile.
type Cache = TypeIdMap<&'static Slot>;

static CACHE: RwLock<Cache> = RwLock::new(TypeIdMap::new());

impl TypeDescriptor {
    /// Returns the cached descriptor of `info`, building it on first use.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_codec::metadata::TypeDescriptor;
    /// use arbor_reflect::{derive::Reflect, info::Typed};
    ///
    /// #[derive(Reflect, Default)]
    /// struct Leaf {
    ///     #[reflect(rename = "W")]
    ///     weight: f32,
    ///     #[reflect(never_serialize)]
    ///     cache: u64,
    /// }
    ///
    /// let descriptor = TypeDescriptor::of(Leaf::type_info()).unwrap();
    /// let names: Vec<_> = descriptor.fields().iter().map(|f| f.serialized_name()).collect();
    /// assert_eq!(names, ["W"]);
    /// ```
    pub fn of(info: &'static TypeInfo) -> Result<&'static TypeDescriptor, ConfigError> {
        let type_id = info.ty_id();
        let cached = CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        let slot = match cached {
            Some(slot) => slot,
            None => *CACHE
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert(type_id, || &*Box::leak(Box::new(Slot::new()))),
        };

        slot.get_or_init(|| Self::build(info).map(|d| &*Box::leak(Box::new(d))))
            .clone()
    }

    fn build(info: &'static TypeInfo) -> Result<TypeDescriptor, ConfigError> {
        let implicit = ImplicitMembers::collect(info.ty_id(), info.type_path())?;

        let mut descriptor = TypeDescriptor {
            info,
            fields: Vec::new(),
            base: None,
            implicit,
            entity: None,
        };

        if let TypeInfo::Struct(struct_info) = info {
            descriptor.build_struct(struct_info)?;
        }

        debug!(
            "built codec descriptor of `{}`: {} field(s), base: {}, codec methods: {:?}",
            info.type_path(),
            descriptor.fields.len(),
            descriptor.base.is_some(),
            descriptor.implicit,
        );
        Ok(descriptor)
    }

    fn build_struct(&mut self, info: &'static StructInfo) -> Result<(), ConfigError> {
        if info.has_flag(TypeFlags::ENTITY) {
            self.entity = Some(EntityDescriptor::new(info));
        }
        if info.has_flag(TypeFlags::NEVER_SERIALIZE) {
            return Ok(());
        }

        if let Some(base) = info.base_field() {
            let base_info = base.type_info();
            if !matches!(base_info, TypeInfo::Struct(_)) {
                return Err(ConfigError::InvalidBase {
                    type_path: info.type_path(),
                    field: base.name(),
                    kind: base_info.kind(),
                });
            }
            self.base = Some(BaseDescriptor {
                field: base,
                descriptor: TypeDescriptor::of(base_info)?,
            });
        }

        if info.has_flag(TypeFlags::PROXY) {
            return Ok(());
        }

        let renamer = info.renamer().map(|spec| match spec.is_dynamic() {
            true => TypeRenamer::Dynamic(Arc::from(spec.create())),
            false => TypeRenamer::Static(spec.create()),
        });
        let explicit_only = info.has_flag(TypeFlags::EXPLICIT_ONLY);

        self.fields = info
            .fields()
            .iter()
            .filter(|field| {
                !field.has_flag(FieldFlags::UNSERIALIZABLE)
                    && !field.has_flag(FieldFlags::BASE)
                    && !field.has_flag(FieldFlags::NEVER_SERIALIZE)
                    && (!explicit_only || field.has_flag(FieldFlags::ALWAYS_SERIALIZE))
            })
            .map(|field| FieldDescriptor::new(field, renamer.as_ref()))
            .collect();
        Ok(())
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Written fields of the type itself, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn base(&self) -> Option<&BaseDescriptor> {
        self.base.as_ref()
    }

    #[inline]
    pub fn implicit(&self) -> &ImplicitMembers {
        &self.implicit
    }

    /// Present for `#[reflect(entity)]` types.
    #[inline]
    pub fn entity(&self) -> Option<&EntityDescriptor> {
        self.entity.as_ref()
    }

    /// `#[reflect(proxy)]` types stand in for their base.
    pub fn proxied_base(&self) -> Option<&BaseDescriptor> {
        match self.info {
            TypeInfo::Struct(info) if info.has_flag(TypeFlags::PROXY) => self.base.as_ref(),
            _ => None,
        }
    }

    /// The explicit constructor, then the recorded default.
    pub fn constructor(&self) -> Option<ConstructFn> {
        self.implicit.constructor.or_else(|| self.info.default_fn())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_path", &self.info.type_path())
            .field("fields", &self.fields)
            .field("base", &self.base.map(|b| b.field.name()))
            .field("implicit", &self.implicit)
            .field("entity", &self.entity.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use arbor_reflect::derive::Reflect;
    use arbor_reflect::info::{FieldRenamer, NamedField, Typed};

    use super::TypeDescriptor;
    use crate::context::{ContextFlags, SerializationContext};
    use crate::error::ConfigError;
    use crate::renamer::ProtobufRenamer;

    #[derive(Reflect, Default)]
    #[reflect(default, explicit_only)]
    struct Explicit {
        #[reflect(always_serialize)]
        kept: u8,
        dropped: u8,
    }

    #[derive(Reflect, Default)]
    #[reflect(default, renamer = ProtobufRenamer)]
    struct Message {
        name_: String,
        #[reflect(rename = "Id")]
        id_: u32,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Parent {
        m_height: u32,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    #[allow(non_snake_case)]
    struct Child {
        #[reflect(base)]
        parent: Parent,
        m_Age: u32,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct BadBase {
        #[reflect(base)]
        parent: u32,
    }

    static RENAMERS_CREATED: AtomicUsize = AtomicUsize::new(0);

    struct Counting;

    impl Default for Counting {
        fn default() -> Self {
            RENAMERS_CREATED.fetch_add(1, Ordering::Relaxed);
            Self
        }
    }

    impl FieldRenamer for Counting {
        fn convert_field_name(&self, name: &str, _field: &NamedField) -> String {
            name.to_uppercase()
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(default, renamer = Counting)]
    struct Contended {
        depth: u8,
    }

    #[test]
    fn explicit_only_keeps_marked_fields() {
        let descriptor = TypeDescriptor::of(Explicit::type_info()).unwrap();
        let names: Vec<_> = descriptor.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["kept"]);
    }

    #[test]
    fn static_renamer_and_rename_marker() {
        let descriptor = TypeDescriptor::of(Message::type_info()).unwrap();
        let names: Vec<_> = descriptor
            .fields()
            .iter()
            .map(|f| f.serialized_name())
            .collect();
        assert_eq!(names, ["Name", "Id"]);
    }

    #[test]
    fn base_chain_and_m_prefix() {
        let descriptor = TypeDescriptor::of(Child::type_info()).unwrap();
        let base = descriptor.base().unwrap();
        assert_eq!(base.field.name(), "parent");

        let mut ctx = SerializationContext::new();
        ctx.set_flag(ContextFlags::FIX_M_PREFIX, true);
        let height = &base.descriptor.fields()[0];
        assert_eq!(height.name_in(&ctx), "Height");
        // Third character is uppercase.
        assert_eq!(descriptor.fields()[0].name_in(&ctx), "m_Age");

        ctx.set_flag(ContextFlags::FIX_M_PREFIX, false);
        assert_eq!(height.name_in(&ctx), "m_height");
    }

    #[test]
    fn non_struct_base_is_rejected() {
        let err = TypeDescriptor::of(BadBase::type_info()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBase { field: "parent", .. }));
        // Cached and reported again.
        assert_eq!(TypeDescriptor::of(BadBase::type_info()).unwrap_err(), err);
    }

    #[test]
    fn concurrent_lookups_build_once() {
        let descriptors: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let descriptor = TypeDescriptor::of(Contended::type_info()).unwrap();
                        core::ptr::from_ref(descriptor) as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(descriptors.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(RENAMERS_CREATED.load(Ordering::Relaxed), 1);
        let descriptor = TypeDescriptor::of(Contended::type_info()).unwrap();
        assert_eq!(descriptor.fields()[0].serialized_name(), "DEPTH");
    }
}
