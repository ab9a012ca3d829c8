use crate::info::{FieldFlags, OpaqueInfo, Type, TypeInfo, TypePath, Typed};
use crate::impls::NonGenericTypeInfoCell;

/// A named field of a reflected struct.
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    index: usize,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    flags: FieldFlags,
    rename: Option<&'static str>,
    element_name: Option<&'static str>,
}

impl NamedField {
    /// Creates a field of type `T` at declaration position `index`.
    pub fn new<T: Typed>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            index,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            flags: FieldFlags::empty(),
            rename: None,
            element_name: None,
        }
    }

    /// Creates a placeholder for a field whose type cannot be reflected.
    pub fn unserializable(name: &'static str, index: usize) -> Self {
        Self {
            flags: FieldFlags::UNSERIALIZABLE,
            ..Self::new::<Unserializable>(name, index)
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn with_rename(mut self, rename: &'static str) -> Self {
        self.rename = Some(rename);
        self
    }

    #[inline]
    pub fn with_element_name(mut self, element_name: &'static str) -> Self {
        self.element_name = Some(element_name);
        self
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declaration position, used with `Struct::field_at`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn has_flag(&self, flag: FieldFlags) -> bool {
        self.flags.contains(flag)
    }

    /// The name from `#[reflect(rename = "...")]`.
    #[inline]
    pub fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    /// The name from `#[reflect(element_name = "...")]`.
    #[inline]
    pub fn element_name(&self) -> Option<&'static str> {
        self.element_name
    }
}

/// Stand-in type for fields flagged [`FieldFlags::UNSERIALIZABLE`].
pub struct Unserializable;

impl TypePath for Unserializable {
    fn type_path() -> &'static str {
        "arbor_reflect::info::Unserializable"
    }

    fn type_name() -> &'static str {
        "Unserializable"
    }

    fn type_ident() -> &'static str {
        "Unserializable"
    }

    fn module_path() -> Option<&'static str> {
        Some("arbor_reflect::info")
    }
}

impl Typed for Unserializable {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;

    use crate::info::{FieldFlags, Typed};
    use crate::ops::Struct;

    #[derive(crate::derive::Reflect)]
    #[reflect(type_path = "tests::Trigger")]
    struct Trigger {
        armed: bool,
        on_fire: Box<dyn Fn() -> u8 + Send + Sync>,
        on_reset: Option<Arc<dyn Fn(u8) + Send + Sync>>,
    }

    #[test]
    fn boxed_closures_are_unserializable() {
        let info = Trigger::type_info().as_struct().unwrap();
        let flagged = |name| info.field(name).unwrap().has_flag(FieldFlags::UNSERIALIZABLE);
        assert!(!flagged("armed"));
        assert!(flagged("on_fire"));
        assert!(flagged("on_reset"));

        let trigger = Trigger {
            armed: true,
            on_fire: Box::new(|| 3),
            on_reset: None,
        };
        assert_eq!((trigger.on_fire)(), 3);
        assert!(trigger.on_reset.is_none());
        assert!(trigger.field("armed").is_some());
        assert!(trigger.field("on_fire").is_none());
        assert!(trigger.field_at(2).is_none());
        assert_eq!(trigger.field_len(), 3);
    }
}
