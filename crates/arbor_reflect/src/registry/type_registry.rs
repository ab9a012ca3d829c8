use alloc::string::String;
use core::any::TypeId;

use arbor_utils::TypeIdMap;
use arbor_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::info::{TypeInfo, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// Types are looked up by [`TypeId`], by full type path, or by short type
/// name. A short name shared by two registered types is ambiguous and can
/// only be resolved through its full path.
///
/// # Examples
///
/// ```
/// use arbor_reflect::{derive::Reflect, registry::TypeRegistry};
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Leaf {
///     weight: u32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Leaf>();
///
/// let meta = registry.get_with_type_name("Leaf").unwrap();
/// assert!(registry.get_with_type_path(meta.type_path()).is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any type.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Creates a registry with the scalar and string types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                log::warn!("type name `{type_name}` is ambiguous, use the full type path instead");
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Registers `T` and, the first time, the types it depends on.
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Registers every type marked `#[reflect(auto_register)]`.
    ///
    /// Returns `false` if the feature is off or the platform does not
    /// support static collection.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Adds a type trait to an already registered type.
    ///
    /// Returns `false` if `T` is not registered.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) -> bool {
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(type_meta) => {
                type_meta.insert_trait(D::from_type());
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        self.get(type_id).and_then(TypeMeta::get_trait::<T>)
    }

    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::registry::TypeTraitDefault;
    use alloc::string::String;

    #[test]
    fn builtin_types_are_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.get_with_type_path("u32").is_some());
        assert!(registry.get_with_type_name("String").is_some());
        let default = registry
            .get_with_type_path("alloc::string::String")
            .and_then(|m| m.get_trait::<TypeTraitDefault>())
            .map(TypeTraitDefault::default)
            .unwrap();
        assert_eq!(default.take::<String>().unwrap(), "");
    }

    #[test]
    fn ambiguous_names_are_tracked() {
        mod a {
            #[derive(crate::derive::Reflect)]
            pub struct Twin;
        }
        mod b {
            #[derive(crate::derive::Reflect)]
            pub struct Twin;
        }

        let mut registry = TypeRegistry::empty();
        registry.register::<a::Twin>();
        registry.register::<b::Twin>();

        assert!(registry.is_ambiguous("Twin"));
        assert!(registry.get_with_type_name("Twin").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn dependencies_are_registered() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Option<alloc::vec::Vec<u8>>>();
        assert!(registry.get_with_type_path("alloc::vec::Vec<u8>").is_some());
        assert!(registry.get_with_type_path("u8").is_some());
    }
}
