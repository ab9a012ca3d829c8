use core::any::{Any, TypeId};

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// A stable alternative to [`core::any::type_name`]. The path is what the
/// codec writes into type attributes, so it must not change between builds.
///
/// - [`type_path`]: unique, fully qualified path including generics.
/// - [`type_name`]: path without the module prefix, may be duplicated.
/// - [`type_ident`]: the bare identifier without generics.
/// - [`module_path`]: optional module path.
///
/// None of the names start with `::`.
///
/// # Examples
///
/// ```
/// use arbor_reflect::info::TypePath;
///
/// assert_eq!(<Vec<u8>>::type_path(), "alloc::vec::Vec<u8>");
/// assert_eq!(<Vec<u8>>::type_name(), "Vec<u8>");
/// assert_eq!(<Vec<u8>>::type_ident(), "Vec");
/// ```
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`type_ident`]: TypePath::type_ident
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    /// Returns the fully qualified path of the type.
    fn type_path() -> &'static str;

    /// Returns the path without module prefix.
    fn type_name() -> &'static str;

    /// Returns the identifier without generics.
    fn type_ident() -> &'static str;

    /// Returns the module path, `None` for primitives.
    #[inline]
    fn module_path() -> Option<&'static str> {
        None
    }
}

/// Dynamic dispatch for [`TypePath`].
///
/// Implemented automatically for every `TypePath` type.
pub trait DynamicTypePath {
    fn reflect_type_path(&self) -> &'static str;
    fn reflect_type_name(&self) -> &'static str;
    fn reflect_type_ident(&self) -> &'static str;
    fn reflect_module_path(&self) -> Option<&'static str>;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }

    #[inline]
    fn reflect_type_ident(&self) -> &'static str {
        Self::type_ident()
    }

    #[inline]
    fn reflect_module_path(&self) -> Option<&'static str> {
        Self::module_path()
    }
}

// -----------------------------------------------------------------------------
// TypePathTable

/// Function pointers to a type's [`TypePath`] methods.
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
}

impl TypePathTable {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }
}

impl core::fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.path())
            .field("type_name", &self.name())
            .field("type_ident", &self.ident())
            .field("module_path", &self.module_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] plus its [`TypePathTable`].
///
/// Two `Type`s are equal when their `TypeId`s are equal.
#[derive(Copy, Clone)]
pub struct Type {
    type_path_table: TypePathTable,
    type_id: TypeId,
}

impl Type {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path_table: TypePathTable::of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.type_path_table
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path_table.path()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_path_table.name()
    }

    #[inline]
    pub fn ident(&self) -> &'static str {
        self.type_path_table.ident()
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.type_path_table.module_path()
    }

    /// Returns `true` if the type path carries generic arguments.
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.path().contains('<')
    }

    /// The type path with its generic arguments removed.
    ///
    /// `alloc::collections::VecDeque<u8>` becomes `alloc::collections::VecDeque`.
    /// Non-generic paths are returned unchanged.
    pub fn shape(&self) -> &'static str {
        let path = self.path();
        match path.find('<') {
            Some(index) => &path[..index],
            None => path,
        }
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl core::fmt::Debug for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_type_fn {
    ($field:ident) => {
        #[inline(always)]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }
        $crate::info::impl_type_fn!();
    };
    () => {
        #[inline]
        pub const fn ty_id(&self) -> ::core::any::TypeId {
            self.ty().id()
        }

        #[inline]
        pub fn type_is<T: ::core::any::Any>(&self) -> bool {
            self.ty().id() == ::core::any::TypeId::of::<T>()
        }

        #[inline]
        pub fn type_path(&self) -> &'static str {
            self.ty().path()
        }

        #[inline]
        pub fn type_name(&self) -> &'static str {
            self.ty().name()
        }

        #[inline]
        pub fn type_ident(&self) -> &'static str {
            self.ty().ident()
        }

        #[inline]
        pub fn module_path(&self) -> Option<&'static str> {
            self.ty().module_path()
        }
    };
}

pub(crate) use impl_type_fn;

#[cfg(test)]
mod tests {
    use super::{Type, TypePath};
    use alloc::collections::VecDeque;

    #[test]
    fn shape_strips_generics() {
        let ty = Type::of::<VecDeque<u32>>();
        assert!(ty.is_generic());
        assert_eq!(ty.shape(), "alloc::collections::VecDeque");
        assert_eq!(Type::of::<u32>().shape(), "u32");
        assert_eq!(<VecDeque<u32>>::type_ident(), "VecDeque");
    }
}
