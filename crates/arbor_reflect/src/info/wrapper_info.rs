use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{BuildError, Type, TypeInfo, TypePath, Typed};

/// Wraps an inner value into the outer type.
pub type WrapFn = fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError>;

/// Information about `Option<T>`.
#[derive(Debug)]
pub struct OptionInfo {
    ty: Type,
    inner_info: fn() -> &'static TypeInfo,
    none: fn() -> Box<dyn Reflect>,
    some: WrapFn,
}

impl OptionInfo {
    pub fn new<T: TypePath, Inner: Typed>(none: fn() -> Box<dyn Reflect>, some: WrapFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner_info: Inner::type_info,
            none,
            some,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    #[inline]
    pub fn none_fn(&self) -> fn() -> Box<dyn Reflect> {
        self.none
    }

    /// Creates the `None` value.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    /// Creates `Some(inner)`.
    #[inline]
    pub fn some(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError> {
        (self.some)(inner)
    }
}

macro_rules! impl_wrapping_info {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            ty: Type,
            inner_info: fn() -> &'static TypeInfo,
            wrap: WrapFn,
        }

        impl $name {
            pub fn new<T: TypePath, Inner: Typed>(wrap: WrapFn) -> Self {
                Self {
                    ty: Type::of::<T>(),
                    inner_info: Inner::type_info,
                    wrap,
                }
            }

            crate::info::impl_type_fn!(ty);

            #[inline]
            pub fn inner_info(&self) -> &'static TypeInfo {
                (self.inner_info)()
            }

            /// Moves `inner` into a new outer value.
            #[inline]
            pub fn wrap(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, BuildError> {
                (self.wrap)(inner)
            }
        }
    };
}

impl_wrapping_info! {
    /// Information about [`Shared<T>`](crate::Shared).
    SharedInfo
}

impl_wrapping_info! {
    /// Information about lock wrappers such as `Mutex<T>`.
    WrapperInfo
}

/// Information about [`DynValue`](crate::DynValue).
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    pub fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    crate::info::impl_type_fn!(ty);
}

/// Information about types without a reflected structure.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    pub fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    crate::info::impl_type_fn!(ty);
}
