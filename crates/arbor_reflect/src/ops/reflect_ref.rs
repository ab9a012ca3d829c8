use crate::Reflect;
use crate::info::{ReflectKind, ReflectKindError};
use crate::ops::{Array, Dynamic, Enum, List, Map, Nullable, Scalar, Set};
use crate::ops::{SharedObject, Struct, Synchronized, Text};

/// An immutable view of a value, by kind.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    String(&'a dyn Text),
    Enum(&'a dyn Enum),
    Struct(&'a dyn Struct),
    Array(&'a dyn Array),
    List(&'a dyn List),
    Set(&'a dyn Set),
    Map(&'a dyn Map),
    Option(&'a dyn Nullable),
    Shared(&'a dyn SharedObject),
    Wrapper(&'a dyn Synchronized),
    Dynamic(&'a dyn Dynamic),
    Opaque(&'a dyn Reflect),
}

/// A mutable view of a value, by kind.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Scalar),
    String(&'a mut dyn Text),
    Enum(&'a mut dyn Enum),
    Struct(&'a mut dyn Struct),
    Array(&'a mut dyn Array),
    List(&'a mut dyn List),
    Set(&'a mut dyn Set),
    Map(&'a mut dyn Map),
    Option(&'a mut dyn Nullable),
    Shared(&'a mut dyn SharedObject),
    Wrapper(&'a mut dyn Synchronized),
    Dynamic(&'a mut dyn Dynamic),
    Opaque(&'a mut dyn Reflect),
}

macro_rules! impl_kind_fn {
    ($name:ident) => {
        impl $name<'_> {
            /// Returns the [`ReflectKind`] of this value.
            pub fn kind(&self) -> ReflectKind {
                match self {
                    Self::Scalar(_) => ReflectKind::Scalar,
                    Self::String(_) => ReflectKind::String,
                    Self::Enum(_) => ReflectKind::Enum,
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::Array(_) => ReflectKind::Array,
                    Self::List(_) => ReflectKind::List,
                    Self::Set(_) => ReflectKind::Set,
                    Self::Map(_) => ReflectKind::Map,
                    Self::Option(_) => ReflectKind::Option,
                    Self::Shared(_) => ReflectKind::Shared,
                    Self::Wrapper(_) => ReflectKind::Wrapper,
                    Self::Dynamic(_) => ReflectKind::Dynamic,
                    Self::Opaque(_) => ReflectKind::Opaque,
                }
            }
        }
    };
}

impl_kind_fn!(ReflectRef);
impl_kind_fn!(ReflectMut);

macro_rules! impl_cast_ref {
    ($($fn_name:ident : $kind:ident => $trait:ident),* $(,)?) => {
        impl<'a> ReflectRef<'a> {$(
            #[inline]
            pub fn $fn_name(self) -> Result<&'a dyn $trait, ReflectKindError> {
                match self {
                    Self::$kind(value) => Ok(value),
                    other => Err(ReflectKindError {
                        expected: ReflectKind::$kind,
                        received: other.kind(),
                    }),
                }
            }
        )*}
    };
}

macro_rules! impl_cast_mut {
    ($($fn_name:ident : $kind:ident => $trait:ident),* $(,)?) => {
        impl<'a> ReflectMut<'a> {$(
            #[inline]
            pub fn $fn_name(self) -> Result<&'a mut dyn $trait, ReflectKindError> {
                match self {
                    Self::$kind(value) => Ok(value),
                    other => Err(ReflectKindError {
                        expected: ReflectKind::$kind,
                        received: other.kind(),
                    }),
                }
            }
        )*}
    };
}

impl_cast_ref! {
    as_scalar: Scalar => Scalar,
    as_string: String => Text,
    as_enum: Enum => Enum,
    as_struct: Struct => Struct,
    as_array: Array => Array,
    as_list: List => List,
    as_set: Set => Set,
    as_map: Map => Map,
    as_option: Option => Nullable,
    as_shared: Shared => SharedObject,
    as_wrapper: Wrapper => Synchronized,
    as_dynamic: Dynamic => Dynamic,
}

impl_cast_mut! {
    as_scalar: Scalar => Scalar,
    as_string: String => Text,
    as_enum: Enum => Enum,
    as_struct: Struct => Struct,
    as_array: Array => Array,
    as_list: List => List,
    as_set: Set => Set,
    as_map: Map => Map,
    as_option: Option => Nullable,
    as_shared: Shared => SharedObject,
    as_wrapper: Wrapper => Synchronized,
    as_dynamic: Dynamic => Dynamic,
}
