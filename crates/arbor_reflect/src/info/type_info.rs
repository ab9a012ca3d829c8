use crate::info::{ArrayInfo, DynamicInfo, EnumInfo, ListInfo, MapInfo, OpaqueInfo};
use crate::info::{OptionInfo, ReflectKind, ReflectKindError, ScalarInfo, SetInfo};
use crate::info::{SharedInfo, StringInfo, StructInfo, Type, WrapperInfo};

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a reflected type.
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info)
/// or [`DynamicTyped::reflect_type_info`](crate::info::DynamicTyped).
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    String(StringInfo),
    Enum(EnumInfo),
    Struct(StructInfo),
    Array(ArrayInfo),
    List(ListInfo),
    Set(SetInfo),
    Map(MapInfo),
    Option(OptionInfo),
    Shared(SharedInfo),
    Wrapper(WrapperInfo),
    Dynamic(DynamicInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_fn {
    ($($name:ident : $kind:ident => $info:ident),* $(,)?) => {$(
        #[doc = concat!("Returns the [`", stringify!($info), "`] or a kind error.")]
        #[inline]
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    )*};
}

impl TypeInfo {
    /// Returns the [`Type`] of this info.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::String(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Set(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Option(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Wrapper(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    crate::info::impl_type_fn!();

    /// Returns the [`ReflectKind`] of this info.
    pub const fn kind(&self) -> ReflectKind {
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

    impl_cast_fn! {
        as_scalar: Scalar => ScalarInfo,
        as_string: String => StringInfo,
        as_enum: Enum => EnumInfo,
        as_struct: Struct => StructInfo,
        as_array: Array => ArrayInfo,
        as_list: List => ListInfo,
        as_set: Set => SetInfo,
        as_map: Map => MapInfo,
        as_option: Option => OptionInfo,
        as_shared: Shared => SharedInfo,
        as_wrapper: Wrapper => WrapperInfo,
        as_dynamic: Dynamic => DynamicInfo,
        as_opaque: Opaque => OpaqueInfo,
    }

    /// Strips every `Option` layer and returns the innermost info.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_reflect::info::{Typed, ReflectKind};
    ///
    /// let info = <Option<Option<u8>>>::type_info().strip_options();
    /// assert_eq!(info.kind(), ReflectKind::Scalar);
    /// ```
    pub fn strip_options(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let Self::Option(option) = info {
            info = option.inner_info();
        }
        info
    }

    /// The default value constructor recorded for this type, if any.
    pub fn default_fn(&self) -> Option<fn() -> alloc::boxed::Box<dyn crate::Reflect>> {
        match self {
            Self::Struct(info) => info.default_fn(),
            Self::Enum(info) => info.default_fn(),
            Self::Option(info) => Some(info.none_fn()),
            _ => None,
        }
    }
}
