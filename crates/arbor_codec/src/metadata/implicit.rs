//! Codec methods declared on a type with `#[codec_methods]`.

use alloc::boxed::Box;
use core::any::TypeId;

use arbor_reflect::Reflect;
use arbor_tree::TreeNode;

use crate::decoder::{Decoder, WorkingObject};
use crate::encoder::Encoder;
use crate::error::{ConfigError, DecodeError, EncodeError};

/// Writes a value into its node. `Ok(false)` continues the default walk.
pub type SerializeFn = fn(&dyn Reflect, &mut TreeNode, &mut Encoder) -> Result<bool, EncodeError>;

/// Reads a value from its node. `Ok(false)` continues the default walk.
pub type DeserializeFn =
    fn(&mut WorkingObject<'_>, &TreeNode, &mut Decoder<'_>) -> Result<bool, DecodeError>;

/// Creates the initial value of a decode.
pub type ConstructFn = fn() -> Box<dyn Reflect>;

/// One marked method, collected through [`inventory`].
///
/// Generated by `#[codec_methods]`; not meant to be built by hand.
pub struct ImplicitMember {
    pub type_id: fn() -> TypeId,
    pub name: &'static str,
    pub kind: MemberKind,
}

inventory::collect!(ImplicitMember);

pub enum MemberKind {
    Serializer(SerializeFn),
    Deserializer(DeserializeFn),
    Constructor(ConstructFn),
    /// A marked method whose signature was rejected.
    Invalid {
        marker: &'static str,
        reason: &'static str,
    },
}

impl MemberKind {
    fn marker(&self) -> &'static str {
        match self {
            Self::Serializer(_) => "serializer",
            Self::Deserializer(_) => "deserializer",
            Self::Constructor(_) => "constructor",
            Self::Invalid { marker, .. } => marker,
        }
    }
}

/// The codec methods of one type.
#[derive(Default, Clone, Copy)]
pub struct ImplicitMembers {
    pub serializer: Option<SerializeFn>,
    pub deserializer: Option<DeserializeFn>,
    pub constructor: Option<ConstructFn>,
}

impl ImplicitMembers {
    /// Collects the members declared for `type_id`.
    pub(crate) fn collect(type_id: TypeId, type_path: &'static str) -> Result<Self, ConfigError> {
        let mut members = Self::default();
        let mut names: [Option<&'static str>; 3] = [None; 3];

        for member in inventory::iter::<ImplicitMember> {
            if (member.type_id)() != type_id {
                continue;
            }
            let slot = match member.kind {
                MemberKind::Serializer(func) => {
                    members.serializer = Some(func);
                    0
                }
                MemberKind::Deserializer(func) => {
                    members.deserializer = Some(func);
                    1
                }
                MemberKind::Constructor(func) => {
                    members.constructor = Some(func);
                    2
                }
                MemberKind::Invalid { reason, .. } => {
                    return Err(ConfigError::InvalidMember {
                        type_path,
                        member: member.name,
                        reason,
                    });
                }
            };
            if let Some(first) = names[slot].replace(member.name) {
                return Err(ConfigError::DuplicateMember {
                    type_path,
                    marker: member.kind.marker(),
                    first,
                    second: member.name,
                });
            }
        }

        Ok(members)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.serializer.is_none() && self.deserializer.is_none() && self.constructor.is_none()
    }
}

impl core::fmt::Debug for ImplicitMembers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ImplicitMembers")
            .field("serializer", &self.serializer.is_some())
            .field("deserializer", &self.deserializer.is_some())
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SurrogateOutcome

/// Return types accepted from codec methods.
///
/// `()` means handled. `bool` reports whether the method handled the value.
/// Both may be wrapped in a `Result` whose error converts into `E`.
pub trait SurrogateOutcome<E> {
    fn into_outcome(self) -> Result<bool, E>;
}

impl<E> SurrogateOutcome<E> for () {
    #[inline]
    fn into_outcome(self) -> Result<bool, E> {
        Ok(true)
    }
}

impl<E> SurrogateOutcome<E> for bool {
    #[inline]
    fn into_outcome(self) -> Result<bool, E> {
        Ok(self)
    }
}

impl<E, X: Into<E>> SurrogateOutcome<E> for Result<(), X> {
    #[inline]
    fn into_outcome(self) -> Result<bool, E> {
        self.map(|()| true).map_err(Into::into)
    }
}

impl<E, X: Into<E>> SurrogateOutcome<E> for Result<bool, X> {
    #[inline]
    fn into_outcome(self) -> Result<bool, E> {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;

    use arbor_reflect::derive::Reflect;
    use arbor_reflect::info::Typed;
    use arbor_reflect::registry::TypeRegistry;
    use arbor_tree::TreeNode;

    use crate::error::{ConfigError, DecodeError, EncodeError};
    use crate::metadata::TypeDescriptor;
    use crate::{Decoder, Encoder, WorkingObject, codec_methods};

    #[derive(Reflect, Debug, PartialEq)]
    #[reflect(type_path = "tests::Celsius")]
    struct Celsius {
        degrees: f64,
    }

    #[codec_methods]
    impl Celsius {
        #[serializer]
        fn write(&self, node: &mut TreeNode) {
            node.set_text(format!("{}C", self.degrees));
        }

        #[deserializer]
        fn read(working: &mut WorkingObject<'_>, node: &TreeNode) -> Result<bool, DecodeError> {
            let Some(degrees) = node.text().and_then(|text| text.strip_suffix('C')) else {
                return Ok(false);
            };
            let degrees = degrees.parse().map_err(DecodeError::custom)?;
            working.set(Box::new(Celsius { degrees }))?;
            Ok(true)
        }

        #[constructor]
        fn freezing() -> Self {
            Self { degrees: 0.0 }
        }
    }

    #[derive(Reflect)]
    #[reflect(type_path = "tests::Broken")]
    struct Broken {
        value: u8,
    }

    #[codec_methods]
    #[allow(dead_code)]
    impl Broken {
        #[serializer]
        fn write(self, node: &mut TreeNode) {
            node.set_text(self.value.to_string());
        }
    }

    #[derive(Reflect)]
    #[reflect(type_path = "tests::Twice")]
    struct Twice {
        value: u8,
    }

    #[codec_methods]
    #[allow(dead_code)]
    impl Twice {
        #[serializer]
        fn short(&self, node: &mut TreeNode) {
            node.set_text(self.value.to_string());
        }

        #[serializer]
        fn long(&self, node: &mut TreeNode) -> bool {
            node.set_text(format!("value {}", self.value));
            true
        }
    }

    #[derive(Reflect)]
    #[reflect(type_path = "tests::Partial")]
    struct Partial {
        value: u8,
    }

    #[codec_methods]
    #[allow(dead_code)]
    impl Partial {
        #[deserializer]
        fn read(working: &mut WorkingObject<'_>) -> bool {
            working.is_set()
        }
    }

    #[derive(Reflect, Debug)]
    #[reflect(type_path = "tests::Constant")]
    struct Constant {
        value: u8,
    }

    #[codec_methods]
    #[allow(dead_code)]
    impl Constant {
        #[constructor]
        const ZERO: u8 = 0;
    }

    #[test]
    fn codec_methods_are_collected() {
        let descriptor = TypeDescriptor::of(Celsius::type_info()).unwrap();
        let members = descriptor.implicit();
        assert!(members.serializer.is_some() && members.deserializer.is_some());
        assert!(descriptor.constructor().is_some());

        let node = Encoder::new().encode_typed(&Celsius { degrees: 21.5 }).unwrap();
        assert_eq!(node.text(), Some("21.5C"));
        assert!(!node.has_children());

        let registry = TypeRegistry::new();
        let back: Celsius = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, Celsius { degrees: 21.5 });

        // Without the suffix the default walk reads the field into the
        // constructed value.
        let mut node = TreeNode::new("_ROOT_");
        node.add_child("degrees").set_text("-4");
        let back: Celsius = Decoder::new(&registry).decode_typed(&node).unwrap();
        assert_eq!(back, Celsius { degrees: -4.0 });
    }

    #[test]
    fn invalid_members_are_reported_on_use() {
        let expected = ConfigError::InvalidMember {
            type_path: "tests::Broken",
            member: "write",
            reason: "must take `&self`",
        };
        assert_eq!(TypeDescriptor::of(Broken::type_info()).unwrap_err(), expected);

        let err = Encoder::new().encode_typed(&Broken { value: 1 }).unwrap_err();
        assert_eq!(err, EncodeError::Config(expected));
    }

    #[test]
    fn unusable_signatures_are_reported() {
        let err = TypeDescriptor::of(Partial::type_info()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMember {
                type_path: "tests::Partial",
                member: "read",
                reason: "is missing a required parameter",
            }
        );

        let err = TypeDescriptor::of(Constant::type_info()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMember {
                type_path: "tests::Constant",
                member: "ZERO",
                reason: "is not a method",
            }
        );

        let registry = TypeRegistry::new();
        let mut node = TreeNode::new("_ROOT_");
        node.add_child("value").set_text("4");
        let err = Decoder::new(&registry).decode_typed::<Constant>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::Config(ConfigError::InvalidMember { .. })));
    }

    #[test]
    fn duplicate_markers_are_rejected() {
        let err = TypeDescriptor::of(Twice::type_info()).unwrap_err();
        let ConfigError::DuplicateMember {
            type_path,
            marker,
            first,
            second,
        } = err
        else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!((type_path, marker), ("tests::Twice", "serializer"));
        // Collection order is unspecified.
        let mut names = [first, second];
        names.sort_unstable();
        assert_eq!(names, ["long", "short"]);

        let err = Encoder::new().encode_typed(&Twice { value: 3 }).unwrap_err();
        assert!(matches!(err, EncodeError::Config(ConfigError::DuplicateMember { .. })));
    }
}
