//! Text and file round trips through a JSON rendering of the tree.

use std::fs;
use std::path::Path;
use alloc::sync::Arc;

use arbor_codec::context::SerializationContext;
use arbor_codec::{Decoder, Encoder};
use arbor_reflect::Reflect;
use arbor_reflect::info::Typed;
use arbor_reflect::registry::TypeRegistry;
use arbor_tree::TreeNode;
use log::debug;

use crate::Error;

/// Encodes `value` with the global context and renders the tree as
/// pretty-printed JSON.
///
/// # Examples
///
/// ```
/// use arbor::reflect::derive::Reflect;
/// use arbor::reflect::registry::TypeRegistry;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(default)]
/// struct Seed {
///     kind: String,
///     weight: u16,
/// }
///
/// let seed = Seed { kind: "acorn".into(), weight: 4 };
/// let text = arbor::to_string(&seed).unwrap();
/// assert!(text.contains("acorn"));
///
/// let registry = TypeRegistry::new();
/// let back: Seed = arbor::from_str(&text, &registry).unwrap();
/// assert_eq!(back, seed);
/// ```
pub fn to_string<T: Reflect + Typed>(value: &T) -> Result<String, Error> {
    to_string_with(value, SerializationContext::global())
}

pub fn to_string_with<T: Reflect + Typed>(
    value: &T,
    context: Arc<SerializationContext>,
) -> Result<String, Error> {
    let node = Encoder::with_context(context).encode_typed(value)?;
    Ok(serde_json::to_string_pretty(&node)?)
}

/// Parses a JSON tree and decodes it as `T` with the global context.
pub fn from_str<T: Reflect + Typed>(text: &str, registry: &TypeRegistry) -> Result<T, Error> {
    from_str_with(text, registry, SerializationContext::global())
}

pub fn from_str_with<T: Reflect + Typed>(
    text: &str,
    registry: &TypeRegistry,
    context: Arc<SerializationContext>,
) -> Result<T, Error> {
    let node: TreeNode = serde_json::from_str(text)?;
    Ok(Decoder::with_context(registry, context).decode_typed(&node)?)
}

/// Writes `value` to `path`, replacing the file.
pub fn to_file<T: Reflect + Typed>(value: &T, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let text = to_string(value)?;
    fs::write(path, text)?;
    debug!("wrote `{}` to {}", T::type_info().type_path(), path.display());
    Ok(())
}

pub fn from_file<T: Reflect + Typed>(
    path: impl AsRef<Path>,
    registry: &TypeRegistry,
) -> Result<T, Error> {
    let text = fs::read_to_string(path)?;
    from_str(&text, registry)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use arbor_reflect::Shared;
    use arbor_reflect::derive::Reflect;
    use arbor_reflect::registry::TypeRegistry;

    use crate::Error;
    use arbor_codec::error::DecodeError;

    #[derive(Reflect, Default, Debug)]
    #[reflect(default, type_path = "tests::Grove")]
    struct Grove {
        name: String,
        heights: HashMap<String, f32>,
        keeper: Option<Shared<String>>,
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove.json");

        let grove = Grove {
            name: "north".into(),
            heights: HashMap::from([("oak".into(), 12.5)]),
            keeper: None,
        };
        crate::to_file(&grove, &path).unwrap();

        let registry = TypeRegistry::new();
        let back: Grove = crate::from_file(&path, &registry).unwrap();
        assert_eq!(back.name, grove.name);
        assert_eq!(back.heights, grove.heights);
        assert!(back.keeper.is_none());
    }

    #[test]
    fn errors_keep_their_source() {
        let registry = TypeRegistry::new();
        let err = crate::from_str::<Grove>("{", &registry).unwrap_err();
        assert!(matches!(err, Error::Document(_)));

        let err = crate::from_file::<Grove>("/nonexistent/grove.json", &registry).unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let text = r#"{ "name": "_ROOT_", "attributes": [{ "name": "_Type", "value": "tests::Other" }] }"#;
        let err = crate::from_str::<Grove>(text, &registry).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::UnresolvableType { .. })
        ));
    }
}
