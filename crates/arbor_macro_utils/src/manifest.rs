use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Resolves the path under which a generated item can name another `arbor`
/// crate, as seen from the Cargo.toml of the crate being compiled.
///
/// # Example
///
/// ```rust
/// # use arbor_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("arbor_reflect"));
/// ```
///
/// Reading the manifest is not free. Call this once per macro invocation and
/// keep the returned path.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `arbor_` and the caller depends
///    on the facade crate `arbor`, return `::arbor::short_name`
///    (e.g. `arbor_codec` -> `::arbor::codec`).
/// 3. Repeat 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to `::crate_name`.
///
/// A crate that expands its own macros in tests needs
/// `extern crate self as crate_name;` for the fallback to resolve.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "arbor";
const CRATE_PREFIX: &str = "arbor_";

impl Manifest {
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(
        cargo_manifest_path: &Path,
    ) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn ident_path(segments: &[&str]) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: Some(Default::default()),
            segments: Default::default(),
        };
        for segment in segments {
            path.segments.push(syn::PathSegment::from(syn::Ident::new(
                segment,
                proc_macro2::Span::call_site(),
            )));
        }
        path
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::ident_path(&[name]));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::ident_path(&[FACADE_NAME, module]))
    }

    /// Returns the [`syn::Path`] of the package named `name`.
    ///
    /// See the type level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(table)
                && let Some(val) = Self::find_in_deps(deps, name)
            {
                return val;
            }
        }

        Self::ident_path(&[name])
    }

    /// Runs `func` with the [`Manifest`] of the crate being compiled.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use quote::ToTokens;
    use toml_edit::Document;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    fn path_str(p: syn::Path) -> String {
        p.to_token_stream().to_string().replace(' ', "")
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\narbor_reflect = \"0.1\"\narbor = \"0.1\"\n");
        assert_eq!(path_str(m.get_crate_path("arbor_reflect")), "::arbor_reflect");
    }

    #[test]
    fn facade_dependency_maps_to_module() {
        let m = manifest("[dependencies]\narbor = \"0.1\"\n");
        assert_eq!(path_str(m.get_crate_path("arbor_codec")), "::arbor::codec");
    }

    #[test]
    fn dev_dependencies_and_fallback() {
        let m = manifest("[dev-dependencies]\narbor = \"0.1\"\n");
        assert_eq!(path_str(m.get_crate_path("arbor_tree")), "::arbor::tree");
        let empty = manifest("[package]\nname = \"x\"\n");
        assert_eq!(path_str(empty.get_crate_path("arbor_tree")), "::arbor_tree");
    }
}
