//! Logical name resolution
//!
//! Logical names map to file names by underscoring camel-case word boundaries,
//! lowercasing, and appending `.js`:
//!
//! - `MyModule` -> `my_module.js`
//! - `jquery.ui` -> `jquery.ui.js`
//! - `Lib/DateUtils` -> `lib/date_utils.js`

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::{PreprocessError, Result};
use crate::core::model::{ResultItem, ResultSet, SourceMode};
use crate::core::paths::{display_path, Roots};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::file_meta;
use crate::preprocess::index::PathIndex;

/// Extension appended to every logical name
pub const SCRIPT_EXTENSION: &str = ".js";

/// Convert a logical name to its file name.
///
/// An uppercase ASCII letter preceded by a word character (`[A-Za-z0-9_]`) gets
/// an underscore in front of it, then the whole name is lowercased. Separators
/// and dots are kept as written.
pub fn logical_to_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + SCRIPT_EXTENSION.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if let Some(p) = prev {
                if p.is_ascii_alphanumeric() || p == '_' {
                    out.push('_');
                }
            }
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out.push_str(SCRIPT_EXTENSION);
    out
}

/// A resolved dependency path and how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub mode: SourceMode,
}

/// Resolves logical names against a relative base or the search paths.
///
/// The path index is built on the first search-path lookup and reused after
/// that. It is never mutated once built, so a resolver may be shared.
#[derive(Debug)]
pub struct ObjectResolver {
    search_paths: Vec<String>,
    roots: Roots,
    index: OnceCell<PathIndex>,
}

impl ObjectResolver {
    pub fn new(search_paths: Vec<String>, roots: Roots) -> Self {
        Self {
            search_paths,
            roots,
            index: OnceCell::new(),
        }
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// The path index, building it if this is the first use
    pub fn index(&self) -> Result<&PathIndex> {
        self.index
            .get_or_try_init(|| PathIndex::build(&self.search_paths, &self.roots))
    }

    /// Resolve `name`.
    ///
    /// With a `relative_base` the result is `relative_base/<filename>` and its
    /// existence is left for the reader to discover. Without one, search
    /// directories are tried in order and the first hit wins.
    pub fn resolve(&self, name: &str, relative_base: Option<&Path>) -> Result<Resolved> {
        let filename = logical_to_filename(name);

        if let Some(base) = relative_base {
            let path = base.join(&filename);
            debug!("Resolved \"{}\" relative to {} -> {}", name, base.display(), path.display());
            return Ok(Resolved {
                path,
                mode: SourceMode::Relative,
            });
        }

        let index = self.index()?;
        let nested = filename.contains('/');

        for indexed in index.dirs() {
            if indexed.contains(&filename) {
                let path = indexed.dir.join(&filename);
                debug!("Resolved <{}> -> {}", name, path.display());
                return Ok(Resolved {
                    path,
                    mode: SourceMode::SearchPath,
                });
            }
            if nested {
                let candidate = indexed.dir.join(&filename);
                if candidate.is_file() {
                    debug!("Resolved <{}> -> {} (subdirectory)", name, candidate.display());
                    return Ok(Resolved {
                        path: candidate,
                        mode: SourceMode::SearchPath,
                    });
                }
            }
        }

        Err(PreprocessError::UnresolvedDependency {
            name: name.to_string(),
            required_by: None,
        })
    }
}

/// Run the resolve command.
///
/// Without `from` the name is looked up through the search paths, as an
/// angle-bracket require would be. With `from` it resolves next to that file,
/// as a quoted require would.
pub fn run_resolve(
    resolver: &ObjectResolver,
    name: &str,
    from: Option<&Path>,
    config: RenderConfig,
) -> anyhow::Result<()> {
    let base = from.map(|file| file.parent().unwrap_or(Path::new("")));
    let resolved = resolver.resolve(name, base)?;
    let root = &resolver.roots().app;

    let item = ResultItem::dependency(display_path(&resolved.path, root), resolved.mode)
        .with_meta(file_meta(&resolved.path, None))
        .with_data(serde_json::json!({
            "requested": name,
            "filename": logical_to_filename(name),
            "exists": resolved.path.is_file(),
        }));

    let result_set: ResultSet = std::iter::once(item).collect();
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_logical_to_filename() {
        assert_eq!(logical_to_filename("MyModule"), "my_module.js");
        assert_eq!(logical_to_filename("camelCase"), "camel_case.js");
        assert_eq!(logical_to_filename("jquery.ui"), "jquery.ui.js");
        assert_eq!(logical_to_filename("plain"), "plain.js");
        assert_eq!(logical_to_filename("already_under"), "already_under.js");
    }

    #[test]
    fn test_logical_to_filename_keeps_separators() {
        assert_eq!(logical_to_filename("Lib/DateUtils"), "lib/date_utils.js");
        assert_eq!(logical_to_filename("vendor/jquery.Cookie"), "vendor/jquery.cookie.js");
        assert_eq!(logical_to_filename("Html5Shiv"), "html5_shiv.js");
    }

    #[test]
    fn test_resolve_relative_is_not_checked() {
        let resolver = ObjectResolver::new(vec!["APP/missing".to_string()], Roots::new("/nowhere"));
        let resolved = resolver
            .resolve("LocalThing", Some(Path::new("/a/b")))
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/a/b/local_thing.js"));
        assert_eq!(resolved.mode, SourceMode::Relative);
        // No index was needed, so the missing directory went unnoticed
        assert!(resolver.index.get().is_none());
    }

    #[test]
    fn test_resolve_first_search_path_wins() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("first")).unwrap();
        fs::create_dir_all(temp.path().join("second")).unwrap();
        fs::write(temp.path().join("first/shared.js"), "1").unwrap();
        fs::write(temp.path().join("second/shared.js"), "2").unwrap();
        fs::write(temp.path().join("second/only_here.js"), "3").unwrap();

        let resolver = ObjectResolver::new(
            vec!["APP/first".to_string(), "APP/second".to_string()],
            Roots::new(temp.path()),
        );

        let shared = resolver.resolve("shared", None).unwrap();
        assert_eq!(shared.path, temp.path().join("first/shared.js"));
        assert_eq!(shared.mode, SourceMode::SearchPath);

        let only = resolver.resolve("OnlyHere", None).unwrap();
        assert_eq!(only.path, temp.path().join("second/only_here.js"));
    }

    #[test]
    fn test_resolve_subdirectory() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("js/lib")).unwrap();
        fs::write(temp.path().join("js/lib/date_utils.js"), "").unwrap();

        let resolver = ObjectResolver::new(vec!["APP/js".to_string()], Roots::new(temp.path()));
        let resolved = resolver.resolve("lib/DateUtils", None).unwrap();
        assert_eq!(resolved.path, temp.path().join("js/lib/date_utils.js"));
    }

    #[test]
    fn test_resolve_unresolved() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("js")).unwrap();

        let resolver = ObjectResolver::new(vec!["APP/js".to_string()], Roots::new(temp.path()));
        let err = resolver.resolve("Nope", None).unwrap_err();
        match err {
            PreprocessError::UnresolvedDependency { name, required_by } => {
                assert_eq!(name, "Nope");
                assert!(required_by.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_index_built_once() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::write(temp.path().join("js/a.js"), "").unwrap();

        let resolver = ObjectResolver::new(vec!["APP/js".to_string()], Roots::new(temp.path()));
        resolver.resolve("a", None).unwrap();

        // Files added after the index is built are not seen by this resolver
        fs::write(temp.path().join("js/b.js"), "").unwrap();
        assert!(resolver.resolve("b", None).is_err());
    }

    #[test]
    fn test_resolve_missing_search_dir() {
        let temp = tempdir().unwrap();
        let resolver = ObjectResolver::new(vec!["APP/gone".to_string()], Roots::new(temp.path()));
        let err = resolver.resolve("a", None).unwrap_err();
        assert!(matches!(err, PreprocessError::DirectoryNotFound { .. }));
    }
}
