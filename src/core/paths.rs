//! Path normalization and search-path placeholder substitution
//!
//! Result paths are normalized to use '/' as separator and are made relative
//! to the root when possible.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

/// Placeholder for the application root in configured search paths
pub const APP_PLACEHOLDER: &str = "APP";

/// Placeholder for the web root in configured search paths
pub const WEBROOT_PLACEHOLDER: &str = "WEBROOT";

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{}|{}", WEBROOT_PLACEHOLDER, APP_PLACEHOLDER))
        .expect("Invalid placeholder regex")
});

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Display form of a path: relative to root when under it, absolute otherwise
pub fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Concrete directories substituted for search-path placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub app: PathBuf,
    pub webroot: PathBuf,
}

impl Roots {
    /// Roots for an application directory, with the web root at `<app>/webroot`
    pub fn new(app: impl Into<PathBuf>) -> Self {
        let app = app.into();
        let webroot = app.join("webroot");
        Self { app, webroot }
    }

    pub fn with_webroot(mut self, webroot: impl Into<PathBuf>) -> Self {
        self.webroot = webroot.into();
        self
    }

    /// Replace `WEBROOT` and `APP` tokens in a configured search path.
    ///
    /// Each token expands to its directory followed by a separator, so both
    /// `WEBROOT/js` and `WEBROOTjs` name the same directory. Tokens are
    /// replaced in a single pass; expanded directories are never rescanned.
    pub fn substitute(&self, search_path: &str) -> PathBuf {
        let webroot = with_trailing_slash(&self.webroot);
        let app = with_trailing_slash(&self.app);
        let expanded = PLACEHOLDER_RE.replace_all(search_path, |caps: &Captures| {
            if &caps[0] == WEBROOT_PLACEHOLDER {
                webroot.clone()
            } else {
                app.clone()
            }
        });
        PathBuf::from(expanded.into_owned()).components().collect()
    }
}

fn with_trailing_slash(path: &Path) -> String {
    let mut s = normalize_path(path);
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}
