//! Preprocessor settings
//!
//! Settings come from a JSON file (`jsfold.json` under the root, or an explicit
//! `--config` path) and may be overridden from the command line. They are
//! validated once, before any source file is touched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{PreprocessError, Result};

/// Default settings file looked up under the root
pub const SETTINGS_FILE: &str = "jsfold.json";

/// Default directive pattern: `//= require "x"` or `//= require <y>`
pub const DEFAULT_REQUIRE_PATTERN: &str = r#"^\s*//=\s+require\s+(["<])([^">]+)[">]"#;

/// Patterns describing comment boundaries for the stripper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CommentPattern {
    /// Full-line `//` comment
    pub inline: String,
    /// Block comment opened and closed on one line
    pub block_line: String,
    /// Block comment opener, excluding `/*!`
    pub block_start: String,
    /// Block comment terminator
    pub block_end: String,
}

impl Default for CommentPattern {
    fn default() -> Self {
        Self {
            inline: r"^\s*//".to_string(),
            block_line: r"^\s*/\*+.*\*+/".to_string(),
            block_start: r"^\s*/\*+([^!]|$)".to_string(),
            block_end: r"\*+/".to_string(),
        }
    }
}

/// Settings consumed by the preprocessing engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Remove full-line and block comments from emitted code
    pub strip_comments: bool,

    /// Ordered search directories, may contain `APP` / `WEBROOT`
    pub search_paths: Vec<String>,

    /// Directive pattern; group 1 is the quote char, group 2 the target
    pub require_pattern: String,

    /// Comment boundary overrides
    pub comment_pattern: CommentPattern,

    /// Share block-comment state across file boundaries instead of per file
    pub carry_comment_state: bool,

    /// Web root substituted for `WEBROOT`; defaults to `<root>/webroot`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webroot: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strip_comments: false,
            search_paths: Vec::new(),
            require_pattern: DEFAULT_REQUIRE_PATTERN.to_string(),
            comment_pattern: CommentPattern::default(),
            carry_comment_state: false,
            webroot: None,
        }
    }
}

/// Command-line values layered over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub search_paths: Vec<String>,
    pub strip_comments: bool,
}

impl Settings {
    /// Parse settings from a JSON string without validating them
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PreprocessError::config(format!("invalid settings: {}", e)))
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PreprocessError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Load settings for a root: explicit file, else `<root>/jsfold.json`, else defaults.
    /// Overrides are applied and the result is validated.
    pub fn load(root: &Path, config: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = root.join(SETTINGS_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if !overrides.search_paths.is_empty() {
            self.search_paths = overrides.search_paths.clone();
        }
        if overrides.strip_comments {
            self.strip_comments = true;
        }
    }

    /// Check that the engine is usable with these settings
    pub fn validate(&self) -> Result<()> {
        if self.search_paths.is_empty() {
            return Err(PreprocessError::config(
                "searchPaths is empty; configure at least one search path",
            ));
        }
        if let Some(blank) = self.search_paths.iter().find(|p| p.trim().is_empty()) {
            return Err(PreprocessError::config(format!(
                "searchPaths contains a blank entry: {:?}",
                blank
            )));
        }
        Ok(())
    }
}
