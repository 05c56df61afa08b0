//! Result model for the inspection commands
//!
//! `deps`, `resolve` and `index` map what they find onto these items before
//! rendering. `build` writes the bundle text directly and does not use them.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A file present in a search directory
    File,
    /// A file pulled into a bundle, or the answer to a resolve query
    Dependency,
}

/// How a dependency path was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// The entry file given on the command line
    Entry,
    /// Quoted require, relative to the requiring file
    Relative,
    /// Angle-bracket require, found through the search paths
    SearchPath,
    /// Directory listing of a search path
    Index,
}

/// Line-based range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

impl RangeLine {
    pub fn line(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3 or SHA1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// One rendered result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to root when possible, using '/' as separator
    pub path: String,

    /// Directive line in the requiring file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Structured payload (requested name, requiring file, depth, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub source_mode: SourceMode,

    pub meta: Meta,
}

impl ResultItem {
    /// Create a new indexed file result
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: Kind::File,
            path: path.into(),
            range: None,
            data: None,
            source_mode: SourceMode::Index,
            meta: Meta::default(),
        }
    }

    /// Create a new dependency result
    pub fn dependency(path: impl Into<String>, source_mode: SourceMode) -> Self {
        Self {
            kind: Kind::Dependency,
            path: path.into(),
            range: None,
            data: None,
            source_mode,
            meta: Meta::default(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_range(mut self, range: RangeLine) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Ordered collection of result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
