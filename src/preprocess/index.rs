//! Search-path file index
//!
//! Lists the files directly inside each configured search directory. The index
//! is built once and never refreshed; a new run builds a new one.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::error::{PreprocessError, Result};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::paths::{display_path, Roots};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::file_meta;

/// Files found in one search directory
#[derive(Debug, Clone)]
pub struct IndexedDir {
    pub dir: PathBuf,
    pub files: BTreeSet<String>,
}

impl IndexedDir {
    /// Whether `filename` sits directly inside this directory
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains(filename)
    }
}

/// Ordered mapping from substituted search directory to its file names
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    dirs: Vec<IndexedDir>,
}

impl PathIndex {
    /// Substitute placeholders in every search path and list its files.
    ///
    /// Fails on the first directory that is missing or unreadable.
    pub fn build(search_paths: &[String], roots: &Roots) -> Result<Self> {
        let mut dirs: Vec<IndexedDir> = Vec::with_capacity(search_paths.len());

        for search_path in search_paths {
            let dir = roots.substitute(search_path);
            if dirs.iter().any(|d| d.dir == dir) {
                continue;
            }
            let files = list_files(&dir)?;
            debug!(
                "Indexed {} file(s) in {} (from {:?})",
                files.len(),
                dir.display(),
                search_path
            );
            dirs.push(IndexedDir { dir, files });
        }

        Ok(Self { dirs })
    }

    /// Indexed directories in configured order
    pub fn dirs(&self) -> impl Iterator<Item = &IndexedDir> {
        self.dirs.iter()
    }

}

/// List regular files (not directories) directly inside `dir`
fn list_files(dir: &Path) -> Result<BTreeSet<String>> {
    let not_found = |source: std::io::Error| PreprocessError::DirectoryNotFound {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.is_dir() {
        return Err(not_found(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not a directory",
        )));
    }

    let mut files = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            not_found(source)
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.insert(name.to_string());
        }
    }

    Ok(files)
}

/// List every indexed file as a result set (sorted for stability)
pub fn index_files(search_paths: &[String], roots: &Roots) -> Result<ResultSet> {
    let index = PathIndex::build(search_paths, roots)?;

    let mut result_set = ResultSet::new();
    for indexed in index.dirs() {
        for file in &indexed.files {
            let path = indexed.dir.join(file);
            let item = ResultItem::file(display_path(&path, &roots.app))
                .with_meta(file_meta(&path, None));
            result_set.push(item);
        }
    }

    result_set.sort();
    Ok(result_set)
}

/// Run the index command
pub fn run_index(search_paths: &[String], roots: &Roots, config: RenderConfig) -> anyhow::Result<()> {
    let result_set = index_files(search_paths, roots)?;

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
