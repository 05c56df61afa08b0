//! `build` and `deps` commands

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::model::{RangeLine, ResultItem, ResultSet, SourceMode};
use crate::core::paths::display_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{file_meta, HashAlgorithm};
use crate::preprocess::walker::Inclusion;
use crate::preprocess::Preprocessor;

/// Map inclusions to result items, keeping inclusion order
pub fn inclusions_to_result_set(
    inclusions: &[Inclusion],
    root: &Path,
    hash: Option<HashAlgorithm>,
) -> ResultSet {
    inclusions
        .iter()
        .map(|inclusion| {
            let path = display_path(&inclusion.path, root);
            let meta = file_meta(&inclusion.path, hash);

            match &inclusion.origin {
                None => ResultItem::dependency(path, SourceMode::Entry)
                    .with_meta(meta)
                    .with_data(json!({ "depth": inclusion.depth })),
                Some(origin) => ResultItem::dependency(path, origin.mode)
                    .with_meta(meta)
                    .with_range(RangeLine::line(origin.line))
                    .with_data(json!({
                        "requested": origin.directive.target,
                        "quote": origin.directive.kind.as_str(),
                        "required_by": display_path(&origin.required_by, root),
                        "depth": inclusion.depth,
                    })),
            }
        })
        .collect()
}

/// Run the build command: write the bundle to `output`, or stdout
pub fn run_build(pre: &Preprocessor, entry: &Path, output: Option<&Path>) -> Result<()> {
    let bundle = pre
        .bundle(entry)
        .with_context(|| format!("Failed to bundle {}", entry.display()))?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &bundle.output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(bundle.output.as_bytes())
                .context("Failed to write bundle to stdout")?;
            lock.flush()?;
        }
    }

    Ok(())
}

/// Run the deps command: list every file the bundle would contain
pub fn run_deps(
    pre: &Preprocessor,
    entry: &Path,
    hash: Option<HashAlgorithm>,
    config: RenderConfig,
) -> Result<()> {
    let bundle = pre
        .bundle(entry)
        .with_context(|| format!("Failed to resolve dependencies of {}", entry.display()))?;

    let result_set = inclusions_to_result_set(&bundle.inclusions, &pre.roots().app, hash);

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
