//! jsfold - flattens `//= require` directives into a single JavaScript bundle
//!
//! jsfold provides:
//! - Directive parsing for `//= require "x"` and `//= require <y>`
//! - Logical name resolution across ordered search paths
//! - Depth-first inclusion, each file emitted at most once
//! - Optional whole-line comment stripping
//! - Unified output format (jsonl/json/md/raw) for inspection commands

pub mod cli;
pub mod core;
pub mod preprocess;

pub use crate::core::config::Settings;
pub use crate::core::error::{PreprocessError, Result};
pub use crate::core::paths::Roots;
pub use crate::preprocess::{preprocess, Preprocessor};
