//! Error taxonomy for the preprocessing engine
//!
//! Every variant is fatal for the request that raised it. Nothing in the
//! engine retries or recovers locally.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Errors raised while loading settings or preprocessing a file.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// Missing or invalid settings, raised before any file is opened
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A configured search path does not exist or cannot be listed
    #[error("search path not found: {}", .path.display())]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required logical name matched no file
    #[error("could not locate file for '{}'{}", .name, required_by_suffix(.required_by))]
    UnresolvedDependency {
        name: String,
        required_by: Option<PathBuf>,
    },

    /// An entry or included file could not be opened or read
    #[error("failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn required_by_suffix(required_by: &Option<PathBuf>) -> String {
    match required_by {
        Some(path) => format!(" (required by {})", path.display()),
        None => String::new(),
    }
}

impl PreprocessError {
    pub fn config(message: impl Into<String>) -> Self {
        PreprocessError::Configuration(message.into())
    }

    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        PreprocessError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the requiring file to an unresolved dependency.
    ///
    /// Other variants pass through untouched.
    pub fn required_by(self, requirer: &Path) -> Self {
        match self {
            PreprocessError::UnresolvedDependency { name, .. } => {
                PreprocessError::UnresolvedDependency {
                    name,
                    required_by: Some(requirer.to_path_buf()),
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_without_requirer() {
        let err = PreprocessError::UnresolvedDependency {
            name: "MyModule".to_string(),
            required_by: None,
        };
        assert_eq!(err.to_string(), "could not locate file for 'MyModule'");
    }

    #[test]
    fn test_required_by_fills_in_requirer() {
        let err = PreprocessError::UnresolvedDependency {
            name: "missing".to_string(),
            required_by: None,
        }
        .required_by(Path::new("/app/js/main.js"));

        let message = err.to_string();
        assert!(message.contains("'missing'"));
        assert!(message.contains("required by /app/js/main.js"));
    }

    #[test]
    fn test_required_by_leaves_other_errors_alone() {
        let err = PreprocessError::config("boom").required_by(Path::new("/x.js"));
        assert!(matches!(err, PreprocessError::Configuration(_)));
    }
}
