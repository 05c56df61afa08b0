//! Require directive detection
//!
//! Directives are comment lines of the form:
//! //= require "relative/name"
//! //= require <logical.name>

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::DEFAULT_REQUIRE_PATTERN;
use crate::core::error::{PreprocessError, Result};

/// Static regex for the default directive syntax
static DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_REQUIRE_PATTERN).expect("Invalid DEFAULT_RE regex"));

/// How a directive names its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    /// `"name"`: relative to the requiring file's directory
    Quoted,
    /// `<name>`: looked up through the search paths
    Angle,
}

impl QuoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::Quoted => "quoted",
            QuoteKind::Angle => "angle",
        }
    }
}

/// A parsed require directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireDirective {
    pub kind: QuoteKind,
    pub target: String,
}

/// Detects require directives in a single line
pub trait DirectiveMatcher {
    fn match_line(&self, line: &str) -> Option<RequireDirective>;
}

/// Regex-driven matcher. Group 1 captures the opening quote character,
/// group 2 the target name.
#[derive(Debug, Clone)]
pub struct RegexDirectiveMatcher {
    re: Regex,
}

impl RegexDirectiveMatcher {
    /// Compile a custom pattern, checking it has both capture groups
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            PreprocessError::config(format!("invalid requirePattern {:?}: {}", pattern, e))
        })?;
        // captures_len counts the implicit whole-match group
        if re.captures_len() < 3 {
            return Err(PreprocessError::config(format!(
                "requirePattern {:?} needs two capture groups (quote, target)",
                pattern
            )));
        }
        Ok(Self { re })
    }
}

impl Default for RegexDirectiveMatcher {
    fn default() -> Self {
        Self {
            re: DEFAULT_RE.clone(),
        }
    }
}

impl DirectiveMatcher for RegexDirectiveMatcher {
    fn match_line(&self, line: &str) -> Option<RequireDirective> {
        let caps = self.re.captures(line)?;
        let quote = caps.get(1)?.as_str();
        let target = caps.get(2)?.as_str().trim();
        if target.is_empty() {
            return None;
        }

        let kind = if quote == "\"" {
            QuoteKind::Quoted
        } else {
            QuoteKind::Angle
        };

        Some(RequireDirective {
            kind,
            target: target.to_string(),
        })
    }
}
