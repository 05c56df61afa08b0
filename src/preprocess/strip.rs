//! Line-oriented comment stripping
//!
//! Only whole-line comments are recognised: a `//` line, a `/* ... */` line, or
//! a block that opens on one line and closes on a later one. Code followed by a
//! trailing comment on the same line is emitted unchanged. `/*!` openers are
//! kept, since they conventionally mark comments that must survive (licenses).

use regex::Regex;

use crate::core::config::CommentPattern;
use crate::core::error::{PreprocessError, Result};

/// Block-comment state carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Code,
    InBlock,
}

/// Compiled comment boundary patterns
#[derive(Debug, Clone)]
pub struct CommentStripper {
    inline: Regex,
    block_line: Regex,
    block_start: Regex,
    block_end: Regex,
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        PreprocessError::config(format!("invalid commentPattern.{} {:?}: {}", name, pattern, e))
    })
}

impl CommentStripper {
    pub fn new(patterns: &CommentPattern) -> Result<Self> {
        Ok(Self {
            inline: compile("inline", &patterns.inline)?,
            block_line: compile("blockLine", &patterns.block_line)?,
            block_start: compile("blockStart", &patterns.block_start)?,
            block_end: compile("blockEnd", &patterns.block_end)?,
        })
    }

    /// Decide what survives of `line` given the current state.
    ///
    /// Returns the text to emit (if any) and the state for the next line.
    pub fn strip<'a>(&self, line: &'a str, state: CommentState) -> (Option<&'a str>, CommentState) {
        if state == CommentState::InBlock {
            if self.block_end.is_match(line) {
                return (None, CommentState::Code);
            }
            return (None, CommentState::InBlock);
        }
        if self.inline.is_match(line) || self.block_line.is_match(line) {
            return (None, CommentState::Code);
        }
        if self.block_start.is_match(line) {
            return (None, CommentState::InBlock);
        }
        (Some(line), CommentState::Code)
    }
}

impl Default for CommentStripper {
    fn default() -> Self {
        Self::new(&CommentPattern::default()).expect("default comment patterns compile")
    }
}
