//! Depth-first dependency walker
//!
//! Reads a file line by line. A require directive suspends the current file,
//! the target is processed in full, then the current file resumes on the next
//! line. Frames live on an explicit stack, so deep require chains do not grow
//! the call stack.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::{PreprocessError, Result};
use crate::core::model::SourceMode;
use crate::preprocess::directive::{DirectiveMatcher, QuoteKind, RequireDirective};
use crate::preprocess::emitter::Emitter;
use crate::preprocess::resolver::ObjectResolver;
use crate::preprocess::strip::{CommentState, CommentStripper};

/// Separator appended after every processed file
const FILE_SEPARATOR: &str = "\n";

/// Where an included file was required from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub directive: RequireDirective,
    pub required_by: PathBuf,
    /// 1-based line of the directive in the requiring file
    pub line: u32,
    pub mode: SourceMode,
}

/// One file processed during a request, in inclusion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// Canonical path of the file
    pub path: PathBuf,
    /// `None` for the entry file
    pub origin: Option<Origin>,
    /// Nesting depth; the entry is 0
    pub depth: usize,
}

/// Output of one request
#[derive(Debug, Clone)]
pub struct Bundle {
    pub output: String,
    pub inclusions: Vec<Inclusion>,
}

/// A file being read
struct Frame {
    path: PathBuf,
    dir: PathBuf,
    reader: BufReader<File>,
    state: CommentState,
    line: u32,
}

/// Per-request walker state: visited set, inclusion log and output buffer
pub struct DependencyWalker<'a> {
    resolver: &'a ObjectResolver,
    matcher: &'a dyn DirectiveMatcher,
    stripper: Option<&'a CommentStripper>,
    carry_comment_state: bool,
    visited: HashSet<PathBuf>,
    inclusions: Vec<Inclusion>,
    emitter: Emitter,
}

impl<'a> DependencyWalker<'a> {
    pub fn new(
        resolver: &'a ObjectResolver,
        matcher: &'a dyn DirectiveMatcher,
        stripper: Option<&'a CommentStripper>,
    ) -> Self {
        Self {
            resolver,
            matcher,
            stripper,
            carry_comment_state: false,
            visited: HashSet::new(),
            inclusions: Vec::new(),
            emitter: Emitter::new(),
        }
    }

    /// Let block-comment state flow across file boundaries instead of
    /// restarting at `Code` for every included file
    pub fn carry_comment_state(mut self, carry: bool) -> Self {
        self.carry_comment_state = carry;
        self
    }

    /// Process `path` and everything it requires, appending to the output.
    ///
    /// A file already processed by this walker is skipped without being opened.
    pub fn process(&mut self, path: &Path) -> Result<()> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut buf: Vec<u8> = Vec::new();

        self.enter(path, None, CommentState::Code, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            buf.clear();
            let read = frame
                .reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| PreprocessError::file_read(&frame.path, e))?;

            if read == 0 {
                let finished_state = frame.state;
                debug!("Finished {}", frame.path.display());
                stack.pop();
                self.emitter.append(FILE_SEPARATOR);
                if self.carry_comment_state {
                    if let Some(parent) = stack.last_mut() {
                        parent.state = finished_state;
                    }
                }
                continue;
            }

            frame.line += 1;
            let line = String::from_utf8_lossy(&buf);

            if let Some(directive) = self.matcher.match_line(&line) {
                let base = match directive.kind {
                    QuoteKind::Quoted => Some(frame.dir.as_path()),
                    QuoteKind::Angle => None,
                };
                let resolved = self
                    .resolver
                    .resolve(&directive.target, base)
                    .map_err(|e| e.required_by(&frame.path))?;

                let origin = Origin {
                    directive,
                    required_by: frame.path.clone(),
                    line: frame.line,
                    mode: resolved.mode,
                };
                let child_state = if self.carry_comment_state {
                    frame.state
                } else {
                    CommentState::Code
                };
                self.enter(&resolved.path, Some(origin), child_state, &mut stack)?;
                continue;
            }

            match self.stripper {
                Some(stripper) => {
                    let (emit, next) = stripper.strip(&line, frame.state);
                    frame.state = next;
                    if let Some(text) = emit {
                        self.emitter.append(text);
                    }
                }
                None => self.emitter.append(&line),
            }
        }

        Ok(())
    }

    /// Mark `path` visited and push a frame for it, unless it was seen before
    fn enter(
        &mut self,
        path: &Path,
        origin: Option<Origin>,
        state: CommentState,
        stack: &mut Vec<Frame>,
    ) -> Result<()> {
        let key = path
            .canonicalize()
            .map_err(|e| PreprocessError::file_read(path, e))?;

        if !self.visited.insert(key.clone()) {
            debug!("Skipping {} (already included)", key.display());
            return Ok(());
        }

        let file = File::open(&key).map_err(|e| PreprocessError::file_read(path, e))?;
        debug!("Including {} at depth {}", key.display(), stack.len());

        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.inclusions.push(Inclusion {
            path: key,
            origin,
            depth: stack.len(),
        });
        stack.push(Frame {
            path: path.to_path_buf(),
            dir,
            reader: BufReader::new(file),
            state,
            line: 0,
        });
        Ok(())
    }

    /// Flatten the output and hand back the inclusion log
    pub fn finish(self) -> Bundle {
        Bundle {
            output: self.emitter.finalize(),
            inclusions: self.inclusions,
        }
    }
}
