//! Preprocess module - flattens `//= require` directives into one bundle
//!
//! Provides:
//! - directive: require directive matching
//! - index: per-search-path file listing
//! - resolver: logical name to file path
//! - strip: whole-line comment stripping
//! - walker: depth-first inclusion with duplicate suppression
//! - emitter: append-only output buffer
//! - bundle: the `build` and `deps` commands

pub mod bundle;
pub mod directive;
pub mod emitter;
pub mod index;
pub mod resolver;
pub mod strip;
pub mod walker;

use std::path::Path;
use tracing::info;

use crate::core::config::Settings;
use crate::core::error::Result;
use crate::core::paths::Roots;
use directive::{DirectiveMatcher, RegexDirectiveMatcher};
use resolver::ObjectResolver;
use strip::CommentStripper;
use walker::{Bundle, DependencyWalker};

/// Settings compiled into a reusable engine.
///
/// The resolver (and its lazily built index) is shared by every request made
/// through one preprocessor. Each request gets its own walker state.
pub struct Preprocessor {
    resolver: ObjectResolver,
    matcher: Box<dyn DirectiveMatcher + Send + Sync>,
    stripper: Option<CommentStripper>,
    carry_comment_state: bool,
}

impl Preprocessor {
    /// Validate settings and compile their patterns.
    ///
    /// `settings.webroot`, when set, replaces the web root in `roots`; a relative
    /// value is taken from the application root.
    pub fn new(settings: &Settings, roots: Roots) -> Result<Self> {
        settings.validate()?;

        let roots = match &settings.webroot {
            Some(webroot) => {
                let webroot = roots.app.join(webroot);
                roots.with_webroot(webroot)
            }
            None => roots,
        };

        let matcher = RegexDirectiveMatcher::new(&settings.require_pattern)?;
        // Compiled even when stripping is off so bad patterns fail early
        let stripper = CommentStripper::new(&settings.comment_pattern)?;

        Ok(Self {
            resolver: ObjectResolver::new(settings.search_paths.clone(), roots),
            matcher: Box::new(matcher),
            stripper: settings.strip_comments.then_some(stripper),
            carry_comment_state: settings.carry_comment_state,
        })
    }

    /// Swap in a different directive matcher
    pub fn with_matcher(mut self, matcher: impl DirectiveMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn resolver(&self) -> &ObjectResolver {
        &self.resolver
    }

    pub fn roots(&self) -> &Roots {
        self.resolver.roots()
    }

    /// Fresh walker state for one request
    pub fn walker(&self) -> DependencyWalker<'_> {
        DependencyWalker::new(&self.resolver, &*self.matcher, self.stripper.as_ref())
            .carry_comment_state(self.carry_comment_state)
    }

    /// Expand `entry` and report every file that went into the output
    pub fn bundle(&self, entry: &Path) -> Result<Bundle> {
        let mut walker = self.walker();
        walker.process(entry)?;
        let bundle = walker.finish();
        info!(
            "Bundled {} file(s) into {} bytes from {}",
            bundle.inclusions.len(),
            bundle.output.len(),
            entry.display()
        );
        Ok(bundle)
    }

    /// Expand `entry` into a single string
    pub fn preprocess(&self, entry: &Path) -> Result<String> {
        self.bundle(entry).map(|bundle| bundle.output)
    }
}

/// One-shot convenience: compile settings and expand `entry`
pub fn preprocess(entry: &Path, settings: &Settings, roots: Roots) -> Result<String> {
    Preprocessor::new(settings, roots)?.preprocess(entry)
}
