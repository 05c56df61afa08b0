//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::config::{Overrides, Settings};
use crate::core::paths::Roots;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::util::HashAlgorithm;
use crate::preprocess::Preprocessor;

/// jsfold - flatten `//= require` directives into one JavaScript bundle.
#[derive(Parser, Debug)]
#[command(name = "jsfold")]
#[command(
    author,
    version,
    about,
    long_about = r#"jsfold expands require directives embedded in JavaScript comments:

    //= require "relative/name"   resolved next to the requiring file
    //= require <LogicalName>     resolved through the configured search paths

Each file is emitted at most once, at the position of its first require.

Settings are read from ROOT/jsfold.json (or --config) and may be overridden
with --search-path and --strip-comments. At least one search path is required.

Examples:
    jsfold build webroot/js/app.js -o webroot/js/app.bundle.js
    jsfold --search-path 'WEBROOT/js' deps webroot/js/app.js --format md
    jsfold resolve DateUtils
    jsfold index
"#
)]
pub struct Cli {
    /// Application root; substituted for APP in search paths.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Application root (defaults to the current directory).\n\n\
Substituted for the APP placeholder in search paths. WEBROOT defaults to\n\
ROOT/webroot. Relative file arguments are interpreted relative to ROOT."
    )]
    pub root: PathBuf,

    /// Settings file (JSON). Defaults to ROOT/jsfold.json when present.
    #[arg(long, global = true, value_name = "FILE", env = "JSFOLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search path (repeatable); replaces the settings file's list.
    #[arg(
        long = "search-path",
        global = true,
        value_name = "DIR",
        long_help = "Directory searched for angle-bracket requires. Repeat for several;\n\
order matters and the first match wins. May contain APP or WEBROOT.\n\n\
When given, replaces searchPaths from the settings file."
    )]
    pub search_paths: Vec<String>,

    /// Strip full-line and block comments from the output.
    #[arg(long, global = true)]
    pub strip_comments: bool,

    /// Output format for deps/resolve/index (jsonl/json/md/raw).
    #[arg(long, global = true, default_value = "jsonl", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand an entry file into a single bundle.
    #[command(
        long_about = "Expand ENTRY and everything it requires, depth first, and write the\n\
concatenated result to stdout (or --output).\n\n\
Any unresolved require or unreadable file aborts the build; nothing is written.\n\n\
Examples:\n\
  jsfold build webroot/js/app.js\n\
  jsfold build webroot/js/app.js -o webroot/js/app.bundle.js --strip-comments\n"
    )]
    Build {
        /// Entry file (relative to ROOT unless absolute).
        #[arg(value_name = "ENTRY")]
        entry: PathBuf,

        /// Write the bundle to FILE instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the files a bundle would contain, in inclusion order.
    #[command(
        long_about = "Walk ENTRY exactly as build would and emit one result per included\n\
file, in the order it appears in the bundle. Each result records the directive\n\
line, the requested name, the requiring file and the nesting depth.\n\n\
Examples:\n\
  jsfold deps webroot/js/app.js\n\
  jsfold deps webroot/js/app.js --hash sha1 --format json --pretty\n"
    )]
    Deps {
        /// Entry file (relative to ROOT unless absolute).
        #[arg(value_name = "ENTRY")]
        entry: PathBuf,

        /// Add a content hash to each result (xxh3 or sha1).
        #[arg(long, value_parser = ["xxh3", "sha1"], value_name = "ALGO")]
        hash: Option<String>,
    },

    /// Resolve one logical name to a file path.
    #[command(
        long_about = "Resolve NAME the way a require directive would.\n\n\
Without --from, NAME is looked up through the search paths (like <NAME>).\n\
With --from FILE, NAME resolves next to FILE (like \"NAME\"); the result may not exist.\n\n\
Examples:\n\
  jsfold resolve DateUtils\n\
  jsfold resolve helpers --from webroot/js/admin/main.js\n"
    )]
    Resolve {
        /// Logical name, e.g. MyModule or lib/DateUtils.
        #[arg(value_name = "NAME")]
        name: String,

        /// Resolve relative to this file's directory.
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },

    /// List every file in the configured search paths.
    Index,
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows --verbose/--quiet.
pub fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "jsfold=debug"
    } else if quiet {
        "jsfold=error"
    } else {
        "jsfold=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve a CLI path argument against the root
fn under_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("Root directory not found: {}", cli.root.display()))?;

    let overrides = Overrides {
        search_paths: cli.search_paths,
        strip_comments: cli.strip_comments,
    };
    let config_path = cli.config.as_deref().map(|p| under_root(&root, p));
    let settings = Settings::load(&root, config_path.as_deref(), &overrides)?;
    let pre = Preprocessor::new(&settings, Roots::new(&root))?;

    match cli.command {
        Commands::Build { entry, output } => {
            let output = output.map(|o| under_root(&root, &o));
            crate::preprocess::bundle::run_build(
                &pre,
                &under_root(&root, &entry),
                output.as_deref(),
            )
        }

        Commands::Deps { entry, hash } => {
            let hash = hash.as_deref().map(|h| h.parse::<HashAlgorithm>().unwrap_or_default());
            crate::preprocess::bundle::run_deps(
                &pre,
                &under_root(&root, &entry),
                hash,
                render_config,
            )
        }

        Commands::Resolve { name, from } => {
            let from = from.map(|f| under_root(&root, &f));
            crate::preprocess::resolver::run_resolve(
                pre.resolver(),
                &name,
                from.as_deref(),
                render_config,
            )
        }

        Commands::Index => {
            crate::preprocess::index::run_index(&settings.search_paths, pre.roots(), render_config)
        }
    }
}
