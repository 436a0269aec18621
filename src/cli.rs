//! CLI definition and parsing.
//! Defines Args (global flags) and Command (one subcommand per gateway operation).
//!
//! Notes:
//! - Path, root and name arguments are passed to the gateway as tokens, so both
//!   `b64:` tokens and plain strings work.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use webfm::config::{Config, LogLevel};

/// Sandboxed file manager operations on a web root.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Sandboxed web-root file manager (Rust)")]
pub struct Args {
    /// Config file to load instead of $WEBFM_CONFIG / the default location.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the public web root directory.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub web_root: Option<PathBuf>,

    /// Override the name of the auto-created default root.
    #[arg(long, global = true)]
    pub default_root: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Selector for the active root; omitted means the default root.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RootArg {
    #[arg(long, short = 'r')]
    pub root: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List a directory as JSON.
    List {
        #[arg(default_value = "")]
        path: String,
        #[command(flatten)]
        root: RootArg,
    },
    /// Create a folder inside PATH.
    Mkdir {
        path: String,
        name: String,
        #[command(flatten)]
        root: RootArg,
    },
    /// Rename a file or directory in place.
    Rename {
        path: String,
        new_name: String,
        #[arg(long)]
        dir: bool,
        #[command(flatten)]
        root: RootArg,
    },
    /// Delete one file or directory.
    Delete {
        path: String,
        #[arg(long)]
        dir: bool,
        #[command(flatten)]
        root: RootArg,
    },
    /// Delete several entries directly inside PATH.
    DeleteMany {
        path: String,
        #[arg(long = "file")]
        files: Vec<String>,
        #[arg(long = "dir")]
        dirs: Vec<String>,
        #[command(flatten)]
        root: RootArg,
    },
    /// Copy entries from SOURCE (into its parent unless --target is given).
    Copy(TransferArgs),
    /// Move entries from SOURCE (into its parent unless --target is given).
    Move(TransferArgs),
    /// Zip entries inside PATH; prints the archive name.
    Zip {
        path: String,
        #[arg(long = "file")]
        files: Vec<String>,
        #[arg(long = "dir")]
        dirs: Vec<String>,
        #[command(flatten)]
        root: RootArg,
    },
    /// Extract an archive inside PATH into a new directory.
    Unzip {
        path: String,
        zip_name: String,
        #[command(flatten)]
        root: RootArg,
    },
    /// Upload a local file into PATH (never overwrites).
    Upload {
        path: String,
        #[arg(value_hint = ValueHint::FilePath)]
        local_file: PathBuf,
        /// Name to store under; defaults to the local file's name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        root: RootArg,
    },
    /// Write a text file inside PATH (overwrites).
    SaveText {
        path: String,
        name: String,
        content: String,
        #[command(flatten)]
        root: RootArg,
    },
    /// Print the token for TEXT.
    Encode { text: String },
    /// Print the text for TOKEN.
    Decode { token: String },
}

#[derive(clap::Args, Debug, Clone)]
pub struct TransferArgs {
    pub source: String,
    #[arg(long)]
    pub target: Option<String>,
    #[arg(long = "file")]
    pub files: Vec<String>,
    #[arg(long = "dir")]
    pub dirs: Vec<String>,
    #[command(flatten)]
    pub root: RootArg,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(web_root) = &self.web_root {
            cfg.web_root = web_root.clone();
        }
        if let Some(default_root) = &self.default_root {
            cfg.default_root = default_root.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(log_file) = &self.log_file {
            cfg.log_file = Some(log_file.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
