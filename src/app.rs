//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the web root, and runs
//! the requested gateway operation.

use anyhow::{Context, Result};
use std::fs::File;
use std::sync::Arc;
use tracing::{debug, error};

use webfm::codec;
use webfm::config::{Config, ConfigStore, default_config_path};
use webfm::output as out;
use webfm::{FileManager, FileManagerError};

use crate::cli::{Args, Command, TransferArgs};
use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Pure codec commands need neither config nor logging.
    match &args.command {
        Command::Encode { text } => {
            out::print_user(&codec::encode(text));
            return Ok(());
        }
        Command::Decode { token } => {
            out::print_user(&codec::decode(token));
            return Ok(());
        }
        _ => {}
    }

    let mut cfg = load_config(&args)?;
    args.apply_overrides(&mut cfg);

    // Hold the guard until exit so the file appender flushes.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;
    debug!("Starting webfm: {:?}", args.command);

    cfg.validate().inspect_err(report)?;
    let fm = FileManager::new(Arc::new(cfg));
    execute(&fm, args.command).inspect_err(|e| {
        if let Some(fe) = e.downcast_ref::<FileManagerError>() {
            report(fe);
        } else {
            error!(error = ?e, "Operation failed");
        }
    })
}

/// File values first; CLI overrides are applied by the caller.
fn load_config(args: &Args) -> Result<Config> {
    let path = args.config.clone().or_else(default_config_path);
    match path {
        Some(path) if path.exists() => {
            let snapshot = ConfigStore::new(&path)
                .snapshot()
                .with_context(|| format!("loading config {}", path.display()))?;
            Ok((*snapshot).clone())
        }
        Some(path) if args.config.is_some() => {
            anyhow::bail!("config file not found: {}", path.display())
        }
        _ => Ok(Config::default()),
    }
}

fn report(e: &FileManagerError) {
    let code = e.code();
    match e {
        FileManagerError::Io { op, path, .. } => {
            error!(code, kind = ?e.io_kind(), %op, path = %path.display(), "Operation failed: {e}")
        }
        FileManagerError::Archive { path, .. } => {
            error!(code, path = %path.display(), "Archive unreadable: {e}")
        }
        _ => error!(code, "{e}"),
    }
}

fn report_bool(done: bool, what: &str) {
    if done {
        out::print_success(what);
    } else {
        out::print_skipped(&format!("{what} (not found or invalid name)"));
    }
}

fn execute(fm: &FileManager, command: Command) -> Result<()> {
    match command {
        Command::List { path, root } => {
            let entries = fm.list(&path, root.root.as_deref())?;
            out::print_json(&entries)?;
        }
        Command::Mkdir { path, name, root } => {
            fm.create_folder(&path, &name, root.root.as_deref())?;
            out::print_success(&format!("created folder {}", codec::decode(&name)));
        }
        Command::Rename { path, new_name, dir, root } => {
            let done = fm.rename(&path, &new_name, dir, root.root.as_deref())?;
            report_bool(done, "rename");
        }
        Command::Delete { path, dir, root } => {
            let done = fm.delete(&path, dir, root.root.as_deref())?;
            report_bool(done, "delete");
        }
        Command::DeleteMany { path, files, dirs, root } => {
            fm.delete_multiple(&path, &files, &dirs, root.root.as_deref())?;
            out::print_success("delete-many");
        }
        Command::Copy(t) => transfer(fm, t, false)?,
        Command::Move(t) => transfer(fm, t, true)?,
        Command::Zip { path, files, dirs, root } => {
            let name = fm.create_zip(&path, &files, &dirs, root.root.as_deref())?;
            out::print_user(&name);
        }
        Command::Unzip { path, zip_name, root } => {
            let done = fm.extract_zip(&path, &zip_name, root.root.as_deref())?;
            report_bool(done, "unzip");
        }
        Command::Upload {
            path,
            local_file,
            name,
            root,
        } => {
            let file_name = match name {
                Some(n) => n,
                None => local_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            let reader = File::open(&local_file).with_context(|| format!("opening {}", local_file.display()))?;
            fm.upload(&path, root.root.as_deref(), reader, &file_name)?;
            out::print_success(&format!("uploaded {}", local_file.display()));
        }
        Command::SaveText {
            path,
            name,
            content,
            root,
        } => {
            let done = fm.save_text(&path, &name, &content, root.root.as_deref())?;
            report_bool(done, "save-text");
        }
        Command::Encode { .. } | Command::Decode { .. } => {}
    }
    Ok(())
}

fn transfer(fm: &FileManager, t: TransferArgs, move_entries: bool) -> Result<()> {
    fm.copy(
        &t.source,
        t.target.as_deref(),
        &t.files,
        &t.dirs,
        move_entries,
        t.root.root.as_deref(),
    )?;
    out::print_success(if move_entries { "move" } else { "copy" });
    Ok(())
}
