//! Operation surface for the HTTP layer.
//!
//! Every `path`, `root` and name argument is a caller token: either a `b64:`
//! token from [`crate::codec`] or a legacy raw string. Tokens are decoded, the
//! root is resolved, and only then does the matching engine run.
//!
//! [`FileManager`] is synchronous and blocking. [`AsyncFileManager`] runs each
//! call on tokio's blocking pool, one worker per in-flight call, with no
//! ordering between calls and no locking of overlapping paths.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::codec;
use crate::config::Config;
use crate::errors::{FileManagerError, Result};
use crate::fs_ops::{self, Entry, TransferRequest};
use crate::sandbox::{RootContext, RootResolver, combine_relative, leaf_name, normalize_relative, parent_relative};

#[derive(Debug, Clone)]
pub struct FileManager {
    config: Arc<Config>,
}

impl FileManager {
    /// `config` must already be validated (canonical web root).
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode a root token and resolve it. Never fails on bad selectors; those
    /// fall back to the default root.
    pub fn root(&self, root: Option<&str>) -> Result<RootContext> {
        let selector = codec::decode_opt(root);
        let ctx = RootResolver::from_config(&self.config).resolve(&selector)?;
        debug!(selector = %selector, root = %ctx.absolute_path().display(), "resolved root");
        Ok(ctx)
    }

    pub fn list(&self, path: &str, root: Option<&str>) -> Result<Vec<Entry>> {
        let ctx = self.root(root)?;
        fs_ops::list(&ctx, &codec::decode(path))
    }

    pub fn create_folder(&self, path: &str, folder_name: &str, root: Option<&str>) -> Result<()> {
        let ctx = self.root(root)?;
        fs_ops::create_folder(&ctx, &codec::decode(path), &codec::decode(folder_name))?;
        Ok(())
    }

    pub fn rename(&self, path: &str, new_name: &str, is_directory: bool, root: Option<&str>) -> Result<bool> {
        let ctx = self.root(root)?;
        fs_ops::rename(&ctx, &codec::decode(path), &codec::decode(new_name), is_directory)
    }

    pub fn delete(&self, path: &str, is_directory: bool, root: Option<&str>) -> Result<bool> {
        let ctx = self.root(root)?;
        fs_ops::delete(&ctx, &codec::decode(path), is_directory)
    }

    pub fn delete_multiple(
        &self,
        path: &str,
        file_names: &[String],
        directory_names: &[String],
        root: Option<&str>,
    ) -> Result<()> {
        let ctx = self.root(root)?;
        fs_ops::delete_multiple(
            &ctx,
            &codec::decode(path),
            &decode_all(file_names),
            &decode_all(directory_names),
        )?;
        Ok(())
    }

    /// Copy (or move) named entries. A `target_path` of None means one level up
    /// from `source_path`.
    pub fn copy(
        &self,
        source_path: &str,
        target_path: Option<&str>,
        file_names: &[String],
        directory_names: &[String],
        move_entries: bool,
        root: Option<&str>,
    ) -> Result<()> {
        let ctx = self.root(root)?;
        let source_path = codec::decode(source_path);
        let target_path = target_path.map(codec::decode);
        let file_names = decode_all(file_names);
        let directory_names = decode_all(directory_names);
        fs_ops::copy_or_move(
            &ctx,
            &TransferRequest {
                source_path: &source_path,
                target_path: target_path.as_deref(),
                file_names: &file_names,
                directory_names: &directory_names,
                move_entries,
            },
        )?;
        Ok(())
    }

    /// Returns the archive's leaf file name.
    pub fn create_zip(
        &self,
        path: &str,
        file_names: &[String],
        directory_names: &[String],
        root: Option<&str>,
    ) -> Result<String> {
        let ctx = self.root(root)?;
        fs_ops::create_zip(
            &ctx,
            &codec::decode(path),
            &decode_all(file_names),
            &decode_all(directory_names),
        )
    }

    /// False when the archive does not exist.
    pub fn extract_zip(&self, path: &str, zip_file_name: &str, root: Option<&str>) -> Result<bool> {
        let ctx = self.root(root)?;
        let summary = fs_ops::extract_zip(&ctx, &codec::decode(path), &codec::decode(zip_file_name))?;
        Ok(summary.is_some())
    }

    pub fn upload<R: Read>(&self, path: &str, root: Option<&str>, content: R, file_name: &str) -> Result<()> {
        let ctx = self.root(root)?;
        fs_ops::upload(&ctx, &codec::decode(path), &codec::decode(file_name), content)?;
        Ok(())
    }

    pub fn save_text(&self, path: &str, file_name: &str, content: &str, root: Option<&str>) -> Result<bool> {
        let ctx = self.root(root)?;
        fs_ops::save_text(&ctx, &codec::decode(path), &codec::decode(file_name), content)
    }

    /// Absolute path of an existing file, for downloads.
    pub fn read_path(&self, path: &str, file_name: &str, root: Option<&str>) -> Result<Option<PathBuf>> {
        let ctx = self.root(root)?;
        Ok(fs_ops::read_path(&ctx, &codec::decode(path), &codec::decode(file_name)))
    }

    /// Parent of a relative path token, "" at top level.
    pub fn parent(&self, path: &str) -> String {
        parent_relative(&codec::decode(path))
    }

    /// Public URL for `file_name` inside `path`, or None for an unusable name.
    pub fn file_url(&self, path: &str, file_name: &str, root: Option<&str>) -> Result<Option<String>> {
        let ctx = self.root(root)?;
        let Some(leaf) = leaf_name(&codec::decode(file_name)) else {
            return Ok(None);
        };
        let relative = combine_relative(&normalize_relative(&codec::decode(path)), &leaf);
        Ok(Some(ctx.file_url(&relative)))
    }
}

fn decode_all(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| codec::decode(t)).collect()
}

/// Async wrapper; each call runs the blocking operation on its own worker.
#[derive(Debug, Clone)]
pub struct AsyncFileManager {
    inner: FileManager,
}

impl AsyncFileManager {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            inner: FileManager::new(config),
        }
    }

    pub fn blocking(&self) -> &FileManager {
        &self.inner
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(FileManager) -> Result<T> + Send + 'static,
    {
        let fm = self.inner.clone();
        tokio::task::spawn_blocking(move || op(fm))
            .await
            .map_err(|e| FileManagerError::Worker(e.to_string()))?
    }

    pub async fn list(&self, path: String, root: Option<String>) -> Result<Vec<Entry>> {
        self.run(move |fm| fm.list(&path, root.as_deref())).await
    }

    pub async fn create_folder(&self, path: String, folder_name: String, root: Option<String>) -> Result<()> {
        self.run(move |fm| fm.create_folder(&path, &folder_name, root.as_deref()))
            .await
    }

    pub async fn rename(
        &self,
        path: String,
        new_name: String,
        is_directory: bool,
        root: Option<String>,
    ) -> Result<bool> {
        self.run(move |fm| fm.rename(&path, &new_name, is_directory, root.as_deref()))
            .await
    }

    pub async fn delete(&self, path: String, is_directory: bool, root: Option<String>) -> Result<bool> {
        self.run(move |fm| fm.delete(&path, is_directory, root.as_deref()))
            .await
    }

    pub async fn delete_multiple(
        &self,
        path: String,
        file_names: Vec<String>,
        directory_names: Vec<String>,
        root: Option<String>,
    ) -> Result<()> {
        self.run(move |fm| fm.delete_multiple(&path, &file_names, &directory_names, root.as_deref()))
            .await
    }

    pub async fn copy(
        &self,
        source_path: String,
        target_path: Option<String>,
        file_names: Vec<String>,
        directory_names: Vec<String>,
        move_entries: bool,
        root: Option<String>,
    ) -> Result<()> {
        self.run(move |fm| {
            fm.copy(
                &source_path,
                target_path.as_deref(),
                &file_names,
                &directory_names,
                move_entries,
                root.as_deref(),
            )
        })
        .await
    }

    pub async fn create_zip(
        &self,
        path: String,
        file_names: Vec<String>,
        directory_names: Vec<String>,
        root: Option<String>,
    ) -> Result<String> {
        self.run(move |fm| fm.create_zip(&path, &file_names, &directory_names, root.as_deref()))
            .await
    }

    pub async fn extract_zip(&self, path: String, zip_file_name: String, root: Option<String>) -> Result<bool> {
        self.run(move |fm| fm.extract_zip(&path, &zip_file_name, root.as_deref()))
            .await
    }

    /// `content` is read on the worker thread, so it must be a blocking reader.
    pub async fn upload<R>(&self, path: String, root: Option<String>, content: R, file_name: String) -> Result<()>
    where
        R: Read + Send + 'static,
    {
        self.run(move |fm| fm.upload(&path, root.as_deref(), content, &file_name))
            .await
    }

    pub async fn save_text(
        &self,
        path: String,
        file_name: String,
        content: String,
        root: Option<String>,
    ) -> Result<bool> {
        self.run(move |fm| fm.save_text(&path, &file_name, &content, root.as_deref()))
            .await
    }

    pub async fn read_path(&self, path: String, file_name: String, root: Option<String>) -> Result<Option<PathBuf>> {
        self.run(move |fm| fm.read_path(&path, &file_name, root.as_deref()))
            .await
    }
}
