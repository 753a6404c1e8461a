//! Filesystem-backed document store.
//!
//! Documents live directly in the data directory. Every content-changing
//! update first copies the previous content into `<stem>/<timestamp><ext>`,
//! so each document carries its own version folder. Deleting a document
//! removes that folder with it.
//!
//! Mutating operations are serialised by an internal lock. Snapshots are
//! named at second resolution: two changing updates within the same second
//! share a snapshot name and the later one overwrites the earlier.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::fs::{Filesystem, LocalFs};
use crate::naming::{
    copy_name, image_document_name, is_safe_segment, is_valid_document_name,
    is_valid_image_url, split_name,
};
use crate::render::{render_by_name, RenderedContent};
use crate::version::snapshot_name;

/// Result of [`DocumentStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Content changed; the previous content was saved as `snapshot`.
    Updated { snapshot: String },
    /// New content was identical to the current content. Nothing was written.
    NoChange,
}

/// Document lifecycle operations over a [`Filesystem`].
pub struct DocumentStore<F: Filesystem = LocalFs> {
    fs: F,
    write_lock: Mutex<()>,
}

impl DocumentStore<LocalFs> {
    /// Open a store on `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self::new(LocalFs::new(data_dir)))
    }
}

impl<F: Filesystem> DocumentStore<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            write_lock: Mutex::new(()),
        }
    }

    /// Names of all documents, sorted.
    pub fn list(&self) -> Result<Vec<String>, CoreError> {
        let mut names = self.fs.list_files(Path::new(""))?;
        names.sort();
        Ok(names)
    }

    /// `true` if a document called `filename` exists.
    pub fn exists(&self, filename: &str) -> bool {
        is_safe_segment(filename) && self.fs.is_file(Path::new(filename))
    }

    /// Create an empty document, truncating any existing file of that name.
    pub fn create(&self, filename: &str) -> Result<String, CoreError> {
        if !is_valid_document_name(filename) {
            return Err(CoreError::InvalidName);
        }

        let _guard = self.lock();
        self.fs.write(Path::new(filename), b"")?;
        tracing::info!(filename, "Document created");
        Ok(filename.to_string())
    }

    /// Read a document and render it by extension.
    pub fn read(&self, filename: &str) -> Result<RenderedContent, CoreError> {
        let content = self.read_existing(filename)?;
        Ok(render_by_name(filename, content))
    }

    /// Raw text of a document, for editing.
    pub fn source(&self, filename: &str) -> Result<String, CoreError> {
        let content = self.read_existing(filename)?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// Replace a document's content, snapshotting the old content first.
    pub fn update(&self, filename: &str, content: &[u8]) -> Result<UpdateOutcome, CoreError> {
        self.update_at(filename, content, Utc::now())
    }

    /// [`update`](Self::update) with an explicit snapshot time.
    pub fn update_at(
        &self,
        filename: &str,
        content: &[u8],
        at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, CoreError> {
        let _guard = self.lock();

        let current = self.read_existing(filename)?;
        if current == content {
            tracing::debug!(filename, "Update left content unchanged");
            return Ok(UpdateOutcome::NoChange);
        }

        let (_, ext) = split_name(filename);
        let version_dir = version_dir(filename)?;
        self.fs.create_dir_all(version_dir)?;

        let snapshot = snapshot_name(at, ext);
        self.fs
            .copy(Path::new(filename), &version_dir.join(&snapshot))?;
        self.fs.write(Path::new(filename), content)?;

        tracing::info!(filename, %snapshot, "Document updated");
        Ok(UpdateOutcome::Updated { snapshot })
    }

    /// Delete a document together with its version folder.
    pub fn delete(&self, filename: &str) -> Result<(), CoreError> {
        let _guard = self.lock();

        let path = self.existing_path(filename)?;
        self.fs.remove_file(path)?;

        if let Ok(version_dir) = version_dir(filename) {
            if self.fs.is_dir(version_dir) {
                self.fs.remove_dir_all(version_dir)?;
            }
        }

        tracing::info!(filename, "Document deleted");
        Ok(())
    }

    /// Copy a document to the lowest free `name(N).ext` slot.
    pub fn copy(&self, filename: &str) -> Result<String, CoreError> {
        let _guard = self.lock();

        let path = self.existing_path(filename)?;
        let existing = self.fs.list_files(Path::new(""))?;
        let target = copy_name(filename, existing.iter().map(String::as_str));

        self.fs.copy(path, Path::new(&target))?;
        tracing::info!(filename, copy = %target, "Document copied");
        Ok(target)
    }

    /// Snapshot names for a document stem, oldest first.
    pub fn list_versions(&self, stem: &str, ext: &str) -> Result<Vec<String>, CoreError> {
        if !is_safe_segment(stem) || !self.fs.is_dir(Path::new(stem)) {
            return Ok(Vec::new());
        }

        let mut versions: Vec<String> = self
            .fs
            .list_files(Path::new(stem))?
            .into_iter()
            .filter(|name| name.ends_with(ext))
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Read a snapshot and render it like [`read`](Self::read).
    pub fn view_version(&self, stem: &str, version: &str) -> Result<RenderedContent, CoreError> {
        if !is_safe_segment(stem) || !is_safe_segment(version) {
            return Err(CoreError::not_found(format!("{stem}/{version}")));
        }

        let path = Path::new(stem).join(version);
        if !self.fs.is_file(&path) {
            return Err(CoreError::not_found(format!("{stem}/{version}")));
        }

        let content = self.fs.read(&path)?;
        Ok(render_by_name(version, content))
    }

    /// Write a markdown document embedding the image at `url`.
    ///
    /// Overwrites any existing document with the derived name.
    pub fn create_image_document(&self, url: &str) -> Result<String, CoreError> {
        if !is_valid_image_url(url) {
            return Err(CoreError::InvalidImageUrl);
        }
        let filename = image_document_name(url).ok_or(CoreError::InvalidImageUrl)?;
        let content = format!("![{filename}]({url})");

        let _guard = self.lock();
        self.fs.write(Path::new(&filename), content.as_bytes())?;
        tracing::info!(%filename, url, "Image document created");
        Ok(filename)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn existing_path<'a>(&self, filename: &'a str) -> Result<&'a Path, CoreError> {
        let path = Path::new(filename);
        if is_safe_segment(filename) && self.fs.is_file(path) {
            Ok(path)
        } else {
            Err(CoreError::not_found(filename))
        }
    }

    fn read_existing(&self, filename: &str) -> Result<Vec<u8>, CoreError> {
        let path = self.existing_path(filename)?;
        Ok(self.fs.read(path)?)
    }
}

/// Version folder of `filename`, named after its stem.
fn version_dir(filename: &str) -> Result<&Path, CoreError> {
    let (stem, _) = split_name(filename);
    if is_safe_segment(stem) {
        Ok(Path::new(stem))
    } else {
        Err(CoreError::not_found(filename))
    }
}
