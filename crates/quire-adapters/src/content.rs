//! Markdown content discovery.
//!
//! Walks a content directory recursively and hands every `*.md` file to the
//! index service. Other files are ignored.
//!
//! # Directory layout expected
//!
//! ```text
//! content/
//! ├── hello-world.md          ← slug "hello-world"
//! ├── drafts/
//! │   └── second-post.md      ← nested files are indexed too
//! └── images/
//!     └── cover.png           ← ignored
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use quire_core::{
    application::{ApplicationError, ports::ContentSource},
    error::QuireResult,
};

use crate::filesystem::map_io_error;

/// Extension of the documents that become articles.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Reads markdown documents from a local directory.
#[derive(Debug, Clone)]
pub struct LocalContent {
    root: PathBuf,
}

impl LocalContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for LocalContent {
    #[instrument(skip(self), fields(dir = %self.root.display()))]
    fn documents(&self) -> QuireResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: "content directory not found".into(),
            }
            .into());
        }

        let mut documents = Vec::new();
        for walk_entry in WalkDir::new(&self.root).min_depth(1) {
            let walk_entry = walk_entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: format!("directory walk error: {e}"),
            })?;

            if !walk_entry.file_type().is_file() {
                continue;
            }

            let path = walk_entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(MARKDOWN_EXTENSION) {
                documents.push(path.to_path_buf());
            }
        }

        documents.sort();
        debug!(count = documents.len(), "found markdown documents");
        Ok(documents)
    }

    fn read(&self, path: &Path) -> QuireResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read document"))
    }
}
