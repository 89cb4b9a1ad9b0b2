//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use quire_core::{
    application::{ApplicationError, ports::Filesystem},
    error::QuireResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle and give the
/// other to the service under test.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    /// Writes under this path fail. Lets tests exercise rollback.
    fail_on: Option<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Make every write at or below `path` fail.
    pub fn fail_writes_under(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_on = Some(path.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Read a file as text (testing helper).
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        self.read_file(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> QuireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> QuireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(fail_on) = &inner.fail_on {
            if path.starts_with(fail_on) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "injected write failure".into(),
                }
                .into());
            }
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> QuireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> QuireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.directories.contains(from) {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Source directory does not exist".into(),
            }
            .into());
        }

        let moved = |p: &Path| p.strip_prefix(from).map(|rest| to.join(rest)).ok();

        let dirs: Vec<PathBuf> = inner.directories.iter().cloned().collect();
        inner.directories = dirs
            .into_iter()
            .map(|d| moved(&d).unwrap_or(d))
            .collect();

        let files = std::mem::take(&mut inner.files);
        inner.files = files
            .into_iter()
            .map(|(p, bytes)| (moved(&p).unwrap_or(p), bytes))
            .collect();

        Ok(())
    }
}
