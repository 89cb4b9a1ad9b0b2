//! Live theme directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use quire_core::{
    application::{ApplicationError, ports::{ThemeEntry, ThemeSource}},
    error::{QuireError, QuireResult},
};

use super::{GLOB_OPTIONS, compile_glob, glob_root, normalize_name};
use crate::filesystem::map_io_error;

/// Theme files read from a directory on disk.
///
/// A missing root behaves like an empty theme: lookups report not found
/// and globs match nothing.
#[derive(Debug, Clone)]
pub struct LocalTheme {
    root: PathBuf,
}

impl LocalTheme {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> QuireResult<(String, PathBuf)> {
        let name = normalize_name(name)?;
        let path = if name.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&name)
        };
        Ok((name, path))
    }
}

impl ThemeSource for LocalTheme {
    fn open(&self, name: &str) -> QuireResult<Vec<u8>> {
        let (name, path) = self.resolve(name)?;
        if path.is_dir() {
            return Err(not_found(name));
        }
        fs::read(&path).map_err(|e| io_error(name, &path, e, "read theme file"))
    }

    fn read_dir(&self, name: &str) -> QuireResult<Vec<ThemeEntry>> {
        let (name, path) = self.resolve(name)?;
        let read_dir =
            fs::read_dir(&path).map_err(|e| io_error(name, &path, e, "read theme directory"))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| map_io_error(&path, e, "read directory entry"))?;
            let file_type = entry
                .file_type()
                .map_err(|e| map_io_error(&entry.path(), e, "get file type"))?;
            entries.push(ThemeEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }

        entries.sort();
        Ok(entries)
    }

    /// Walks only below the pattern's literal directory, e.g. `partials/`
    /// for `partials/*.html`.
    fn glob(&self, pattern: &str) -> QuireResult<Vec<String>> {
        let compiled = compile_glob(pattern)?;
        let (prefix, depth) = glob_root(pattern);
        let (_, start) = self.resolve(&prefix)?;
        if !start.is_dir() {
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(&start).min_depth(1);
        if let Some(depth) = depth {
            walker = walker.max_depth(depth);
        }

        let mut matches = Vec::new();
        for walk_entry in walker {
            let walk_entry = walk_entry.map_err(|e| ApplicationError::FilesystemError {
                path: start.clone(),
                reason: format!("directory walk error: {e}"),
            })?;
            if !walk_entry.file_type().is_file() {
                continue;
            }

            let Ok(rel) = walk_entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if compiled.matches_with(&name, GLOB_OPTIONS) {
                matches.push(name);
            }
        }

        matches.sort();
        debug!(pattern, count = matches.len(), root = %start.display(), "theme glob");
        Ok(matches)
    }
}

fn not_found(name: String) -> QuireError {
    ApplicationError::ThemeFileNotFound { name }.into()
}

fn io_error(name: String, path: &Path, e: io::Error, operation: &str) -> QuireError {
    if e.kind() == io::ErrorKind::NotFound {
        not_found(name)
    } else {
        map_io_error(path, e, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn theme(files: &[(&str, &str)]) -> (TempDir, LocalTheme) {
        let temp = TempDir::new().unwrap();
        for (rel_path, text) in files {
            let full = temp.path().join(rel_path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        let theme = LocalTheme::new(temp.path());
        (temp, theme)
    }

    #[test]
    fn open_and_list() {
        let (_temp, theme) = theme(&[
            ("layouts/base.html", "base"),
            ("layouts/post.html", "post"),
            ("assets/css/site.css", "css"),
        ]);

        assert_eq!(theme.open("layouts/base.html").unwrap(), b"base");
        assert_eq!(
            theme.read_dir("assets").unwrap(),
            vec![ThemeEntry {
                name: "css".into(),
                is_dir: true
            }]
        );
        assert!(theme.open("layouts/none.html").unwrap_err().is_not_found());
        assert!(theme.open("layouts").unwrap_err().is_not_found());
    }

    #[test]
    fn glob_is_sorted_and_shallow() {
        let (_temp, theme) = theme(&[
            ("partials/nav.html", ""),
            ("partials/footer.html", ""),
            ("partials/nested/x.html", ""),
        ]);

        assert_eq!(
            theme.glob("partials/*.html").unwrap(),
            ["partials/footer.html", "partials/nav.html"]
        );
    }

    #[test]
    fn glob_ignores_other_directories() {
        let (_temp, theme) = theme(&[
            ("partials/nav.html", ""),
            ("assets/partials/nav.html", ""),
            ("layouts/base.html", ""),
        ]);

        assert_eq!(theme.glob("partials/*.html").unwrap(), ["partials/nav.html"]);
        assert_eq!(theme.glob("*/*.html").unwrap(), ["layouts/base.html", "partials/nav.html"]);
        assert_eq!(
            theme.glob("**/nav.html").unwrap(),
            ["assets/partials/nav.html", "partials/nav.html"]
        );
        assert!(theme.glob("missing/*.html").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_empty() {
        let theme = LocalTheme::new("/absolutely/does/not/exist");
        assert!(theme.glob("**/*").unwrap().is_empty());
        assert!(theme.read_dir("").unwrap_err().is_not_found());
    }

    #[test]
    fn refuses_parent_paths() {
        let (_temp, theme) = theme(&[]);
        let err = theme.open("../outside").unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
