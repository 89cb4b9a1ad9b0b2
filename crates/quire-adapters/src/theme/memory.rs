//! In-memory theme, including the theme embedded in the binary.

use std::collections::BTreeMap;

use quire_core::{
    application::{ApplicationError, ports::{ThemeEntry, ThemeSource}},
    error::QuireResult,
};

use super::{GLOB_OPTIONS, compile_glob, normalize_name};

/// Files of the default theme, compiled in.
const BUILTIN_FILES: &[(&str, &[u8])] = &[
    ("layouts/base.html", include_bytes!("../../theme/layouts/base.html")),
    ("layouts/post.html", include_bytes!("../../theme/layouts/post.html")),
    ("pages/index.html", include_bytes!("../../theme/pages/index.html")),
    ("pages/blog/index.html", include_bytes!("../../theme/pages/blog/index.html")),
    ("pages/404.html", include_bytes!("../../theme/pages/404.html")),
    ("partials/nav.html", include_bytes!("../../theme/partials/nav.html")),
    ("partials/article-list.html", include_bytes!("../../theme/partials/article-list.html")),
    ("assets/css/site.css", include_bytes!("../../theme/assets/css/site.css")),
    ("assets/robots.txt", include_bytes!("../../theme/assets/robots.txt")),
];

/// Theme files held in memory. Directories are implied by file names.
#[derive(Debug, Clone, Default)]
pub struct MemoryTheme {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default theme shipped with quire.
    pub fn builtin() -> Self {
        BUILTIN_FILES
            .iter()
            .fold(Self::new(), |theme, (name, bytes)| theme.with_file(name, *bytes))
    }

    /// Add or replace a file. Invalid names are ignored.
    pub fn with_file(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        if let Ok(name) = normalize_name(name) {
            if !name.is_empty() {
                self.files.insert(name, content.into());
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ThemeSource for MemoryTheme {
    fn open(&self, name: &str) -> QuireResult<Vec<u8>> {
        let name = normalize_name(name)?;
        self.files
            .get(&name)
            .cloned()
            .ok_or_else(|| ApplicationError::ThemeFileNotFound { name }.into())
    }

    fn read_dir(&self, name: &str) -> QuireResult<Vec<ThemeEntry>> {
        let name = normalize_name(name)?;
        let prefix = if name.is_empty() {
            String::new()
        } else {
            format!("{name}/")
        };

        // name → is_dir; BTreeMap keeps the listing sorted and unique.
        let mut children: BTreeMap<&str, bool> = BTreeMap::new();
        for key in self.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    children.insert(dir, true);
                }
                None => {
                    children.entry(rest).or_insert(false);
                }
            }
        }

        if children.is_empty() && !name.is_empty() {
            return Err(ApplicationError::ThemeFileNotFound { name }.into());
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| ThemeEntry {
                name: name.to_string(),
                is_dir,
            })
            .collect())
    }

    fn glob(&self, pattern: &str) -> QuireResult<Vec<String>> {
        let compiled = compile_glob(pattern)?;
        Ok(self
            .files
            .keys()
            .filter(|name| compiled.matches_with(name, GLOB_OPTIONS))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_base_and_post_layouts() {
        let theme = MemoryTheme::builtin();
        assert_eq!(theme.len(), BUILTIN_FILES.len());
        assert!(theme.open("layouts/base.html").is_ok());
        assert!(theme.open("layouts/post.html").is_ok());
        assert!(!theme.glob("partials/*.html").unwrap().is_empty());
    }

    #[test]
    fn read_dir_lists_immediate_children() {
        let theme = MemoryTheme::new()
            .with_file("pages/index.html", "i")
            .with_file("pages/blog/index.html", "b")
            .with_file("pages/about.html", "a");

        let entries = theme.read_dir("pages").unwrap();
        let names: Vec<(&str, bool)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.is_dir))
            .collect();
        assert_eq!(
            names,
            [("about.html", false), ("blog", true), ("index.html", false)]
        );
        assert!(theme.read_dir("missing").unwrap_err().is_not_found());
        assert_eq!(theme.read_dir("").unwrap().len(), 1);
    }
}
