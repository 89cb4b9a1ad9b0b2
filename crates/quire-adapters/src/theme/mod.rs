//! Theme sources.
//!
//! A theme is a read-only tree of `layouts/`, `pages/`, `partials/`, and
//! `assets/`. Three sources implement the `ThemeSource` port:
//!
//! - [`LocalTheme`] reads a live directory
//! - [`MemoryTheme`] holds files in memory; [`MemoryTheme::builtin`] is the
//!   theme compiled into the binary
//! - [`OverlayTheme`] stacks a live theme over the embedded one

mod local;
mod memory;
mod overlay;

pub use local::LocalTheme;
pub use memory::MemoryTheme;
pub use overlay::OverlayTheme;

use glob::{MatchOptions, Pattern};
use quire_core::{domain::DomainError, error::QuireResult};

/// Normalize a theme-relative name to `a/b/c` form. `""` is the root.
///
/// Absolute names and `..` components are rejected so no lookup can leave
/// the theme root.
pub fn normalize_name(name: &str) -> Result<String, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidThemePath {
        path: name.to_string(),
        reason: reason.to_string(),
    };

    if name.starts_with('/') || name.contains('\\') {
        return Err(invalid("theme paths are relative and slash separated"));
    }

    let mut parts = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(invalid("theme paths cannot leave the theme root")),
            other => parts.push(other),
        }
    }

    Ok(parts.join("/"))
}

/// Compile a glob over theme names. `*` never crosses a `/`.
pub(crate) fn compile_glob(pattern: &str) -> QuireResult<Pattern> {
    Pattern::new(pattern).map_err(|e| {
        DomainError::InvalidThemePath {
            path: pattern.to_string(),
            reason: format!("invalid glob: {e}"),
        }
        .into()
    })
}

/// Split a glob into its literal leading directory and the number of path
/// components left to match. `None` means unbounded (`**`).
///
/// `partials/*.html` gives `("partials", Some(1))`.
pub(crate) fn glob_root(pattern: &str) -> (String, Option<usize>) {
    let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    let literal = parts
        .iter()
        .take_while(|p| !p.contains(['*', '?', '[']))
        .count()
        // the last component names files, never the directory to walk
        .min(parts.len().saturating_sub(1));

    let rest = &parts[literal..];
    let depth = (!rest.contains(&"**")).then_some(rest.len());
    (parts[..literal].join("/"), depth)
}

pub(crate) const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("").unwrap(), "");
        assert_eq!(normalize_name(".").unwrap(), "");
        assert_eq!(normalize_name("./layouts//base.html").unwrap(), "layouts/base.html");
    }

    #[test]
    fn rejects_escapes() {
        assert!(normalize_name("../secret").is_err());
        assert!(normalize_name("/etc/passwd").is_err());
        assert!(normalize_name("assets\\x").is_err());
    }

    #[test]
    fn glob_root_is_the_literal_prefix() {
        assert_eq!(glob_root("partials/*.html"), ("partials".into(), Some(1)));
        assert_eq!(glob_root("pages/*/index.html"), ("pages".into(), Some(2)));
        assert_eq!(glob_root("layouts/base.html"), ("layouts".into(), Some(1)));
        assert_eq!(glob_root("*.html"), (String::new(), Some(1)));
        assert_eq!(glob_root("assets/**/*.css"), ("assets".into(), None));
    }

    #[test]
    fn glob_stays_in_one_directory() {
        let pattern = compile_glob("partials/*.html").unwrap();
        assert!(pattern.matches_with("partials/nav.html", GLOB_OPTIONS));
        assert!(!pattern.matches_with("partials/deep/nav.html", GLOB_OPTIONS));
    }
}
