//! Two-layer theme view.
//!
//! `upper` is the live override directory, `lower` the embedded default.
//! Reads try the upper layer first; listings merge both with the upper
//! entry winning on a name clash. Either layer may be absent, which counts
//! as a layer with nothing in it.

use std::{collections::BTreeMap, sync::Arc};

use tracing::{trace, warn};

use quire_core::{
    application::{ApplicationError, ports::{ThemeEntry, ThemeSource}},
    error::{QuireError, QuireResult},
};

use super::normalize_name;

/// Live theme layered over a default theme.
#[derive(Clone, Default)]
pub struct OverlayTheme {
    upper: Option<Arc<dyn ThemeSource>>,
    lower: Option<Arc<dyn ThemeSource>>,
}

impl OverlayTheme {
    pub fn new(upper: Option<Arc<dyn ThemeSource>>, lower: Option<Arc<dyn ThemeSource>>) -> Self {
        Self { upper, lower }
    }

    fn layers(&self) -> impl Iterator<Item = &Arc<dyn ThemeSource>> {
        self.upper.iter().chain(self.lower.iter())
    }
}

impl ThemeSource for OverlayTheme {
    fn open(&self, name: &str) -> QuireResult<Vec<u8>> {
        let name = normalize_name(name)?;

        if let Some(upper) = &self.upper {
            match upper.open(&name) {
                Ok(bytes) => return Ok(bytes),
                Err(e) => trace!(name = %name, error = %e, "upper layer miss"),
            }
        }

        match &self.lower {
            Some(lower) => lower.open(&name),
            None => Err(ApplicationError::ThemeFileNotFound { name }.into()),
        }
    }

    fn read_dir(&self, name: &str) -> QuireResult<Vec<ThemeEntry>> {
        let name = normalize_name(name)?;

        let mut merged: BTreeMap<String, ThemeEntry> = BTreeMap::new();
        let mut any_ok = false;
        let mut last_err: Option<QuireError> = None;

        // Lower first so upper entries overwrite on insert.
        let layers = [&self.lower, &self.upper];
        for layer in layers.into_iter().flatten() {
            match layer.read_dir(&name) {
                Ok(entries) => {
                    any_ok = true;
                    for entry in entries {
                        merged.insert(entry.name.clone(), entry);
                    }
                }
                Err(e) => last_err = Some(e),
            }
        }

        if !any_ok {
            return Err(last_err.unwrap_or_else(|| ApplicationError::ThemeFileNotFound { name }.into()));
        }

        Ok(merged.into_values().collect())
    }

    /// Union of both layers. A layer that fails to glob counts as having no
    /// matches.
    fn glob(&self, pattern: &str) -> QuireResult<Vec<String>> {
        let mut names = Vec::new();
        for layer in self.layers() {
            match layer.glob(pattern) {
                Ok(found) => names.extend(found),
                Err(e) => warn!(pattern, error = %e, "theme layer glob failed, skipping layer"),
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}
