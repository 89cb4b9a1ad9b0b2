//! Loads the shared [`SiteData`] from the data directory.
//!
//! | File              | Field        | Format |
//! |-------------------|--------------|--------|
//! | `navigation.json` | `navigation` | JSON   |
//! | `themes.json`     | `themes`     | JSON   |
//! | `meta.yml`        | `meta`       | YAML   |
//!
//! A missing file leaves its field at the default. A file that exists but
//! does not parse is a configuration error.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use quire_core::{
    domain::SiteData,
    error::{QuireError, QuireResult},
};

pub const NAVIGATION_FILE: &str = "navigation.json";
pub const THEMES_FILE: &str = "themes.json";
pub const META_FILE: &str = "meta.yml";

#[derive(Clone, Copy)]
enum Format {
    Json,
    Yaml,
}

/// Read `navigation.json`, `themes.json`, and `meta.yml` under `dir`.
#[instrument(skip_all, fields(path = %dir.display()))]
pub fn load_site_data(dir: &Path) -> QuireResult<SiteData> {
    let mut site = SiteData::default();

    if let Some(navigation) = load(dir.join(NAVIGATION_FILE), Format::Json)? {
        site.navigation = navigation;
    }
    if let Some(themes) = load(dir.join(THEMES_FILE), Format::Json)? {
        site.themes = themes;
    }
    if let Some(meta) = load(dir.join(META_FILE), Format::Yaml)? {
        site.meta = meta;
    }

    debug!(
        navigation = site.navigation.len(),
        title = %site.meta.title,
        "site data loaded"
    );
    Ok(site)
}

fn load<T: DeserializeOwned>(path: PathBuf, format: Format) -> QuireResult<Option<T>> {
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "data file absent, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(config_error(&path, e)),
    };

    let value = match format {
        Format::Json => serde_json::from_str(&text).map_err(|e| config_error(&path, e))?,
        Format::Yaml => serde_yaml::from_str(&text).map_err(|e| config_error(&path, e))?,
    };
    Ok(Some(value))
}

fn config_error(path: &Path, e: impl std::fmt::Display) -> QuireError {
    QuireError::Configuration {
        message: format!("failed to load {}: {}", path.display(), e),
    }
}
