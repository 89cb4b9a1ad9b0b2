//! Site-wide data shared by every render.
//!
//! [`SiteData`] is built once at startup and handed to renderers behind an
//! `Arc`. It is never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Navigation, theme settings, and site metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    pub navigation: Vec<NavItem>,
    /// Theme settings are theme-defined; passed through untouched.
    pub themes: Value,
    pub meta: SiteMeta,
}

/// One navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavItem {
    pub title: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Site metadata, mostly consumed by layouts and the Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    /// Absolute site URL without a trailing slash.
    pub url: String,
    pub language: String,
    pub author: Author,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Blog".into(),
            description: String::new(),
            url: String::new(),
            language: "en".into(),
            author: Author::default(),
            extra: Map::new(),
        }
    }
}

impl SiteMeta {
    /// Site URL with trailing slashes removed, so paths can be appended.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}
