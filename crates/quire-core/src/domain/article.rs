//! The article entity.
//!
//! An [`Article`] is one parsed markdown document. Its identity is the slug;
//! the id and the public URL are both derived from it and cannot be set
//! independently.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::DomainError;

/// Layout applied to articles whose front matter names none.
pub const DEFAULT_LAYOUT: &str = "post";

/// Path prefix every article URL lives under.
pub const ARTICLE_URL_PREFIX: &str = "/blog/";

/// One parsed markdown document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    id: Uuid,
    slug: String,
    pub title: String,
    pub description: String,
    /// Raw markdown body with the front matter stripped.
    pub content: String,
    pub date: Option<NaiveDate>,
    pub og_image: String,
    pub layout: String,
    pub source: String,
    url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Create an empty article for `slug`.
    ///
    /// Fails if the slug is empty or would escape its URL segment.
    pub fn new(slug: impl Into<String>) -> Result<Self, DomainError> {
        let slug = slug.into();
        validate_slug(&slug)?;

        Ok(Self {
            id: article_id(&slug),
            url: article_url(&slug),
            slug,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            date: None,
            og_image: String::new(),
            layout: DEFAULT_LAYOUT.to_string(),
            source: String::new(),
            created_at: None,
            updated_at: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fill unset timestamps with `now`. Set values are kept.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.updated_at.get_or_insert(now);
    }

    /// The moment this article was last meaningful for feeds: its publication
    /// date at midnight UTC, else its last update.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .or(self.updated_at)
    }
}

/// Stable id for a slug. Rescanning the same file never changes it.
pub fn article_id(slug: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, article_url(slug).as_bytes())
}

pub fn article_url(slug: &str) -> String {
    format!("{ARTICLE_URL_PREFIX}{slug}/")
}

fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let reason = if slug.trim().is_empty() {
        Some("slug is empty")
    } else if slug.contains(['/', '\\']) {
        Some("slug contains a path separator")
    } else if slug == "." || slug == ".." {
        Some("slug is a relative path component")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidSlug {
            slug: slug.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}
