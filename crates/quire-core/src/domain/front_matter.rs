//! Front-matter extraction.
//!
//! A document may open with a `---` delimited YAML block. The block is split
//! off the body and decoded into [`FrontMatter`]; documents without the
//! leading delimiter are all body.
//!
//! The same splitter serves articles and theme templates, which use the
//! block to name their parent layout.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use super::{Article, DomainError};

/// Delimiter that opens and closes a front-matter block.
pub const DELIMITER: &str = "---";

/// Date format accepted in the `date` key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decoded front-matter record. Discarded once an [`Article`] is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    #[serde(rename = "ogImage", alias = "og_image")]
    pub og_image: String,
    /// Kept loose: YAML may hand us a string, a number, or nothing.
    pub date: Option<serde_yaml::Value>,
    pub layout: String,
    pub source: String,
}

impl FrontMatter {
    /// The `date` key as text, if it was a scalar.
    pub fn date_text(&self) -> Option<String> {
        match self.date.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.trim().to_string()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Parse the `date` key. Absent or malformed dates stay unset.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let text = self.date_text()?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).ok()
    }
}

/// Split `content` into its front-matter block and body.
///
/// Returns `(None, content)` unchanged when the content does not start with
/// the delimiter or the block is never closed.
pub fn split(content: &str) -> (Option<&str>, &str) {
    if !content.starts_with(DELIMITER) {
        return (None, content);
    }

    let mut parts = content.splitn(3, DELIMITER);
    let _leading = parts.next();
    match (parts.next(), parts.next()) {
        (Some(block), Some(body)) => (Some(block), trim_leading_newline(body)),
        _ => (None, content),
    }
}

/// Body of `content` with any front-matter block removed.
pub fn strip(content: &str) -> &str {
    split(content).1
}

/// Decode the block of `content` into `T`. A missing or blank block yields
/// `T::default()`.
pub fn decode<'a, T>(source_name: &str, content: &'a str) -> Result<(T, &'a str), DomainError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let (block, body) = split(content);

    let meta = match block {
        Some(block) if !block.trim().is_empty() => serde_yaml::from_str::<Option<T>>(block)
            .map_err(|e| DomainError::InvalidFrontMatter {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?
            .unwrap_or_default(),
        _ => T::default(),
    };

    Ok((meta, body))
}

/// Build an [`Article`] from a markdown file's path and text.
///
/// The slug is the file name without its extension. `layout` falls back to
/// `post`; the date is left unset when missing or unparsable.
pub fn parse_article(path: &Path, content: &str) -> Result<Article, DomainError> {
    let source_name = path.display().to_string();
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let (meta, body): (FrontMatter, &str) = decode(&source_name, content)?;

    let mut article = Article::new(slug)?;
    article.date = meta.parsed_date();
    if article.date.is_none() {
        if let Some(raw) = meta.date_text() {
            warn!(path = %source_name, date = %raw, "unparsable date left unset");
        }
    }

    article.title = meta.title;
    article.description = meta.description;
    article.og_image = meta.og_image;
    article.source = meta.source;
    if !meta.layout.trim().is_empty() {
        article.layout = meta.layout.trim().to_string();
    }
    article.content = body.to_string();

    Ok(article)
}

fn trim_leading_newline(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}
