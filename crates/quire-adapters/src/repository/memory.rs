//! In-memory article repository.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;

use quire_core::{
    application::{ApplicationError, ports::ArticleRepository},
    domain::Article,
    error::QuireResult,
};

use super::newest_first;

/// Thread-safe in-memory article index.
///
/// Orders and matches exactly like [`super::SqliteRepository`]; handy for
/// tests and for hosts that rebuild the index on every start.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<HashMap<String, Article>>>,
}

impl MemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, keep: impl Fn(&Article) -> bool) -> QuireResult<Vec<Article>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut articles: Vec<Article> = inner.values().filter(|a| keep(a)).cloned().collect();
        articles.sort_by(newest_first);
        Ok(articles)
    }
}

impl ArticleRepository for MemoryRepository {
    fn init_schema(&self) -> QuireResult<()> {
        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> QuireResult<Article> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(slug).cloned().ok_or_else(|| {
            ApplicationError::ArticleNotFound {
                slug: slug.to_string(),
            }
            .into()
        })
    }

    fn list(&self, offset: usize, limit: usize) -> QuireResult<Vec<Article>> {
        Ok(self
            .sorted(|_| true)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn search(&self, term: &str) -> QuireResult<Vec<Article>> {
        let needle = term.to_ascii_lowercase();
        self.sorted(|a| {
            [a.title.as_str(), a.description.as_str(), a.slug()]
                .iter()
                .any(|field| field.to_ascii_lowercase().contains(&needle))
        })
    }

    fn upsert(&self, article: &Article) -> QuireResult<()> {
        let mut article = article.clone();
        article.stamp(Utc::now());

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(article.slug().to_string(), article);
        Ok(())
    }

    fn count(&self) -> QuireResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.len())
    }
}
