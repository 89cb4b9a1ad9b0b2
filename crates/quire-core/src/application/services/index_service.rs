//! Index Service - builds the article index from the content directory.
//!
//! Walks every markdown document, parses its front matter, and upserts the
//! resulting article. The first failure aborts the scan; a partial index is
//! never reported as success.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        Cancellation,
        ports::{ArticleRepository, ContentSource},
    },
    domain::front_matter,
    error::QuireResult,
};

/// Counts reported after a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Markdown documents found.
    pub scanned: usize,
    /// Articles written to the repository.
    pub indexed: usize,
    /// Rows in the repository afterwards.
    pub total: usize,
}

/// Scans content into the article repository.
pub struct IndexService {
    content: Arc<dyn ContentSource>,
    repository: Arc<dyn ArticleRepository>,
}

impl IndexService {
    pub fn new(content: Arc<dyn ContentSource>, repository: Arc<dyn ArticleRepository>) -> Self {
        Self {
            content,
            repository,
        }
    }

    /// Parse and upsert every document.
    #[instrument(skip_all)]
    pub fn scan(&self, cancel: &Cancellation) -> QuireResult<ScanReport> {
        cancel.check()?;
        let documents = self.content.documents()?;
        info!(count = documents.len(), "scanning markdown documents");

        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut indexed = 0;

        for path in &documents {
            cancel.check()?;
            let text = self.content.read(path)?;
            let article = front_matter::parse_article(path, &text)?;

            if let Some(previous) = seen.insert(article.slug().to_string(), path.clone()) {
                warn!(
                    slug = article.slug(),
                    previous = %previous.display(),
                    path = %path.display(),
                    "duplicate slug, later file replaces earlier"
                );
            }

            cancel.check()?;
            self.repository.upsert(&article)?;
            indexed += 1;
            debug!(slug = article.slug(), path = %path.display(), "article indexed");
        }

        cancel.check()?;
        let total = self.repository.count()?;

        info!(scanned = documents.len(), indexed, total, "scan completed");
        Ok(ScanReport {
            scanned: documents.len(),
            indexed,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ApplicationError,
        ports::output::{MockArticleRepository, MockContentSource},
    };
    use crate::error::QuireError;
    use mockall::predicate::*;
    use std::path::Path;

    fn content_with(docs: Vec<(&'static str, &'static str)>) -> MockContentSource {
        let mut content = MockContentSource::new();
        let paths: Vec<PathBuf> = docs.iter().map(|(p, _)| PathBuf::from(p)).collect();
        content.expect_documents().return_once(move || Ok(paths));
        content.expect_read().returning(move |path: &Path| {
            docs.iter()
                .find(|(p, _)| Path::new(p) == path)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| {
                    ApplicationError::FilesystemError {
                        path: path.to_path_buf(),
                        reason: "missing".into(),
                    }
                    .into()
                })
        });
        content
    }

    #[test]
    fn upserts_every_document() {
        let content = content_with(vec![
            ("a.md", "---\ntitle: A\n---\nbody"),
            ("nested/b.md", "plain body"),
        ]);

        let mut repo = MockArticleRepository::new();
        repo.expect_upsert()
            .withf(|a| a.slug() == "a" || a.slug() == "b")
            .times(2)
            .returning(|_| Ok(()));
        repo.expect_count().return_once(|| Ok(2));

        let service = IndexService::new(Arc::new(content), Arc::new(repo));
        let report = service.scan(&Cancellation::new()).unwrap();

        assert_eq!(
            report,
            ScanReport {
                scanned: 2,
                indexed: 2,
                total: 2
            }
        );
    }

    #[test]
    fn parse_error_aborts_scan() {
        let content = content_with(vec![
            ("bad.md", "---\ntitle: [oops\n---\n"),
            ("good.md", "fine"),
        ]);

        let mut repo = MockArticleRepository::new();
        repo.expect_upsert().never();

        let service = IndexService::new(Arc::new(content), Arc::new(repo));
        let err = service.scan(&Cancellation::new()).unwrap_err();

        assert!(matches!(err, QuireError::Domain(_)));
    }

    #[test]
    fn storage_error_propagates() {
        let content = content_with(vec![("a.md", "x")]);

        let mut repo = MockArticleRepository::new();
        repo.expect_upsert().with(always()).returning(|_| {
            Err(ApplicationError::StorageFailed {
                operation: "upsert",
                reason: "disk full".into(),
            }
            .into())
        });

        let service = IndexService::new(Arc::new(content), Arc::new(repo));
        let err = service.scan(&Cancellation::new()).unwrap_err();

        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn cancelled_scan_touches_nothing() {
        let mut content = MockContentSource::new();
        content.expect_documents().never();
        let mut repo = MockArticleRepository::new();
        repo.expect_upsert().never();

        let cancel = Cancellation::new();
        cancel.cancel();

        let service = IndexService::new(Arc::new(content), Arc::new(repo));
        assert!(service.scan(&cancel).unwrap_err().is_cancelled());
    }
}
