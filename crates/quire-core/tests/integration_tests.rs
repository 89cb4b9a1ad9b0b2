//! Integration tests for quire-core.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{TimeZone, Utc};
use quire_core::{
    application::ApplicationError,
    domain::{FeedEntry, feed},
    prelude::*,
};

/// Content held in a map, keyed by path.
struct FakeContent(BTreeMap<PathBuf, String>);

impl FakeContent {
    fn new(docs: &[(&str, &str)]) -> Self {
        Self(
            docs.iter()
                .map(|(p, t)| (PathBuf::from(p), t.to_string()))
                .collect(),
        )
    }
}

impl ContentSource for FakeContent {
    fn documents(&self) -> QuireResult<Vec<PathBuf>> {
        Ok(self.0.keys().cloned().collect())
    }

    fn read(&self, path: &Path) -> QuireResult<String> {
        self.0.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "missing".into(),
            }
            .into()
        })
    }
}

#[derive(Default)]
struct FakeRepository(Mutex<BTreeMap<String, Article>>);

impl ArticleRepository for FakeRepository {
    fn init_schema(&self) -> QuireResult<()> {
        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> QuireResult<Article> {
        self.0.lock().unwrap().get(slug).cloned().ok_or_else(|| {
            ApplicationError::ArticleNotFound {
                slug: slug.to_string(),
            }
            .into()
        })
    }

    fn list(&self, offset: usize, limit: usize) -> QuireResult<Vec<Article>> {
        let mut all: Vec<Article> = self.0.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug().cmp(b.slug())));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    fn search(&self, term: &str) -> QuireResult<Vec<Article>> {
        let term = term.to_lowercase();
        Ok(self
            .list(0, usize::MAX)?
            .into_iter()
            .filter(|a| a.title.to_lowercase().contains(&term))
            .collect())
    }

    fn upsert(&self, article: &Article) -> QuireResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(article.slug().to_string(), article.clone());
        Ok(())
    }

    fn count(&self) -> QuireResult<usize> {
        Ok(self.0.lock().unwrap().len())
    }
}

#[test]
fn scan_indexes_every_document() {
    let content = FakeContent::new(&[
        ("posts/first.md", "---\ntitle: First\ndate: 2024-02-01\n---\nOne"),
        ("posts/second.md", "---\ntitle: Second\nlayout: wide\n---\nTwo"),
        ("third.md", "no front matter at all"),
    ]);
    let repository = Arc::new(FakeRepository::default());

    let report = IndexService::new(Arc::new(content), repository.clone())
        .scan(&Cancellation::new())
        .unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.indexed, 3);
    assert_eq!(report.total, 3);

    let first = repository.get_by_slug("first").unwrap();
    assert_eq!(first.title, "First");
    assert_eq!(first.content, "One");
    assert_eq!(first.url(), "/blog/first/");
    assert_eq!(first.layout, "post");

    assert_eq!(repository.get_by_slug("second").unwrap().layout, "wide");
    assert_eq!(repository.get_by_slug("third").unwrap().title, "");
}

#[test]
fn rescanning_keeps_one_row_per_slug() {
    let repository = Arc::new(FakeRepository::default());
    let service = IndexService::new(
        Arc::new(FakeContent::new(&[("a.md", "---\ntitle: A\n---\n")])),
        repository.clone(),
    );

    service.scan(&Cancellation::new()).unwrap();
    let report = service.scan(&Cancellation::new()).unwrap();

    assert_eq!(report.total, 1);
}

#[test]
fn malformed_front_matter_aborts_the_scan() {
    let content = FakeContent::new(&[("bad.md", "---\ntitle: [unclosed\n---\nbody")]);
    let repository = Arc::new(FakeRepository::default());

    let err = IndexService::new(Arc::new(content), repository.clone())
        .scan(&Cancellation::new())
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(repository.count().unwrap(), 0);
}

#[test]
fn cancelled_scan_writes_nothing() {
    let cancel = Cancellation::new();
    cancel.cancel();
    let repository = Arc::new(FakeRepository::default());

    let err = IndexService::new(
        Arc::new(FakeContent::new(&[("a.md", "body")])),
        repository.clone(),
    )
    .scan(&cancel)
    .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.http_status(), 503);
    assert_eq!(repository.count().unwrap(), 0);
}

#[test]
fn missing_article_maps_to_404() {
    let err = FakeRepository::default().get_by_slug("nope").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.http_status(), 404);
}

#[test]
fn feed_links_entries_under_site_url() {
    let meta = SiteMeta {
        title: "Notes & Things".into(),
        url: "https://example.com/".into(),
        ..SiteMeta::default()
    };
    let entries = [FeedEntry {
        title: "Hello".into(),
        slug: "hello".into(),
        updated: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        html: "<p>hi</p>".into(),
    }];

    let xml = feed::atom(&meta, &entries, Utc::now());

    assert!(xml.contains("<title>Notes &amp; Things</title>"));
    assert!(xml.contains("https://example.com/blog/hello/"));
    assert!(xml.contains("&lt;p&gt;hi&lt;/p&gt;"));
}
