//! Page Service - renders site views from the article index.
//!
//! Shared by the request handlers and the static generator: both ask for
//! the same pages, one per request and one for the whole site.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::{
    application::{
        Cancellation,
        ports::{ArticleRepository, LayoutRenderer, MarkdownRenderer},
    },
    domain::{
        Article, FeedEntry, IndexView, PageView, PostView, SiteData, ViewData, feed,
    },
    error::QuireResult,
};

/// Listing sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteOptions {
    /// Articles shown on the home page.
    pub index_limit: usize,
    /// Articles included in the Atom feed.
    pub feed_limit: usize,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            index_limit: 5,
            feed_limit: 20,
        }
    }
}

/// Renders the home page, blog listing, articles, free pages, and feed.
pub struct PageService {
    repository: Arc<dyn ArticleRepository>,
    layouts: Arc<dyn LayoutRenderer>,
    markdown: Arc<dyn MarkdownRenderer>,
    site: Arc<SiteData>,
    options: SiteOptions,
}

impl PageService {
    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        layouts: Arc<dyn LayoutRenderer>,
        markdown: Arc<dyn MarkdownRenderer>,
        site: Arc<SiteData>,
        options: SiteOptions,
    ) -> Self {
        Self {
            repository,
            layouts,
            markdown,
            site,
            options,
        }
    }

    pub fn site(&self) -> &SiteData {
        &self.site
    }

    pub fn options(&self) -> SiteOptions {
        self.options
    }

    /// Template file extension, without the dot.
    pub fn extension(&self) -> &str {
        self.layouts.extension()
    }

    /// Theme name of a template, e.g. `pages/index` → `pages/index.html`.
    pub fn template(&self, stem: &str) -> String {
        format!("{stem}.{}", self.layouts.extension())
    }

    /// Every article, newest first.
    pub fn all_articles(&self, cancel: &Cancellation) -> QuireResult<Vec<Article>> {
        cancel.check()?;
        let total = self.repository.count()?;
        cancel.check()?;
        self.repository.list(0, total)
    }

    /// Home page with the most recent articles.
    #[instrument(skip_all)]
    pub fn index(&self, cancel: &Cancellation) -> QuireResult<String> {
        cancel.check()?;
        let articles = self.repository.list(0, self.options.index_limit)?;
        cancel.check()?;
        let total = self.repository.count()?;

        let view = IndexView::new(&articles, total);
        self.layouts.render(&self.template("pages/index"), &view.into())
    }

    /// Blog listing with every article.
    #[instrument(skip_all)]
    pub fn blog(&self, cancel: &Cancellation) -> QuireResult<String> {
        let articles = self.all_articles(cancel)?;
        let view = IndexView::new(&articles, articles.len());
        self.layouts.render(&self.template("pages/blog/index"), &view.into())
    }

    /// One article looked up by slug.
    #[instrument(skip_all, fields(slug = %slug))]
    pub fn article(&self, slug: &str, cancel: &Cancellation) -> QuireResult<String> {
        cancel.check()?;
        let article = self.repository.get_by_slug(slug)?;
        self.render_article(&article)
    }

    /// Render an already loaded article through its own layout.
    pub fn render_article(&self, article: &Article) -> QuireResult<String> {
        let html = self.markdown.render(&article.content);
        let template = self.template(&format!("layouts/{}", article.layout));
        debug!(slug = article.slug(), template = %template, "rendering article");

        let view = PostView::new(article, html);
        self.layouts.render(&template, &view.into())
    }

    /// A free page under `pages/`, given its stem relative to that dir.
    #[instrument(skip_all, fields(page = %page))]
    pub fn page(&self, page: &str, url: &str) -> QuireResult<String> {
        let view = ViewData::from(PageView {
            page: page.to_string(),
            url: url.to_string(),
        });
        self.layouts.render(&self.template(&format!("pages/{page}")), &view)
    }

    /// Atom feed of the most recent articles.
    #[instrument(skip_all)]
    pub fn feed(&self, cancel: &Cancellation) -> QuireResult<String> {
        cancel.check()?;
        let articles = self.repository.list(0, self.options.feed_limit)?;
        let now = Utc::now();

        let entries: Vec<FeedEntry> = articles
            .iter()
            .map(|a| FeedEntry {
                title: a.title.clone(),
                slug: a.slug().to_string(),
                updated: a.published_at().unwrap_or(now),
                html: self.markdown.render(&a.content),
            })
            .collect();

        Ok(feed::atom(&self.site.meta, &entries, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockArticleRepository;
    use crate::domain::ViewModel;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Records every render call and echoes the template name.
    #[derive(Default)]
    struct EchoLayouts {
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl LayoutRenderer for EchoLayouts {
        fn render(&self, template: &str, view: &ViewData) -> QuireResult<String> {
            let mut ctx = crate::domain::RenderContext::default();
            view.fill(&mut ctx)?;
            self.calls
                .lock()
                .unwrap()
                .push((template.to_string(), ctx.into_value()));
            Ok(format!("<{template}>"))
        }

        fn extension(&self) -> &str {
            "html"
        }
    }

    struct UpperMarkdown;

    impl MarkdownRenderer for UpperMarkdown {
        fn render(&self, markdown: &str) -> String {
            format!("<p>{}</p>", markdown.to_uppercase())
        }
    }

    fn article(slug: &str, day: u32) -> Article {
        let mut a = Article::new(slug).unwrap();
        a.title = slug.to_uppercase();
        a.content = format!("body of {slug}");
        a.date = NaiveDate::from_ymd_opt(2024, 1, day);
        a
    }

    fn service(repo: MockArticleRepository, layouts: Arc<EchoLayouts>) -> PageService {
        PageService::new(
            Arc::new(repo),
            layouts,
            Arc::new(UpperMarkdown),
            Arc::new(SiteData::default()),
            SiteOptions {
                index_limit: 2,
                feed_limit: 3,
            },
        )
    }

    #[test]
    fn index_uses_index_limit() {
        let mut repo = MockArticleRepository::new();
        repo.expect_list()
            .withf(|offset, limit| *offset == 0 && *limit == 2)
            .return_once(|_, _| Ok(vec![article("b", 20), article("a", 10)]));
        repo.expect_count().return_once(|| Ok(9));

        let layouts = Arc::new(EchoLayouts::default());
        let html = service(repo, layouts.clone())
            .index(&Cancellation::new())
            .unwrap();

        assert_eq!(html, "<pages/index.html>");
        let calls = layouts.calls.lock().unwrap();
        assert_eq!(calls[0].1["total"], 9);
        assert_eq!(calls[0].1["articles"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn article_renders_markdown_into_its_layout() {
        let mut repo = MockArticleRepository::new();
        repo.expect_get_by_slug()
            .withf(|slug| slug == "hello")
            .return_once(|_| Ok(article("hello", 5)));

        let layouts = Arc::new(EchoLayouts::default());
        let html = service(repo, layouts.clone())
            .article("hello", &Cancellation::new())
            .unwrap();

        assert_eq!(html, "<layouts/post.html>");
        let calls = layouts.calls.lock().unwrap();
        assert_eq!(calls[0].1["content"], "<p>BODY OF HELLO</p>");
        assert_eq!(calls[0].1["classnames"], "prose");
    }

    #[test]
    fn missing_article_is_not_found() {
        let mut repo = MockArticleRepository::new();
        repo.expect_get_by_slug().return_once(|slug| {
            Err(crate::application::ApplicationError::ArticleNotFound {
                slug: slug.to_string(),
            }
            .into())
        });

        let err = service(repo, Arc::new(EchoLayouts::default()))
            .article("nope", &Cancellation::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn feed_uses_feed_limit_and_rendered_html() {
        let mut repo = MockArticleRepository::new();
        repo.expect_list()
            .withf(|_, limit| *limit == 3)
            .return_once(|_, _| Ok(vec![article("x", 2)]));

        let xml = service(repo, Arc::new(EchoLayouts::default()))
            .feed(&Cancellation::new())
            .unwrap();

        assert!(xml.contains("<title>X</title>"));
        assert!(xml.contains("&lt;p&gt;BODY OF X&lt;/p&gt;"));
        assert!(xml.contains("2024-01-02T00:00:00Z"));
    }

    #[test]
    fn blog_lists_everything() {
        let mut repo = MockArticleRepository::new();
        repo.expect_count().return_once(|| Ok(3));
        repo.expect_list()
            .withf(|_, limit| *limit == 3)
            .return_once(|_, _| Ok(vec![article("c", 3), article("b", 2), article("a", 1)]));

        let layouts = Arc::new(EchoLayouts::default());
        let html = service(repo, layouts.clone())
            .blog(&Cancellation::new())
            .unwrap();

        assert_eq!(html, "<pages/blog/index.html>");
        assert_eq!(layouts.calls.lock().unwrap()[0].1["total"], 3);
    }
}
