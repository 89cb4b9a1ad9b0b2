//! Typed view models and the render context they fill.
//!
//! Every template family gets its own record. The closed [`ViewData`] union
//! is what renderers accept; each record fills a [`RenderContext`] through the
//! [`ViewModel`] capability, so renderers never inspect page data directly.
//!
//! Merge priority, lowest first: shared site data, page data, then the
//! `content` key written by the layout chain.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{Article, DomainError, SiteData};

/// Key that carries the output of the previous layout pass.
pub const CONTENT_KEY: &str = "content";

/// Key a page may use to request its first layout.
pub const LAYOUT_KEY: &str = "layout";

// ── RenderContext ────────────────────────────────────────────────────────────

/// Key/value data for one render call. Never shared between renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    /// Start a context from the shared site data.
    pub fn new(shared: &SiteData) -> Result<Self, DomainError> {
        let mut ctx = Self::default();
        ctx.insert("navigation", encode(&shared.navigation)?);
        ctx.insert("themes", shared.themes.clone());
        ctx.insert("meta", encode(&shared.meta)?);
        Ok(ctx)
    }

    /// Merge a view on top of the current values.
    pub fn with_view(mut self, view: &ViewData) -> Result<Self, DomainError> {
        view.fill(&mut self)?;
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Merge every key of a serializable record, overriding existing keys.
    pub fn merge<T: Serialize>(&mut self, record: &T) -> Result<(), DomainError> {
        match encode(record)? {
            Value::Object(map) => {
                self.values.extend(map);
                Ok(())
            }
            other => Err(DomainError::ViewEncoding {
                reason: format!("expected an object, got {other}"),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store the output of a finished pass for the next layout.
    pub fn set_content(&mut self, html: String) {
        self.values.insert(CONTENT_KEY.into(), Value::String(html));
    }

    pub fn clear_layout(&mut self) {
        self.values.remove(LAYOUT_KEY);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::ViewEncoding {
        reason: e.to_string(),
    })
}

// ── ViewModel capability ─────────────────────────────────────────────────────

/// What a renderer needs from page data.
pub trait ViewModel {
    /// Write this view's keys into `ctx`.
    fn fill(&self, ctx: &mut RenderContext) -> Result<(), DomainError>;
}

/// Closed set of template families.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    Index(IndexView),
    Post(PostView),
    Page(PageView),
}

impl ViewModel for ViewData {
    fn fill(&self, ctx: &mut RenderContext) -> Result<(), DomainError> {
        match self {
            Self::Index(v) => v.fill(ctx),
            Self::Post(v) => v.fill(ctx),
            Self::Page(v) => v.fill(ctx),
        }
    }
}

impl From<IndexView> for ViewData {
    fn from(v: IndexView) -> Self {
        Self::Index(v)
    }
}

impl From<PostView> for ViewData {
    fn from(v: PostView) -> Self {
        Self::Post(v)
    }
}

impl From<PageView> for ViewData {
    fn from(v: PageView) -> Self {
        Self::Page(v)
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

/// Article fields shown in listings. No body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "ogImage")]
    pub og_image: String,
    pub date: Option<NaiveDate>,
    pub url: String,
}

impl From<&Article> for ArticleSummary {
    fn from(a: &Article) -> Self {
        Self {
            slug: a.slug().to_string(),
            title: a.title.clone(),
            description: a.description.clone(),
            og_image: a.og_image.clone(),
            date: a.date,
            url: a.url().to_string(),
        }
    }
}

/// Home page and blog listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexView {
    pub title: String,
    pub description: String,
    pub articles: Vec<ArticleSummary>,
    pub total: usize,
}

impl IndexView {
    pub fn new(articles: &[Article], total: usize) -> Self {
        Self {
            title: "Blog".into(),
            description: "Read my latest articles and posts".into(),
            articles: articles.iter().map(ArticleSummary::from).collect(),
            total,
        }
    }
}

impl ViewModel for IndexView {
    fn fill(&self, ctx: &mut RenderContext) -> Result<(), DomainError> {
        ctx.merge(self)
    }
}

/// A single article page. `content` is already rendered HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "ogImage")]
    pub og_image: String,
    pub content: String,
    pub date: Option<NaiveDate>,
    pub url: String,
    pub source: String,
    pub classnames: String,
}

impl PostView {
    pub fn new(article: &Article, html: String) -> Self {
        Self {
            slug: article.slug().to_string(),
            title: article.title.clone(),
            description: article.description.clone(),
            og_image: article.og_image.clone(),
            content: html,
            date: article.date,
            url: article.url().to_string(),
            source: article.source.clone(),
            classnames: "prose".into(),
        }
    }
}

impl ViewModel for PostView {
    fn fill(&self, ctx: &mut RenderContext) -> Result<(), DomainError> {
        ctx.merge(self)
    }
}

/// A free-standing page under `pages/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Page name relative to `pages/`, without extension.
    pub page: String,
    pub url: String,
}

impl ViewModel for PageView {
    fn fill(&self, ctx: &mut RenderContext) -> Result<(), DomainError> {
        ctx.merge(self)
    }
}
