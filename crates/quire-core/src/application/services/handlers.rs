//! Read endpoints for module mode.
//!
//! Each handler queries the repository or the page service and answers with
//! an HTTP-shaped [`Response`]. Failures never escape a handler: they become
//! a status code and a plain-text diagnostic through
//! [`Response::from_error`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            ArticleRepository, MAX_AGE_LONG, MAX_AGE_SHORT, Request, Response, ThemeSource,
        },
        services::PageService,
    },
    domain::Article,
    error::{QuireError, QuireResult},
};

/// Route parameter holding the remainder matched by a trailing `*`.
pub const WILDCARD_PARAM: &str = "*";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleList<'a> {
    articles: &'a [Article],
    total: usize,
    page: usize,
    page_size: usize,
}

#[derive(Debug, Serialize)]
struct SearchResult<'a> {
    articles: &'a [Article],
    total: usize,
    query: &'a str,
}

/// Request handlers for the blog routes.
#[derive(Clone)]
pub struct BlogHandlers {
    pages: Arc<PageService>,
    repository: Arc<dyn ArticleRepository>,
    theme: Arc<dyn ThemeSource>,
}

impl BlogHandlers {
    pub fn new(
        pages: Arc<PageService>,
        repository: Arc<dyn ArticleRepository>,
        theme: Arc<dyn ThemeSource>,
    ) -> Self {
        Self {
            pages,
            repository,
            theme,
        }
    }

    /// `GET /api/blog/articles`
    #[instrument(skip_all)]
    pub fn list_json(&self, req: &Request) -> Response {
        respond(req, || {
            let articles = self.pages.all_articles(&req.cancel)?;
            let list = ArticleList {
                articles: &articles,
                total: articles.len(),
                page: 1,
                page_size: articles.len(),
            };
            Response::json(&list, MAX_AGE_SHORT)
        })
    }

    /// `GET /api/blog/articles/{slug}`
    #[instrument(skip_all, fields(slug = req.param("slug").unwrap_or_default()))]
    pub fn get_json(&self, req: &Request) -> Response {
        respond(req, || {
            let slug = required_param(req, "slug")?;
            req.cancel.check()?;
            let article = self.repository.get_by_slug(slug)?;
            Response::json(&article, MAX_AGE_LONG)
        })
    }

    /// `GET /api/blog/search?q=`
    #[instrument(skip_all)]
    pub fn search_json(&self, req: &Request) -> Response {
        respond(req, || {
            let query = req
                .query("q")
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .ok_or(ApplicationError::MissingParameter { parameter: "q" })?;

            req.cancel.check()?;
            let articles = self.repository.search(query)?;
            let result = SearchResult {
                articles: &articles,
                total: articles.len(),
                query,
            };
            Response::json(&result, MAX_AGE_SHORT)
        })
    }

    /// `GET /`
    pub fn index_html(&self, req: &Request) -> Response {
        respond(req, || {
            Ok(Response::html(self.pages.index(&req.cancel)?, MAX_AGE_SHORT))
        })
    }

    /// `GET /blog/`
    pub fn blog_html(&self, req: &Request) -> Response {
        respond(req, || {
            Ok(Response::html(self.pages.blog(&req.cancel)?, MAX_AGE_SHORT))
        })
    }

    /// `GET /blog/{slug}` and `GET /blog/{slug}/`
    pub fn article_html(&self, req: &Request) -> Response {
        respond(req, || {
            let slug = required_param(req, "slug")?;
            Ok(Response::html(
                self.pages.article(slug, &req.cancel)?,
                MAX_AGE_LONG,
            ))
        })
    }

    /// `GET /feed.xml`
    pub fn feed_xml(&self, req: &Request) -> Response {
        respond(req, || {
            Ok(Response::xml(self.pages.feed(&req.cancel)?, MAX_AGE_LONG))
        })
    }

    /// `GET /assets/*`
    #[instrument(skip_all, fields(asset = req.param(WILDCARD_PARAM).unwrap_or_default()))]
    pub fn asset(&self, req: &Request) -> Response {
        respond(req, || {
            let rest = required_param(req, WILDCARD_PARAM)?;
            req.cancel.check()?;
            let bytes = self.theme.open(&format!("assets/{rest}"))?;
            Ok(Response::bytes(content_type(rest), bytes, MAX_AGE_LONG))
        })
    }
}

fn required_param<'r>(req: &'r Request, name: &'static str) -> QuireResult<&'r str> {
    req.param(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::MissingParameter { parameter: name }.into())
}

/// Run a handler body and turn its error into a response.
fn respond(req: &Request, body: impl FnOnce() -> QuireResult<Response>) -> Response {
    match body() {
        Ok(res) => res,
        Err(e) => {
            log_failure(req, &e);
            Response::from_error(&e)
        }
    }
}

fn log_failure(req: &Request, err: &QuireError) {
    let status = err.http_status();
    if status >= 500 {
        error!(path = %req.path, status, error = %err, "request failed");
    } else {
        warn!(path = %req.path, status, error = %err, "request rejected");
    }
}

/// Content type for a theme asset, by extension.
pub fn content_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
