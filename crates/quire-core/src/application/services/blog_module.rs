//! Blog Module - the content pipeline as a hosted module.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        Cancellation,
        ports::{ArticleRepository, Handler, Module, Request, Response, Router},
        services::{BlogHandlers, IndexService},
    },
    error::QuireResult,
};

/// Lifecycle wrapper around the index and the read endpoints.
pub struct BlogModule {
    repository: Arc<dyn ArticleRepository>,
    index: IndexService,
    handlers: BlogHandlers,
}

impl BlogModule {
    pub const NAME: &'static str = "blog";

    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        index: IndexService,
        handlers: BlogHandlers,
    ) -> Self {
        Self {
            repository,
            index,
            handlers,
        }
    }

    fn route(&self, f: fn(&BlogHandlers, &Request) -> Response) -> Handler {
        let handlers = self.handlers.clone();
        Arc::new(move |req: &Request| f(&handlers, req))
    }
}

impl Module for BlogModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn mount(&self, router: &mut dyn Router) -> QuireResult<()> {
        router.get("/api/blog/articles", self.route(BlogHandlers::list_json));
        router.get("/api/blog/articles/{slug}", self.route(BlogHandlers::get_json));
        router.get("/api/blog/search", self.route(BlogHandlers::search_json));
        router.get("/", self.route(BlogHandlers::index_html));
        router.get("/blog/", self.route(BlogHandlers::blog_html));
        router.get("/blog/{slug}", self.route(BlogHandlers::article_html));
        router.get("/blog/{slug}/", self.route(BlogHandlers::article_html));
        router.get("/feed.xml", self.route(BlogHandlers::feed_xml));
        router.get("/assets/*", self.route(BlogHandlers::asset));
        Ok(())
    }

    #[instrument(skip_all, fields(module = "blog"))]
    fn start(&self, cancel: &Cancellation) -> QuireResult<()> {
        cancel.check()?;
        self.repository.init_schema()?;
        let report = self.index.scan(cancel)?;
        info!(
            scanned = report.scanned,
            indexed = report.indexed,
            total = report.total,
            "blog module started"
        );
        Ok(())
    }

    fn stop(&self) -> QuireResult<()> {
        Ok(())
    }
}
