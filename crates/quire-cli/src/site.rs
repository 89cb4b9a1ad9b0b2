//! Composition root: builds the adapters and services from [`AppConfig`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use quire_adapters::{
    HighlightingRenderer, LocalContent, LocalFilesystem, LocalTheme, MemoryTheme, OverlayTheme,
    RouteTable, SqliteRepository, TeraLayoutRenderer, load_site_data,
};
use quire_core::prelude::*;

use crate::{config::AppConfig, error::CliResult};

/// Every wired component a command may need.
pub struct Site {
    pub repository: Arc<dyn ArticleRepository>,
    pub theme: Arc<dyn ThemeSource>,
    pub pages: Arc<PageService>,
    content: Arc<dyn ContentSource>,
    in_memory: bool,
}

impl Site {
    /// Open the index (creating its schema) and assemble the renderers.
    #[instrument(skip_all, fields(database = %config.storage.database.display()))]
    pub fn open(config: &AppConfig) -> CliResult<Self> {
        let site_data = Arc::new(load_site_data(&config.paths.data)?);

        let repository: Arc<dyn ArticleRepository> =
            Arc::new(SqliteRepository::open(&config.storage.database)?);
        repository.init_schema()?;

        let theme: Arc<dyn ThemeSource> = Arc::new(theme_for(config));
        let layouts = Arc::new(TeraLayoutRenderer::new(
            theme.clone(),
            site_data.clone(),
            config.site.template_ext.clone(),
            config.site.max_layout_depth,
        ));
        let markdown = Arc::new(HighlightingRenderer::new(&config.markdown.theme)?);

        let pages = Arc::new(PageService::new(
            repository.clone(),
            layouts,
            markdown,
            site_data,
            config.site_options(),
        ));

        Ok(Self {
            repository,
            theme,
            pages,
            content: Arc::new(LocalContent::new(&config.paths.content)),
            in_memory: config.in_memory_index(),
        })
    }

    pub fn index_service(&self) -> IndexService {
        IndexService::new(self.content.clone(), self.repository.clone())
    }

    /// Scan the content dir into the index.
    pub fn scan(&self, cancel: &Cancellation) -> CliResult<ScanReport> {
        Ok(self.index_service().scan(cancel)?)
    }

    /// Queries against a fresh in-memory index would see nothing, so those
    /// scan first. A file-backed index is queried as is.
    pub fn ensure_indexed(&self, cancel: &Cancellation) -> CliResult<()> {
        if self.in_memory {
            debug!("in-memory index, scanning before query");
            self.scan(cancel)?;
        }
        Ok(())
    }

    pub fn generator(&self) -> GeneratorService {
        GeneratorService::new(
            self.pages.clone(),
            self.theme.clone(),
            Box::new(LocalFilesystem::new()),
        )
    }

    /// Mount and start the blog module on an in-process route table.
    pub fn serve(&self, cancel: &Cancellation) -> CliResult<(BlogModule, RouteTable)> {
        let handlers = BlogHandlers::new(
            self.pages.clone(),
            self.repository.clone(),
            self.theme.clone(),
        );
        let module = BlogModule::new(self.repository.clone(), self.index_service(), handlers);

        let mut routes = RouteTable::new();
        module.mount(&mut routes)?;
        module.start(cancel)?;
        Ok((module, routes))
    }
}

/// Live theme dir over the embedded theme. A missing live dir leaves only
/// the embedded layer.
fn theme_for(config: &AppConfig) -> OverlayTheme {
    let embedded: Arc<dyn ThemeSource> = Arc::new(MemoryTheme::builtin());
    let theme_dir = &config.paths.theme;

    if theme_dir.is_dir() {
        info!(path = %theme_dir.display(), "using live theme overrides");
        OverlayTheme::new(Some(Arc::new(LocalTheme::new(theme_dir))), Some(embedded))
    } else {
        debug!(path = %theme_dir.display(), "no live theme directory, embedded theme only");
        OverlayTheme::new(None, Some(embedded))
    }
}
