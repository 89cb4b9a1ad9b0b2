//! Generator Service - writes the whole site to disk.
//!
//! This service coordinates the static build:
//! 1. Copy theme assets
//! 2. Render the home page, every page under `pages/`, and every article
//! 3. Write the Atom feed
//!
//! Everything is written into a staging directory next to the output and
//! moved into place only when every file succeeded. Any error aborts the run
//! and removes the staging tree, so a failed build never leaves a partial
//! site behind.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, Cancellation,
        ports::{Filesystem, ThemeSource},
        services::PageService,
    },
    error::{QuireError, QuireResult},
};

/// What a finished build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub output: PathBuf,
    /// Home page plus every rendered page template.
    pub pages: usize,
    pub articles: usize,
    pub assets: usize,
}

/// Static site generator.
pub struct GeneratorService {
    pages: Arc<PageService>,
    theme: Arc<dyn ThemeSource>,
    filesystem: Box<dyn Filesystem>,
}

impl GeneratorService {
    pub fn new(
        pages: Arc<PageService>,
        theme: Arc<dyn ThemeSource>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            pages,
            theme,
            filesystem,
        }
    }

    /// Build the site into `output`, replacing its previous content.
    #[instrument(skip_all, fields(output = %output.display()))]
    pub fn generate(&self, output: &Path, cancel: &Cancellation) -> QuireResult<GenerationReport> {
        let staging = sibling_path(output, "partial")?;

        if self.filesystem.exists(&staging) {
            debug!(path = %staging.display(), "removing stale staging directory");
            self.filesystem.remove_dir_all(&staging)?;
        }

        let mut report = match self.write_site(&staging, cancel) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "generation failed, discarding staged output");
                self.rollback(&staging);
                return Err(e);
            }
        };

        if let Err(e) = self.swap(&staging, output) {
            self.rollback(&staging);
            return Err(e);
        }

        report.output = output.to_path_buf();
        info!(
            pages = report.pages,
            articles = report.articles,
            assets = report.assets,
            "site generated"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn write_site(&self, root: &Path, cancel: &Cancellation) -> QuireResult<GenerationReport> {
        let mut report = GenerationReport::default();
        self.filesystem.create_dir_all(root)?;

        report.assets = self.copy_assets("assets", &root.join("assets"), cancel)?;

        let index = self.pages.index(cancel)?;
        self.write(&root.join("index.html"), index.as_bytes(), cancel)?;
        report.pages += 1;

        report.pages += self.walk_pages("", root, cancel)?;

        for article in self.pages.all_articles(cancel)? {
            let html = self.pages.render_article(&article)?;
            let path = root.join("blog").join(article.slug()).join("index.html");
            self.write(&path, html.as_bytes(), cancel)?;
            report.articles += 1;
        }

        let feed = self.pages.feed(cancel)?;
        self.write(&root.join("feed.xml"), feed.as_bytes(), cancel)?;

        Ok(report)
    }

    /// Copy a theme directory verbatim. A theme without it copies nothing.
    fn copy_assets(&self, dir: &str, target: &Path, cancel: &Cancellation) -> QuireResult<usize> {
        cancel.check()?;
        let entries = match self.theme.read_dir(dir) {
            Ok(entries) => entries,
            Err(QuireError::Application(ApplicationError::ThemeFileNotFound { .. })) => {
                debug!(dir, "theme has no assets");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let mut copied = 0;
        for entry in entries {
            let name = format!("{dir}/{}", entry.name);
            let dest = target.join(&entry.name);
            if entry.is_dir {
                copied += self.copy_assets(&name, &dest, cancel)?;
            } else {
                cancel.check()?;
                let bytes = self.theme.open(&name)?;
                self.write(&dest, &bytes, cancel)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    /// Render every template under `pages/<rel>`.
    ///
    /// `pages/index` is the home page and is skipped here. `<dir>/index`
    /// becomes `<dir>/index.html` and any other template `<name>.html`.
    fn walk_pages(&self, rel: &str, root: &Path, cancel: &Cancellation) -> QuireResult<usize> {
        cancel.check()?;
        let dir = if rel.is_empty() {
            "pages".to_string()
        } else {
            format!("pages/{rel}")
        };

        let entries = match self.theme.read_dir(&dir) {
            Ok(entries) => entries,
            Err(QuireError::Application(ApplicationError::ThemeFileNotFound { .. })) => {
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let suffix = format!(".{}", self.pages.extension());
        let mut rendered = 0;

        for entry in entries {
            let child = join_rel(rel, &entry.name);
            if entry.is_dir {
                rendered += self.walk_pages(&child, root, cancel)?;
                continue;
            }

            let Some(stem) = child.strip_suffix(&suffix) else {
                debug!(file = %child, "skipping non-template file in pages");
                continue;
            };

            if stem == "index" {
                continue;
            }

            let (html, out) = if stem == "blog/index" {
                (self.pages.blog(cancel)?, root.join("blog").join("index.html"))
            } else if let Some(dir) = stem.strip_suffix("/index") {
                let url = format!("/{dir}/");
                (self.pages.page(stem, &url)?, root.join(dir).join("index.html"))
            } else {
                let url = format!("/{stem}.html");
                (self.pages.page(stem, &url)?, root.join(format!("{stem}.html")))
            };

            self.write(&out, html.as_bytes(), cancel)?;
            rendered += 1;
        }

        Ok(rendered)
    }

    fn write(&self, path: &Path, content: &[u8], cancel: &Cancellation) -> QuireResult<()> {
        cancel.check()?;
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }

    /// Replace `output` with the finished staging tree.
    ///
    /// The previous site is parked at a backup sibling until the staged tree
    /// is in place, and moved back if that rename fails.
    fn swap(&self, staging: &Path, output: &Path) -> QuireResult<()> {
        let backup = sibling_path(output, "previous")?;
        let had_output = self.filesystem.exists(output);

        if had_output {
            if self.filesystem.exists(&backup) {
                self.filesystem.remove_dir_all(&backup)?;
            }
            self.filesystem.rename(output, &backup)?;
        }

        if let Err(e) = self.filesystem.rename(staging, output) {
            if had_output {
                if let Err(restore) = self.filesystem.rename(&backup, output) {
                    return Err(ApplicationError::RollbackFailed {
                        path: output.to_path_buf(),
                        reason: format!("{e}; restoring previous output: {restore}"),
                    }
                    .into());
                }
            }
            return Err(e);
        }

        if had_output {
            if let Err(e) = self.filesystem.remove_dir_all(&backup) {
                warn!(error = %e, path = %backup.display(), "could not remove previous output");
            }
        }
        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, staging: &Path) {
        if !self.filesystem.exists(staging) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(staging) {
            warn!(
                error = %e,
                path = %staging.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

fn join_rel(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}

/// Hidden sibling of `output` named `.<name>.<suffix>`. Staging uses
/// `partial`, the swap parks the previous site under `previous`.
fn sibling_path(output: &Path, suffix: &str) -> QuireResult<PathBuf> {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .ok_or_else(|| QuireError::Configuration {
            message: format!(
                "output must be a named directory, got '{}'",
                output.display()
            ),
        })?;

    Ok(output.with_file_name(format!(".{name}.{suffix}")))
}
