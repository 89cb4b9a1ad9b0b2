//! Tera layout renderer.
//!
//! Renders a template, then wraps the output in its parent layouts until a
//! template names no further layout. Each pass gets a fresh Tera instance
//! holding the template and every `partials/*` file of the theme.
//!
//! # Layout resolution
//!
//! ```text
//! pages/index.html          (layout: "")     → layouts/base.html
//! layouts/post.html         (no front matter) → layouts/base.html
//! pages/about.html          (layout: post)   → layouts/post.html → layouts/base.html
//! layouts/base.html         (no layout)      → done
//! ```
//!
//! The output of each pass is stored under `content` for the next one.

use std::{collections::HashMap, error::Error as _, sync::Arc};

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tera::{Context, Tera, Value};
use tracing::{debug, instrument, trace};

use quire_core::{
    application::{ApplicationError, ports::{LayoutRenderer, ThemeSource}},
    domain::{RenderContext, SiteData, ViewData, front_matter, view::LAYOUT_KEY},
    error::{QuireError, QuireResult},
};

/// Layout every chain ends with.
pub const BASE_LAYOUT: &str = "base";

/// Default cap on layout passes per render.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Output format of the `post_date` filter.
const POST_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

const WORDS_PER_MINUTE: usize = 200;

/// Front matter a template may carry. Only `layout` is interpreted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemplateMeta {
    layout: String,
}

/// A template source with its front matter split off.
struct Source {
    name: String,
    body: String,
    layout: String,
}

/// [`LayoutRenderer`] backed by Tera and a theme source.
pub struct TeraLayoutRenderer {
    theme: Arc<dyn ThemeSource>,
    site: Arc<SiteData>,
    extension: String,
    max_depth: usize,
}

impl TeraLayoutRenderer {
    pub fn new(
        theme: Arc<dyn ThemeSource>,
        site: Arc<SiteData>,
        extension: impl Into<String>,
        max_depth: usize,
    ) -> Self {
        Self {
            theme,
            site,
            extension: extension.into(),
            max_depth: max_depth.max(1),
        }
    }

    fn layout_name(&self, layout: &str) -> String {
        format!("layouts/{layout}.{}", self.extension)
    }

    fn load(&self, name: &str) -> QuireResult<Source> {
        let bytes = self.theme.open(name).map_err(|e| match e {
            QuireError::Application(ApplicationError::ThemeFileNotFound { .. }) => {
                ApplicationError::TemplateNotFound {
                    name: name.to_string(),
                }
                .into()
            }
            other => other,
        })?;

        let text = String::from_utf8(bytes).map_err(|e| ApplicationError::RenderingFailed {
            template: name.to_string(),
            reason: format!("template is not UTF-8: {e}"),
        })?;

        let (meta, body): (TemplateMeta, &str) = front_matter::decode(name, &text)?;
        Ok(Source {
            name: name.to_string(),
            body: body.to_string(),
            layout: meta.layout.trim().to_string(),
        })
    }

    fn partials(&self) -> QuireResult<Vec<Source>> {
        self.theme
            .glob(&format!("partials/*.{}", self.extension))?
            .iter()
            .map(|name| self.load(name))
            .collect()
    }

    /// One render pass of one template.
    fn pass(&self, source: &Source, partials: &[Source], ctx: &RenderContext) -> QuireResult<String> {
        let failed = |e: tera::Error| ApplicationError::RenderingFailed {
            template: source.name.clone(),
            reason: error_chain(&e),
        };

        let mut tera = Tera::default();
        // escape every template, whatever its extension
        tera.autoescape_on(vec![""]);
        register_filters(&mut tera);
        for partial in partials {
            tera.add_raw_template(&partial.name, &partial.body)
                .map_err(failed)?;
        }
        tera.add_raw_template(&source.name, &source.body)
            .map_err(failed)?;

        let context = Context::from_serialize(ctx.as_map()).map_err(failed)?;
        let html = tera.render(&source.name, &context).map_err(failed)?;
        Ok(html)
    }
}

impl LayoutRenderer for TeraLayoutRenderer {
    #[instrument(skip_all, fields(template = %template))]
    fn render(&self, template: &str, view: &ViewData) -> QuireResult<String> {
        let mut ctx = RenderContext::new(&self.site)?.with_view(view)?;
        let partials = self.partials()?;
        let base = self.layout_name(BASE_LAYOUT);

        let mut chain: Vec<String> = Vec::new();
        let mut current = template.to_string();

        loop {
            if chain.contains(&current) {
                chain.push(current);
                return Err(ApplicationError::LayoutCycle {
                    chain: chain.join(" -> "),
                }
                .into());
            }
            if chain.len() >= self.max_depth {
                return Err(ApplicationError::LayoutDepthExceeded {
                    template: template.to_string(),
                    max_depth: self.max_depth,
                }
                .into());
            }

            let source = self.load(&current)?;
            let html = self.pass(&source, &partials, &ctx)?;
            trace!(template = %current, bytes = html.len(), "render pass");

            let requested = if source.layout.is_empty() {
                ctx.get(LAYOUT_KEY)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string()
            } else {
                source.layout.clone()
            };

            let next = if !requested.is_empty() {
                self.layout_name(&requested)
            } else if current != base {
                base.clone()
            } else {
                chain.push(current);
                debug!(chain = %chain.join(" -> "), "layout chain complete");
                return Ok(html);
            };

            ctx.set_content(html);
            ctx.clear_layout();
            chain.push(std::mem::replace(&mut current, next));
        }
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}

// ── Filters ──────────────────────────────────────────────────────────────────

fn register_filters(tera: &mut Tera) {
    tera.register_filter("post_date", post_date);
    tera.register_filter("reading_time", reading_time);
}

/// `YYYY-MM-DD` or RFC 3339 → `YYYY/MM/DD HH:MM`. Anything else passes through.
fn post_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(text) = value.as_str() else {
        return Ok(value.clone());
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Value::String(dt.format(POST_DATE_FORMAT).to_string()));
    }
    if let Some(dt) = NaiveDate::parse_from_str(text, front_matter::DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Value::String(dt.format(POST_DATE_FORMAT).to_string()));
    }

    Ok(value.clone())
}

/// Estimated reading time at 200 words per minute.
fn reading_time(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("reading_time expects a string"))?;

    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE);

    let label = if minutes <= 2 {
        "a few minutes".to_string()
    } else {
        format!("{minutes} minutes")
    };
    Ok(Value::String(label))
}

/// Tera hides the useful message in the source chain.
fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
