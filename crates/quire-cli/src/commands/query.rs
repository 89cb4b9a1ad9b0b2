//! `quire list`, `quire search`, `quire show` - read the article index.

use serde::Serialize;
use tracing::instrument;

use quire_core::{application::Cancellation, domain::Article};

use crate::{
    cli::{ListArgs, ListFormat, SearchArgs, ShowArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    site::Site,
};

/// Row shape for JSON listings. Content is left out to keep output small.
#[derive(Serialize)]
struct Summary<'a> {
    slug: &'a str,
    title: &'a str,
    description: &'a str,
    date: Option<String>,
    url: &'a str,
}

impl<'a> From<&'a Article> for Summary<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            slug: article.slug(),
            title: &article.title,
            description: &article.description,
            date: article.date.map(|d| d.to_string()),
            url: article.url(),
        }
    }
}

#[instrument(skip_all)]
pub fn list(
    args: ListArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    let site = Site::open(&config)?;
    site.ensure_indexed(cancel)?;

    cancel.check()?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let articles = site.repository.list(args.offset, limit)?;

    render(&articles, args.format, &output, "No articles indexed")
}

#[instrument(skip_all, fields(term = %args.term))]
pub fn search(
    args: SearchArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    let site = Site::open(&config)?;
    site.ensure_indexed(cancel)?;

    cancel.check()?;
    let articles = site.repository.search(&args.term)?;

    render(
        &articles,
        args.format,
        &output,
        &format!("No articles match '{}'", args.term),
    )
}

#[instrument(skip_all, fields(slug = %args.slug))]
pub fn show(
    args: ShowArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    let site = Site::open(&config)?;
    site.ensure_indexed(cancel)?;

    if args.html {
        let html = site.pages.article(&args.slug, cancel)?;
        output.data(&html)?;
        return Ok(());
    }

    cancel.check()?;
    let article = site.repository.get_by_slug(&args.slug)?;

    output.header(&article.title)?;
    output.data(&format!("slug:        {}", article.slug()))?;
    output.data(&format!("url:         {}", article.url()))?;
    output.data(&format!("date:        {}", date_text(&article)))?;
    if !article.description.is_empty() {
        output.data(&format!("description: {}", article.description))?;
    }
    if !article.source.is_empty() {
        output.data(&format!("source:      {}", article.source))?;
    }
    output.data("")?;
    output.data(&article.content)?;
    Ok(())
}

fn render(
    articles: &[Article],
    format: ListFormat,
    output: &OutputManager,
    empty: &str,
) -> CliResult<()> {
    match format {
        ListFormat::Json => {
            let rows: Vec<Summary<'_>> = articles.iter().map(Summary::from).collect();
            output.json(&rows)
        }
        ListFormat::Table => {
            if articles.is_empty() {
                output.info(empty)?;
                return Ok(());
            }
            for line in table(articles) {
                output.data(&line)?;
            }
            Ok(())
        }
    }
}

fn date_text(article: &Article) -> String {
    article
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into())
}

/// `DATE  SLUG  TITLE` with the slug column padded to its widest value.
fn table(articles: &[Article]) -> Vec<String> {
    let width = articles
        .iter()
        .map(|a| a.slug().len())
        .max()
        .unwrap_or(0)
        .max("SLUG".len());

    let mut lines = vec![format!("{:<10}  {:<width$}  TITLE", "DATE", "SLUG")];
    lines.extend(articles.iter().map(|a| {
        format!("{:<10}  {:<width$}  {}", date_text(a), a.slug(), a.title)
    }));
    lines
}
