//! `quire index` - scan markdown into the article index.

use tracing::instrument;

use quire_core::application::Cancellation;

use crate::{
    cli::IndexArgs, config::AppConfig, error::CliResult, output::OutputManager, site::Site,
};

#[instrument(skip_all)]
pub fn execute(
    args: IndexArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    let site = Site::open(&config)?;

    let spinner = output.spinner("Indexing articles...");
    let report = site.scan(cancel);
    spinner.finish_and_clear();
    let report = report?;

    if report.scanned == 0 {
        output.warning(&format!(
            "No markdown files under {}",
            config.paths.content.display()
        ))?;
    }

    output.success(&format!(
        "Indexed {} of {} documents from {} ({} in index)",
        report.indexed,
        report.scanned,
        config.paths.content.display(),
        report.total,
    ))?;
    if config.in_memory_index() {
        output.info("Database is :memory:, the index is discarded on exit")?;
    }
    Ok(())
}
