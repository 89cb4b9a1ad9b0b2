//! `quire generate` - index, then write the static site.

use tracing::instrument;

use quire_core::application::Cancellation;

use crate::{
    cli::GenerateArgs, config::AppConfig, error::CliResult, output::OutputManager, site::Site,
};

#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    if let Some(dir) = args.output {
        config.paths.output = dir;
    }

    let site = Site::open(&config)?;

    let spinner = output.spinner("Indexing articles...");
    let scan = site.scan(cancel);
    spinner.finish_and_clear();
    let scan = scan?;

    let spinner = output.spinner("Rendering site...");
    let report = site.generator().generate(&config.paths.output, cancel);
    spinner.finish_and_clear();
    let report = report?;

    output.success(&format!("Site generated in {}", report.output.display()))?;
    output.print(&format!("  Articles: {} (indexed {})", report.articles, scan.indexed))?;
    output.print(&format!("  Pages:    {}", report.pages))?;
    output.print(&format!("  Assets:   {}", report.assets))?;
    Ok(())
}
