//! `quire config` - inspect the resolved configuration.

use crate::{
    cli::ConfigCommands, config::AppConfig, error::CliResult, output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    explicit: Option<&std::path::Path>,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&config.get(&key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.data(&config.to_toml()?)?;
        }

        ConfigCommands::Path => {
            let path = explicit
                .map(|p| p.to_path_buf())
                .unwrap_or_else(AppConfig::config_path);
            let note = if path.is_file() { "" } else { " (not present)" };
            output.data(&format!("{}{note}", path.display()))?;
        }
    }

    Ok(())
}
