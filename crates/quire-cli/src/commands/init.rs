//! `quire init` - create a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Write the built-in defaults as TOML.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = if args.global {
        AppConfig::user_config_path().ok_or_else(|| CliError::ConfigError {
            message: "No per-user config directory on this platform".into(),
            source: None,
        })?
    } else {
        PathBuf::from(LOCAL_CONFIG)
    };

    if config_path.exists() && !args.force && !confirm_overwrite(&config_path)? {
        return Err(CliError::ConfigExists { path: config_path });
    }

    let toml = AppConfig::default().to_toml()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&config_path, &toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;

    Ok(())
}

/// Ask before clobbering, but only when someone is there to answer.
#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &std::path::Path) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("Prompt failed: {e}"),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &std::path::Path) -> CliResult<bool> {
    Ok(false)
}
