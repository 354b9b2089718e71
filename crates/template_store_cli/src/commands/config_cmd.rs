use std::io::Write;
use std::path::Path;

use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands managing the configuration file
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Write a configuration file populated with the defaults
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration, including defaults and overrides
    ShowConfig,
}

/// Execute a configuration command.
///
/// `config_path` is the resolved configuration file and `config` the
/// effective configuration for this invocation.
#[instrument(skip(config, out))]
pub fn execute(
    cmd: &ConfigCommands,
    config_path: &Path,
    config: &AppConfig,
    out: &mut dyn Write,
) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { force } => init_config(config_path, *force, out),
        ConfigCommands::ShowConfig => show_config(config, out),
    }
}

fn init_config(config_path: &Path, force: bool, out: &mut dyn Write) -> Result<(), Error> {
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() && !force {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    writeln!(out, "Configuration initialized at {:?}", config_path).map_err(Error::Output)
}

fn show_config(config: &AppConfig, out: &mut dyn Write) -> Result<(), Error> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;
    write!(out, "{}", text).map_err(Error::Output)
}
