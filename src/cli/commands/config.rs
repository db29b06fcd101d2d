//! Configuration commands.

use serde_json::json;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::DocketError;
use crate::output::to_json;

/// Show the configuration, the data paths, or write a default config file.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized or written, or
/// `init` would overwrite an existing file.
pub fn config(
    paths: &Paths,
    config: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, DocketError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => config.to_yaml(),
        },

        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&json!({
                "root": paths.root,
                "config_file": paths.config_file,
                "database": paths.database,
                "pending": paths.pending,
            })),
            OutputFormat::Pretty => Ok(format!(
                "root:     {}\nconfig:   {}\ndatabase: {}\npending:  {}",
                paths.root.display(),
                paths.config_file.display(),
                paths.database.display(),
                paths.pending.display()
            )),
        },

        ConfigCommands::Init => {
            if paths.config_file.exists() {
                return Err(DocketError::Usage(format!(
                    "{} already exists",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!("Wrote {}", paths.config_file.display()))
        }
    }
}
