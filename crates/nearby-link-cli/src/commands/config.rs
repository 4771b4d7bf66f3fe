//! Config command implementation.

use std::path::PathBuf;

use nearby_link_core::{default_config_path, TrackerConfig};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the config command
pub async fn run_config(
    args: ConfigArgs,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommands::Show => run_show(config_path, json).await,
        ConfigCommands::Init(init) => run_init(config_path, init.force, json).await,
    }
}

async fn run_show(config_path: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let path = config_path.or_else(default_config_path);

    let (config, source) = match &path {
        Some(path) if path.exists() => (TrackerConfig::load_from(path).await?, Some(path.as_path())),
        _ => (TrackerConfig::default(), None),
    };

    println!("{}", get_formatter(json).format_config(&config, source));

    Ok(())
}

async fn run_init(config_path: Option<PathBuf>, force: bool, json: bool) -> Result<(), CliError> {
    let path = config_path.or_else(default_config_path).ok_or_else(|| {
        CliError::Other("could not determine a config directory for this platform".to_string())
    })?;

    if path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "config file {} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let config = TrackerConfig::default();
    config.save_to(&path).await?;

    if json {
        println!("{}", serde_json::json!({ "path": path.display().to_string() }));
    } else {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
