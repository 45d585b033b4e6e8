//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use stockroom_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "backup_dir": config.backup_dir(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:   {}", config.data_dir.display());
            println!(
                "  backup_dir: {}{}",
                config.backup_dir().display(),
                if config.backup_dir.is_none() {
                    " (default)"
                } else {
                    ""
                }
            );
            println!(
                "  log_file:   {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = PathBuf::from(value);
        }
        "backup_dir" => {
            config.backup_dir = optional_path(value);
        }
        "log_file" => {
            config.log_file = optional_path(value);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, backup_dir, log_file",
                key
            );
        }
    }
    Ok(())
}

/// Empty or "none" unsets an optional path
fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
