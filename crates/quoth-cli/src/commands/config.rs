//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quoth_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str = "data_dir, session_dir, sync_url, sync_enabled, sync_interval_secs, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "session_dir": config.session_dir,
                    "sync_url": config.sync_url,
                    "sync_enabled": config.sync_enabled,
                    "sync_interval_secs": config.sync_interval_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!("  session_dir:        {}", config.session_dir.display());
            println!("  sync_url:           {}", config.sync_url);
            println!("  sync_enabled:       {}", config.sync_enabled);
            println!("  sync_interval_secs: {}", config.sync_interval_secs);
            println!(
                "  log_file:           {}",
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
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "session_dir" => config.session_dir = value.into(),
        "sync_url" => {
            if value.trim().is_empty() {
                bail!("sync_url cannot be empty");
            }
            config.sync_url = value.to_string();
        }
        "sync_enabled" => {
            config.sync_enabled = value
                .parse()
                .context("Invalid value for sync_enabled. Use 'true' or 'false'.")?;
        }
        "sync_interval_secs" => {
            let secs: u64 = value
                .parse()
                .context("Invalid value for sync_interval_secs. Use a whole number of seconds.")?;
            if secs == 0 {
                bail!("sync_interval_secs must be at least 1");
            }
            config.sync_interval_secs = secs;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "sync_enabled", "true").unwrap();
        apply_setting(&mut config, "sync_interval_secs", "45").unwrap();
        apply_setting(&mut config, "log_file", "/tmp/quoth.log").unwrap();
        apply_setting(&mut config, "sync_url", "http://localhost:8080/posts").unwrap();

        assert!(config.sync_enabled);
        assert_eq!(config.sync_interval_secs, 45);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/quoth.log")));
        assert_eq!(config.sync_url, "http://localhost:8080/posts");

        apply_setting(&mut config, "log_file", "none").unwrap();
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply_setting(&mut config, "sync_enabled", "maybe").is_err());
        assert!(apply_setting(&mut config, "sync_interval_secs", "0").is_err());
        assert!(apply_setting(&mut config, "sync_interval_secs", "soon").is_err());
        assert!(apply_setting(&mut config, "sync_url", "  ").is_err());

        let err = apply_setting(&mut config, "favorite", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        let data_dir = temp.path().join("data");
        let mut initial = Config::default();
        initial.data_dir = data_dir.clone();
        initial.save_to_path(&config_path).unwrap();

        let output = Output::new(OutputFormat::Quiet);
        set(
            "sync_interval_secs".to_string(),
            "90".to_string(),
            Some(&config_path),
            &output,
        )
        .unwrap();

        let saved = std::fs::read_to_string(&config_path).unwrap();
        let config: Config = toml::from_str(&saved).unwrap();
        assert_eq!(config.sync_interval_secs, 90);
        assert_eq!(config.data_dir, data_dir);
    }
}
