//! Resolution of the effective configuration from file, environment and flags.

use anyhow::{Context, Result};
use quire_core::Config;

use crate::cli::Cli;

/// Load the configuration and apply command-line overrides.
///
/// Precedence, lowest first: config file, `QUIRE_*` environment, flags.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
            .with_env_overrides(),
        None => Config::load().context("Failed to load configuration")?,
    };

    let mut config = config.with_overrides(cli.head.clone(), None);
    if cli.no_cache {
        config.cache.persist = false;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_flags_override_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[source]\nhead_url = \"https://example.com/old.json\"\n[fetch]\ntimeout_secs = 7\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "quire",
            "--config",
            path.to_str().unwrap(),
            "--head",
            "https://example.com/new.json",
            "--no-cache",
            "latest",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(
            config.source.head_url.as_deref(),
            Some("https://example.com/new.json")
        );
        assert_eq!(config.fetch.timeout_secs, 7);
        assert!(!config.cache.persist);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.toml");
        let cli = Cli::try_parse_from(["quire", "--config", path.to_str().unwrap(), "latest"])
            .unwrap();

        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
