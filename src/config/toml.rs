//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(locales) = cli.locales {
        config.cluster.locales = locales;
    }
    if let Some(threads) = cli.threads {
        config.cluster.threads = threads;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.cluster.chunk_size = chunk_size;
    }

    if cli.seed.is_some() {
        config.runtime.seed = cli.seed;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    if cli.json_output.is_some() {
        config.output.json_output = cli.json_output.clone();
    }
    if let Some(preview) = cli.preview {
        config.output.preview = preview;
    }
    if cli.quiet {
        config.output.quiet = true;
    }

    config
}

/// Load the configuration named on the command line (or defaults) and apply CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    Ok(merge_cli_with_config(cli, base))
}
