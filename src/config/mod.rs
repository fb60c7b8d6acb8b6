//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Cluster layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Number of locales every array is partitioned over
    #[serde(default = "default_locales")]
    pub locales: usize,
    /// Threads in the pool shared by locale-local parallel loops
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Elements per random stream within a locale
    ///
    /// Part of the reproducibility contract: the same seed with a different
    /// chunk size yields different values.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_locales() -> usize {
    4
}

fn default_threads() -> usize {
    num_cpus::get()
}

fn default_chunk_size() -> usize {
    4096
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            threads: default_threads(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Runtime behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Fixed seed for reproducible output (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Print DEBUG diagnostics to stderr
    #[serde(default)]
    pub debug: bool,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write a JSON report to this path
    #[serde(default)]
    pub json_output: Option<PathBuf>,
    /// Number of leading elements shown in summaries
    #[serde(default = "default_preview")]
    pub preview: usize,
    /// Only print the reply line
    #[serde(default)]
    pub quiet: bool,
}

fn default_preview() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_output: None,
            preview: default_preview(),
            quiet: false,
        }
    }
}

impl fmt::Display for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locales, {} threads, chunk size {}",
            self.locales, self.threads, self.chunk_size
        )
    }
}
