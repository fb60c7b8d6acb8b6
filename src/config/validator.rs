//! Configuration validation

use super::*;
use anyhow::Result;

/// Upper bound on locales; each locale is a thread during a call
const MAX_LOCALES: usize = 4096;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_cluster(&config.cluster)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Validate cluster configuration
pub fn validate_cluster(cluster: &ClusterConfig) -> Result<()> {
    if cluster.locales == 0 || cluster.locales > MAX_LOCALES {
        anyhow::bail!("locales must be between 1 and {}, got {}", MAX_LOCALES, cluster.locales);
    }

    if cluster.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }

    if cluster.chunk_size == 0 {
        anyhow::bail!("chunk_size must be at least 1");
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.json_output {
        if path.as_os_str().is_empty() {
            anyhow::bail!("json_output path must not be empty");
        }
        if path.is_dir() {
            anyhow::bail!("json_output {} is a directory", path.display());
        }
    }

    Ok(())
}
