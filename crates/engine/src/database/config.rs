//! Key generator configuration via `keygen.toml`
//!
//! On first start a commented default file is written next to the data.
//! To change settings, edit the file and restart.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{StrataError, StrataResult};

use super::transactions::RetryConfig;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "keygen.toml";

/// Key generator configuration loaded from `keygen.toml`.
///
/// # Example
///
/// ```toml
/// [counter_retry]
/// max_retries = 64
/// base_delay_ms = 1
/// max_delay_ms = 50
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeygenConfig {
    /// Retry policy for int32 counter allocation
    pub counter_retry: RetryConfig,
    /// Retry policy for storing documents under a generated key
    pub write_retry: RetryConfig,
}

impl KeygenConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata key generator configuration
#
# Retry policy for int32 auto-increment counters.
# Conflicting increments are retried with exponential backoff:
#   delay = min(base_delay_ms * 2^attempt, max_delay_ms)
[counter_retry]
max_retries = 64      # attempts after the first; 0 = no retry
base_delay_ms = 1
max_delay_ms = 50

# Retry policy for the transaction that stores a document
# under its generated key.
[write_retry]
max_retries = 64
base_delay_ms = 1
max_delay_ms = 50
"#
    }

    /// Check every retry section
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the offending section.
    pub fn validate(&self) -> StrataResult<()> {
        for (section, retry) in [
            ("counter_retry", &self.counter_retry),
            ("write_retry", &self.write_retry),
        ] {
            retry.validate().map_err(|e| {
                StrataError::invalid_input(format!("[{}] in {}: {}", section, CONFIG_FILE_NAME, e))
            })?;
        }
        Ok(())
    }

    /// Validated retry policy for counter allocation.
    pub fn retry_config(&self) -> StrataResult<RetryConfig> {
        self.validate()?;
        Ok(self.counter_retry.clone())
    }

    /// Validated retry policy for document writes.
    pub fn write_retry_config(&self) -> StrataResult<RetryConfig> {
        self.validate()?;
        Ok(self.write_retry.clone())
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> StrataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StrataError::storage(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: KeygenConfig = toml::from_str(&content).map_err(|e| {
            StrataError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> StrataResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                StrataError::storage(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> StrataResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StrataError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            StrataError::storage(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
