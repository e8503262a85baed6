//! CLI configuration.
//!
//! Read from environment variables, with defaults suitable for
//! interactive use:
//!
//! - `SLUICE_DIGEST_ALGORITHM`: `sha256` (default) or `sha512_256`
//! - `SLUICE_LOG_FORMAT`: `text` (default) or `json`
//!
//! Log filtering itself follows `RUST_LOG` and the `-v` flags.

use sluice_core::{DigestAlgorithm, Sha2Digester};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Configuration for the `sluice` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Algorithm used for reference files and fileset digests.
    pub digest_algorithm: DigestAlgorithm,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            digest_algorithm: DigestAlgorithm::Sha256,
            log_format: LogFormat::Text,
        }
    }
}

impl CliConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("SLUICE_DIGEST_ALGORITHM") {
            let parsed: Result<DigestAlgorithm, _> = raw.trim().parse();
            config.digest_algorithm = parsed.map_err(|_| invalid("SLUICE_DIGEST_ALGORITHM", raw))?;
        }
        if let Some(raw) = lookup("SLUICE_LOG_FORMAT") {
            config.log_format = match raw.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid("SLUICE_LOG_FORMAT", raw)),
            };
        }
        Ok(config)
    }

    /// The digester selected by this configuration.
    pub fn digester(&self) -> Sha2Digester {
        Sha2Digester::new(self.digest_algorithm)
    }
}

fn invalid(var: &str, raw: String) -> ConfigError {
    ConfigError::InvalidValue(var.to_string(), raw)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}
