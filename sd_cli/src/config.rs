//! Command line configuration management.
//!
//! Consolidates the environment variable reads of the operator tool and
//! provides validated configuration.

use std::path::PathBuf;
use swiss_draft::config::{ConfigError, SwissConfig};

/// Default directory of the JSON tournament store
pub const DEFAULT_STORE_DIR: &str = "./swiss_data";

/// Complete command line configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding one JSON file per tournament
    pub store_dir: PathBuf,
    /// Seed of the pairing and seating randomness, OS entropy when absent
    pub seed: Option<u64>,
    /// Engine settings for newly created tournaments
    pub swiss: SwissConfig,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `store_override` - Optional store directory (from `--store`)
    /// * `seed_override` - Optional random seed (from `--seed`)
    ///
    /// # Errors
    ///
    /// Returns error if `SD_SEED` or an engine variable is invalid
    pub fn from_env(
        store_override: Option<PathBuf>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let store_dir = store_override
            .or_else(|| std::env::var("SD_STORE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => match std::env::var("SD_SEED") {
                Ok(value) => Some(value.parse().map_err(|_| ConfigError::Invalid {
                    var: "SD_SEED".to_string(),
                    reason: format!("'{}' is not an unsigned integer", value),
                })?),
                Err(_) => None,
            },
        };

        let config = CliConfig {
            store_dir,
            seed,
            swiss: SwissConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "SD_STORE_DIR".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }
        self.swiss.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_overrides_win_over_environment() {
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            std::env::set_var("SD_STORE_DIR", "/tmp/from-env");
            std::env::set_var("SD_SEED", "5");
        }

        let config = CliConfig::from_env(Some(PathBuf::from("/tmp/flag")), Some(9))
            .expect("valid configuration");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/flag"));
        assert_eq!(config.seed, Some(9));

        let config = CliConfig::from_env(None, None).expect("valid configuration");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/from-env"));
        assert_eq!(config.seed, Some(5));

        unsafe {
            std::env::remove_var("SD_STORE_DIR");
            std::env::remove_var("SD_SEED");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let config = CliConfig::from_env(None, None).expect("valid configuration");
        assert_eq!(config.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
        assert_eq!(config.seed, None);
        assert_eq!(config.swiss, SwissConfig::default());
    }

    #[test]
    #[serial]
    fn test_invalid_seed() {
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            std::env::set_var("SD_SEED", "lucky");
        }

        let err = CliConfig::from_env(None, None).unwrap_err();
        assert!(err.to_string().contains("SD_SEED"));

        unsafe {
            std::env::remove_var("SD_SEED");
        }
    }

    #[test]
    fn test_empty_store_dir_is_invalid() {
        let config = CliConfig {
            store_dir: PathBuf::new(),
            seed: None,
            swiss: SwissConfig::default(),
        };
        assert!(config.validate().is_err());
    }
}
