//! Engine configuration.
//!
//! Consolidates the tunable constants of the pairing and ranking engine and
//! provides validated loading from environment variables.

use serde::{Deserialize, Serialize};

/// Largest number of competitors placed in one score bracket.
pub const DEFAULT_MAX_BRACKET_SIZE: usize = 25;

/// Lower bound applied to every tiebreaker percentage.
pub const DEFAULT_TIEBREAKER_FLOOR: f64 = 0.33;

/// Decimal places kept when storing tiebreaker percentages.
pub const DEFAULT_TIEBREAKER_PRECISION: u32 = 4;

/// Best-of-three matches.
pub const DEFAULT_GAMES_PER_MATCH: u8 = 3;

/// Tunable parameters of the Swiss engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwissConfig {
    /// Maximum competitors per bracket before a same-score bracket is split
    pub max_bracket_size: usize,

    /// Table number assigned to the first match of a round
    pub first_table: u32,

    /// Decimal places kept for tiebreaker percentages
    pub tiebreaker_precision: u32,

    /// Floor applied to match/game win percentages and their opponent averages
    pub tiebreaker_floor: f64,

    /// Lowest random weight assigned to a candidate pairing
    pub min_edge_weight: i64,

    /// Highest random weight assigned to a candidate pairing
    pub max_edge_weight: i64,

    /// Weight of a candidate pairing that involves a pushed-down competitor
    pub pushdown_edge_weight: i64,

    /// Maximum number of games reported for a single match
    pub games_per_match: u8,

    /// Pair unresolvable leftovers against previous opponents instead of failing
    pub allow_repeat_fallback: bool,

    /// Break exact standings ties by player name
    pub standings_name_tiebreak: bool,
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self {
            max_bracket_size: DEFAULT_MAX_BRACKET_SIZE,
            first_table: 1,
            tiebreaker_precision: DEFAULT_TIEBREAKER_PRECISION,
            tiebreaker_floor: DEFAULT_TIEBREAKER_FLOOR,
            min_edge_weight: 1,
            max_edge_weight: 9,
            pushdown_edge_weight: 10,
            games_per_match: DEFAULT_GAMES_PER_MATCH,
            allow_repeat_fallback: false,
            standings_name_tiebreak: true,
        }
    }
}

impl SwissConfig {
    /// Load configuration from environment variables
    ///
    /// Recognised variables (all optional, defaults in parentheses):
    /// - `SWISS_MAX_BRACKET_SIZE` (25)
    /// - `SWISS_FIRST_TABLE` (1)
    /// - `SWISS_TIEBREAKER_PRECISION` (4)
    /// - `SWISS_TIEBREAKER_FLOOR` (0.33)
    /// - `SWISS_MIN_EDGE_WEIGHT` / `SWISS_MAX_EDGE_WEIGHT` (1 / 9)
    /// - `SWISS_PUSHDOWN_EDGE_WEIGHT` (10)
    /// - `SWISS_GAMES_PER_MATCH` (3)
    /// - `SWISS_ALLOW_REPEAT_FALLBACK` (false)
    /// - `SWISS_STANDINGS_NAME_TIEBREAK` (true)
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration fails [`SwissConfig::validate`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            max_bracket_size: parse_env_or("SWISS_MAX_BRACKET_SIZE", defaults.max_bracket_size),
            first_table: parse_env_or("SWISS_FIRST_TABLE", defaults.first_table),
            tiebreaker_precision: parse_env_or(
                "SWISS_TIEBREAKER_PRECISION",
                defaults.tiebreaker_precision,
            ),
            tiebreaker_floor: parse_env_or("SWISS_TIEBREAKER_FLOOR", defaults.tiebreaker_floor),
            min_edge_weight: parse_env_or("SWISS_MIN_EDGE_WEIGHT", defaults.min_edge_weight),
            max_edge_weight: parse_env_or("SWISS_MAX_EDGE_WEIGHT", defaults.max_edge_weight),
            pushdown_edge_weight: parse_env_or(
                "SWISS_PUSHDOWN_EDGE_WEIGHT",
                defaults.pushdown_edge_weight,
            ),
            games_per_match: parse_env_or("SWISS_GAMES_PER_MATCH", defaults.games_per_match),
            allow_repeat_fallback: parse_env_or(
                "SWISS_ALLOW_REPEAT_FALLBACK",
                defaults.allow_repeat_fallback,
            ),
            standings_name_tiebreak: parse_env_or(
                "SWISS_STANDINGS_NAME_TIEBREAK",
                defaults.standings_name_tiebreak,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bracket_size < 2 {
            return Err(ConfigError::Invalid {
                var: "SWISS_MAX_BRACKET_SIZE".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.tiebreaker_precision > 8 {
            return Err(ConfigError::Invalid {
                var: "SWISS_TIEBREAKER_PRECISION".to_string(),
                reason: "Must be at most 8 decimal places".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.tiebreaker_floor) {
            return Err(ConfigError::Invalid {
                var: "SWISS_TIEBREAKER_FLOOR".to_string(),
                reason: "Must be between 0 and 1".to_string(),
            });
        }

        if self.min_edge_weight < 1 || self.min_edge_weight > self.max_edge_weight {
            return Err(ConfigError::Invalid {
                var: "SWISS_MIN_EDGE_WEIGHT".to_string(),
                reason: format!(
                    "Must be positive and not above max edge weight ({})",
                    self.max_edge_weight
                ),
            });
        }

        if self.pushdown_edge_weight <= self.max_edge_weight {
            return Err(ConfigError::Invalid {
                var: "SWISS_PUSHDOWN_EDGE_WEIGHT".to_string(),
                reason: format!(
                    "Must be greater than max edge weight ({})",
                    self.max_edge_weight
                ),
            });
        }

        if self.games_per_match == 0 {
            return Err(ConfigError::Invalid {
                var: "SWISS_GAMES_PER_MATCH".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
pub fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = SwissConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_bracket_size, 25);
        assert_eq!(config.pushdown_edge_weight, 10);
        assert_eq!(config.games_per_match, 3);
    }

    #[test]
    fn test_rejects_tiny_brackets() {
        let config = SwissConfig {
            max_bracket_size: 1,
            ..SwissConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { var, .. }) if var == "SWISS_MAX_BRACKET_SIZE"
        ));
    }

    #[test]
    fn test_rejects_pushdown_weight_not_above_random_range() {
        let config = SwissConfig {
            pushdown_edge_weight: 9,
            ..SwissConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_weight_range() {
        let config = SwissConfig {
            min_edge_weight: 5,
            max_edge_weight: 4,
            ..SwissConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_and_fallbacks() {
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            std::env::set_var("SWISS_MAX_BRACKET_SIZE", "16");
            std::env::set_var("SWISS_FIRST_TABLE", "not-a-number");
        }

        let config = SwissConfig::from_env().expect("valid configuration");
        assert_eq!(config.max_bracket_size, 16);
        assert_eq!(config.first_table, 1);

        unsafe {
            std::env::remove_var("SWISS_MAX_BRACKET_SIZE");
            std::env::remove_var("SWISS_FIRST_TABLE");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_result() {
        unsafe {
            std::env::set_var("SWISS_GAMES_PER_MATCH", "0");
        }

        assert!(SwissConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("SWISS_GAMES_PER_MATCH");
        }
    }
}
