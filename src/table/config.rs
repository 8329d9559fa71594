//! Table configuration models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::constants::{DEFAULT_SEED, MAX_SEATS, MIN_SEATS};
use crate::game::entities::{
    Chips, DEFAULT_BIG_BLIND, DEFAULT_INITIAL_STACK, DEFAULT_SMALL_BLIND,
};
use crate::game::holdem::HoldemOptions;

/// Table configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Display name for the table
    pub name: String,

    /// Small blind amount
    pub small_blind: Chips,

    /// Big blind amount
    pub big_blind: Chips,

    /// Chips each seat starts with
    pub initial_stack: Chips,

    /// Shuffle seed; deals are a pure function of (seed, hand number)
    pub seed: u64,

    /// Maximum number of seats
    pub max_seats: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Main Table".to_string(),
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            initial_stack: DEFAULT_INITIAL_STACK,
            seed: DEFAULT_SEED,
            max_seats: MAX_SEATS,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 {
            return Err(ConfigError::Invalid {
                field: "small_blind",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.big_blind <= self.small_blind {
            return Err(ConfigError::Invalid {
                field: "big_blind",
                reason: format!("must be greater than small blind ({})", self.small_blind),
            });
        }
        if self.initial_stack < self.big_blind {
            return Err(ConfigError::Invalid {
                field: "initial_stack",
                reason: format!("must cover the big blind ({})", self.big_blind),
            });
        }
        if self.max_seats < MIN_SEATS || self.max_seats > MAX_SEATS {
            return Err(ConfigError::Invalid {
                field: "max_seats",
                reason: format!("must be between {MIN_SEATS} and {MAX_SEATS}"),
            });
        }
        Ok(())
    }
}

impl From<&TableConfig> for HoldemOptions {
    fn from(config: &TableConfig) -> Self {
        Self {
            seed: config.seed,
            initial_stack: config.initial_stack,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            test_deck: None,
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_small_blind_rejected() {
        let config = TableConfig {
            small_blind: 0,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_big_blind_must_exceed_small() {
        let config = TableConfig {
            small_blind: 10,
            big_blind: 10,
            ..TableConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("big_blind"));
    }

    #[test]
    fn test_stack_must_cover_big_blind() {
        let config = TableConfig {
            initial_stack: 5,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seat_count_bounds() {
        for max_seats in [0, 1, 7] {
            let config = TableConfig {
                max_seats,
                ..TableConfig::default()
            };
            assert!(config.validate().is_err(), "max_seats {max_seats} accepted");
        }
    }

    #[test]
    fn test_options_conversion() {
        let config = TableConfig {
            small_blind: 25,
            big_blind: 50,
            initial_stack: 5_000,
            seed: 77,
            ..TableConfig::default()
        };
        let options = HoldemOptions::from(&config);
        assert_eq!(options.small_blind, 25);
        assert_eq!(options.big_blind, 50);
        assert_eq!(options.initial_stack, 5_000);
        assert_eq!(options.seed, 77);
        assert!(options.test_deck.is_none());
    }
}
