//! Engine configuration.
//!
//! The value set and offer cadence are supplied once, when the engine is
//! built, and never change afterwards. `EngineConfig` is serde-friendly so a
//! bootstrapper can load it from whatever file format it likes.
//!
//! ```
//! use moon_or_dust::core::EngineConfig;
//!
//! let config = EngineConfig::new(vec![10, 50, 100, 500])
//!     .with_offer_batch(2)
//!     .with_disclose_on_accept(false);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.case_count(), 4);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// The reference briefcase values.
pub const DEFAULT_VALUES: [u64; 10] = [1, 5, 10, 25, 50, 75, 100, 250, 500, 1000];

/// Opens between mandatory offers in the reference game.
pub const DEFAULT_OFFER_BATCH: usize = 3;

/// Remaining-case count at or below which every open triggers an offer.
pub const DEFAULT_LOW_REMAINING_THRESHOLD: usize = 2;

/// Smallest playable game: a chosen case plus two to open.
pub const MIN_CASES: usize = 3;

/// Case numbers are stored as `u8`.
pub const MAX_CASES: usize = u8::MAX as usize;

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Briefcase values, one per case. Order is irrelevant: every session
    /// shuffles them.
    pub values: Vec<u64>,

    /// Cadence batch size (K): an offer is due whenever the number of opened
    /// cases is a multiple of this.
    pub offer_batch: usize,

    /// An offer is also due whenever this many or fewer cases remain.
    pub low_remaining_threshold: usize,

    /// Report the chosen case's value (as trivia, never as payout) when the
    /// player accepts an offer or abandons.
    pub disclose_on_accept: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            values: DEFAULT_VALUES.to_vec(),
            offer_batch: DEFAULT_OFFER_BATCH,
            low_remaining_threshold: DEFAULT_LOW_REMAINING_THRESHOLD,
            disclose_on_accept: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with the given values and default cadence.
    pub fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Set the cadence batch size.
    #[must_use]
    pub fn with_offer_batch(mut self, batch: usize) -> Self {
        self.offer_batch = batch;
        self
    }

    /// Set the low-remaining threshold.
    #[must_use]
    pub fn with_low_remaining_threshold(mut self, threshold: usize) -> Self {
        self.low_remaining_threshold = threshold;
        self
    }

    /// Choose whether the chosen value is disclosed on accept.
    #[must_use]
    pub fn with_disclose_on_accept(mut self, disclose: bool) -> Self {
        self.disclose_on_accept = disclose;
        self
    }

    /// Number of cases (N).
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.values.len()
    }

    /// Check the configuration once, before the engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_values(&self.values)?;
        if self.offer_batch == 0 {
            return Err(ConfigError::ZeroOfferBatch);
        }
        if self.low_remaining_threshold == 0 {
            return Err(ConfigError::ZeroLowRemainingThreshold);
        }
        Ok(())
    }
}

/// Check that `values` is a playable value set: `MIN_CASES..=MAX_CASES`
/// cases, every one holding a positive value.
pub(crate) fn validate_values(values: &[u64]) -> Result<(), ConfigError> {
    let count = values.len();
    if count < MIN_CASES {
        return Err(ConfigError::TooFewCases {
            count,
            min: MIN_CASES,
        });
    }
    if count > MAX_CASES {
        return Err(ConfigError::TooManyCases {
            count,
            max: MAX_CASES,
        });
    }
    if let Some(slot) = values.iter().position(|&v| v == 0) {
        return Err(ConfigError::NonPositiveValue { slot });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.case_count(), 10);
        assert_eq!(config.offer_batch, 3);
        assert_eq!(config.low_remaining_threshold, 2);
        assert!(config.disclose_on_accept);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new(vec![1, 2, 3, 4])
            .with_offer_batch(1)
            .with_low_remaining_threshold(3)
            .with_disclose_on_accept(false);

        assert_eq!(config.values, vec![1, 2, 3, 4]);
        assert_eq!(config.offer_batch, 1);
        assert_eq!(config.low_remaining_threshold, 3);
        assert!(!config.disclose_on_accept);
    }

    #[test]
    fn test_rejects_small_value_sets() {
        assert_eq!(
            EngineConfig::new(Vec::new()).validate(),
            Err(ConfigError::TooFewCases { count: 0, min: 3 })
        );
        assert_eq!(
            EngineConfig::new(vec![1, 2]).validate(),
            Err(ConfigError::TooFewCases { count: 2, min: 3 })
        );
        assert!(EngineConfig::new(vec![1, 2, 3]).validate().is_ok());
    }

    #[test]
    fn test_rejects_large_value_sets() {
        let config = EngineConfig::new(vec![1; 256]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyCases {
                count: 256,
                max: 255
            })
        );
        assert!(EngineConfig::new(vec![1; 255]).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_value() {
        let config = EngineConfig::new(vec![5, 0, 10]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveValue { slot: 1 })
        );
    }

    #[test]
    fn test_rejects_zero_cadence() {
        let config = EngineConfig::default().with_offer_batch(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroOfferBatch));

        let config = EngineConfig::default().with_low_remaining_threshold(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLowRemainingThreshold)
        );
    }

    #[test]
    fn test_serde_fills_defaults() {
        let json = r#"{"values":[10,20,30,40]}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.values, vec![10, 20, 30, 40]);
        assert_eq!(config.offer_batch, DEFAULT_OFFER_BATCH);
        assert!(config.disclose_on_accept);

        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
