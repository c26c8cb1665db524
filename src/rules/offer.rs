//! Offer cadence and offer arithmetic.
//!
//! The whale's offer is always the floor of the mean of the values still in
//! play. Fractions round down so offers never exceed the fair average.

use crate::core::EngineConfig;

/// Floor of the arithmetic mean, or `None` for an empty slice.
///
/// Sums are accumulated in `u128`, so no configuration of `u64` values
/// can overflow.
///
/// ```
/// use moon_or_dust::rules::floor_mean;
///
/// assert_eq!(floor_mean(&[1, 2]), Some(1));
/// assert_eq!(floor_mean(&[10, 20, 30]), Some(20));
/// assert_eq!(floor_mean(&[]), None);
/// ```
#[must_use]
pub fn floor_mean(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    // The mean of u64s always fits in a u64.
    Some((sum / values.len() as u128) as u64)
}

/// Decides when offers are made and how much they are worth.
///
/// Implementations must be pure functions of their inputs: the engine may
/// ask twice for the same state and expects the same answer.
pub trait OfferPolicy {
    /// Is an offer due after the `opened_count`-th open, with
    /// `remaining_count` (non-zero) cases still in play?
    fn is_due(&self, opened_count: usize, remaining_count: usize) -> bool;

    /// The offer for the given remaining values. `None` if nothing remains.
    fn offer(&self, remaining: &[u64]) -> Option<u64> {
        floor_mean(remaining)
    }
}

/// Offer every `batch` opens, and after every open once few cases remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CadencePolicy {
    /// Cadence batch size (K).
    pub batch: usize,
    /// Offer after every open once this many or fewer cases remain.
    pub low_remaining: usize,
}

impl CadencePolicy {
    /// Create a cadence policy. `batch` must be non-zero.
    #[must_use]
    pub const fn new(batch: usize, low_remaining: usize) -> Self {
        Self {
            batch,
            low_remaining,
        }
    }

    /// Build the policy described by an (already validated) configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.offer_batch, config.low_remaining_threshold)
    }
}

impl Default for CadencePolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl OfferPolicy for CadencePolicy {
    fn is_due(&self, opened_count: usize, remaining_count: usize) -> bool {
        // checked_rem guards a hand-built policy with batch == 0.
        let batch_hit = opened_count.checked_rem(self.batch) == Some(0);
        batch_hit || remaining_count <= self.low_remaining
    }
}
