//! Dispatcher counters for diagnostics.

use serde::{Deserialize, Serialize};

use crate::core::MoveError;
use crate::rules::{Outcome, Outcomes};

/// Counters collected while dispatching moves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Moves applied successfully.
    pub moves_applied: u64,

    /// Moves rejected with an error.
    pub moves_rejected: u64,

    /// Sessions started.
    pub sessions_started: u64,

    /// Offers made.
    pub offers_made: u64,

    /// Games ended by accepting an offer.
    pub offers_accepted: u64,

    /// Games ended by opening every other case.
    pub games_exhausted: u64,

    /// Games abandoned.
    pub sessions_abandoned: u64,

    /// Sum of all payouts.
    pub total_paid: u128,
}

impl EngineStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count the result of one move.
    pub fn record(&mut self, result: &Result<Outcomes, MoveError>) {
        let outcomes = match result {
            Ok(outcomes) => outcomes,
            Err(_) => {
                self.moves_rejected += 1;
                return;
            }
        };
        self.moves_applied += 1;
        for outcome in outcomes {
            match outcome {
                Outcome::SessionStarted { .. } => self.sessions_started += 1,
                Outcome::OfferMade { .. } => self.offers_made += 1,
                Outcome::GameFinished(result) => {
                    if result.was_accepted {
                        self.offers_accepted += 1;
                    } else {
                        self.games_exhausted += 1;
                    }
                    self.total_paid += u128::from(result.payout);
                }
                Outcome::SessionAbandoned { .. } => self.sessions_abandoned += 1,
                Outcome::CaseSelected { .. }
                | Outcome::CaseOpened { .. }
                | Outcome::OfferDeclined { .. } => {}
            }
        }
    }

    /// Games that ended with a payout.
    #[must_use]
    pub fn games_finished(&self) -> u64 {
        self.offers_accepted + self.games_exhausted
    }

    /// Fraction of finished games where the player took the offer.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        let finished = self.games_finished();
        if finished == 0 {
            0.0
        } else {
            self.offers_accepted as f64 / finished as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::rules::GameResult;
    use smallvec::smallvec;

    #[test]
    fn test_record() {
        let mut stats = EngineStats::new();

        stats.record(&Ok(smallvec![Outcome::SessionStarted { case_count: 10 }]));
        let player = PlayerId::new(1);
        stats.record(&Err(MoveError::NoActiveSession { player }));
        stats.record(&Ok(smallvec![Outcome::GameFinished(GameResult {
            payout: 300,
            was_accepted: true,
            chosen_case_value: None,
        })]));
        stats.record(&Ok(smallvec![Outcome::GameFinished(GameResult {
            payout: 25,
            was_accepted: false,
            chosen_case_value: Some(25),
        })]));

        assert_eq!(stats.moves_applied, 3);
        assert_eq!(stats.moves_rejected, 1);
        assert_eq!(stats.sessions_started, 1);
        assert_eq!(stats.games_finished(), 2);
        assert_eq!(stats.total_paid, 325);
        assert!((stats.acceptance_rate() - 0.5).abs() < f64::EPSILON);

        stats.reset();
        assert_eq!(stats, EngineStats::default());
        assert_eq!(stats.acceptance_rate(), 0.0);
    }
}
