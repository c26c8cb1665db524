//! Outcomes: what the engine reports back after a move.
//!
//! A single move may produce more than one outcome. Opening a case always
//! reports the reveal first, then either an offer or the end of the game.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CaseIndex;

/// Outcomes of one move, in the order the transport should render them.
pub type Outcomes = SmallVec<[Outcome; 2]>;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Amount won.
    pub payout: u64,

    /// True if the payout is an accepted offer, false if the player kept
    /// their own case to the end.
    pub was_accepted: bool,

    /// What the player's own case held. Always present when the game ran to
    /// exhaustion; on acceptance only if the engine discloses it.
    pub chosen_case_value: Option<u64>,
}

/// A single event the transport layer renders for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A new game began with `case_count` sealed cases.
    SessionStarted { case_count: usize },

    /// The player picked their case.
    CaseSelected { index: CaseIndex },

    /// A case was opened, revealing its value.
    CaseOpened {
        index: CaseIndex,
        value: u64,
        /// Unopened cases left besides the player's own.
        remaining_count: usize,
    },

    /// The whale makes an offer; the player must accept or decline.
    OfferMade {
        offer: u64,
        /// One-based offer number within this game.
        round: u32,
    },

    /// The player declined and may keep opening cases.
    OfferDeclined { offer: u64 },

    /// The game is over.
    GameFinished(GameResult),

    /// The player walked away without a payout.
    SessionAbandoned { chosen_case_value: Option<u64> },
}

impl Outcome {
    /// The final result, if this outcome ends the game.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        match self {
            Outcome::GameFinished(result) => Some(*result),
            _ => None,
        }
    }

    /// The offer amount, if this outcome makes one.
    #[must_use]
    pub fn offer(&self) -> Option<u64> {
        match self {
            Outcome::OfferMade { offer, .. } => Some(*offer),
            _ => None,
        }
    }

    /// Does this outcome end the session?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::GameFinished(_) | Outcome::SessionAbandoned { .. }
        )
    }
}
