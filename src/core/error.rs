//! Error types.
//!
//! Every rejection leaves engine state untouched, so all `MoveError`s are
//! recoverable: the caller may retry with a corrected move. `ConfigError` is
//! the only unrecoverable condition and is reported before an engine exists.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::case::CaseIndex;
use super::player::PlayerId;
use super::state::Phase;

/// A move the engine refused to apply.
#[derive(Clone, Debug, ThisError, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveError {
    #[error("{player} has no active game")]
    NoActiveSession { player: PlayerId },
    #[error("{player} already has a game in progress")]
    SessionAlreadyActive { player: PlayerId },
    #[error("invalid move for {player}: {reason}")]
    InvalidMove {
        player: PlayerId,
        reason: InvalidMoveReason,
    },
}

impl MoveError {
    /// The player the rejected move was for.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            MoveError::NoActiveSession { player }
            | MoveError::SessionAlreadyActive { player }
            | MoveError::InvalidMove { player, .. } => *player,
        }
    }

    /// The reason, for `InvalidMove` rejections.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<InvalidMoveReason> {
        match self {
            MoveError::InvalidMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Why a move was invalid for the session's current state.
#[derive(Clone, Copy, Debug, ThisError, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidMoveReason {
    #[error("move not allowed while {phase:?}")]
    WrongPhase { phase: Phase },
    #[error("{index} is outside 1..={case_count}")]
    OutOfRange { index: CaseIndex, case_count: usize },
    #[error("{index} is the player's own case")]
    ChosenCase { index: CaseIndex },
    #[error("{index} is already open")]
    AlreadyOpened { index: CaseIndex },
}

/// Invalid engine configuration.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too few cases (count={count}, min={min})")]
    TooFewCases { count: usize, min: usize },
    #[error("too many cases (count={count}, max={max})")]
    TooManyCases { count: usize, max: usize },
    #[error("case value must be positive (slot={slot})")]
    NonPositiveValue { slot: usize },
    #[error("offer batch size must be at least 1")]
    ZeroOfferBatch,
    #[error("low-remaining threshold must be at least 1")]
    ZeroLowRemainingThreshold,
}

/// A move payload that could not be decoded.
#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("payload too large (len={len}, max={max})")]
    TooLarge { len: usize, max: usize },
    #[error("malformed move payload: {0}")]
    Malformed(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let player = PlayerId::new(5);
        let err = MoveError::NoActiveSession { player };
        assert_eq!(err.to_string(), "Player 5 has no active game");

        let index = CaseIndex::new(3);
        let err = MoveError::InvalidMove {
            player,
            reason: InvalidMoveReason::AlreadyOpened { index },
        };
        assert_eq!(
            err.to_string(),
            "invalid move for Player 5: Case 3 is already open"
        );

        let reason = InvalidMoveReason::OutOfRange {
            index: CaseIndex::new(11),
            case_count: 10,
        };
        assert_eq!(reason.to_string(), "Case 11 is outside 1..=10");

        let reason = InvalidMoveReason::WrongPhase { phase: Phase::Finished };
        assert_eq!(reason.to_string(), "move not allowed while Finished");
    }

    #[test]
    fn test_accessors() {
        let reason = InvalidMoveReason::ChosenCase {
            index: CaseIndex::new(4),
        };
        let err = MoveError::InvalidMove {
            player: PlayerId::new(1),
            reason,
        };
        assert_eq!(err.player(), PlayerId::new(1));
        assert_eq!(err.invalid_reason(), Some(reason));

        let player = PlayerId::new(2);
        let err = MoveError::SessionAlreadyActive { player };
        assert_eq!(err.player(), player);
        assert_eq!(err.invalid_reason(), None);
    }

    #[test]
    fn test_config_messages() {
        let err = ConfigError::TooFewCases { count: 2, min: 3 };
        assert_eq!(err.to_string(), "too few cases (count=2, min=3)");
    }
}
