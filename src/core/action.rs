//! Moves: what a player asks the engine to do.
//!
//! A `Move` is a tagged variant carrying typed fields. Transports that must
//! smuggle moves through opaque payloads (inline-button callback data, for
//! instance) use `Move::encode` / `Move::decode` instead of inventing a
//! delimited string format.
//!
//! ```
//! use moon_or_dust::core::{CaseIndex, Move, PlayerId};
//!
//! let mv = Move::OpenCase {
//!     player: PlayerId::new(7),
//!     index: CaseIndex::new(3),
//! };
//! let payload = mv.encode().unwrap();
//! assert!(payload.len() <= Move::MAX_PAYLOAD_LEN);
//! assert_eq!(Move::decode(&payload).unwrap(), mv);
//! ```

use bincode::Options;
use serde::{Deserialize, Serialize};

use super::case::CaseIndex;
use super::error::CodecError;
use super::player::PlayerId;

/// Player's answer to a pending offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Take the offer and end the game ("Moon").
    Accept,
    /// Refuse the offer and keep opening ("Dust").
    Decline,
}

/// A discrete move submitted by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Begin a new game.
    StartSession { player: PlayerId },
    /// Pick the case the player keeps until the end.
    SelectCase { player: PlayerId, index: CaseIndex },
    /// Reveal one of the other cases.
    OpenCase { player: PlayerId, index: CaseIndex },
    /// Accept or decline the pending offer.
    ResolveOffer {
        player: PlayerId,
        decision: Decision,
    },
    /// Walk away from the current game without a payout.
    Abandon { player: PlayerId },
}

impl Move {
    /// Largest encoded payload. Matches the tightest callback-data limit
    /// common chat platforms impose.
    pub const MAX_PAYLOAD_LEN: usize = 64;

    /// The player this move is for.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match *self {
            Move::StartSession { player }
            | Move::SelectCase { player, .. }
            | Move::OpenCase { player, .. }
            | Move::ResolveOffer { player, .. }
            | Move::Abandon { player } => player,
        }
    }

    /// Short move name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Move::StartSession { .. } => "start_session",
            Move::SelectCase { .. } => "select_case",
            Move::OpenCase { .. } => "open_case",
            Move::ResolveOffer { .. } => "resolve_offer",
            Move::Abandon { .. } => "abandon",
        }
    }

    /// Encode into a compact binary payload.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let bytes = payload_options().serialize(self)?;
        check_len(bytes.len())?;
        Ok(bytes)
    }

    /// Decode a payload produced by `encode`.
    ///
    /// Oversized, truncated, or otherwise malformed payloads are rejected,
    /// including a valid move followed by trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        check_len(bytes.len())?;
        Ok(payload_options().deserialize(bytes)?)
    }
}

/// Fixed-width integers, and no slack after the move.
fn payload_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn check_len(len: usize) -> Result<(), CodecError> {
    if len > Move::MAX_PAYLOAD_LEN {
        return Err(CodecError::TooLarge {
            len,
            max: Move::MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_moves() -> Vec<Move> {
        let player = PlayerId::new(u64::MAX);
        vec![
            Move::StartSession { player },
            Move::SelectCase {
                player,
                index: CaseIndex::new(4),
            },
            Move::OpenCase {
                player,
                index: CaseIndex::new(255),
            },
            Move::ResolveOffer {
                player,
                decision: Decision::Accept,
            },
            Move::ResolveOffer {
                player,
                decision: Decision::Decline,
            },
            Move::Abandon { player },
        ]
    }

    #[test]
    fn test_player() {
        for mv in sample_moves() {
            assert_eq!(mv.player(), PlayerId::new(u64::MAX));
        }
    }

    #[test]
    fn test_kind() {
        let kinds: Vec<_> = sample_moves().iter().map(Move::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "start_session",
                "select_case",
                "open_case",
                "resolve_offer",
                "resolve_offer",
                "abandon",
            ]
        );
    }

    #[test]
    fn test_payloads_fit_callback_limit() {
        for mv in sample_moves() {
            let payload = mv.encode().unwrap();
            assert!(
                payload.len() <= Move::MAX_PAYLOAD_LEN,
                "{:?} encodes to {} bytes",
                mv,
                payload.len()
            );
            assert_eq!(Move::decode(&payload).unwrap(), mv);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(Move::decode(&[]), Err(CodecError::Malformed(_))));
        assert!(matches!(
            Move::decode(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(CodecError::Malformed(_))
        ));

        let player = PlayerId::new(1);
        let payload = Move::StartSession { player }.encode().unwrap();

        // Truncated payload
        assert!(Move::decode(&payload[..payload.len() - 1]).is_err());

        // Valid move followed by junk
        let mut padded = payload.clone();
        padded.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        assert!(matches!(
            Move::decode(&padded),
            Err(CodecError::Malformed(_))
        ));
        assert!(Move::decode(&payload).is_ok());
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let big = vec![0u8; Move::MAX_PAYLOAD_LEN + 1];
        assert!(matches!(
            Move::decode(&big),
            Err(CodecError::TooLarge { len: 65, max: 64 })
        ));
    }

    #[test]
    fn test_serde_json_tagging() {
        let mv = Move::ResolveOffer {
            player: PlayerId::new(3),
            decision: Decision::Decline,
        };
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"ResolveOffer":{"player":3,"decision":"Decline"}}"#);
    }
}
