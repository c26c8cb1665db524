//! Dispatchers: the session registry and the move-in / outcome-out boundary.
//!
//! - `Engine`: single-threaded, `&mut self` per move
//! - `SharedEngine`: `Send + Sync`, one lock per player
//!
//! Both keep at most one active session per player and drop it as soon as
//! the game ends. Neither is a global: every instance has its own registry.

pub mod engine;
pub mod shared;
pub mod stats;

pub use engine::Engine;
pub use shared::SharedEngine;
pub use stats::EngineStats;

use crate::core::{Move, MoveError};
use crate::rules::{Outcome, Outcomes};

/// Emit structured events for one dispatched move.
pub(crate) fn trace_move(mv: &Move, result: &Result<Outcomes, MoveError>) {
    let player = mv.player().raw();
    let outcomes = match result {
        Ok(outcomes) => outcomes,
        Err(err) => {
            tracing::warn!(player, kind = mv.kind(), %err, "move rejected");
            return;
        }
    };

    tracing::debug!(player, kind = mv.kind(), outcomes = outcomes.len(), "move processed");
    for outcome in outcomes {
        match outcome {
            Outcome::SessionStarted { case_count } => {
                tracing::info!(player, case_count, "game started");
            }
            Outcome::OfferMade { offer, round } => {
                tracing::debug!(player, offer, round, "offer made");
            }
            Outcome::GameFinished(result) => {
                tracing::info!(
                    player,
                    payout = result.payout,
                    accepted = result.was_accepted,
                    "game finished"
                );
            }
            Outcome::SessionAbandoned { .. } => {
                tracing::info!(player, "game abandoned");
            }
            Outcome::CaseSelected { .. }
            | Outcome::CaseOpened { .. }
            | Outcome::OfferDeclined { .. } => {}
        }
    }
}
