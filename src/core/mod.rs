//! Core engine types: players, cases, sessions, moves, RNG, configuration.
//!
//! Nothing here decides what a move does; that is the job of `rules`.

pub mod action;
pub mod case;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Decision, Move};
pub use case::CaseIndex;
pub use config::{
    EngineConfig, DEFAULT_LOW_REMAINING_THRESHOLD, DEFAULT_OFFER_BATCH, DEFAULT_VALUES,
};
pub use error::{CodecError, ConfigError, InvalidMoveReason, MoveError};
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState, IdentityShuffle, Shuffler};
pub use state::{OfferRecord, Phase, Session, SessionView};
