//! # moon-or-dust
//!
//! Engine for a single-player briefcase offer game (a Deal-or-No-Deal
//! variant). The player keeps one sealed case, opens the others, and after
//! each batch of reveals the whale offers the floor of the mean of what is
//! left. Accept ("Moon") and the offer is paid; decline ("Dust") and keep
//! opening. Open everything and the player's own case is paid.
//!
//! ## Design Principles
//!
//! 1. **Transport-Agnostic**: Moves in, outcomes out. Rendering messages,
//!    keyboards, and callbacks belongs to the caller.
//!
//! 2. **No Globals**: Each engine owns its registry. Tests and shards never
//!    share state.
//!
//! 3. **Injectable Randomness**: Shuffles come from a `Shuffler`, so tests
//!    deal cases in a known order.
//!
//! ## Modules
//!
//! - `core`: Players, cases, sessions, moves, RNG, configuration, errors
//! - `rules`: The per-session state machine and offer policy
//! - `dispatch`: Session registries (single-threaded and shared)
//!
//! ## Example
//!
//! ```
//! use moon_or_dust::{CaseIndex, Decision, Engine, EngineConfig, IdentityShuffle, PlayerId};
//!
//! let config = EngineConfig::default();
//! let mut engine = Engine::with_shuffler(config, IdentityShuffle).unwrap();
//! let player = PlayerId::new(1);
//!
//! engine.start_session(player).unwrap();
//! engine.select_case(player, CaseIndex::new(4)).unwrap();
//! engine.open_case(player, CaseIndex::new(1)).unwrap();
//! engine.open_case(player, CaseIndex::new(2)).unwrap();
//! let outcomes = engine.open_case(player, CaseIndex::new(3)).unwrap();
//! assert_eq!(outcomes[1].offer(), Some(329));
//!
//! let outcomes = engine.resolve_offer(player, Decision::Accept).unwrap();
//! assert_eq!(outcomes[0].result().unwrap().payout, 329);
//! assert!(!engine.has_session(player));
//! ```

pub mod core;
pub mod dispatch;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    CaseIndex, CodecError, ConfigError, Decision, EngineConfig, GameRng, GameRngState,
    IdentityShuffle, InvalidMoveReason, Move, MoveError, OfferRecord, Phase, PlayerId, Session,
    SessionView, Shuffler,
};
pub use crate::dispatch::{Engine, EngineStats, SharedEngine};
pub use crate::rules::{
    floor_mean, BriefcaseRules, CadencePolicy, GameResult, OfferPolicy, Outcome, Outcomes,
};
