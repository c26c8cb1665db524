//! Game rules for a single session.
//!
//! - `engine`: `BriefcaseRules`, the state machine
//! - `offer`: `OfferPolicy` and the floor-of-mean arithmetic
//! - `outcome`: what a move reports back
//!
//! The dispatchers in `dispatch` call into these rules but never
//! decide on their own what a move does.

pub mod engine;
pub mod offer;
pub mod outcome;

pub use engine::BriefcaseRules;
pub use offer::{floor_mean, CadencePolicy, OfferPolicy};
pub use outcome::{GameResult, Outcome, Outcomes};
