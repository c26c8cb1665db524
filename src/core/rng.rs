//! Randomness for dealing briefcases.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Forkable**: Each session can get its own independent stream
//! - **Serializable**: O(1) state capture and restore
//! - **Injectable**: The engine only sees the `Shuffler` trait, so tests can
//!   deal cases in a known order
//!
//! ```
//! use moon_or_dust::core::{GameRng, Shuffler};
//!
//! let mut rng = GameRng::new(42);
//! let mut values = vec![1, 5, 10, 25, 50];
//! rng.shuffle_values(&mut values);
//!
//! let mut sorted = values.clone();
//! sorted.sort();
//! assert_eq!(sorted, vec![1, 5, 10, 25, 50]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of the case-to-value permutation for new sessions.
///
/// Implementations must only reorder `values`: the engine relies on the
/// result being a permutation of its input.
pub trait Shuffler {
    /// Reorder `values` in place. Slot `i` becomes case `i + 1`.
    fn shuffle_values(&mut self, values: &mut [u64]);
}

/// Deterministic RNG backed by ChaCha8.
///
/// Supports forking so independent sessions can draw from independent,
/// reproducible streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let step = self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let fork_seed = self.seed.wrapping_add(step);
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl Shuffler for GameRng {
    fn shuffle_values(&mut self, values: &mut [u64]) {
        // Every deal draws from its own fork so one session's shuffle never
        // depends on how many random numbers another session consumed.
        let mut deal = self.fork();
        deal.shuffle(values);
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// Deals cases in configured order: case `i` holds `values[i - 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityShuffle;

impl Shuffler for IdentityShuffle {
    fn shuffle_values(&mut self, _values: &mut [u64]) {}
}

impl<F> Shuffler for F
where
    F: FnMut(&mut [u64]),
{
    fn shuffle_values(&mut self, values: &mut [u64]) {
        self(values)
    }
}
