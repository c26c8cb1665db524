//! Thread-safe dispatcher with per-player locking.
//!
//! Each player's session lives in its own slot behind its own mutex, so moves
//! for one player are applied one at a time while moves for different
//! players never wait on each other. The slot map lock is held only long
//! enough to find or create a slot, never across a transition.
//!
//! Slots are emptied, not removed, when a game ends. `prune` reclaims empty
//! slots that no other thread is holding.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;

use super::stats::EngineStats;
use super::trace_move;
use crate::core::{
    ConfigError, EngineConfig, GameRng, Move, MoveError, Phase, PlayerId, Session, SessionView,
    Shuffler,
};
use crate::rules::{BriefcaseRules, CadencePolicy, OfferPolicy, Outcomes};

type Slot = Arc<Mutex<Option<Session>>>;

/// Session registry safe to share between threads.
pub struct SharedEngine<S = GameRng, P = CadencePolicy> {
    config: EngineConfig,
    rules: BriefcaseRules<P>,
    shuffler: Mutex<S>,
    slots: Mutex<FxHashMap<PlayerId, Slot>>,
    stats: Mutex<EngineStats>,
}

/// Transitions never leave a session half-updated, so a poisoned lock still
/// guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedEngine<GameRng, CadencePolicy> {
    /// Create an engine that shuffles with OS-seeded randomness.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_shuffler(config, GameRng::from_entropy())
    }

    /// Create an engine with reproducible shuffles.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_shuffler(config, GameRng::new(seed))
    }
}

impl<S: Shuffler> SharedEngine<S, CadencePolicy> {
    /// Create an engine with an injected shuffler.
    pub fn with_shuffler(config: EngineConfig, shuffler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = BriefcaseRules::from_config(&config);
        Self::with_rules(config, rules, shuffler)
    }
}

impl<S: Shuffler, P: OfferPolicy> SharedEngine<S, P> {
    /// Create an engine with custom rules.
    pub fn with_rules(
        config: EngineConfig,
        rules: BriefcaseRules<P>,
        shuffler: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            case_count = config.case_count(),
            offer_batch = config.offer_batch,
            "shared engine created"
        );
        Ok(Self {
            config,
            rules,
            shuffler: Mutex::new(shuffler),
            slots: Mutex::new(FxHashMap::default()),
            stats: Mutex::new(EngineStats::new()),
        })
    }

    /// Apply one move. On error nothing changes.
    ///
    /// Concurrent moves for the same player are serialized in lock order.
    pub fn apply(&self, mv: Move) -> Result<Outcomes, MoveError> {
        let result = self.apply_locked(&mv);
        trace_move(&mv, &result);
        lock(&self.stats).record(&result);
        result
    }

    fn apply_locked(&self, mv: &Move) -> Result<Outcomes, MoveError> {
        let player = mv.player();
        let starting = matches!(mv, Move::StartSession { .. });
        let slot = self
            .slot(player, starting)
            .ok_or(MoveError::NoActiveSession { player })?;
        let mut entry = lock(&slot);

        if starting {
            if entry.is_some() {
                return Err(MoveError::SessionAlreadyActive { player });
            }
            let mut shuffler = lock(&self.shuffler);
            let (session, outcomes) = self.rules.deal(&self.config.values, &mut *shuffler);
            *entry = Some(session);
            return Ok(outcomes);
        }

        let session = entry
            .as_mut()
            .ok_or(MoveError::NoActiveSession { player })?;
        let outcomes = self
            .rules
            .apply(session, mv)
            .map_err(|reason| MoveError::InvalidMove { player, reason })?;
        if session.phase() == Phase::Finished {
            *entry = None;
        }
        Ok(outcomes)
    }

    /// Find the player's slot, creating an empty one if `create` is set.
    fn slot(&self, player: PlayerId, create: bool) -> Option<Slot> {
        let mut slots = lock(&self.slots);
        if let Some(slot) = slots.get(&player) {
            return Some(Arc::clone(slot));
        }
        if !create {
            return None;
        }
        let slot = Slot::default();
        slots.insert(player, Arc::clone(&slot));
        Some(slot)
    }

    /// Drop empty slots nobody else holds. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let mut slots = lock(&self.slots);
        let before = slots.len();
        // With the map locked no new handles can be taken, so a strong count
        // of one means this map holds the only reference.
        slots.retain(|_, slot| Arc::strong_count(slot) > 1 || lock(slot).is_some());
        before - slots.len()
    }

    /// What `player` can currently see of their game.
    #[must_use]
    pub fn view(&self, player: PlayerId) -> Option<SessionView> {
        let slot = self.slot(player, false)?;
        let entry = lock(&slot);
        entry.as_ref().map(Session::view)
    }

    /// Phase of the player's active game.
    #[must_use]
    pub fn phase(&self, player: PlayerId) -> Option<Phase> {
        let slot = self.slot(player, false)?;
        let entry = lock(&slot);
        entry.as_ref().map(Session::phase)
    }

    /// Does `player` have a game in progress?
    #[must_use]
    pub fn has_session(&self, player: PlayerId) -> bool {
        self.phase(player).is_some()
    }

    /// Number of games in progress.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        // Release the map before waiting on any player's slot.
        let handles: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        handles.iter().filter(|slot| lock(slot).is_some()).count()
    }

    /// Moves `player` may make right now.
    #[must_use]
    pub fn legal_moves(&self, player: PlayerId) -> Vec<Move> {
        let Some(slot) = self.slot(player, false) else {
            return vec![Move::StartSession { player }];
        };
        let entry = lock(&slot);
        match entry.as_ref() {
            Some(session) => self.rules.legal_moves(session, player),
            None => vec![Move::StartSession { player }],
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of the dispatch counters.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        lock(&self.stats).clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::core::{CaseIndex, Decision, IdentityShuffle};

    fn engine() -> SharedEngine<IdentityShuffle> {
        SharedEngine::with_shuffler(EngineConfig::default(), IdentityShuffle).unwrap()
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedEngine>();
        assert_send_sync::<SharedEngine<IdentityShuffle>>();
    }

    #[test]
    fn test_lifecycle() {
        let engine = engine();
        let p = PlayerId::new(3);

        engine.apply(Move::StartSession { player: p }).unwrap();
        assert_eq!(
            engine.apply(Move::StartSession { player: p }),
            Err(MoveError::SessionAlreadyActive { player: p })
        );
        let index = CaseIndex::new(4);
        engine.apply(Move::SelectCase { player: p, index }).unwrap();
        for index in (1..=3).map(CaseIndex::new) {
            engine.apply(Move::OpenCase { player: p, index }).unwrap();
        }
        assert_eq!(engine.phase(p), Some(Phase::AwaitingDecision));
        assert_eq!(engine.view(p).unwrap().pending_offer, Some(329));

        let decision = Decision::Accept;
        engine.apply(Move::ResolveOffer { player: p, decision }).unwrap();
        assert!(!engine.has_session(p));
        assert_eq!(engine.active_sessions(), 0);
        assert_eq!(
            engine.apply(Move::Abandon { player: p }),
            Err(MoveError::NoActiveSession { player: p })
        );

        engine.apply(Move::StartSession { player: p }).unwrap();
        assert!(engine.has_session(p));
    }

    #[test]
    fn test_unknown_player_creates_no_slot() {
        let engine = engine();
        let p = PlayerId::new(77);
        let index = CaseIndex::new(1);
        assert_eq!(
            engine.apply(Move::OpenCase { player: p, index }),
            Err(MoveError::NoActiveSession { player: p })
        );
        assert_eq!(engine.prune(), 0);
        assert_eq!(
            engine.legal_moves(p),
            vec![Move::StartSession { player: p }]
        );
    }

    #[test]
    fn test_prune() {
        let engine = engine();
        let (a, b) = (PlayerId::new(1), PlayerId::new(2));

        engine.apply(Move::StartSession { player: a }).unwrap();
        engine.apply(Move::StartSession { player: b }).unwrap();
        engine.apply(Move::Abandon { player: a }).unwrap();

        assert_eq!(engine.prune(), 1);
        assert_eq!(engine.prune(), 0);
        assert!(engine.has_session(b));
        assert_eq!(engine.active_sessions(), 1);
    }

    #[test]
    fn test_stats_snapshot() {
        let engine = engine();
        let p = PlayerId::new(1);
        engine.apply(Move::StartSession { player: p }).unwrap();
        let index = CaseIndex::new(1);
        let _ = engine.apply(Move::OpenCase { player: p, index });

        let stats = engine.stats();
        assert_eq!(stats.sessions_started, 1);
        assert_eq!(stats.moves_rejected, 1);
    }

    #[test]
    fn test_counting_does_not_block_other_players() {
        let engine = engine();
        let (a, b) = (PlayerId::new(1), PlayerId::new(2));
        engine.apply(Move::StartSession { player: a }).unwrap();
        engine.apply(Move::StartSession { player: b }).unwrap();

        // Hold player a's slot as a transition in progress would.
        let slot = engine.slot(a, false).unwrap();
        let held = lock(&slot);

        thread::scope(|scope| {
            let counter = scope.spawn(|| engine.active_sessions());
            thread::sleep(Duration::from_millis(50));

            // The count is parked on player a; player b still gets through.
            let index = CaseIndex::new(2);
            engine.apply(Move::SelectCase { player: b, index }).unwrap();
            assert_eq!(engine.phase(b), Some(Phase::Opening));

            drop(held);
            assert_eq!(counter.join().unwrap(), 2);
        });
    }
}
