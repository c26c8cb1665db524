//! Single-threaded dispatcher.
//!
//! `Engine` owns the session registry and applies one move at a time
//! (`&mut self`), which serializes every move for every player. Use
//! `SharedEngine` when moves arrive on several threads.
//!
//! ```
//! use moon_or_dust::core::{CaseIndex, EngineConfig, IdentityShuffle, Move, PlayerId};
//! use moon_or_dust::dispatch::Engine;
//! use moon_or_dust::rules::Outcome;
//!
//! let config = EngineConfig::default();
//! let mut engine = Engine::with_shuffler(config, IdentityShuffle).unwrap();
//! let player = PlayerId::new(1);
//! let (mine, first) = (CaseIndex::new(4), CaseIndex::new(1));
//!
//! engine.apply(Move::StartSession { player }).unwrap();
//! engine.apply(Move::SelectCase { player, index: mine }).unwrap();
//! let outcomes = engine.apply(Move::OpenCase { player, index: first }).unwrap();
//!
//! assert_eq!(
//!     outcomes[0],
//!     Outcome::CaseOpened {
//!         index: first,
//!         value: 1,
//!         remaining_count: 8,
//!     }
//! );
//! ```

use rustc_hash::FxHashMap;

use super::stats::EngineStats;
use super::trace_move;
use crate::core::{
    CaseIndex, ConfigError, Decision, EngineConfig, GameRng, Move, MoveError, Phase, PlayerId,
    Session, SessionView, Shuffler,
};
use crate::rules::{BriefcaseRules, CadencePolicy, OfferPolicy, Outcomes};

/// Session registry plus the rules that drive it.
pub struct Engine<S = GameRng, P = CadencePolicy> {
    config: EngineConfig,
    rules: BriefcaseRules<P>,
    shuffler: S,
    sessions: FxHashMap<PlayerId, Session>,
    stats: EngineStats,
}

impl Engine<GameRng, CadencePolicy> {
    /// Create an engine that shuffles with OS-seeded randomness.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_shuffler(config, GameRng::from_entropy())
    }

    /// Create an engine with reproducible shuffles.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_shuffler(config, GameRng::new(seed))
    }
}

impl<S: Shuffler> Engine<S, CadencePolicy> {
    /// Create an engine with an injected shuffler.
    pub fn with_shuffler(config: EngineConfig, shuffler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = BriefcaseRules::from_config(&config);
        Self::with_rules(config, rules, shuffler)
    }
}

impl<S: Shuffler, P: OfferPolicy> Engine<S, P> {
    /// Create an engine with custom rules.
    ///
    /// `config` still supplies the value set and is validated here.
    pub fn with_rules(
        config: EngineConfig,
        rules: BriefcaseRules<P>,
        shuffler: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            case_count = config.case_count(),
            offer_batch = config.offer_batch,
            "engine created"
        );
        Ok(Self {
            config,
            rules,
            shuffler,
            sessions: FxHashMap::default(),
            stats: EngineStats::new(),
        })
    }

    /// Apply one move. On error nothing changes.
    pub fn apply(&mut self, mv: Move) -> Result<Outcomes, MoveError> {
        let player = mv.player();
        let result = match mv {
            Move::StartSession { .. } => self.start(player),
            _ => self.advance(player, &mv),
        };
        trace_move(&mv, &result);
        self.stats.record(&result);
        result
    }

    /// Begin a game for `player`.
    pub fn start_session(&mut self, player: PlayerId) -> Result<Outcomes, MoveError> {
        self.apply(Move::StartSession { player })
    }

    /// Pick the player's own case.
    pub fn select_case(
        &mut self,
        player: PlayerId,
        index: CaseIndex,
    ) -> Result<Outcomes, MoveError> {
        self.apply(Move::SelectCase { player, index })
    }

    /// Open one of the other cases.
    pub fn open_case(
        &mut self,
        player: PlayerId,
        index: CaseIndex,
    ) -> Result<Outcomes, MoveError> {
        self.apply(Move::OpenCase { player, index })
    }

    /// Accept or decline the pending offer.
    pub fn resolve_offer(
        &mut self,
        player: PlayerId,
        decision: Decision,
    ) -> Result<Outcomes, MoveError> {
        self.apply(Move::ResolveOffer { player, decision })
    }

    /// Drop the player's game without a payout.
    pub fn abandon(&mut self, player: PlayerId) -> Result<Outcomes, MoveError> {
        self.apply(Move::Abandon { player })
    }

    fn start(&mut self, player: PlayerId) -> Result<Outcomes, MoveError> {
        if self.sessions.contains_key(&player) {
            return Err(MoveError::SessionAlreadyActive { player });
        }
        let (session, outcomes) = self.rules.deal(&self.config.values, &mut self.shuffler);
        self.sessions.insert(player, session);
        Ok(outcomes)
    }

    fn advance(&mut self, player: PlayerId, mv: &Move) -> Result<Outcomes, MoveError> {
        let session = self
            .sessions
            .get_mut(&player)
            .ok_or(MoveError::NoActiveSession { player })?;
        let outcomes = self
            .rules
            .apply(session, mv)
            .map_err(|reason| MoveError::InvalidMove { player, reason })?;
        if session.phase() == Phase::Finished {
            self.sessions.remove(&player);
        }
        Ok(outcomes)
    }

    // === Registry inspection ===

    /// What `player` can currently see of their game.
    #[must_use]
    pub fn view(&self, player: PlayerId) -> Option<SessionView> {
        self.sessions.get(&player).map(Session::view)
    }

    /// Phase of the player's active game.
    #[must_use]
    pub fn phase(&self, player: PlayerId) -> Option<Phase> {
        self.sessions.get(&player).map(Session::phase)
    }

    /// Does `player` have a game in progress?
    #[must_use]
    pub fn has_session(&self, player: PlayerId) -> bool {
        self.sessions.contains_key(&player)
    }

    /// Number of games in progress.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Moves `player` may make right now. Only `StartSession` without a game.
    #[must_use]
    pub fn legal_moves(&self, player: PlayerId) -> Vec<Move> {
        match self.sessions.get(&player) {
            Some(session) => self.rules.legal_moves(session, player),
            None => vec![Move::StartSession { player }],
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The rules in use.
    #[must_use]
    pub fn rules(&self) -> &BriefcaseRules<P> {
        &self.rules
    }

    /// Dispatch counters.
    #[must_use]
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}
