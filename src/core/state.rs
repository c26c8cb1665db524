//! Per-player game state.
//!
//! ## Session
//!
//! Everything about one player's game:
//! - The case-to-value assignment (fixed at creation)
//! - The chosen case and the ordered log of opened cases
//! - The pending offer and the history of every offer made
//!
//! Sessions use `im` persistent vectors so snapshots clone in O(1).
//! Transitions live in `rules::BriefcaseRules`; this module only stores
//! state and answers questions about it.
//!
//! ## SessionView
//!
//! What the player is allowed to see: never the chosen case's value or the
//! contents of unopened cases.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::Decision;
use super::case::CaseIndex;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to pick their case.
    AwaitingSelection,
    /// Waiting for the player to open a case.
    Opening,
    /// An offer is pending.
    AwaitingDecision,
    /// Game over; no further moves.
    Finished,
}

/// One offer made during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// One-based offer number.
    pub round: u32,
    /// Offered amount.
    pub amount: u64,
    /// Cases opened when the offer was made.
    pub opened_count: usize,
    /// `None` while the offer is pending, and for an offer left open when
    /// the session was abandoned.
    pub decision: Option<Decision>,
}

/// One player's game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Value held by each case; slot `i` is case `i + 1`.
    values: Vector<u64>,

    /// The player's own case, set exactly once.
    chosen: Option<CaseIndex>,

    /// Opened cases in the order they were opened.
    opened: Vector<CaseIndex>,

    /// Set iff `phase == AwaitingDecision`.
    pending_offer: Option<u64>,

    phase: Phase,

    /// Every offer made, oldest first.
    offers: Vector<OfferRecord>,
}

impl Session {
    /// Create a session from an already-shuffled assignment.
    ///
    /// The caller guarantees `MIN_CASES..=MAX_CASES` values.
    #[must_use]
    pub(crate) fn new(values: Vec<u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            chosen: None,
            opened: Vector::new(),
            pending_offer: None,
            phase: Phase::AwaitingSelection,
            offers: Vector::new(),
        }
    }

    // === Queries ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of cases (N).
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.values.len()
    }

    /// The player's own case, once selected.
    #[must_use]
    pub fn chosen_case(&self) -> Option<CaseIndex> {
        self.chosen
    }

    /// The pending offer, if any.
    #[must_use]
    pub fn pending_offer(&self) -> Option<u64> {
        self.pending_offer
    }

    /// Opened cases in opening order.
    pub fn opened_cases(&self) -> impl Iterator<Item = CaseIndex> + '_ {
        self.opened.iter().copied()
    }

    /// Number of opened cases.
    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.opened.len()
    }

    /// Has this case been opened?
    #[must_use]
    pub fn is_opened(&self, index: CaseIndex) -> bool {
        self.opened.iter().any(|&c| c == index)
    }

    /// Value held by a case, `None` if out of range.
    #[must_use]
    pub fn value_of(&self, index: CaseIndex) -> Option<u64> {
        if !index.is_valid(self.case_count()) {
            return None;
        }
        self.values.get(index.slot()).copied()
    }

    /// Value held by the player's own case.
    #[must_use]
    pub fn chosen_value(&self) -> Option<u64> {
        self.chosen.and_then(|c| self.value_of(c))
    }

    /// The full assignment, case 1 first.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.iter().copied()
    }

    /// Cases neither opened nor chosen, in case order.
    pub fn unopened_cases(&self) -> impl Iterator<Item = CaseIndex> + '_ {
        CaseIndex::all(self.case_count())
            .filter(move |&c| Some(c) != self.chosen && !self.is_opened(c))
    }

    /// Values of the cases neither opened nor chosen, in case order.
    #[must_use]
    pub fn remaining_values(&self) -> Vec<u64> {
        self.unopened_cases().filter_map(|c| self.value_of(c)).collect()
    }

    /// Number of cases neither opened nor chosen.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        let chosen = usize::from(self.chosen.is_some());
        self.case_count().saturating_sub(self.opened.len() + chosen)
    }

    /// Every offer made so far.
    pub fn offers(&self) -> impl Iterator<Item = &OfferRecord> + '_ {
        self.offers.iter()
    }

    /// Number of offers made so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.offers.len() as u32
    }

    /// Check the session invariants:
    /// - the chosen case is never opened
    /// - no case is opened twice, and every opened case is in range
    /// - opened plus chosen never exceeds the case count
    /// - an offer is pending exactly while awaiting a decision
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        let count = self.case_count();
        let chosen_ok = match self.chosen {
            Some(c) => c.is_valid(count) && !self.is_opened(c),
            None => self.opened.is_empty(),
        };
        let mut seen = vec![false; count];
        let opened_ok = self.opened.iter().all(|c| {
            c.is_valid(count) && !std::mem::replace(&mut seen[c.slot()], true)
        });
        let size_ok = self.opened.len() + usize::from(self.chosen.is_some()) <= count;
        let awaiting = self.phase == Phase::AwaitingDecision;
        let offer_ok = self.pending_offer.is_some() == awaiting;

        chosen_ok && opened_ok && size_ok && offer_ok
    }

    /// Public view of this session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            case_count: self.case_count(),
            chosen_case: self.chosen,
            opened: self
                .opened
                .iter()
                .filter_map(|&c| self.value_of(c).map(|v| (c, v)))
                .collect(),
            unopened: self.unopened_cases().collect(),
            values_in_play: {
                let mut board = self.remaining_values();
                if let Some(v) = self.chosen_value() {
                    board.push(v);
                }
                board.sort_unstable();
                board
            },
            pending_offer: self.pending_offer,
            offers: self.offers.iter().copied().collect(),
        }
    }

    // === Mutations (used by the rules) ===

    pub(crate) fn set_chosen(&mut self, index: CaseIndex) {
        self.chosen = Some(index);
    }

    pub(crate) fn push_opened(&mut self, index: CaseIndex) {
        self.opened.push_back(index);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Make an offer: record it and await a decision.
    pub(crate) fn make_offer(&mut self, amount: u64) -> u32 {
        let round = self.round() + 1;
        self.offers.push_back(OfferRecord {
            round,
            amount,
            opened_count: self.opened.len(),
            decision: None,
        });
        self.pending_offer = Some(amount);
        self.phase = Phase::AwaitingDecision;
        round
    }

    /// Clear the pending offer, recording the decision. Returns the amount.
    pub(crate) fn take_offer(&mut self, decision: Decision) -> Option<u64> {
        let amount = self.pending_offer.take()?;
        if let Some(last) = self.offers.back_mut() {
            last.decision = Some(decision);
        }
        Some(amount)
    }

    /// Drop the pending offer without recording a decision.
    pub(crate) fn clear_offer(&mut self) -> Option<u64> {
        self.pending_offer.take()
    }
}

/// What a player may see of their session.
///
/// This is what a transport renders: the board of values still in play, the
/// cases still available to open, and the offer history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: Phase,
    pub case_count: usize,
    pub chosen_case: Option<CaseIndex>,
    /// Opened cases with their revealed values, in opening order.
    pub opened: Vec<(CaseIndex, u64)>,
    /// Cases the player may still open, in case order.
    pub unopened: Vec<CaseIndex>,
    /// Values not yet revealed (including the player's own case), ascending.
    /// Which case holds which stays hidden.
    pub values_in_play: Vec<u64>,
    pub pending_offer: Option<u64>,
    pub offers: Vec<OfferRecord>,
}
