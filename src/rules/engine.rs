//! Game rules: every legal transition of a single session.
//!
//! `BriefcaseRules` knows nothing about players or registries. It takes a
//! `Session`, validates a move against it, and either mutates it and returns
//! the resulting outcomes or leaves it untouched and says why not.
//!
//! ```text
//! AwaitingSelection --select_case--> Opening
//! Opening --open_case (offer not due)--> Opening
//! Opening --open_case (offer due)--> AwaitingDecision
//! Opening --open_case (nothing left)--> Finished
//! AwaitingDecision --accept--> Finished
//! AwaitingDecision --decline (cases left)--> Opening
//! AwaitingDecision --decline (nothing left)--> Finished
//! ```

use smallvec::smallvec;

use super::offer::{CadencePolicy, OfferPolicy};
use super::outcome::{GameResult, Outcome, Outcomes};
use crate::core::{
    config::validate_values, CaseIndex, ConfigError, Decision, EngineConfig, InvalidMoveReason,
    Move, Phase, PlayerId, Session, Shuffler,
};

/// Transition rules for one session, parameterized by the offer policy.
#[derive(Clone, Debug)]
pub struct BriefcaseRules<P = CadencePolicy> {
    policy: P,
    disclose_on_accept: bool,
}

impl BriefcaseRules<CadencePolicy> {
    /// Rules for the reference game.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Rules for an (already validated) configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            policy: CadencePolicy::from_config(config),
            disclose_on_accept: config.disclose_on_accept,
        }
    }
}

impl Default for BriefcaseRules<CadencePolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OfferPolicy> BriefcaseRules<P> {
    /// Rules with a custom offer policy.
    pub fn with_policy(policy: P, disclose_on_accept: bool) -> Self {
        Self {
            policy,
            disclose_on_accept,
        }
    }

    /// The offer policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Deal a fresh session.
    ///
    /// `values` must be a playable value set, as `EngineConfig::validate`
    /// would accept it.
    pub fn new_session(
        &self,
        values: &[u64],
        shuffler: &mut impl Shuffler,
    ) -> Result<(Session, Outcomes), ConfigError> {
        validate_values(values)?;
        Ok(self.deal(values, shuffler))
    }

    /// Deal from values the caller has already validated.
    pub(crate) fn deal(&self, values: &[u64], shuffler: &mut impl Shuffler) -> (Session, Outcomes) {
        let mut dealt = values.to_vec();
        shuffler.shuffle_values(&mut dealt);
        let session = Session::new(dealt);
        let case_count = session.case_count();
        (session, smallvec![Outcome::SessionStarted { case_count }])
    }

    /// Apply a move to an existing session.
    ///
    /// `StartSession` is never valid against an existing session; the
    /// dispatcher reports that case as `SessionAlreadyActive` before it gets
    /// here.
    pub fn apply(&self, session: &mut Session, mv: &Move) -> Result<Outcomes, InvalidMoveReason> {
        match *mv {
            Move::StartSession { .. } => Err(wrong_phase(session)),
            Move::SelectCase { index, .. } => self.select_case(session, index),
            Move::OpenCase { index, .. } => self.open_case(session, index),
            Move::ResolveOffer { decision, .. } => self.resolve_offer(session, decision),
            Move::Abandon { .. } => self.abandon(session),
        }
    }

    /// Pick the player's own case.
    pub fn select_case(
        &self,
        session: &mut Session,
        index: CaseIndex,
    ) -> Result<Outcomes, InvalidMoveReason> {
        expect_phase(session, Phase::AwaitingSelection)?;
        expect_in_range(session, index)?;

        session.set_chosen(index);
        session.set_phase(Phase::Opening);
        debug_assert!(session.check_invariants());
        Ok(smallvec![Outcome::CaseSelected { index }])
    }

    /// Open one of the other cases, then make an offer or end the game if due.
    pub fn open_case(
        &self,
        session: &mut Session,
        index: CaseIndex,
    ) -> Result<Outcomes, InvalidMoveReason> {
        expect_in_range(session, index)?;
        // The player's own case can never be opened, whatever the phase.
        if session.chosen_case() == Some(index) {
            return Err(InvalidMoveReason::ChosenCase { index });
        }
        expect_phase(session, Phase::Opening)?;
        if session.is_opened(index) {
            return Err(InvalidMoveReason::AlreadyOpened { index });
        }
        let value = session
            .value_of(index)
            .ok_or_else(|| out_of_range(session, index))?;

        session.push_opened(index);
        let remaining = session.remaining_values();
        let mut outcomes: Outcomes = smallvec![Outcome::CaseOpened {
            index,
            value,
            remaining_count: remaining.len(),
        }];

        if remaining.is_empty() {
            outcomes.push(self.finish_by_exhaustion(session));
        } else if self.policy.is_due(session.opened_count(), remaining.len()) {
            if let Some(offer) = self.policy.offer(&remaining) {
                let round = session.make_offer(offer);
                outcomes.push(Outcome::OfferMade { offer, round });
            }
        }

        debug_assert!(session.check_invariants());
        Ok(outcomes)
    }

    /// Accept or decline the pending offer.
    pub fn resolve_offer(
        &self,
        session: &mut Session,
        decision: Decision,
    ) -> Result<Outcomes, InvalidMoveReason> {
        expect_phase(session, Phase::AwaitingDecision)?;
        let offer = session
            .take_offer(decision)
            .ok_or_else(|| wrong_phase(session))?;

        let outcomes = match decision {
            Decision::Accept => {
                session.set_phase(Phase::Finished);
                smallvec![Outcome::GameFinished(GameResult {
                    payout: offer,
                    was_accepted: true,
                    chosen_case_value: self.disclosed_value(session),
                })]
            }
            Decision::Decline => {
                let mut outcomes: Outcomes = smallvec![Outcome::OfferDeclined { offer }];
                if session.remaining_count() == 0 {
                    outcomes.push(self.finish_by_exhaustion(session));
                } else {
                    session.set_phase(Phase::Opening);
                }
                outcomes
            }
        };

        debug_assert!(session.check_invariants());
        Ok(outcomes)
    }

    /// End an unfinished game without a payout.
    ///
    /// A pending offer is dropped unanswered: its record keeps no decision.
    pub fn abandon(&self, session: &mut Session) -> Result<Outcomes, InvalidMoveReason> {
        if session.phase() == Phase::Finished {
            return Err(wrong_phase(session));
        }
        session.clear_offer();
        session.set_phase(Phase::Finished);
        let chosen_case_value = self.disclosed_value(session);
        debug_assert!(session.check_invariants());
        Ok(smallvec![Outcome::SessionAbandoned { chosen_case_value }])
    }

    /// The offer the policy would make for the session as it stands.
    ///
    /// Pure: asking twice gives the same answer.
    #[must_use]
    pub fn current_offer(&self, session: &Session) -> Option<u64> {
        self.policy.offer(&session.remaining_values())
    }

    /// Every move `player` may legally make against `session`.
    #[must_use]
    pub fn legal_moves(&self, session: &Session, player: PlayerId) -> Vec<Move> {
        let mut moves: Vec<Move> = match session.phase() {
            Phase::AwaitingSelection => CaseIndex::all(session.case_count())
                .map(|index| Move::SelectCase { player, index })
                .collect(),
            Phase::Opening => session
                .unopened_cases()
                .map(|index| Move::OpenCase { player, index })
                .collect(),
            Phase::AwaitingDecision => [Decision::Accept, Decision::Decline]
                .into_iter()
                .map(|decision| Move::ResolveOffer { player, decision })
                .collect(),
            Phase::Finished => return Vec::new(),
        };
        moves.push(Move::Abandon { player });
        moves
    }

    fn finish_by_exhaustion(&self, session: &mut Session) -> Outcome {
        session.set_phase(Phase::Finished);
        let chosen = session.chosen_value();
        Outcome::GameFinished(GameResult {
            payout: chosen.unwrap_or_default(),
            was_accepted: false,
            chosen_case_value: chosen,
        })
    }

    fn disclosed_value(&self, session: &Session) -> Option<u64> {
        if self.disclose_on_accept {
            session.chosen_value()
        } else {
            None
        }
    }
}

fn wrong_phase(session: &Session) -> InvalidMoveReason {
    InvalidMoveReason::WrongPhase {
        phase: session.phase(),
    }
}

fn out_of_range(session: &Session, index: CaseIndex) -> InvalidMoveReason {
    InvalidMoveReason::OutOfRange {
        index,
        case_count: session.case_count(),
    }
}

fn expect_phase(session: &Session, expected: Phase) -> Result<(), InvalidMoveReason> {
    if session.phase() == expected {
        Ok(())
    } else {
        Err(wrong_phase(session))
    }
}

fn expect_in_range(session: &Session, index: CaseIndex) -> Result<(), InvalidMoveReason> {
    if index.is_valid(session.case_count()) {
        Ok(())
    } else {
        Err(out_of_range(session, index))
    }
}
