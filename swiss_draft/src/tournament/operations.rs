//! Operations on the tournament aggregate.
//!
//! Every mutating operation validates all of its preconditions before it
//! changes anything, so an `Err` always leaves the aggregate as it was.

use rand::Rng;
use std::collections::HashMap;

use super::models::{NewStage, RoundAdvance, StandingsScope, Tournament};
use crate::swiss::ledger::{self, BYE_DELTA};
use crate::swiss::standings::{self, StandingsEntry};
use crate::swiss::{
    Contender, Enrollment, EnrollmentId, Entity, Match, MatchId, Matcher, PairingError, Round,
    RoundAction, RoundId, Scope, SeatRandomizer, Stage, StageAction, StageId, StageState,
    SwissError, SwissResult, TiebreakerCalculator, ValidationError, build_brackets,
};

impl Tournament {
    /// Enroll a player in the event
    ///
    /// # Errors
    ///
    /// Rejects empty names, names already enrolled and enrollments beyond
    /// the player capacity.
    pub fn enroll(&mut self, player_name: &str) -> SwissResult<EnrollmentId> {
        let name = player_name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.enrollments.values().any(|e| e.player_name == name) {
            return Err(ValidationError::DuplicateEnrollment(name.to_string()).into());
        }
        if self.player_capacity > 0 && self.enrollments.len() >= self.player_capacity {
            return Err(ValidationError::CapacityReached(self.player_capacity).into());
        }

        let id = self.allocate_id();
        self.enrollments.insert(id, Enrollment::new(id, name));
        log::info!("Enrolled {} in tournament {} as {}", name, self.id, id);
        Ok(id)
    }

    /// Add a stage to the event
    ///
    /// # Errors
    ///
    /// Rejects stages without rounds or with unknown enrollments.
    pub fn add_stage(&mut self, new_stage: NewStage) -> SwissResult<StageId> {
        if new_stage.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if new_stage.round_number == 0 {
            return Err(ValidationError::InvalidRoundCount.into());
        }
        let members = if new_stage.enrollments.is_empty() {
            self.enrollments.keys().copied().collect()
        } else {
            for id in &new_stage.enrollments {
                self.enrollment(*id)?;
            }
            let mut members = new_stage.enrollments.clone();
            members.sort_unstable();
            members.dedup();
            members
        };

        let id = self.allocate_id();
        let stage = Stage {
            id,
            name: new_stage.name,
            phase_idx: new_stage.phase_idx,
            round_number: new_stage.round_number,
            first_table: new_stage.first_table.unwrap_or(self.config.first_table),
            last_table: None,
            counts_for_event: new_stage.counts_for_event,
            state: StageState::Created,
            enrollments: members,
            rounds: Vec::new(),
        };
        log::info!(
            "Added stage {} ({}) with {} players and {} rounds",
            id,
            stage.name,
            stage.enrollments.len(),
            stage.round_number
        );
        self.stages.insert(id, stage);
        Ok(id)
    }

    /// Seat a stage: random seats, blank stage totals and round 1
    ///
    /// # Errors
    ///
    /// Fails if the stage is not in its created state, has no active
    /// competitor, or shares a player with another stage still running.
    pub fn seat_stage<R: Rng + ?Sized>(
        &mut self,
        stage_id: StageId,
        rng: &mut R,
    ) -> SwissResult<RoundId> {
        let stage = self.stage(stage_id)?;
        let next_state = stage.state.transition(StageAction::Seat)?;
        let members = stage.enrollments.clone();
        let active = self.active_members(&members);
        if active.is_empty() {
            return Err(PairingError::NoActiveCompetitors(stage_id).into());
        }
        // Seating wipes stage history, which a running stage still needs
        if let Some(running) = self.stages.values().find(|other| {
            other.id != stage_id
                && matches!(other.state, StageState::Seated | StageState::InProgress)
                && other.enrollments.iter().any(|id| active.contains(id))
        }) {
            return Err(SwissError::state(
                "seat stage",
                format!("stage {} is {} with shared players", running.id, running.state),
            ));
        }

        let seats = SeatRandomizer::new(rng).assign_seats(&active);
        for id in &members {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                enrollment.reset_stage();
                enrollment.seat = seats.get(id).copied();
            }
        }

        let round_id = self.allocate_id();
        self.rounds.insert(round_id, Round::new(round_id, stage_id, 1));
        if let Some(stage) = self.stages.get_mut(&stage_id) {
            stage.state = next_state;
            stage.rounds = vec![round_id];
            stage.last_table = None;
        }

        log::info!("Seated stage {} with {} players", stage_id, active.len());
        Ok(round_id)
    }

    /// Pair the current round of a stage
    ///
    /// The whole pairing is computed first and committed only once it
    /// succeeded.
    ///
    /// # Errors
    ///
    /// * [`PairingError::NotSeated`] before the stage is seated
    /// * [`SwissError::State`] if the current round is already paired
    /// * [`PairingError::Unresolvable`] when leftovers cannot be absorbed
    pub fn pair_round<R: Rng + ?Sized>(
        &mut self,
        stage_id: StageId,
        rng: &mut R,
    ) -> SwissResult<RoundId> {
        let stage = self.stage(stage_id)?;
        if stage.state == StageState::Created {
            return Err(PairingError::NotSeated(stage_id).into());
        }
        let next_stage_state = stage.state.transition(StageAction::Begin)?;
        let round_id = self.current_round_id(stage)?;
        let round = self.round(round_id)?;
        let next_round_state = round.state.transition(RoundAction::Pair)?;

        let members = stage.enrollments.clone();
        let first_table = stage.first_table;
        let scopes = stage.scopes();
        let active = self.active_members(&members);
        if active.is_empty() {
            return Err(PairingError::NoActiveCompetitors(stage_id).into());
        }

        let contenders: Vec<Contender> = active
            .iter()
            .filter_map(|id| self.enrollments.get(id))
            .map(|e| Contender::new(e.id, e.stage.ranking_key()))
            .collect();
        let brackets = build_brackets(&contenders, self.config.max_bracket_size);
        let plan = Matcher::new(self.config.clone()).plan(&brackets, &self.enrollments, rng)?;

        // Commit
        for id in &members {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                enrollment.paired = false;
                enrollment.bye_this_round = false;
            }
        }

        let mut match_ids = Vec::with_capacity(plan.pairs.len());
        let mut table = first_table;
        for &(player1, player2) in &plan.pairs {
            let match_id = self.allocate_id();
            self.matches
                .insert(match_id, Match::new(match_id, round_id, table, player1, player2));
            match_ids.push(match_id);
            table += 1;

            for (me, opponent) in [(player1, player2), (player2, player1)] {
                if let Some(enrollment) = self.enrollments.get_mut(&me) {
                    enrollment.paired = true;
                    enrollment.pairings.insert(opponent);
                    if scopes.contains(&Scope::Event) {
                        enrollment.event_opponents.push(opponent);
                    }
                }
            }
        }

        for id in &plan.byes {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                enrollment.had_bye = true;
                enrollment.bye_this_round = true;
                enrollment.paired = true;
                for &scope in scopes {
                    BYE_DELTA.apply(enrollment.totals_mut(scope));
                }
            }
        }

        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.state = next_round_state;
            round.matches = match_ids;
            round.byes = plan.byes.clone();
        }
        if let Some(stage) = self.stages.get_mut(&stage_id) {
            stage.state = next_stage_state;
            stage.last_table = (!plan.pairs.is_empty()).then(|| table - 1);
        }

        log::info!(
            "Paired round {} of stage {}: {} matches, {} byes",
            round_id,
            stage_id,
            plan.pairs.len(),
            plan.byes.len()
        );
        Ok(round_id)
    }

    /// Open a paired round
    ///
    /// # Errors
    ///
    /// Fails unless the round is paired and not yet started.
    pub fn start_round(&mut self, round_id: RoundId) -> SwissResult<()> {
        let next = self.round(round_id)?.state.transition(RoundAction::Start)?;
        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.state = next;
        }
        log::info!("Started round {}", round_id);
        Ok(())
    }

    /// Record a provisional result
    ///
    /// # Errors
    ///
    /// Validation errors for bad win counts, state errors when the round is
    /// not running or the result is already confirmed.
    pub fn report_result(
        &mut self,
        match_id: MatchId,
        wins1: i64,
        wins2: i64,
        reporter: &str,
    ) -> SwissResult<()> {
        self.ensure_accepts_results(match_id)?;
        let games_per_match = self.config.games_per_match;
        let game = self
            .matches
            .get_mut(&match_id)
            .ok_or_else(|| SwissError::not_found(Entity::Match, match_id))?;
        ledger::report(game, wins1, wins2, reporter, games_per_match)?;
        log::debug!("Match {} reported {}-{} by {}", match_id, wins1, wins2, reporter);
        Ok(())
    }

    /// Confirm a reported result and apply it to both players' totals
    ///
    /// # Errors
    ///
    /// State error if nothing was reported or the result is already
    /// confirmed; totals are never applied twice.
    pub fn confirm_result(&mut self, match_id: MatchId) -> SwissResult<()> {
        let round_id = self.ensure_accepts_results(match_id)?;
        let scopes = self.stage(self.round(round_id)?.stage_id)?.scopes();

        let game = self
            .matches
            .get_mut(&match_id)
            .ok_or_else(|| SwissError::not_found(Entity::Match, match_id))?;
        let (delta1, delta2) = ledger::confirm(game)?;
        let (player1, player2) = (game.player1, game.player2);

        for (id, delta) in [(player1, delta1), (player2, delta2)] {
            if let Some(enrollment) = self.enrollments.get_mut(&id) {
                for &scope in scopes {
                    delta.apply(enrollment.totals_mut(scope));
                }
            }
        }

        log::debug!("Match {} confirmed", match_id);
        Ok(())
    }

    /// Finish a round once every result is confirmed
    ///
    /// Recomputes stage tiebreakers with `R = round_idx`, records stage
    /// places, then either creates the next round or finishes the stage.
    ///
    /// # Errors
    ///
    /// [`SwissError::IncompleteRound`] while results are unconfirmed, state
    /// errors for rounds that are not paired or already finished.
    pub fn finish_round(&mut self, round_id: RoundId) -> SwissResult<RoundAdvance> {
        let round = self.round(round_id)?;
        let next_state = round.state.transition(RoundAction::Finish)?;
        let unconfirmed = round
            .matches
            .iter()
            .filter(|id| self.matches.get(id).is_some_and(|m| !m.result_confirmed))
            .count();
        if unconfirmed > 0 {
            return Err(SwissError::IncompleteRound {
                round_id,
                unconfirmed,
            });
        }

        let round_idx = round.round_idx;
        let stage = self.stage(round.stage_id)?;
        let stage_id = stage.id;
        let last_round = round_idx >= stage.round_number;
        let counts_for_event = stage.counts_for_event;
        let next_stage_state = if last_round {
            Some(stage.state.transition(StageAction::Finish)?)
        } else {
            None
        };
        let members = stage.enrollments.clone();

        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.state = next_state;
        }
        if counts_for_event {
            self.event_round_pending = true;
        }

        TiebreakerCalculator::new(&self.config).update(
            &mut self.enrollments,
            &members,
            Scope::Stage,
            round_idx,
        );
        self.record_places(&members, Scope::Stage);

        let advance = match next_stage_state {
            Some(state) => {
                if let Some(stage) = self.stages.get_mut(&stage_id) {
                    stage.state = state;
                }
                log::info!("Stage {} finished after round {}", stage_id, round_idx);
                RoundAdvance::StageFinished
            }
            None => {
                let next_id = self.allocate_id();
                self.rounds
                    .insert(next_id, Round::new(next_id, stage_id, round_idx + 1));
                if let Some(stage) = self.stages.get_mut(&stage_id) {
                    stage.rounds.push(next_id);
                }
                log::info!("Finished round {} of stage {}", round_idx, stage_id);
                RoundAdvance::NextRound(next_id)
            }
        };
        Ok(advance)
    }

    /// Ranked standings of a stage or of the whole event
    ///
    /// # Errors
    ///
    /// Fails only for an unknown stage.
    pub fn standings(&self, scope: StandingsScope) -> SwissResult<Vec<StandingsEntry>> {
        let name_tiebreak = self.config.standings_name_tiebreak;
        match scope {
            StandingsScope::Stage(stage_id) => {
                let stage = self.stage(stage_id)?;
                let members = stage
                    .enrollments
                    .iter()
                    .filter_map(|id| self.enrollments.get(id));
                Ok(standings::rank(members, Scope::Stage, name_tiebreak))
            }
            StandingsScope::Event => Ok(standings::rank(
                self.enrollments.values(),
                Scope::Event,
                name_tiebreak,
            )),
        }
    }

    /// Delete a stage's rounds and matches and return it to pre-seated
    ///
    /// Contributions the stage made to event totals are reverted as well.
    ///
    /// # Errors
    ///
    /// Fails only for an unknown stage.
    pub fn reset_history(&mut self, stage_id: StageId) -> SwissResult<()> {
        let stage = self.stage(stage_id)?;
        let next_state = stage.state.transition(StageAction::Reset)?;
        let counts_for_event = stage.counts_for_event;
        let round_ids = stage.rounds.clone();
        let members = stage.enrollments.clone();

        for round_id in &round_ids {
            let Some(round) = self.rounds.remove(round_id) else {
                continue;
            };
            for match_id in &round.matches {
                let Some(game) = self.matches.remove(match_id) else {
                    continue;
                };
                if counts_for_event {
                    self.revert_event_match(&game);
                }
            }
            if counts_for_event {
                for id in &round.byes {
                    if let Some(enrollment) = self.enrollments.get_mut(id) {
                        BYE_DELTA.revert(&mut enrollment.event);
                    }
                }
            }
        }

        for id in &members {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                enrollment.reset_stage();
            }
        }

        if let Some(stage) = self.stages.get_mut(&stage_id) {
            stage.state = next_state;
            stage.rounds.clear();
            stage.last_table = None;
        }

        log::info!(
            "Reset stage {}: removed {} rounds",
            stage_id,
            round_ids.len()
        );
        Ok(())
    }

    /// Withdraw a player from future pairings and from standings
    ///
    /// # Errors
    ///
    /// Fails only for an unknown enrollment.
    pub fn drop_enrollment(&mut self, enrollment_id: EnrollmentId) -> SwissResult<()> {
        self.set_dropped(enrollment_id, true)
    }

    /// Reinstate a dropped player
    ///
    /// # Errors
    ///
    /// Fails only for an unknown enrollment.
    pub fn undrop_enrollment(&mut self, enrollment_id: EnrollmentId) -> SwissResult<()> {
        self.set_dropped(enrollment_id, false)
    }

    /// Close an event round across all stages
    ///
    /// Increments the event round counter, recomputes event tiebreakers with
    /// `R` equal to that counter and records event places.
    ///
    /// # Errors
    ///
    /// State error while any stage has a paired round that is not finished,
    /// or when no stage round counting for the event finished since the
    /// previous event round.
    pub fn finish_event_round(&mut self) -> SwissResult<u32> {
        if let Some(round) = self
            .rounds
            .values()
            .find(|r| r.is_paired() && !r.is_finished())
        {
            return Err(SwissError::state(
                "finish event round",
                format!("round {} of stage {} is {}", round.round_idx, round.stage_id, round.state),
            ));
        }

        if !self.event_round_pending {
            return Err(SwissError::state(
                "finish event round",
                format!("no stage round finished since event round {}", self.current_round),
            ));
        }

        self.current_round += 1;
        self.event_round_pending = false;
        let everyone: Vec<EnrollmentId> = self.enrollments.keys().copied().collect();
        TiebreakerCalculator::new(&self.config).update(
            &mut self.enrollments,
            &everyone,
            Scope::Event,
            self.current_round,
        );
        self.record_places(&everyone, Scope::Event);

        log::info!(
            "Tournament {} finished event round {}",
            self.id,
            self.current_round
        );
        Ok(self.current_round)
    }

    /// Clear the history of every stage and all event totals
    pub fn reset_event(&mut self) {
        for stage in self.stages.values_mut() {
            stage.state = StageState::Created;
            stage.rounds.clear();
            stage.last_table = None;
        }
        self.rounds.clear();
        self.matches.clear();
        for enrollment in self.enrollments.values_mut() {
            enrollment.reset_stage();
            enrollment.event_opponents.clear();
            enrollment.event = Default::default();
        }
        self.current_round = 0;
        self.event_round_pending = false;
        log::info!("Reset tournament {}", self.id);
    }

    // Lookups

    pub(crate) fn stage(&self, stage_id: StageId) -> SwissResult<&Stage> {
        self.stages
            .get(&stage_id)
            .ok_or_else(|| SwissError::not_found(Entity::Stage, stage_id))
    }

    pub(crate) fn round(&self, round_id: RoundId) -> SwissResult<&Round> {
        self.rounds
            .get(&round_id)
            .ok_or_else(|| SwissError::not_found(Entity::Round, round_id))
    }

    pub(crate) fn game(&self, match_id: MatchId) -> SwissResult<&Match> {
        self.matches
            .get(&match_id)
            .ok_or_else(|| SwissError::not_found(Entity::Match, match_id))
    }

    pub(crate) fn enrollment(&self, enrollment_id: EnrollmentId) -> SwissResult<&Enrollment> {
        self.enrollments
            .get(&enrollment_id)
            .ok_or_else(|| SwissError::not_found(Entity::Enrollment, enrollment_id))
    }

    fn current_round_id(&self, stage: &Stage) -> SwissResult<RoundId> {
        stage.rounds.last().copied().ok_or_else(|| {
            SwissError::state("pair round", format!("stage {} has no open round", stage.id))
        })
    }

    fn active_members(&self, members: &[EnrollmentId]) -> Vec<EnrollmentId> {
        members
            .iter()
            .copied()
            .filter(|id| self.enrollments.get(id).is_some_and(|e| !e.dropped))
            .collect()
    }

    /// Returns the round of the match if it accepts results
    fn ensure_accepts_results(&self, match_id: MatchId) -> SwissResult<RoundId> {
        let round = self.round(self.game(match_id)?.round_id)?;
        if !round.state.accepts_results() {
            return Err(SwissError::state(
                "record result",
                format!("round is {}", round.state),
            ));
        }
        Ok(round.id)
    }

    fn record_places(&mut self, ids: &[EnrollmentId], scope: Scope) {
        let name_tiebreak = self.config.standings_name_tiebreak;
        let places: HashMap<EnrollmentId, usize> = standings::rank(
            ids.iter().filter_map(|id| self.enrollments.get(id)),
            scope,
            name_tiebreak,
        )
        .into_iter()
        .map(|entry| (entry.enrollment_id, entry.place))
        .collect();

        for id in ids {
            if let Some(enrollment) = self.enrollments.get_mut(id) {
                enrollment.totals_mut(scope).place = places.get(id).copied();
            }
        }
    }

    fn revert_event_match(&mut self, game: &Match) {
        let deltas = game.result_confirmed.then(|| ledger::match_deltas(game));
        let sides = [
            (game.player1, game.player2, deltas.map(|d| d.0)),
            (game.player2, game.player1, deltas.map(|d| d.1)),
        ];
        for (me, opponent, delta) in sides {
            let Some(enrollment) = self.enrollments.get_mut(&me) else {
                continue;
            };
            if let Some(pos) = enrollment
                .event_opponents
                .iter()
                .rposition(|&id| id == opponent)
            {
                enrollment.event_opponents.remove(pos);
            }
            if let Some(delta) = delta {
                delta.revert(&mut enrollment.event);
            }
        }
    }

    fn set_dropped(&mut self, enrollment_id: EnrollmentId, dropped: bool) -> SwissResult<()> {
        let enrollment = self
            .enrollments
            .get_mut(&enrollment_id)
            .ok_or_else(|| SwissError::not_found(Entity::Enrollment, enrollment_id))?;
        enrollment.dropped = dropped;
        log::info!(
            "Enrollment {} {}",
            enrollment_id,
            if dropped { "dropped" } else { "reinstated" }
        );
        Ok(())
    }
}
