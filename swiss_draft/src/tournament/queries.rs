//! Read-only views on a tournament.

use serde::{Deserialize, Serialize};

use super::models::Tournament;
use crate::swiss::{
    Enrollment, EnrollmentId, Entity, Match, MatchOutcome, Round, RoundId, RoundState, StageId,
    StageState, SwissError, SwissResult,
};

/// Outcome of one round from a player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOutcome {
    Win,
    Loss,
    Draw,
    Bye,
    /// Result not confirmed yet
    Pending,
}

/// One line of a player's record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub stage_id: StageId,
    pub round_idx: u32,
    pub opponent: Option<EnrollmentId>,
    pub opponent_name: Option<String>,
    pub outcome: RecordOutcome,
    /// Games won by the player and by the opponent
    pub games: (u8, u8),
}

/// Dashboard summary of a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatus {
    pub stage_id: StageId,
    pub name: String,
    pub state: StageState,
    pub round_idx: Option<u32>,
    pub round_state: Option<RoundState>,
    pub round_number: u32,
    pub matches: usize,
    pub confirmed: usize,
    pub byes: usize,
}

impl Tournament {
    /// Latest round of a stage
    ///
    /// # Errors
    ///
    /// Not found for an unknown stage or a stage that was never seated.
    pub fn current_round(&self, stage_id: StageId) -> SwissResult<&Round> {
        let stage = self.stage(stage_id)?;
        let round_id = stage
            .rounds
            .last()
            .ok_or_else(|| SwissError::not_found(Entity::Round, stage_id))?;
        self.round(*round_id)
    }

    /// Match of a player in the current round of a stage, if any
    ///
    /// # Errors
    ///
    /// Fails for an unknown stage or an unseated stage.
    pub fn current_match(
        &self,
        stage_id: StageId,
        enrollment_id: EnrollmentId,
    ) -> SwissResult<Option<&Match>> {
        let round = self.current_round(stage_id)?;
        Ok(round
            .matches
            .iter()
            .filter_map(|id| self.matches.get(id))
            .find(|m| m.involves(enrollment_id)))
    }

    /// Matches of a round in table order
    ///
    /// # Errors
    ///
    /// Fails for an unknown round.
    pub fn matches_for_round(&self, round_id: RoundId) -> SwissResult<Vec<&Match>> {
        let round = self.round(round_id)?;
        let mut matches: Vec<&Match> = round
            .matches
            .iter()
            .filter_map(|id| self.matches.get(id))
            .collect();
        matches.sort_by_key(|m| m.table);
        Ok(matches)
    }

    /// Players with a bye in the current round of a stage
    ///
    /// # Errors
    ///
    /// Fails for an unknown or unseated stage.
    pub fn bye_this_round(&self, stage_id: StageId) -> SwissResult<Vec<&Enrollment>> {
        let round = self.current_round(stage_id)?;
        Ok(round
            .byes
            .iter()
            .filter_map(|id| self.enrollments.get(id))
            .collect())
    }

    /// All matches of a player, in play order
    ///
    /// # Errors
    ///
    /// Fails for an unknown enrollment.
    pub fn match_history(&self, enrollment_id: EnrollmentId) -> SwissResult<Vec<&Match>> {
        self.enrollment(enrollment_id)?;
        let mut history: Vec<&Match> = self
            .matches
            .values()
            .filter(|m| m.involves(enrollment_id))
            .collect();
        // Round IDs are allocated in play order
        history.sort_by_key(|m| (m.round_id, m.table));
        Ok(history)
    }

    /// Round-by-round record of a player, byes included
    ///
    /// # Errors
    ///
    /// Fails for an unknown enrollment.
    pub fn player_record(&self, enrollment_id: EnrollmentId) -> SwissResult<Vec<RecordEntry>> {
        self.enrollment(enrollment_id)?;

        let mut record = Vec::new();
        for round in self.rounds.values() {
            if round.byes.contains(&enrollment_id) {
                record.push(RecordEntry {
                    stage_id: round.stage_id,
                    round_idx: round.round_idx,
                    opponent: None,
                    opponent_name: None,
                    outcome: RecordOutcome::Bye,
                    games: (2, 0),
                });
                continue;
            }

            let game = round
                .matches
                .iter()
                .filter_map(|id| self.matches.get(id))
                .find(|m| m.involves(enrollment_id));
            let Some(game) = game else {
                continue;
            };

            let is_player1 = game.player1 == enrollment_id;
            let opponent = game.opponent_of(enrollment_id);
            let games = if is_player1 {
                (game.player1_wins, game.player2_wins)
            } else {
                (game.player2_wins, game.player1_wins)
            };
            let outcome = if !game.result_confirmed {
                RecordOutcome::Pending
            } else {
                match (game.outcome(), is_player1) {
                    (MatchOutcome::Draw, _) => RecordOutcome::Draw,
                    (MatchOutcome::Player1, true) | (MatchOutcome::Player2, false) => {
                        RecordOutcome::Win
                    }
                    _ => RecordOutcome::Loss,
                }
            };

            record.push(RecordEntry {
                stage_id: round.stage_id,
                round_idx: round.round_idx,
                opponent,
                opponent_name: opponent
                    .and_then(|id| self.enrollments.get(&id))
                    .map(|e| e.player_name.clone()),
                outcome,
                games: if outcome == RecordOutcome::Pending { (0, 0) } else { games },
            });
        }
        Ok(record)
    }

    /// Summary of a stage and its current round
    ///
    /// # Errors
    ///
    /// Fails for an unknown stage.
    pub fn stage_status(&self, stage_id: StageId) -> SwissResult<StageStatus> {
        let stage = self.stage(stage_id)?;
        let round = stage.rounds.last().and_then(|id| self.rounds.get(id));
        let matches: Vec<&Match> = round
            .map(|r| r.matches.iter().filter_map(|id| self.matches.get(id)).collect())
            .unwrap_or_default();

        Ok(StageStatus {
            stage_id,
            name: stage.name.clone(),
            state: stage.state,
            round_idx: round.map(|r| r.round_idx),
            round_state: round.map(|r| r.state),
            round_number: stage.round_number,
            matches: matches.len(),
            confirmed: matches.iter().filter(|m| m.result_confirmed).count(),
            byes: round.map_or(0, |r| r.byes.len()),
        })
    }
}
