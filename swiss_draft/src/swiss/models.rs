//! Data model shared by the pairing and ranking engine.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use super::lifecycle::{RoundState, StageState};

/// Tournament (event) ID type
pub type TournamentId = i64;

/// Enrollment (competitor) ID type
pub type EnrollmentId = i64;

/// Stage (draft) ID type
pub type StageId = i64;

/// Round ID type
pub type RoundId = i64;

/// Match ID type
pub type MatchId = i64;

/// Granularity at which running totals and tiebreakers are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Totals for the current stage only, reset whenever a stage is seated
    Stage,
    /// Totals accumulated over every stage of the event
    Event,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Stage => write!(f, "stage"),
            Scope::Event => write!(f, "event"),
        }
    }
}

/// Running totals and computed tiebreakers for one scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Match points: 3 per win or bye, 1 per draw
    pub score: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub match_win_pct: f64,
    pub opp_match_win_pct: f64,
    pub game_win_pct: f64,
    pub opp_game_win_pct: f64,
    /// Place recorded by the last standings computation
    pub place: Option<usize>,
}

impl Totals {
    /// Ranking key used for bracket building and standings
    pub fn ranking_key(&self) -> RankingKey {
        RankingKey {
            score: self.score,
            opp_match_win_pct: self.opp_match_win_pct,
            game_win_pct: self.game_win_pct,
            opp_game_win_pct: self.opp_game_win_pct,
        }
    }
}

/// `(score, opp_match_win_pct, game_win_pct, opp_game_win_pct)`, compared
/// lexicographically
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingKey {
    pub score: u32,
    pub opp_match_win_pct: f64,
    pub game_win_pct: f64,
    pub opp_game_win_pct: f64,
}

impl RankingKey {
    /// Ascending comparison; callers reverse it for "best first" ordering.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.opp_match_win_pct.total_cmp(&other.opp_match_win_pct))
            .then_with(|| self.game_win_pct.total_cmp(&other.game_win_pct))
            .then_with(|| self.opp_game_win_pct.total_cmp(&other.opp_game_win_pct))
    }
}

/// A player's participation in an event and in its current stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub player_name: String,
    /// Seat assigned when the current stage was seated (1-based)
    pub seat: Option<usize>,
    /// Withdrawn; excluded from future pairing and from standings
    pub dropped: bool,
    /// Already placed in a match (or bye) for the round being paired
    pub paired: bool,
    /// Received a bye at some point of the current stage
    pub had_bye: bool,
    pub bye_this_round: bool,
    /// Opponents met in the current stage
    pub pairings: BTreeSet<EnrollmentId>,
    /// Opponents met over the whole event, one entry per match
    pub event_opponents: Vec<EnrollmentId>,
    pub stage: Totals,
    pub event: Totals,
}

impl Enrollment {
    pub fn new(id: EnrollmentId, player_name: impl Into<String>) -> Self {
        Self {
            id,
            player_name: player_name.into(),
            seat: None,
            dropped: false,
            paired: false,
            had_bye: false,
            bye_this_round: false,
            pairings: BTreeSet::new(),
            event_opponents: Vec::new(),
            stage: Totals::default(),
            event: Totals::default(),
        }
    }

    pub fn totals(&self, scope: Scope) -> &Totals {
        match scope {
            Scope::Stage => &self.stage,
            Scope::Event => &self.event,
        }
    }

    pub fn totals_mut(&mut self, scope: Scope) -> &mut Totals {
        match scope {
            Scope::Stage => &mut self.stage,
            Scope::Event => &mut self.event,
        }
    }

    /// Opponents averaged over by the opponent tiebreakers of `scope`
    pub fn opponents(&self, scope: Scope) -> Vec<EnrollmentId> {
        match scope {
            Scope::Stage => self.pairings.iter().copied().collect(),
            Scope::Event => self.event_opponents.clone(),
        }
    }

    pub fn has_played(&self, other: EnrollmentId) -> bool {
        self.pairings.contains(&other)
    }

    /// Clear everything the current stage has accumulated
    pub fn reset_stage(&mut self) {
        self.seat = None;
        self.paired = false;
        self.had_bye = false;
        self.bye_this_round = false;
        self.pairings.clear();
        self.stage = Totals::default();
    }
}

/// One round of a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub stage_id: StageId,
    /// 1-based, unique within the stage
    pub round_idx: u32,
    pub state: RoundState,
    /// Competitors awarded a bye when this round was paired
    pub byes: Vec<EnrollmentId>,
    /// Match IDs in table order
    pub matches: Vec<MatchId>,
}

impl Round {
    pub fn new(id: RoundId, stage_id: StageId, round_idx: u32) -> Self {
        Self {
            id,
            stage_id,
            round_idx,
            state: RoundState::Created,
            byes: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.state != RoundState::Created
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, RoundState::Started | RoundState::Finished)
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoundState::Finished
    }
}

/// Outcome of a match from player 1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Player1,
    Player2,
    Draw,
}

/// A pairing of two competitors at a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round_id: RoundId,
    pub table: u32,
    pub player1: EnrollmentId,
    pub player2: EnrollmentId,
    pub player1_wins: u8,
    pub player2_wins: u8,
    /// Human-readable provisional result, e.g. `"2-1"`
    pub result: Option<String>,
    pub reported_by: Option<String>,
    pub result_confirmed: bool,
}

impl Match {
    pub fn new(
        id: MatchId,
        round_id: RoundId,
        table: u32,
        player1: EnrollmentId,
        player2: EnrollmentId,
    ) -> Self {
        Self {
            id,
            round_id,
            table,
            player1,
            player2,
            player1_wins: 0,
            player2_wins: 0,
            result: None,
            reported_by: None,
            result_confirmed: false,
        }
    }

    pub fn involves(&self, enrollment_id: EnrollmentId) -> bool {
        self.player1 == enrollment_id || self.player2 == enrollment_id
    }

    pub fn opponent_of(&self, enrollment_id: EnrollmentId) -> Option<EnrollmentId> {
        if self.player1 == enrollment_id {
            Some(self.player2)
        } else if self.player2 == enrollment_id {
            Some(self.player1)
        } else {
            None
        }
    }

    pub fn outcome(&self) -> MatchOutcome {
        match self.player1_wins.cmp(&self.player2_wins) {
            Ordering::Greater => MatchOutcome::Player1,
            Ordering::Less => MatchOutcome::Player2,
            Ordering::Equal => MatchOutcome::Draw,
        }
    }

    /// Result string with its confirmation status, `"Pending"` if unreported
    pub fn result_formatted(&self) -> String {
        match (&self.result, self.result_confirmed) {
            (None, _) => "Pending".to_string(),
            (Some(result), false) => format!("{result} (awaiting confirmation)"),
            (Some(result), true) => format!("{result} (confirmed)"),
        }
    }
}

/// A draft: a fixed number of Swiss rounds played by a subset of the event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    /// Phase of the event this stage belongs to (1-based)
    pub phase_idx: u32,
    /// Number of rounds played before the stage finishes
    pub round_number: u32,
    pub first_table: u32,
    /// Highest table number used by the most recent pairing
    pub last_table: Option<u32>,
    /// Whether results also count towards event totals
    pub counts_for_event: bool,
    pub state: StageState,
    pub enrollments: Vec<EnrollmentId>,
    /// Round IDs in round order
    pub rounds: Vec<RoundId>,
}

impl Stage {
    pub fn is_seated(&self) -> bool {
        self.state != StageState::Created
    }

    pub fn is_finished(&self) -> bool {
        self.state == StageState::Finished
    }

    /// Scopes touched by results recorded in this stage
    pub fn scopes(&self) -> &'static [Scope] {
        if self.counts_for_event {
            &[Scope::Stage, Scope::Event]
        } else {
            &[Scope::Stage]
        }
    }
}
