//! Swiss pairing and ranking engine.
//!
//! This module provides:
//! - Score bracket construction
//! - Maximum-weight general matching (blossom algorithm)
//! - Bracket-cascading pairing with bye assignment
//! - Tiebreaker calculation and standings
//! - Result ledger and round/stage state machines

pub mod blossom;
pub mod brackets;
pub mod errors;
pub mod ledger;
pub mod lifecycle;
pub mod matcher;
pub mod models;
pub mod seating;
pub mod standings;
pub mod tiebreakers;

pub use blossom::{WeightedEdge, max_weight_matching};
pub use brackets::{Bracket, Contender, build_brackets};
pub use errors::{Entity, PairingError, SwissError, SwissResult, ValidationError};
pub use ledger::{BYE_DELTA, ResultDelta};
pub use lifecycle::{RoundAction, RoundState, StageAction, StageState};
pub use matcher::{Matcher, PairingHistory, PairingPlan};
pub use models::{
    Enrollment, EnrollmentId, Match, MatchId, MatchOutcome, RankingKey, Round, RoundId, Scope,
    Stage, StageId, Totals, TournamentId,
};
pub use seating::SeatRandomizer;
pub use standings::StandingsEntry;
pub use tiebreakers::TiebreakerCalculator;
