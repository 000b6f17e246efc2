//! Result ledger.
//!
//! Reporting stores provisional wins on the match and touches no totals.
//! Confirmation marks the match confirmed and hands back the deltas to apply
//! to both competitors; a match that is already confirmed is rejected, so the
//! deltas of a match can only ever be produced once.

use super::errors::{SwissError, SwissResult, ValidationError};
use super::models::{Match, MatchOutcome, Totals};

/// Points for a match win or a bye
pub const WIN_POINTS: u32 = 3;

/// Points for a drawn match
pub const DRAW_POINTS: u32 = 1;

/// Change applied to one competitor's totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultDelta {
    pub score: u32,
    pub games_played: u32,
    pub games_won: u32,
}

/// A bye counts as a 2-0 match win
pub const BYE_DELTA: ResultDelta = ResultDelta {
    score: WIN_POINTS,
    games_played: 2,
    games_won: 2,
};

impl ResultDelta {
    pub fn apply(&self, totals: &mut Totals) {
        totals.score += self.score;
        totals.games_played += self.games_played;
        totals.games_won += self.games_won;
    }

    /// Undo a previous [`ResultDelta::apply`]
    pub fn revert(&self, totals: &mut Totals) {
        totals.score = totals.score.saturating_sub(self.score);
        totals.games_played = totals.games_played.saturating_sub(self.games_played);
        totals.games_won = totals.games_won.saturating_sub(self.games_won);
    }
}

/// Validate reported win counts
///
/// # Errors
///
/// Returns [`ValidationError::NegativeWins`] or
/// [`ValidationError::TooManyGames`] when the sum exceeds `games_per_match`
pub fn validate_report(
    wins1: i64,
    wins2: i64,
    games_per_match: u8,
) -> Result<(u8, u8), ValidationError> {
    if wins1 < 0 || wins2 < 0 {
        return Err(ValidationError::NegativeWins);
    }
    let total = wins1 + wins2;
    if total > i64::from(games_per_match) {
        return Err(ValidationError::TooManyGames {
            total,
            max: games_per_match,
        });
    }
    // Both fit in u8 once their sum is bounded by games_per_match
    Ok((wins1 as u8, wins2 as u8))
}

/// Store a provisional result
///
/// # Errors
///
/// Rejects invalid win counts and results for matches already confirmed.
/// Nothing on the match changes when an error is returned.
pub fn report(
    game: &mut Match,
    wins1: i64,
    wins2: i64,
    reporter: &str,
    games_per_match: u8,
) -> SwissResult<()> {
    if game.result_confirmed {
        return Err(SwissError::state("report result", "result is confirmed"));
    }
    let (wins1, wins2) = validate_report(wins1, wins2, games_per_match)?;

    game.player1_wins = wins1;
    game.player2_wins = wins2;
    game.result = Some(format!("{wins1}-{wins2}"));
    game.reported_by = Some(reporter.to_string());
    Ok(())
}

/// Deltas for player 1 and player 2 of a reported match
pub fn match_deltas(game: &Match) -> (ResultDelta, ResultDelta) {
    let played = u32::from(game.player1_wins) + u32::from(game.player2_wins);
    let (score1, score2) = match game.outcome() {
        MatchOutcome::Player1 => (WIN_POINTS, 0),
        MatchOutcome::Player2 => (0, WIN_POINTS),
        MatchOutcome::Draw => (DRAW_POINTS, DRAW_POINTS),
    };
    (
        ResultDelta {
            score: score1,
            games_played: played,
            games_won: u32::from(game.player1_wins),
        },
        ResultDelta {
            score: score2,
            games_played: played,
            games_won: u32::from(game.player2_wins),
        },
    )
}

/// Confirm a reported result
///
/// # Errors
///
/// Returns a state error if no result was reported or the match is already
/// confirmed.
pub fn confirm(game: &mut Match) -> SwissResult<(ResultDelta, ResultDelta)> {
    if game.result_confirmed {
        return Err(SwissError::state("confirm result", "result is already confirmed"));
    }
    if game.result.is_none() {
        return Err(SwissError::state("confirm result", "no result has been reported"));
    }
    game.result_confirmed = true;
    Ok(match_deltas(game))
}
