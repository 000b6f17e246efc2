//! Tiebreaker calculation.
//!
//! Runs in two passes: first every competitor's own match-win and game-win
//! percentages, then the opponent averages, which read the values written by
//! the first pass. Byes never enter the opponent lists, so they only affect
//! a competitor's own percentages.

use std::collections::{BTreeMap, HashMap};

use super::models::{Enrollment, EnrollmentId, Scope};
use crate::config::SwissConfig;

/// Computes match-win, game-win and opponent percentages
#[derive(Debug, Clone)]
pub struct TiebreakerCalculator {
    floor: f64,
    precision: u32,
}

impl TiebreakerCalculator {
    pub fn new(config: &SwissConfig) -> Self {
        Self {
            floor: config.tiebreaker_floor,
            precision: config.tiebreaker_precision,
        }
    }

    /// `max(floor(score / 3) / rounds, floor)`
    pub fn match_win_pct(&self, score: u32, rounds: u32) -> f64 {
        if rounds == 0 {
            return 1.0;
        }
        let wins = f64::from(score / 3);
        self.round((wins / f64::from(rounds)).max(self.floor))
    }

    /// `max(won / played, floor)`, or 1.0 before any game was played
    pub fn game_win_pct(&self, games_won: u32, games_played: u32) -> f64 {
        if games_played == 0 {
            return 1.0;
        }
        self.round((f64::from(games_won) / f64::from(games_played)).max(self.floor))
    }

    /// Floored mean of `values`, 1.0 for an empty list
    pub fn opponent_average(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 1.0;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        self.round(mean.max(self.floor))
    }

    /// Recompute all four tiebreakers of `scope` for every listed competitor
    ///
    /// # Arguments
    ///
    /// * `enrollments` - All enrollments of the tournament
    /// * `ids` - Competitors to recompute; opponents outside this list are
    ///   still read, with their current values
    /// * `scope` - Stage or event totals
    /// * `rounds` - Rounds completed so far in that scope
    pub fn update(
        &self,
        enrollments: &mut BTreeMap<EnrollmentId, Enrollment>,
        ids: &[EnrollmentId],
        scope: Scope,
        rounds: u32,
    ) {
        for id in ids {
            if let Some(enrollment) = enrollments.get_mut(id) {
                let totals = enrollment.totals_mut(scope);
                totals.match_win_pct = self.match_win_pct(totals.score, rounds);
                totals.game_win_pct = self.game_win_pct(totals.games_won, totals.games_played);
            }
        }

        let own: HashMap<EnrollmentId, (f64, f64)> = enrollments
            .values()
            .map(|e| {
                let totals = e.totals(scope);
                (e.id, (totals.match_win_pct, totals.game_win_pct))
            })
            .collect();

        for id in ids {
            let Some(enrollment) = enrollments.get_mut(id) else {
                continue;
            };
            let (mw, gw): (Vec<f64>, Vec<f64>) = enrollment
                .opponents(scope)
                .iter()
                .filter_map(|opp| own.get(opp).copied())
                .unzip();
            let totals = enrollment.totals_mut(scope);
            totals.opp_match_win_pct = self.opponent_average(&mw);
            totals.opp_game_win_pct = self.opponent_average(&gw);
        }

        log::debug!(
            "Updated {} tiebreakers for {} competitors after {} rounds",
            scope,
            ids.len(),
            rounds
        );
    }

    /// Round to the configured precision without dropping below the floor
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        ((value * factor).round() / factor).max(self.floor)
    }
}
