//! Standings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::models::{Enrollment, EnrollmentId, Scope};

/// One line of a standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub place: usize,
    pub enrollment_id: EnrollmentId,
    pub player_name: String,
    pub score: u32,
    pub match_win_pct: f64,
    pub opp_match_win_pct: f64,
    pub game_win_pct: f64,
    pub opp_game_win_pct: f64,
}

/// Rank enrollments by `(score, omw, gw, ogw)`, best first
///
/// Dropped enrollments are skipped. With `name_tiebreak` exact ties are
/// broken by player name, then by enrollment ID; without it, ties keep their
/// input order.
pub fn rank<'a, I>(enrollments: I, scope: Scope, name_tiebreak: bool) -> Vec<StandingsEntry>
where
    I: IntoIterator<Item = &'a Enrollment>,
{
    let mut active: Vec<&Enrollment> = enrollments.into_iter().filter(|e| !e.dropped).collect();
    active.sort_by(|a, b| compare(a, b, scope, name_tiebreak));

    active
        .into_iter()
        .enumerate()
        .map(|(rank, e)| {
            let totals = e.totals(scope);
            StandingsEntry {
                place: rank + 1,
                enrollment_id: e.id,
                player_name: e.player_name.clone(),
                score: totals.score,
                match_win_pct: totals.match_win_pct,
                opp_match_win_pct: totals.opp_match_win_pct,
                game_win_pct: totals.game_win_pct,
                opp_game_win_pct: totals.opp_game_win_pct,
            }
        })
        .collect()
}

fn compare(a: &Enrollment, b: &Enrollment, scope: Scope, name_tiebreak: bool) -> Ordering {
    let by_key = b
        .totals(scope)
        .ranking_key()
        .compare(&a.totals(scope).ranking_key());
    if name_tiebreak {
        by_key
            .then_with(|| a.player_name.cmp(&b.player_name))
            .then_with(|| a.id.cmp(&b.id))
    } else {
        by_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(id: EnrollmentId, name: &str, score: u32, omw: f64) -> Enrollment {
        let mut e = Enrollment::new(id, name);
        e.stage.score = score;
        e.stage.opp_match_win_pct = omw;
        e.stage.game_win_pct = 0.5;
        e.stage.opp_game_win_pct = 0.5;
        e
    }

    #[test]
    fn test_rank_orders_by_score_then_tiebreakers() {
        let field = vec![
            enrollment(1, "carol", 3, 0.9),
            enrollment(2, "alice", 6, 0.4),
            enrollment(3, "bob", 3, 0.5),
        ];

        let table = rank(&field, Scope::Stage, true);

        let order: Vec<EnrollmentId> = table.iter().map(|e| e.enrollment_id).collect();
        assert_eq!(order, vec![2, 1, 3]);
        let places: Vec<usize> = table.iter().map(|e| e.place).collect();
        assert_eq!(places, vec![1, 2, 3]);
    }

    #[test]
    fn test_name_breaks_exact_ties() {
        let field = vec![enrollment(1, "zed", 3, 0.5), enrollment(2, "amy", 3, 0.5)];

        let with_names = rank(&field, Scope::Stage, true);
        assert_eq!(with_names[0].player_name, "amy");

        let without = rank(&field, Scope::Stage, false);
        assert_eq!(without[0].player_name, "zed");
    }

    #[test]
    fn test_dropped_are_excluded() {
        let mut dropped = enrollment(1, "quitter", 9, 1.0);
        dropped.dropped = true;
        let field = vec![dropped, enrollment(2, "stayer", 0, 0.33)];

        let table = rank(&field, Scope::Stage, true);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].enrollment_id, 2);
        assert_eq!(table[0].place, 1);
    }

    #[test]
    fn test_event_scope_reads_event_totals() {
        let mut a = enrollment(1, "a", 9, 0.5);
        a.event.score = 0;
        let mut b = enrollment(2, "b", 0, 0.5);
        b.event.score = 3;

        let table = rank(&[a, b], Scope::Event, true);

        assert_eq!(table[0].enrollment_id, 2);
        assert_eq!(table[0].score, 3);
    }
}
