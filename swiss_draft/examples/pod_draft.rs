//! Pod Draft Example
//!
//! Runs a single eight-player pod through three Swiss rounds and prints the
//! pairings and final standings.

use rand::SeedableRng;
use rand::rngs::StdRng;
use swiss_draft::tournament::{NewStage, RoundAdvance, StandingsScope, Tournament};
use swiss_draft::SwissConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Swiss Pod Draft Example ===\n");

    let mut rng = StdRng::seed_from_u64(2025);
    let mut tournament = Tournament::new("Friday Cube", 8, SwissConfig::default());
    for name in ["ana", "ben", "cai", "dee", "eli", "fay", "gus", "hal"] {
        tournament.enroll(name)?;
    }

    let stage_id = tournament.add_stage(NewStage::new("Pod 1", 3))?;
    tournament.seat_stage(stage_id, &mut rng)?;

    loop {
        let round_id = tournament.pair_round(stage_id, &mut rng)?;
        println!("Round {}", tournament.rounds[&round_id].round_idx);

        let matches: Vec<_> = tournament
            .matches_for_round(round_id)?
            .into_iter()
            .map(|m| (m.id, m.table, m.player1, m.player2))
            .collect();
        for (match_id, table, p1, p2) in matches {
            // Lower seat wins 2-1
            let (w1, w2) = if tournament.enrollments[&p1].seat < tournament.enrollments[&p2].seat {
                (2, 1)
            } else {
                (1, 2)
            };
            tournament.report_result(match_id, w1, w2, "example")?;
            tournament.confirm_result(match_id)?;
            println!(
                "  Table {}: {} vs {} -> {}-{}",
                table,
                tournament.enrollments[&p1].player_name,
                tournament.enrollments[&p2].player_name,
                w1,
                w2
            );
        }

        if tournament.finish_round(round_id)? == RoundAdvance::StageFinished {
            break;
        }
    }

    println!("\nStandings");
    for entry in tournament.standings(StandingsScope::Stage(stage_id))? {
        println!(
            "  {:>2}. {:<4} {:>2} pts  OMW {:.4}  GW {:.4}  OGW {:.4}",
            entry.place,
            entry.player_name,
            entry.score,
            entry.opp_match_win_pct,
            entry.game_win_pct,
            entry.opp_game_win_pct
        );
    }

    Ok(())
}
