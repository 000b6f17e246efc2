//! Command execution against a tournament manager.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;
use swiss_draft::config::SwissConfig;
use swiss_draft::swiss::{RoundState, StageId, StageState, StandingsEntry, TournamentId};
use swiss_draft::tournament::{NewStage, RoundAdvance, StandingsScope, TournamentManager};

use crate::commands::{Command, StageOptions};

/// Runs parsed commands and renders their output
pub struct App {
    manager: TournamentManager,
    swiss: SwissConfig,
    results: StdRng,
}

impl App {
    /// Create an app; `seed` also drives simulated results
    pub fn new(manager: TournamentManager, swiss: SwissConfig, seed: Option<u64>) -> Self {
        let results = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            manager,
            swiss,
            results,
        }
    }

    /// Execute one command, returning the text to print
    ///
    /// # Errors
    ///
    /// Returns the engine or storage error of the failed operation
    pub fn execute(&mut self, command: Command) -> Result<String> {
        let manager = &self.manager;
        match command {
            Command::New { name, capacity } => {
                let id = manager.create_tournament(&name, capacity, self.swiss.clone())?;
                Ok(format!("Created tournament {} ({})", id, name))
            }
            Command::List => {
                let mut out = String::new();
                for info in manager.list_tournaments()? {
                    writeln!(
                        out,
                        "{:>4}  {:<24} {:>3} players  {} stages  event round {}",
                        info.id,
                        info.name,
                        info.active_count,
                        info.stage_count,
                        info.current_round
                    )?;
                }
                Ok(out)
            }
            Command::Enroll { tournament, names } => {
                let mut out = String::new();
                for name in names {
                    let id = manager
                        .enroll(tournament, &name)
                        .with_context(|| format!("Failed to enroll {}", name))?;
                    writeln!(out, "Enrolled {} as {}", name, id)?;
                }
                Ok(out)
            }
            Command::Stage {
                tournament,
                options,
            } => {
                let name = options.name.clone();
                let id = manager.add_stage(tournament, new_stage(options))?;
                Ok(format!("Added stage {} ({})", id, name))
            }
            Command::Seat { tournament, stage } => {
                let round = manager.seat_stage(tournament, stage)?;
                Ok(format!("Seated stage {}; round {} is ready", stage, round))
            }
            Command::Pair { tournament, stage } => {
                let round = manager.pair_round(tournament, stage)?;
                self.render_round(tournament, stage, round)
            }
            Command::Start { tournament, round } => {
                manager.start_round(tournament, round)?;
                Ok(format!("Started round {}", round))
            }
            Command::Report {
                tournament,
                game,
                player1_wins,
                player2_wins,
                reporter,
            } => {
                manager.report_result(tournament, game, player1_wins, player2_wins, &reporter)?;
                Ok(format!(
                    "Reported {}-{} for match {}",
                    player1_wins, player2_wins, game
                ))
            }
            Command::Confirm { tournament, game } => {
                manager.confirm_result(tournament, game)?;
                Ok(format!("Confirmed match {}", game))
            }
            Command::Finish { tournament, round } => {
                Ok(match manager.finish_round(tournament, round)? {
                    RoundAdvance::NextRound(next) => {
                        format!("Finished round {}; round {} is ready", round, next)
                    }
                    RoundAdvance::StageFinished => {
                        format!("Finished round {}; the stage is complete", round)
                    }
                })
            }
            Command::Standings { tournament, stage } => {
                let scope = stage.map_or(StandingsScope::Event, StandingsScope::Stage);
                Ok(render_standings(&manager.standings(tournament, scope)?))
            }
            Command::Drop {
                tournament,
                enrollment,
            } => {
                manager.drop_enrollment(tournament, enrollment)?;
                Ok(format!("Dropped enrollment {}", enrollment))
            }
            Command::Reset { tournament, stage } => {
                manager.reset_history(tournament, stage)?;
                Ok(format!("Reset stage {}", stage))
            }
            Command::EventRound { tournament } => {
                let round = manager.finish_event_round(tournament)?;
                Ok(format!("Event round {} complete", round))
            }
            Command::Show { tournament, stage } => match stage {
                Some(stage) => self.render_stage(tournament, stage),
                None => self.render_tournament(tournament),
            },
            Command::Export { tournament } => {
                Ok(serde_json::to_string_pretty(&manager.snapshot(tournament)?)?)
            }
            Command::Simulate { tournament, stage } => self.simulate(tournament, stage),
        }
    }

    /// Play the remaining rounds of a stage with random legal results
    fn simulate(&mut self, tournament: TournamentId, stage: StageId) -> Result<String> {
        let manager = self.manager.clone();
        let games_per_match = manager.snapshot(tournament)?.config.games_per_match;

        let status = manager.stage_status(tournament, stage)?;
        if status.state == StageState::Created {
            manager.seat_stage(tournament, stage)?;
        }

        let mut out = String::new();
        loop {
            let status = manager.stage_status(tournament, stage)?;
            if status.state == StageState::Finished {
                break;
            }
            let round = manager.snapshot(tournament)?.current_round(stage)?.clone();
            if round.state == RoundState::Created {
                manager.pair_round(tournament, stage)?;
            }

            for game in manager.matches_for_round(tournament, round.id)? {
                if game.result_confirmed {
                    continue;
                }
                let (w1, w2) = self.random_result(games_per_match);
                manager.report_result(tournament, game.id, w1, w2, "simulation")?;
                manager.confirm_result(tournament, game.id)?;
            }

            manager.finish_round(tournament, round.id)?;
            writeln!(out, "Simulated round {}", round.round_idx)?;
        }

        out.push_str(&render_standings(
            &manager.standings(tournament, StandingsScope::Stage(stage))?,
        ));
        Ok(out)
    }

    /// A legal best-of-N result, draws included
    fn random_result(&mut self, games_per_match: u8) -> (i64, i64) {
        let total = i64::from(games_per_match);
        let needed = total / 2 + 1;
        let loser_max = (total - needed).min(needed - 1);
        match self.results.random_range(0..10) {
            0 if total >= 2 => (1, 1),
            n if n % 2 == 0 => (needed, self.results.random_range(0..=loser_max)),
            _ => (self.results.random_range(0..=loser_max), needed),
        }
    }

    fn render_round(&self, tournament: TournamentId, stage: StageId, round: i64) -> Result<String> {
        let snapshot = self.manager.snapshot(tournament)?;
        let name = |id: i64| {
            snapshot
                .enrollments
                .get(&id)
                .map_or("?", |e| e.player_name.as_str())
        };

        let mut out = String::new();
        writeln!(
            out,
            "Round {} of stage {}",
            snapshot
                .rounds
                .get(&round)
                .map_or(0, |r| r.round_idx),
            stage
        )?;
        for game in snapshot.matches_for_round(round)? {
            writeln!(
                out,
                "  Table {:>3} [match {}]: {} vs {}  {}",
                game.table,
                game.id,
                name(game.player1),
                name(game.player2),
                game.result_formatted()
            )?;
        }
        for bye in snapshot.bye_this_round(stage)? {
            writeln!(out, "  Bye: {}", bye.player_name)?;
        }
        Ok(out)
    }

    fn render_stage(&self, tournament: TournamentId, stage: StageId) -> Result<String> {
        let status = self.manager.stage_status(tournament, stage)?;
        let mut out = format!(
            "Stage {} ({}): {}, round {}/{}\n",
            status.stage_id,
            status.name,
            status.state,
            status.round_idx.unwrap_or(0),
            status.round_number
        );
        if let Some(round_state) = status.round_state {
            writeln!(
                out,
                "Round is {}: {} matches, {} confirmed, {} byes",
                round_state, status.matches, status.confirmed, status.byes
            )?;
            if round_state != RoundState::Created {
                let round = self.manager.snapshot(tournament)?.current_round(stage)?.id;
                out.push_str(&self.render_round(tournament, stage, round)?);
            }
        }
        Ok(out)
    }

    fn render_tournament(&self, tournament: TournamentId) -> Result<String> {
        let snapshot = self.manager.snapshot(tournament)?;
        let info = snapshot.info();
        let mut out = format!(
            "Tournament {} ({}): {} enrolled, {} active, event round {}\n",
            info.id, info.name, info.enrolled_count, info.active_count, info.current_round
        );
        for stage in snapshot.stages.values() {
            writeln!(
                out,
                "  Stage {} ({}) phase {}: {}, {} rounds",
                stage.id, stage.name, stage.phase_idx, stage.state, stage.round_number
            )?;
        }
        for enrollment in snapshot.enrollments.values() {
            writeln!(
                out,
                "  {:>4} {}{}",
                enrollment.id,
                enrollment.player_name,
                if enrollment.dropped { " (dropped)" } else { "" }
            )?;
        }
        Ok(out)
    }
}

fn new_stage(options: StageOptions) -> NewStage {
    let mut stage = NewStage::new(options.name, options.rounds).with_enrollments(options.players);
    if let Some(phase) = options.phase {
        stage = stage.in_phase(phase);
    }
    if let Some(table) = options.first_table {
        stage = stage.with_first_table(table);
    }
    if !options.counts_for_event {
        stage = stage.excluded_from_event();
    }
    stage
}

/// Render a standings table
pub fn render_standings(entries: &[StandingsEntry]) -> String {
    let mut out = String::from("Place  Player                Pts    OMW     GW    OGW\n");
    for entry in entries {
        out.push_str(&format!(
            "{:>5}  {:<20} {:>4}  {:.4} {:.4} {:.4}\n",
            entry.place,
            entry.player_name,
            entry.score,
            entry.opp_match_win_pct,
            entry.game_win_pct,
            entry.opp_game_win_pct
        ));
    }
    out
}
