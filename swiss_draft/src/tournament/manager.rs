//! Tournament manager persisting every operation through a repository.
//!
//! Every mutating call runs load, apply, save under a per-tournament lock, so
//! two callers confirming the same match never both apply it. A failed
//! operation is never saved.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::models::{NewStage, RoundAdvance, StandingsScope, Tournament, TournamentInfo};
use super::queries::{RecordEntry, StageStatus};
use crate::config::SwissConfig;
use crate::store::{StoreError, TournamentRepository};
use crate::swiss::{
    EnrollmentId, Match, MatchId, RoundId, StageId, StandingsEntry, SwissResult, TournamentId,
};

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    repository: Arc<dyn TournamentRepository>,
    locks: Arc<Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>>,
    rng: Arc<Mutex<StdRng>>,
}

impl TournamentManager {
    /// Create a manager drawing randomness from the OS
    pub fn new(repository: Arc<dyn TournamentRepository>) -> Self {
        Self::with_rng(repository, StdRng::from_os_rng())
    }

    /// Create a manager with a seeded random source, for reproducible pairings
    pub fn with_seed(repository: Arc<dyn TournamentRepository>, seed: u64) -> Self {
        Self::with_rng(repository, StdRng::seed_from_u64(seed))
    }

    fn with_rng(repository: Arc<dyn TournamentRepository>, rng: StdRng) -> Self {
        Self {
            repository,
            locks: Arc::new(Mutex::new(HashMap::new())),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn lock_for(&self, tournament_id: TournamentId) -> SwissResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(locks.entry(tournament_id).or_default().clone())
    }

    /// Load, apply and save a tournament under its lock
    fn with_tournament<T>(
        &self,
        tournament_id: TournamentId,
        apply: impl FnOnce(&mut Tournament) -> SwissResult<T>,
    ) -> SwissResult<T> {
        let lock = self.lock_for(tournament_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut tournament = self.repository.load(tournament_id)?;
        let value = apply(&mut tournament)?;
        self.repository.save(&tournament)?;
        Ok(value)
    }

    /// Like `with_tournament`, with the shared random source
    fn with_tournament_rng<T>(
        &self,
        tournament_id: TournamentId,
        apply: impl FnOnce(&mut Tournament, &mut StdRng) -> SwissResult<T>,
    ) -> SwissResult<T> {
        self.with_tournament(tournament_id, |tournament| {
            let mut rng = self.rng.lock().map_err(|_| StoreError::Poisoned)?;
            apply(tournament, &mut *rng)
        })
    }

    fn read<T>(
        &self,
        tournament_id: TournamentId,
        view: impl FnOnce(&Tournament) -> SwissResult<T>,
    ) -> SwissResult<T> {
        let tournament = self.repository.load(tournament_id)?;
        view(&tournament)
    }

    /// Create a new tournament
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the event
    /// * `player_capacity` - Maximum enrollments, 0 for unlimited
    /// * `config` - Pairing and ranking settings
    pub fn create_tournament(
        &self,
        name: &str,
        player_capacity: usize,
        config: SwissConfig,
    ) -> SwissResult<TournamentId> {
        let id = self
            .repository
            .insert(Tournament::new(name, player_capacity, config))?;
        log::info!("Created tournament {} ({})", id, name);
        Ok(id)
    }

    pub fn delete_tournament(&self, tournament_id: TournamentId) -> SwissResult<()> {
        let lock = self.lock_for(tournament_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.repository.delete(tournament_id)?;
        Ok(())
    }

    pub fn list_tournaments(&self) -> SwissResult<Vec<TournamentInfo>> {
        let mut infos = Vec::new();
        for id in self.repository.list_ids()? {
            infos.push(self.repository.load(id)?.info());
        }
        Ok(infos)
    }

    pub fn enroll(
        &self,
        tournament_id: TournamentId,
        player_name: &str,
    ) -> SwissResult<EnrollmentId> {
        self.with_tournament(tournament_id, |t| t.enroll(player_name))
    }

    pub fn add_stage(&self, tournament_id: TournamentId, stage: NewStage) -> SwissResult<StageId> {
        self.with_tournament(tournament_id, |t| t.add_stage(stage))
    }

    /// Seat a stage and create its first round
    pub fn seat_stage(
        &self,
        tournament_id: TournamentId,
        stage_id: StageId,
    ) -> SwissResult<RoundId> {
        self.with_tournament_rng(tournament_id, |t, rng| t.seat_stage(stage_id, rng))
    }

    /// Pair the current round of a stage
    pub fn pair_round(
        &self,
        tournament_id: TournamentId,
        stage_id: StageId,
    ) -> SwissResult<RoundId> {
        self.with_tournament_rng(tournament_id, |t, rng| t.pair_round(stage_id, rng))
    }

    pub fn start_round(&self, tournament_id: TournamentId, round_id: RoundId) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| t.start_round(round_id))
    }

    pub fn report_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        player1_wins: i64,
        player2_wins: i64,
        reporter: &str,
    ) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| {
            t.report_result(match_id, player1_wins, player2_wins, reporter)
        })
    }

    pub fn confirm_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| t.confirm_result(match_id))
    }

    pub fn finish_round(
        &self,
        tournament_id: TournamentId,
        round_id: RoundId,
    ) -> SwissResult<RoundAdvance> {
        self.with_tournament(tournament_id, |t| t.finish_round(round_id))
    }

    pub fn standings(
        &self,
        tournament_id: TournamentId,
        scope: StandingsScope,
    ) -> SwissResult<Vec<StandingsEntry>> {
        self.read(tournament_id, |t| t.standings(scope))
    }

    /// Wipe the results of a stage so it can be re-seated
    pub fn reset_history(&self, tournament_id: TournamentId, stage_id: StageId) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| t.reset_history(stage_id))
    }

    pub fn drop_enrollment(
        &self,
        tournament_id: TournamentId,
        enrollment_id: EnrollmentId,
    ) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| t.drop_enrollment(enrollment_id))
    }

    pub fn undrop_enrollment(
        &self,
        tournament_id: TournamentId,
        enrollment_id: EnrollmentId,
    ) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| t.undrop_enrollment(enrollment_id))
    }

    /// Close an event round, returning the number of event rounds played
    pub fn finish_event_round(&self, tournament_id: TournamentId) -> SwissResult<u32> {
        self.with_tournament(tournament_id, |t| t.finish_event_round())
    }

    pub fn reset_event(&self, tournament_id: TournamentId) -> SwissResult<()> {
        self.with_tournament(tournament_id, |t| {
            t.reset_event();
            Ok(())
        })
    }

    /// Full copy of a tournament as stored
    pub fn snapshot(&self, tournament_id: TournamentId) -> SwissResult<Tournament> {
        self.read(tournament_id, |t| Ok(t.clone()))
    }

    pub fn matches_for_round(
        &self,
        tournament_id: TournamentId,
        round_id: RoundId,
    ) -> SwissResult<Vec<Match>> {
        self.read(tournament_id, |t| {
            Ok(t.matches_for_round(round_id)?.into_iter().cloned().collect())
        })
    }

    pub fn player_record(
        &self,
        tournament_id: TournamentId,
        enrollment_id: EnrollmentId,
    ) -> SwissResult<Vec<RecordEntry>> {
        self.read(tournament_id, |t| t.player_record(enrollment_id))
    }

    pub fn stage_status(
        &self,
        tournament_id: TournamentId,
        stage_id: StageId,
    ) -> SwissResult<StageStatus> {
        self.read(tournament_id, |t| t.stage_status(stage_id))
    }
}
