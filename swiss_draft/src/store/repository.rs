//! Repository trait definitions for testability and dependency injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::errors::{StoreError, StoreResult};
use crate::swiss::TournamentId;
use crate::tournament::Tournament;

/// Trait for tournament persistence
pub trait TournamentRepository: Send + Sync {
    /// Store a new tournament, assigning and returning its ID
    fn insert(&self, tournament: Tournament) -> StoreResult<TournamentId>;

    /// Load a tournament by ID
    fn load(&self, id: TournamentId) -> StoreResult<Tournament>;

    /// Overwrite an existing tournament
    fn save(&self, tournament: &Tournament) -> StoreResult<()>;

    /// Remove a tournament
    fn delete(&self, id: TournamentId) -> StoreResult<()>;

    /// IDs of all stored tournaments, ascending
    fn list_ids(&self) -> StoreResult<Vec<TournamentId>>;
}

/// In-memory repository, used by tests and short-lived sessions
#[derive(Clone)]
pub struct InMemoryRepository {
    tournaments: Arc<Mutex<HashMap<TournamentId, Tournament>>>,
    next_id: Arc<Mutex<TournamentId>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            tournaments: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }
}

impl TournamentRepository for InMemoryRepository {
    fn insert(&self, mut tournament: Tournament) -> StoreResult<TournamentId> {
        let mut next_id = self.next_id.lock().map_err(|_| StoreError::Poisoned)?;
        let id = *next_id;
        *next_id += 1;

        tournament.id = id;
        self.tournaments
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(id, tournament);
        Ok(id)
    }

    fn load(&self, id: TournamentId) -> StoreResult<Tournament> {
        self.tournaments
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn save(&self, tournament: &Tournament) -> StoreResult<()> {
        let mut tournaments = self.tournaments.lock().map_err(|_| StoreError::Poisoned)?;
        match tournaments.get_mut(&tournament.id) {
            Some(stored) => {
                *stored = tournament.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(tournament.id)),
        }
    }

    fn delete(&self, id: TournamentId) -> StoreResult<()> {
        self.tournaments
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn list_ids(&self) -> StoreResult<Vec<TournamentId>> {
        let mut ids: Vec<TournamentId> = self
            .tournaments
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwissConfig;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryRepository::new();

        let first = repo
            .insert(Tournament::new("Spring Cube", 0, SwissConfig::default()))
            .expect("Failed to insert tournament");
        let second = repo
            .insert(Tournament::new("Summer Cube", 0, SwissConfig::default()))
            .expect("Failed to insert tournament");

        assert_eq!(first, 1, "First tournament should have ID 1");
        assert_eq!(second, 2);
        assert_eq!(repo.list_ids().expect("list"), vec![1, 2]);
    }

    #[test]
    fn test_save_and_load() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert(Tournament::new("Cube", 8, SwissConfig::default()))
            .expect("insert");

        let mut tournament = repo.load(id).expect("load");
        tournament.enroll("alice").expect("enroll");
        repo.save(&tournament).expect("save");

        let reloaded = repo.load(id).expect("reload");
        assert_eq!(reloaded.enrollments.len(), 1);
    }

    #[test]
    fn test_missing_tournament() {
        let repo = InMemoryRepository::new();
        assert!(matches!(repo.load(9), Err(StoreError::NotFound(9))));
        assert!(matches!(repo.delete(9), Err(StoreError::NotFound(9))));

        let mut orphan = Tournament::new("Orphan", 0, SwissConfig::default());
        orphan.id = 9;
        assert!(matches!(repo.save(&orphan), Err(StoreError::NotFound(9))));
    }

    #[test]
    fn test_delete() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert(Tournament::new("Cube", 0, SwissConfig::default()))
            .expect("insert");
        repo.delete(id).expect("delete");
        assert!(repo.list_ids().expect("list").is_empty());
    }
}
