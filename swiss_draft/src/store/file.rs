//! Flat-file JSON repository.
//!
//! One pretty-printed document per tournament, `tournament-<id>.json`, in a
//! single directory. Writes go to a temporary file that is then renamed over
//! the previous document, so a crash never leaves a half-written file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::errors::{StoreError, StoreResult};
use super::repository::TournamentRepository;
use crate::swiss::TournamentId;
use crate::tournament::Tournament;

const FILE_PREFIX: &str = "tournament-";
const FILE_SUFFIX: &str = ".json";

/// Repository storing each tournament as a JSON file
pub struct JsonFileRepository {
    dir: PathBuf,
    /// Serializes ID allocation between concurrent inserts
    insert_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Open (and create if needed) a store directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            insert_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }

    fn write(&self, tournament: &Tournament) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(tournament)?;
        let path = self.path_for(tournament.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn parse_id(file_name: &str) -> Option<TournamentId> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}

impl TournamentRepository for JsonFileRepository {
    fn insert(&self, mut tournament: Tournament) -> StoreResult<TournamentId> {
        let _guard = self.insert_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let id = self.list_ids()?.last().map_or(1, |last| last + 1);
        tournament.id = id;
        self.write(&tournament)?;
        log::debug!("Stored tournament {} in {}", id, self.dir.display());
        Ok(id)
    }

    fn load(&self, id: TournamentId) -> StoreResult<Tournament> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tournament: &Tournament) -> StoreResult<()> {
        if !self.path_for(tournament.id).exists() {
            return Err(StoreError::NotFound(tournament.id));
        }
        self.write(tournament)
    }

    fn delete(&self, id: TournamentId) -> StoreResult<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    fn list_ids(&self) -> StoreResult<Vec<TournamentId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(id) = entry.file_name().to_str().and_then(parse_id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
