//! Swiss engine error types.

use std::fmt;
use thiserror::Error;

use super::models::{EnrollmentId, RoundId, StageId};
use crate::store::StoreError;

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Tournament,
    Enrollment,
    Stage,
    Round,
    Match,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Tournament => "Tournament",
            Entity::Enrollment => "Enrollment",
            Entity::Stage => "Stage",
            Entity::Round => "Round",
            Entity::Match => "Match",
        };
        f.write_str(name)
    }
}

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Reported wins exceed the games a match can have
    #[error("Too many games reported: {total} (maximum {max})")]
    TooManyGames { total: i64, max: u8 },

    /// A reported win count is negative
    #[error("Win counts must not be negative")]
    NegativeWins,

    #[error("Player {0} is already enrolled")]
    DuplicateEnrollment(String),

    #[error("Tournament is full ({0} players)")]
    CapacityReached(usize),

    #[error("Name must not be empty")]
    EmptyName,

    #[error("A stage needs at least one round")]
    InvalidRoundCount,
}

/// Failure to produce a pairing for a round
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// Stage has not been seated yet
    #[error("Stage {0} has not been seated")]
    NotSeated(StageId),

    /// More than one competitor left unpaired at the bottom bracket
    #[error("Unable to pair {} competitors without rematches", leftover.len())]
    Unresolvable { leftover: Vec<EnrollmentId> },

    #[error("Stage {0} has no active competitors")]
    NoActiveCompetitors(StageId),
}

/// Engine errors
#[derive(Debug, Error)]
pub enum SwissError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pairing error: {0}")]
    Pairing(#[from] PairingError),

    /// Round cannot finish while results are unconfirmed
    #[error("Round {round_id} has {unconfirmed} unconfirmed results")]
    IncompleteRound { round_id: RoundId, unconfirmed: usize },

    /// Operation not allowed in the current lifecycle state
    #[error("Cannot {action} while {state}")]
    State { action: String, state: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl SwissError {
    pub fn state(action: impl Into<String>, state: impl Into<String>) -> Self {
        SwissError::State {
            action: action.into(),
            state: state.into(),
        }
    }

    pub fn not_found(entity: Entity, id: i64) -> Self {
        SwissError::NotFound { entity, id }
    }

    /// Get a client-safe error message
    ///
    /// Storage errors are sanitized so file paths and serializer details stay
    /// out of user-facing output.
    pub fn client_message(&self) -> String {
        match self {
            SwissError::Storage(StoreError::NotFound(_)) => "Tournament not found".to_string(),
            SwissError::Storage(_) => "Internal storage error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type SwissResult<T> = Result<T, SwissError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_swiss_error() {
        let err: SwissError = ValidationError::TooManyGames { total: 4, max: 3 }.into();
        assert!(matches!(err, SwissError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Too many games reported: 4 (maximum 3)"
        );
    }

    #[test]
    fn test_unresolvable_message_counts_leftovers() {
        let err = PairingError::Unresolvable {
            leftover: vec![3, 7],
        };
        assert_eq!(
            err.to_string(),
            "Unable to pair 2 competitors without rematches"
        );
    }

    #[test]
    fn test_client_message_hides_storage_details() {
        let io = std::io::Error::other("/var/lib/swiss/tournament-1.json: permission denied");
        let err = SwissError::Storage(StoreError::Io(io));
        assert_eq!(err.client_message(), "Internal storage error");

        let err = SwissError::not_found(Entity::Match, 42);
        assert_eq!(err.client_message(), "Match 42 not found");
    }
}
