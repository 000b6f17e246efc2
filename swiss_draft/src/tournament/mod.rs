//! Tournament aggregate and the manager that persists it.
//!
//! A [`Tournament`] owns its enrollments, stages, rounds and matches. The
//! operations in this module mutate it in memory; [`TournamentManager`] wraps
//! each one in a load, apply, save cycle against a repository.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use swiss_draft::config::SwissConfig;
//! use swiss_draft::store::InMemoryRepository;
//! use swiss_draft::tournament::{NewStage, TournamentManager};
//!
//! let manager = TournamentManager::with_seed(Arc::new(InMemoryRepository::new()), 7);
//! let id = manager.create_tournament("Friday Cube", 8, SwissConfig::default()).unwrap();
//! for name in ["alice", "bob", "carol", "dave"] {
//!     manager.enroll(id, name).unwrap();
//! }
//! let stage = manager.add_stage(id, NewStage::new("Pod 1", 3)).unwrap();
//! manager.seat_stage(id, stage).unwrap();
//! let round = manager.pair_round(id, stage).unwrap();
//! assert_eq!(manager.matches_for_round(id, round).unwrap().len(), 2);
//! ```

pub mod manager;
pub mod models;
mod operations;
pub mod queries;

pub use manager::TournamentManager;
pub use models::{NewStage, RoundAdvance, StandingsScope, Tournament, TournamentInfo};
pub use queries::{RecordEntry, RecordOutcome, StageStatus};
