//! Persistence of tournament aggregates.
//!
//! The engine itself never touches storage. It works on a loaded
//! [`Tournament`](crate::tournament::Tournament) and the manager saves it
//! back through a [`TournamentRepository`].

pub mod errors;
pub mod file;
pub mod repository;

pub use errors::{StoreError, StoreResult};
pub use file::JsonFileRepository;
pub use repository::{InMemoryRepository, TournamentRepository};
