//! # Swiss Draft
//!
//! Swiss-system pairing and ranking for multi-stage draft tournaments.
//!
//! An event enrolls players once and runs any number of stages (pods). Each
//! stage is seated at random and then played over a fixed number of rounds.
//! Rounds are paired inside score brackets with a maximum-weight matching,
//! avoiding rematches and repeat byes, and leftovers of a bracket are pushed
//! down to the next one.
//!
//! ## Core Modules
//!
//! - [`swiss`]: Domain types, lifecycles, the matcher and tiebreakers
//! - [`tournament`]: The tournament aggregate, its queries and the manager
//! - [`store`]: Persistence behind the [`store::TournamentRepository`] trait
//! - [`config`]: Pairing and ranking settings
//!
//! Results score 3 points for a match win and 1 for a draw; a bye counts as a
//! 2-0 win. Standings order by score, then opponents' match-win percentage,
//! game-win percentage and opponents' game-win percentage.

pub mod config;
pub mod store;
pub mod swiss;
pub mod tournament;

pub use config::{ConfigError, SwissConfig};
pub use swiss::{StandingsEntry, SwissError, SwissResult};
pub use tournament::{NewStage, StandingsScope, Tournament, TournamentManager};
