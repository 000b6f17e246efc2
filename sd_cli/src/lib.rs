//! Operator command line for Swiss draft tournaments.
//!
//! Commands are parsed by [`commands::parse_command`] and run by
//! [`app::App`] against a [`swiss_draft::TournamentManager`] backed by the
//! JSON file store.

pub mod app;
pub mod commands;
pub mod config;
