//! Round and stage state machines.
//!
//! Each transition either yields the next state or a [`SwissError::State`]
//! describing the rejected action, so callers never mutate a round or stage
//! into a state its lifecycle does not allow.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{SwissError, SwissResult};

/// Lifecycle of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Created,
    Paired,
    Started,
    Finished,
}

/// Actions that move a round forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    Pair,
    Start,
    Finish,
}

impl RoundAction {
    fn verb(self) -> &'static str {
        match self {
            RoundAction::Pair => "pair round",
            RoundAction::Start => "start round",
            RoundAction::Finish => "finish round",
        }
    }
}

impl RoundState {
    /// Apply `action`, returning the resulting state
    pub fn transition(self, action: RoundAction) -> SwissResult<RoundState> {
        match (self, action) {
            (RoundState::Created, RoundAction::Pair) => Ok(RoundState::Paired),
            (RoundState::Paired, RoundAction::Start) => Ok(RoundState::Started),
            // A round may be finished without an explicit start
            (RoundState::Paired | RoundState::Started, RoundAction::Finish) => {
                Ok(RoundState::Finished)
            }
            (state, action) => Err(SwissError::state(
                action.verb(),
                format!("round is {state}"),
            )),
        }
    }

    /// Results may only be reported between pairing and finishing
    pub fn accepts_results(self) -> bool {
        matches!(self, RoundState::Paired | RoundState::Started)
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundState::Created => "created",
            RoundState::Paired => "paired",
            RoundState::Started => "started",
            RoundState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageState {
    Created,
    Seated,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    Seat,
    /// First round paired
    Begin,
    Finish,
    Reset,
}

impl StageAction {
    fn verb(self) -> &'static str {
        match self {
            StageAction::Seat => "seat stage",
            StageAction::Begin => "begin stage",
            StageAction::Finish => "finish stage",
            StageAction::Reset => "reset stage",
        }
    }
}

impl StageState {
    pub fn transition(self, action: StageAction) -> SwissResult<StageState> {
        match (self, action) {
            (StageState::Created, StageAction::Seat) => Ok(StageState::Seated),
            (StageState::Seated, StageAction::Begin) => Ok(StageState::InProgress),
            // Later rounds of a running stage
            (StageState::InProgress, StageAction::Begin) => Ok(StageState::InProgress),
            (StageState::InProgress, StageAction::Finish) => Ok(StageState::Finished),
            (_, StageAction::Reset) => Ok(StageState::Created),
            (state, action) => Err(SwissError::state(
                action.verb(),
                format!("stage is {state}"),
            )),
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageState::Created => "created",
            StageState::Seated => "seated",
            StageState::InProgress => "in progress",
            StageState::Finished => "finished",
        };
        f.write_str(name)
    }
}
