//! Error types for the scenario engine.
//!
//! Misuse of the engine (acting out of turn, rewinding an unknown node, an
//! unresolvable table format) is a programming error and is returned as
//! [`EngineError`]. Save-eligibility problems are not errors; see
//! [`SaveIssue`](crate::scenario_engine::scenario::SaveIssue).

use std::path::PathBuf;

use thiserror::Error;

use crate::scenario_engine::models::{Action, NodeId, NodeState, Position, Round, TableFormat};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {id} is {state}; only the active node can act")]
    NodeNotActive { id: NodeId, state: NodeState },

    #[error("{action} is not legal for node {id}")]
    IllegalAction { id: NodeId, action: Action },

    #[error("node {0} has not been reached yet and cannot be rewound")]
    NodeNotReached(NodeId),

    #[error("node {id} belongs to the {round} round")]
    WrongRound { id: NodeId, round: Round },

    #[error("{seat} does not sit at a {format} table")]
    SeatNotInFormat { seat: Position, format: TableFormat },

    #[error("unknown table format '{0}'")]
    UnknownFormat(String),

    #[error("no default sizing for {action} ({})", side(.in_position))]
    MissingSizing { action: Action, in_position: bool },

    #[error("the action log has run out of timestamps")]
    LogExhausted,

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

fn side(in_position: &bool) -> &'static str {
    if *in_position { "in position" } else { "out of position" }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("default stack must be positive, got {0}bb")]
    InvalidStack(f64),

    #[error("sizing for {action} must be positive, got {size}bb")]
    InvalidSizing { action: Action, size: f64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("scenario {0} not found")]
    NotFound(String),
}
