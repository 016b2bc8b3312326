//! Error types.
//!
//! `PlannerError` is the crate-level error returned by the planning
//! pipeline. Solver-level failures are kept apart in `SolveError` so callers
//! can tell an infeasible model from a broken backend.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for planning operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Failure reported by a MILP backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("model is infeasible")]
    Infeasible,

    #[error("model is unbounded")]
    Unbounded,

    #[error("solver backend failure: {0}")]
    Backend(String),
}

/// Failure while loading or checking a `PlannerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Error type for the planning pipeline.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("aircraft '{aircraft}' in interval {interval} is not in the fleet roster")]
    UnknownAircraft { aircraft: String, interval: usize },

    #[error("interval sequence is empty")]
    EmptyHorizon,

    #[error("interval times are not strictly increasing at boundary {index}")]
    NonIncreasingTimes { index: usize },

    #[error("solve failed: {0}")]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    SnapshotParse(#[source] serde_json::Error),

    #[error("report sink failed for station '{station}': {message}")]
    Sink { station: String, message: String },
}

impl PlannerError {
    /// Whether this error came from the solver reporting no feasible solution.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, PlannerError::Solve(SolveError::Infeasible))
    }
}
