//! Error types for the tank gunner

use std::path::PathBuf;

use thiserror::Error;

use crate::discretizer::DiscreteState;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TankError {
    #[error("incompatible Q-table shape: expected {expected:?}, found {found:?}")]
    IncompatibleTable {
        expected: [usize; 3],
        found: Vec<usize>,
    },

    #[error("failed to {operation} '{}': {source}", path.display())]
    Storage {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed Q-table file '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid observation: angle={angle}, distance={distance}")]
    InvalidObservation { angle: f64, distance: f64 },

    #[error("update of {state:?} action {action} would store non-finite value {value}")]
    NonFiniteValue {
        state: DiscreteState,
        action: usize,
        value: f64,
    },

    #[error("action index {0} is outside the action set")]
    InvalidAction(usize),

    #[error("episode already finished, start a new one before stepping")]
    EpisodeFinished,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to plot training curves: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, TankError>;
