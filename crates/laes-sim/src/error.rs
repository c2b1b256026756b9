//! Error types for schedule simulation.

use laes_cycle::CycleError;
use laes_project::OperatingMode;
use laes_storage::StorageError;
use thiserror::Error;

/// Errors encountered while setting up or stepping a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Cycle setup failed: {0}")]
    Setup(#[from] CycleError),

    #[error("Store setup failed: {0}")]
    Store(#[from] StorageError),

    #[error("Interval {interval} ({mode}): {source}")]
    Cycle {
        interval: usize,
        mode: OperatingMode,
        #[source]
        source: CycleError,
    },

    #[error("Infeasible schedule at interval {interval} ({mode}): {source}")]
    InfeasibleSchedule {
        interval: usize,
        mode: OperatingMode,
        #[source]
        source: StorageError,
    },

    #[error("Step limit of {limit} reached")]
    StepLimit { limit: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Schedule interval the error was raised in, if any.
    pub fn interval(&self) -> Option<usize> {
        match self {
            SimError::Cycle { interval, .. } | SimError::InfeasibleSchedule { interval, .. } => {
                Some(*interval)
            }
            _ => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SimError::InfeasibleSchedule { .. })
    }
}
