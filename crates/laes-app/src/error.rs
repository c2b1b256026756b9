//! Error types for the laes-app service layer.

use laes_cycle::CycleError;
use laes_project::ConfigError;
use laes_sim::{LedgerEntry, SimError};
use std::path::PathBuf;

/// Application error wrapping the errors of the model crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read configuration file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Cycle evaluation failed: {0}")]
    Cycle(#[from] CycleError),

    /// The run stopped early; `completed` holds the steps recorded before
    /// the failing one.
    #[error("Simulation stopped after {} steps: {source}", .completed.len())]
    Simulation {
        #[source]
        source: SimError,
        completed: Vec<LedgerEntry>,
    },

    #[error("Failed to write artifact: {path}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for laes-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<SimError> for AppError {
    fn from(source: SimError) -> Self {
        AppError::Simulation {
            source,
            completed: Vec::new(),
        }
    }
}

impl AppError {
    /// Steps completed before a simulation error, empty for other errors.
    pub fn completed_steps(&self) -> &[LedgerEntry] {
        match self {
            AppError::Simulation { completed, .. } => completed,
            _ => &[],
        }
    }
}
