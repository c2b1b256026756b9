//! Error types for cycle evaluation.

use laes_components::ComponentError;
use laes_project::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Numeric guard: {what} (value {value})")]
    NumericGuard { what: &'static str, value: f64 },
}

pub type CycleResult<T> = Result<T, CycleError>;

impl CycleError {
    /// Component named by the error, if any.
    pub fn component(&self) -> Option<&'static str> {
        match self {
            CycleError::Component(err) => Some(err.component()),
            _ => None,
        }
    }
}
