use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Violations reported by the checks in [`crate::numeric`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value for {what} must be positive: {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("Value for {what} outside [{min}, {max}]: {value}")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl CoreError {
    /// Name of the checked quantity.
    pub fn what(&self) -> &'static str {
        match self {
            CoreError::NonFinite { what, .. }
            | CoreError::NotPositive { what, .. }
            | CoreError::OutOfRange { what, .. } => what,
        }
    }

    /// The rejected value.
    pub fn value(&self) -> f64 {
        match self {
            CoreError::NonFinite { value, .. }
            | CoreError::NotPositive { value, .. }
            | CoreError::OutOfRange { value, .. } => *value,
        }
    }
}
