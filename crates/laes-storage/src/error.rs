//! Storage errors.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The requested transfer cannot be honoured without violating a store limit.
    #[error("{store}: {what} (requested {requested:.3}, available {available:.3})")]
    Infeasible {
        store: &'static str,
        what: &'static str,
        requested: f64,
        available: f64,
    },

    #[error("{store}: invalid argument: {what}")]
    InvalidArg {
        store: &'static str,
        what: &'static str,
    },
}

pub(crate) fn check_amount(value: f64, store: &'static str) -> StorageResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(StorageError::InvalidArg {
            store,
            what: "amount must be non-negative and finite",
        });
    }
    Ok(value)
}

pub(crate) fn check_hours(hours: f64, store: &'static str) -> StorageResult<f64> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(StorageError::InvalidArg {
            store,
            what: "elapsed hours must be non-negative and finite",
        });
    }
    Ok(hours)
}
