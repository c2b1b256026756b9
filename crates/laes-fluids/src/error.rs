//! Fluid property errors.

use laes_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The backend could not resolve the requested state, e.g. a two-phase
    /// query near or above the critical point.
    #[error("Property resolution failed at {input}: {message}")]
    PropertyResolution { input: String, message: String },

    /// The state was resolved but a property could not be read from it.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl FluidError {
    /// True when the backend could not resolve the queried state.
    pub fn is_property_resolution(&self) -> bool {
        matches!(self, FluidError::PropertyResolution { .. })
    }
}

/// Failed property checks on a resolved state are non-physical values.
impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        FluidError::NonPhysical { what: err.what() }
    }
}
