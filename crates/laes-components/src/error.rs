//! Error types for component operations.

use laes_fluids::{FluidError, FluidResult};
use thiserror::Error;

/// Errors raised by the plant components. Every variant names the component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("{component}: property evaluation failed: {source}")]
    Property {
        component: &'static str,
        source: FluidError,
    },

    #[error("{component}: numeric guard: {what} (value {value})")]
    NumericGuard {
        component: &'static str,
        what: &'static str,
        value: f64,
    },

    #[error("{component}: invalid argument: {what}")]
    InvalidArg {
        component: &'static str,
        what: &'static str,
    },

    #[error("{component}: no convergence after {iterations} iterations")]
    ConvergenceFailed {
        component: &'static str,
        iterations: usize,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    /// Component that raised the error.
    pub fn component(&self) -> &'static str {
        match self {
            ComponentError::Property { component, .. }
            | ComponentError::NumericGuard { component, .. }
            | ComponentError::InvalidArg { component, .. }
            | ComponentError::ConvergenceFailed { component, .. } => component,
        }
    }

    /// True when the backend could not resolve a queried state.
    pub fn is_property_resolution(&self) -> bool {
        matches!(self, ComponentError::Property { source, .. } if source.is_property_resolution())
    }
}

/// Attach the calling component to a fluid property failure.
pub trait InComponent<T> {
    fn in_component(self, component: &'static str) -> ComponentResult<T>;
}

impl<T> InComponent<T> for FluidResult<T> {
    fn in_component(self, component: &'static str) -> ComponentResult<T> {
        self.map_err(|source| ComponentError::Property { component, source })
    }
}
