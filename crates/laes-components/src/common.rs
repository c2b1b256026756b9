//! Common parameter checks for component construction.

use crate::error::{ComponentError, ComponentResult};
use laes_core::units::Pressure;

/// Efficiency or effectiveness in (0, 1].
pub fn check_efficiency(
    value: f64,
    component: &'static str,
    what: &'static str,
) -> ComponentResult<f64> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(ComponentError::InvalidArg { component, what });
    }
    Ok(value)
}

/// Mass fraction in [0, 1].
pub fn check_fraction(
    value: f64,
    component: &'static str,
    what: &'static str,
) -> ComponentResult<f64> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ComponentError::InvalidArg { component, what });
    }
    Ok(value)
}

/// Positive, finite pressure.
pub fn check_pressure(
    value: Pressure,
    component: &'static str,
    what: &'static str,
) -> ComponentResult<Pressure> {
    if !value.value.is_finite() || value.value <= 0.0 {
        return Err(ComponentError::InvalidArg { component, what });
    }
    Ok(value)
}

/// Equal per-stage pressure ratio for `stages` stages between two pressures.
pub fn stage_pressure_ratio(
    p_from: Pressure,
    p_to: Pressure,
    stages: u32,
    component: &'static str,
) -> ComponentResult<f64> {
    if stages == 0 {
        return Err(ComponentError::InvalidArg {
            component,
            what: "stage count must be at least 1",
        });
    }
    Ok((p_to.value / p_from.value).powf(1.0 / stages as f64))
}
