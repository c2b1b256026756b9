//! Float checks and helpers shared by the model crates.

use crate::{CoreError, CoreResult};

pub fn ensure_finite(value: f64, what: &'static str) -> CoreResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(value: f64, what: &'static str) -> CoreResult<f64> {
    let value = ensure_finite(value, what)?;
    if value <= 0.0 {
        return Err(CoreError::NotPositive { what, value });
    }
    Ok(value)
}

/// Check `min <= value <= max` (and finiteness).
pub fn ensure_in_range(value: f64, min: f64, max: f64, what: &'static str) -> CoreResult<f64> {
    let value = ensure_finite(value, what)?;
    if value < min || value > max {
        return Err(CoreError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Mass-weighted mean of `(weight, value)` pairs.
///
/// Pairs with non-positive weight are ignored. Returns `None` when the total
/// weight is zero so callers never divide by zero.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let total: f64 = pairs.iter().filter(|(w, _)| *w > 0.0).map(|(w, _)| *w).sum();
    if total <= 0.0 {
        return None;
    }
    let sum: f64 = pairs
        .iter()
        .filter(|(w, _)| *w > 0.0)
        .map(|(w, v)| w * v)
        .sum();
    Some(sum / total)
}
