//! Property backend trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::state::{FluidState, SpecEnthalpy, SpecEntropy, StateInput};
use laes_core::units::{Pressure, Temperature};

/// Capability interface to a real-gas equation of state for one working fluid.
///
/// Implementations must be pure and deterministic: the same query always
/// resolves to the same state. They must be thread-safe (Send + Sync) so a
/// single backend can be shared by reference across the cycle models.
///
/// Queries outside the backend's valid domain fail with
/// [`FluidError::PropertyResolution`].
pub trait PropertyBackend: Send + Sync {
    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Resolve the full state from two independent properties.
    fn state_at(&self, input: StateInput) -> FluidResult<FluidState>;

    /// State at pressure and temperature.
    fn state_pt(&self, p: Pressure, t: Temperature) -> FluidResult<FluidState> {
        self.state_at(StateInput::PT { p, t })
    }

    /// State at pressure and specific entropy.
    fn state_ps(&self, p: Pressure, s: SpecEntropy) -> FluidResult<FluidState> {
        self.state_at(StateInput::PS { p, s })
    }

    /// State at pressure and specific enthalpy.
    fn state_ph(&self, p: Pressure, h: SpecEnthalpy) -> FluidResult<FluidState> {
        self.state_at(StateInput::PH { p, h })
    }

    /// Saturation state at pressure and vapor quality.
    fn state_pq(&self, p: Pressure, q: f64) -> FluidResult<FluidState> {
        self.state_at(StateInput::PQ { p, q })
    }
}

impl<B: PropertyBackend + ?Sized> PropertyBackend for &B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn state_at(&self, input: StateInput) -> FluidResult<FluidState> {
        (**self).state_at(input)
    }
}

/// Validation helpers for query inputs.
pub(crate) mod validation {
    use super::*;
    use laes_core::numeric::{ensure_finite, ensure_in_range, ensure_positive};

    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        ensure_positive(p.value, "pressure")?;
        Ok(())
    }

    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        ensure_positive(t.value, "temperature")?;
        Ok(())
    }

    /// Enthalpy may be negative on the reference scale.
    pub fn validate_enthalpy(h: f64) -> FluidResult<()> {
        ensure_finite(h, "enthalpy")?;
        Ok(())
    }

    pub fn validate_entropy(s: f64) -> FluidResult<()> {
        ensure_finite(s, "entropy")?;
        Ok(())
    }

    /// A quality outside [0, 1] is a caller error, not a non-physical state.
    pub fn validate_quality(q: f64) -> FluidResult<()> {
        ensure_in_range(q, 0.0, 1.0, "quality").map_err(|_| FluidError::InvalidArg {
            what: "quality must lie in [0, 1]",
        })?;
        Ok(())
    }

    /// Validate whichever pair of inputs the query carries.
    pub fn validate_input(input: &StateInput) -> FluidResult<()> {
        validate_pressure(input.pressure())?;
        match *input {
            StateInput::PT { t, .. } => validate_temperature(t),
            StateInput::PS { s, .. } => validate_entropy(s),
            StateInput::PH { h, .. } => validate_enthalpy(h),
            StateInput::PQ { q, .. } => validate_quality(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use crate::state::StateInput;
    use laes_core::units::{k, pa};

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(pa(101325.0)).is_ok());
        assert!(validate_pressure(pa(-100.0)).is_err());
        assert!(validate_pressure(pa(0.0)).is_err());
        assert!(validate_pressure(pa(f64::NAN)).is_err());
    }

    #[test]
    fn validate_positive_temperature() {
        assert!(validate_temperature(k(300.0)).is_ok());
        assert!(validate_temperature(k(-10.0)).is_err());
        assert!(validate_temperature(k(0.0)).is_err());
    }

    #[test]
    fn validate_quality_bounds() {
        assert!(validate_quality(0.0).is_ok());
        assert!(validate_quality(1.0).is_ok());
        assert!(validate_quality(1.1).is_err());
        assert!(validate_quality(f64::NAN).is_err());
    }

    #[test]
    fn validate_input_checks_both_properties() {
        let ok = StateInput::PH {
            p: pa(101325.0),
            h: -120_000.0,
        };
        assert!(validate_input(&ok).is_ok());

        let bad = StateInput::PS {
            p: pa(101325.0),
            s: f64::INFINITY,
        };
        assert!(validate_input(&bad).is_err());
    }
}
