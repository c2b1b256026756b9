//! CoolProp-based property backend.

use crate::backend::{PropertyBackend, validation};
use crate::error::{FluidError, FluidResult};
use crate::state::{FluidState, StateInput};
use laes_core::units::{k, kg_per_m3};
use rfluids::prelude::*;
use tracing::trace;

/// CoolProp backend for a single pure (or pseudo-pure) working fluid.
///
/// Air is modelled by CoolProp as a pseudo-pure fluid, which is how the
/// whole plant model treats its working fluid.
///
/// Thread-safe: rfluids Fluid instances are created per query and never shared.
pub struct CoolPropBackend {
    pure: Pure,
}

impl CoolPropBackend {
    /// Create a backend for the given substance.
    pub fn new(pure: Pure) -> Self {
        Self { pure }
    }

    /// Backend for air, the LAES working fluid.
    pub fn air() -> Self {
        Self::new(Pure::Air)
    }

    /// Build an rfluids state from the query, mapping failures to
    /// `PropertyResolution` so callers can recognise out-of-domain queries.
    fn resolve(&self, input: &StateInput) -> FluidResult<Fluid> {
        let (first, second) = match *input {
            StateInput::PT { p, t } => (
                FluidInput::pressure(p.value),
                FluidInput::temperature(t.value),
            ),
            StateInput::PS { p, s } => (FluidInput::pressure(p.value), FluidInput::entropy(s)),
            StateInput::PH { p, h } => (FluidInput::pressure(p.value), FluidInput::enthalpy(h)),
            StateInput::PQ { p, q } => (FluidInput::pressure(p.value), FluidInput::quality(q)),
        };

        Fluid::from(self.pure)
            .in_state(first, second)
            .map_err(|e| {
                trace!(%input, error = %e, "state not resolved");
                FluidError::PropertyResolution {
                    input: input.to_string(),
                    message: format!("rfluids error: {}", e),
                }
            })
    }
}

impl Default for CoolPropBackend {
    fn default() -> Self {
        Self::air()
    }
}

fn backend_err(what: &str, e: impl std::fmt::Display) -> FluidError {
    FluidError::Backend {
        message: format!("rfluids error getting {}: {}", what, e),
    }
}

impl PropertyBackend for CoolPropBackend {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn state_at(&self, input: StateInput) -> FluidResult<FluidState> {
        validation::validate_input(&input)?;

        let mut fluid = self.resolve(&input)?;

        let t_k = fluid
            .temperature()
            .map_err(|e| backend_err("temperature", e))?;
        let h = fluid.enthalpy().map_err(|e| backend_err("enthalpy", e))?;
        let s = fluid.entropy().map_err(|e| backend_err("entropy", e))?;
        let rho = fluid.density().map_err(|e| backend_err("density", e))?;

        // CoolProp reports no quality (or one outside [0, 1]) for single-phase states.
        let quality = match input {
            StateInput::PQ { q, .. } => Some(q),
            _ => fluid.quality().ok(),
        };

        FluidState::new(input.pressure(), k(t_k), h, s, quality, kg_per_m3(rho))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laes_core::units::constants::P_ATM_PA;
    use laes_core::units::{Pressure, pa};

    fn atmosphere() -> Pressure {
        pa(P_ATM_PA)
    }

    #[test]
    fn backend_name() {
        let backend = CoolPropBackend::air();
        assert_eq!(backend.name(), "CoolProp");
    }

    #[test]
    fn rejects_invalid_inputs_before_querying() {
        let backend = CoolPropBackend::air();
        let err = backend.state_pq(atmosphere(), 1.5).unwrap_err();
        assert!(matches!(err, FluidError::InvalidArg { .. }));

        let err = backend.state_pt(pa(-1.0), k(300.0)).unwrap_err();
        assert!(matches!(err, FluidError::NonPhysical { .. }));
    }

    #[test]
    fn air_at_ambient_is_single_phase() {
        let backend = CoolPropBackend::air();
        let state = backend.state_pt(atmosphere(), k(298.15)).unwrap();
        assert!(state.density().value > 1.0 && state.density().value < 1.4);
        assert_eq!(state.quality(), None);
    }
}
