//! Joule-Thomson expansion valve with phase separation.

use crate::error::{ComponentError, ComponentResult, InComponent};
use laes_core::units::Pressure;
use laes_fluids::{FluidState, PropertyBackend};
use tracing::warn;

/// Liquid mass fraction assumed when the valve outlet cannot be resolved.
pub const FALLBACK_LIQUID_FRACTION: f64 = 0.30;

const COMPONENT: &str = "jt_valve";

/// How the valve outlet phase split was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum JtOutcome {
    /// Outlet inside the dome; liquid fraction is `1 − quality`.
    TwoPhase { quality: f64 },
    /// Outlet enthalpy at or below saturated liquid: all liquid.
    Subcooled,
    /// Outlet enthalpy above saturated liquid outside the dome: all vapor.
    Superheated,
    /// Backend could not resolve the outlet state; the fixed 30 % liquid
    /// fraction was used instead.
    Fallback { message: String },
}

impl JtOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, JtOutcome::Fallback { .. })
    }
}

/// Throttling result.
#[derive(Debug, Clone, PartialEq)]
pub struct Throttle {
    pub outcome: JtOutcome,
    /// Liquid mass fraction of the stream passing the valve.
    pub liquid_fraction: f64,
    /// Resolved outlet state; `None` on fallback.
    pub outlet: Option<FluidState>,
}

/// Isenthalpic expansion of `inlet` to `p_out`.
///
/// A backend failure to resolve the outlet is the one property error
/// recovered locally: it yields [`JtOutcome::Fallback`]. Every other
/// failure propagates.
pub fn throttle(
    backend: &dyn PropertyBackend,
    inlet: &FluidState,
    p_out: Pressure,
) -> ComponentResult<Throttle> {
    let h = inlet.enthalpy();

    let outlet = match backend.state_ph(p_out, h) {
        Ok(state) => state,
        Err(err) if err.is_property_resolution() => {
            warn!(
                inlet_temperature_k = inlet.temperature().value,
                inlet_pressure_pa = inlet.pressure().value,
                error = %err,
                "J-T outlet unresolved, assuming {:.0}% liquid",
                FALLBACK_LIQUID_FRACTION * 100.0
            );
            return Ok(Throttle {
                outcome: JtOutcome::Fallback {
                    message: err.to_string(),
                },
                liquid_fraction: FALLBACK_LIQUID_FRACTION,
                outlet: None,
            });
        }
        Err(source) => {
            return Err(ComponentError::Property {
                component: COMPONENT,
                source,
            });
        }
    };

    let (outcome, liquid_fraction) = match outlet.quality() {
        Some(quality) => (JtOutcome::TwoPhase { quality }, 1.0 - quality),
        None => {
            let saturated_liquid = backend.state_pq(p_out, 0.0).in_component(COMPONENT)?;
            if h <= saturated_liquid.enthalpy() {
                (JtOutcome::Subcooled, 1.0)
            } else {
                (JtOutcome::Superheated, 0.0)
            }
        }
    };

    Ok(Throttle {
        outcome,
        liquid_fraction,
        outlet: Some(outlet),
    })
}
