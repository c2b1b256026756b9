//! Mass-fraction streams and adiabatic mixing.

use crate::error::{ComponentResult, InComponent};
use laes_core::numeric::weighted_mean;
use laes_core::units::Pressure;
use laes_fluids::{FluidState, PropertyBackend};

/// A named fraction of the bulk compressed flow together with its state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFraction {
    pub name: &'static str,
    /// Mass per unit mass of total compressed flow.
    pub fraction: f64,
    pub state: FluidState,
}

impl StreamFraction {
    pub fn new(name: &'static str, fraction: f64, state: FluidState) -> Self {
        Self {
            name,
            fraction,
            state,
        }
    }

    pub fn has_mass(&self) -> bool {
        self.fraction > 0.0
    }
}

/// Adiabatically mix streams at pressure `p`.
///
/// Streams without mass are ignored. A single remaining stream is returned
/// unchanged; otherwise the mass-weighted enthalpy is resolved at `p`.
/// Returns `None` when no stream carries mass.
pub fn mix(
    backend: &dyn PropertyBackend,
    streams: &[StreamFraction],
    p: Pressure,
    component: &'static str,
) -> ComponentResult<Option<FluidState>> {
    let flowing: Vec<&StreamFraction> = streams.iter().filter(|s| s.has_mass()).collect();
    match flowing.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.state)),
        _ => {
            let pairs: Vec<(f64, f64)> = flowing
                .iter()
                .map(|s| (s.fraction, s.state.enthalpy()))
                .collect();
            match weighted_mean(&pairs) {
                Some(h_mix) => Ok(Some(backend.state_ph(p, h_mix).in_component(component)?)),
                None => Ok(None),
            }
        }
    }
}
