//! Single-stage compression and expansion with an isentropic efficiency.
//!
//! Both processes follow the same recipe:
//! 1. ideal outlet at constant entropy `(p_out, s_in)`,
//! 2. ideal enthalpy change `Δh_s`,
//! 3. actual change `Δh_s / η` (compression) or `η·Δh_s` (expansion),
//! 4. actual outlet state from `(p_out, h_out)`.

use crate::error::{ComponentError, ComponentResult, InComponent};
use laes_core::units::{Pressure, SpecEnergy, Temperature};
use laes_fluids::{FluidState, PropertyBackend, SpecEnthalpy};

/// Result of one compression or expansion stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageOutcome {
    pub outlet: FluidState,
    /// Enthalpy of the ideal (isentropic) outlet.
    pub h_isentropic: SpecEnthalpy,
    /// Specific work, positive: consumed for compression, produced for expansion.
    pub work: SpecEnergy,
}

/// Per-stage record kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRecord {
    pub p_in: Pressure,
    pub p_out: Pressure,
    pub work: SpecEnergy,
    /// Temperature leaving the machine, before any inter-stage heat exchange.
    pub outlet_temperature: Temperature,
    /// Heat exchanged after the stage: rejected by an intercooler, or added
    /// by a reheater.
    pub heat: SpecEnergy,
}

/// Compress `inlet` to `p_out` with isentropic efficiency `eta`.
pub fn compress(
    backend: &dyn PropertyBackend,
    inlet: &FluidState,
    p_out: Pressure,
    eta: f64,
    component: &'static str,
) -> ComponentResult<StageOutcome> {
    if p_out.value < inlet.pressure().value {
        return Err(ComponentError::InvalidArg {
            component,
            what: "compressor outlet pressure below inlet pressure",
        });
    }

    let ideal = backend
        .state_ps(p_out, inlet.entropy())
        .in_component(component)?;
    let h_isentropic = ideal.enthalpy();
    let work = (h_isentropic - inlet.enthalpy()) / eta;
    check_work(work, component)?;

    let outlet = backend
        .state_ph(p_out, inlet.enthalpy() + work)
        .in_component(component)?;

    Ok(StageOutcome {
        outlet,
        h_isentropic,
        work,
    })
}

/// Expand `inlet` to `p_out` with isentropic efficiency `eta`.
pub fn expand(
    backend: &dyn PropertyBackend,
    inlet: &FluidState,
    p_out: Pressure,
    eta: f64,
    component: &'static str,
) -> ComponentResult<StageOutcome> {
    if p_out.value > inlet.pressure().value {
        return Err(ComponentError::InvalidArg {
            component,
            what: "turbine outlet pressure above inlet pressure",
        });
    }

    let ideal = backend
        .state_ps(p_out, inlet.entropy())
        .in_component(component)?;
    let h_isentropic = ideal.enthalpy();
    let work = (inlet.enthalpy() - h_isentropic) * eta;
    check_work(work, component)?;

    let outlet = backend
        .state_ph(p_out, inlet.enthalpy() - work)
        .in_component(component)?;

    Ok(StageOutcome {
        outlet,
        h_isentropic,
        work,
    })
}

/// Hydraulic work of an incompressible pump: `Δp / (ρ·η)`.
pub fn pump_work(
    p_in: Pressure,
    p_out: Pressure,
    rho: f64,
    eta: f64,
    component: &'static str,
) -> ComponentResult<SpecEnergy> {
    if !rho.is_finite() || rho <= 0.0 {
        return Err(ComponentError::NumericGuard {
            component,
            what: "liquid density must be positive",
            value: rho,
        });
    }
    let work = (p_out.value - p_in.value) / (rho * eta);
    check_work(work, component)?;
    Ok(work)
}

fn check_work(work: f64, component: &'static str) -> ComponentResult<()> {
    // Tiny negative values appear when inlet and outlet pressure coincide.
    if !work.is_finite() || work < -1e-6 {
        return Err(ComponentError::NumericGuard {
            component,
            what: "stage work is negative or non-finite",
            value: work,
        });
    }
    Ok(())
}
