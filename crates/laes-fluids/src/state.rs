//! Thermodynamic state definitions.

use crate::error::{FluidError, FluidResult};
use laes_core::numeric::{ensure_finite, ensure_positive};
use laes_core::units::{Density, Pressure, Temperature};
use std::fmt;

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEntropy = f64;

/// The pair of independent properties used in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPair {
    PT,
    PS,
    PH,
    PQ,
}

/// Input pair for resolving a thermodynamic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature.
    PT { p: Pressure, t: Temperature },
    /// Pressure and specific entropy.
    PS { p: Pressure, s: SpecEntropy },
    /// Pressure and specific enthalpy.
    PH { p: Pressure, h: SpecEnthalpy },
    /// Pressure and vapor quality (0 = saturated liquid, 1 = saturated vapor).
    PQ { p: Pressure, q: f64 },
}

impl StateInput {
    pub fn pair(&self) -> InputPair {
        match self {
            StateInput::PT { .. } => InputPair::PT,
            StateInput::PS { .. } => InputPair::PS,
            StateInput::PH { .. } => InputPair::PH,
            StateInput::PQ { .. } => InputPair::PQ,
        }
    }

    pub fn pressure(&self) -> Pressure {
        match *self {
            StateInput::PT { p, .. }
            | StateInput::PS { p, .. }
            | StateInput::PH { p, .. }
            | StateInput::PQ { p, .. } => p,
        }
    }
}

impl fmt::Display for StateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateInput::PT { p, t } => write!(f, "(P={:.0} Pa, T={:.3} K)", p.value, t.value),
            StateInput::PS { p, s } => write!(f, "(P={:.0} Pa, s={:.3} J/kg·K)", p.value, s),
            StateInput::PH { p, h } => write!(f, "(P={:.0} Pa, h={:.3} J/kg)", p.value, h),
            StateInput::PQ { p, q } => write!(f, "(P={:.0} Pa, Q={:.4})", p.value, q),
        }
    }
}

/// Fully resolved thermodynamic state of the working fluid.
///
/// Produced by a `PropertyBackend`. `quality` is `None` outside the
/// two-phase dome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidState {
    p: Pressure,
    t: Temperature,
    h: SpecEnthalpy,
    s: SpecEntropy,
    quality: Option<f64>,
    rho: Density,
}

impl FluidState {
    /// Assemble a state from backend outputs.
    ///
    /// Intended for `PropertyBackend` implementations; validates that every
    /// property is finite and that pressure, temperature and density are positive.
    pub fn new(
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        quality: Option<f64>,
        rho: Density,
    ) -> FluidResult<Self> {
        ensure_positive(p.value, "pressure")?;
        ensure_positive(t.value, "temperature")?;
        ensure_finite(h, "enthalpy")?;
        ensure_finite(s, "entropy")?;
        ensure_positive(rho.value, "density")?;
        let quality = quality.filter(|q| q.is_finite() && (0.0..=1.0).contains(q));
        Ok(Self {
            p,
            t,
            h,
            s,
            quality,
            rho,
        })
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }

    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.h
    }

    pub fn entropy(&self) -> SpecEntropy {
        self.s
    }

    /// Vapor mass fraction, or `None` when the state is not two-phase.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn density(&self) -> Density {
        self.rho
    }
}
