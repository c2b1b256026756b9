//! Simulation options: initial store levels, sizing margins and step guards.

use crate::error::{SimError, SimResult};

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationOptions {
    /// Initial tank mass as a fraction of capacity
    pub initial_tank_fraction: f64,
    /// Initial hot store SOC as a fraction of capacity
    pub initial_hot_fraction: f64,
    /// Initial cold store SOC as a fraction of capacity
    pub initial_cold_fraction: f64,
    /// Hot store capacity over the heat one full-power discharge needs
    pub hot_capacity_margin: f64,
    /// Cold store capacity as a fraction of the cold a full tank can return
    pub cold_capacity_fraction: f64,
    /// Cap on cold drawn per kg of air during charge (J/kg)
    pub max_cold_draw_per_kg: f64,
    /// Report liquid past tank capacity as spillage instead of failing
    pub allow_spillage: bool,
    /// Split intervals into sub-steps no longer than this (hours)
    pub max_step_hours: Option<f64>,
    /// Maximum number of steps over a run (safety limit)
    pub max_steps: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            initial_tank_fraction: 0.5,
            initial_hot_fraction: 0.5,
            initial_cold_fraction: 0.0,
            hot_capacity_margin: 1.5,
            cold_capacity_fraction: 0.5,
            max_cold_draw_per_kg: 150e3,
            allow_spillage: true,
            max_step_hours: None,
            max_steps: 100_000,
        }
    }
}

impl SimulationOptions {
    pub fn validate(&self) -> SimResult<()> {
        for (value, what) in [
            (
                self.initial_tank_fraction,
                "initial tank fraction must be in [0, 1]",
            ),
            (
                self.initial_hot_fraction,
                "initial hot fraction must be in [0, 1]",
            ),
            (
                self.initial_cold_fraction,
                "initial cold fraction must be in [0, 1]",
            ),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidArg { what });
            }
        }
        if !self.hot_capacity_margin.is_finite() || self.hot_capacity_margin <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "hot capacity margin must be positive",
            });
        }
        if !self.cold_capacity_fraction.is_finite() || self.cold_capacity_fraction <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "cold capacity fraction must be positive",
            });
        }
        if !self.max_cold_draw_per_kg.is_finite() || self.max_cold_draw_per_kg < 0.0 {
            return Err(SimError::InvalidArg {
                what: "cold draw cap must be non-negative",
            });
        }
        if let Some(h) = self.max_step_hours {
            if !h.is_finite() || h <= 0.0 {
                return Err(SimError::InvalidArg {
                    what: "max step hours must be positive",
                });
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    /// Number of equal sub-steps used for an interval of `hours`.
    pub fn substeps(&self, hours: f64) -> usize {
        match self.max_step_hours {
            Some(max) if hours > max => (hours / max).ceil() as usize,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SimulationOptions::default();
        assert_eq!(opts.initial_tank_fraction, 0.5);
        assert_eq!(opts.max_cold_draw_per_kg, 150e3);
        assert!(opts.allow_spillage);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn substep_count() {
        let mut opts = SimulationOptions::default();
        assert_eq!(opts.substeps(8.0), 1);
        opts.max_step_hours = Some(1.0);
        assert_eq!(opts.substeps(8.0), 8);
        assert_eq!(opts.substeps(2.5), 3);
        assert_eq!(opts.substeps(0.5), 1);
    }

    #[test]
    fn invalid_options() {
        let opts = SimulationOptions {
            max_step_hours: Some(0.0),
            ..SimulationOptions::default()
        };
        assert!(matches!(opts.validate(), Err(SimError::InvalidArg { .. })));

        let opts = SimulationOptions {
            initial_tank_fraction: 1.5,
            ..SimulationOptions::default()
        };
        assert!(opts.validate().is_err());

        let opts = SimulationOptions {
            max_steps: 0,
            ..SimulationOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
