//! Effectiveness model for the cold-box heat exchangers.

use crate::common::check_efficiency;
use crate::error::ComponentResult;
use laes_core::units::{Temperature, k};

/// Counter-flow exchanger described only by its effectiveness.
///
/// The warm stream leaves at
///
/// ```text
/// T_out = T_hot_in − ε · (T_hot_in − T_cold_in)
/// ```
///
/// so ε = 1 cools it all the way to the cold-side inlet temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivenessExchanger {
    effectiveness: f64,
}

impl EffectivenessExchanger {
    pub fn new(effectiveness: f64, component: &'static str) -> ComponentResult<Self> {
        let effectiveness =
            check_efficiency(effectiveness, component, "effectiveness must be in (0, 1]")?;
        Ok(Self { effectiveness })
    }

    pub fn effectiveness(&self) -> f64 {
        self.effectiveness
    }

    /// Warm-stream outlet temperature.
    pub fn hot_outlet(&self, t_hot_in: Temperature, t_cold_in: Temperature) -> Temperature {
        k(t_hot_in.value - self.effectiveness * (t_hot_in.value - t_cold_in.value))
    }
}
