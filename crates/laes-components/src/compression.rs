//! Multi-stage intercooled compression train.

use crate::common::{check_efficiency, check_pressure, stage_pressure_ratio};
use crate::error::{ComponentError, ComponentResult, InComponent};
use crate::turbomachinery::{StageRecord, compress};
use laes_core::units::{Pressure, SpecEnergy, Temperature, pa};
use laes_fluids::{FluidState, PropertyBackend};
use tracing::debug;

const COMPONENT: &str = "compression_train";

/// Compressors in series with equal pressure ratio, each followed by an
/// intercooler that returns the stream to a fixed temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionTrain {
    stages: u32,
    eta: f64,
    t_intercool: Temperature,
}

/// Outcome of a compression train evaluation, per kg of air.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub stages: Vec<StageRecord>,
    /// Total specific work consumed.
    pub work: SpecEnergy,
    /// Total heat removed by the intercoolers.
    pub heat_rejected: SpecEnergy,
    /// Stream leaving the final intercooler.
    pub outlet: FluidState,
}

impl CompressionTrain {
    pub fn new(stages: u32, eta: f64, t_intercool: Temperature) -> ComponentResult<Self> {
        if stages == 0 {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "stage count must be at least 1",
            });
        }
        let eta = check_efficiency(eta, COMPONENT, "isentropic efficiency must be in (0, 1]")?;
        if !t_intercool.value.is_finite() || t_intercool.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "intercooler temperature must be positive",
            });
        }
        Ok(Self {
            stages,
            eta,
            t_intercool,
        })
    }

    pub fn stages(&self) -> u32 {
        self.stages
    }

    /// Compress `inlet` to `p_out`.
    ///
    /// The last stage is cooled to the intercooler temperature like the
    /// others, so the outlet is always at `(p_out, T_ic)`.
    pub fn evaluate(
        &self,
        backend: &dyn PropertyBackend,
        inlet: &FluidState,
        p_out: Pressure,
    ) -> ComponentResult<CompressionResult> {
        let p_out = check_pressure(p_out, COMPONENT, "outlet pressure must be positive")?;
        if p_out.value <= inlet.pressure().value {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "outlet pressure must exceed inlet pressure",
            });
        }
        let ratio = stage_pressure_ratio(inlet.pressure(), p_out, self.stages, COMPONENT)?;

        let mut records = Vec::with_capacity(self.stages as usize);
        let mut work = 0.0;
        let mut heat_rejected = 0.0;
        let mut current = *inlet;

        for stage in 0..self.stages {
            // Land exactly on the target pressure in the last stage.
            let p_next = if stage + 1 == self.stages {
                p_out
            } else {
                pa(current.pressure().value * ratio)
            };

            let outcome = compress(backend, &current, p_next, self.eta, COMPONENT)?;
            let cooled = backend
                .state_pt(p_next, self.t_intercool)
                .in_component(COMPONENT)?;
            let heat = outcome.outlet.enthalpy() - cooled.enthalpy();

            debug!(
                stage,
                p_out_pa = p_next.value,
                work_j_per_kg = outcome.work,
                t_out_k = outcome.outlet.temperature().value,
                heat_rejected_j_per_kg = heat,
                "compression stage"
            );

            records.push(StageRecord {
                p_in: current.pressure(),
                p_out: p_next,
                work: outcome.work,
                outlet_temperature: outcome.outlet.temperature(),
                heat,
            });
            work += outcome.work;
            heat_rejected += heat;
            current = cooled;
        }

        Ok(CompressionResult {
            stages: records,
            work,
            heat_rejected,
            outlet: current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laes_core::units::{bar, celsius};
    use laes_fluids::CoolPropBackend;

    fn ambient(backend: &CoolPropBackend) -> FluidState {
        backend.state_pt(pa(101_325.0), celsius(25.0)).unwrap()
    }

    #[test]
    fn three_stage_train_to_50_bar() {
        let backend = CoolPropBackend::air();
        let train = CompressionTrain::new(3, 0.85, celsius(35.0)).unwrap();
        let result = train.evaluate(&backend, &ambient(&backend), bar(50.0)).unwrap();

        assert_eq!(result.stages.len(), 3);
        // Equal ratio: each stage about 3.66.
        for record in &result.stages {
            let r = record.p_out.value / record.p_in.value;
            assert!((r - (5.0e6_f64 / 101_325.0).powf(1.0 / 3.0)).abs() < 1e-6);
        }
        assert!((result.outlet.pressure().value - 5.0e6).abs() < 1e-6);
        assert!((result.outlet.temperature().value - 308.15).abs() < 0.01);

        assert!(result.work > 400e3 && result.work < 750e3, "{}", result.work);
        let stage_sum: f64 = result.stages.iter().map(|s| s.work).sum();
        assert!((stage_sum - result.work).abs() < 1e-6);
    }

    #[test]
    fn more_stages_need_less_work() {
        let backend = CoolPropBackend::air();
        let inlet = ambient(&backend);
        let two = CompressionTrain::new(2, 0.85, celsius(35.0))
            .unwrap()
            .evaluate(&backend, &inlet, bar(50.0))
            .unwrap();
        let four = CompressionTrain::new(4, 0.85, celsius(35.0))
            .unwrap()
            .evaluate(&backend, &inlet, bar(50.0))
            .unwrap();
        assert!(four.work < two.work);
    }

    #[test]
    fn heat_rejected_is_positive() {
        let backend = CoolPropBackend::air();
        let train = CompressionTrain::new(3, 0.85, celsius(35.0)).unwrap();
        let result = train.evaluate(&backend, &ambient(&backend), bar(50.0)).unwrap();
        assert!(result.heat_rejected > 0.0);
        assert!(result.stages.iter().all(|s| s.heat > 0.0));
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(CompressionTrain::new(0, 0.85, celsius(35.0)).is_err());
        assert!(CompressionTrain::new(3, 1.2, celsius(35.0)).is_err());

        let backend = CoolPropBackend::air();
        let train = CompressionTrain::new(3, 0.85, celsius(35.0)).unwrap();
        assert!(train.evaluate(&backend, &ambient(&backend), pa(50_000.0)).is_err());
    }
}
