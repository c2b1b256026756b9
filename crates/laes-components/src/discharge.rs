//! Power-recovery train: cryogenic pump, evaporation, superheat and
//! multi-stage expansion with inter-stage reheat.

use crate::common::{check_efficiency, check_pressure, stage_pressure_ratio};
use crate::error::{ComponentError, ComponentResult, InComponent};
use crate::turbomachinery::{StageRecord, expand, pump_work};
use laes_core::units::{Pressure, SpecEnergy, Temperature, pa};
use laes_fluids::{FluidState, PropertyBackend};
use tracing::debug;

const COMPONENT: &str = "discharge_train";

/// Discharge cycle operating parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeTrain {
    low_pressure: Pressure,
    high_pressure: Pressure,
    stages: u32,
    t_superheat: Temperature,
    /// Upper temperature bound for useful cold recovery.
    t_cold_ceiling: Temperature,
    eta_pump: f64,
    eta_turbine: f64,
}

/// Discharge outcome. Specific quantities are per kg of liquid air.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeResult {
    /// Saturated liquid drawn from the tank.
    pub liquid: FluidState,
    pub pump_work: SpecEnergy,
    pub after_pump: FluidState,
    /// Cold released while warming the pumped liquid to the ceiling.
    pub cold_recoverable: SpecEnergy,
    /// Heat to bring the stream from the ceiling to the turbine inlet.
    pub superheat_heat: SpecEnergy,
    /// Heat added between turbine stages.
    pub reheat_heat: SpecEnergy,
    pub stages: Vec<StageRecord>,
    pub turbine_work: SpecEnergy,
    /// Turbine work minus pump work.
    pub net_work: SpecEnergy,
}

impl DischargeResult {
    /// Heat the hot store must supply per kg of liquid.
    pub fn heat_demand(&self) -> SpecEnergy {
        self.superheat_heat + self.reheat_heat
    }
}

impl DischargeTrain {
    pub fn new(
        low_pressure: Pressure,
        high_pressure: Pressure,
        stages: u32,
        t_superheat: Temperature,
        t_cold_ceiling: Temperature,
        eta_pump: f64,
        eta_turbine: f64,
    ) -> ComponentResult<Self> {
        let low_pressure = check_pressure(low_pressure, COMPONENT, "low pressure must be positive")?;
        let high_pressure =
            check_pressure(high_pressure, COMPONENT, "high pressure must be positive")?;
        if high_pressure.value <= low_pressure.value {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "discharge pressure must exceed ambient pressure",
            });
        }
        if stages == 0 {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "stage count must be at least 1",
            });
        }
        if t_superheat.value <= t_cold_ceiling.value {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "superheat temperature must exceed the cold-recovery ceiling",
            });
        }
        Ok(Self {
            low_pressure,
            high_pressure,
            stages,
            t_superheat,
            t_cold_ceiling,
            eta_pump: check_efficiency(eta_pump, COMPONENT, "pump efficiency must be in (0, 1]")?,
            eta_turbine: check_efficiency(
                eta_turbine,
                COMPONENT,
                "turbine efficiency must be in (0, 1]",
            )?,
        })
    }

    /// Evaluate one kg of tank liquid through the train.
    ///
    /// Hot-store sufficiency is not checked here: the turbine inlet and every
    /// reheat always reach the superheat temperature.
    pub fn evaluate(&self, backend: &dyn PropertyBackend) -> ComponentResult<DischargeResult> {
        let liquid = backend
            .state_pq(self.low_pressure, 0.0)
            .in_component(COMPONENT)?;

        // Incompressible pump with the boiling-point density.
        let pump_work = pump_work(
            self.low_pressure,
            self.high_pressure,
            liquid.density().value,
            self.eta_pump,
            COMPONENT,
        )?;
        let after_pump = backend
            .state_ph(self.high_pressure, liquid.enthalpy() + pump_work)
            .in_component(COMPONENT)?;

        let at_ceiling = backend
            .state_pt(self.high_pressure, self.t_cold_ceiling)
            .in_component(COMPONENT)?;
        let cold_recoverable = (at_ceiling.enthalpy() - after_pump.enthalpy()).max(0.0);

        let turbine_inlet = backend
            .state_pt(self.high_pressure, self.t_superheat)
            .in_component(COMPONENT)?;
        let superheat_heat = turbine_inlet.enthalpy() - at_ceiling.enthalpy();

        let ratio = stage_pressure_ratio(self.low_pressure, self.high_pressure, self.stages, COMPONENT)?;
        let mut records = Vec::with_capacity(self.stages as usize);
        let mut turbine_work = 0.0;
        let mut reheat_heat = 0.0;
        let mut current = turbine_inlet;

        for stage in 0..self.stages {
            let last = stage + 1 == self.stages;
            let p_in = current.pressure();
            let p_next = if last {
                self.low_pressure
            } else {
                pa(current.pressure().value / ratio)
            };

            let outcome = expand(backend, &current, p_next, self.eta_turbine, COMPONENT)?;

            let heat = if last {
                0.0
            } else {
                let reheated = backend
                    .state_pt(p_next, self.t_superheat)
                    .in_component(COMPONENT)?;
                let heat = reheated.enthalpy() - outcome.outlet.enthalpy();
                current = reheated;
                heat
            };

            debug!(
                stage,
                p_out_pa = p_next.value,
                work_j_per_kg = outcome.work,
                t_out_k = outcome.outlet.temperature().value,
                reheat_j_per_kg = heat,
                "turbine stage"
            );

            records.push(StageRecord {
                p_in,
                p_out: p_next,
                work: outcome.work,
                outlet_temperature: outcome.outlet.temperature(),
                heat,
            });
            turbine_work += outcome.work;
            reheat_heat += heat;
        }

        let net_work = turbine_work - pump_work;
        debug!(
            pump_work_j_per_kg = pump_work,
            turbine_work_j_per_kg = turbine_work,
            net_work_j_per_kg = net_work,
            cold_recoverable_j_per_kg = cold_recoverable,
            "discharge train"
        );

        Ok(DischargeResult {
            liquid,
            pump_work,
            after_pump,
            cold_recoverable,
            superheat_heat,
            reheat_heat,
            stages: records,
            turbine_work,
            net_work,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laes_core::units::{bar, celsius};
    use laes_fluids::CoolPropBackend;

    fn train(stages: u32) -> DischargeTrain {
        DischargeTrain::new(
            pa(101_325.0),
            bar(70.0),
            stages,
            celsius(250.0),
            celsius(35.0),
            0.75,
            0.85,
        )
        .unwrap()
    }

    #[test]
    fn default_train_produces_net_work() {
        let backend = CoolPropBackend::air();
        let result = train(4).evaluate(&backend).unwrap();

        assert_eq!(result.stages.len(), 4);
        assert!(result.pump_work > 5e3 && result.pump_work < 15e3, "{}", result.pump_work);
        // Several hundred kJ per kg of liquid.
        assert!(result.net_work > 250e3 && result.net_work < 700e3, "{}", result.net_work);
        assert!((result.turbine_work - result.pump_work - result.net_work).abs() < 1e-6);
        assert!(result.cold_recoverable > 0.0);
    }

    #[test]
    fn last_stage_is_not_reheated() {
        let backend = CoolPropBackend::air();
        let result = train(4).evaluate(&backend).unwrap();

        let last = result.stages.last().unwrap();
        assert_eq!(last.heat, 0.0);
        assert!((last.p_out.value - 101_325.0).abs() < 1e-9);
        assert!(result.stages[..3].iter().all(|s| s.heat > 0.0));
        let reheat: f64 = result.stages.iter().map(|s| s.heat).sum();
        assert!((reheat - result.reheat_heat).abs() < 1e-6);
    }

    #[test]
    fn stage_pressures_chain() {
        let backend = CoolPropBackend::air();
        let result = train(3).evaluate(&backend).unwrap();
        for pair in result.stages.windows(2) {
            assert_eq!(pair[0].p_out, pair[1].p_in);
        }
        assert_eq!(result.stages[0].p_in, bar(70.0));
    }

    #[test]
    fn more_stages_recover_more_work() {
        let backend = CoolPropBackend::air();
        let two = train(2).evaluate(&backend).unwrap();
        let four = train(4).evaluate(&backend).unwrap();
        assert!(four.net_work > two.net_work);
        assert!(four.heat_demand() > two.heat_demand());
    }

    #[test]
    fn rejects_inverted_temperatures() {
        let result = DischargeTrain::new(
            pa(101_325.0),
            bar(70.0),
            4,
            celsius(20.0),
            celsius(35.0),
            0.75,
            0.85,
        );
        assert!(result.is_err());
    }
}
