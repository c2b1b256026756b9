//! Cycle engine: component orchestration for one plant configuration.

use crate::error::{CycleError, CycleResult};
use crate::result::{ChargePerformance, LiquefactionResult, RoundTripReport};
use laes_components::{
    ColdBox, ColdReturnStrategy, CompressionTrain, ComponentError, DischargeResult,
    DischargeTrain,
};
use laes_core::units::SpecEnergy;
use laes_fluids::PropertyBackend;
use laes_project::{ColdReturnMode, PlantConfig, validate_config};
use laes_storage::ThermalStore;
use tracing::debug;

/// Re-evaluations allowed when fitting the cold offer to the store.
const OFFER_REFITS: usize = 3;
/// Relative tolerance on the cold draw against the deliverable cold.
const DRAW_SLACK: f64 = 1e-9;

/// Evaluates charge and discharge performance for a validated plant.
///
/// Holds no mutable state: every call recomputes from the configuration
/// and the backend.
pub struct CycleEngine<'a> {
    config: &'a PlantConfig,
    backend: &'a dyn PropertyBackend,
    compression: CompressionTrain,
    cold_box: ColdBox,
    discharge: DischargeTrain,
}

impl<'a> CycleEngine<'a> {
    pub fn new(config: &'a PlantConfig, backend: &'a dyn PropertyBackend) -> CycleResult<Self> {
        validate_config(config)?;

        let compression = CompressionTrain::new(
            config.compressor_stages,
            config.eta_compressor,
            config.intercool_temperature(),
        )?;
        let cold_box = ColdBox::new(
            config.ambient_pressure(),
            config.bypass_fraction,
            config.eta_cryo_turbine,
            config.hx_effectiveness,
        )?
        .with_strategy(strategy(config.cold_return))?;
        let discharge = DischargeTrain::new(
            config.ambient_pressure(),
            config.discharge_pressure(),
            config.turbine_stages,
            config.superheat_temperature(),
            config.intercool_temperature(),
            config.eta_pump,
            config.eta_turbine,
        )?;

        Ok(Self {
            config,
            backend,
            compression,
            cold_box,
            discharge,
        })
    }

    pub fn config(&self) -> &PlantConfig {
        self.config
    }

    /// Liquefaction with `cold_offer` J of stored cold offered per kg of air.
    pub fn liquefaction(&self, cold_offer: SpecEnergy) -> CycleResult<LiquefactionResult> {
        let inlet = self
            .backend
            .state_pt(
                self.config.ambient_pressure(),
                self.config.ambient_temperature(),
            )
            .map_err(|source| ComponentError::Property {
                component: "compression_train",
                source,
            })?;

        let compression =
            self.compression
                .evaluate(self.backend, &inlet, self.config.charge_pressure())?;
        let cold_box = self
            .cold_box
            .evaluate(self.backend, &compression.outlet, cold_offer)?;

        let net_work = compression.work - cold_box.turbine_work;
        if !net_work.is_finite() || net_work <= 0.0 {
            return Err(CycleError::NumericGuard {
                what: "net liquefaction work must be positive",
                value: net_work,
            });
        }

        let liquid_yield = cold_box.liquid_yield;
        let specific_consumption = (liquid_yield > 0.0).then(|| net_work / liquid_yield);

        debug!(
            cold_offer_j_per_kg = cold_offer,
            net_work_j_per_kg = net_work,
            liquid_yield,
            "liquefaction"
        );

        Ok(LiquefactionResult {
            compression,
            cold_box,
            cold_offer,
            net_work,
            liquid_yield,
            specific_consumption,
        })
    }

    /// Discharge performance per kg of liquid.
    pub fn discharge(&self) -> CycleResult<DischargeResult> {
        Ok(self.discharge.evaluate(self.backend)?)
    }

    /// Steady-state round trip, with and without cold recycling.
    ///
    /// In the coupled case the cold store returns, per kg of air, the cold
    /// recovered from the liquid that kg produced, reduced by the store
    /// efficiency.
    pub fn round_trip(&self) -> CycleResult<RoundTripReport> {
        let without_cold = self.liquefaction(0.0)?;
        let discharge = self.discharge()?;
        let cold_offer = steady_state_cold_offer(
            &discharge,
            without_cold.liquid_yield,
            self.config.cold_storage_efficiency,
        );
        let with_cold = self.liquefaction(cold_offer)?;

        Ok(RoundTripReport {
            without_cold,
            with_cold,
            discharge,
            cold_offer,
        })
    }

    /// Charge performance for an interval that consumes `charge_energy` J,
    /// with the cold store in its current state.
    ///
    /// The cold offer per kg of air is the deliverable stored cold spread
    /// over the air the interval would process without cold, capped at
    /// `max_offer` J/kg. Cold changes the net work and with it the air
    /// processed, so when the resulting draw exceeds what the store can
    /// deliver the offer is shrunk to fit and the liquefaction re-evaluated.
    pub fn charge_performance(
        &self,
        cold_store: &ThermalStore,
        charge_energy: f64,
        max_offer: SpecEnergy,
    ) -> CycleResult<ChargePerformance> {
        if !charge_energy.is_finite() || charge_energy < 0.0 {
            return Err(CycleError::NumericGuard {
                what: "charge energy must be non-negative",
                value: charge_energy,
            });
        }

        let without_cold = self.liquefaction(0.0)?;
        let air_estimate_kg = charge_energy / without_cold.net_work;

        let cold_offer = if cold_store.available() > 0.0 && air_estimate_kg > 0.0 {
            (cold_store.available() / air_estimate_kg).min(max_offer)
        } else {
            0.0
        };

        let mut cold_offer = cold_offer;
        let mut with_cold = if cold_offer > 0.0 {
            self.liquefaction(cold_offer)?
        } else {
            without_cold.clone()
        };

        let deliverable = cold_store.available();
        for _ in 0..OFFER_REFITS {
            let air_kg = charge_energy / with_cold.net_work;
            let cold_draw = with_cold.cold_used() * air_kg;
            if cold_draw <= deliverable * (1.0 + DRAW_SLACK) {
                break;
            }
            debug!(
                cold_draw_j = cold_draw,
                deliverable_j = deliverable,
                "cold draw exceeds the store, shrinking the offer"
            );
            cold_offer = deliverable / air_kg;
            with_cold = self.liquefaction(cold_offer)?;
        }

        let air_kg = charge_energy / with_cold.net_work;
        Ok(ChargePerformance {
            air_kg,
            cold_draw: with_cold.cold_used() * air_kg,
            without_cold,
            with_cold,
            air_estimate_kg,
            cold_offer,
        })
    }
}

/// Cold returned per kg of air at steady state: the cold recoverable from
/// the liquid one kg of air yields, after the cold store efficiency.
pub fn steady_state_cold_offer(
    discharge: &DischargeResult,
    liquid_yield: f64,
    cold_store_efficiency: f64,
) -> SpecEnergy {
    discharge.cold_recoverable * cold_store_efficiency * liquid_yield
}

fn strategy(mode: ColdReturnMode) -> ColdReturnStrategy {
    match mode {
        ColdReturnMode::SinglePass => ColdReturnStrategy::SinglePass,
        ColdReturnMode::FixedPoint {
            max_iterations,
            tolerance_k,
        } => ColdReturnStrategy::FixedPoint {
            max_iterations,
            tolerance_k,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laes_fluids::CoolPropBackend;
    use laes_storage::StoreKind;

    #[test]
    fn invalid_config_is_a_configuration_error() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig {
            eta_compressor: 0.0,
            ..PlantConfig::default()
        };
        let err = CycleEngine::new(&config, &backend).err().unwrap();
        assert!(matches!(err, CycleError::Configuration(_)));
    }

    #[test]
    fn strategy_follows_config() {
        assert_eq!(
            strategy(ColdReturnMode::FixedPoint {
                max_iterations: 5,
                tolerance_k: 0.1
            }),
            ColdReturnStrategy::FixedPoint {
                max_iterations: 5,
                tolerance_k: 0.1
            }
        );
    }

    #[test]
    fn empty_cold_store_offers_nothing() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let engine = CycleEngine::new(&config, &backend).unwrap();
        let store = ThermalStore::new(StoreKind::Cold, 1.0e9, 0.85, 0.05).unwrap();

        let perf = engine.charge_performance(&store, 3.6e10, 150e3).unwrap();
        assert_eq!(perf.cold_offer, 0.0);
        assert_eq!(perf.with_cold, perf.without_cold);
        assert!(perf.air_estimate_kg > 0.0);
        assert_eq!(perf.air_kg, perf.air_estimate_kg);
        assert_eq!(perf.cold_draw, 0.0);
    }

    #[test]
    fn cold_offer_is_capped() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let engine = CycleEngine::new(&config, &backend).unwrap();
        let store = ThermalStore::new(StoreKind::Cold, 1.0e12, 0.85, 0.05)
            .unwrap()
            .with_initial_fraction(1.0)
            .unwrap();

        let perf = engine.charge_performance(&store, 3.6e9, 50e3).unwrap();
        assert_eq!(perf.cold_offer, 50e3);
        assert_eq!(perf.with_cold.cold_offer, 50e3);
    }

    #[test]
    fn cold_draw_fits_the_store() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let engine = CycleEngine::new(&config, &backend).unwrap();

        for fraction in [0.001, 0.005, 0.01, 0.05] {
            let store = ThermalStore::new(StoreKind::Cold, 1.0e12, 0.85, 0.05)
                .unwrap()
                .with_initial_fraction(fraction)
                .unwrap();
            let perf = engine.charge_performance(&store, 3.6e10, 150e3).unwrap();

            assert!(
                perf.cold_draw <= store.available() * (1.0 + DRAW_SLACK),
                "draw {} exceeds {}",
                perf.cold_draw,
                store.available()
            );
            let expected = perf.with_cold.cold_used() * perf.air_kg;
            assert!((perf.cold_draw - expected).abs() <= 1e-9 * expected.max(1.0));
            assert!((perf.air_kg * perf.with_cold.net_work - 3.6e10).abs() < 1.0);
            assert!(perf.air_kg <= perf.air_estimate_kg);
        }
    }
}
