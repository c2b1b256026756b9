//! Schedule stepping over the cycle engine and the three stores.

use crate::error::{SimError, SimResult};
use crate::ledger::{LedgerEntry, Summary};
use crate::options::SimulationOptions;
use laes_core::units::constants::SECONDS_PER_HOUR;
use laes_core::units::j_to_kwh;
use laes_cycle::{CycleEngine, CycleError};
use laes_fluids::PropertyBackend;
use laes_project::{Interval, OperatingMode, PlantConfig, Schedule};
use laes_storage::{StorageError, StoreKind, TankStore, ThermalStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Store capacities chosen when the simulator is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreSizing {
    pub hot_capacity_kwh: f64,
    pub cold_capacity_kwh: f64,
    pub tank_capacity_kg: f64,
    pub tank_min_level_kg: f64,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub sizing: StoreSizing,
    pub ledger: Vec<LedgerEntry>,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
struct Stores {
    tank: TankStore,
    hot: ThermalStore,
    cold: ThermalStore,
}

/// Steps a schedule, invoking the cycle engine once per step and moving
/// liquid, heat and cold between the stores.
///
/// Each step is applied to a copy of the stores and committed only on
/// success, so a failing step leaves the stores and the ledger as they were.
pub struct Simulator<'a> {
    engine: CycleEngine<'a>,
    options: SimulationOptions,
    sizing: StoreSizing,
    stores: Stores,
    ledger: Vec<LedgerEntry>,
    intervals: usize,
    clock_hours: f64,
}

impl<'a> Simulator<'a> {
    pub fn new(
        config: &'a PlantConfig,
        backend: &'a dyn PropertyBackend,
        options: SimulationOptions,
    ) -> SimResult<Self> {
        options.validate()?;
        let engine = CycleEngine::new(config, backend)?;

        let discharge = engine.discharge()?;
        if discharge.net_work <= 0.0 {
            return Err(SimError::Configuration {
                what: format!(
                    "discharge cycle produces no net work ({:.1} J/kg)",
                    discharge.net_work
                ),
            });
        }

        let liquid_rate = config.discharge_power().value / discharge.net_work;
        let duration_s = config.storage_duration_hours * SECONDS_PER_HOUR;
        let hot_capacity =
            discharge.heat_demand() * liquid_rate * duration_s * options.hot_capacity_margin;
        let cold_capacity =
            discharge.cold_recoverable * config.tank_capacity_kg() * options.cold_capacity_fraction;

        let tank_capacity = config.tank_capacity_kg();
        let stores = Stores {
            tank: TankStore::new(
                tank_capacity,
                config.tank_min_level_kg(),
                tank_capacity * options.initial_tank_fraction,
                config.boiloff_fraction_per_day(),
            )?,
            hot: ThermalStore::new(
                StoreKind::Hot,
                hot_capacity,
                config.hot_storage_efficiency,
                config.hot_loss_fraction_per_day(),
            )?
            .with_initial_fraction(options.initial_hot_fraction)?,
            cold: ThermalStore::new(
                StoreKind::Cold,
                cold_capacity,
                config.cold_storage_efficiency,
                config.cold_loss_fraction_per_day(),
            )?
            .with_initial_fraction(options.initial_cold_fraction)?,
        };

        let sizing = StoreSizing {
            hot_capacity_kwh: j_to_kwh(hot_capacity),
            cold_capacity_kwh: j_to_kwh(cold_capacity),
            tank_capacity_kg: tank_capacity,
            tank_min_level_kg: config.tank_min_level_kg(),
        };
        debug!(?sizing, "stores sized");

        Ok(Self {
            engine,
            options,
            sizing,
            stores,
            ledger: Vec::new(),
            intervals: 0,
            clock_hours: 0.0,
        })
    }

    pub fn sizing(&self) -> StoreSizing {
        self.sizing
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// Steps recorded so far, including those before a failed step.
    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn tank(&self) -> &TankStore {
        &self.stores.tank
    }

    pub fn hot_store(&self) -> &ThermalStore {
        &self.stores.hot
    }

    pub fn cold_store(&self) -> &ThermalStore {
        &self.stores.cold
    }

    pub fn clock_hours(&self) -> f64 {
        self.clock_hours
    }

    pub fn summary(&self) -> Summary {
        Summary::from_ledger(
            &self.ledger,
            self.stores.hot.retention(),
            self.stores.cold.retention(),
            self.stores.tank.mass(),
            self.stores.tank.level_fraction(),
        )
    }

    /// Run every interval of `schedule`, stopping at the first error.
    ///
    /// On error the steps completed so far stay available via [`Self::ledger`].
    pub fn run(&mut self, schedule: &Schedule) -> SimResult<Simulation> {
        info!(
            intervals = schedule.len(),
            hours = schedule.total_hours(),
            "simulation started"
        );
        for interval in schedule.intervals() {
            self.step(*interval)?;
        }
        let summary = self.summary();
        info!(
            steps = summary.steps,
            energy_in_kwh = summary.energy_in_kwh,
            energy_out_kwh = summary.energy_out_kwh,
            rte = ?summary.rte,
            "simulation finished"
        );
        Ok(Simulation {
            sizing: self.sizing,
            ledger: self.ledger.clone(),
            summary,
        })
    }

    /// Run one schedule interval, split into sub-steps when
    /// `max_step_hours` is set. Returns the entries it added.
    pub fn step(&mut self, interval: Interval) -> SimResult<&[LedgerEntry]> {
        if !interval.hours.is_finite() || interval.hours <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "interval duration must be positive",
            });
        }
        let index = self.intervals;
        let first = self.ledger.len();
        let substeps = self.options.substeps(interval.hours);
        let hours = interval.hours / substeps as f64;

        for _ in 0..substeps {
            if self.ledger.len() >= self.options.max_steps {
                return Err(SimError::StepLimit {
                    limit: self.options.max_steps,
                });
            }
            let mut next = self.stores.clone();
            let mut entry = LedgerEntry::new(
                self.ledger.len(),
                index,
                self.clock_hours,
                hours,
                interval.mode,
            );
            match interval.mode {
                OperatingMode::Charge => self.charge(&mut next, &mut entry, index)?,
                OperatingMode::Discharge => self.discharge(&mut next, &mut entry, index)?,
                OperatingMode::Idle => {}
            }
            standing_losses(&mut next, &mut entry, hours)
                .map_err(|source| infeasible(index, interval.mode, source))?;
            record_levels(&next, &mut entry);

            debug!(
                step = entry.step,
                interval = index,
                mode = %interval.mode,
                hours,
                energy_in_kwh = entry.energy_in_kwh,
                energy_out_kwh = entry.energy_out_kwh,
                tank_kg = entry.tank_mass_kg,
                "step"
            );

            self.stores = next;
            self.clock_hours += hours;
            self.ledger.push(entry);
        }

        self.intervals += 1;
        Ok(&self.ledger[first..])
    }

    fn charge(&self, stores: &mut Stores, entry: &mut LedgerEntry, index: usize) -> SimResult<()> {
        let mode = OperatingMode::Charge;
        let energy =
            self.engine.config().charge_power().value * entry.duration_hours * SECONDS_PER_HOUR;
        let perf = self
            .engine
            .charge_performance(&stores.cold, energy, self.options.max_cold_draw_per_kg)
            .map_err(|source| cycle(index, mode, source))?;
        let result = &perf.with_cold;

        let air = perf.air_kg;
        let liquid = air * result.liquid_yield;

        if !self.options.allow_spillage && liquid > stores.tank.room() {
            return Err(infeasible(
                index,
                mode,
                StorageError::Infeasible {
                    store: "tank",
                    what: "charge would overflow the tank",
                    requested: liquid,
                    available: stores.tank.room(),
                },
            ));
        }
        let fill = stores
            .tank
            .fill(liquid)
            .map_err(|source| infeasible(index, mode, source))?;

        let heat = stores
            .hot
            .charge(result.heat_rejected() * air)
            .map_err(|source| infeasible(index, mode, source))?;

        let cold_request = perf.cold_draw.min(stores.cold.available());
        if perf.cold_draw - cold_request > 1e-9 * perf.cold_draw {
            warn!(
                interval = index,
                shortfall_kwh = j_to_kwh(perf.cold_draw - cold_request),
                "cold store cannot cover the cold used by the liquefaction"
            );
        }
        let cold = if cold_request > 0.0 {
            stores
                .cold
                .draw_exact(cold_request)
                .map_err(|source| infeasible(index, mode, source))?
                .delivered
        } else {
            0.0
        };

        entry.energy_in_kwh = j_to_kwh(energy);
        entry.air_processed_kg = air;
        entry.liquid_produced_kg = liquid;
        entry.liquid_spilled_kg = fill.spilled;
        entry.hot_charged_kwh = j_to_kwh(heat.stored);
        entry.cold_delivered_kwh = j_to_kwh(cold);
        entry.cold_offer_j_per_kg = perf.cold_offer;
        entry.liquid_yield = result.liquid_yield;
        entry.jt_fallback = result.jt_fallback();
        Ok(())
    }

    fn discharge(
        &self,
        stores: &mut Stores,
        entry: &mut LedgerEntry,
        index: usize,
    ) -> SimResult<()> {
        let mode = OperatingMode::Discharge;
        let energy =
            self.engine.config().discharge_power().value * entry.duration_hours * SECONDS_PER_HOUR;
        let result = self
            .engine
            .discharge()
            .map_err(|source| cycle(index, mode, source))?;

        let liquid = stores
            .tank
            .draw(energy / result.net_work)
            .map_err(|source| infeasible(index, mode, source))?;

        let heat = stores
            .hot
            .draw(result.heat_demand() * liquid)
            .map_err(|source| infeasible(index, mode, source))?;
        if heat.shortfall > 0.0 {
            warn!(
                interval = index,
                shortfall_kwh = j_to_kwh(heat.shortfall),
                "hot store cannot cover the discharge heat demand"
            );
        }

        let cold = stores
            .cold
            .charge(result.cold_recoverable * liquid)
            .map_err(|source| infeasible(index, mode, source))?;

        entry.energy_out_kwh = j_to_kwh(energy);
        entry.liquid_consumed_kg = liquid;
        entry.hot_delivered_kwh = j_to_kwh(heat.delivered);
        entry.hot_shortfall_kwh = j_to_kwh(heat.shortfall);
        entry.cold_charged_kwh = j_to_kwh(cold.stored);
        Ok(())
    }
}

fn standing_losses(
    stores: &mut Stores,
    entry: &mut LedgerEntry,
    hours: f64,
) -> Result<(), StorageError> {
    entry.hot_lost_kwh = j_to_kwh(stores.hot.decay(hours)?);
    entry.cold_lost_kwh = j_to_kwh(stores.cold.decay(hours)?);
    entry.boiloff_kg = stores.tank.boil_off(hours)?;
    Ok(())
}

fn record_levels(stores: &Stores, entry: &mut LedgerEntry) {
    entry.tank_mass_kg = stores.tank.mass();
    entry.tank_level = stores.tank.level_fraction();
    entry.hot_soc_kwh = j_to_kwh(stores.hot.soc());
    entry.cold_soc_kwh = j_to_kwh(stores.cold.soc());
}

fn cycle(interval: usize, mode: OperatingMode, source: CycleError) -> SimError {
    SimError::Cycle {
        interval,
        mode,
        source,
    }
}

fn infeasible(interval: usize, mode: OperatingMode, source: StorageError) -> SimError {
    SimError::InfeasibleSchedule {
        interval,
        mode,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laes_fluids::CoolPropBackend;

    #[test]
    fn stores_are_sized_from_the_cycle() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let sim = Simulator::new(&config, &backend, SimulationOptions::default()).unwrap();
        let sizing = sim.sizing();

        assert_eq!(sizing.tank_capacity_kg, 200_000.0);
        assert_eq!(sizing.tank_min_level_kg, 20_000.0);
        assert!(sizing.hot_capacity_kwh > 0.0);
        assert!(sizing.cold_capacity_kwh > 0.0);
        assert_eq!(sim.tank().mass(), 100_000.0);
        assert!((sim.hot_store().soc_fraction() - 0.5).abs() < 1e-12);
        assert_eq!(sim.cold_store().soc(), 0.0);
    }

    #[test]
    fn idle_applies_only_standing_losses() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let mut sim = Simulator::new(&config, &backend, SimulationOptions::default()).unwrap();
        let entry = sim.step(Interval::new(OperatingMode::Idle, 24.0)).unwrap()[0].clone();

        assert_eq!(entry.energy_in_kwh, 0.0);
        assert_eq!(entry.energy_out_kwh, 0.0);
        assert!((entry.boiloff_kg - 100_000.0 * 0.002).abs() < 1e-6);
        assert!(entry.hot_lost_kwh > 0.0);
        assert_eq!(entry.cold_lost_kwh, 0.0);
        assert_eq!(sim.clock_hours(), 24.0);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let backend = CoolPropBackend::air();
        let config = PlantConfig::default();
        let mut sim = Simulator::new(&config, &backend, SimulationOptions::default()).unwrap();
        let err = sim.step(Interval::new(OperatingMode::Charge, 0.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidArg { .. }));
    }
}
