//! Schedule resolution and simulation runs.

use laes_fluids::PropertyBackend;
use laes_project::{PlantConfig, Schedule};
use laes_sim::{Simulation, SimulationOptions, Simulator};
use tracing::{error, info};

use crate::error::{AppError, AppResult};

/// Preset used when neither a preset nor a custom schedule is given.
pub const DEFAULT_SCHEDULE: &str = "two_day";

/// Pick the schedule from a preset name or a custom `mode:hours,...` list.
pub fn resolve_schedule(preset: Option<&str>, custom: Option<&str>) -> AppResult<Schedule> {
    match (preset, custom) {
        (Some(_), Some(_)) => Err(AppError::InvalidInput(
            "give either a preset schedule or a custom one, not both".to_string(),
        )),
        (_, Some(custom)) => Ok(Schedule::parse(custom)?),
        (name, None) => Ok(Schedule::preset(name.unwrap_or(DEFAULT_SCHEDULE))?),
    }
}

/// Run `schedule` on a fresh simulator.
///
/// When a step fails, the returned error carries the steps completed before it.
pub fn run_simulation(
    config: &PlantConfig,
    backend: &dyn PropertyBackend,
    schedule: &Schedule,
    options: SimulationOptions,
) -> AppResult<Simulation> {
    let mut simulator = Simulator::new(config, backend, options)?;
    let sizing = simulator.sizing();
    info!(
        hot_capacity_kwh = sizing.hot_capacity_kwh,
        cold_capacity_kwh = sizing.cold_capacity_kwh,
        tank_capacity_kg = sizing.tank_capacity_kg,
        "stores sized"
    );

    match simulator.run(schedule) {
        Ok(simulation) => Ok(simulation),
        Err(source) => {
            error!(
                completed_steps = simulator.ledger().len(),
                error = %source,
                "simulation aborted"
            );
            Err(AppError::Simulation {
                source,
                completed: simulator.ledger().to_vec(),
            })
        }
    }
}
