//! Steady-state round-trip efficiency service.

use laes_cycle::{CycleEngine, LiquefactionResult, RoundTripReport};
use laes_fluids::PropertyBackend;
use laes_project::PlantConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppResult;

/// Charge-side figures per kg of air, or per kg of liquid where noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquefactionSummary {
    pub cold_offer_kj_per_kg: f64,
    pub compression_work_kj_per_kg: f64,
    pub turbine_work_kj_per_kg: f64,
    pub net_work_kj_per_kg: f64,
    pub liquid_yield: f64,
    /// Per kg of liquid.
    pub specific_consumption_kj_per_kg: Option<f64>,
    pub heat_rejected_kj_per_kg: f64,
    /// `None` when no mass returns to HX1.
    pub cold_return_k: Option<f64>,
    pub jt_fallback: bool,
}

impl From<&LiquefactionResult> for LiquefactionSummary {
    fn from(result: &LiquefactionResult) -> Self {
        Self {
            cold_offer_kj_per_kg: result.cold_offer / 1e3,
            compression_work_kj_per_kg: result.compression.work / 1e3,
            turbine_work_kj_per_kg: result.cold_box.turbine_work / 1e3,
            net_work_kj_per_kg: result.net_work / 1e3,
            liquid_yield: result.liquid_yield,
            specific_consumption_kj_per_kg: result.specific_consumption.map(|sc| sc / 1e3),
            heat_rejected_kj_per_kg: result.heat_rejected() / 1e3,
            cold_return_k: result.cold_box.cold_return.temperature.map(|t| t.value),
            jt_fallback: result.jt_fallback(),
        }
    }
}

/// Round-trip figures as reported by the `rte` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RteSummary {
    pub without_cold: LiquefactionSummary,
    pub with_cold: LiquefactionSummary,
    /// Net discharge work per kg of liquid.
    pub specific_power_kj_per_kg: f64,
    pub pump_work_kj_per_kg: f64,
    pub heat_demand_kj_per_kg: f64,
    pub cold_recoverable_kj_per_kg: f64,
    pub rte_without_cold: Option<f64>,
    pub rte_with_cold: Option<f64>,
    pub improvement_pct: Option<f64>,
}

impl From<&RoundTripReport> for RteSummary {
    fn from(report: &RoundTripReport) -> Self {
        Self {
            without_cold: (&report.without_cold).into(),
            with_cold: (&report.with_cold).into(),
            specific_power_kj_per_kg: report.specific_power() / 1e3,
            pump_work_kj_per_kg: report.discharge.pump_work / 1e3,
            heat_demand_kj_per_kg: report.discharge.heat_demand() / 1e3,
            cold_recoverable_kj_per_kg: report.discharge.cold_recoverable / 1e3,
            rte_without_cold: report.rte_without_cold(),
            rte_with_cold: report.rte_with_cold(),
            improvement_pct: report.improvement_pct(),
        }
    }
}

impl RteSummary {
    /// Plain-text report for the terminal.
    pub fn render(&self) -> String {
        let pct = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{:.1} %", v * 100.0));
        let sc = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{v:.1} kJ/kg"));
        let kelvin = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{v:.1}"));
        format!(
            "Liquefaction              without cold   with cold\n\
             Cold offer [kJ/kg air]    {:>12.1}   {:>9.1}\n\
             Net work [kJ/kg air]      {:>12.1}   {:>9.1}\n\
             Liquid yield              {:>12.3}   {:>9.3}\n\
             Cold return [K]           {:>12}   {:>9}\n\
             Specific consumption      {:>12}   {:>9}\n\
             \n\
             Discharge\n\
             Specific power            {:.1} kJ/kg\n\
             Pump work                 {:.1} kJ/kg\n\
             Heat demand               {:.1} kJ/kg\n\
             Cold recoverable          {:.1} kJ/kg\n\
             \n\
             RTE without cold          {}\n\
             RTE with cold             {}",
            self.without_cold.cold_offer_kj_per_kg,
            self.with_cold.cold_offer_kj_per_kg,
            self.without_cold.net_work_kj_per_kg,
            self.with_cold.net_work_kj_per_kg,
            self.without_cold.liquid_yield,
            self.with_cold.liquid_yield,
            kelvin(self.without_cold.cold_return_k),
            kelvin(self.with_cold.cold_return_k),
            sc(self.without_cold.specific_consumption_kj_per_kg),
            sc(self.with_cold.specific_consumption_kj_per_kg),
            self.specific_power_kj_per_kg,
            self.pump_work_kj_per_kg,
            self.heat_demand_kj_per_kg,
            self.cold_recoverable_kj_per_kg,
            pct(self.rte_without_cold),
            pct(self.rte_with_cold),
        )
    }
}

/// Evaluate the steady-state round trip for `config`.
pub fn run_rte(config: &PlantConfig, backend: &dyn PropertyBackend) -> AppResult<RoundTripReport> {
    let engine = CycleEngine::new(config, backend)?;
    let report = engine.round_trip()?;

    if report.with_cold.jt_fallback() || report.without_cold.jt_fallback() {
        warn!("J-T valve outlet used the fixed liquid-fraction fallback");
    }
    info!(
        rte_without_cold = ?report.rte_without_cold(),
        rte_with_cold = ?report.rte_with_cold(),
        "round trip evaluated"
    );
    Ok(report)
}
