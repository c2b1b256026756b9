//! Per-step ledger and end-of-run summary.

use laes_project::OperatingMode;
use serde::{Deserialize, Serialize};

/// Energy and mass flows of one simulated step, with store levels at its end.
///
/// Energies are in kWh (thermal for the stores), masses in kg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sequential step number.
    pub step: usize,
    /// Schedule interval the step belongs to.
    pub interval: usize,
    pub start_hours: f64,
    pub duration_hours: f64,
    pub mode: OperatingMode,
    pub energy_in_kwh: f64,
    pub energy_out_kwh: f64,
    pub air_processed_kg: f64,
    pub liquid_produced_kg: f64,
    pub liquid_spilled_kg: f64,
    pub liquid_consumed_kg: f64,
    pub boiloff_kg: f64,
    pub hot_charged_kwh: f64,
    pub hot_delivered_kwh: f64,
    pub hot_shortfall_kwh: f64,
    pub hot_lost_kwh: f64,
    pub cold_charged_kwh: f64,
    pub cold_delivered_kwh: f64,
    pub cold_lost_kwh: f64,
    pub tank_mass_kg: f64,
    pub tank_level: f64,
    pub hot_soc_kwh: f64,
    pub cold_soc_kwh: f64,
    /// Cold offered per kg of air during a charge step (J/kg).
    pub cold_offer_j_per_kg: f64,
    /// Liquid per kg of air during a charge step.
    pub liquid_yield: f64,
    /// The J-T valve fell back to the fixed liquid fraction.
    pub jt_fallback: bool,
}

impl LedgerEntry {
    pub(crate) fn new(
        step: usize,
        interval: usize,
        start_hours: f64,
        duration_hours: f64,
        mode: OperatingMode,
    ) -> Self {
        Self {
            step,
            interval,
            start_hours,
            duration_hours,
            mode,
            energy_in_kwh: 0.0,
            energy_out_kwh: 0.0,
            air_processed_kg: 0.0,
            liquid_produced_kg: 0.0,
            liquid_spilled_kg: 0.0,
            liquid_consumed_kg: 0.0,
            boiloff_kg: 0.0,
            hot_charged_kwh: 0.0,
            hot_delivered_kwh: 0.0,
            hot_shortfall_kwh: 0.0,
            hot_lost_kwh: 0.0,
            cold_charged_kwh: 0.0,
            cold_delivered_kwh: 0.0,
            cold_lost_kwh: 0.0,
            tank_mass_kg: 0.0,
            tank_level: 0.0,
            hot_soc_kwh: 0.0,
            cold_soc_kwh: 0.0,
            cold_offer_j_per_kg: 0.0,
            liquid_yield: 0.0,
            jt_fallback: false,
        }
    }

    pub fn end_hours(&self) -> f64 {
        self.start_hours + self.duration_hours
    }

    /// Column names matching [`LedgerEntry::csv_row`].
    pub fn csv_header() -> &'static str {
        "step,interval,start_h,duration_h,mode,energy_in_kwh,energy_out_kwh,\
         air_kg,liquid_produced_kg,liquid_spilled_kg,liquid_consumed_kg,boiloff_kg,\
         hot_charged_kwh,hot_delivered_kwh,hot_shortfall_kwh,hot_lost_kwh,\
         cold_charged_kwh,cold_delivered_kwh,cold_lost_kwh,\
         tank_kg,tank_level,hot_soc_kwh,cold_soc_kwh,cold_offer_j_per_kg,liquid_yield,jt_fallback"
    }

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.step,
            self.interval,
            self.start_hours,
            self.duration_hours,
            self.mode,
            self.energy_in_kwh,
            self.energy_out_kwh,
            self.air_processed_kg,
            self.liquid_produced_kg,
            self.liquid_spilled_kg,
            self.liquid_consumed_kg,
            self.boiloff_kg,
            self.hot_charged_kwh,
            self.hot_delivered_kwh,
            self.hot_shortfall_kwh,
            self.hot_lost_kwh,
            self.cold_charged_kwh,
            self.cold_delivered_kwh,
            self.cold_lost_kwh,
            self.tank_mass_kg,
            self.tank_level,
            self.hot_soc_kwh,
            self.cold_soc_kwh,
            self.cold_offer_j_per_kg,
            self.liquid_yield,
            self.jt_fallback,
        )
    }
}

/// Aggregates over a whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub steps: usize,
    pub hours: f64,
    pub energy_in_kwh: f64,
    pub energy_out_kwh: f64,
    /// Electricity out over electricity in; `None` when nothing was charged.
    pub rte: Option<f64>,
    pub liquid_produced_kg: f64,
    pub liquid_consumed_kg: f64,
    pub liquid_spilled_kg: f64,
    pub boiloff_kg: f64,
    pub hot_shortfall_kwh: f64,
    /// Share of hot-store charge not lost to standing losses.
    pub hot_retention: Option<f64>,
    pub cold_retention: Option<f64>,
    /// Share of liquid put in the tank not lost to boil-off.
    pub tank_retention: Option<f64>,
    pub final_tank_mass_kg: f64,
    pub final_tank_level: f64,
    pub jt_fallback_steps: usize,
}

impl Summary {
    /// Summarise `ledger`; store retentions are taken from the caller since
    /// they depend on store totals, not only on ledger rows.
    pub fn from_ledger(
        ledger: &[LedgerEntry],
        hot_retention: Option<f64>,
        cold_retention: Option<f64>,
        final_tank_mass_kg: f64,
        final_tank_level: f64,
    ) -> Self {
        let sum = |f: fn(&LedgerEntry) -> f64| ledger.iter().map(f).sum::<f64>();

        let energy_in_kwh = sum(|e| e.energy_in_kwh);
        let energy_out_kwh = sum(|e| e.energy_out_kwh);
        let liquid_produced_kg = sum(|e| e.liquid_produced_kg);
        let liquid_spilled_kg = sum(|e| e.liquid_spilled_kg);
        let boiloff_kg = sum(|e| e.boiloff_kg);
        let stored = liquid_produced_kg - liquid_spilled_kg;

        Self {
            steps: ledger.len(),
            hours: sum(|e| e.duration_hours),
            energy_in_kwh,
            energy_out_kwh,
            rte: (energy_in_kwh > 0.0).then(|| energy_out_kwh / energy_in_kwh),
            liquid_produced_kg,
            liquid_consumed_kg: sum(|e| e.liquid_consumed_kg),
            liquid_spilled_kg,
            boiloff_kg,
            hot_shortfall_kwh: sum(|e| e.hot_shortfall_kwh),
            hot_retention,
            cold_retention,
            tank_retention: (stored > 0.0).then(|| 1.0 - boiloff_kg / stored),
            final_tank_mass_kg,
            final_tank_level,
            jt_fallback_steps: ledger.iter().filter(|e| e.jt_fallback).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(step: usize, mode: OperatingMode, e_in: f64, e_out: f64) -> LedgerEntry {
        let mut entry = LedgerEntry::new(step, step, step as f64, 1.0, mode);
        entry.energy_in_kwh = e_in;
        entry.energy_out_kwh = e_out;
        entry
    }

    #[test]
    fn summary_rte() {
        let ledger = vec![
            entry(0, OperatingMode::Charge, 100.0, 0.0),
            entry(1, OperatingMode::Discharge, 0.0, 40.0),
        ];
        let summary = Summary::from_ledger(&ledger, None, None, 0.0, 0.0);
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.hours, 2.0);
        assert_eq!(summary.rte, Some(0.4));
        assert_eq!(summary.tank_retention, None);
    }

    #[test]
    fn no_charge_means_no_rte() {
        let ledger = vec![entry(0, OperatingMode::Idle, 0.0, 0.0)];
        let summary = Summary::from_ledger(&ledger, None, None, 0.0, 0.0);
        assert_eq!(summary.rte, None);
    }

    #[test]
    fn csv_row_matches_header() {
        let row = entry(0, OperatingMode::Charge, 1.0, 0.0).csv_row();
        assert_eq!(
            row.split(',').count(),
            LedgerEntry::csv_header().split(',').count()
        );
        assert!(row.contains(",charge,"));
    }
}
