//! Cycle performance records.

use laes_components::{ColdBoxResult, CompressionResult, DischargeResult};
use laes_core::units::SpecEnergy;

/// Charge-side performance per kg of compressed air.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquefactionResult {
    pub compression: CompressionResult,
    pub cold_box: ColdBoxResult,
    /// Cold offered to the cold box [J/kg air].
    pub cold_offer: SpecEnergy,
    /// Compression work minus cryogenic turbine work [J/kg air].
    pub net_work: SpecEnergy,
    /// Liquid per kg of air.
    pub liquid_yield: f64,
    /// Net work per kg of liquid; `None` when no liquid is produced.
    pub specific_consumption: Option<SpecEnergy>,
}

impl LiquefactionResult {
    pub fn heat_rejected(&self) -> SpecEnergy {
        self.compression.heat_rejected
    }

    pub fn cold_used(&self) -> SpecEnergy {
        self.cold_box.cold_used
    }

    pub fn jt_fallback(&self) -> bool {
        self.cold_box.used_fallback()
    }
}

/// Steady-state round trip with and without cold recycling.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripReport {
    pub without_cold: LiquefactionResult,
    pub with_cold: LiquefactionResult,
    pub discharge: DischargeResult,
    /// Cold recycled per kg of air in the coupled case.
    pub cold_offer: SpecEnergy,
}

impl RoundTripReport {
    /// Net discharge work per kg of liquid.
    pub fn specific_power(&self) -> SpecEnergy {
        self.discharge.net_work
    }

    pub fn rte_without_cold(&self) -> Option<f64> {
        rte(self.specific_power(), self.without_cold.specific_consumption)
    }

    pub fn rte_with_cold(&self) -> Option<f64> {
        rte(self.specific_power(), self.with_cold.specific_consumption)
    }

    /// Relative RTE gain from cold recycling [%].
    pub fn improvement_pct(&self) -> Option<f64> {
        match (self.rte_without_cold(), self.rte_with_cold()) {
            (Some(without), Some(with)) if without > 0.0 => Some((with / without - 1.0) * 100.0),
            _ => None,
        }
    }
}

fn rte(specific_power: SpecEnergy, specific_consumption: Option<SpecEnergy>) -> Option<f64> {
    specific_consumption
        .filter(|sc| *sc > 0.0)
        .map(|sc| specific_power / sc)
}

/// Charge-interval performance with the cold store as currently charged.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargePerformance {
    pub without_cold: LiquefactionResult,
    pub with_cold: LiquefactionResult,
    /// Air the interval would process without cold, used to size the offer.
    pub air_estimate_kg: f64,
    pub cold_offer: SpecEnergy,
    /// Air processed with the cold offer applied.
    pub air_kg: f64,
    /// Cold removed from the store over the interval [J].
    pub cold_draw: f64,
}
