//! Plant configuration schema.
//!
//! Field values are stored in the engineering units operators think in
//! (MW, bar, °C, %/day). The accessor methods convert to SI quantities for
//! the cycle models.

use crate::validate::validate_config;
use laes_core::units::constants::RHO_LIQUID_AIR;
use laes_core::units::{Power, Pressure, Temperature, bar, celsius, megawatts, pa};
use serde::{Deserialize, Serialize};

/// How the cold-return temperature feeding the main heat exchanger is found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColdReturnMode {
    /// One pass with the fixed 30 % liquid-yield estimate for mass splitting.
    #[default]
    SinglePass,
    /// Repeat the cold-box evaluation, feeding the computed main-branch
    /// liquid fraction back into the mass split until the return
    /// temperature moves less than `tolerance_k`.
    FixedPoint { max_iterations: usize, tolerance_k: f64 },
}

/// Financial assumptions used by the economics service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Off-peak electricity price paid while charging [$/MWh].
    pub price_offpeak_mwh: f64,
    /// On-peak electricity price earned while discharging [$/MWh].
    pub price_onpeak_mwh: f64,
    /// Real discount rate.
    pub discount_rate: f64,
    pub project_years: u32,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            price_offpeak_mwh: 30.0,
            price_onpeak_mwh: 80.0,
            discount_rate: 0.08,
            project_years: 25,
        }
    }
}

/// Complete LAES plant configuration. Read-only once validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlantConfig {
    // Sizing
    pub charge_power_mw: f64,
    pub discharge_power_mw: f64,
    pub storage_duration_hours: f64,

    // Tank
    pub tank_capacity_tonnes: f64,
    pub tank_min_level_pct: f64,
    pub boiloff_pct_per_day: f64,

    // Cycle
    pub charge_pressure_bar: f64,
    pub discharge_pressure_bar: f64,
    pub ambient_temperature_c: f64,
    pub ambient_pressure_pa: f64,
    pub intercool_temperature_c: f64,
    pub superheat_temperature_c: f64,
    pub compressor_stages: u32,
    pub turbine_stages: u32,
    pub bypass_fraction: f64,

    // Component efficiencies
    pub eta_compressor: f64,
    pub eta_cryo_turbine: f64,
    pub eta_turbine: f64,
    pub eta_pump: f64,
    pub hx_effectiveness: f64,

    // Thermal storage
    pub hot_storage_loss_pct_per_day: f64,
    pub hot_storage_efficiency: f64,
    pub cold_storage_loss_pct_per_day: f64,
    pub cold_storage_efficiency: f64,

    pub cold_return: ColdReturnMode,
    pub economics: EconomicsConfig,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            charge_power_mw: 10.0,
            discharge_power_mw: 10.0,
            storage_duration_hours: 4.0,
            tank_capacity_tonnes: 200.0,
            tank_min_level_pct: 10.0,
            boiloff_pct_per_day: 0.2,
            charge_pressure_bar: 50.0,
            discharge_pressure_bar: 70.0,
            ambient_temperature_c: 25.0,
            ambient_pressure_pa: 101_325.0,
            intercool_temperature_c: 35.0,
            superheat_temperature_c: 250.0,
            compressor_stages: 3,
            turbine_stages: 4,
            bypass_fraction: 0.45,
            eta_compressor: 0.85,
            eta_cryo_turbine: 0.80,
            eta_turbine: 0.85,
            eta_pump: 0.75,
            hx_effectiveness: 0.90,
            hot_storage_loss_pct_per_day: 1.0,
            hot_storage_efficiency: 0.90,
            cold_storage_loss_pct_per_day: 5.0,
            cold_storage_efficiency: 0.85,
            cold_return: ColdReturnMode::default(),
            economics: EconomicsConfig::default(),
        }
    }
}

impl PlantConfig {
    /// Checks every field against the physical bounds in [`validate_config`].
    pub fn validate(&self) -> crate::ConfigResult<()> {
        validate_config(self)
    }

    pub fn charge_power(&self) -> Power {
        megawatts(self.charge_power_mw)
    }

    pub fn discharge_power(&self) -> Power {
        megawatts(self.discharge_power_mw)
    }

    pub fn charge_pressure(&self) -> Pressure {
        bar(self.charge_pressure_bar)
    }

    pub fn discharge_pressure(&self) -> Pressure {
        bar(self.discharge_pressure_bar)
    }

    pub fn ambient_pressure(&self) -> Pressure {
        pa(self.ambient_pressure_pa)
    }

    pub fn ambient_temperature(&self) -> Temperature {
        celsius(self.ambient_temperature_c)
    }

    pub fn intercool_temperature(&self) -> Temperature {
        celsius(self.intercool_temperature_c)
    }

    pub fn superheat_temperature(&self) -> Temperature {
        celsius(self.superheat_temperature_c)
    }

    /// Nominal storage capacity [MWh].
    pub fn storage_capacity_mwh(&self) -> f64 {
        self.discharge_power_mw * self.storage_duration_hours
    }

    pub fn tank_capacity_kg(&self) -> f64 {
        self.tank_capacity_tonnes * 1000.0
    }

    pub fn tank_capacity_m3(&self) -> f64 {
        self.tank_capacity_kg() / RHO_LIQUID_AIR
    }

    pub fn tank_min_level_kg(&self) -> f64 {
        self.tank_capacity_kg() * self.tank_min_level_pct / 100.0
    }

    /// Fraction of the tank inventory boiled off per day.
    pub fn boiloff_fraction_per_day(&self) -> f64 {
        self.boiloff_pct_per_day / 100.0
    }

    pub fn hot_loss_fraction_per_day(&self) -> f64 {
        self.hot_storage_loss_pct_per_day / 100.0
    }

    pub fn cold_loss_fraction_per_day(&self) -> f64 {
        self.cold_storage_loss_pct_per_day / 100.0
    }

    /// Human-readable configuration summary for the CLI.
    pub fn summary(&self) -> String {
        format!(
            "LAES configuration\n\
             Plant:     charge {:.1} MW, discharge {:.1} MW, {:.1} h ({:.1} MWh)\n\
             Tank:      {:.0} t ({:.0} m3), floor {:.0} %, boil-off {:.2} %/day\n\
             Cycle:     {:.0} bar charge, {:.0} bar discharge, superheat {:.0} C, \
             {} compressor / {} turbine stages, bypass {:.2}\n\
             Storage:   hot {:.1} %/day, cold {:.1} %/day, cold efficiency {:.0} %\n\
             Economics: off-peak ${:.0}/MWh, on-peak ${:.0}/MWh, {:.0} % discount, {} years",
            self.charge_power_mw,
            self.discharge_power_mw,
            self.storage_duration_hours,
            self.storage_capacity_mwh(),
            self.tank_capacity_tonnes,
            self.tank_capacity_m3(),
            self.tank_min_level_pct,
            self.boiloff_pct_per_day,
            self.charge_pressure_bar,
            self.discharge_pressure_bar,
            self.superheat_temperature_c,
            self.compressor_stages,
            self.turbine_stages,
            self.bypass_fraction,
            self.hot_storage_loss_pct_per_day,
            self.cold_storage_loss_pct_per_day,
            self.cold_storage_efficiency * 100.0,
            self.economics.price_offpeak_mwh,
            self.economics.price_onpeak_mwh,
            self.economics.discount_rate * 100.0,
            self.economics.project_years,
        )
    }
}
