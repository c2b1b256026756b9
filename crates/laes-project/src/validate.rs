//! Plant configuration validation.

use crate::config::{ColdReturnMode, PlantConfig};
use crate::{ConfigError, ConfigResult};
use laes_core::numeric::{ensure_finite, ensure_in_range, ensure_positive};
use laes_core::units::constants::T_COLD_FLOOR_K;

pub fn validate_config(config: &PlantConfig) -> ConfigResult<()> {
    validate_positive_finite("charge_power_mw", config.charge_power_mw)?;
    validate_positive_finite("discharge_power_mw", config.discharge_power_mw)?;
    validate_positive_finite("storage_duration_hours", config.storage_duration_hours)?;
    validate_positive_finite("tank_capacity_tonnes", config.tank_capacity_tonnes)?;

    ensure_finite(config.tank_min_level_pct, "tank_min_level_pct")?;
    if !(0.0..100.0).contains(&config.tank_min_level_pct) {
        return Err(invalid(
            "tank_min_level_pct",
            config.tank_min_level_pct,
            "must lie in [0, 100)",
        ));
    }

    validate_loss_rate("boiloff_pct_per_day", config.boiloff_pct_per_day)?;
    validate_loss_rate(
        "hot_storage_loss_pct_per_day",
        config.hot_storage_loss_pct_per_day,
    )?;
    validate_loss_rate(
        "cold_storage_loss_pct_per_day",
        config.cold_storage_loss_pct_per_day,
    )?;

    validate_positive_finite("ambient_pressure_pa", config.ambient_pressure_pa)?;
    let p_amb = config.ambient_pressure().value;
    for (field, value) in [
        ("charge_pressure_bar", config.charge_pressure_bar),
        ("discharge_pressure_bar", config.discharge_pressure_bar),
    ] {
        validate_positive_finite(field, value)?;
        if laes_core::units::bar(value).value <= p_amb {
            return Err(invalid(field, value, "must exceed ambient pressure"));
        }
    }

    validate_finite("ambient_temperature_c", config.ambient_temperature_c)?;
    validate_finite("intercool_temperature_c", config.intercool_temperature_c)?;
    validate_finite("superheat_temperature_c", config.superheat_temperature_c)?;
    if config.ambient_temperature().value <= 0.0 {
        return Err(invalid(
            "ambient_temperature_c",
            config.ambient_temperature_c,
            "must be above absolute zero",
        ));
    }
    if config.intercool_temperature().value <= T_COLD_FLOOR_K {
        return Err(invalid(
            "intercool_temperature_c",
            config.intercool_temperature_c,
            "must be above the 105 K cold-box floor",
        ));
    }
    if config.superheat_temperature_c <= config.intercool_temperature_c {
        return Err(invalid(
            "superheat_temperature_c",
            config.superheat_temperature_c,
            "must exceed the intercooler outlet temperature",
        ));
    }

    if config.compressor_stages < 1 {
        return Err(invalid(
            "compressor_stages",
            config.compressor_stages as f64,
            "must be at least 1",
        ));
    }
    if config.turbine_stages < 1 {
        return Err(invalid(
            "turbine_stages",
            config.turbine_stages as f64,
            "must be at least 1",
        ));
    }

    ensure_in_range(config.bypass_fraction, 0.0, 1.0, "bypass_fraction")?;

    for (field, value) in [
        ("eta_compressor", config.eta_compressor),
        ("eta_cryo_turbine", config.eta_cryo_turbine),
        ("eta_turbine", config.eta_turbine),
        ("eta_pump", config.eta_pump),
        ("hx_effectiveness", config.hx_effectiveness),
        ("hot_storage_efficiency", config.hot_storage_efficiency),
        ("cold_storage_efficiency", config.cold_storage_efficiency),
    ] {
        validate_fraction(field, value)?;
    }

    if let ColdReturnMode::FixedPoint {
        max_iterations,
        tolerance_k,
    } = config.cold_return
    {
        if max_iterations == 0 {
            return Err(invalid(
                "cold_return.max_iterations",
                0.0,
                "must be at least 1",
            ));
        }
        validate_positive_finite("cold_return.tolerance_k", tolerance_k)?;
    }

    let economics = &config.economics;
    validate_non_negative_finite("economics.price_offpeak_mwh", economics.price_offpeak_mwh)?;
    validate_non_negative_finite("economics.price_onpeak_mwh", economics.price_onpeak_mwh)?;
    validate_non_negative_finite("economics.discount_rate", economics.discount_rate)?;
    if economics.project_years == 0 {
        return Err(invalid(
            "economics.project_years",
            0.0,
            "must be at least 1",
        ));
    }

    Ok(())
}

fn invalid(field: &str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_finite(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_finite(value, field)?;
    Ok(())
}

fn validate_positive_finite(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_positive(value, field)?;
    Ok(())
}

fn validate_non_negative_finite(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_in_range(value, 0.0, f64::MAX, field)?;
    Ok(())
}

/// Efficiencies and effectiveness: (0, 1].
fn validate_fraction(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_positive(value, field)?;
    ensure_in_range(value, 0.0, 1.0, field)?;
    Ok(())
}

/// Daily loss rates in percent: [0, 100].
fn validate_loss_rate(field: &'static str, value: f64) -> ConfigResult<()> {
    ensure_in_range(value, 0.0, 100.0, field)?;
    Ok(())
}
