//! Configuration loading and command-line overrides.

use laes_project::{PlantConfig, validate_config};
use std::path::Path;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Values given on the command line that replace configuration fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Charge and discharge power [MW].
    pub power_mw: Option<f64>,
    pub storage_hours: Option<f64>,
    pub tank_tonnes: Option<f64>,
    pub price_offpeak_mwh: Option<f64>,
    pub price_onpeak_mwh: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PlantConfig) {
        if let Some(power) = self.power_mw {
            config.charge_power_mw = power;
            config.discharge_power_mw = power;
        }
        if let Some(hours) = self.storage_hours {
            config.storage_duration_hours = hours;
        }
        if let Some(tank) = self.tank_tonnes {
            config.tank_capacity_tonnes = tank;
        }
        if let Some(price) = self.price_offpeak_mwh {
            config.economics.price_offpeak_mwh = price;
        }
        if let Some(price) = self.price_onpeak_mwh {
            config.economics.price_onpeak_mwh = price;
        }
    }
}

/// Load a configuration file (or the defaults), apply overrides and validate.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> AppResult<PlantConfig> {
    let mut config = match path {
        Some(path) => laes_project::load(path).map_err(|source| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?,
        None => PlantConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config)?;
    debug!(?overrides, "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_fields() {
        let overrides = ConfigOverrides {
            power_mw: Some(50.0),
            storage_hours: Some(6.0),
            price_onpeak_mwh: Some(120.0),
            ..ConfigOverrides::default()
        };
        let config = load_config(None, &overrides).unwrap();
        assert_eq!(config.charge_power_mw, 50.0);
        assert_eq!(config.discharge_power_mw, 50.0);
        assert_eq!(config.storage_duration_hours, 6.0);
        assert_eq!(config.economics.price_onpeak_mwh, 120.0);
        assert_eq!(config.tank_capacity_tonnes, 200.0);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = ConfigOverrides {
            tank_tonnes: Some(-1.0),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            load_config(None, &overrides),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = Path::new("/nonexistent/laes_plant.yaml");
        let err = load_config(Some(path), &ConfigOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("laes_plant.yaml"));
    }
}
