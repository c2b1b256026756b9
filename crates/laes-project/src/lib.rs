//! laes-project: plant configuration file format, validation and schedules.

pub mod config;
pub mod schedule;
pub mod validate;

pub use config::{ColdReturnMode, EconomicsConfig, PlantConfig};
pub use schedule::{Interval, OperatingMode, Schedule, preset_names};
pub use validate::validate_config;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown schedule '{name}' (available: {available})")]
    UnknownSchedule { name: String, available: String },

    #[error("Invalid schedule: {what}")]
    InvalidSchedule { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<laes_core::CoreError> for ConfigError {
    fn from(err: laes_core::CoreError) -> Self {
        use laes_core::CoreError;
        let reason = match &err {
            CoreError::NonFinite { .. } => "must be finite".to_string(),
            CoreError::NotPositive { .. } => "must be positive".to_string(),
            CoreError::OutOfRange { min, max, .. } => format!("must lie in [{min}, {max}]"),
        };
        ConfigError::InvalidValue {
            field: err.what().to_string(),
            value: err.value().to_string(),
            reason,
        }
    }
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<PlantConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PlantConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &PlantConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ConfigResult<PlantConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PlantConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &std::path::Path, config: &PlantConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a configuration, choosing the format from the file extension
/// (`.json`, otherwise YAML).
pub fn load(path: &std::path::Path) -> ConfigResult<PlantConfig> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
