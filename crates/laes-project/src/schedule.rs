//! Operating schedules: ordered (mode, duration) intervals.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plant operating mode for one schedule interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Charge,
    Discharge,
    Idle,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Charge => "charge",
            OperatingMode::Discharge => "discharge",
            OperatingMode::Idle => "idle",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "charge" => Ok(OperatingMode::Charge),
            "discharge" => Ok(OperatingMode::Discharge),
            "idle" => Ok(OperatingMode::Idle),
            other => Err(ConfigError::InvalidSchedule {
                what: format!("unknown mode '{other}' (expected charge, discharge or idle)"),
            }),
        }
    }
}

/// One scheduled interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub mode: OperatingMode,
    pub hours: f64,
}

impl Interval {
    pub fn new(mode: OperatingMode, hours: f64) -> Self {
        Self { mode, hours }
    }
}

/// Ordered list of intervals run by the simulator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    intervals: Vec<Interval>,
}

const PRESETS: [&str; 3] = ["default", "two_day", "peak_shaving"];

/// Names accepted by [`Schedule::preset`].
pub fn preset_names() -> &'static [&'static str] {
    &PRESETS
}

impl Schedule {
    /// Build a schedule, rejecting non-positive or non-finite durations.
    pub fn new(intervals: Vec<Interval>) -> ConfigResult<Self> {
        for (index, interval) in intervals.iter().enumerate() {
            if !interval.hours.is_finite() || interval.hours <= 0.0 {
                return Err(ConfigError::InvalidSchedule {
                    what: format!(
                        "interval {index} ({}) has duration {} h; must be positive",
                        interval.mode, interval.hours
                    ),
                });
            }
        }
        Ok(Self { intervals })
    }

    pub fn from_pairs(pairs: &[(OperatingMode, f64)]) -> ConfigResult<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(mode, hours)| Interval::new(mode, hours))
                .collect(),
        )
    }

    /// Named preset schedule.
    pub fn preset(name: &str) -> ConfigResult<Self> {
        use OperatingMode::*;
        let pairs: &[(OperatingMode, f64)] = match name {
            // One day: overnight charge, morning and evening peaks.
            "default" => &[
                (Charge, 8.0),
                (Idle, 4.0),
                (Discharge, 4.0),
                (Idle, 4.0),
                (Discharge, 2.0),
                (Idle, 2.0),
            ],
            "two_day" => &[
                (Discharge, 4.0),
                (Idle, 4.0),
                (Charge, 8.0),
                (Idle, 8.0),
                (Discharge, 4.0),
                (Idle, 4.0),
                (Charge, 8.0),
                (Idle, 8.0),
            ],
            "peak_shaving" => &[
                (Charge, 8.0),
                (Idle, 4.0),
                (Discharge, 2.0),
                (Idle, 2.0),
                (Discharge, 2.0),
                (Idle, 2.0),
                (Discharge, 2.0),
                (Idle, 2.0),
            ],
            other => {
                return Err(ConfigError::UnknownSchedule {
                    name: other.to_string(),
                    available: PRESETS.join(", "),
                });
            }
        };
        Self::from_pairs(pairs)
    }

    /// Parse `"charge:8,idle:4,discharge:6"`.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut intervals = Vec::new();
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (mode, hours) = item.split_once(':').ok_or_else(|| ConfigError::InvalidSchedule {
                what: format!("'{item}' is not of the form mode:hours"),
            })?;
            let mode: OperatingMode = mode.parse()?;
            let hours: f64 = hours
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidSchedule {
                    what: format!("'{}' is not a number of hours", hours.trim()),
                })?;
            intervals.push(Interval::new(mode, hours));
        }
        if intervals.is_empty() {
            return Err(ConfigError::InvalidSchedule {
                what: "schedule is empty".to_string(),
            });
        }
        Self::new(intervals)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.intervals.iter().map(|i| i.hours).sum()
    }

    pub fn hours_in(&self, mode: OperatingMode) -> f64 {
        self.intervals
            .iter()
            .filter(|i| i.mode == mode)
            .map(|i| i.hours)
            .sum()
    }
}

impl FromStr for Schedule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schedule::parse(s)
    }
}
