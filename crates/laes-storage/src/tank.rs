//! Liquid-air tank.

use crate::error::{StorageError, StorageResult, check_amount, check_hours};
use laes_core::units::constants::HOURS_PER_DAY;
use tracing::warn;

const STORE: &str = "tank";

/// Result of a fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOutcome {
    pub stored: f64,
    /// Liquid that did not fit and was spilled.
    pub spilled: f64,
}

/// Unpressurised liquid-air tank [kg].
///
/// The inventory always satisfies `0 ≤ mass ≤ capacity`. The minimum level
/// protects the cryogenic pump: draws that would take the inventory below
/// it are refused. Boil-off may still take the inventory below the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct TankStore {
    capacity: f64,
    min_level: f64,
    mass: f64,
    daily_boiloff_fraction: f64,
    total_filled: f64,
    total_spilled: f64,
    total_drawn: f64,
    total_boiloff: f64,
}

impl TankStore {
    pub fn new(
        capacity: f64,
        min_level: f64,
        initial_mass: f64,
        daily_boiloff_fraction: f64,
    ) -> StorageResult<Self> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(StorageError::InvalidArg {
                store: STORE,
                what: "capacity must be positive",
            });
        }
        if !min_level.is_finite() || min_level < 0.0 || min_level >= capacity {
            return Err(StorageError::InvalidArg {
                store: STORE,
                what: "minimum level must be in [0, capacity)",
            });
        }
        if !initial_mass.is_finite() || initial_mass < 0.0 || initial_mass > capacity {
            return Err(StorageError::InvalidArg {
                store: STORE,
                what: "initial mass must be in [0, capacity]",
            });
        }
        if !daily_boiloff_fraction.is_finite() || !(0.0..=1.0).contains(&daily_boiloff_fraction) {
            return Err(StorageError::InvalidArg {
                store: STORE,
                what: "daily boil-off fraction must be in [0, 1]",
            });
        }
        Ok(Self {
            capacity,
            min_level,
            mass: initial_mass,
            daily_boiloff_fraction,
            total_filled: 0.0,
            total_spilled: 0.0,
            total_drawn: 0.0,
            total_boiloff: 0.0,
        })
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn min_level(&self) -> f64 {
        self.min_level
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn level_fraction(&self) -> f64 {
        self.mass / self.capacity
    }

    /// Liquid that can be drawn before reaching the minimum level.
    pub fn available(&self) -> f64 {
        (self.mass - self.min_level).max(0.0)
    }

    pub fn room(&self) -> f64 {
        self.capacity - self.mass
    }

    /// Add liquid; anything past capacity is spilled and reported.
    pub fn fill(&mut self, kg: f64) -> StorageResult<FillOutcome> {
        let kg = check_amount(kg, STORE)?;
        let stored = kg.min(self.room());
        let spilled = kg - stored;
        self.mass += stored;
        self.total_filled += stored;
        self.total_spilled += spilled;
        if spilled > 0.0 {
            warn!(spilled_kg = spilled, capacity_kg = self.capacity, "tank full, liquid spilled");
        }
        Ok(FillOutcome { stored, spilled })
    }

    /// Remove `kg` and return the mass drawn, or fail without touching the
    /// inventory when that would go below the minimum level. A request that
    /// overshoots the available liquid by no more than the rounding slack is
    /// clipped to it, so a draw never leaves the tank under the floor.
    pub fn draw(&mut self, kg: f64) -> StorageResult<f64> {
        let kg = check_amount(kg, STORE)?;
        let slack = 1e-9 * self.capacity;
        if kg > self.available() + slack {
            return Err(StorageError::Infeasible {
                store: STORE,
                what: "draw would take the tank below its minimum level",
                requested: kg,
                available: self.available(),
            });
        }
        let drawn = kg.min(self.available());
        self.mass = (self.mass - drawn).max(self.min_level.min(self.mass));
        self.total_drawn += drawn;
        Ok(drawn)
    }

    /// Evaporative loss over `hours`; returns the mass boiled off.
    pub fn boil_off(&mut self, hours: f64) -> StorageResult<f64> {
        let hours = check_hours(hours, STORE)?;
        let lost = (self.mass * self.daily_boiloff_fraction * hours / HOURS_PER_DAY).min(self.mass);
        self.mass -= lost;
        self.total_boiloff += lost;
        Ok(lost)
    }

    pub fn total_filled(&self) -> f64 {
        self.total_filled
    }

    pub fn total_spilled(&self) -> f64 {
        self.total_spilled
    }

    pub fn total_drawn(&self) -> f64 {
        self.total_drawn
    }

    pub fn total_boiloff(&self) -> f64 {
        self.total_boiloff
    }
}
