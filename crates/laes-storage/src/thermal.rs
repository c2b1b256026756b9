//! Sensible thermal energy store with daily losses.

use crate::error::{StorageError, StorageResult, check_amount, check_hours};
use laes_core::units::constants::HOURS_PER_DAY;
use serde::{Deserialize, Serialize};

/// Which side of the cycle a thermal store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Compression heat, used for superheat and reheat on discharge.
    Hot,
    /// Cold recovered on discharge, used to pre-cool the liquefier.
    Cold,
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::Hot => "hot_store",
            StoreKind::Cold => "cold_store",
        }
    }
}

/// Energy accepted by a charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeOutcome {
    pub stored: f64,
    /// Offered energy that did not fit.
    pub overflow: f64,
}

/// Energy released by a draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOutcome {
    /// Energy handed to the process (after the store efficiency).
    pub delivered: f64,
    /// Energy removed from the state of charge.
    pub drawn: f64,
    /// Requested energy that could not be delivered.
    pub shortfall: f64,
}

/// Thermal store with state of charge `0 ≤ soc ≤ capacity` [J].
///
/// Charging stores energy 1:1. The round-trip efficiency is applied once,
/// when energy is drawn: delivering `E` removes `E / η` from the charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalStore {
    kind: StoreKind,
    capacity: f64,
    soc: f64,
    efficiency: f64,
    daily_loss_fraction: f64,
    total_charged: f64,
    total_delivered: f64,
    total_lost: f64,
    total_overflow: f64,
}

impl ThermalStore {
    pub fn new(
        kind: StoreKind,
        capacity: f64,
        efficiency: f64,
        daily_loss_fraction: f64,
    ) -> StorageResult<Self> {
        let store = kind.name();
        let capacity = check_amount(capacity, store)?;
        if !efficiency.is_finite() || efficiency <= 0.0 || efficiency > 1.0 {
            return Err(StorageError::InvalidArg {
                store,
                what: "efficiency must be in (0, 1]",
            });
        }
        if !daily_loss_fraction.is_finite() || !(0.0..=1.0).contains(&daily_loss_fraction) {
            return Err(StorageError::InvalidArg {
                store,
                what: "daily loss fraction must be in [0, 1]",
            });
        }
        Ok(Self {
            kind,
            capacity,
            soc: 0.0,
            efficiency,
            daily_loss_fraction,
            total_charged: 0.0,
            total_delivered: 0.0,
            total_lost: 0.0,
            total_overflow: 0.0,
        })
    }

    /// Start with `fraction` of capacity already stored.
    pub fn with_initial_fraction(mut self, fraction: f64) -> StorageResult<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(StorageError::InvalidArg {
                store: self.kind.name(),
                what: "initial fraction must be in [0, 1]",
            });
        }
        self.soc = self.capacity * fraction;
        Ok(self)
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn soc(&self) -> f64 {
        self.soc
    }

    pub fn soc_fraction(&self) -> f64 {
        if self.capacity > 0.0 {
            self.soc / self.capacity
        } else {
            0.0
        }
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Energy that could be delivered right now.
    pub fn available(&self) -> f64 {
        self.soc * self.efficiency
    }

    /// Store up to `offered` J; whatever exceeds the free room overflows.
    pub fn charge(&mut self, offered: f64) -> StorageResult<ChargeOutcome> {
        let offered = check_amount(offered, self.kind.name())?;
        let room = self.capacity - self.soc;
        let stored = offered.min(room);
        self.soc += stored;
        let overflow = offered - stored;
        self.total_charged += stored;
        self.total_overflow += overflow;
        Ok(ChargeOutcome { stored, overflow })
    }

    /// Deliver up to `requested` J, reporting any shortfall.
    pub fn draw(&mut self, requested: f64) -> StorageResult<DrawOutcome> {
        let requested = check_amount(requested, self.kind.name())?;
        let drawn = (requested / self.efficiency).min(self.soc);
        let delivered = if drawn >= self.soc {
            self.soc * self.efficiency
        } else {
            requested
        };
        self.soc -= drawn;
        self.total_delivered += delivered;
        Ok(DrawOutcome {
            delivered,
            drawn,
            shortfall: (requested - delivered).max(0.0),
        })
    }

    /// Deliver exactly `requested` J or fail without changing the store.
    pub fn draw_exact(&mut self, requested: f64) -> StorageResult<DrawOutcome> {
        let requested = check_amount(requested, self.kind.name())?;
        let needed = requested / self.efficiency;
        // Offers are computed from `available()`, so allow for rounding.
        let slack = 1e-9 * self.capacity.max(1.0);
        if needed > self.soc + slack {
            return Err(StorageError::Infeasible {
                store: self.kind.name(),
                what: "draw exceeds stored energy",
                requested,
                available: self.available(),
            });
        }
        let drawn = needed.min(self.soc);
        self.soc -= drawn;
        self.total_delivered += requested;
        Ok(DrawOutcome {
            delivered: requested,
            drawn,
            shortfall: 0.0,
        })
    }

    /// Apply standing losses for `hours` of elapsed time; returns energy lost.
    pub fn decay(&mut self, hours: f64) -> StorageResult<f64> {
        let hours = check_hours(hours, self.kind.name())?;
        let lost = (self.soc * self.daily_loss_fraction * hours / HOURS_PER_DAY).min(self.soc);
        self.soc = (self.soc - lost).max(0.0);
        self.total_lost += lost;
        Ok(lost)
    }

    pub fn total_charged(&self) -> f64 {
        self.total_charged
    }

    pub fn total_delivered(&self) -> f64 {
        self.total_delivered
    }

    pub fn total_lost(&self) -> f64 {
        self.total_lost
    }

    pub fn total_overflow(&self) -> f64 {
        self.total_overflow
    }

    /// Share of charged energy not lost to standing losses, or `None`
    /// before anything was charged.
    pub fn retention(&self) -> Option<f64> {
        (self.total_charged > 0.0).then(|| 1.0 - self.total_lost / self.total_charged)
    }
}
