//! laes-storage: stateful stores of the LAES plant.
//!
//! - `ThermalStore`: hot (compression heat) and cold (recovered cold) energy stores
//! - `TankStore`: liquid-air inventory with a minimum-level floor and boil-off
//!
//! Stores are the only state that persists across a simulated schedule.
//! They are mutated by explicit transfer operations and never go negative
//! or past capacity.

pub mod error;
pub mod tank;
pub mod thermal;

pub use error::{StorageError, StorageResult};
pub use tank::{FillOutcome, TankStore};
pub use thermal::{ChargeOutcome, DrawOutcome, StoreKind, ThermalStore};
