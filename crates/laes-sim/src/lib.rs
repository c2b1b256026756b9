//! Storage-coupled operating simulation for a LAES plant.
//!
//! Provides:
//! - Interval-by-interval stepping of a charge/discharge/idle schedule
//! - Tank inventory and hot/cold store bookkeeping
//! - Chronological ledger and end-of-run summary

pub mod error;
pub mod ledger;
pub mod options;
pub mod simulator;

pub use error::{SimError, SimResult};
pub use ledger::{LedgerEntry, Summary};
pub use options::SimulationOptions;
pub use simulator::{Simulation, Simulator, StoreSizing};
