//! laes-cycle: combines the plant components into charge and discharge
//! performance figures.
//!
//! - Liquefaction: specific consumption SC = net work / liquid yield
//! - Discharge: specific power SP per kg of liquid
//! - Round trip: RTE = SP / SC, with and without cold-store coupling
//!
//! The engine is a pure function of the plant configuration and, for the
//! storage-coupled charge path, a read-only view of the cold store.

pub mod engine;
pub mod error;
pub mod result;

pub use engine::{CycleEngine, steady_state_cold_offer};
pub use error::{CycleError, CycleResult};
pub use result::{ChargePerformance, LiquefactionResult, RoundTripReport};
