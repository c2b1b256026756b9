//! laes-components: plant component models for the LAES cycle.
//!
//! Provides:
//! - Single-stage compression/expansion with isentropic efficiency
//! - Effectiveness heat exchanger, J-T valve, adiabatic stream mixing
//! - `CompressionTrain`: intercooled multi-stage compression
//! - `ColdBox`: Claude-cycle liquefaction with derived cold-return temperature
//! - `DischargeTrain`: pump, superheat and multi-stage expansion with reheat
//!
//! Every model is a deterministic function of its parameters and the
//! `PropertyBackend` answers; nothing is cached between calls.
//!
//! # Example
//!
//! ```no_run
//! use laes_components::{ColdBox, CompressionTrain};
//! use laes_core::units::{bar, celsius, pa};
//! use laes_fluids::{CoolPropBackend, PropertyBackend};
//!
//! let backend = CoolPropBackend::air();
//! let ambient = backend.state_pt(pa(101_325.0), celsius(25.0)).unwrap();
//!
//! let train = CompressionTrain::new(3, 0.85, celsius(35.0)).unwrap();
//! let compressed = train.evaluate(&backend, &ambient, bar(50.0)).unwrap();
//!
//! let cold_box = ColdBox::new(pa(101_325.0), 0.45, 0.80, 0.90).unwrap();
//! let result = cold_box.evaluate(&backend, &compressed.outlet, 0.0).unwrap();
//! println!("liquid yield: {:.3}", result.liquid_yield);
//! ```

pub mod cold_box;
pub mod common;
pub mod compression;
pub mod discharge;
pub mod error;
pub mod exchanger;
pub mod stream;
pub mod turbomachinery;
pub mod valve;

// Re-exports
pub use cold_box::{
    BypassBranch, ColdBox, ColdBoxResult, ColdReturn, ColdReturnStrategy,
    FIRST_PASS_LIQUID_ESTIMATE,
};
pub use compression::{CompressionResult, CompressionTrain};
pub use discharge::{DischargeResult, DischargeTrain};
pub use error::{ComponentError, ComponentResult, InComponent};
pub use exchanger::EffectivenessExchanger;
pub use stream::StreamFraction;
pub use turbomachinery::StageRecord;
pub use valve::{FALLBACK_LIQUID_FRACTION, JtOutcome, Throttle};
