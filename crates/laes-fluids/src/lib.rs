//! laes-fluids: working-fluid property evaluation for the LAES plant model.
//!
//! Provides:
//! - Thermodynamic state representation (`FluidState`, `StateInput`)
//! - `PropertyBackend` capability trait for real-gas property queries
//! - CoolProp backend for real fluid properties (air by default)
//! - `RecordingBackend` wrapper that counts queries per input pair
//!
//! # Architecture
//!
//! The cycle models only ever talk to `PropertyBackend`, a narrow set of
//! two-property queries. CoolProp (via `rfluids`) is the production backend;
//! any other equation of state, or a test double, can be swapped in without
//! touching cycle logic.
//!
//! # Example
//!
//! ```no_run
//! use laes_fluids::{CoolPropBackend, PropertyBackend};
//! use laes_core::units::{pa, k};
//!
//! let backend = CoolPropBackend::air();
//! let state = backend.state_pt(pa(101_325.0), k(300.0)).unwrap();
//! println!("h = {} J/kg, rho = {} kg/m³", state.enthalpy(), state.density().value);
//! ```

pub mod backend;
pub mod coolprop;
pub mod error;
pub mod recording;
pub mod state;

// Re-exports for ergonomics
pub use backend::PropertyBackend;
pub use coolprop::CoolPropBackend;
pub use error::{FluidError, FluidResult};
pub use recording::{QueryCounts, RecordingBackend};
pub use state::{FluidState, InputPair, SpecEnthalpy, SpecEntropy, StateInput};
