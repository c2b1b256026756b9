//! laes-core: stable foundation for the LAES plant model.
//!
//! Contains:
//! - units (uom SI types + constructors, engineering-unit conversions)
//! - numeric (finiteness and range checks, mass-weighted mean)
//! - error (check failures)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
