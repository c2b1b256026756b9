//! Shared application service layer for the LAES model.
//!
//! Centralizes what the command line needs: configuration loading with
//! overrides, the steady-state RTE service, schedule simulation, economics
//! and artifact writing.

pub mod config_service;
pub mod economics;
pub mod error;
pub mod report;
pub mod rte_service;
pub mod simulation_service;

// Re-export key types for convenience
pub use config_service::{ConfigOverrides, load_config};
pub use economics::{
    AnnualCashflow, CapexBreakdown, CostBasis, EconomicsInputs, EconomicsReport, evaluate,
    run_economics,
};
pub use error::{AppError, AppResult};
pub use report::{ArtifactFormat, ledger_csv, write_json, write_partial_ledger, write_simulation};
pub use rte_service::{RteSummary, run_rte};
pub use simulation_service::{DEFAULT_SCHEDULE, resolve_schedule, run_simulation};
