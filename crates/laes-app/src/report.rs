//! Artifact writing: simulation ledgers and reports as JSON or CSV.

use laes_sim::{LedgerEntry, Simulation};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Output format, chosen from the artifact path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Csv,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("csv") => Ok(ArtifactFormat::Csv),
            _ => Err(AppError::InvalidInput(format!(
                "unsupported artifact extension for {} (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

/// Ledger as CSV, one row per step.
pub fn ledger_csv(ledger: &[LedgerEntry]) -> String {
    let mut csv = String::from(LedgerEntry::csv_header());
    csv.push('\n');
    for entry in ledger {
        csv.push_str(&entry.csv_row());
        csv.push('\n');
    }
    csv
}

/// Write any serializable report as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let content = serde_json::to_string_pretty(value)?;
    write(path, &content)
}

/// Write a simulation run: the full run as JSON, or the ledger as CSV.
pub fn write_simulation(path: &Path, simulation: &Simulation) -> AppResult<()> {
    match ArtifactFormat::from_path(path)? {
        ArtifactFormat::Json => write_json(path, simulation)?,
        ArtifactFormat::Csv => write(path, &ledger_csv(&simulation.ledger))?,
    }
    info!(path = %path.display(), steps = simulation.ledger.len(), "simulation written");
    Ok(())
}

/// Write the steps of an aborted run.
pub fn write_partial_ledger(path: &Path, ledger: &[LedgerEntry]) -> AppResult<()> {
    match ArtifactFormat::from_path(path)? {
        ArtifactFormat::Json => write_json(path, &ledger),
        ArtifactFormat::Csv => write(path, &ledger_csv(ledger)),
    }
}

fn write(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|source| AppError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("run.json")).unwrap(),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("out/RUN.CSV")).unwrap(),
            ArtifactFormat::Csv
        );
        assert!(ArtifactFormat::from_path(Path::new("plot.png")).is_err());
        assert!(ArtifactFormat::from_path(Path::new("ledger")).is_err());
    }

    #[test]
    fn empty_ledger_csv_is_header_only() {
        let csv = ledger_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("step,interval"));
    }
}
