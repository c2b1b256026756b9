//! End-to-end service runs with artifacts written to the temp directory.

use laes_app::{
    ConfigOverrides, RteSummary, load_config, resolve_schedule, run_economics, run_rte,
    run_simulation, write_json, write_simulation,
};
use laes_fluids::CoolPropBackend;
use laes_sim::SimulationOptions;

#[test]
fn rte_report_round_trips_through_json() {
    let backend = CoolPropBackend::air();
    let config = load_config(None, &ConfigOverrides::default()).unwrap();
    let summary = RteSummary::from(&run_rte(&config, &backend).unwrap());

    let path = std::env::temp_dir().join("laes_app_rte.json");
    write_json(&path, &summary).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(back["rte_with_cold"].as_f64().is_some());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn simulation_artifacts_in_both_formats() {
    let backend = CoolPropBackend::air();
    let overrides = ConfigOverrides {
        tank_tonnes: Some(2000.0),
        ..ConfigOverrides::default()
    };
    let config = load_config(None, &overrides).unwrap();
    let schedule = resolve_schedule(Some("default"), None).unwrap();
    let run = run_simulation(&config, &backend, &schedule, SimulationOptions::default()).unwrap();
    assert_eq!(run.ledger.len(), schedule.len());

    let dir = std::env::temp_dir();
    let csv_path = dir.join("laes_app_ledger.csv");
    write_simulation(&csv_path, &run).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), schedule.len() + 1);

    let json_path = dir.join("laes_app_run.json");
    write_simulation(&json_path, &run).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["ledger"].as_array().map(Vec::len), Some(schedule.len()));
    assert!(json["summary"]["energy_in_kwh"].as_f64().unwrap() > 0.0);

    let _ = std::fs::remove_file(&csv_path);
    let _ = std::fs::remove_file(&json_path);
}

#[test]
fn economics_for_default_plant() {
    let backend = CoolPropBackend::air();
    let config = load_config(None, &ConfigOverrides::default()).unwrap();
    let report = run_economics(&config, &backend).unwrap();

    assert!(report.capex.total > report.capex.equipment);
    assert!(report.inputs.rte > 0.0 && report.inputs.rte < 1.0);
    assert!(report.lcos_per_mwh.unwrap() > 0.0);
}

#[test]
fn config_file_is_loaded_before_overrides() {
    let path = std::env::temp_dir().join("laes_app_config.yaml");
    std::fs::write(&path, "charge_power_mw: 25.0\ndischarge_power_mw: 20.0\n").unwrap();

    let overrides = ConfigOverrides {
        storage_hours: Some(8.0),
        ..ConfigOverrides::default()
    };
    let config = load_config(Some(&path), &overrides).unwrap();
    assert_eq!(config.charge_power_mw, 25.0);
    assert_eq!(config.discharge_power_mw, 20.0);
    assert_eq!(config.storage_duration_hours, 8.0);
    let _ = std::fs::remove_file(&path);
}
