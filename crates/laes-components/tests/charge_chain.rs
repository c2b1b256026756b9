//! Compression train feeding the cold box, against real air properties.

use laes_components::{ColdBox, CompressionTrain, DischargeTrain, JtOutcome};
use laes_core::units::{bar, celsius, pa};
use laes_fluids::{CoolPropBackend, PropertyBackend};

const P_AMB: f64 = 101_325.0;

#[test]
fn compressed_air_reaches_the_cold_box_at_intercooler_temperature() {
    let backend = CoolPropBackend::air();
    let ambient = backend.state_pt(pa(P_AMB), celsius(25.0)).unwrap();
    let compression = CompressionTrain::new(3, 0.85, celsius(35.0))
        .unwrap()
        .evaluate(&backend, &ambient, bar(50.0))
        .unwrap();

    let result = ColdBox::new(pa(P_AMB), 0.45, 0.80, 0.90)
        .unwrap()
        .evaluate(&backend, &compression.outlet, 0.0)
        .unwrap();

    // Cold return sits between the separator vapor and the warm bypass exhaust.
    let t_cr = result.cold_return.temperature.unwrap().value;
    assert!(t_cr > 75.0 && t_cr < 200.0, "T_cold_return = {t_cr}");
    assert!(result.t_after_hx1.value < 308.15);
    assert!(result.liquid_yield > 0.0 && result.liquid_yield <= 0.55);

    // Net liquefaction work stays positive: the bypass turbine only offsets part of it.
    assert!(compression.work > result.turbine_work);
}

#[test]
fn jt_outcome_is_classified() {
    let backend = CoolPropBackend::air();
    let inlet = backend.state_pt(bar(50.0), celsius(35.0)).unwrap();
    let result = ColdBox::new(pa(P_AMB), 0.45, 0.80, 0.90)
        .unwrap()
        .evaluate(&backend, &inlet, 0.0)
        .unwrap();

    let jt = result.jt.expect("main branch present");
    match jt.outcome {
        JtOutcome::TwoPhase { quality } => {
            assert!((jt.liquid_fraction - (1.0 - quality)).abs() < 1e-12)
        }
        JtOutcome::Subcooled => assert_eq!(jt.liquid_fraction, 1.0),
        JtOutcome::Superheated => assert_eq!(jt.liquid_fraction, 0.0),
        JtOutcome::Fallback { .. } => assert_eq!(jt.liquid_fraction, 0.30),
    }
}

#[test]
fn cold_recovery_ceiling_is_the_intercooler_temperature() {
    let backend = CoolPropBackend::air();
    let low_ceiling = DischargeTrain::new(
        pa(P_AMB),
        bar(70.0),
        4,
        celsius(250.0),
        celsius(-50.0),
        0.75,
        0.85,
    )
    .unwrap()
    .evaluate(&backend)
    .unwrap();
    let intercooler_ceiling = DischargeTrain::new(
        pa(P_AMB),
        bar(70.0),
        4,
        celsius(250.0),
        celsius(35.0),
        0.75,
        0.85,
    )
    .unwrap()
    .evaluate(&backend)
    .unwrap();

    assert!(intercooler_ceiling.cold_recoverable > low_ceiling.cold_recoverable);
    // Total heat input from pump outlet to turbine inlet is independent of the ceiling.
    let total_low = low_ceiling.cold_recoverable + low_ceiling.superheat_heat;
    let total_ic = intercooler_ceiling.cold_recoverable + intercooler_ceiling.superheat_heat;
    assert!((total_low - total_ic).abs() < 1e-6);
    assert_eq!(low_ceiling.net_work, intercooler_ceiling.net_work);
}
