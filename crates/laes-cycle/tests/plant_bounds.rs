//! Randomised plant designs keep the round trip physical.

use laes_cycle::CycleEngine;
use laes_fluids::CoolPropBackend;
use laes_project::PlantConfig;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn round_trip_stays_physical(
        bypass in 0.0..=1.0f64,
        effectiveness in 0.6..=1.0f64,
        charge_bar in 40.0..=100.0f64,
        stages in 1u32..=5,
    ) {
        let backend = CoolPropBackend::air();
        let config = PlantConfig {
            bypass_fraction: bypass,
            hx_effectiveness: effectiveness,
            charge_pressure_bar: charge_bar,
            compressor_stages: stages,
            ..PlantConfig::default()
        };
        let engine = CycleEngine::new(&config, &backend).unwrap();
        let report = engine.round_trip().unwrap();

        for case in [&report.without_cold, &report.with_cold] {
            prop_assert!((0.0..=1.0).contains(&case.liquid_yield), "yield {}", case.liquid_yield);
            prop_assert!(case.net_work > 0.0, "net work {}", case.net_work);
            if case.liquid_yield > 0.0 {
                let sc = case.specific_consumption.unwrap();
                prop_assert!(sc > 0.0, "specific consumption {}", sc);
            } else {
                prop_assert!(case.specific_consumption.is_none());
            }
        }
        prop_assert!(report.specific_power() > 0.0);
    }
}
