//! Claude-cycle cold box: recuperation, cold-store injection, bypass
//! expansion and Joule-Thomson liquefaction.
//!
//! Evaluation order for the compressed, intercooled stream:
//!
//! 1. cold-return temperature from the bypass-turbine exhaust and the
//!    separator vapor (first-pass 30 % liquid estimate for the mass split),
//! 2. HX1 against the cold return,
//! 3. optional cold-store draw, floored at 105 K,
//! 4. split: bypass fraction to the cryogenic turbine,
//! 5. HX2 of the main branch against the bypass exhaust,
//! 6. J-T valve and phase separation.
//!
//! The bypass stream used for the cold return is expanded from the
//! intercooler outlet rather than from the colder HX1 exit, so the return
//! temperature is biased warm. That bias is part of the model.

use crate::common::{check_efficiency, check_fraction, check_pressure};
use crate::error::{ComponentError, ComponentResult, InComponent};
use crate::exchanger::EffectivenessExchanger;
use crate::stream::{StreamFraction, mix};
use crate::turbomachinery::{StageOutcome, expand};
use crate::valve::{Throttle, throttle};
use laes_core::units::constants::T_COLD_FLOOR_K;
use laes_core::units::{Pressure, SpecEnergy, Temperature, k};
use laes_fluids::{FluidState, PropertyBackend};
use tracing::debug;

const COMPONENT: &str = "cold_box";

/// Liquid-yield estimate used only to split the return mass in the first pass.
pub const FIRST_PASS_LIQUID_ESTIMATE: f64 = 0.30;

/// How the cold-return temperature is settled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColdReturnStrategy {
    /// One evaluation with [`FIRST_PASS_LIQUID_ESTIMATE`].
    #[default]
    SinglePass,
    /// Re-evaluate with the computed main-branch liquid fraction until the
    /// return temperature changes by less than `tolerance_k`.
    FixedPoint {
        max_iterations: usize,
        tolerance_k: f64,
    },
}

/// Mixed cold stream returning to HX1.
///
/// `temperature` and `state` are `None` when no mass returns (no bypass and
/// an all-liquid separator); HX1 then leaves the compressed stream uncooled.
#[derive(Debug, Clone, PartialEq)]
pub struct ColdReturn {
    pub temperature: Option<Temperature>,
    pub state: Option<FluidState>,
    /// Stream A: bypass exhaust expanded from the intercooler outlet.
    pub bypass_stream: Option<StreamFraction>,
    /// Stream B: saturated separator vapor.
    pub vapor_stream: Option<StreamFraction>,
    /// Main-branch liquid fraction assumed for the mass split.
    pub liquid_estimate: f64,
    /// Number of cold-box passes performed.
    pub passes: usize,
}

/// Bypass branch through the cryogenic turbine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BypassBranch {
    pub inlet_temperature: Temperature,
    pub exhaust: FluidState,
    /// Work per kg of bypass flow.
    pub stage_work: SpecEnergy,
}

/// Cold-box outcome. Specific quantities are per kg of total compressed air.
#[derive(Debug, Clone, PartialEq)]
pub struct ColdBoxResult {
    /// Liquid produced per kg of compressed air.
    pub liquid_yield: f64,
    /// Liquid fraction of the main branch leaving the J-T valve.
    pub main_liquid_fraction: f64,
    /// Cryogenic turbine work credited against compression.
    pub turbine_work: SpecEnergy,
    /// Enthalpy removed by the cold-store draw.
    pub cold_used: SpecEnergy,
    pub cold_return: ColdReturn,
    pub t_after_hx1: Temperature,
    pub t_after_cold: Temperature,
    /// `None` when the whole flow is bypassed.
    pub t_after_hx2: Option<Temperature>,
    /// `None` when the bypass fraction is zero.
    pub bypass: Option<BypassBranch>,
    /// `None` when the whole flow is bypassed.
    pub jt: Option<Throttle>,
}

impl ColdBoxResult {
    /// True when the J-T outlet used the fixed 30 % liquid fallback.
    pub fn used_fallback(&self) -> bool {
        self.jt
            .as_ref()
            .is_some_and(|jt| jt.outcome.is_fallback())
    }
}

/// Claude-cycle cold box operating between the charge pressure and ambient.
#[derive(Debug, Clone, PartialEq)]
pub struct ColdBox {
    low_pressure: Pressure,
    bypass_fraction: f64,
    eta_cryo_turbine: f64,
    exchanger: EffectivenessExchanger,
    strategy: ColdReturnStrategy,
}

impl ColdBox {
    pub fn new(
        low_pressure: Pressure,
        bypass_fraction: f64,
        eta_cryo_turbine: f64,
        effectiveness: f64,
    ) -> ComponentResult<Self> {
        Ok(Self {
            low_pressure: check_pressure(low_pressure, COMPONENT, "low pressure must be positive")?,
            bypass_fraction: check_fraction(
                bypass_fraction,
                COMPONENT,
                "bypass fraction must be in [0, 1]",
            )?,
            eta_cryo_turbine: check_efficiency(
                eta_cryo_turbine,
                COMPONENT,
                "cryogenic turbine efficiency must be in (0, 1]",
            )?,
            exchanger: EffectivenessExchanger::new(effectiveness, COMPONENT)?,
            strategy: ColdReturnStrategy::default(),
        })
    }

    pub fn with_strategy(mut self, strategy: ColdReturnStrategy) -> ComponentResult<Self> {
        if let ColdReturnStrategy::FixedPoint {
            max_iterations,
            tolerance_k,
        } = strategy
        {
            if max_iterations == 0 || !tolerance_k.is_finite() || tolerance_k <= 0.0 {
                return Err(ComponentError::InvalidArg {
                    component: COMPONENT,
                    what: "fixed-point iteration needs max_iterations >= 1 and a positive tolerance",
                });
            }
        }
        self.strategy = strategy;
        Ok(self)
    }

    pub fn bypass_fraction(&self) -> f64 {
        self.bypass_fraction
    }

    fn main_fraction(&self) -> f64 {
        1.0 - self.bypass_fraction
    }

    /// Liquefy the compressed stream `inlet` (intercooler outlet at the
    /// charge pressure), drawing up to `cold_offer` J/kg from a cold store.
    pub fn evaluate(
        &self,
        backend: &dyn PropertyBackend,
        inlet: &FluidState,
        cold_offer: SpecEnergy,
    ) -> ComponentResult<ColdBoxResult> {
        if !cold_offer.is_finite() || cold_offer < 0.0 {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "cold offer must be non-negative and finite",
            });
        }
        if inlet.pressure().value <= self.low_pressure.value {
            return Err(ComponentError::InvalidArg {
                component: COMPONENT,
                what: "inlet pressure must exceed the separator pressure",
            });
        }

        // Return-stream inputs that do not depend on the liquid estimate.
        let stream_a = if self.bypass_fraction > 0.0 {
            Some(expand(
                backend,
                inlet,
                self.low_pressure,
                self.eta_cryo_turbine,
                COMPONENT,
            )?)
        } else {
            None
        };
        let vapor = backend
            .state_pq(self.low_pressure, 1.0)
            .in_component(COMPONENT)?;

        let mut result = self.pass(
            backend,
            inlet,
            cold_offer,
            stream_a.as_ref(),
            &vapor,
            FIRST_PASS_LIQUID_ESTIMATE,
        )?;

        let ColdReturnStrategy::FixedPoint {
            max_iterations,
            tolerance_k,
        } = self.strategy
        else {
            return Ok(result);
        };

        for iteration in 1..=max_iterations {
            let next = self.pass(
                backend,
                inlet,
                cold_offer,
                stream_a.as_ref(),
                &vapor,
                result.main_liquid_fraction,
            )?;
            let delta = match (next.cold_return.temperature, result.cold_return.temperature) {
                (Some(a), Some(b)) => (a.value - b.value).abs(),
                (None, None) => 0.0,
                _ => f64::INFINITY,
            };
            result = next;
            result.cold_return.passes = iteration + 1;
            debug!(
                iteration,
                t_cold_return_k = ?result.cold_return.temperature.map(|t| t.value),
                delta_k = delta,
                "cold-return fixed point"
            );
            if delta < tolerance_k {
                return Ok(result);
            }
        }

        Err(ComponentError::ConvergenceFailed {
            component: COMPONENT,
            iterations: max_iterations,
        })
    }

    fn pass(
        &self,
        backend: &dyn PropertyBackend,
        inlet: &FluidState,
        cold_offer: SpecEnergy,
        stream_a: Option<&StageOutcome>,
        vapor: &FluidState,
        liquid_estimate: f64,
    ) -> ComponentResult<ColdBoxResult> {
        let p_high = inlet.pressure();
        let cold_return = self.cold_return(backend, stream_a, vapor, liquid_estimate)?;

        // HX1 against the mixed cold return.
        let after_hx1 = match cold_return.temperature {
            Some(t_cold) => {
                let t = self.exchanger.hot_outlet(inlet.temperature(), t_cold);
                backend.state_pt(p_high, t).in_component(COMPONENT)?
            }
            None => *inlet,
        };
        let t_after_hx1 = after_hx1.temperature();

        let (after_cold, cold_used) = self.draw_cold(backend, &after_hx1, cold_offer)?;

        let bypass = if self.bypass_fraction > 0.0 {
            let stage = expand(
                backend,
                &after_cold,
                self.low_pressure,
                self.eta_cryo_turbine,
                COMPONENT,
            )?;
            Some(BypassBranch {
                inlet_temperature: after_cold.temperature(),
                exhaust: stage.outlet,
                stage_work: stage.work,
            })
        } else {
            None
        };
        let turbine_work = bypass.map_or(0.0, |b| b.stage_work * self.bypass_fraction);

        let main_fraction = self.main_fraction();
        if main_fraction <= 0.0 {
            debug!(
                t_cold_return_k = ?cold_return.temperature.map(|t| t.value),
                "all flow bypassed, no liquid produced"
            );
            return Ok(ColdBoxResult {
                liquid_yield: 0.0,
                main_liquid_fraction: 0.0,
                turbine_work,
                cold_used,
                cold_return,
                t_after_hx1,
                t_after_cold: after_cold.temperature(),
                t_after_hx2: None,
                bypass,
                jt: None,
            });
        }

        // HX2 of the main branch against the bypass exhaust.
        let before_jt = match bypass {
            Some(branch) => {
                let t = self
                    .exchanger
                    .hot_outlet(after_cold.temperature(), branch.exhaust.temperature());
                backend.state_pt(p_high, t).in_component(COMPONENT)?
            }
            None => after_cold,
        };

        let jt = throttle(backend, &before_jt, self.low_pressure)?;
        let main_liquid_fraction = jt.liquid_fraction;
        let liquid_yield = main_fraction * main_liquid_fraction;

        debug!(
            t_cold_return_k = ?cold_return.temperature.map(|t| t.value),
            t_after_hx1_k = t_after_hx1.value,
            t_after_cold_k = after_cold.temperature().value,
            t_before_jt_k = before_jt.temperature().value,
            liquid_yield,
            "cold box pass"
        );

        Ok(ColdBoxResult {
            liquid_yield,
            main_liquid_fraction,
            turbine_work,
            cold_used,
            cold_return,
            t_after_hx1,
            t_after_cold: after_cold.temperature(),
            t_after_hx2: Some(before_jt.temperature()),
            bypass,
            jt: Some(jt),
        })
    }

    fn cold_return(
        &self,
        backend: &dyn PropertyBackend,
        stream_a: Option<&StageOutcome>,
        vapor: &FluidState,
        liquid_estimate: f64,
    ) -> ComponentResult<ColdReturn> {
        let bypass_stream = stream_a
            .map(|a| StreamFraction::new("bypass_exhaust", self.bypass_fraction, a.outlet));
        let vapor_fraction = self.main_fraction() * (1.0 - liquid_estimate);
        let vapor_stream = (vapor_fraction > 0.0)
            .then(|| StreamFraction::new("separator_vapor", vapor_fraction, *vapor));

        let streams: Vec<StreamFraction> = bypass_stream.into_iter().chain(vapor_stream).collect();
        let state = mix(backend, &streams, self.low_pressure, COMPONENT)?;
        if state.is_none() {
            debug!(liquid_estimate, "no mass returns to HX1");
        }

        Ok(ColdReturn {
            temperature: state.map(|s| s.temperature()),
            state,
            bypass_stream,
            vapor_stream,
            liquid_estimate,
            passes: 1,
        })
    }

    /// Remove up to `offer` J/kg from the HX1 exit stream without cooling
    /// it below the 105 K floor. A stream already at or below the floor
    /// takes no cold.
    fn draw_cold(
        &self,
        backend: &dyn PropertyBackend,
        after_hx1: &FluidState,
        offer: SpecEnergy,
    ) -> ComponentResult<(FluidState, SpecEnergy)> {
        if offer <= 0.0 {
            return Ok((*after_hx1, 0.0));
        }

        let floor = backend
            .state_pt(after_hx1.pressure(), k(T_COLD_FLOOR_K))
            .in_component(COMPONENT)?;
        let h_before = after_hx1.enthalpy();
        if h_before <= floor.enthalpy() {
            return Ok((*after_hx1, 0.0));
        }

        let h_after = (h_before - offer).max(floor.enthalpy());
        let state = if h_after <= floor.enthalpy() {
            floor
        } else {
            backend
                .state_ph(after_hx1.pressure(), h_after)
                .in_component(COMPONENT)?
        };
        Ok((state, h_before - h_after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valve::JtOutcome;
    use laes_core::units::{bar, celsius, kg_per_m3, pa};
    use laes_fluids::{CoolPropBackend, FluidError, FluidResult, RecordingBackend, StateInput};

    const P_AMB: f64 = 101_325.0;

    /// Linear stand-in for air: a saturation dome at 80 K on the ambient
    /// isobar and `h = 1000 T - 450 kJ/kg` at high pressure.
    struct ToyAir;

    const T_SAT: f64 = 80.0;
    const H_LIQ: f64 = -120_000.0;
    const H_VAP: f64 = 80_000.0;

    impl PropertyBackend for ToyAir {
        fn name(&self) -> &str {
            "toy-air"
        }

        fn state_at(&self, input: StateInput) -> FluidResult<FluidState> {
            let p = input.pressure();
            let low = p.value <= P_AMB;
            let (t, h, quality) = match input {
                StateInput::PQ { q, .. } => (T_SAT, H_LIQ + q * (H_VAP - H_LIQ), Some(q)),
                StateInput::PT { t, .. } if !low => (t.value, 1000.0 * t.value - 450_000.0, None),
                StateInput::PH { h, .. } if !low => ((h + 450_000.0) / 1000.0, h, None),
                StateInput::PH { h, .. } if h < H_LIQ => (T_SAT + (h - H_LIQ) / 10_000.0, h, None),
                StateInput::PH { h, .. } if h <= H_VAP => {
                    (T_SAT, h, Some((h - H_LIQ) / (H_VAP - H_LIQ)))
                }
                StateInput::PH { h, .. } => (h / 1000.0, h, None),
                _ => return Err(FluidError::InvalidArg { what: "unsupported toy query" }),
            };
            FluidState::new(p, k(t), h, 3_000.0, quality, kg_per_m3(100.0))
        }
    }

    fn compressed(backend: &dyn PropertyBackend) -> FluidState {
        backend.state_pt(bar(50.0), celsius(35.0)).unwrap()
    }

    fn cold_box(bypass_fraction: f64) -> ColdBox {
        ColdBox::new(pa(P_AMB), bypass_fraction, 0.80, 0.90).unwrap()
    }

    #[test]
    fn default_cycle_liquefies_part_of_the_flow() {
        let backend = CoolPropBackend::air();
        let result = cold_box(0.45)
            .evaluate(&backend, &compressed(&backend), 0.0)
            .unwrap();

        assert!(result.liquid_yield > 0.0 && result.liquid_yield < 0.55);
        assert!((result.liquid_yield - 0.55 * result.main_liquid_fraction).abs() < 1e-12);
        assert!(result.turbine_work > 0.0);
        assert_eq!(result.cold_used, 0.0);
        assert_eq!(result.cold_return.passes, 1);
        assert_eq!(result.cold_return.liquid_estimate, FIRST_PASS_LIQUID_ESTIMATE);
    }

    #[test]
    fn hx1_exit_follows_effectiveness_formula() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let result = cold_box(0.45).evaluate(&backend, &inlet, 0.0).unwrap();

        let t_in = inlet.temperature().value;
        let t_cold = result.cold_return.temperature.unwrap().value;
        let expected = t_in - 0.90 * (t_in - t_cold);
        assert!((result.t_after_hx1.value - expected).abs() < 1e-9);
    }

    #[test]
    fn cold_return_lies_between_its_streams() {
        let backend = CoolPropBackend::air();
        let result = cold_box(0.45)
            .evaluate(&backend, &compressed(&backend), 0.0)
            .unwrap();

        let a = result.cold_return.bypass_stream.unwrap().state.temperature().value;
        let b = result.cold_return.vapor_stream.unwrap().state.temperature().value;
        let t = result.cold_return.temperature.unwrap().value;
        assert!(t >= b.min(a) - 1e-9 && t <= a.max(b) + 1e-9);
    }

    #[test]
    fn return_stream_is_biased_warm() {
        let backend = CoolPropBackend::air();
        let result = cold_box(0.45)
            .evaluate(&backend, &compressed(&backend), 0.0)
            .unwrap();

        // Stream A starts at the intercooler outlet, the real bypass turbine
        // at the colder post-HX1 state.
        let stream_a = result.cold_return.bypass_stream.unwrap().state;
        let actual = result.bypass.unwrap();
        assert!(actual.inlet_temperature.value < 308.15);
        assert!(stream_a.temperature().value >= actual.exhaust.temperature().value);
    }

    #[test]
    fn no_bypass_skips_the_turbine() {
        let backend = RecordingBackend::new(CoolPropBackend::air());
        let inlet = compressed(&backend);
        backend.reset();

        let result = cold_box(0.0).evaluate(&backend, &inlet, 0.0).unwrap();

        assert_eq!(backend.counts().ps, 0, "no isentropic expansion expected");
        assert!(result.bypass.is_none());
        assert!(result.cold_return.bypass_stream.is_none());
        assert_eq!(result.turbine_work, 0.0);

        let vapor = backend.state_pq(pa(P_AMB), 1.0).unwrap();
        assert_eq!(result.cold_return.temperature, Some(vapor.temperature()));
        // Without a bypass exhaust HX2 has nothing to exchange with.
        assert_eq!(result.t_after_hx2, Some(result.t_after_cold));
    }

    #[test]
    fn full_bypass_produces_no_liquid() {
        let backend = CoolPropBackend::air();
        let result = cold_box(1.0)
            .evaluate(&backend, &compressed(&backend), 0.0)
            .unwrap();

        assert_eq!(result.liquid_yield, 0.0);
        assert!(result.jt.is_none());
        assert!(result.t_after_hx2.is_none());
        assert!(result.cold_return.vapor_stream.is_none());
        assert!(result.turbine_work > 0.0);
    }

    #[test]
    fn yield_grows_with_effectiveness() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let yields: Vec<f64> = [0.80, 0.85, 0.90, 0.95]
            .iter()
            .map(|&eps| {
                ColdBox::new(pa(P_AMB), 0.45, 0.80, eps)
                    .unwrap()
                    .evaluate(&backend, &inlet, 0.0)
                    .unwrap()
            })
            .filter(|r| !r.used_fallback())
            .map(|r| r.liquid_yield)
            .collect();

        assert!(yields.len() >= 2, "too few resolved J-T outlets: {yields:?}");
        for pair in yields.windows(2) {
            assert!(pair[1] >= pair[0], "yields not monotonic: {yields:?}");
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let cold_box = cold_box(0.45);
        let first = cold_box.evaluate(&backend, &inlet, 20_000.0).unwrap();
        let second = cold_box.evaluate(&backend, &inlet, 20_000.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cold_offer_cools_main_stream() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let cold_box = cold_box(0.45);
        let without = cold_box.evaluate(&backend, &inlet, 0.0).unwrap();
        let with = cold_box.evaluate(&backend, &inlet, 20_000.0).unwrap();

        assert!(with.t_after_cold.value < without.t_after_cold.value);
        assert!((with.cold_used - 20_000.0).abs() < 1e-6);
        if !with.used_fallback() && !without.used_fallback() {
            assert!(with.liquid_yield >= without.liquid_yield);
        }
    }

    #[test]
    fn large_cold_offer_is_clamped_at_floor() {
        let backend = CoolPropBackend::air();
        let result = cold_box(0.45)
            .evaluate(&backend, &compressed(&backend), 1.0e6)
            .unwrap();

        assert!((result.t_after_cold.value - T_COLD_FLOOR_K).abs() < 1e-6);
        assert!(result.cold_used > 0.0 && result.cold_used < 1.0e6);
    }

    #[test]
    fn stream_below_floor_takes_no_cold() {
        let backend = CoolPropBackend::air();
        let result = cold_box(0.0)
            .evaluate(&backend, &compressed(&backend), 50_000.0)
            .unwrap();

        assert!(result.t_after_hx1.value < T_COLD_FLOOR_K);
        assert_eq!(result.cold_used, 0.0);
        assert_eq!(result.t_after_cold, result.t_after_hx1);
    }

    #[test]
    fn fully_liquefied_main_branch_skips_hx1() {
        let backend = ToyAir;
        let inlet = backend.state_pt(bar(50.0), k(150.0)).unwrap();
        let result = cold_box(0.0)
            .with_strategy(ColdReturnStrategy::FixedPoint {
                max_iterations: 10,
                tolerance_k: 0.01,
            })
            .unwrap()
            .evaluate(&backend, &inlet, 0.0)
            .unwrap();

        assert!(result.cold_return.temperature.is_none());
        assert!(result.cold_return.state.is_none());
        assert!(result.cold_return.vapor_stream.is_none());
        assert_eq!(result.cold_return.liquid_estimate, 1.0);
        assert_eq!(result.cold_return.passes, 3);
        assert_eq!(result.t_after_hx1, inlet.temperature());
        assert_eq!(result.jt.unwrap().outcome, JtOutcome::Subcooled);
        assert_eq!(result.liquid_yield, 1.0);
    }

    #[test]
    fn negative_cold_offer_is_rejected() {
        let backend = CoolPropBackend::air();
        let err = cold_box(0.45)
            .evaluate(&backend, &compressed(&backend), -1.0)
            .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidArg { component: "cold_box", .. }));
    }

    #[test]
    fn fixed_point_moves_return_temperature() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let single = cold_box(0.45).evaluate(&backend, &inlet, 0.0).unwrap();
        if single.used_fallback() {
            return;
        }

        let iterated = cold_box(0.45)
            .with_strategy(ColdReturnStrategy::FixedPoint {
                max_iterations: 50,
                tolerance_k: 0.01,
            })
            .unwrap()
            .evaluate(&backend, &inlet, 0.0)
            .unwrap();

        assert!(iterated.cold_return.passes >= 2);
        assert!(
            (iterated.cold_return.liquid_estimate - FIRST_PASS_LIQUID_ESTIMATE).abs() > 1e-6
        );
    }

    #[test]
    fn fixed_point_reports_non_convergence() {
        let backend = CoolPropBackend::air();
        let inlet = compressed(&backend);
        let single = cold_box(0.45).evaluate(&backend, &inlet, 0.0).unwrap();
        let far_from_estimate =
            (single.main_liquid_fraction - FIRST_PASS_LIQUID_ESTIMATE).abs() > 0.05;
        if single.used_fallback() || !far_from_estimate {
            return;
        }

        let err = cold_box(0.45)
            .with_strategy(ColdReturnStrategy::FixedPoint {
                max_iterations: 1,
                tolerance_k: 1e-9,
            })
            .unwrap()
            .evaluate(&backend, &inlet, 0.0)
            .unwrap_err();
        assert_eq!(
            err,
            ComponentError::ConvergenceFailed {
                component: "cold_box",
                iterations: 1
            }
        );
    }
}
