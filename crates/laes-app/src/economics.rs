//! Parametric plant economics: capital cost, annual cash flow, NPV, payback
//! and levelized cost of storage.
//!
//! Costs are order-of-magnitude estimates (roughly ±30-50 %).

use laes_core::units::constants::J_PER_KWH;
use laes_cycle::RoundTripReport;
use laes_fluids::PropertyBackend;
use laes_project::PlantConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::rte_service::run_rte;

/// Unit costs and financial factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBasis {
    /// $/kW of charge power
    pub compressor_per_kw: f64,
    /// $/kW of discharge power
    pub turbine_per_kw: f64,
    /// $/m3 of tank volume
    pub tank_per_m3: f64,
    /// $/kWh thermal
    pub hot_store_per_kwh: f64,
    /// $/kWh thermal
    pub cold_store_per_kwh: f64,
    /// $/kW thermal
    pub heat_exchanger_per_kw: f64,
    pub bop_fraction: f64,
    pub installation_fraction: f64,
    pub maintenance_fraction: f64,
    pub insurance_fraction: f64,
    pub cycles_per_year: f64,
    /// $/kW-year of discharge power
    pub capacity_payment_per_kw: f64,
    /// Output retained per year of operation
    pub annual_degradation: f64,
}

impl Default for CostBasis {
    fn default() -> Self {
        Self {
            compressor_per_kw: 500.0,
            turbine_per_kw: 400.0,
            tank_per_m3: 800.0,
            hot_store_per_kwh: 30.0,
            cold_store_per_kwh: 45.0,
            heat_exchanger_per_kw: 75.0,
            bop_fraction: 0.20,
            installation_fraction: 0.25,
            maintenance_fraction: 0.015,
            insurance_fraction: 0.005,
            cycles_per_year: 365.0,
            capacity_payment_per_kw: 50.0,
            annual_degradation: 0.995,
        }
    }
}

/// Thermodynamic figures the economics depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicsInputs {
    /// Discharge heat demand per kg of liquid [J/kg].
    pub heat_per_kg: f64,
    /// Cold recoverable per kg of liquid [J/kg].
    pub cold_per_kg: f64,
    pub rte: f64,
}

impl EconomicsInputs {
    pub fn from_report(report: &RoundTripReport) -> AppResult<Self> {
        let rte = report.rte_with_cold().ok_or_else(|| {
            AppError::InvalidInput("plant produces no liquid, RTE undefined".to_string())
        })?;
        Ok(Self {
            heat_per_kg: report.discharge.heat_demand(),
            cold_per_kg: report.discharge.cold_recoverable,
            rte,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexBreakdown {
    pub compressor: f64,
    pub turbine: f64,
    pub cryo_tank: f64,
    pub hot_storage: f64,
    pub cold_storage: f64,
    pub heat_exchangers: f64,
    pub equipment: f64,
    pub bop: f64,
    pub installation: f64,
    pub total: f64,
    pub per_kw: f64,
    pub per_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualCashflow {
    pub maintenance: f64,
    pub insurance: f64,
    pub electricity_cost: f64,
    pub opex: f64,
    pub energy_revenue: f64,
    pub capacity_revenue: f64,
    pub revenue: f64,
    pub net: f64,
    pub energy_in_mwh: f64,
    pub energy_out_mwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsReport {
    pub inputs: EconomicsInputs,
    pub capex: CapexBreakdown,
    pub cashflow: AnnualCashflow,
    pub npv: f64,
    /// `None` when the annual net cash flow is not positive.
    pub payback_years: Option<f64>,
    /// `None` when nothing is discharged.
    pub lcos_per_mwh: Option<f64>,
}

impl EconomicsReport {
    pub fn render(&self, config: &PlantConfig) -> String {
        let payback = self
            .payback_years
            .map_or("never".to_string(), |y| format!("{y:.1} years"));
        let lcos = self
            .lcos_per_mwh
            .map_or("n/a".to_string(), |l| format!("${l:.0}/MWh"));
        format!(
            "Capital costs\n\
             Compressor         ${:>14.0}\n\
             Turbine            ${:>14.0}\n\
             Cryogenic tank     ${:>14.0}\n\
             Hot storage        ${:>14.0}\n\
             Cold storage       ${:>14.0}\n\
             Heat exchangers    ${:>14.0}\n\
             Balance of plant   ${:>14.0}\n\
             Installation       ${:>14.0}\n\
             Total              ${:>14.0}  (${:.0}/kW, ${:.0}/kWh)\n\
             \n\
             Annual cash flow\n\
             OPEX               ${:>14.0}\n\
             Revenue            ${:>14.0}\n\
             Net                ${:>14.0}\n\
             \n\
             NPV ({} years)     ${:>14.0}\n\
             Payback            {}\n\
             LCOS               {}\n\
             RTE used           {:.1} %",
            self.capex.compressor,
            self.capex.turbine,
            self.capex.cryo_tank,
            self.capex.hot_storage,
            self.capex.cold_storage,
            self.capex.heat_exchangers,
            self.capex.bop,
            self.capex.installation,
            self.capex.total,
            self.capex.per_kw,
            self.capex.per_kwh,
            self.cashflow.opex,
            self.cashflow.revenue,
            self.cashflow.net,
            config.economics.project_years,
            self.npv,
            payback,
            lcos,
            self.inputs.rte * 100.0,
        )
    }
}

pub fn capex(config: &PlantConfig, inputs: &EconomicsInputs, basis: &CostBasis) -> CapexBreakdown {
    let charge_kw = config.charge_power_mw * 1e3;
    let discharge_kw = config.discharge_power_mw * 1e3;
    let hot_kwh = config.tank_capacity_kg() * inputs.heat_per_kg / J_PER_KWH;
    let cold_kwh = config.tank_capacity_kg() * inputs.cold_per_kg / J_PER_KWH;

    let compressor = basis.compressor_per_kw * charge_kw;
    let turbine = basis.turbine_per_kw * discharge_kw;
    let cryo_tank = basis.tank_per_m3 * config.tank_capacity_m3();
    let hot_storage = basis.hot_store_per_kwh * hot_kwh;
    let cold_storage = basis.cold_store_per_kwh * cold_kwh;
    let heat_exchangers = basis.heat_exchanger_per_kw * hot_kwh / config.storage_duration_hours;

    let equipment =
        compressor + turbine + cryo_tank + hot_storage + cold_storage + heat_exchangers;
    let bop = equipment * basis.bop_fraction;
    let installation = equipment * basis.installation_fraction;
    let total = equipment + bop + installation;

    CapexBreakdown {
        compressor,
        turbine,
        cryo_tank,
        hot_storage,
        cold_storage,
        heat_exchangers,
        equipment,
        bop,
        installation,
        total,
        per_kw: total / discharge_kw,
        per_kwh: total / (config.storage_capacity_mwh() * 1e3),
    }
}

pub fn annual_cashflow(
    config: &PlantConfig,
    capex: &CapexBreakdown,
    rte: f64,
    basis: &CostBasis,
) -> AnnualCashflow {
    let maintenance = capex.total * basis.maintenance_fraction;
    let insurance = capex.total * basis.insurance_fraction;

    let energy_in_mwh =
        config.charge_power_mw * config.storage_duration_hours * basis.cycles_per_year;
    let energy_out_mwh = energy_in_mwh * rte;
    let electricity_cost = energy_in_mwh * config.economics.price_offpeak_mwh;
    let opex = maintenance + insurance + electricity_cost;

    let energy_revenue = energy_out_mwh * config.economics.price_onpeak_mwh;
    let capacity_revenue = config.discharge_power_mw * 1e3 * basis.capacity_payment_per_kw;
    let revenue = energy_revenue + capacity_revenue;

    AnnualCashflow {
        maintenance,
        insurance,
        electricity_cost,
        opex,
        energy_revenue,
        capacity_revenue,
        revenue,
        net: revenue - opex,
        energy_in_mwh,
        energy_out_mwh,
    }
}

/// Capital recovery factor for rate `r` over `n` years.
pub fn capital_recovery_factor(r: f64, n: u32) -> f64 {
    if r == 0.0 {
        return 1.0 / f64::from(n);
    }
    let growth = (1.0 + r).powi(n as i32);
    r * growth / (growth - 1.0)
}

/// Full economic evaluation for given thermodynamic inputs.
pub fn evaluate(
    config: &PlantConfig,
    inputs: EconomicsInputs,
    basis: &CostBasis,
) -> AppResult<EconomicsReport> {
    let years = config.economics.project_years;
    let r = config.economics.discount_rate;
    if years == 0 {
        return Err(AppError::InvalidInput(
            "project lifetime must be at least one year".to_string(),
        ));
    }
    if !r.is_finite() || r < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "discount rate must be non-negative, got {r}"
        )));
    }
    if !inputs.rte.is_finite() || inputs.rte < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "round-trip efficiency must be non-negative, got {}",
            inputs.rte
        )));
    }

    let capex = capex(config, &inputs, basis);
    let cashflow = annual_cashflow(config, &capex, inputs.rte, basis);

    let npv = (1..=years).fold(-capex.total, |npv, year| {
        let year = year as i32;
        let degraded = cashflow.net * basis.annual_degradation.powi(year);
        npv + degraded / (1.0 + r).powi(year)
    });

    let payback_years = (cashflow.net > 0.0).then(|| capex.total / cashflow.net);
    let annual_cost = capex.total * capital_recovery_factor(r, years) + cashflow.opex;
    let lcos_per_mwh = (cashflow.energy_out_mwh > 0.0).then(|| annual_cost / cashflow.energy_out_mwh);

    Ok(EconomicsReport {
        inputs,
        capex,
        cashflow,
        npv,
        payback_years,
        lcos_per_mwh,
    })
}

/// Evaluate the round trip, then the economics at the coupled RTE.
pub fn run_economics(
    config: &PlantConfig,
    backend: &dyn PropertyBackend,
) -> AppResult<EconomicsReport> {
    let report = run_rte(config, backend)?;
    let inputs = EconomicsInputs::from_report(&report)?;
    let economics = evaluate(config, inputs, &CostBasis::default())?;
    info!(
        capex = economics.capex.total,
        npv = economics.npv,
        lcos_per_mwh = ?economics.lcos_per_mwh,
        "economics evaluated"
    );
    Ok(economics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> EconomicsInputs {
        EconomicsInputs {
            heat_per_kg: 360e3,
            cold_per_kg: 180e3,
            rte: 0.5,
        }
    }

    #[test]
    fn capex_items() {
        let config = PlantConfig::default();
        let capex = capex(&config, &inputs(), &CostBasis::default());

        assert_eq!(capex.compressor, 5.0e6);
        assert_eq!(capex.turbine, 4.0e6);
        // 200 t at 360 kJ/kg = 20 MWh thermal
        assert!((capex.hot_storage - 30.0 * 20_000.0).abs() < 1e-6);
        assert!((capex.cold_storage - 45.0 * 10_000.0).abs() < 1e-6);
        assert!((capex.heat_exchangers - 75.0 * 20_000.0 / 4.0).abs() < 1e-6);
        assert!((capex.cryo_tank - 800.0 * 200_000.0 / 875.0).abs() < 1e-6);
        assert!((capex.total - capex.equipment * 1.45).abs() < 1e-6);
        assert!((capex.per_kwh - capex.total / 40_000.0).abs() < 1e-9);
    }

    #[test]
    fn cashflow_items() {
        let config = PlantConfig::default();
        let basis = CostBasis::default();
        let capex = capex(&config, &inputs(), &basis);
        let cf = annual_cashflow(&config, &capex, 0.5, &basis);

        assert_eq!(cf.energy_in_mwh, 10.0 * 4.0 * 365.0);
        assert_eq!(cf.energy_out_mwh, cf.energy_in_mwh * 0.5);
        assert_eq!(cf.electricity_cost, cf.energy_in_mwh * 30.0);
        assert_eq!(cf.capacity_revenue, 500_000.0);
        assert!((cf.net - (cf.revenue - cf.opex)).abs() < 1e-9);
    }

    #[test]
    fn crf_limits() {
        assert!((capital_recovery_factor(0.0, 20) - 0.05).abs() < 1e-12);
        // 8 % over 25 years
        assert!((capital_recovery_factor(0.08, 25) - 0.093679).abs() < 1e-6);
    }

    #[test]
    fn npv_with_no_cash_flow_is_minus_capex() {
        let config = PlantConfig {
            economics: laes_project::EconomicsConfig {
                price_offpeak_mwh: 0.0,
                price_onpeak_mwh: 0.0,
                ..Default::default()
            },
            ..PlantConfig::default()
        };
        let basis = CostBasis {
            maintenance_fraction: 0.0,
            insurance_fraction: 0.0,
            capacity_payment_per_kw: 0.0,
            ..CostBasis::default()
        };
        let report = evaluate(&config, inputs(), &basis).unwrap();
        assert_eq!(report.cashflow.net, 0.0);
        assert_eq!(report.npv, -report.capex.total);
        assert_eq!(report.payback_years, None);
    }

    #[test]
    fn zero_rte_has_no_lcos() {
        let config = PlantConfig::default();
        let report = evaluate(
            &config,
            EconomicsInputs {
                rte: 0.0,
                ..inputs()
            },
            &CostBasis::default(),
        )
        .unwrap();
        assert_eq!(report.lcos_per_mwh, None);
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        let mut config = PlantConfig::default();
        config.economics.project_years = 0;
        assert!(evaluate(&config, inputs(), &CostBasis::default()).is_err());
    }

    #[test]
    fn render_mentions_totals() {
        let config = PlantConfig::default();
        let report = evaluate(&config, inputs(), &CostBasis::default()).unwrap();
        let text = report.render(&config);
        assert!(text.contains("NPV (25 years)"));
        assert!(text.contains("LCOS"));
    }
}
