//! This module turns energy savings into money, payback and CO2 figures.

use crate::compare_floats::ratio_or;
use crate::core::baseline::Baseline;
use crate::core::savings::SavingsReport;
use crate::core::units::{kbtu_to_kwh, kbtu_to_therm};
use crate::input::{CostFactors, InterventionSelection};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinancialReport {
    pub electricity_savings_kwh: f64,
    pub gas_savings_therm: f64,
    /// $/year
    pub annual_cost_savings: f64,
    pub electricity_cost_savings: f64,
    pub gas_cost_savings: f64,
    /// $
    pub implementation_cost: f64,
    /// years; infinite where there are no annual cost savings
    pub simple_payback: f64,
    /// metric tons/year
    pub co2_reduction: f64,
    pub electricity_co2_reduction: f64,
    pub gas_co2_reduction: f64,
}

impl FinancialReport {
    pub(crate) fn estimate(
        selection: &InterventionSelection,
        savings: &SavingsReport,
        cost_factors: &CostFactors,
        baseline: &Baseline,
    ) -> Self {
        let (electricity_savings_kbtu, gas_savings_kbtu) = savings
            .individual_savings
            .iter()
            .fold((0., 0.), |(electricity, gas), (measure, measure_savings)| {
                let split = measure.energy_source_split();
                (
                    electricity + measure_savings * split.electricity,
                    gas + measure_savings * split.gas,
                )
            });

        let electricity_savings_kwh =
            kbtu_to_kwh(electricity_savings_kbtu, cost_factors.kbtu_to_kwh);
        let gas_savings_therm = kbtu_to_therm(gas_savings_kbtu, cost_factors.kbtu_to_therm);

        let electricity_cost_savings = electricity_savings_kwh * cost_factors.elec_rate;
        let gas_cost_savings = gas_savings_therm * cost_factors.gas_rate;
        let annual_cost_savings = electricity_cost_savings + gas_cost_savings;

        let electricity_co2_reduction = electricity_savings_kwh * cost_factors.co2_factor_elec;
        let gas_co2_reduction = gas_savings_therm * cost_factors.co2_factor_gas;

        let implementation_cost = implementation_cost(selection, baseline);

        Self {
            electricity_savings_kwh,
            gas_savings_therm,
            annual_cost_savings,
            electricity_cost_savings,
            gas_cost_savings,
            implementation_cost,
            simple_payback: ratio_or(implementation_cost, annual_cost_savings, f64::INFINITY),
            co2_reduction: electricity_co2_reduction + gas_co2_reduction,
            electricity_co2_reduction,
            gas_co2_reduction,
        }
    }
}

/// Cost of installing the selected measures, from their per sq ft cost in each zone. LED
/// costs are charged on the requested adoption, not the increment over existing LEDs.
pub(crate) fn implementation_cost(selection: &InterventionSelection, baseline: &Baseline) -> f64 {
    selection
        .iter()
        .map(|(measure, adoption)| {
            let unit_cost = measure.unit_cost();
            baseline.old_building_area * unit_cost.old * adoption.old_fraction()
                + baseline.new_building_area * unit_cost.new * adoption.new_fraction()
        })
        .sum()
}
