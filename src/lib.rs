mod compare_floats;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;

use crate::core::baseline::BaselineReport;
use crate::core::energy_model::EnergyModel;
use crate::core::financials::FinancialReport;
use crate::core::measure::Measure;
use crate::core::savings::SavingsReport;
use crate::core::units::PERCENT_PER_UNIT;
use crate::errors::{OutputError, RetrofitError};
use crate::input::{ingest_for_processing, CostFactors, InterventionSelection};
use crate::output::Output;
use anyhow::Context;
use bitflags::bitflags;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Read;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Reference EUIs (kBtu/sq ft/year) that projected results are compared against.
pub const TYPICAL_MUSEUM_EUI: f64 = 215.;
pub const HIGH_PERFORMANCE_MUSEUM_EUI: f64 = 140.;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ProjectFlags: u8 {
        /// Use the preset scenario when the input does not contain a selection.
        const DEFAULT_SCENARIO = 0b1;
        /// Also write out the end use breakdown for each zone.
        const DETAILED_OUTPUT = 0b10;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationResults {
    pub selection: InterventionSelection,
    pub baseline: BaselineReport,
    pub savings: SavingsReport,
    pub financials: FinancialReport,
}

#[instrument(skip_all)]
pub fn run_project(
    input: impl Read,
    output: impl Output,
    flags: &ProjectFlags,
) -> Result<CalculationResults, RetrofitError> {
    let input = ingest_for_processing(input).map_err(RetrofitError::InvalidRequest)?;

    let selection = match input.selection {
        Some(selection) => selection,
        None if flags.contains(ProjectFlags::DEFAULT_SCENARIO) => {
            debug!("no selection in input, using the default scenario");
            InterventionSelection::default_scenario()
        }
        None => InterventionSelection::new(),
    };

    let model = EnergyModel::new(input.building, input.interventions);
    let results = calculate(&model, selection, &input.cost_factors);

    if !output.is_noop() {
        write_output_files(&output, &model, &results, flags).map_err(OutputError::new)?;
    }

    Ok(results)
}

pub fn calculate(
    model: &EnergyModel,
    selection: InterventionSelection,
    cost_factors: &CostFactors,
) -> CalculationResults {
    let baseline = model.compute_baseline();
    let savings = model.compute_savings(&selection);
    let financials = model.compute_financials(&selection, &savings, cost_factors);

    CalculationResults {
        selection,
        baseline,
        savings,
        financials,
    }
}

fn write_output_files(
    output: &impl Output,
    model: &EnergyModel,
    results: &CalculationResults,
    flags: &ProjectFlags,
) -> anyhow::Result<()> {
    write_key_value_file(output, "baseline", &baseline_rows(&results.baseline))?;
    if flags.contains(ProjectFlags::DETAILED_OUTPUT) {
        write_end_use_breakdown_file(output, &results.baseline)?;
    }
    write_savings_file(output, model, &results.savings)?;
    write_key_value_file(output, "summary", &summary_rows(model, results))?;

    Ok(())
}

type KeyValueRow = (&'static str, f64, &'static str);

fn baseline_rows(baseline: &BaselineReport) -> Vec<KeyValueRow> {
    vec![
        ("Total area", baseline.total_area, "[sq ft]"),
        ("Exhibition area", baseline.exhibition_area, "[sq ft]"),
        ("Old building exhibition area", baseline.old_building_area, "[sq ft]"),
        ("New building exhibition area", baseline.new_building_area, "[sq ft]"),
        ("Total energy", baseline.total_energy, "[kBtu/year]"),
        ("Exhibition energy", baseline.exhibition_energy, "[kBtu/year]"),
        ("Old building energy", baseline.old_building_energy, "[kBtu/year]"),
        ("New building energy", baseline.new_building_energy, "[kBtu/year]"),
        ("EUI", baseline.eui, "[kBtu/sq ft/year]"),
        (
            "New building efficiency factor",
            baseline.new_building_efficiency_factor,
            "[ratio]",
        ),
        (
            "Effective new building area",
            baseline.effective_new_building_area,
            "[sq ft]",
        ),
        ("Old building EUI", baseline.old_building_eui, "[kBtu/sq ft/year]"),
        ("New building EUI", baseline.new_building_eui, "[kBtu/sq ft/year]"),
        ("EUI ratio (new/old)", baseline.eui_ratio, "[ratio]"),
    ]
}

fn summary_rows(model: &EnergyModel, results: &CalculationResults) -> Vec<KeyValueRow> {
    let CalculationResults {
        savings,
        financials,
        ..
    } = results;

    vec![
        ("Total savings", savings.total_savings, "[kBtu/year]"),
        ("Percent savings", savings.percent_savings, "[%]"),
        ("New energy use", savings.new_energy_use, "[kBtu/year]"),
        ("Baseline EUI", savings.baseline_eui, "[kBtu/sq ft/year]"),
        ("New EUI", savings.new_eui, "[kBtu/sq ft/year]"),
        ("EUI reduction", savings.eui_reduction(), "[kBtu/sq ft/year]"),
        ("Typical museum EUI", TYPICAL_MUSEUM_EUI, "[kBtu/sq ft/year]"),
        (
            "High performance museum EUI",
            HIGH_PERFORMANCE_MUSEUM_EUI,
            "[kBtu/sq ft/year]",
        ),
        (
            "New building efficiency improvement",
            (1. - model.building().new_building_efficiency_factor) * PERCENT_PER_UNIT,
            "[%]",
        ),
        ("Annual cost savings", financials.annual_cost_savings, "[$/year]"),
        ("Electricity savings", financials.electricity_cost_savings, "[$/year]"),
        ("Natural gas savings", financials.gas_cost_savings, "[$/year]"),
        ("Implementation cost estimate", financials.implementation_cost, "[$]"),
        ("Simple payback", financials.simple_payback, "[years]"),
        ("CO2 reduction", financials.co2_reduction, "[metric tons/year]"),
        (
            "Electricity CO2 reduction",
            financials.electricity_co2_reduction,
            "[metric tons/year]",
        ),
        (
            "Natural gas CO2 reduction",
            financials.gas_co2_reduction,
            "[metric tons/year]",
        ),
    ]
}

fn write_key_value_file(
    output: &impl Output,
    output_key: &str,
    rows: &[KeyValueRow],
) -> anyhow::Result<()> {
    info!("writing out to {output_key}");
    let writer = output.writer_for_location_key(output_key, "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(["Quantity", "Value", "Unit"])?;
    for &(quantity, value, unit) in rows {
        writer.write_record([quantity, value.to_string().as_str(), unit])?;
    }

    writer
        .flush()
        .with_context(|| format!("Could not flush out {output_key}"))?;

    Ok(())
}

fn write_end_use_breakdown_file(
    output: &impl Output,
    baseline: &BaselineReport,
) -> anyhow::Result<()> {
    let output_key = "end_use_breakdown";
    info!("writing out to {output_key}");
    let writer = output.writer_for_location_key(output_key, "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(["End use", "Old building", "New building", "Total"])?;
    writer.write_record(["", "[kBtu/year]", "[kBtu/year]", "[kBtu/year]"])?;

    let old = &baseline.old_building_end_uses;
    let new = &baseline.new_building_end_uses;
    let total = &baseline.total_end_uses;
    for (end_use, values) in [
        ("HVAC", [old.hvac, new.hvac, total.hvac]),
        ("Lighting", [old.lighting, new.lighting, total.lighting]),
        ("Other", [old.other, new.other, total.other]),
        // part of HVAC, so not summed with the rows above
        ("Fans (within HVAC)", [old.fan, new.fan, total.fan]),
    ] {
        let mut row = vec![end_use.to_string()];
        row.extend(values.iter().map(|value| value.to_string()));
        writer.write_record(&row)?;
    }

    writer
        .flush()
        .with_context(|| format!("Could not flush out {output_key}"))?;

    Ok(())
}

fn write_savings_file(
    output: &impl Output,
    model: &EnergyModel,
    savings: &SavingsReport,
) -> anyhow::Result<()> {
    let output_key = "savings";
    info!("writing out to {output_key}");
    let writer = output.writer_for_location_key(output_key, "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(["Measure", "Energy savings", "Percent of total"])?;
    writer.write_record(["", "[kBtu/year]", "[%]"])?;

    let total_site_energy = model.building().total_site_energy;
    for measure in Measure::iter() {
        writer.write_record([
            measure.display_name().to_string(),
            savings.savings_for(measure).to_string(),
            savings
                .percent_of_total_for(measure, total_site_energy)
                .to_string(),
        ])?;
    }
    writer.write_record([
        "Total".to_string(),
        savings.total_savings.to_string(),
        savings.percent_savings.to_string(),
    ])?;

    writer
        .flush()
        .with_context(|| format!("Could not flush out {output_key}"))?;

    Ok(())
}
