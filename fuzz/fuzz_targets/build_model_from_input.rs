#![no_main]

use libfuzzer_sys::fuzz_target;
use retrofit_savings::calculate;
use retrofit_savings::core::energy_model::EnergyModel;
use retrofit_savings::input::Input;

fuzz_target!(|input: Input| {
    let model = EnergyModel::new(input.building, input.interventions);
    let _ = calculate(
        &model,
        input.selection.unwrap_or_default(),
        &input.cost_factors,
    );
});
