use crate::compare_floats::{max_of_2, min_of_2, ratio_or};
use crate::core::baseline::Baseline;
use crate::core::measure::{Adoption, Measure};
use crate::core::units::percentage_of;
use crate::input::{BuildingConfig, InterventionConfig, InterventionSelection};
use indexmap::IndexMap;
use serde::Serialize;
use strum::IntoEnumIterator;

/// Combined savings from the HVAC-adjacent measures may not exceed this share of baseline HVAC
/// energy, as the measures overlap.
pub(crate) const HVAC_SAVINGS_CAP_FRACTION: f64 = 0.95;

/// Annual energy saved (kBtu/year) by a single measure at the given adoption.
pub(crate) fn measure_savings(
    measure: Measure,
    adoption: &Adoption,
    baseline: &Baseline,
    building: &BuildingConfig,
    interventions: &InterventionConfig,
) -> f64 {
    let end_use = measure.target_end_use();
    let factor = interventions.factor_for(measure);

    let (old_fraction, new_fraction) = match measure {
        // only conversion beyond the existing LED share counts
        Measure::LedConversion => (
            max_of_2(0., adoption.old_fraction() - building.current_led_percentage),
            max_of_2(0., adoption.new_fraction() - building.current_led_percentage),
        ),
        _ => (adoption.old_fraction(), adoption.new_fraction()),
    };

    baseline.old_building.end_use(end_use) * factor * old_fraction
        + baseline.new_building.end_use(end_use) * factor * new_fraction
}

/// Savings for every measure in fixed order, zero for measures missing from the selection.
pub(crate) fn individual_savings(
    selection: &InterventionSelection,
    baseline: &Baseline,
    building: &BuildingConfig,
    interventions: &InterventionConfig,
) -> IndexMap<Measure, f64> {
    Measure::iter()
        .map(|measure| {
            let savings = selection.get(measure).map_or(0., |adoption| {
                measure_savings(measure, adoption, baseline, building, interventions)
            });
            (measure, savings)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsReport {
    /// kBtu/year per measure, in the order measures are declared
    pub individual_savings: IndexMap<Measure, f64>,
    pub hvac_savings_uncapped: f64,
    pub hvac_savings: f64,
    pub hvac_cap_applied: bool,
    pub lighting_savings: f64,
    pub total_savings: f64,
    pub new_energy_use: f64,
    pub new_eui: f64,
    pub percent_savings: f64,
    pub baseline_eui: f64,
}

impl SavingsReport {
    pub(crate) fn aggregate(
        individual_savings: IndexMap<Measure, f64>,
        baseline: &Baseline,
        building: &BuildingConfig,
    ) -> Self {
        let hvac_savings_uncapped: f64 = individual_savings
            .iter()
            .filter(|(measure, _)| measure.is_hvac_adjacent())
            .map(|(_, savings)| savings)
            .sum();
        let lighting_savings = individual_savings
            .get(&Measure::LedConversion)
            .copied()
            .unwrap_or_default();

        let hvac_cap = HVAC_SAVINGS_CAP_FRACTION * baseline.total.hvac;
        let hvac_savings = min_of_2(hvac_savings_uncapped, hvac_cap);
        let total_savings = hvac_savings + lighting_savings;

        let new_energy_use = building.total_site_energy - total_savings;

        Self {
            individual_savings,
            hvac_savings_uncapped,
            hvac_savings,
            hvac_cap_applied: hvac_savings_uncapped > hvac_cap,
            lighting_savings,
            total_savings,
            new_energy_use,
            new_eui: ratio_or(new_energy_use, building.total_area, 0.),
            percent_savings: percentage_of(total_savings, building.total_site_energy),
            baseline_eui: building.eui,
        }
    }

    pub fn savings_for(&self, measure: Measure) -> f64 {
        self.individual_savings
            .get(&measure)
            .copied()
            .unwrap_or_default()
    }

    /// A measure's savings as a percentage of total site energy.
    pub fn percent_of_total_for(&self, measure: Measure, total_site_energy: f64) -> f64 {
        percentage_of(self.savings_for(measure), total_site_energy)
    }

    pub fn eui_reduction(&self) -> f64 {
        self.baseline_eui - self.new_eui
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn building() -> BuildingConfig {
        BuildingConfig::default()
    }

    #[fixture]
    fn interventions() -> InterventionConfig {
        InterventionConfig::default()
    }

    #[fixture]
    fn baseline(building: BuildingConfig) -> Baseline {
        Baseline::new(&building)
    }

    fn savings(
        measure: Measure,
        adoption: Adoption,
        baseline: &Baseline,
        building: &BuildingConfig,
        interventions: &InterventionConfig,
    ) -> f64 {
        measure_savings(measure, &adoption, baseline, building, interventions)
    }

    #[rstest]
    fn test_hvac_rightsizing(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        assert_relative_eq!(
            savings(
                Measure::HvacRightsizing,
                Adoption::new(75., 25.),
                &baseline,
                &building,
                &interventions
            ),
            14_401_711.836_368_598,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn test_vfd_targets_fan_energy(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        assert_relative_eq!(
            savings(
                Measure::Vfd,
                Adoption::new(100., 100.),
                &baseline,
                &building,
                &interventions
            ),
            baseline.total.fan * 0.40,
            max_relative = 1e-12
        );
    }

    #[rstest]
    #[case(Adoption::new(70., 70.))]
    #[case(Adoption::new(50., 0.))]
    #[case(Adoption::new(0., 65.))]
    fn test_led_conversion_at_or_below_existing_share_saves_nothing(
        #[case] adoption: Adoption,
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        assert_eq!(
            savings(
                Measure::LedConversion,
                adoption,
                &baseline,
                &building,
                &interventions
            ),
            0.
        );
    }

    #[rstest]
    fn test_led_conversion_counts_only_increment_over_existing_share(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        // 95% requested with 70% already LED leaves 25 points in the old zone, none in the new
        assert_relative_eq!(
            savings(
                Measure::LedConversion,
                Adoption::new(95., 60.),
                &baseline,
                &building,
                &interventions
            ),
            baseline.old_building.lighting * 0.70 * 0.25,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn test_missing_measures_report_zero(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        let selection = InterventionSelection::new().with(Measure::Vfd, Adoption::new(80., 40.));
        let individual = individual_savings(&selection, &baseline, &building, &interventions);

        assert_eq!(individual.len(), 5);
        assert_eq!(individual[&Measure::HvacRightsizing], 0.);
        assert_eq!(individual[&Measure::LedConversion], 0.);
        assert!(individual[&Measure::Vfd] > 0.);
        assert_eq!(
            individual.keys().copied().collect::<Vec<_>>(),
            Measure::iter().collect::<Vec<_>>()
        );
    }

    #[rstest]
    fn test_empty_selection_leaves_energy_use_unchanged(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        let individual = individual_savings(
            &InterventionSelection::new(),
            &baseline,
            &building,
            &interventions,
        );
        let report = SavingsReport::aggregate(individual, &baseline, &building);

        assert_eq!(report.total_savings, 0.);
        assert_eq!(report.new_energy_use, building.total_site_energy);
        assert_eq!(report.percent_savings, 0.);
        assert!(!report.hvac_cap_applied);
    }

    #[rstest]
    fn test_hvac_cap_binds_with_aggressive_factors(baseline: Baseline, building: BuildingConfig) {
        let interventions = InterventionConfig {
            hvac_rightsizing_factor: 0.9,
            humidity_control_factor: 0.5,
            window_upgrade_factor: 0.5,
            ..Default::default()
        };
        let all_in = Measure::iter()
            .map(|measure| (measure, Adoption::new(100., 100.)))
            .collect::<InterventionSelection>();
        let individual = individual_savings(&all_in, &baseline, &building, &interventions);
        let report = SavingsReport::aggregate(individual, &baseline, &building);

        assert!(report.hvac_cap_applied);
        assert!(report.hvac_savings_uncapped > report.hvac_savings);
        assert_relative_eq!(
            report.hvac_savings,
            0.95 * baseline.total.hvac,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            report.total_savings,
            report.hvac_savings + report.lighting_savings,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn test_percent_savings_never_decreases_with_adoption(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        for measure in Measure::iter() {
            let mut previous = 0.;
            for percent in (0..=100).step_by(10) {
                let selection = InterventionSelection::default_scenario()
                    .with(measure, Adoption::new(percent as f64, percent as f64));
                let individual =
                    individual_savings(&selection, &baseline, &building, &interventions);
                let report = SavingsReport::aggregate(individual, &baseline, &building);

                assert!(
                    report.percent_savings >= previous,
                    "percent savings fell for {measure} at {percent}%"
                );
                previous = report.percent_savings;
            }
        }
    }

    #[rstest]
    fn test_percent_of_total_and_eui_reduction(
        baseline: Baseline,
        building: BuildingConfig,
        interventions: InterventionConfig,
    ) {
        let selection =
            InterventionSelection::new().with(Measure::WindowUpgrades, Adoption::new(70., 0.));
        let individual = individual_savings(&selection, &baseline, &building, &interventions);
        let report = SavingsReport::aggregate(individual, &baseline, &building);

        assert_relative_eq!(
            report.percent_of_total_for(Measure::WindowUpgrades, building.total_site_energy),
            report.percent_savings,
            max_relative = 1e-12
        );
        assert_eq!(
            report.percent_of_total_for(Measure::Vfd, building.total_site_energy),
            0.
        );
        assert_relative_eq!(
            report.eui_reduction(),
            building.eui
                - (building.total_site_energy - report.total_savings) / building.total_area,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn test_empty_building_reports_zero_rates(interventions: InterventionConfig) {
        let building = BuildingConfig {
            total_area: 0.,
            total_site_energy: 0.,
            ..Default::default()
        };
        let baseline = Baseline::new(&building);
        let selection = InterventionSelection::default_scenario();
        let individual = individual_savings(&selection, &baseline, &building, &interventions);
        let report = SavingsReport::aggregate(individual, &baseline, &building);

        assert_eq!(report.total_savings, 0.);
        assert_eq!(report.new_energy_use, 0.);
        assert_eq!(report.new_eui, 0.);
        assert_eq!(report.percent_savings, 0.);
        assert!(!report.hvac_cap_applied);
    }
}
