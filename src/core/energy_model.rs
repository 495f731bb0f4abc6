use crate::core::baseline::{Baseline, BaselineReport};
use crate::core::financials::FinancialReport;
use crate::core::savings::{individual_savings, SavingsReport};
use crate::input::{BuildingConfig, CostFactors, InterventionConfig, InterventionSelection};
use tracing::{debug, warn};

/// The calculation engine. Baseline quantities are derived once on construction; every report
/// is then computed fresh from the engine's configuration and the caller's selection.
#[derive(Clone, Debug)]
pub struct EnergyModel {
    building: BuildingConfig,
    interventions: InterventionConfig,
    baseline: Baseline,
}

impl EnergyModel {
    pub fn new(building: BuildingConfig, interventions: InterventionConfig) -> Self {
        let baseline = Baseline::new(&building);
        debug!(
            old_building_energy = baseline.old_building_energy,
            new_building_energy = baseline.new_building_energy,
            "allocated exhibition energy between building zones"
        );

        Self {
            building,
            interventions,
            baseline,
        }
    }

    pub fn building(&self) -> &BuildingConfig {
        &self.building
    }

    pub fn interventions(&self) -> &InterventionConfig {
        &self.interventions
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn compute_baseline(&self) -> BaselineReport {
        let Self {
            building, baseline, ..
        } = self;

        BaselineReport {
            total_area: building.total_area,
            exhibition_area: baseline.exhibition_area,
            old_building_area: baseline.old_building_area,
            new_building_area: baseline.new_building_area,
            total_energy: building.total_site_energy,
            exhibition_energy: baseline.exhibition_energy,
            old_building_energy: baseline.old_building_energy,
            new_building_energy: baseline.new_building_energy,
            eui: building.eui,
            new_building_efficiency_factor: building.new_building_efficiency_factor,
            effective_new_building_area: baseline.effective_new_building_area,
            old_building_eui: baseline.old_building_eui(),
            new_building_eui: baseline.new_building_eui(),
            eui_ratio: baseline.eui_ratio(),
            old_building_end_uses: baseline.old_building,
            new_building_end_uses: baseline.new_building,
            total_end_uses: baseline.total,
        }
    }

    pub fn compute_savings(&self, selection: &InterventionSelection) -> SavingsReport {
        let individual = individual_savings(
            selection,
            &self.baseline,
            &self.building,
            &self.interventions,
        );
        let report = SavingsReport::aggregate(individual, &self.baseline, &self.building);

        if report.hvac_cap_applied {
            warn!(
                uncapped = report.hvac_savings_uncapped,
                capped = report.hvac_savings,
                "combined HVAC savings capped at 95% of baseline HVAC energy"
            );
        }
        if report.new_energy_use < 0. {
            warn!(
                new_energy_use = report.new_energy_use,
                "estimated savings exceed baseline site energy"
            );
        }

        report
    }

    pub fn compute_financials(
        &self,
        selection: &InterventionSelection,
        savings: &SavingsReport,
        cost_factors: &CostFactors,
    ) -> FinancialReport {
        FinancialReport::estimate(selection, savings, cost_factors, &self.baseline)
    }
}
