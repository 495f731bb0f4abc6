use crate::core::measure::{Adoption, Measure};
use crate::core::units::{KBTU_PER_KILOWATT_HOUR, KBTU_PER_THERM};
use anyhow::anyhow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::{BufReader, Read};

pub fn ingest_for_processing(json: impl Read) -> Result<Input, anyhow::Error> {
    let input: Input = serde_json::from_reader(BufReader::new(json))?;
    input.validate_ranges()?;

    Ok(input)
}

/// Everything a calculation run needs. Every bundle is optional in the JSON and falls back to
/// its documented defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct Input {
    pub building: BuildingConfig,
    pub interventions: InterventionConfig,
    pub cost_factors: CostFactors,
    pub selection: Option<InterventionSelection>,
}

impl Input {
    /// Range checks belong to ingestion only - the calculation engine itself takes whatever
    /// values it is given.
    pub(crate) fn validate_ranges(&self) -> anyhow::Result<()> {
        self.building
            .validate()
            .map_err(|e| anyhow!("Building configuration is out of range: {e}"))?;
        if let Some(selection) = &self.selection {
            for (measure, adoption) in selection.iter() {
                adoption.validate().map_err(|e| {
                    anyhow!("Adoption percentages for measure '{measure}' are out of range: {e}")
                })?;
            }
        }

        Ok(())
    }
}

/// Site-wide constants describing the building.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    /// in sq ft
    pub total_area: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub exhibition_percent: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub old_building_percent: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub new_building_percent: f64,
    /// in kBtu/year
    pub total_site_energy: f64,
    /// in kBtu/sq ft/year
    pub eui: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub hvac_percent: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub lighting_percent: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub other_percent: f64,
    /// fraction of lighting already converted to LED
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub current_led_percentage: f64,
    /// multiplier applied to new-building area when allocating energy between zones
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub new_building_efficiency_factor: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub fan_percent_of_hvac: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            total_area: 630_800.,
            exhibition_percent: 0.49,
            old_building_percent: 0.78,
            new_building_percent: 0.22,
            total_site_energy: 176_424_575.,
            eui: 279.7,
            hvac_percent: 0.85,
            lighting_percent: 0.05,
            other_percent: 0.10,
            current_led_percentage: 0.70,
            new_building_efficiency_factor: 0.85,
            fan_percent_of_hvac: 0.25,
        }
    }
}

/// Fraction of the targeted end use removed by each measure when fully implemented.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct InterventionConfig {
    pub hvac_rightsizing_factor: f64,
    pub humidity_control_factor: f64,
    pub vfd_factor: f64,
    pub led_conversion_factor: f64,
    pub window_upgrade_factor: f64,
}

impl InterventionConfig {
    pub fn factor_for(&self, measure: Measure) -> f64 {
        match measure {
            Measure::HvacRightsizing => self.hvac_rightsizing_factor,
            Measure::HumidityControl => self.humidity_control_factor,
            Measure::Vfd => self.vfd_factor,
            Measure::LedConversion => self.led_conversion_factor,
            Measure::WindowUpgrades => self.window_upgrade_factor,
        }
    }
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            hvac_rightsizing_factor: 0.30,
            humidity_control_factor: 0.10,
            vfd_factor: 0.40,
            led_conversion_factor: 0.70,
            window_upgrade_factor: 0.10,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct CostFactors {
    /// $/kWh
    pub elec_rate: f64,
    /// $/therm
    pub gas_rate: f64,
    pub kbtu_to_kwh: f64,
    pub kbtu_to_therm: f64,
    /// metric tons CO2 per kWh
    pub co2_factor_elec: f64,
    /// metric tons CO2 per therm
    pub co2_factor_gas: f64,
}

impl Default for CostFactors {
    fn default() -> Self {
        Self {
            elec_rate: 0.305,
            gas_rate: 2.51,
            kbtu_to_kwh: KBTU_PER_KILOWATT_HOUR,
            kbtu_to_therm: KBTU_PER_THERM,
            co2_factor_elec: 0.0002628,
            co2_factor_gas: 0.0001812,
        }
    }
}

/// Which measures are applied, and at what adoption in each zone. A measure without an entry
/// is not applied.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct InterventionSelection(IndexMap<Measure, Adoption>);

impl InterventionSelection {
    pub fn new() -> Self {
        Default::default()
    }

    /// A representative package of measures at typical adoption levels for each zone.
    pub fn default_scenario() -> Self {
        Self::new()
            .with(Measure::HvacRightsizing, Adoption::new(75., 25.))
            .with(Measure::HumidityControl, Adoption::new(90., 50.))
            .with(Measure::Vfd, Adoption::new(80., 40.))
            .with(Measure::LedConversion, Adoption::new(95., 60.))
            .with(Measure::WindowUpgrades, Adoption::new(70., 0.))
    }

    pub fn with(mut self, measure: Measure, adoption: Adoption) -> Self {
        self.insert(measure, adoption);
        self
    }

    pub fn insert(&mut self, measure: Measure, adoption: Adoption) -> Option<Adoption> {
        self.0.insert(measure, adoption)
    }

    pub fn get(&self, measure: Measure) -> Option<&Adoption> {
        self.0.get(&measure)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Measure, &Adoption)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Measure, Adoption)> for InterventionSelection {
    fn from_iter<T: IntoIterator<Item = (Measure, Adoption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    #[rstest]
    fn test_empty_object_takes_all_defaults() {
        let input = ingest_for_processing(Cursor::new("{}")).unwrap();

        assert_eq!(input.building, BuildingConfig::default());
        assert_eq!(input.interventions, InterventionConfig::default());
        assert_eq!(input.cost_factors, CostFactors::default());
        assert!(input.selection.is_none());
    }

    #[rstest]
    fn test_partial_bundles_fill_in_defaults() {
        let input = ingest_for_processing(Cursor::new(
            r#"{
                "building": {"total_area": 1000.0},
                "cost_factors": {"elec_rate": 0.2},
                "selection": {"vfd": {"old": 80, "new": 40}, "led_conversion": {"old": 95}}
            }"#,
        ))
        .unwrap();

        assert_eq!(input.building.total_area, 1000.);
        assert_eq!(input.building.exhibition_percent, 0.49);
        assert_eq!(input.cost_factors.elec_rate, 0.2);
        assert_eq!(input.cost_factors.gas_rate, 2.51);

        let selection = input.selection.unwrap();
        assert_eq!(selection.get(Measure::Vfd), Some(&Adoption::new(80., 40.)));
        assert_eq!(
            selection.get(Measure::LedConversion),
            Some(&Adoption::new(95., 0.))
        );
        assert_eq!(selection.get(Measure::HvacRightsizing), None);
    }

    #[rstest]
    fn test_unknown_measure_is_rejected() {
        assert!(
            ingest_for_processing(Cursor::new(r#"{"selection": {"solar_panels": {"old": 1}}}"#))
                .is_err()
        );
    }

    #[rstest]
    fn test_unknown_field_is_rejected() {
        assert!(ingest_for_processing(Cursor::new(r#"{"building": {"floors": 3}}"#)).is_err());
    }

    #[rstest]
    fn test_adoption_over_one_hundred_is_rejected() {
        let result =
            ingest_for_processing(Cursor::new(r#"{"selection": {"vfd": {"old": 120}}}"#));

        assert!(result.unwrap_err().to_string().contains("vfd"));
    }

    #[rstest]
    fn test_building_fraction_over_one_is_rejected() {
        assert!(
            ingest_for_processing(Cursor::new(r#"{"building": {"hvac_percent": 85}}"#)).is_err()
        );
    }

    #[rstest]
    fn test_default_scenario_covers_every_measure() {
        let selection = InterventionSelection::default_scenario();

        assert_eq!(selection.iter().count(), 5);
        assert_eq!(
            selection.get(Measure::WindowUpgrades),
            Some(&Adoption::new(70., 0.))
        );
    }

    #[rstest]
    fn test_factor_lookup() {
        let config = InterventionConfig::default();
        assert_eq!(config.factor_for(Measure::Vfd), 0.40);
        assert_eq!(config.factor_for(Measure::LedConversion), 0.70);
    }
}
