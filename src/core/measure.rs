//! This module defines the fixed set of retrofit measures along with the static
//! lookup tables that belong to each of them.

use crate::core::units::percent_to_fraction;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use strum_macros::{Display, EnumCount, EnumIter};

#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumCount, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Measure {
    HvacRightsizing,
    HumidityControl,
    Vfd,
    LedConversion,
    WindowUpgrades,
}

/// The end use a measure draws its savings from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndUse {
    Hvac,
    Lighting,
    /// Fan energy is a sub-share of HVAC rather than a disjoint bucket.
    Fan,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergySourceSplit {
    pub electricity: f64,
    pub gas: f64,
}

/// Implementation cost in $/sq ft for each zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitCost {
    pub old: f64,
    pub new: f64,
}

impl Measure {
    pub fn display_name(&self) -> &'static str {
        match self {
            Measure::HvacRightsizing => "HVAC Optimization",
            Measure::HumidityControl => "Humidity/Temperature Control",
            Measure::Vfd => "VFDs",
            Measure::LedConversion => "LED Lighting",
            Measure::WindowUpgrades => "Window Upgrades",
        }
    }

    pub fn target_end_use(&self) -> EndUse {
        match self {
            Measure::HvacRightsizing | Measure::HumidityControl | Measure::WindowUpgrades => {
                EndUse::Hvac
            }
            Measure::Vfd => EndUse::Fan,
            Measure::LedConversion => EndUse::Lighting,
        }
    }

    /// Whether this measure's savings fall under the combined HVAC savings cap.
    pub fn is_hvac_adjacent(&self) -> bool {
        !matches!(self, Measure::LedConversion)
    }

    pub fn energy_source_split(&self) -> EnergySourceSplit {
        let (electricity, gas) = match self {
            Measure::HvacRightsizing => (0.40, 0.60),
            Measure::HumidityControl => (0.30, 0.70),
            Measure::Vfd => (1.0, 0.0),
            Measure::LedConversion => (1.0, 0.0),
            Measure::WindowUpgrades => (0.25, 0.75),
        };

        EnergySourceSplit { electricity, gas }
    }

    pub fn unit_cost(&self) -> UnitCost {
        let (old, new) = match self {
            Measure::HvacRightsizing => (15.00, 10.00),
            Measure::HumidityControl => (5.00, 3.00),
            Measure::Vfd => (2.00, 1.50),
            Measure::LedConversion => (8.00, 8.00),
            Measure::WindowUpgrades => (25.00, 10.00),
        };

        UnitCost { old, new }
    }
}

/// Adoption percentages (0-100) of a measure in the old and new zones.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct Adoption {
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub old: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub new: f64,
}

impl Adoption {
    pub fn new(old: f64, new: f64) -> Self {
        Self { old, new }
    }

    pub fn old_fraction(&self) -> f64 {
        percent_to_fraction(self.old)
    }

    pub fn new_fraction(&self) -> f64 {
        percent_to_fraction(self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[rstest]
    fn test_energy_source_splits_sum_to_one() {
        for measure in Measure::iter() {
            let split = measure.energy_source_split();
            assert_relative_eq!(split.electricity + split.gas, 1.0);
        }
    }

    #[rstest]
    #[case(Measure::Vfd)]
    #[case(Measure::LedConversion)]
    fn test_all_electric_measures(#[case] measure: Measure) {
        assert_eq!(measure.energy_source_split().gas, 0.0);
    }

    #[rstest]
    fn test_only_led_conversion_is_outside_hvac_cap() {
        let uncapped: Vec<Measure> = Measure::iter().filter(|m| !m.is_hvac_adjacent()).collect();
        assert_eq!(uncapped, vec![Measure::LedConversion]);
        assert_eq!(Measure::COUNT, 5);
    }

    #[rstest]
    #[case(Measure::HvacRightsizing, "hvac_rightsizing")]
    #[case(Measure::HumidityControl, "humidity_control")]
    #[case(Measure::Vfd, "vfd")]
    #[case(Measure::LedConversion, "led_conversion")]
    #[case(Measure::WindowUpgrades, "window_upgrades")]
    fn test_measure_keys(#[case] measure: Measure, #[case] key: &str) {
        assert_eq!(measure.to_string(), key);
        assert_eq!(
            serde_json::to_string(&measure).unwrap(),
            format!("\"{key}\"")
        );
    }

    #[rstest]
    fn test_target_end_uses() {
        assert_eq!(Measure::Vfd.target_end_use(), EndUse::Fan);
        assert_eq!(Measure::LedConversion.target_end_use(), EndUse::Lighting);
        assert_eq!(Measure::WindowUpgrades.target_end_use(), EndUse::Hvac);
    }

    #[rstest]
    fn test_adoption_defaults_missing_zone_to_zero() {
        let adoption: Adoption = serde_json::from_str(r#"{"old": 40}"#).unwrap();
        assert_eq!(adoption, Adoption::new(40., 0.));
        assert_eq!(adoption.new_fraction(), 0.);
    }

    #[rstest]
    fn test_adoption_validation_rejects_out_of_range() {
        assert!(Adoption::new(101., 0.).validate().is_err());
        assert!(Adoption::new(0., -1.).validate().is_err());
        assert!(Adoption::new(100., 0.).validate().is_ok());
    }
}
