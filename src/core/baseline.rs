//! This module allocates site-wide area and energy to the old and new building zones, and splits
//! each zone's energy into end uses.

use crate::compare_floats::ratio_or;
use crate::core::measure::EndUse;
use crate::input::BuildingConfig;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EndUseBreakdown {
    pub hvac: f64,
    pub lighting: f64,
    pub other: f64,
    /// sub-share of `hvac`, not an additional bucket
    pub fan: f64,
}

impl EndUseBreakdown {
    fn for_zone(zone_energy: f64, building: &BuildingConfig) -> Self {
        let hvac = zone_energy * building.hvac_percent;

        Self {
            hvac,
            lighting: zone_energy * building.lighting_percent,
            other: zone_energy * building.other_percent,
            fan: hvac * building.fan_percent_of_hvac,
        }
    }

    pub fn end_use(&self, end_use: EndUse) -> f64 {
        match end_use {
            EndUse::Hvac => self.hvac,
            EndUse::Lighting => self.lighting,
            EndUse::Fan => self.fan,
        }
    }
}

impl std::ops::Add for EndUseBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            hvac: self.hvac + rhs.hvac,
            lighting: self.lighting + rhs.lighting,
            other: self.other + rhs.other,
            fan: self.fan + rhs.fan,
        }
    }
}

/// Quantities derived once from the building configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Baseline {
    pub exhibition_area: f64,
    pub old_building_area: f64,
    pub new_building_area: f64,
    pub effective_new_building_area: f64,
    pub exhibition_energy: f64,
    pub old_building_energy: f64,
    pub new_building_energy: f64,
    pub old_building: EndUseBreakdown,
    pub new_building: EndUseBreakdown,
    pub total: EndUseBreakdown,
}

impl Baseline {
    pub fn new(building: &BuildingConfig) -> Self {
        let exhibition_area = building.total_area * building.exhibition_percent;
        let old_building_area = exhibition_area * building.old_building_percent;
        let new_building_area = exhibition_area * building.new_building_percent;

        let exhibition_energy = building.total_site_energy * building.exhibition_percent;

        // energy is shared out by effective area, so new construction is allocated less energy
        // per sq ft than old
        let effective_old_building_area = old_building_area;
        let effective_new_building_area =
            new_building_area * building.new_building_efficiency_factor;
        let total_effective_area = effective_old_building_area + effective_new_building_area;

        // a zone with no share of the effective area takes no energy
        let old_building_energy =
            exhibition_energy * ratio_or(effective_old_building_area, total_effective_area, 0.);
        let new_building_energy =
            exhibition_energy * ratio_or(effective_new_building_area, total_effective_area, 0.);

        let old_building = EndUseBreakdown::for_zone(old_building_energy, building);
        let new_building = EndUseBreakdown::for_zone(new_building_energy, building);

        Self {
            exhibition_area,
            old_building_area,
            new_building_area,
            effective_new_building_area,
            exhibition_energy,
            old_building_energy,
            new_building_energy,
            old_building,
            new_building,
            total: old_building + new_building,
        }
    }

    pub fn old_building_eui(&self) -> f64 {
        ratio_or(self.old_building_energy, self.old_building_area, 0.)
    }

    pub fn new_building_eui(&self) -> f64 {
        ratio_or(self.new_building_energy, self.new_building_area, 0.)
    }

    /// Ratio of new-building EUI to old-building EUI, or 0 where the old-building EUI is 0.
    pub fn eui_ratio(&self) -> f64 {
        ratio_or(self.new_building_eui(), self.old_building_eui(), 0.)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaselineReport {
    pub total_area: f64,
    pub exhibition_area: f64,
    pub old_building_area: f64,
    pub new_building_area: f64,
    pub total_energy: f64,
    pub exhibition_energy: f64,
    pub old_building_energy: f64,
    pub new_building_energy: f64,
    pub eui: f64,
    pub new_building_efficiency_factor: f64,
    pub effective_new_building_area: f64,
    pub old_building_eui: f64,
    pub new_building_eui: f64,
    pub eui_ratio: f64,
    pub old_building_end_uses: EndUseBreakdown,
    pub new_building_end_uses: EndUseBreakdown,
    pub total_end_uses: EndUseBreakdown,
}
