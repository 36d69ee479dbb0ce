//! Native species recommendations
//!
//! The mock provider picks a climate zone from latitude and returns a small
//! curated list for that zone. Polar locations fall back to the temperate
//! list.

use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::layout::{MiyawakiLayer, SoilType};

/// Tropics boundary (Tropic of Cancer / Capricorn)
pub const TROPIC_LATITUDE: f64 = 23.5;

/// Polar circle boundary
pub const POLAR_LATITUDE: f64 = 66.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Tropical,
    Temperate,
    Polar,
}

impl ClimateZone {
    /// Zone from latitude. Both hemispheres are treated alike.
    pub fn from_latitude(latitude: f64) -> Self {
        let lat = latitude.abs();
        if lat < TROPIC_LATITUDE {
            ClimateZone::Tropical
        } else if lat > POLAR_LATITUDE {
            ClimateZone::Polar
        } else {
            ClimateZone::Temperate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    Tree,
    Shrub,
    Groundcover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: String,
    pub scientific_name: String,
    pub common_name: String,
    pub plant_type: PlantType,
    pub height_range: String,
    pub growth_rate: String,
    pub water_needs: String,
    pub soil_preferences: Vec<SoilType>,
    pub climate_zone: ClimateZone,
    pub benefits: Vec<String>,
    pub planting_season: String,
    pub care_instructions: String,
    /// 1 = ground ... 4 = canopy
    pub miyawaki_layer: u8,
    pub layer: MiyawakiLayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesReport {
    pub location: Coordinates,
    pub climate_zone: ClimateZone,
    pub species: Vec<SpeciesRecord>,
    pub total_count: usize,
}

#[axum::async_trait]
pub trait SpeciesProvider: Send + Sync {
    async fn native_species(
        &self,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> Result<SpeciesReport, ProviderError>;
}

struct SpeciesSeed {
    id: &'static str,
    scientific_name: &'static str,
    common_name: &'static str,
    plant_type: PlantType,
    height_range: &'static str,
    growth_rate: &'static str,
    water_needs: &'static str,
    soil_preferences: &'static [SoilType],
    benefits: &'static [&'static str],
    planting_season: &'static str,
    care_instructions: &'static str,
    miyawaki_layer: u8,
}

static TROPICAL: &[SpeciesSeed] = &[
    SpeciesSeed {
        id: "ficus-benghalensis",
        scientific_name: "Ficus benghalensis",
        common_name: "Banyan Tree",
        plant_type: PlantType::Tree,
        height_range: "15-30m",
        growth_rate: "fast",
        water_needs: "moderate",
        soil_preferences: &[SoilType::Loam, SoilType::Clay],
        benefits: &["Air purification", "Shade", "Wildlife habitat"],
        planting_season: "Monsoon",
        care_instructions: "Water regularly, prune dead branches",
        miyawaki_layer: 4,
    },
    SpeciesSeed {
        id: "azadirachta-indica",
        scientific_name: "Azadirachta indica",
        common_name: "Neem Tree",
        plant_type: PlantType::Tree,
        height_range: "10-20m",
        growth_rate: "moderate",
        water_needs: "low",
        soil_preferences: &[SoilType::Sandy, SoilType::Loam],
        benefits: &["Pest control", "Medicinal", "Air purification"],
        planting_season: "Monsoon",
        care_instructions: "Drought tolerant, minimal care needed",
        miyawaki_layer: 3,
    },
    SpeciesSeed {
        id: "ixora-coccinea",
        scientific_name: "Ixora coccinea",
        common_name: "Flame of the Woods",
        plant_type: PlantType::Shrub,
        height_range: "1-3m",
        growth_rate: "moderate",
        water_needs: "moderate",
        soil_preferences: &[SoilType::Loam, SoilType::Clay],
        benefits: &["Flowering", "Butterfly attraction", "Decorative"],
        planting_season: "Monsoon",
        care_instructions: "Regular watering, pruning after flowering",
        miyawaki_layer: 2,
    },
];

static TEMPERATE: &[SpeciesSeed] = &[
    SpeciesSeed {
        id: "quercus-robur",
        scientific_name: "Quercus robur",
        common_name: "English Oak",
        plant_type: PlantType::Tree,
        height_range: "20-40m",
        growth_rate: "slow",
        water_needs: "moderate",
        soil_preferences: &[SoilType::Loam, SoilType::Clay],
        benefits: &["Wildlife habitat", "Timber", "Carbon sequestration"],
        planting_season: "Spring",
        care_instructions: "Water in first year, minimal care after establishment",
        miyawaki_layer: 4,
    },
    SpeciesSeed {
        id: "cornus-sanguinea",
        scientific_name: "Cornus sanguinea",
        common_name: "Common Dogwood",
        plant_type: PlantType::Shrub,
        height_range: "3-6m",
        growth_rate: "moderate",
        water_needs: "moderate",
        soil_preferences: &[SoilType::Loam, SoilType::Clay],
        benefits: &["Berry production", "Wildlife food", "Autumn color"],
        planting_season: "Spring/Fall",
        care_instructions: "Prune in late winter, regular watering",
        miyawaki_layer: 2,
    },
];

impl SpeciesSeed {
    fn to_record(&self, climate_zone: ClimateZone) -> SpeciesRecord {
        SpeciesRecord {
            id: self.id.to_string(),
            scientific_name: self.scientific_name.to_string(),
            common_name: self.common_name.to_string(),
            plant_type: self.plant_type,
            height_range: self.height_range.to_string(),
            growth_rate: self.growth_rate.to_string(),
            water_needs: self.water_needs.to_string(),
            soil_preferences: self.soil_preferences.to_vec(),
            climate_zone,
            benefits: self.benefits.iter().map(|b| b.to_string()).collect(),
            planting_season: self.planting_season.to_string(),
            care_instructions: self.care_instructions.to_string(),
            miyawaki_layer: self.miyawaki_layer,
            layer: MiyawakiLayer::from_level(self.miyawaki_layer).unwrap_or(MiyawakiLayer::Ground),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockSpeciesProvider;

impl MockSpeciesProvider {
    pub fn species_for_zone(zone: ClimateZone, limit: usize) -> Vec<SpeciesRecord> {
        let (seeds, record_zone) = match zone {
            ClimateZone::Tropical => (TROPICAL, ClimateZone::Tropical),
            ClimateZone::Temperate | ClimateZone::Polar => (TEMPERATE, ClimateZone::Temperate),
        };
        seeds.iter().take(limit).map(|s| s.to_record(record_zone)).collect()
    }
}

#[axum::async_trait]
impl SpeciesProvider for MockSpeciesProvider {
    async fn native_species(
        &self,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> Result<SpeciesReport, ProviderError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ProviderError::InvalidRequest(format!(
                "coordinates out of range: ({}, {})",
                latitude, longitude
            )));
        }

        let climate_zone = ClimateZone::from_latitude(latitude);
        let species = Self::species_for_zone(climate_zone, limit);
        tracing::debug!(
            "Mock species lookup at ({}, {}) -> {:?}, {} species",
            latitude,
            longitude,
            climate_zone,
            species.len()
        );

        Ok(SpeciesReport {
            location: Coordinates { latitude, longitude },
            climate_zone,
            total_count: species.len(),
            species,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_climate_zones() {
        assert_eq!(ClimateZone::from_latitude(1.35), ClimateZone::Tropical);
        assert_eq!(ClimateZone::from_latitude(-12.0), ClimateZone::Tropical);
        assert_eq!(ClimateZone::from_latitude(51.5), ClimateZone::Temperate);
        assert_eq!(ClimateZone::from_latitude(-41.3), ClimateZone::Temperate);
        assert_eq!(ClimateZone::from_latitude(23.5), ClimateZone::Temperate);
        assert_eq!(ClimateZone::from_latitude(70.0), ClimateZone::Polar);
    }

    #[test]
    fn test_zone_lists() {
        let tropical = MockSpeciesProvider::species_for_zone(ClimateZone::Tropical, 20);
        assert_eq!(tropical.len(), 3);
        assert_eq!(tropical[0].common_name, "Banyan Tree");
        assert_eq!(tropical[0].layer, MiyawakiLayer::Canopy);

        let polar = MockSpeciesProvider::species_for_zone(ClimateZone::Polar, 20);
        assert_eq!(polar.len(), 2);
        assert!(polar.iter().all(|s| s.climate_zone == ClimateZone::Temperate));
    }

    #[tokio::test]
    async fn test_limit_and_range() {
        let provider = MockSpeciesProvider;
        let report = provider.native_species(12.97, 77.59, 1).await.unwrap();
        assert_eq!(report.total_count, 1);
        assert_eq!(report.climate_zone, ClimateZone::Tropical);

        assert!(provider.native_species(95.0, 0.0, 5).await.is_err());
    }
}
