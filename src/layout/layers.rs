//! Miyawaki vertical layers
//!
//! Four fixed strata with fixed population shares. Plant counts are
//! partitioned in integer arithmetic so the per-layer counts always add up
//! to the plot total; the rounding remainder goes to the ground layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiyawakiLayer {
    Canopy,
    SubCanopy,
    Shrub,
    Ground,
}

impl MiyawakiLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            MiyawakiLayer::Canopy => "canopy",
            MiyawakiLayer::SubCanopy => "sub_canopy",
            MiyawakiLayer::Shrub => "shrub",
            MiyawakiLayer::Ground => "ground",
        }
    }

    /// Map the 1-4 `miyawaki_layer` number used by species records
    /// (1 = ground ... 4 = canopy)
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(MiyawakiLayer::Ground),
            2 => Some(MiyawakiLayer::Shrub),
            3 => Some(MiyawakiLayer::SubCanopy),
            4 => Some(MiyawakiLayer::Canopy),
            _ => None,
        }
    }
}

/// Static description of one layer
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub layer: MiyawakiLayer,
    pub height_range: &'static str,
    /// Share of the population in whole percent
    pub percent: u64,
    pub species_ratio: f64,
    pub color: &'static str,
}

/// Canopy first, ground last. Percentages add up to 100.
pub static LAYER_TABLE: &[LayerSpec] = &[
    LayerSpec { layer: MiyawakiLayer::Canopy, height_range: "15-30m", percent: 10, species_ratio: 0.1, color: "#1b5e20" },
    LayerSpec { layer: MiyawakiLayer::SubCanopy, height_range: "5-15m", percent: 20, species_ratio: 0.2, color: "#388e3c" },
    LayerSpec { layer: MiyawakiLayer::Shrub, height_range: "1-5m", percent: 30, species_ratio: 0.3, color: "#7cb342" },
    LayerSpec { layer: MiyawakiLayer::Ground, height_range: "0-1m", percent: 40, species_ratio: 0.4, color: "#c0ca33" },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerAllocation {
    pub height_range: String,
    pub plant_count: u64,
    pub species_ratio: f64,
    pub color: String,
}

impl LayerAllocation {
    fn from_spec(spec: &LayerSpec, plant_count: u64) -> Self {
        Self {
            height_range: spec.height_range.to_string(),
            plant_count,
            species_ratio: spec.species_ratio,
            color: spec.color.to_string(),
        }
    }
}

/// Per-layer allocations, serialized as an object in canopy → ground order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layers {
    pub canopy: LayerAllocation,
    pub sub_canopy: LayerAllocation,
    pub shrub: LayerAllocation,
    pub ground: LayerAllocation,
}

impl Layers {
    pub fn get(&self, layer: MiyawakiLayer) -> &LayerAllocation {
        match layer {
            MiyawakiLayer::Canopy => &self.canopy,
            MiyawakiLayer::SubCanopy => &self.sub_canopy,
            MiyawakiLayer::Shrub => &self.shrub,
            MiyawakiLayer::Ground => &self.ground,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MiyawakiLayer, &LayerAllocation)> {
        LAYER_TABLE.iter().map(move |spec| (spec.layer, self.get(spec.layer)))
    }

    pub fn total_plants(&self) -> u64 {
        self.iter().map(|(_, l)| l.plant_count).sum()
    }

    /// Sum of species ratios in canopy → ground order (exactly 1.0)
    pub fn ratio_sum(&self) -> f64 {
        self.iter().map(|(_, l)| l.species_ratio).sum()
    }
}

/// Split `total_plants` across the four layers.
///
/// Each layer gets `floor(total × percent / 100)`; whatever is left over
/// after flooring is added to the ground layer.
pub fn partition_plants(total_plants: u64) -> Layers {
    // u128 so total × percent cannot overflow for any u64 total
    let floors: Vec<u64> = LAYER_TABLE
        .iter()
        .map(|spec| (total_plants as u128 * spec.percent as u128 / 100) as u64)
        .collect();
    let remainder = total_plants - floors.iter().sum::<u64>();

    let allocation = |idx: usize| {
        let count = if LAYER_TABLE[idx].layer == MiyawakiLayer::Ground {
            floors[idx] + remainder
        } else {
            floors[idx]
        };
        LayerAllocation::from_spec(&LAYER_TABLE[idx], count)
    };

    Layers {
        canopy: allocation(0),
        sub_canopy: allocation(1),
        shrub: allocation(2),
        ground: allocation(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_percentages_total_100() {
        assert_eq!(LAYER_TABLE.iter().map(|s| s.percent).sum::<u64>(), 100);
        for spec in LAYER_TABLE {
            assert_eq!(spec.species_ratio, spec.percent as f64 / 100.0);
        }
    }

    #[test]
    fn test_ratio_sum_is_exact() {
        let layers = partition_plants(400);
        assert_eq!(layers.ratio_sum(), 1.0);
    }

    #[test]
    fn test_even_partition() {
        let layers = partition_plants(400);
        assert_eq!(layers.canopy.plant_count, 40);
        assert_eq!(layers.sub_canopy.plant_count, 80);
        assert_eq!(layers.shrub.plant_count, 120);
        assert_eq!(layers.ground.plant_count, 160);
    }

    #[test]
    fn test_remainder_goes_to_ground() {
        // floors: 0, 1, 2, 2 = 5 → remainder 2
        let layers = partition_plants(7);
        assert_eq!(layers.canopy.plant_count, 0);
        assert_eq!(layers.sub_canopy.plant_count, 1);
        assert_eq!(layers.shrub.plant_count, 2);
        assert_eq!(layers.ground.plant_count, 4);
    }

    proptest! {
        #[test]
        fn partition_keeps_every_plant(total in any::<u64>()) {
            let layers = partition_plants(total);
            let floor = |percent: u64| (total as u128 * percent as u128 / 100) as u64;

            prop_assert_eq!(layers.total_plants(), total);
            prop_assert_eq!(layers.canopy.plant_count, floor(10));
            prop_assert_eq!(layers.sub_canopy.plant_count, floor(20));
            prop_assert_eq!(layers.shrub.plant_count, floor(30));
            prop_assert!(layers.ground.plant_count >= floor(40));
        }
    }

    #[test]
    fn test_partition_invariant_large_total() {
        let total = u64::MAX;
        assert_eq!(partition_plants(total).total_plants(), total);
    }

    #[test]
    fn test_layer_levels() {
        assert_eq!(MiyawakiLayer::from_level(4), Some(MiyawakiLayer::Canopy));
        assert_eq!(MiyawakiLayer::from_level(1), Some(MiyawakiLayer::Ground));
        assert_eq!(MiyawakiLayer::from_level(0), None);
    }

    #[test]
    fn test_serialized_order() {
        let json = serde_json::to_string(&partition_plants(10)).unwrap();
        let canopy = json.find("canopy").unwrap();
        let sub_canopy = json.find("sub_canopy").unwrap();
        let shrub = json.find("shrub").unwrap();
        let ground = json.find("\"ground\"").unwrap();
        assert!(canopy < sub_canopy && sub_canopy < shrub && shrub < ground);
    }
}
