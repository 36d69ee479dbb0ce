//! Growth timeline attached to every layout
//!
//! Keyed by the period since planting. The content does not depend on the
//! plot; it describes the typical trajectory of a Miyawaki forest.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthTimeline {
    pub year_1: String,
    pub year_2: String,
    pub year_3: String,
    pub year_5: String,
    pub year_10: String,
}

static STAGES: [(&str, &str); 5] = [
    ("year_1", "Establishment: saplings root in, 1m average height, daily watering for the first month"),
    ("year_2", "Rapid growth: canopy closes over the ground layer, weeding can stop"),
    ("year_3", "Self-sustaining: no watering or maintenance needed, 3-5m canopy"),
    ("year_5", "Young forest: distinct layers, wildlife returns, 8-10m canopy"),
    ("year_10", "Mature native forest: multi-layered structure with 15m+ canopy"),
];

impl GrowthTimeline {
    pub fn standard() -> Self {
        let text = |idx: usize| STAGES[idx].1.to_string();
        Self {
            year_1: text(0),
            year_2: text(1),
            year_3: text(2),
            year_5: text(3),
            year_10: text(4),
        }
    }

    /// (period label, description) pairs in chronological order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            (STAGES[0].0, self.year_1.as_str()),
            (STAGES[1].0, self.year_2.as_str()),
            (STAGES[2].0, self.year_3.as_str()),
            (STAGES[3].0, self.year_5.as_str()),
            (STAGES[4].0, self.year_10.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serialized_keys() {
        let timeline = GrowthTimeline::standard();
        let value = serde_json::to_value(&timeline).unwrap();
        for (label, text) in timeline.entries() {
            assert_eq!(value[label], text);
        }
    }
}
