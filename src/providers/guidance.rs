//! Static guidance content: soil preparation, project care timeline,
//! learning resources and the standing project alerts.

use serde::Serialize;

use crate::layout::SoilType;
use crate::models::Alert;

#[derive(Debug, Clone, Serialize)]
pub struct SoilPreparation {
    pub preparation: Vec<&'static str>,
    pub ph_adjustment: &'static str,
    pub nutrients: &'static str,
    pub drainage: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoilGuidance {
    pub soil_type: SoilType,
    pub guidance: SoilPreparation,
    pub miyawaki_tips: Vec<&'static str>,
}

const MIYAWAKI_TIPS: [&str; 4] = [
    "Create 1-meter deep planting pits",
    "Mix native soil with 30% organic matter",
    "Ensure proper drainage before planting",
    "Add mycorrhizal fungi for better root development",
];

pub fn soil_guidance(soil_type: SoilType) -> SoilGuidance {
    let guidance = match soil_type {
        SoilType::Clay => SoilPreparation {
            preparation: vec![
                "Add organic compost to improve drainage",
                "Mix in sand to reduce compaction",
                "Create raised beds for better drainage",
                "Add perlite or vermiculite for aeration",
            ],
            ph_adjustment: "Clay soil is often alkaline, add sulfur if needed",
            nutrients: "Rich in nutrients but may need phosphorus",
            drainage: "Poor drainage - needs improvement",
        },
        SoilType::Sandy => SoilPreparation {
            preparation: vec![
                "Add organic matter to retain moisture",
                "Mix in compost for nutrient retention",
                "Add clay to improve water holding capacity",
                "Use mulch to prevent erosion",
            ],
            ph_adjustment: "Often acidic, add lime if needed",
            nutrients: "Low in nutrients, needs regular fertilization",
            drainage: "Excellent drainage but may dry out quickly",
        },
        SoilType::Loam => SoilPreparation {
            preparation: vec![
                "Add compost to maintain fertility",
                "Light tilling to prepare planting area",
                "Test pH and adjust if needed",
                "Add mulch after planting",
            ],
            ph_adjustment: "Usually neutral, minimal adjustment needed",
            nutrients: "Well-balanced nutrients",
            drainage: "Good drainage and water retention",
        },
        SoilType::Rocky => SoilPreparation {
            preparation: vec![
                "Remove large rocks and debris",
                "Add significant amounts of topsoil",
                "Create terraced areas if on slopes",
                "Use raised beds for better growing conditions",
            ],
            ph_adjustment: "Varies widely, test and adjust accordingly",
            nutrients: "Usually low in nutrients, needs enrichment",
            drainage: "Can be poor or excellent depending on rock type",
        },
    };

    SoilGuidance {
        soil_type,
        guidance,
        miyawaki_tips: MIYAWAKI_TIPS.to_vec(),
    }
}

// ============================================================================
// Project care timeline
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Phase {
    pub phase: &'static str,
    pub duration: &'static str,
    pub tasks: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub month: u32,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectTimeline {
    pub project_id: String,
    pub phases: Vec<Phase>,
    pub milestones: Vec<Milestone>,
}

pub fn project_timeline(project_id: &str) -> ProjectTimeline {
    ProjectTimeline {
        project_id: project_id.to_string(),
        phases: vec![
            Phase {
                phase: "Preparation",
                duration: "2 weeks",
                tasks: vec![
                    "Site survey and soil testing",
                    "Soil preparation and amendment",
                    "Species selection and procurement",
                    "Layout marking and pit digging",
                ],
            },
            Phase {
                phase: "Planting",
                duration: "1 week",
                tasks: vec![
                    "Plant according to Miyawaki layers",
                    "Ensure proper spacing (0.5m x 0.5m)",
                    "Water thoroughly after planting",
                    "Apply mulch around plants",
                ],
            },
            Phase {
                phase: "Intensive Care",
                duration: "3 years",
                tasks: vec![
                    "Daily watering for first month",
                    "Weekly watering for next 6 months",
                    "Monthly monitoring and pruning",
                    "Weed control and pest management",
                ],
            },
            Phase {
                phase: "Monitoring",
                duration: "Ongoing",
                tasks: vec![
                    "Monthly health assessments",
                    "Seasonal pruning as needed",
                    "Weather-based care adjustments",
                    "Growth tracking and documentation",
                ],
            },
        ],
        milestones: vec![
            Milestone { month: 1, expected: "95% survival rate" },
            Milestone { month: 6, expected: "Visible growth and branching" },
            Milestone { month: 12, expected: "Forest floor coverage" },
            Milestone { month: 36, expected: "Self-sustaining ecosystem" },
        ],
    }
}

// ============================================================================
// Alerts
// ============================================================================

pub fn standing_alerts(project_id: &str) -> Vec<Alert> {
    vec![
        Alert::new(
            project_id,
            "weather",
            "medium",
            "Heavy rain expected tomorrow. Ensure proper drainage.",
        ),
        Alert::new(
            project_id,
            "maintenance",
            "low",
            "Monthly pruning due for shrub layer plants.",
        ),
    ]
}

// ============================================================================
// Learning resources
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseStudy {
    pub title: &'static str,
    pub description: &'static str,
    pub location: &'static str,
    pub size: &'static str,
    pub success_rate: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningResources {
    pub articles: Vec<Article>,
    pub videos: Vec<Video>,
    pub case_studies: Vec<CaseStudy>,
}

pub fn learning_resources() -> LearningResources {
    LearningResources {
        articles: vec![
            Article {
                title: "Understanding the Miyawaki Method",
                description: "Learn about the revolutionary forest restoration technique",
                url: "https://example.com/miyawaki-method",
                category: "basics",
            },
            Article {
                title: "Native Species Selection Guide",
                description: "How to choose the right plants for your region",
                url: "https://example.com/species-selection",
                category: "species",
            },
            Article {
                title: "Soil Preparation for Dense Forests",
                description: "Essential soil preparation techniques",
                url: "https://example.com/soil-prep",
                category: "soil",
            },
        ],
        videos: vec![
            Video {
                title: "Miyawaki Forest Creation Process",
                description: "Step-by-step video guide",
                url: "https://example.com/video1",
                duration: "15 minutes",
            },
            Video {
                title: "3 Years of Forest Growth Time-lapse",
                description: "See the transformation over time",
                url: "https://example.com/video2",
                duration: "5 minutes",
            },
        ],
        case_studies: vec![
            CaseStudy {
                title: "Urban Forest in Tokyo",
                description: "Successful city center forest restoration",
                location: "Tokyo, Japan",
                size: "500 sq meters",
                success_rate: "98%",
            },
            CaseStudy {
                title: "Bangalore Tech Park Forest",
                description: "Corporate campus forest implementation",
                location: "Bangalore, India",
                size: "2000 sq meters",
                success_rate: "96%",
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_soil_type_has_guidance() {
        for soil in [SoilType::Clay, SoilType::Sandy, SoilType::Loam, SoilType::Rocky] {
            let g = soil_guidance(soil);
            assert_eq!(g.soil_type, soil);
            assert_eq!(g.guidance.preparation.len(), 4);
            assert_eq!(g.miyawaki_tips.len(), 4);
        }
    }

    #[test]
    fn test_timeline_milestones_ordered() {
        let t = project_timeline("p1");
        assert_eq!(t.phases.len(), 4);
        assert!(t.milestones.windows(2).all(|w| w[0].month < w[1].month));
    }

    #[test]
    fn test_standing_alerts_unresolved() {
        let alerts = standing_alerts("p1");
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| !a.resolved && a.project_id == "p1"));
    }
}
