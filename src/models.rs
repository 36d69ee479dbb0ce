//! Persisted records and request bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::{LayoutResult, PlantingMethod, PlotSpecification, SoilType, UnitType, DEFAULT_ASPECT_RATIO};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Records that live in a [`crate::store::RecordStore`]
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

// ============================================================================
// Locations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationCreate {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl From<LocationCreate> for Location {
    fn from(req: LocationCreate) -> Self {
        Self {
            id: new_id(),
            latitude: req.latitude,
            longitude: req.longitude,
            address: req.address,
            city: req.city,
            state: req.state,
            country: req.country,
            created_at: Utc::now(),
        }
    }
}

impl Record for Location {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Plot designs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotDesign {
    pub id: String,
    pub user_id: String,
    pub location_id: String,
    pub plot_size: f64,
    pub unit_type: UnitType,
    pub planting_method: PlantingMethod,
    pub soil_type: SoilType,
    pub selected_species: Vec<String>,
    pub aspect_ratio: f64,
    /// Last computed layout for this plot
    pub layout_config: Option<LayoutResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlotDesignCreate {
    pub user_id: String,
    pub location_id: String,
    pub plot_size: f64,
    #[serde(default)]
    pub unit_type: UnitType,
    pub planting_method: PlantingMethod,
    pub soil_type: SoilType,
    pub selected_species: Vec<String>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

impl PlotDesignCreate {
    pub fn specification(&self) -> PlotSpecification {
        PlotSpecification {
            plot_size: self.plot_size,
            unit_type: self.unit_type,
            planting_method: self.planting_method,
            soil_type: self.soil_type,
            selected_species: self.selected_species.clone(),
            aspect_ratio: self.aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO),
        }
    }
}

impl PlotDesign {
    pub fn new(req: PlotDesignCreate, layout: LayoutResult) -> Self {
        let now = Utc::now();
        let aspect_ratio = req.aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO);
        Self {
            id: new_id(),
            user_id: req.user_id,
            location_id: req.location_id,
            plot_size: req.plot_size,
            unit_type: req.unit_type,
            planting_method: req.planting_method,
            soil_type: req.soil_type,
            selected_species: req.selected_species,
            aspect_ratio,
            layout_config: Some(layout),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn specification(&self) -> PlotSpecification {
        PlotSpecification {
            plot_size: self.plot_size,
            unit_type: self.unit_type,
            planting_method: self.planting_method,
            soil_type: self.soil_type,
            selected_species: self.selected_species.clone(),
            aspect_ratio: self.aspect_ratio,
        }
    }
}

impl Record for PlotDesign {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Plantation projects
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantationProject {
    pub id: String,
    pub user_id: String,
    pub plot_design_id: String,
    pub project_name: String,
    pub manager_name: String,
    pub manager_phone: String,
    /// planned, in_progress, monitoring, completed
    pub status: String,
    pub planted_date: Option<DateTime<Utc>>,
    pub weather_alerts: bool,
    pub iot_enabled: bool,
    pub maintenance_schedule: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantationProjectCreate {
    pub user_id: String,
    pub plot_design_id: String,
    pub project_name: String,
    pub manager_name: String,
    pub manager_phone: String,
    #[serde(default = "default_true")]
    pub weather_alerts: bool,
}

fn default_true() -> bool {
    true
}

impl From<PlantationProjectCreate> for PlantationProject {
    fn from(req: PlantationProjectCreate) -> Self {
        Self {
            id: new_id(),
            user_id: req.user_id,
            plot_design_id: req.plot_design_id,
            project_name: req.project_name,
            manager_name: req.manager_name,
            manager_phone: req.manager_phone,
            status: "planned".to_string(),
            planted_date: None,
            weather_alerts: req.weather_alerts,
            iot_enabled: false,
            maintenance_schedule: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Record for PlantationProject {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub project_id: String,
    /// weather, damage, maintenance
    pub alert_type: String,
    /// low, medium, high
    pub severity: String,
    pub message: String,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(project_id: &str, alert_type: &str, severity: &str, message: &str) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.to_string(),
            alert_type: alert_type.to_string(),
            severity: severity.to_string(),
            message: message.to_string(),
            resolved: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_create_defaults() {
        let req: PlotDesignCreate = serde_json::from_str(
            r#"{
                "user_id": "u1",
                "location_id": "l1",
                "plot_size": 100.0,
                "planting_method": "ground",
                "soil_type": "loam",
                "selected_species": ["a", "b"]
            }"#,
        )
        .unwrap();

        let spec = req.specification();
        assert_eq!(spec.unit_type, UnitType::Meter);
        assert_eq!(spec.aspect_ratio, DEFAULT_ASPECT_RATIO);
        assert_eq!(spec.selected_species.len(), 2);
    }

    #[test]
    fn test_project_defaults() {
        let req: PlantationProjectCreate = serde_json::from_str(
            r#"{
                "user_id": "u1",
                "plot_design_id": "p1",
                "project_name": "School forest",
                "manager_name": "A. Manager",
                "manager_phone": "+15550001111"
            }"#,
        )
        .unwrap();
        let project = PlantationProject::from(req);

        assert_eq!(project.status, "planned");
        assert!(project.weather_alerts);
        assert!(!project.iot_enabled);
        assert!(project.maintenance_schedule.is_empty());
        assert!(Uuid::parse_str(&project.id).is_ok());
    }
}
