//! Miyawaki Forest Planner
//!
//! Backend for planning dense native-forest plantations.
//!
//! - `layout/`: pure plot layout calculator (unit conversion, density,
//!   four-layer partition, growth timeline)
//! - `providers/`: mock species, weather and SMS integrations behind traits
//! - `auth/`: accounts, password hashing and signed bearer tokens
//! - `store`: in-memory record collections
//! - `api_server`: Axum REST API (feature `api`)

pub mod layout;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod auth;
#[cfg(feature = "api")]
pub mod config;
#[cfg(feature = "api")]
pub mod models;
#[cfg(feature = "api")]
pub mod providers;
#[cfg(feature = "api")]
pub mod store;

// Re-export commonly used types
pub use layout::{
    compute_layout, LayoutError, LayoutResult, PlantingMethod, PlotSpecification, SoilType, UnitType,
};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
#[cfg(feature = "api")]
pub use config::ServerConfig;
