//! Plot Layout Calculator
//!
//! Turns a plot specification into the Miyawaki layer/density breakdown that
//! clients render as the "3D design":
//! - `units`: plot size normalization to square meters
//! - `layers`: fixed four-layer partition of the plant population
//! - `timeline`: static growth timeline attached to every layout
//!
//! The calculation is pure. It holds no state and can be called from any
//! number of request handlers concurrently.

pub mod layers;
pub mod timeline;
pub mod units;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use layers::{partition_plants, LayerAllocation, Layers, MiyawakiLayer, LAYER_TABLE};
pub use timeline::GrowthTimeline;
pub use units::UnitType;

/// Miyawaki standard planting density (plants per m²)
pub const BASE_DENSITY_PER_SQM: f64 = 4.0;

/// Density multiplier for terrace plots (shallower usable soil depth)
pub const TERRACE_DENSITY_FACTOR: f64 = 0.7;

/// Default length/width ratio of the rectangle estimate (square)
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantingMethod {
    Ground,
    Terrace,
}

impl PlantingMethod {
    /// Effective planting density for this method (plants per m²)
    pub fn density_per_sqm(self) -> f64 {
        match self {
            PlantingMethod::Ground => BASE_DENSITY_PER_SQM,
            PlantingMethod::Terrace => BASE_DENSITY_PER_SQM * TERRACE_DENSITY_FACTOR,
        }
    }
}

/// Soil type of the plot. Drives soil guidance only; layout math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Sandy,
    Loam,
    Rocky,
}

impl SoilType {
    pub fn as_str(self) -> &'static str {
        match self {
            SoilType::Clay => "clay",
            SoilType::Sandy => "sandy",
            SoilType::Loam => "loam",
            SoilType::Rocky => "rocky",
        }
    }
}

/// Input to the layout calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpecification {
    /// Plot area expressed in `unit_type` squared
    pub plot_size: f64,
    #[serde(default)]
    pub unit_type: UnitType,
    pub planting_method: PlantingMethod,
    pub soil_type: SoilType,
    pub selected_species: Vec<String>,
    /// Length / width of the estimated rectangle
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
}

fn default_aspect_ratio() -> f64 {
    DEFAULT_ASPECT_RATIO
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotDimensions {
    pub area_meters: f64,
    pub estimated_length: f64,
    pub estimated_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantingStructure {
    pub total_plants: u64,
    pub density_per_sqm: f64,
}

/// Derived layout for one plot specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub plot_dimensions: PlotDimensions,
    pub planting_structure: PlantingStructure,
    pub layers: Layers,
    pub growth_timeline: GrowthTimeline,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid plot specification: {reason}")]
    InvalidSpecification { reason: String },
}

impl LayoutError {
    fn invalid(reason: impl Into<String>) -> Self {
        LayoutError::InvalidSpecification { reason: reason.into() }
    }
}

/// Compute the layer/density layout for a plot.
///
/// Algorithm:
/// 1. Convert `plot_size` to m²
/// 2. Estimate a rectangle from the area (square unless `aspect_ratio` != 1)
/// 3. Pick the density for the planting method
/// 4. `total_plants = round(area × density)`, or 0 with no species selected
/// 5. Partition plants across the four layers, remainder to `ground`
/// 6. Attach the static layer metadata and growth timeline
pub fn compute_layout(spec: &PlotSpecification) -> Result<LayoutResult, LayoutError> {
    if !spec.plot_size.is_finite() {
        return Err(LayoutError::invalid(format!(
            "plot_size must be finite, got {}",
            spec.plot_size
        )));
    }
    if spec.plot_size < 0.0 {
        return Err(LayoutError::invalid(format!(
            "plot_size must not be negative, got {}",
            spec.plot_size
        )));
    }
    if !spec.aspect_ratio.is_finite() || spec.aspect_ratio <= 0.0 {
        return Err(LayoutError::invalid(format!(
            "aspect_ratio must be a positive number, got {}",
            spec.aspect_ratio
        )));
    }

    // `+ 0.0` turns a -0.0 input into +0.0
    let area_meters = spec.unit_type.to_square_meters(spec.plot_size) + 0.0;
    if !area_meters.is_finite() {
        return Err(LayoutError::invalid("plot area overflows after unit conversion"));
    }

    let plot_dimensions = estimate_dimensions(area_meters, spec.aspect_ratio)?;

    let density_per_sqm = spec.planting_method.density_per_sqm();
    let total_plants = if spec.selected_species.is_empty() {
        0
    } else {
        let raw = (area_meters * density_per_sqm).round();
        // u64::MAX is not exactly representable; 2^64 is the first value that no longer fits
        if !raw.is_finite() || raw >= 18_446_744_073_709_551_616.0 {
            return Err(LayoutError::invalid("plant count exceeds supported range"));
        }
        raw as u64
    };

    Ok(LayoutResult {
        plot_dimensions,
        planting_structure: PlantingStructure {
            total_plants,
            density_per_sqm,
        },
        layers: partition_plants(total_plants),
        growth_timeline: GrowthTimeline::standard(),
    })
}

fn estimate_dimensions(area_meters: f64, aspect_ratio: f64) -> Result<PlotDimensions, LayoutError> {
    let (estimated_length, estimated_width) = if aspect_ratio == DEFAULT_ASPECT_RATIO {
        let side = area_meters.sqrt();
        (side, side)
    } else {
        ((area_meters * aspect_ratio).sqrt(), (area_meters / aspect_ratio).sqrt())
    };
    if !estimated_length.is_finite() || !estimated_width.is_finite() {
        return Err(LayoutError::invalid(format!(
            "aspect_ratio {} gives non-finite plot dimensions",
            aspect_ratio
        )));
    }

    Ok(PlotDimensions {
        area_meters,
        estimated_length,
        estimated_width,
    })
}
