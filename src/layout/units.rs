//! Area unit normalization

use serde::{Deserialize, Serialize};

/// m² per ft²
pub const SQ_FEET_TO_SQ_METERS: f64 = 0.092903;

/// m² per in²
pub const SQ_INCH_TO_SQ_METERS: f64 = 0.00064516;

/// Unit a plot size is expressed in (the area is that unit squared)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Meter,
    Feet,
    Inch,
}

impl UnitType {
    /// Square meters per one squared unit
    pub fn square_meter_factor(self) -> f64 {
        match self {
            UnitType::Meter => 1.0,
            UnitType::Feet => SQ_FEET_TO_SQ_METERS,
            UnitType::Inch => SQ_INCH_TO_SQ_METERS,
        }
    }

    pub fn to_square_meters(self, plot_size: f64) -> f64 {
        match self {
            UnitType::Meter => plot_size,
            _ => plot_size * self.square_meter_factor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_meter_is_identity() {
        assert_eq!(UnitType::Meter.to_square_meters(123.456), 123.456);
    }

    #[test]
    fn test_factors() {
        assert_relative_eq!(UnitType::Feet.to_square_meters(1.0), 0.092903);
        assert_relative_eq!(UnitType::Inch.to_square_meters(1550.0031), 1.0, epsilon = 1e-6);
        // 144 in² = 1 ft²
        assert_relative_eq!(
            UnitType::Inch.to_square_meters(144.0),
            UnitType::Feet.to_square_meters(1.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&UnitType::Feet).unwrap(), "\"feet\"");
        let parsed: UnitType = serde_json::from_str("\"inch\"").unwrap();
        assert_eq!(parsed, UnitType::Inch);
    }
}
