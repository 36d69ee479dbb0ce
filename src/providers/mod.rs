//! External integrations behind provider traits
//!
//! Species lookup, weather and SMS delivery are mocked. Each concern is a
//! trait so a real client can be swapped in through `AppState` without
//! touching handlers. The layout calculator does not use any of them.

pub mod guidance;
pub mod sms;
pub mod species;
pub mod weather;

use thiserror::Error;

pub use sms::{MockSmsProvider, SmsProvider, SmsReceipt};
pub use species::{ClimateZone, MockSpeciesProvider, SpeciesProvider, SpeciesRecord, SpeciesReport};
pub use weather::{MockWeatherProvider, WeatherProvider, WeatherReport};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
