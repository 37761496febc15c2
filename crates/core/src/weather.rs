//! Weather provider trait and the report it produces.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Location name as resolved by the provider
    pub location: String,

    /// Short condition description, e.g. "light rain"
    pub description: String,

    /// Temperature in `temperature_unit`
    pub temperature: f64,

    /// Unit suffix, e.g. "°C"
    pub temperature_unit: String,

    /// Relative humidity in percent
    pub humidity: u32,
}

impl std::fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weather in {}: {}. Temperature: {}{}, Humidity: {}%",
            self.location, self.description, self.temperature, self.temperature_unit, self.humidity
        )
    }
}

/// A source of current weather conditions keyed by free-text location.
///
/// The location string is passed through unvalidated; rejecting unknown
/// places is the provider's job.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openweathermap").
    fn name(&self) -> &str;

    /// Look up current conditions for `location`.
    async fn lookup(&self, location: &str) -> std::result::Result<WeatherReport, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_summary_line() {
        let report = WeatherReport {
            location: "Paris".into(),
            description: "clear sky".into(),
            temperature: 21.5,
            temperature_unit: "°C".into(),
            humidity: 40,
        };
        assert_eq!(
            report.to_string(),
            "Weather in Paris: clear sky. Temperature: 21.5°C, Humidity: 40%"
        );
    }
}
