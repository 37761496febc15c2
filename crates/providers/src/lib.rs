//! Provider implementations for Parley.
//!
//! - [`GeminiProvider`] implements `parley_core::Provider` over the Gemini
//!   `generateContent` REST endpoint.
//! - [`OpenWeatherProvider`] implements `parley_core::WeatherProvider` over
//!   the OpenWeatherMap current-weather endpoint.
//!
//! [`build_from_config`] wires both from an `AppConfig`.

pub mod gemini;
pub mod openweather;

pub use gemini::GeminiProvider;
pub use openweather::OpenWeatherProvider;

use parley_config::AppConfig;
use parley_core::error::ProviderError;
use std::time::Duration;

/// Build both providers from configuration.
///
/// Missing API keys are reported as `NotConfigured`.
pub fn build_from_config(
    config: &AppConfig,
) -> Result<(GeminiProvider, OpenWeatherProvider), ProviderError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let gemini_key = config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| ProviderError::NotConfigured("GEMINI_API_KEY is not set".into()))?;
    let weather_key = config
        .weather_api_key
        .as_deref()
        .ok_or_else(|| ProviderError::NotConfigured("WEATHER_API_KEY is not set".into()))?;

    let gemini = GeminiProvider::new(gemini_key, &config.model, timeout)?
        .with_base_url(&config.gemini.base_url);
    let weather = OpenWeatherProvider::new(weather_key, timeout)?
        .with_base_url(&config.weather.base_url)
        .with_units(&config.weather.units);

    Ok((gemini, weather))
}

/// Map a transport-level reqwest failure to a provider error.
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_gemini_key() {
        let config = AppConfig {
            weather_api_key: Some("w".into()),
            ..AppConfig::default()
        };
        let err = build_from_config(&config).err().unwrap();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn build_requires_weather_key() {
        let config = AppConfig {
            gemini_api_key: Some("g".into()),
            ..AppConfig::default()
        };
        let err = build_from_config(&config).err().unwrap();
        assert!(err.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn build_with_both_keys() {
        let config = AppConfig {
            gemini_api_key: Some("g".into()),
            weather_api_key: Some("w".into()),
            ..AppConfig::default()
        };
        let (gemini, weather) = build_from_config(&config).unwrap();
        assert_eq!(gemini.model(), "gemini-2.0-flash-lite");
        assert_eq!(weather.units(), "metric");
    }
}
