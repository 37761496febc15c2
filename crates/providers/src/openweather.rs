//! OpenWeatherMap provider — current conditions by city name.

use async_trait::async_trait;
use parley_core::error::ProviderError;
use parley_core::weather::{WeatherProvider, WeatherReport};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    units: String,
    client: reqwest::Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            units: "metric".into(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// "metric", "imperial" or "standard".
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    fn unit_symbol(&self) -> &'static str {
        match self.units.as_str() {
            "imperial" => "°F",
            "standard" => "K",
            _ => "°C",
        }
    }

    fn to_report(&self, data: ApiWeather) -> Result<WeatherReport, ProviderError> {
        let description = data
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ProviderError::MalformedResponse("No weather conditions in response".into()))?;

        Ok(WeatherReport {
            location: data.name,
            description,
            temperature: data.main.temp,
            temperature_unit: self.unit_symbol().to_string(),
            humidity: data.main.humidity,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn lookup(&self, location: &str) -> Result<WeatherReport, ProviderError> {
        debug!(provider = "openweathermap", location, "Fetching weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(crate::transport_error)?;

        let status = response.status().as_u16();

        if status == 401 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid OpenWeatherMap API key".into(),
            ));
        }

        if status == 404 {
            return Err(ProviderError::LocationNotFound(location.to_string()));
        }

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "OpenWeatherMap returned error");
            let message = serde_json::from_str::<ApiError>(&error_body)
                .map(|e| e.message)
                .unwrap_or(error_body);
            return Err(ProviderError::ApiError {
                status_code: status,
                message,
            });
        }

        let data: ApiWeather = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse weather response: {e}"))
        })?;

        self.to_report(data)
    }
}

// --- OpenWeatherMap API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiWeather {
    name: String,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    main: ApiMain,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
