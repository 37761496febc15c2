//! `parley doctor` — Diagnose configuration.

use parley_config::AppConfig;
use parley_core::provider::Provider;
use parley_providers::GeminiProvider;
use std::time::Duration;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Parley Doctor — Configuration Check");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `parley onboard` to create one)");
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (model: {})", config.model);

            match config.gemini_api_key.as_deref() {
                Some(key) => {
                    println!("  ✅ Gemini API key configured");
                    let gemini = GeminiProvider::new(
                        key,
                        &config.model,
                        Duration::from_secs(config.request_timeout_secs),
                    )?
                    .with_base_url(&config.gemini.base_url);

                    let (line, ok) = gemini_reachability(&gemini).await;
                    println!("  {line}");
                    if !ok {
                        issues += 1;
                    }
                }
                None => {
                    println!("  ❌ No Gemini API key — set GEMINI_API_KEY");
                    issues += 1;
                }
            }

            if config.has_weather_key() {
                println!("  ✅ Weather API key configured");
            } else {
                println!("  ❌ No weather API key — set WEATHER_API_KEY");
                issues += 1;
            }

            println!(
                "  ✅ Uploads: up to {} bytes, {} file types",
                config.uploads.max_file_size,
                config.uploads.allowed_file_types.len()
            );
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Run the provider's health check and render the result as a report line.
async fn gemini_reachability(provider: &dyn Provider) -> (String, bool) {
    match provider.health_check().await {
        Ok(true) => (format!("✅ {} reachable, model available", provider.name()), true),
        Ok(false) => (
            format!("❌ {} answered but rejected the key or model", provider.name()),
            false,
        ),
        Err(e) => (format!("❌ {} unreachable: {e}", provider.name()), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::error::ProviderError;
    use parley_core::provider::{ProviderRequest, ProviderResponse};
    use std::sync::Mutex;

    struct HealthStub {
        outcome: Result<bool, ProviderError>,
        checks: Mutex<usize>,
    }

    impl HealthStub {
        fn new(outcome: Result<bool, ProviderError>) -> Self {
            Self {
                outcome,
                checks: Mutex::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Provider for HealthStub {
        fn name(&self) -> &str {
            "gemini"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            unreachable!("doctor never sends completions")
        }

        async fn health_check(&self) -> Result<bool, ProviderError> {
            *self.checks.lock().unwrap() += 1;
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn reachable_provider_passes() {
        let stub = HealthStub::new(Ok(true));
        let (line, ok) = gemini_reachability(&stub).await;
        assert!(ok);
        assert!(line.contains("gemini reachable"));
        assert_eq!(*stub.checks.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn rejected_key_is_an_issue() {
        let (line, ok) = gemini_reachability(&HealthStub::new(Ok(false))).await;
        assert!(!ok);
        assert!(line.contains("rejected"));
    }

    #[tokio::test]
    async fn network_failure_is_reported() {
        let stub = HealthStub::new(Err(ProviderError::Network("connection refused".into())));
        let (line, ok) = gemini_reachability(&stub).await;
        assert!(!ok);
        assert!(line.contains("unreachable"));
        assert!(line.contains("connection refused"));
    }

    #[tokio::test]
    async fn real_provider_against_closed_port_is_unreachable() {
        let gemini = GeminiProvider::new("test-key", "gemini-2.0-flash-lite", Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v1beta/models");
        let (line, ok) = gemini_reachability(&gemini).await;
        assert!(!ok);
        assert!(line.contains("unreachable"));
    }
}
