//! Provider trait — the abstraction over generative-AI backends.
//!
//! A Provider takes one text prompt, optionally accompanied by a single media
//! object (an image or a text blob), and returns a text completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;

/// Media embedded alongside the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Media {
    /// A decoded image: raw encoded bytes plus the format facts read from them.
    Image {
        mime_type: String,
        #[serde(skip)]
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    /// Text read from a document attachment.
    Text(String),
}

/// A single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.0-flash-lite")
    pub model: String,

    /// System instruction sent alongside the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The combined prompt text (context prefix + new user turn)
    pub prompt: String,

    /// Optional attachment content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,

    /// Temperature (0.0 = deterministic, 2.0 = most random)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl ProviderRequest {
    /// A text-only request with default sampling settings.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            media: None,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub text: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The router calls `complete()` exactly once per non-weather prompt without
/// knowing which backend is behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_defaults() {
        let req = ProviderRequest::text("gemini-2.0-flash-lite", "Hello");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.media.is_none());
        assert!(req.system.is_none());
    }

    #[test]
    fn request_with_text_media() {
        let req = ProviderRequest::text("m", "Summarize")
            .with_media(Media::Text("file body".into()))
            .with_system("Be brief");
        assert_eq!(req.media, Some(Media::Text("file body".into())));
        assert_eq!(req.system.as_deref(), Some("Be brief"));
    }

    #[test]
    fn image_bytes_are_not_serialized() {
        let media = Media::Image {
            mime_type: "image/png".into(),
            data: vec![1, 2, 3],
            width: 4,
            height: 2,
        };
        let json = serde_json::to_string(&media).unwrap();
        assert!(json.contains("image/png"));
        assert!(!json.contains("data"));
    }
}
