//! Prompt router — weather lookup or AI completion, one provider call per prompt.
//!
//! Every failure is converted into a [`Reply`] here; nothing propagates past
//! `respond`.

use crate::attachment::{self, MimeClassifier};
use crate::context::ConversationContext;
use crate::weather_query::{extract_location, is_weather_query};
use parley_core::attachment::FileClassifier;
use parley_core::error::AttachmentError;
use parley_core::provider::{Provider, ProviderRequest};
use parley_core::weather::WeatherProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// Reply text when an attachment cannot be given to the model.
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type.";

/// Where a prompt is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Weather { location: String },
    Completion,
}

impl Route {
    pub fn for_prompt(prompt: &str) -> Self {
        if is_weather_query(prompt) {
            Route::Weather {
                location: extract_location(prompt),
            }
        } else {
            Route::Completion
        }
    }
}

/// The outcome of one routed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Formatted weather summary
    Weather(String),
    /// Model completion text
    Assistant(String),
    /// The attachment was not an image or text document; no provider was called
    Unsupported,
    /// A provider or attachment failure, rendered for the user
    Failed(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Weather(t) | Reply::Assistant(t) | Reply::Failed(t) => t,
            Reply::Unsupported => UNSUPPORTED_FILE_TYPE,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Weather(t) | Reply::Assistant(t) | Reply::Failed(t) => t,
            Reply::Unsupported => UNSUPPORTED_FILE_TYPE.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failed(_))
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Dispatches prompts to the weather provider or the AI provider.
///
/// Holds no conversation state: the caller passes its context in and appends
/// the finished exchange itself.
pub struct CompletionRouter {
    provider: Arc<dyn Provider>,
    weather: Arc<dyn WeatherProvider>,
    classifier: Arc<dyn FileClassifier>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl CompletionRouter {
    pub fn new(
        provider: Arc<dyn Provider>,
        weather: Arc<dyn WeatherProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            weather,
            classifier: Arc::new(MimeClassifier),
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FileClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Answer one prompt. Never fails; errors come back as [`Reply::Failed`].
    pub async fn respond(
        &self,
        context: &ConversationContext,
        prompt: &str,
        attachment: Option<&Path>,
    ) -> Reply {
        match Route::for_prompt(prompt) {
            Route::Weather { location } => self.respond_weather(context, &location).await,
            Route::Completion => self.respond_completion(context, prompt, attachment).await,
        }
    }

    async fn respond_weather(&self, context: &ConversationContext, location: &str) -> Reply {
        debug!(
            conversation = %context.id(),
            provider = self.weather.name(),
            location,
            "Routing to weather provider"
        );

        match self.weather.lookup(location).await {
            Ok(report) => Reply::Weather(report.to_string()),
            Err(e) => {
                error!(conversation = %context.id(), error = %e, "Weather lookup failed");
                Reply::Failed(format!("Error fetching weather: {e}"))
            }
        }
    }

    async fn respond_completion(
        &self,
        context: &ConversationContext,
        prompt: &str,
        attachment: Option<&Path>,
    ) -> Reply {
        let request = match self.build_request(context, prompt, attachment) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(conversation = %context.id(), "Unsupported attachment, skipping provider");
                return Reply::Unsupported;
            }
            Err(e) => {
                error!(conversation = %context.id(), error = %e, "Attachment could not be loaded");
                return Reply::Failed(format!("Error processing request: {e}"));
            }
        };

        debug!(
            conversation = %context.id(),
            provider = self.provider.name(),
            model = %request.model,
            has_media = request.media.is_some(),
            "Routing to completion provider"
        );

        match self.provider.complete(request).await {
            Ok(response) => Reply::Assistant(response.text),
            Err(e) => {
                error!(conversation = %context.id(), error = %e, "Completion failed");
                Reply::Failed(format!("Error processing request: {e}"))
            }
        }
    }

    /// Build the provider request. `Ok(None)` means the attachment is unsupported.
    fn build_request(
        &self,
        context: &ConversationContext,
        prompt: &str,
        attachment: Option<&Path>,
    ) -> Result<Option<ProviderRequest>, AttachmentError> {
        let mut request = ProviderRequest::text(&self.model, combined_prompt(context, prompt))
            .with_system(context.system_directive());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        if let Some(path) = attachment {
            let kind = self.classifier.classify(path);
            debug!(
                conversation = %context.id(),
                path = %path.display(),
                mime_type = kind.mime_type().unwrap_or("unknown"),
                "Classified attachment"
            );
            match attachment::load(path, &kind)? {
                Some(media) => request = request.with_media(media),
                None => return Ok(None),
            }
        }

        Ok(Some(request))
    }
}

/// The rendered history followed by the new user turn.
pub fn combined_prompt(context: &ConversationContext, prompt: &str) -> String {
    format!("{}User: {prompt}\n", context.formatted())
}
