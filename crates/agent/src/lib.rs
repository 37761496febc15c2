//! Conversation context and prompt routing — the core of Parley.
//!
//! Each prompt goes through one dispatch:
//!
//! 1. **Classify** the prompt: weather question or general request
//! 2. **Weather**: extract a location and ask the weather provider
//! 3. **General**: prefix the rendered conversation, attach an optional
//!    file (image or text), and make one call to the AI provider
//! 4. **Return** a [`Reply`]; the caller decides what to append to its
//!    [`ConversationContext`]
//!
//! No state is kept between calls except what lives in the caller-owned
//! context.

pub mod attachment;
pub mod context;
pub mod router;
pub mod weather_query;

pub use attachment::{MimeClassifier, UploadPolicy};
pub use context::{ConversationContext, DEFAULT_MAX_MESSAGES, DEFAULT_SYSTEM_DIRECTIVE};
pub use router::{CompletionRouter, Reply, Route, UNSUPPORTED_FILE_TYPE};
pub use weather_query::{extract_location, is_weather_query};
