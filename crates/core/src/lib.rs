//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley assistant.
//! This crate has **no I/O of its own**: it defines the conversation model and
//! the collaborator contracts (AI completion, weather lookup, file
//! classification) that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external service is a trait here. Implementations live in
//! `parley-providers` (HTTP) and `parley-agent` (MIME classification). This
//! keeps the routing core testable with stub collaborators.

pub mod attachment;
pub mod error;
pub mod message;
pub mod provider;
pub mod weather;

// Re-export key types at crate root for ergonomics
pub use attachment::{AttachmentKind, FileClassifier};
pub use error::{AttachmentError, ProviderError};
pub use message::{ConversationId, Message, Role};
pub use provider::{Media, Provider, ProviderRequest, ProviderResponse, Usage};
pub use weather::{WeatherProvider, WeatherReport};
