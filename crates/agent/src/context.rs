//! Bounded conversation log — the model's short-term memory.
//!
//! The log always starts with the system directive. Exchanges are appended as
//! user/assistant pairs, and the oldest pair is evicted once the log grows past
//! its capacity. The directive itself is never evicted.

use parley_core::message::{ConversationId, Message, Role};

/// Default capacity, system directive included.
pub const DEFAULT_MAX_MESSAGES: usize = 20;

/// Smallest usable capacity: the directive plus one exchange.
const MIN_MAX_MESSAGES: usize = 3;

/// Header placed before the rendered transcript.
const TRANSCRIPT_HEADER: &str = "Previous conversation:\n";

pub const DEFAULT_SYSTEM_DIRECTIVE: &str = "You are a helpful and knowledgeable AI assistant. \
You are direct and concise in your responses, while maintaining a friendly tone. \
You help users with their questions across various topics including coding, analysis, \
and general knowledge. If you're unsure about something, you'll acknowledge it honestly.";

/// A caller-owned, size-bounded conversation log.
///
/// Not synchronized: concurrent sessions should each hold their own context.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    id: ConversationId,
    messages: Vec<Message>,
    system_directive: String,
    max_messages: usize,
}

impl ConversationContext {
    /// Create a context seeded with `system_directive` and the default capacity.
    pub fn new(system_directive: impl Into<String>) -> Self {
        let system_directive = system_directive.into();
        Self {
            id: ConversationId::new(),
            messages: vec![Message::system(system_directive.clone())],
            system_directive,
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }

    /// Set the capacity. Values below 3 are raised to 3.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(MIN_MAX_MESSAGES);
        self.trim();
        self
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn system_directive(&self) -> &str {
        &self.system_directive
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Number of messages in the log, system directive included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when only the system directive is present.
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Number of retained user/assistant exchanges.
    pub fn exchanges(&self) -> usize {
        (self.messages.len() - 1) / 2
    }

    /// Record one completed exchange, evicting the oldest pairs if over capacity.
    pub fn append(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(assistant_text));
        self.trim();

        tracing::debug!(
            conversation = %self.id,
            messages = self.messages.len(),
            "Appended exchange"
        );
    }

    fn trim(&mut self) {
        while self.messages.len() > self.max_messages {
            // index 0 is the directive; 1 and 2 are the oldest user/assistant pair
            self.messages.drain(1..3);
        }
    }

    /// Render every non-system message as `Role: content` lines under a fixed header.
    pub fn formatted(&self) -> String {
        let mut out = String::from(TRANSCRIPT_HEADER);
        for msg in self.messages.iter().filter(|m| m.role() != Role::System) {
            out.push_str(msg.role().label());
            out.push_str(": ");
            out.push_str(msg.content());
            out.push('\n');
        }
        out
    }

    /// Read-only view of the log, directive first.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Drop every exchange, keeping only the system directive.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::system(self.system_directive.clone()));
        tracing::debug!(conversation = %self.id, "Context reset");
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_DIRECTIVE)
    }
}
