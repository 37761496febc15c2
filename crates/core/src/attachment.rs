//! File classification contract for prompt attachments.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content category inferred for an attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Sent to the model as inline image data
    Image { mime_type: String },
    /// Read as UTF-8 text and sent alongside the prompt
    Document { mime_type: String },
    /// Not something the model can be given
    Unrecognized,
}

impl AttachmentKind {
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            AttachmentKind::Image { mime_type } | AttachmentKind::Document { mime_type } => {
                Some(mime_type)
            }
            AttachmentKind::Unrecognized => None,
        }
    }
}

/// Infers an [`AttachmentKind`] from a file path.
pub trait FileClassifier: Send + Sync {
    fn classify(&self, path: &Path) -> AttachmentKind;
}
