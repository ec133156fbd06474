//! Error types for the action layer.
//!
//! None of these escape a turn: the dispatcher turns each one into a reply.

/// Errors returned by `Action::run`.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Required slot missing: {slot}")]
    MissingRequiredSlot { slot: String, prompt: String },
    #[error("Collaborator failed: {0}")]
    Collaborator(String),
}

impl ActionError {
    pub fn missing(slot: &str, prompt: &str) -> Self {
        ActionError::MissingRequiredSlot {
            slot: slot.to_string(),
            prompt: prompt.to_string(),
        }
    }

    /// The clarifying prompt to show the user, if this error carries one.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            ActionError::MissingRequiredSlot { prompt, .. } => Some(prompt),
            ActionError::Collaborator(_) => None,
        }
    }
}
