//! Error types for the conversation layer.
//!
//! Turn-level problems never show up here; the dispatcher always answers
//! with text. These cover session bookkeeping only.

/// Errors from the session manager.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("intent cannot be empty")]
    EmptyIntent,
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}
