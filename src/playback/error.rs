use thiserror::Error;

use super::types::SessionState;

/// Errors surfaced by the playback controller to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The resource could not be fetched or decoded.
    #[error("failed to load {resource}: {reason}")]
    Load { resource: String, reason: String },

    /// The operation is not valid in the current session state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The media handle refused a transport command.
    #[error("media backend error: {0}")]
    Backend(String),
}

impl PlaybackError {
    pub fn load(resource: impl Into<String>, reason: impl ToString) -> Self {
        PlaybackError::Load {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
