//! Decode errors for inbound messages.

/// Errors raised while decoding an inbound message at the boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action {action} requires a payload")]
    MissingPayload { action: &'static str },

    #[error("Invalid payload for {action}: {reason}")]
    InvalidPayload { action: &'static str, reason: String },
}

impl DecodeError {
    /// Unknown actions come from newer host protocol versions and are ignored
    /// quietly; every other decode failure is worth a warning.
    pub fn is_unknown_action(&self) -> bool {
        matches!(self, DecodeError::UnknownAction(_))
    }
}
