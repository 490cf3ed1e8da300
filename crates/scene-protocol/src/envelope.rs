//! Message envelope.
//!
//! Every exchange between the host, this widget, its transient surfaces and
//! sibling plugin instances is a single `{action, payload?}` value.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// Message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Action tag.
    pub action: String,
    /// Action-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Message {
    /// Create a message with a serialized payload.
    pub fn new(action: impl Into<String>, payload: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: action.into(),
            payload: Some(serde_json::to_value(payload)?),
        })
    }

    /// Create a message with no payload.
    pub fn bare(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            payload: None,
        }
    }

    /// Decode an envelope from an arbitrary structured value.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        serde_json::from_value(value).map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))
    }

    /// Deserialize the payload into the schema for `action`.
    pub fn payload_as<T: DeserializeOwned>(&self, action: &'static str) -> Result<T, DecodeError> {
        let payload = self
            .payload
            .clone()
            .ok_or(DecodeError::MissingPayload { action })?;
        serde_json::from_value(payload).map_err(|e| DecodeError::InvalidPayload {
            action,
            reason: e.to_string(),
        })
    }
}

/// A message endpoint: where an inbound message came from, or where an
/// outbound one is routed.
///
/// Extension targets are symbolic; they are resolved to a live plugin
/// instance only when a message is actually sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Surface {
    /// The widget's own host UI panel.
    Ui,
    /// The transient popup.
    Popup,
    /// The transient modal (data catalog).
    Modal,
    /// A sibling plugin instance, by extension id.
    Extension(String),
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Ui => write!(f, "ui"),
            Surface::Popup => write!(f, "popup"),
            Surface::Modal => write!(f, "modal"),
            Surface::Extension(id) => write!(f, "extension:{}", id),
        }
    }
}
