//! Camera payloads.

use serde::{Deserialize, Serialize};

/// `flyTo` payload.
///
/// Without `height` the camera altitude is derived from the sampled terrain
/// height at (`lng`, `lat`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyToRequest {
    #[serde(default, rename = "dataID", skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
    pub lng: f64,
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
}
