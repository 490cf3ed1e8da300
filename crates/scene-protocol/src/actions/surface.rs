//! Popup, modal and sibling-instance payloads.

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// `openPopup` payload. The popup may be bound to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenPopupRequest {
    #[serde(default, rename = "dataID", skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
}

/// `buildingSearchOverride` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSearchOverrideRequest {
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub overrides: Tree,
}

/// `highlightOverride` payload forwarded to the building-search instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightOverride {
    pub layer_id: String,
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub overrides: Tree,
}
