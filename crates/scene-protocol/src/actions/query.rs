//! Read-only snapshot queries.

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// Reply to `findLayerByDataID` and `getOverriddenLayerByDataID`.
///
/// `layer_id` and `layer` are absent when the dataset is not in the scene or
/// the host no longer knows the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerQueryResponse {
    #[serde(rename = "dataID")]
    pub data_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Tree>,
}

/// Reply to `getSelection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
}
