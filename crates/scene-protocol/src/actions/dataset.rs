//! Dataset lifecycle payloads.

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// A dataset as supplied by the catalog surface.
///
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    /// Dataset identifier.
    #[serde(rename = "dataID")]
    pub data_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-text format hint ("GeoJSON", "3D Tiles", "GTFS", ...).
    #[serde(default)]
    pub format: String,
    /// Source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Source sub-layers (WMS / vector tile layer names).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,
    /// Per-source configuration overriding the descriptor-level fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SourceConfig>,
    /// Domain classification code ("bldg", "tran", ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    /// Initial visibility. Only an explicit `false` hides the layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Partial appearance overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Tree>,
}

impl DatasetDescriptor {
    /// Minimal descriptor, mostly for tests and fixtures.
    pub fn new(data_id: impl Into<String>, format: impl Into<String>, url: impl Into<String>) -> Self {
        let data_id = data_id.into();
        Self {
            name: data_id.clone(),
            data_id,
            format: format.into(),
            url: Some(url.into()),
            layers: None,
            config: None,
            type_code: None,
            visible: None,
            overrides: None,
        }
    }

    pub fn with_type_code(mut self, code: impl Into<String>) -> Self {
        self.type_code = Some(code.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_overrides(mut self, overrides: Tree) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Whether the layer starts hidden.
    pub fn starts_hidden(&self) -> bool {
        self.visible == Some(false)
    }
}

/// Nested per-source configuration. Each present field takes precedence over
/// the descriptor-level field of the same meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,
}

/// `addDatasetToScene` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDatasetRequest {
    pub dataset: DatasetDescriptor,
    /// Caller overrides layered over the descriptor's own overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Tree>,
}

/// `updateDatasetInScene` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDatasetRequest {
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub overrides: Tree,
}

/// `updateDatasetVisibility` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateVisibilityRequest {
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub hide: bool,
}

/// Payload of actions that name a single dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    #[serde(rename = "dataID")]
    pub data_id: String,
}

/// `updateDataCatalog` payload: ids currently in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCatalogUpdate {
    #[serde(rename = "dataIDs")]
    pub data_ids: Vec<String>,
}

/// `datasetOverridesUpdated` payload sent to a popup bound to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverridesUpdated {
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub overrides: Tree,
}
