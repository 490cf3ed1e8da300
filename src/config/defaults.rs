//! Built-in defaults (layer 1)

use scene_protocol::Tree;
use serde::{Deserialize, Serialize};

use crate::layer::BuildOptions;
use crate::selection::HighlightStyle;

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Result expression of the selected-feature rule (default: "color('red')")
    pub highlight_result: String,

    /// Result expression of the catch-all rule (default: "color('white')")
    pub catch_all_result: String,

    /// Near-distance applied to transit feed appearance (default: 1000)
    pub transit_near_distance: f64,

    /// WMS raster alpha (default: 0.8)
    pub wms_raster_alpha: f64,

    /// Camera height above sampled terrain for fly-to (default: 500)
    pub camera_height_offset: f64,

    pub infobox: InfoboxConfig,

    pub extensions: ExtensionsConfig,

    /// Format-independent default appearance (default: empty)
    #[serde(default)]
    pub appearance_defaults: Tree,
}

/// Plugin extension providing the dataset infobox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoboxConfig {
    pub plugin_id: String,
    pub extension_id: String,
}

/// Sibling extension ids messages are forwarded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    pub building_search: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let build = BuildOptions::default();
        Self {
            highlight_result: "color('red')".to_string(),
            catch_all_result: "color('white')".to_string(),
            transit_near_distance: build.transit_near_distance,
            wms_raster_alpha: build.wms_raster_alpha,
            camera_height_offset: 500.0,
            infobox: InfoboxConfig {
                plugin_id: build.infobox_plugin_id,
                extension_id: build.infobox_extension_id,
            },
            extensions: ExtensionsConfig {
                building_search: "buildingSearch".to_string(),
            },
            appearance_defaults: build.appearance_defaults,
        }
    }
}

impl OrchestratorConfig {
    /// Convert to a tree for merging
    pub fn to_tree(&self) -> Tree {
        Tree::from(serde_json::json!({
            "highlight_result": self.highlight_result,
            "catch_all_result": self.catch_all_result,
            "transit_near_distance": self.transit_near_distance,
            "wms_raster_alpha": self.wms_raster_alpha,
            "camera_height_offset": self.camera_height_offset,
            "infobox": {
                "plugin_id": self.infobox.plugin_id,
                "extension_id": self.infobox.extension_id
            },
            "extensions": {
                "building_search": self.extensions.building_search
            },
            "appearance_defaults": serde_json::Value::from(self.appearance_defaults.clone())
        }))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            transit_near_distance: self.transit_near_distance,
            wms_raster_alpha: self.wms_raster_alpha,
            infobox_plugin_id: self.infobox.plugin_id.clone(),
            infobox_extension_id: self.infobox.extension_id.clone(),
            appearance_defaults: self.appearance_defaults.clone(),
        }
    }

    pub fn highlight_style(&self) -> HighlightStyle {
        HighlightStyle {
            highlight_result: self.highlight_result.clone(),
            catch_all_result: self.catch_all_result.clone(),
        }
    }
}
