//! Layer construction
//!
//! Turns a dataset descriptor plus partial overrides into the layer
//! definition handed to the host. Pure: no host calls.
//!
//! Construction steps:
//! 1. Resolve format, URL and sub-layers (source config first)
//! 2. Format-conditional `data` fields (WMS parameters, JSON properties)
//! 3. Infobox binding for classified datasets
//! 4. Appearance: format-independent defaults, format defaults, overrides

pub mod appearance;
pub mod format;
pub mod infobox;

pub use appearance::AppearanceCategory;
pub use format::{resolve_source, DataFormat, ResolvedSource};

use scene_protocol::{DatasetDescriptor, Tree};

use crate::merge::{deep_merge, merge_layers};

/// Classification codes whose features expose their attribute bag.
pub const JSON_PROPERTY_CODES: &[&str] = &[
    "bldg", "tran", "brid", "rail", "frn", "veg", "luse", "urf", "lsld", "fld", "tnm", "htd", "ifld",
];

/// Keys of an override tree that are not appearance categories.
const NON_APPEARANCE_KEYS: &[&str] = &["data", "infobox"];

/// Knobs for layer construction, taken from the orchestrator config.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Near-distance given to transit feed categories.
    pub transit_near_distance: f64,
    /// Raster alpha of WMS layers.
    pub wms_raster_alpha: f64,
    /// Plugin providing the infobox block.
    pub infobox_plugin_id: String,
    /// Extension id of the infobox block.
    pub infobox_extension_id: String,
    /// Appearance applied to every layer before format defaults.
    pub appearance_defaults: Tree,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            transit_near_distance: 1000.0,
            wms_raster_alpha: 0.8,
            infobox_plugin_id: "scene-orchestrator".to_string(),
            infobox_extension_id: "datasetInfobox".to_string(),
            appearance_defaults: Tree::map(),
        }
    }
}

/// Layer definition ready to be created by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPayload {
    pub title: String,
    pub visible: bool,
    pub data: Tree,
    pub infobox: Tree,
    /// Appearance categories, keyed by [`AppearanceCategory::key`].
    pub appearance: Tree,
}

impl LayerPayload {
    /// `data.type` of the layer.
    pub fn data_type(&self) -> Option<&str> {
        self.data.get("type").and_then(Tree::as_str)
    }

    /// The host's flat layer shape: appearance categories sit next to
    /// `data` and `infobox`.
    pub fn to_tree(&self) -> Tree {
        let mut tree = self.appearance.clone();
        tree.insert("type", "simple");
        tree.insert("title", self.title.as_str());
        tree.insert("visible", self.visible);
        tree.insert("data", self.data.clone());
        tree.insert("infobox", self.infobox.clone());
        tree
    }
}

/// Build the layer definition for `descriptor`.
///
/// `overrides` is layered over the descriptor's own overrides. Its `data` and
/// `infobox` branches refine the corresponding blocks; every other key is
/// appearance.
pub fn build_layer(
    descriptor: &DatasetDescriptor,
    overrides: Option<&Tree>,
    options: &BuildOptions,
) -> LayerPayload {
    let source = resolve_source(descriptor);
    let type_code = descriptor.type_code.as_deref();
    let user = merge_layers([
        descriptor.overrides.clone().unwrap_or_default(),
        overrides.cloned().unwrap_or_default(),
    ]);

    let data = deep_merge(
        base_data(&source, type_code),
        user.get("data").cloned().unwrap_or_default(),
    );
    let infobox = infobox::binding(type_code, user.get("infobox"), options);
    let appearance = appearance::resolve(
        &source.format,
        &user.without_keys(NON_APPEARANCE_KEYS),
        options,
    );

    LayerPayload {
        title: descriptor.name.clone(),
        visible: true,
        data,
        infobox,
        appearance,
    }
}

fn base_data(source: &ResolvedSource, type_code: Option<&str>) -> Tree {
    let mut data = Tree::from_pairs([("type", source.format.data_type())]);
    if let Some(url) = &source.url {
        data.insert("url", url.as_str());
    }
    if let Some(layers) = &source.layers {
        data.insert(
            "layers",
            Tree::Sequence(layers.iter().map(|l| Tree::from(l.as_str())).collect()),
        );
    }

    if source.format == DataFormat::Wms {
        data.insert(
            "parameters",
            Tree::from_pairs([("transparent", "true"), ("format", "image/png")]),
        );
    }

    let code = type_code.unwrap_or_default();
    // "tran" is already in the list, so the mvt clause never decides the outcome.
    if JSON_PROPERTY_CODES.contains(&code) || (code == "tran" && source.format == DataFormat::Mvt) {
        data.insert("jsonProperties", Tree::Sequence(vec![Tree::from("attributes")]));
    }

    data
}
