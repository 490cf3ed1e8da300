//! Appearance categories and format default appearance.

use scene_protocol::Tree;

use super::format::DataFormat;
use super::BuildOptions;
use crate::merge::{deep_merge, merge_layers};

/// Named bucket of visual properties in a layer definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceCategory {
    Marker,
    Polyline,
    Polygon,
    Model,
    Tileset,
    Ellipsoid,
    Box,
    PhotoOverlay,
    Resource,
    Raster,
}

impl AppearanceCategory {
    pub const ALL: [AppearanceCategory; 10] = [
        Self::Marker,
        Self::Polyline,
        Self::Polygon,
        Self::Model,
        Self::Tileset,
        Self::Ellipsoid,
        Self::Box,
        Self::PhotoOverlay,
        Self::Resource,
        Self::Raster,
    ];

    /// Key of this category in a layer definition.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Model => "model",
            Self::Tileset => "3dtiles",
            Self::Ellipsoid => "ellipsoid",
            Self::Box => "box",
            Self::PhotoOverlay => "photooverlay",
            Self::Resource => "resource",
            Self::Raster => "raster",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Categories that get the transit feed near-distance and ground clamp.
    pub fn takes_transit_defaults(&self) -> bool {
        !matches!(self, Self::Tileset | Self::Resource | Self::Raster | Self::Model)
    }
}

/// Ground clamping for vector formats drawn over terrain.
pub fn ground_clamp_defaults() -> Tree {
    Tree::from_pairs([
        ("resource", Tree::from_pairs([("clampToGround", true)])),
        ("marker", Tree::from_pairs([("heightReference", "clamp")])),
        ("polygon", Tree::from_pairs([("heightReference", "clamp")])),
        ("polyline", Tree::from_pairs([("clampToGround", true)])),
    ])
}

/// Default appearance for a format.
pub fn format_defaults(format: &DataFormat, options: &BuildOptions) -> Tree {
    match format {
        DataFormat::GeoJson | DataFormat::Czml => ground_clamp_defaults(),
        // An empty polygon category switches on the host's default styling.
        DataFormat::Mvt => Tree::from_pairs([("polygon", Tree::map())]),
        DataFormat::Wms => Tree::from_pairs([(
            "raster",
            Tree::from_pairs([("alpha", options.wms_raster_alpha)]),
        )]),
        _ => Tree::map(),
    }
}

/// Add near-distance and ground clamp to every transit-eligible category
/// present in `overrides`. Values already set by the caller win; absent
/// categories are not created.
pub fn transit_transform(overrides: &Tree, near_distance: f64) -> Tree {
    let Some(map) = overrides.as_map() else {
        return overrides.clone();
    };
    let transit_defaults = Tree::from_pairs([
        ("near", Tree::from(near_distance)),
        ("clampToGround", Tree::from(true)),
    ]);

    Tree::Map(
        map.iter()
            .map(|(key, value)| {
                let eligible = AppearanceCategory::from_key(key)
                    .is_some_and(|c| c.takes_transit_defaults());
                let value = if eligible && value.is_map() {
                    deep_merge(transit_defaults.clone(), value.clone())
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect(),
    )
}

/// Appearance of a new layer: format-independent defaults, then the format's
/// defaults, then the caller's overrides.
pub fn resolve(format: &DataFormat, overrides: &Tree, options: &BuildOptions) -> Tree {
    let merged = merge_layers([
        options.appearance_defaults.clone(),
        format_defaults(format, options),
        overrides.clone(),
    ]);
    if format.is_transit_feed() {
        transit_transform(&merged, options.transit_near_distance)
    } else {
        merged
    }
}
