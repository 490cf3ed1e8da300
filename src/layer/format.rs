//! Format normalization and source resolution.

use scene_protocol::DatasetDescriptor;

/// Normalized data format family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataFormat {
    GeoJson,
    Czml,
    Tiles3d,
    Mvt,
    Wms,
    /// Transit feed family (static and realtime GTFS).
    Gtfs,
    Gltf,
    Kml,
    Csv,
    Tiles,
    Tms,
    Other(String),
}

impl DataFormat {
    /// Normalize a free-text format hint: whitespace stripped, lowercased.
    pub fn normalize(hint: &str) -> Self {
        let key: String = hint
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "geojson" => Self::GeoJson,
            "czml" => Self::Czml,
            "3dtiles" | "3dtile" | "cesium3dtiles" => Self::Tiles3d,
            "mvt" | "vectortile" | "vectortiles" => Self::Mvt,
            "wms" => Self::Wms,
            "gtfs" | "gtfs-rt" | "gtfsrt" | "gtfsrealtime" | "gtfs-realtime" => Self::Gtfs,
            "gltf" | "glb" => Self::Gltf,
            "kml" => Self::Kml,
            "csv" => Self::Csv,
            "tiles" | "xyz" => Self::Tiles,
            "tms" => Self::Tms,
            _ => Self::Other(key),
        }
    }

    /// The host's `data.type` for this format.
    pub fn data_type(&self) -> &str {
        match self {
            Self::GeoJson => "geojson",
            Self::Czml => "czml",
            Self::Tiles3d => "3dtiles",
            Self::Mvt => "mvt",
            Self::Wms => "wms",
            Self::Gtfs => "gtfs",
            Self::Gltf => "gltf",
            Self::Kml => "kml",
            Self::Csv => "csv",
            Self::Tiles => "tiles",
            Self::Tms => "tms",
            Self::Other(key) => key,
        }
    }

    pub fn is_transit_feed(&self) -> bool {
        matches!(self, Self::Gtfs)
    }

    pub fn is_tileset(&self) -> bool {
        matches!(self, Self::Tiles3d)
    }
}

/// Where a dataset's content comes from, after applying its sub-config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub format: DataFormat,
    pub url: Option<String>,
    pub layers: Option<Vec<String>>,
}

/// Resolve format, URL and sub-layers. Fields declared by the dataset's own
/// source config take precedence over the descriptor-level ones.
pub fn resolve_source(descriptor: &DatasetDescriptor) -> ResolvedSource {
    let config = descriptor.config.as_ref();
    let format_hint = config
        .and_then(|c| c.format.as_deref())
        .unwrap_or(descriptor.format.as_str());

    ResolvedSource {
        format: DataFormat::normalize(format_hint),
        url: config
            .and_then(|c| c.url.clone())
            .or_else(|| descriptor.url.clone()),
        layers: config
            .and_then(|c| c.layers.clone())
            .or_else(|| descriptor.layers.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_protocol::SourceConfig;

    #[test]
    fn test_normalize_strips_space_and_case() {
        assert_eq!(DataFormat::normalize("3D Tiles"), DataFormat::Tiles3d);
        assert_eq!(DataFormat::normalize(" GeoJSON "), DataFormat::GeoJson);
        assert_eq!(DataFormat::normalize("GTFS-RT"), DataFormat::Gtfs);
        assert_eq!(DataFormat::normalize("Vector Tile"), DataFormat::Mvt);
        assert_eq!(DataFormat::normalize("Shape File"), DataFormat::Other("shapefile".into()));
    }

    #[test]
    fn test_data_type() {
        assert_eq!(DataFormat::Tiles3d.data_type(), "3dtiles");
        assert_eq!(DataFormat::Other("shapefile".into()).data_type(), "shapefile");
    }

    #[test]
    fn test_sub_config_precedence() {
        let mut descriptor = DatasetDescriptor::new("d1", "GeoJSON", "https://example.com/a.geojson");
        descriptor.layers = Some(vec!["outer".into()]);
        descriptor.config = Some(SourceConfig {
            format: Some("MVT".into()),
            url: Some("https://example.com/{z}/{x}/{y}.mvt".into()),
            layers: None,
        });

        let source = resolve_source(&descriptor);
        assert_eq!(source.format, DataFormat::Mvt);
        assert_eq!(source.url.as_deref(), Some("https://example.com/{z}/{x}/{y}.mvt"));
        // Not declared by the sub-config, so the descriptor's own value stands
        assert_eq!(source.layers, Some(vec!["outer".to_string()]));
    }

    #[test]
    fn test_descriptor_fields_without_sub_config() {
        let descriptor = DatasetDescriptor::new("d1", "WMS", "https://example.com/wms");
        let source = resolve_source(&descriptor);
        assert_eq!(source.format, DataFormat::Wms);
        assert_eq!(source.url.as_deref(), Some("https://example.com/wms"));
        assert!(source.layers.is_none());
    }
}
