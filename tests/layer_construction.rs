//! Layer Construction Tests
//!
//! `build_layer` across every supported format: default paths, merge
//! identity, merge precedence, data and infobox blocks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_orchestrator::layer::{AppearanceCategory, DataFormat};
use scene_orchestrator::{build_layer, BuildOptions};
use scene_protocol::{DatasetDescriptor, SourceConfig, Tree};
use serde_json::json;

const FORMATS: &[&str] = &[
    "GeoJSON", "CZML", "3D Tiles", "MVT", "WMS", "GTFS", "glTF", "KML", "CSV", "Tiles", "TMS", "shapefile",
];

fn descriptor(format: &str) -> DatasetDescriptor {
    DatasetDescriptor::new("d1", format, "https://example.com/source")
}

/// Every leaf path of a tree, with its value.
fn leaves(tree: &Tree, prefix: Vec<String>, out: &mut Vec<(Vec<String>, Tree)>) {
    match tree.as_map() {
        Some(map) if !map.is_empty() => {
            for (key, value) in map {
                let mut path = prefix.clone();
                path.push(key.clone());
                leaves(value, path, out);
            }
        }
        _ => out.push((prefix, tree.clone())),
    }
}

fn at<'a>(tree: &'a Tree, path: &[String]) -> Option<&'a Tree> {
    let path: Vec<&str> = path.iter().map(String::as_str).collect();
    tree.get_path(&path)
}

// =============================================================================
// Merge identity
// =============================================================================

#[test]
fn test_empty_overrides_equal_no_overrides() {
    let options = BuildOptions::default();
    for format in FORMATS {
        let without = build_layer(&descriptor(format), None, &options);
        let with_empty = build_layer(&descriptor(format), Some(&Tree::map()), &options);
        assert_eq!(without.appearance, with_empty.appearance, "format {}", format);
        assert_eq!(without.to_tree(), with_empty.to_tree(), "format {}", format);
    }
}

// =============================================================================
// Format default paths
// =============================================================================

#[test]
fn test_format_defaults() {
    let options = BuildOptions::default();
    let clamp = json!({
        "resource": {"clampToGround": true},
        "marker": {"heightReference": "clamp"},
        "polygon": {"heightReference": "clamp"},
        "polyline": {"clampToGround": true}
    });

    let expected = [
        ("GeoJSON", clamp.clone()),
        ("CZML", clamp),
        ("MVT", json!({"polygon": {}})),
        ("WMS", json!({"raster": {"alpha": 0.8}})),
        ("GTFS", json!({})),
        ("3D Tiles", json!({})),
        ("CSV", json!({})),
    ];
    for (format, appearance) in expected {
        let layer = build_layer(&descriptor(format), None, &options);
        assert_eq!(layer.appearance, Tree::from(appearance), "format {}", format);
    }
}

#[test]
fn test_format_hint_is_normalized() {
    let options = BuildOptions::default();
    for hint in ["3D Tiles", "3dtiles", " 3D  TILES "] {
        let layer = build_layer(&descriptor(hint), None, &options);
        assert_eq!(layer.data_type(), Some("3dtiles"), "hint {:?}", hint);
    }
    assert_eq!(DataFormat::normalize("GTFS-RT"), DataFormat::Gtfs);
}

#[test]
fn test_source_config_takes_precedence() {
    let mut descriptor = descriptor("GeoJSON");
    descriptor.config = Some(SourceConfig {
        format: Some("WMS".into()),
        url: Some("https://example.com/wms".into()),
        layers: Some(vec!["flood_depth".into()]),
    });

    let layer = build_layer(&descriptor, None, &BuildOptions::default());
    assert_eq!(
        layer.data,
        Tree::from(json!({
            "type": "wms",
            "url": "https://example.com/wms",
            "layers": ["flood_depth"],
            "parameters": {"transparent": "true", "format": "image/png"}
        }))
    );
}

// =============================================================================
// Merge precedence
// =============================================================================

#[test]
fn test_override_leaves_win_and_default_leaves_survive() {
    let options = BuildOptions::default();
    let overrides = Tree::from(json!({
        "marker": {"heightReference": "none", "pointColor": "red"},
        "polygon": {"fill": {"color": "blue"}},
        "raster": {"alpha": 0.3}
    }));

    for format in FORMATS {
        let defaults = build_layer(&descriptor(format), None, &options).appearance;
        let built = build_layer(&descriptor(format), Some(&overrides), &options).appearance;

        let mut override_leaves = Vec::new();
        leaves(&overrides, Vec::new(), &mut override_leaves);
        for (path, value) in &override_leaves {
            assert_eq!(at(&built, path), Some(value), "format {} path {:?}", format, path);
        }

        let mut default_leaves = Vec::new();
        leaves(&defaults, Vec::new(), &mut default_leaves);
        for (path, value) in &default_leaves {
            if path.is_empty() || at(&overrides, path).is_some() {
                continue;
            }
            assert_eq!(at(&built, path), Some(value), "format {} path {:?}", format, path);
        }
    }
}

#[test]
fn test_format_defaults_apply_under_partial_overrides() {
    let options = BuildOptions::default();
    let overrides = Tree::from(json!({"marker": {"pointColor": "red"}}));

    let geojson = build_layer(&descriptor("GeoJSON"), Some(&overrides), &options).appearance;
    assert_eq!(geojson.get_path(&["marker", "pointColor"]).and_then(Tree::as_str), Some("red"));
    assert_eq!(geojson.get_path(&["marker", "heightReference"]).and_then(Tree::as_str), Some("clamp"));
    assert_eq!(geojson.get_path(&["polygon", "heightReference"]).and_then(Tree::as_str), Some("clamp"));
    assert_eq!(geojson.get_path(&["resource", "clampToGround"]), Some(&Tree::from(true)));

    let wms = build_layer(&descriptor("WMS"), Some(&overrides), &options).appearance;
    assert_eq!(wms.get_path(&["raster", "alpha"]), Some(&Tree::from(0.8)));
}

#[test]
fn test_random_overrides_precedence() {
    let options = BuildOptions::default();
    let categories: Vec<&str> = AppearanceCategory::ALL.iter().map(|c| c.key()).collect();
    let props = ["color", "near", "clampToGround", "heightReference", "alpha", "show"];

    for seed in 0..50u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut overrides = Tree::map();
        for _ in 0..rng.gen_range(1..6) {
            let category = categories[rng.gen_range(0..categories.len())];
            let prop = props[rng.gen_range(0..props.len())];
            let value = match rng.gen_range(0..3) {
                0 => Tree::from(rng.gen_bool(0.5)),
                1 => Tree::from(rng.gen_range(0..100) as i64),
                _ => Tree::from(format!("v{}", rng.gen_range(0..10))),
            };
            overrides.insert_path(&[category, prop], value);
        }
        let format = FORMATS[rng.gen_range(0..FORMATS.len())];
        let built = build_layer(&descriptor(format), Some(&overrides), &options).appearance;

        let mut override_leaves = Vec::new();
        leaves(&overrides, Vec::new(), &mut override_leaves);
        for (path, value) in &override_leaves {
            assert_eq!(at(&built, path), Some(value), "seed {} format {} path {:?}", seed, format, path);
        }
    }
}

#[test]
fn test_transit_feed_overrides_get_near_and_clamp() {
    let layer = build_layer(
        &descriptor("GTFS"),
        Some(&Tree::from(json!({
            "marker": {"imageColor": "red"},
            "3dtiles": {"show": true},
            "raster": {"alpha": 0.5}
        }))),
        &BuildOptions::default(),
    );

    assert_eq!(
        layer.appearance,
        Tree::from(json!({
            "marker": {"imageColor": "red", "near": 1000, "clampToGround": true},
            "3dtiles": {"show": true},
            "raster": {"alpha": 0.5}
        }))
    );
}

#[test]
fn test_transit_feed_caller_values_win() {
    let layer = build_layer(
        &descriptor("GTFS"),
        Some(&Tree::from(json!({"polyline": {"near": 250, "clampToGround": false}}))),
        &BuildOptions::default(),
    );
    assert_eq!(
        layer.appearance,
        Tree::from(json!({"polyline": {"near": 250, "clampToGround": false}}))
    );
}

// =============================================================================
// Data block
// =============================================================================

#[test]
fn test_json_properties_for_classified_datasets() {
    let options = BuildOptions::default();

    let building = descriptor("3D Tiles").with_type_code("bldg");
    assert_eq!(
        build_layer(&building, None, &options).data.get("jsonProperties"),
        Some(&Tree::from(json!(["attributes"])))
    );

    // Road network vector tiles: covered by the code list alone.
    let roads = descriptor("MVT").with_type_code("tran");
    assert!(build_layer(&roads, None, &options).data.get("jsonProperties").is_some());

    let unclassified = descriptor("3D Tiles");
    assert!(build_layer(&unclassified, None, &options).data.get("jsonProperties").is_none());
}

#[test]
fn test_layer_always_created_visible() {
    let hidden = descriptor("GeoJSON").with_visible(false);
    let layer = build_layer(&hidden, None, &BuildOptions::default());
    assert!(layer.visible);
    assert_eq!(layer.to_tree().get("visible").and_then(Tree::as_bool), Some(true));
}

// =============================================================================
// Infobox
// =============================================================================

#[test]
fn test_infobox_default_for_classified_dataset() {
    let options = BuildOptions::default();
    let layer = build_layer(&descriptor("3D Tiles").with_type_code("bldg"), None, &options);

    assert_eq!(
        layer.infobox.get_path(&["property", "default", "unselectOnClose"]).and_then(Tree::as_bool),
        Some(true)
    );
    let blocks = layer.infobox.get("blocks").and_then(Tree::as_sequence).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].get("extensionId").and_then(Tree::as_str),
        Some(options.infobox_extension_id.as_str())
    );
    assert_eq!(
        layer.infobox.get_path(&["property", "default", "size"]).and_then(Tree::as_str),
        Some("medium")
    );
}

#[test]
fn test_infobox_for_unclassified_dataset_has_global_default_only() {
    let layer = build_layer(&descriptor("GeoJSON"), None, &BuildOptions::default());
    assert_eq!(
        layer.infobox,
        Tree::from(json!({"property": {"default": {"unselectOnClose": true}}}))
    );
}

#[test]
fn test_infobox_override_merges_into_default() {
    let options = BuildOptions::default();
    let overrides = Tree::from(json!({
        "infobox": {
            "property": {"default": {"bgcolor": "#ffffff"}},
            "blocks": [{"pluginId": options.infobox_plugin_id, "extensionId": options.infobox_extension_id, "property": {"fields": ["name"]}}]
        }
    }));
    let layer = build_layer(&descriptor("3D Tiles").with_type_code("bldg"), Some(&overrides), &options);

    assert_eq!(
        layer.infobox.get_path(&["property", "default", "bgcolor"]).and_then(Tree::as_str),
        Some("#ffffff")
    );
    assert_eq!(
        layer.infobox.get_path(&["property", "default", "heightType"]).and_then(Tree::as_str),
        Some("auto")
    );
    let blocks = layer.infobox.get("blocks").and_then(Tree::as_sequence).unwrap();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].get_path(&["property", "fields"]).is_some());
    assert!(layer.appearance.get("infobox").is_none());
}
