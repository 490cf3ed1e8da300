//! Dataset-Layer Registry Tests
//!
//! Lifecycle of datasets driven through the dispatcher: add, re-add,
//! visibility, overrides, removal, plus randomized operation sequences.

mod fixtures;

use fixtures::{add, dataset, orchestrator, send};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_orchestrator::mock::{CallKind, HostCall};
use scene_orchestrator::Visibility;
use scene_protocol::Tree;
use serde_json::json;

// =============================================================================
// Lifecycle scenario: add, hide, remove
// =============================================================================

#[test]
fn test_add_hide_remove() {
    let mut orch = orchestrator();

    let handle = add(&mut orch, dataset("d1", "GeoJSON"));
    let record = orch.registry().get("d1").unwrap();
    assert_eq!(record.visibility, Visibility::Showing);
    assert_eq!(record.handle, handle);

    send(&mut orch, "updateDatasetVisibility", json!({"dataID": "d1", "hide": true}));
    assert_eq!(orch.registry().get("d1").unwrap().visibility, Visibility::Hidden);
    assert_eq!(orch.registry().get("d1").unwrap().handle, handle);
    assert!(orch
        .host()
        .calls()
        .contains(&HostCall::HideLayer { handle: handle.clone() }));

    send(&mut orch, "removeDatasetFromScene", json!({"dataID": "d1"}));
    assert!(orch.registry().is_empty());
    assert_eq!(
        orch.host().calls().last(),
        Some(&HostCall::DeleteLayer { handle })
    );
}

#[test]
fn test_show_again() {
    let mut orch = orchestrator();
    let handle = add(&mut orch, dataset("d1", "GeoJSON"));

    send(&mut orch, "updateDatasetVisibility", json!({"dataID": "d1", "hide": true}));
    send(&mut orch, "updateDatasetVisibility", json!({"dataID": "d1", "hide": false}));

    assert_eq!(orch.registry().get("d1").unwrap().visibility, Visibility::Showing);
    assert_eq!(orch.host().is_visible(&handle), Some(true));
}

// =============================================================================
// Idempotent re-add
// =============================================================================

#[test]
fn test_readd_creates_one_layer() {
    let mut orch = orchestrator();

    add(&mut orch, dataset("d1", "GeoJSON"));
    add(&mut orch, dataset("d1", "GeoJSON"));

    assert_eq!(orch.host().count(CallKind::AddLayer), 1);
    assert_eq!(orch.registry().len(), 1);
    assert_eq!(orch.host().layer_count(), 1);
}

#[test]
fn test_initially_hidden_dataset() {
    let mut orch = orchestrator();
    let mut descriptor = dataset("d1", "CSV");
    descriptor["visible"] = json!(false);

    let handle = add(&mut orch, descriptor);

    assert_eq!(orch.registry().get("d1").unwrap().visibility, Visibility::Hidden);
    assert_eq!(orch.host().is_visible(&handle), Some(false));
}

#[test]
fn test_visible_true_or_absent_shows() {
    let mut orch = orchestrator();
    let mut descriptor = dataset("d1", "CSV");
    descriptor["visible"] = json!(true);

    add(&mut orch, descriptor);
    add(&mut orch, dataset("d2", "CSV"));

    assert_eq!(orch.host().count(CallKind::HideLayer), 0);
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_transit_feed_override_transform() {
    let mut orch = orchestrator();
    let handle = add(&mut orch, dataset("d-gtfs", "GTFS"));

    send(
        &mut orch,
        "updateDatasetInScene",
        json!({"dataID": "d-gtfs", "overrides": {"marker": {"imageColor": "red"}}}),
    );

    let patch = orch.host().overrides_of(&handle).unwrap();
    assert_eq!(
        patch,
        Tree::from(json!({"marker": {"imageColor": "red", "near": 1000, "clampToGround": true}}))
    );
    assert!(patch.get("polyline").is_none());
    assert!(patch.get("polygon").is_none());
}

#[test]
fn test_override_update_is_a_patch() {
    let mut orch = orchestrator();
    let handle = add(&mut orch, dataset("d1", "GeoJSON"));

    send(
        &mut orch,
        "updateDatasetInScene",
        json!({"dataID": "d1", "overrides": {"polygon": {"fillColor": "blue"}}}),
    );
    send(
        &mut orch,
        "updateDatasetInScene",
        json!({"dataID": "d1", "overrides": {"polygon": {"stroke": true}}}),
    );

    assert_eq!(
        orch.host().overrides_of(&handle),
        Some(Tree::from(json!({"polygon": {"fillColor": "blue", "stroke": true}})))
    );
    // The base definition keeps its defaults.
    assert_eq!(
        orch.host()
            .layer(&handle)
            .unwrap()
            .get_path(&["polygon", "heightReference"])
            .and_then(Tree::as_str),
        Some("clamp")
    );
}

// =============================================================================
// Lookup misses
// =============================================================================

#[test]
fn test_operations_on_unknown_dataset_are_no_ops() {
    let mut orch = orchestrator();

    send(&mut orch, "updateDatasetVisibility", json!({"dataID": "nope", "hide": true}));
    send(&mut orch, "updateDatasetInScene", json!({"dataID": "nope", "overrides": {}}));
    send(&mut orch, "removeDatasetFromScene", json!({"dataID": "nope"}));
    send(&mut orch, "removeAllDatasetsFromScene", json!({}));

    assert!(orch.host().calls().is_empty());
    assert!(orch.registry().is_empty());
}

#[test]
fn test_failed_layer_creation_registers_nothing() {
    let mut orch = orchestrator();
    orch.host_mut()
        .failures_mut()
        .inject(CallKind::AddLayer, scene_orchestrator::mock::FailureConfig::error("busy").with_fail_count(1));

    send(&mut orch, "addDatasetToScene", json!({"dataset": dataset("d1", "GeoJSON")}));
    assert!(orch.registry().is_empty());

    send(&mut orch, "addDatasetToScene", json!({"dataset": dataset("d1", "GeoJSON")}));
    assert_eq!(orch.registry().len(), 1);
}

// =============================================================================
// Catalog notifications and popup binding
// =============================================================================

#[test]
fn test_catalog_receives_registered_ids() {
    let mut orch = orchestrator();
    send(&mut orch, "openModal", json!({}));

    add(&mut orch, dataset("d2", "GeoJSON"));
    add(&mut orch, dataset("d1", "CSV"));
    send(&mut orch, "removeDatasetFromScene", json!({"dataID": "d2"}));

    let updates: Vec<_> = orch
        .host()
        .posted_to("modal")
        .into_iter()
        .map(|m| m.payload.clone().unwrap())
        .collect();
    assert_eq!(
        updates,
        vec![
            json!({"dataIDs": []}),
            json!({"dataIDs": ["d2"]}),
            json!({"dataIDs": ["d1", "d2"]}),
            json!({"dataIDs": ["d1"]}),
        ]
    );
}

#[test]
fn test_catalog_notified_on_readd() {
    let mut orch = orchestrator();
    send(&mut orch, "openModal", json!({}));
    add(&mut orch, dataset("d1", "GeoJSON"));
    add(&mut orch, dataset("d1", "GeoJSON"));

    assert_eq!(orch.host().posted_to("modal").len(), 3);
}

#[test]
fn test_removing_bound_dataset_closes_popup() {
    let mut orch = orchestrator();
    add(&mut orch, dataset("d1", "GeoJSON"));
    add(&mut orch, dataset("d2", "GeoJSON"));
    send(&mut orch, "openPopup", json!({"dataID": "d1"}));

    send(&mut orch, "removeDatasetFromScene", json!({"dataID": "d2"}));
    assert!(orch.host().popup_open());

    send(&mut orch, "removeDatasetFromScene", json!({"dataID": "d1"}));
    assert!(!orch.host().popup_open());
    assert!(!orch.surfaces().popup_open());
}

#[test]
fn test_remove_all_closes_bound_popup() {
    let mut orch = orchestrator();
    add(&mut orch, dataset("d1", "GeoJSON"));
    add(&mut orch, dataset("d2", "MVT"));
    send(&mut orch, "openPopup", json!({"dataID": "d2"}));

    send(&mut orch, "removeAllDatasetsFromScene", json!({}));

    assert!(orch.registry().is_empty());
    assert_eq!(orch.host().layer_count(), 0);
    assert!(!orch.host().popup_open());
}

// =============================================================================
// Randomized sequences: one record per dataset id
// =============================================================================

#[test]
fn test_random_sequences_keep_ids_unique() {
    let ids = ["a", "b", "c", "d"];
    let formats = ["GeoJSON", "3D Tiles", "GTFS", "WMS", "MVT"];

    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut orch = orchestrator();

        for _ in 0..60 {
            let id = ids[rng.gen_range(0..ids.len())];
            match rng.gen_range(0..6) {
                0 | 1 => {
                    let format = formats[rng.gen_range(0..formats.len())];
                    let mut descriptor = dataset(id, format);
                    descriptor["visible"] = json!(rng.gen_bool(0.7));
                    send(&mut orch, "addDatasetToScene", json!({"dataset": descriptor}));
                }
                2 => send(
                    &mut orch,
                    "updateDatasetVisibility",
                    json!({"dataID": id, "hide": rng.gen_bool(0.5)}),
                ),
                3 => send(
                    &mut orch,
                    "updateDatasetInScene",
                    json!({"dataID": id, "overrides": {"marker": {"pointSize": rng.gen_range(1..10)}}}),
                ),
                4 => send(&mut orch, "removeDatasetFromScene", json!({"dataID": id})),
                _ => {
                    if rng.gen_bool(0.2) {
                        send(&mut orch, "removeAllDatasetsFromScene", json!({}));
                    }
                }
            }

            let registry = orch.registry();
            let mut seen: Vec<_> = registry.iter().map(|r| r.data_id.clone()).collect();
            seen.dedup();
            assert_eq!(seen.len(), registry.len(), "seed {}", seed);

            let mut handles: Vec<_> = registry.iter().map(|r| r.handle.clone()).collect();
            handles.sort();
            handles.dedup();
            assert_eq!(handles.len(), registry.len(), "seed {}", seed);

            // Exactly the registered layers exist on the host.
            assert_eq!(orch.host().layer_count(), registry.len(), "seed {}", seed);
            for record in registry.iter() {
                let visible = orch.host().is_visible(&record.handle);
                assert_eq!(visible, Some(record.visibility == Visibility::Showing), "seed {}", seed);
            }
        }
    }
}
