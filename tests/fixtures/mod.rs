//! Shared fixtures for integration tests
//!
//! - Orchestrator construction over the mock host
//! - Inbound message builders
//! - Transcript fixture paths

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use scene_orchestrator::mock::MockHost;
use scene_orchestrator::{LayerHandle, Orchestrator, OrchestratorConfig};
use scene_protocol::{Message, Surface};
use serde_json::{json, Value};

/// Path to a JSON-lines transcript fixture
pub fn transcript_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/transcripts")
        .join(name)
}

pub fn orchestrator() -> Orchestrator<MockHost> {
    Orchestrator::new(MockHost::new(), OrchestratorConfig::default())
}

pub fn message(action: &str, payload: Value) -> Message {
    Message {
        action: action.to_string(),
        payload: Some(payload),
    }
}

/// Deliver a message from the UI surface.
pub fn send(orchestrator: &mut Orchestrator<MockHost>, action: &str, payload: Value) {
    orchestrator.handle_message(Surface::Ui, message(action, payload));
}

pub fn dataset(id: &str, format: &str) -> Value {
    json!({
        "dataID": id,
        "name": format!("Dataset {}", id),
        "format": format,
        "url": format!("https://example.com/{}", id)
    })
}

/// Add a dataset and return the handle of its layer.
pub fn add(orchestrator: &mut Orchestrator<MockHost>, descriptor: Value) -> LayerHandle {
    let id = descriptor["dataID"].as_str().unwrap_or_default().to_string();
    send(orchestrator, "addDatasetToScene", json!({"dataset": descriptor}));
    orchestrator
        .registry()
        .get(&id)
        .map(|r| r.handle.clone())
        .expect("dataset registered")
}

/// A tileset dataset whose layer starts with the single white catch-all.
pub fn add_tileset(orchestrator: &mut Orchestrator<MockHost>, id: &str) -> LayerHandle {
    let mut descriptor = dataset(id, "3D Tiles");
    descriptor["overrides"] = json!({
        "3dtiles": {"color": {"expression": {"conditions": [["true", "color('white')"]]}}}
    });
    add(orchestrator, descriptor)
}

/// Select a feature (or just a layer, or nothing) the way the host does.
pub fn select(orchestrator: &mut Orchestrator<MockHost>, layer: Option<&LayerHandle>, feature: Option<&str>) {
    orchestrator.host_mut().set_selected_feature(feature);
    orchestrator.on_select(layer.cloned());
}

/// Current condition list of a layer (base merged with overrides).
pub fn conditions(orchestrator: &Orchestrator<MockHost>, layer: &LayerHandle) -> Value {
    let host = orchestrator.host();
    let base = host.layer(layer).cloned().unwrap_or_default();
    let merged = match host.overrides_of(layer) {
        Some(patch) => scene_orchestrator::selection::merge_snapshot(base, &patch),
        None => base,
    };
    merged
        .get_path(&scene_orchestrator::selection::CONDITIONS_PATH)
        .cloned()
        .map(Value::from)
        .unwrap_or(Value::Null)
}
