//! Transcript replay
//!
//! A transcript is a JSON-lines file of host events. Each line is one of:
//!
//! - `{"event": "message", "from": "ui", "message": {"action": ..., "payload": ...}}`
//! - `{"event": "select", "layer": "layer-1", "feature": "f1"}` (both optional)
//! - `{"event": "complete", "completion": {"kind": "terrainHeight", ...}}`
//! - `{"event": "flush"}`: the mock host answers every pending request
//! - `{"event": "instance", "extension": "buildingSearch", "instance": "bs-1"}`
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use scene_protocol::{Surface, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::continuation::Completion;
use crate::dispatch::Orchestrator;
use crate::host::LayerHandle;
use crate::mock::{HostCall, MockHost, PostedMessage};
use crate::registry::Visibility;
use crate::selection::SelectionState;

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TranscriptEvent {
    Message {
        #[serde(default = "default_origin")]
        from: Surface,
        message: Value,
    },
    Select {
        #[serde(default)]
        layer: Option<LayerHandle>,
        #[serde(default)]
        feature: Option<String>,
    },
    Complete {
        completion: Completion,
    },
    Flush,
    Instance {
        extension: String,
        instance: String,
    },
}

fn default_origin() -> Surface {
    Surface::Ui
}

/// Registry entry as reported after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    #[serde(rename = "dataID")]
    pub data_id: String,
    pub layer_id: LayerHandle,
    pub visibility: Visibility,
}

/// Everything observable after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub session: String,
    pub events: usize,
    pub calls: Vec<HostCall>,
    pub posted: Vec<PostedMessage>,
    pub registry: Vec<RegistryEntry>,
    /// Layer definitions merged with their pending overrides.
    pub layers: Vec<(LayerHandle, Tree)>,
    pub selection: SelectionState,
}

/// Replay errors
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Parse a transcript without running it.
pub fn parse_transcript<R: BufRead>(reader: R) -> Result<Vec<TranscriptEvent>, ReplayError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed).map_err(|e| ReplayError::Parse {
            line: index + 1,
            reason: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Drive an orchestrator over the mock host with a parsed transcript.
pub fn run(orchestrator: &mut Orchestrator<MockHost>, events: Vec<TranscriptEvent>) -> ReplayReport {
    let count = events.len();
    for event in events {
        apply(orchestrator, event);
    }
    report(orchestrator, count)
}

/// Parse and run a transcript.
pub fn replay<R: BufRead>(
    orchestrator: &mut Orchestrator<MockHost>,
    reader: R,
) -> Result<ReplayReport, ReplayError> {
    let events = parse_transcript(reader)?;
    Ok(run(orchestrator, events))
}

fn apply(orchestrator: &mut Orchestrator<MockHost>, event: TranscriptEvent) {
    match event {
        TranscriptEvent::Message { from, message } => orchestrator.handle_value(from, message),
        TranscriptEvent::Select { layer, feature } => {
            orchestrator.host_mut().set_selected_feature(feature.as_deref());
            orchestrator.on_select(layer);
        }
        TranscriptEvent::Complete { completion } => orchestrator.complete(completion),
        TranscriptEvent::Flush => {
            let completions = orchestrator.host_mut().resolve_pending();
            debug!(count = completions.len(), "flushing pending host requests");
            for completion in completions {
                orchestrator.complete(completion);
            }
        }
        TranscriptEvent::Instance { extension, instance } => {
            orchestrator.host_mut().register_instance(&extension, &instance)
        }
    }
}

fn report(orchestrator: &Orchestrator<MockHost>, events: usize) -> ReplayReport {
    let host = orchestrator.host();
    let registry = orchestrator
        .registry()
        .iter()
        .map(|r| RegistryEntry {
            data_id: r.data_id.clone(),
            layer_id: r.handle.clone(),
            visibility: r.visibility,
        })
        .collect::<Vec<_>>();
    let layers = registry
        .iter()
        .filter_map(|entry| {
            let base = host.layer(&entry.layer_id)?.clone();
            let merged = match host.overrides_of(&entry.layer_id) {
                Some(patch) => crate::selection::merge_snapshot(base, &patch),
                None => base,
            };
            Some((entry.layer_id.clone(), merged))
        })
        .collect();

    ReplayReport {
        session: orchestrator.session().to_string(),
        events,
        calls: host.calls().to_vec(),
        posted: host.posted().to_vec(),
        registry,
        layers,
        selection: orchestrator.selection().clone(),
    }
}
