//! Scene orchestrator
//!
//! Widget-side core of a map/3D-scene plugin: routes messages between the
//! host, transient popup/modal surfaces and sibling plugin instances, binds
//! catalog datasets to host layers, builds layer definitions from dataset
//! descriptors plus partial overrides, and keeps tileset highlight
//! condition lists in sync with the user's selection.

pub mod config;
pub mod continuation;
pub mod dispatch;
pub mod host;
pub mod layer;
pub mod merge;
pub mod mock;
pub mod registry;
pub mod replay;
pub mod selection;

pub use config::{ConfigError, EffectiveConfig, OrchestratorConfig};
pub use continuation::{Completion, Ticket};
pub use dispatch::Orchestrator;
pub use host::{Host, HostError, LayerHandle};
pub use layer::{build_layer, BuildOptions, LayerPayload};
pub use registry::{LayerRecord, Registry, Visibility};
pub use selection::{reconcile, SelectionInput, SelectionState};
