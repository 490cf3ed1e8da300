//! Host capability interface
//!
//! The scene engine, persisted storage and the surrounding surfaces are
//! external collaborators. The orchestrator reaches them only through these
//! traits, so an in-process mock can stand in for the real host.
//!
//! Calls are fire-and-forget from the orchestrator's point of view: an `Err`
//! is logged and the operation carries on. Asynchronous reads take a
//! [`Ticket`] and their result comes back later as a
//! [`Completion`](crate::continuation::Completion).

use std::fmt;

use scene_protocol::{Message, Surface, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::continuation::Ticket;
use crate::layer::LayerPayload;

/// Opaque layer id assigned by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerHandle(String);

impl LayerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded sibling plugin instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending override patch the host keeps apart from the layer definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverriddenLayer {
    pub handle: LayerHandle,
    pub overrides: Tree,
}

/// Camera target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub lng: f64,
    pub lat: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
}

/// Scene engine capabilities.
pub trait LayerHost {
    /// Create a layer, returning its handle.
    fn add_layer(&mut self, layer: &LayerPayload) -> Result<LayerHandle, HostError>;

    /// Base definition of a layer, without pending overrides.
    fn find_layer(&self, handle: &LayerHandle) -> Result<Option<Tree>, HostError>;

    /// Apply a partial patch to a layer's override record.
    fn override_layer(&mut self, handle: &LayerHandle, patch: &Tree) -> Result<(), HostError>;

    fn show_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError>;

    fn hide_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError>;

    fn delete_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError>;

    /// All pending override patches.
    fn overridden_layers(&self) -> Result<Vec<OverriddenLayer>, HostError>;

    /// Feature id of the globally selected feature, if any.
    fn selected_feature_id(&self) -> Option<String>;

    /// Start sampling terrain height; answered by `Completion::TerrainHeight`.
    fn sample_terrain_height(&mut self, ticket: Ticket, lng: f64, lat: f64) -> Result<(), HostError>;

    fn fly_to(&mut self, camera: &CameraPosition) -> Result<(), HostError>;
}

/// Persisted key-value storage.
pub trait Storage {
    /// Start a read; answered by `Completion::StorageValue`.
    fn request_value(&mut self, ticket: Ticket, key: &str) -> Result<(), HostError>;

    fn set_value(&mut self, key: &str, value: &Value) -> Result<(), HostError>;

    fn delete_value(&mut self, key: &str) -> Result<(), HostError>;

    /// Start a key listing; answered by `Completion::StorageKeys`.
    fn request_keys(&mut self, ticket: Ticket) -> Result<(), HostError>;
}

/// Message channels to the UI, the transient surfaces and sibling instances.
pub trait Surfaces {
    /// Post to the UI, popup or modal surface.
    fn post_to_surface(&mut self, surface: &Surface, message: &Message) -> Result<(), HostError>;

    /// Look up the instance currently registered under an extension id.
    fn find_instance(&self, extension_id: &str) -> Option<InstanceId>;

    fn post_to_instance(&mut self, instance: &InstanceId, message: &Message) -> Result<(), HostError>;

    fn open_popup(&mut self) -> Result<(), HostError>;

    fn close_popup(&mut self) -> Result<(), HostError>;

    fn open_modal(&mut self) -> Result<(), HostError>;

    fn close_modal(&mut self) -> Result<(), HostError>;
}

/// Everything the orchestrator needs from its host.
pub trait Host: LayerHost + Storage + Surfaces {}

impl<T: LayerHost + Storage + Surfaces> Host for T {}

/// Host capability failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("layer not found: {0}")]
    LayerNotFound(LayerHandle),

    #[error("{call} rejected: {reason}")]
    Rejected { call: &'static str, reason: String },

    #[error("surface not available: {0}")]
    SurfaceUnavailable(String),
}
