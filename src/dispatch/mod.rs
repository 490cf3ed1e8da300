//! Message dispatcher
//!
//! One [`Orchestrator`] per widget session owns the registry, the selection
//! state, the surface state and the outstanding continuations. Each inbound
//! message is decoded into an [`InboundAction`] and handled to completion
//! before the next one; asynchronous host results come back through
//! [`Orchestrator::complete`].
//!
//! Nothing is reported back to the sender on failure: unknown actions,
//! lookup misses and stale completions are logged and dropped.

mod camera;
mod datasets;
mod queries;
mod storage;
mod surfaces;

pub use surfaces::SurfaceState;

use scene_protocol::{InboundAction, Message, Surface};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::config::OrchestratorConfig;
use crate::continuation::{Completion, Continuation, Continuations, Generation};
use crate::host::{Host, LayerHandle};
use crate::layer::BuildOptions;
use crate::registry::Registry;
use crate::selection::{reconcile, HighlightStyle, HostSnapshots, SelectionInput, SelectionState};

/// Scene orchestrator for one widget session.
pub struct Orchestrator<H: Host> {
    session: Ulid,
    config: OrchestratorConfig,
    build_options: BuildOptions,
    style: HighlightStyle,
    host: H,
    registry: Registry,
    selection: SelectionState,
    surfaces: SurfaceState,
    camera: Generation,
    continuations: Continuations,
}

impl<H: Host> Orchestrator<H> {
    pub fn new(host: H, config: OrchestratorConfig) -> Self {
        let session = Ulid::new();
        debug!(session = %session, "orchestrator session started");
        Self {
            session,
            build_options: config.build_options(),
            style: config.highlight_style(),
            config,
            host,
            registry: Registry::new(),
            selection: SelectionState::default(),
            surfaces: SurfaceState::default(),
            camera: Generation::default(),
            continuations: Continuations::new(),
        }
    }

    pub fn session(&self) -> Ulid {
        self.session
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn surfaces(&self) -> &SurfaceState {
        &self.surfaces
    }

    /// Number of asynchronous host calls still awaiting completion.
    pub fn pending_continuations(&self) -> usize {
        self.continuations.len()
    }

    /// Handle an undecoded envelope.
    pub fn handle_value(&mut self, origin: Surface, value: Value) {
        match Message::from_value(value) {
            Ok(message) => self.handle_message(origin, message),
            Err(err) => warn!(session = %self.session, %origin, error = %err, "malformed envelope dropped"),
        }
    }

    /// Handle one inbound message.
    pub fn handle_message(&mut self, origin: Surface, message: Message) {
        let action = match InboundAction::decode(&message) {
            Ok(action) => action,
            Err(err) if err.is_unknown_action() => {
                debug!(session = %self.session, %origin, action = %message.action, "unknown action ignored");
                return;
            }
            Err(err) => {
                warn!(session = %self.session, %origin, action = %message.action, error = %err, "undecodable payload dropped");
                return;
            }
        };
        debug!(session = %self.session, %origin, action = action.name(), "handling message");

        match action {
            InboundAction::AddDataset(request) => self.add_dataset(request),
            InboundAction::UpdateDataset(request) => self.update_dataset(request),
            InboundAction::UpdateVisibility(request) => self.update_visibility(request),
            InboundAction::RemoveDataset(request) => self.remove_dataset(&request.data_id),
            InboundAction::RemoveAllDatasets => self.remove_all_datasets(),
            InboundAction::FindLayer(request) => self.find_layer(&origin, &request.data_id),
            InboundAction::GetOverriddenLayer(request) => {
                self.get_overridden_layer(&origin, &request.data_id)
            }
            InboundAction::GetSelection => self.get_selection(&origin),
            InboundAction::OpenPopup(request) => self.open_popup(request.data_id),
            InboundAction::ClosePopup => self.close_popup(),
            InboundAction::OpenModal => self.open_modal(),
            InboundAction::CloseModal => self.close_modal(),
            InboundAction::BuildingSearchOverride(request) => self.forward_building_search(request),
            InboundAction::SaveData(request) => self.save_data(&request.key, &request.value),
            InboundAction::GetData(request) => self.get_data(origin, request.key),
            InboundAction::RemoveData(request) => self.remove_data(&request.key),
            InboundAction::ListDataKeys => self.list_data_keys(origin),
            InboundAction::FlyTo(request) => self.fly_to(request),
        }
    }

    /// Host "select" callback. The feature id is read from the host's
    /// globally selected feature.
    pub fn on_select(&mut self, layer: Option<LayerHandle>) {
        let feature_id = layer.as_ref().and_then(|_| self.host.selected_feature_id());
        let input = SelectionInput { layer, feature_id };

        let (next, rewrites) = reconcile(
            &self.selection,
            &input,
            &HostSnapshots(&self.host),
            &self.style,
        );
        debug!(
            session = %self.session,
            layer = ?next.current_layer,
            feature = ?next.current_feature,
            rewrites = rewrites.len(),
            "selection changed"
        );
        self.selection = next;

        for rewrite in rewrites {
            if let Err(err) = self.host.override_layer(&rewrite.layer, &rewrite.to_patch()) {
                warn!(session = %self.session, layer = %rewrite.layer, error = %err, "highlight rewrite failed");
            }
        }
    }

    /// Resume the continuation waiting on an asynchronous host result.
    pub fn complete(&mut self, completion: Completion) {
        let ticket = completion.ticket();
        let Some(continuation) = self.continuations.take(ticket) else {
            debug!(session = %self.session, %ticket, "completion for unknown ticket dropped");
            return;
        };

        match (continuation, completion) {
            (
                Continuation::FlyTo {
                    camera_generation,
                    dataset,
                    request,
                },
                Completion::TerrainHeight { height, .. },
            ) => self.finish_fly_to(camera_generation, dataset, request, height),
            (Continuation::Reply { surface, surface_generation, action }, completion) => {
                self.finish_reply(surface, surface_generation, action, completion)
            }
            (continuation, completion) => {
                warn!(session = %self.session, %ticket, ?continuation, ?completion, "completion kind mismatch");
            }
        }
    }

    /// Post to a surface; extension targets are resolved to an instance now.
    fn send(&mut self, to: &Surface, action: &'static str, payload: impl Serialize) {
        let message = match Message::new(action, payload) {
            Ok(message) => message,
            Err(err) => {
                warn!(session = %self.session, action, error = %err, "outbound payload not serializable");
                return;
            }
        };
        self.post(to, &message);
    }

    fn post(&mut self, to: &Surface, message: &Message) {
        let result = match to {
            Surface::Extension(extension_id) => match self.host.find_instance(extension_id) {
                Some(instance) => self.host.post_to_instance(&instance, message),
                None => {
                    debug!(session = %self.session, extension = %extension_id, action = %message.action, "no instance loaded, message dropped");
                    return;
                }
            },
            surface => self.host.post_to_surface(surface, message),
        };
        if let Err(err) = result {
            warn!(session = %self.session, to = %to, action = %message.action, error = %err, "post failed");
        }
    }
}
