//! Mock host implementation

use std::cell::{RefCell, RefMut};
use std::collections::{BTreeMap, HashMap, VecDeque};

use scene_protocol::{Message, Surface, Tree};
use serde::Serialize;
use serde_json::Value;

use super::failure::{CallKind, FailureInjector};
use crate::continuation::{Completion, Ticket};
use crate::host::{
    CameraPosition, HostError, InstanceId, LayerHandle, LayerHost, OverriddenLayer, Storage,
    Surfaces,
};
use crate::layer::LayerPayload;
use crate::merge::deep_merge;

/// A recorded host call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum HostCall {
    AddLayer { handle: LayerHandle, layer: Tree },
    OverrideLayer { handle: LayerHandle, patch: Tree },
    ShowLayer { handle: LayerHandle },
    HideLayer { handle: LayerHandle },
    DeleteLayer { handle: LayerHandle },
    SampleTerrain { ticket: Ticket, lng: f64, lat: f64 },
    FlyTo { camera: CameraPosition },
    GetData { ticket: Ticket, key: String },
    SetData { key: String, value: Value },
    DeleteData { key: String },
    ListKeys { ticket: Ticket },
    OpenPopup,
    ClosePopup,
    OpenModal,
    CloseModal,
}

impl HostCall {
    pub fn kind(&self) -> CallKind {
        match self {
            HostCall::AddLayer { .. } => CallKind::AddLayer,
            HostCall::OverrideLayer { .. } => CallKind::OverrideLayer,
            HostCall::ShowLayer { .. } => CallKind::ShowLayer,
            HostCall::HideLayer { .. } => CallKind::HideLayer,
            HostCall::DeleteLayer { .. } => CallKind::DeleteLayer,
            HostCall::SampleTerrain { .. } => CallKind::SampleTerrain,
            HostCall::FlyTo { .. } => CallKind::FlyTo,
            HostCall::GetData { .. } => CallKind::GetData,
            HostCall::SetData { .. } => CallKind::SetData,
            HostCall::DeleteData { .. } => CallKind::DeleteData,
            HostCall::ListKeys { .. } => CallKind::ListKeys,
            HostCall::OpenPopup => CallKind::OpenPopup,
            HostCall::ClosePopup => CallKind::ClosePopup,
            HostCall::OpenModal => CallKind::OpenModal,
            HostCall::CloseModal => CallKind::CloseModal,
        }
    }
}

/// A message delivered to a surface or instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedMessage {
    /// `ui`, `popup`, `modal` or `instance:<id>`
    pub to: String,
    pub message: Message,
}

#[derive(Debug, Clone)]
struct MockLayer {
    definition: Tree,
    visible: bool,
}

#[derive(Debug, Clone)]
enum PendingRequest {
    Terrain { ticket: Ticket },
    Value { ticket: Ticket, key: String },
    Keys { ticket: Ticket },
}

/// In-memory host
#[derive(Debug, Default)]
pub struct MockHost {
    layers: BTreeMap<LayerHandle, MockLayer>,
    overrides: BTreeMap<LayerHandle, Tree>,
    next_layer: u64,
    selected_feature: Option<String>,
    terrain_height: f64,
    storage: BTreeMap<String, Value>,
    instances: HashMap<String, InstanceId>,
    popup_open: bool,
    modal_open: bool,
    pending: VecDeque<PendingRequest>,
    calls: Vec<HostCall>,
    posted: Vec<PostedMessage>,
    failures: RefCell<FailureInjector>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test configuration ===

    pub fn failures_mut(&self) -> RefMut<'_, FailureInjector> {
        self.failures.borrow_mut()
    }

    /// Feature reported by `selected_feature_id`.
    pub fn set_selected_feature(&mut self, feature_id: Option<&str>) {
        self.selected_feature = feature_id.map(str::to_string);
    }

    /// Height returned for every terrain sample.
    pub fn set_terrain_height(&mut self, height: f64) {
        self.terrain_height = height;
    }

    /// Load a sibling instance under an extension id.
    pub fn register_instance(&mut self, extension_id: &str, instance: &str) {
        self.instances
            .insert(extension_id.to_string(), InstanceId(instance.to_string()));
    }

    pub fn unregister_instance(&mut self, extension_id: &str) {
        self.instances.remove(extension_id);
    }

    /// Insert a layer the orchestrator did not create.
    pub fn insert_layer(&mut self, handle: &LayerHandle, definition: Tree) {
        self.layers.insert(
            handle.clone(),
            MockLayer {
                definition,
                visible: true,
            },
        );
    }

    // === Asynchronous calls ===

    /// Answer the oldest pending request.
    pub fn resolve_next(&mut self) -> Option<Completion> {
        let request = self.pending.pop_front()?;
        Some(self.answer(request))
    }

    /// Answer every pending request in issue order.
    pub fn resolve_pending(&mut self) -> Vec<Completion> {
        let requests: Vec<_> = self.pending.drain(..).collect();
        requests.into_iter().map(|r| self.answer(r)).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn answer(&self, request: PendingRequest) -> Completion {
        match request {
            PendingRequest::Terrain { ticket } => Completion::TerrainHeight {
                ticket,
                height: self.terrain_height,
            },
            PendingRequest::Value { ticket, key } => Completion::StorageValue {
                ticket,
                value: self.storage.get(&key).cloned(),
                key,
            },
            PendingRequest::Keys { ticket } => Completion::StorageKeys {
                ticket,
                keys: self.storage.keys().cloned().collect(),
            },
        }
    }

    // === Inspection ===

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of successful calls of a kind.
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn posted(&self) -> &[PostedMessage] {
        &self.posted
    }

    /// Messages delivered to one destination, in order.
    pub fn posted_to(&self, to: &str) -> Vec<&Message> {
        self.posted
            .iter()
            .filter(|p| p.to == to)
            .map(|p| &p.message)
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.posted.clear();
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Base definition of a layer.
    pub fn layer(&self, handle: &LayerHandle) -> Option<&Tree> {
        self.layers.get(handle).map(|l| &l.definition)
    }

    pub fn is_visible(&self, handle: &LayerHandle) -> Option<bool> {
        self.layers.get(handle).map(|l| l.visible)
    }

    /// Accumulated override patch of a layer.
    pub fn overrides_of(&self, handle: &LayerHandle) -> Option<Tree> {
        self.overrides.get(handle).cloned()
    }

    pub fn stored(&self, key: &str) -> Option<&Value> {
        self.storage.get(key)
    }

    pub fn popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    fn check(&self, kind: CallKind) -> Result<(), HostError> {
        self.failures.borrow_mut().check(kind)
    }

    fn layer_mut(&mut self, handle: &LayerHandle) -> Result<&mut MockLayer, HostError> {
        self.layers
            .get_mut(handle)
            .ok_or_else(|| HostError::LayerNotFound(handle.clone()))
    }
}

impl LayerHost for MockHost {
    fn add_layer(&mut self, layer: &LayerPayload) -> Result<LayerHandle, HostError> {
        self.check(CallKind::AddLayer)?;
        self.next_layer += 1;
        let handle = LayerHandle::new(format!("layer-{}", self.next_layer));
        let definition = layer.to_tree();
        self.layers.insert(
            handle.clone(),
            MockLayer {
                definition: definition.clone(),
                visible: layer.visible,
            },
        );
        self.calls.push(HostCall::AddLayer {
            handle: handle.clone(),
            layer: definition,
        });
        Ok(handle)
    }

    fn find_layer(&self, handle: &LayerHandle) -> Result<Option<Tree>, HostError> {
        self.check(CallKind::FindLayer)?;
        Ok(self.layers.get(handle).map(|l| l.definition.clone()))
    }

    fn override_layer(&mut self, handle: &LayerHandle, patch: &Tree) -> Result<(), HostError> {
        self.check(CallKind::OverrideLayer)?;
        if !self.layers.contains_key(handle) {
            return Err(HostError::LayerNotFound(handle.clone()));
        }
        let current = self.overrides.remove(handle).unwrap_or_default();
        self.overrides
            .insert(handle.clone(), deep_merge(current, patch.clone()));
        self.calls.push(HostCall::OverrideLayer {
            handle: handle.clone(),
            patch: patch.clone(),
        });
        Ok(())
    }

    fn show_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError> {
        self.check(CallKind::ShowLayer)?;
        self.layer_mut(handle)?.visible = true;
        self.calls.push(HostCall::ShowLayer {
            handle: handle.clone(),
        });
        Ok(())
    }

    fn hide_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError> {
        self.check(CallKind::HideLayer)?;
        self.layer_mut(handle)?.visible = false;
        self.calls.push(HostCall::HideLayer {
            handle: handle.clone(),
        });
        Ok(())
    }

    fn delete_layer(&mut self, handle: &LayerHandle) -> Result<(), HostError> {
        self.check(CallKind::DeleteLayer)?;
        self.layers
            .remove(handle)
            .ok_or_else(|| HostError::LayerNotFound(handle.clone()))?;
        self.overrides.remove(handle);
        self.calls.push(HostCall::DeleteLayer {
            handle: handle.clone(),
        });
        Ok(())
    }

    fn overridden_layers(&self) -> Result<Vec<OverriddenLayer>, HostError> {
        self.check(CallKind::OverriddenLayers)?;
        Ok(self
            .overrides
            .iter()
            .map(|(handle, overrides)| OverriddenLayer {
                handle: handle.clone(),
                overrides: overrides.clone(),
            })
            .collect())
    }

    fn selected_feature_id(&self) -> Option<String> {
        self.selected_feature.clone()
    }

    fn sample_terrain_height(&mut self, ticket: Ticket, lng: f64, lat: f64) -> Result<(), HostError> {
        self.check(CallKind::SampleTerrain)?;
        self.pending.push_back(PendingRequest::Terrain { ticket });
        self.calls.push(HostCall::SampleTerrain { ticket, lng, lat });
        Ok(())
    }

    fn fly_to(&mut self, camera: &CameraPosition) -> Result<(), HostError> {
        self.check(CallKind::FlyTo)?;
        self.calls.push(HostCall::FlyTo {
            camera: camera.clone(),
        });
        Ok(())
    }
}

impl Storage for MockHost {
    fn request_value(&mut self, ticket: Ticket, key: &str) -> Result<(), HostError> {
        self.check(CallKind::GetData)?;
        self.pending.push_back(PendingRequest::Value {
            ticket,
            key: key.to_string(),
        });
        self.calls.push(HostCall::GetData {
            ticket,
            key: key.to_string(),
        });
        Ok(())
    }

    fn set_value(&mut self, key: &str, value: &Value) -> Result<(), HostError> {
        self.check(CallKind::SetData)?;
        self.storage.insert(key.to_string(), value.clone());
        self.calls.push(HostCall::SetData {
            key: key.to_string(),
            value: value.clone(),
        });
        Ok(())
    }

    fn delete_value(&mut self, key: &str) -> Result<(), HostError> {
        self.check(CallKind::DeleteData)?;
        self.storage.remove(key);
        self.calls.push(HostCall::DeleteData {
            key: key.to_string(),
        });
        Ok(())
    }

    fn request_keys(&mut self, ticket: Ticket) -> Result<(), HostError> {
        self.check(CallKind::ListKeys)?;
        self.pending.push_back(PendingRequest::Keys { ticket });
        self.calls.push(HostCall::ListKeys { ticket });
        Ok(())
    }
}

impl Surfaces for MockHost {
    fn post_to_surface(&mut self, surface: &Surface, message: &Message) -> Result<(), HostError> {
        self.check(CallKind::Post)?;
        let open = match surface {
            Surface::Popup => self.popup_open,
            Surface::Modal => self.modal_open,
            Surface::Ui => true,
            Surface::Extension(_) => false,
        };
        if !open {
            return Err(HostError::SurfaceUnavailable(surface.to_string()));
        }
        self.posted.push(PostedMessage {
            to: surface.to_string(),
            message: message.clone(),
        });
        Ok(())
    }

    fn find_instance(&self, extension_id: &str) -> Option<InstanceId> {
        self.instances.get(extension_id).cloned()
    }

    fn post_to_instance(&mut self, instance: &InstanceId, message: &Message) -> Result<(), HostError> {
        self.check(CallKind::Post)?;
        self.posted.push(PostedMessage {
            to: format!("instance:{}", instance),
            message: message.clone(),
        });
        Ok(())
    }

    fn open_popup(&mut self) -> Result<(), HostError> {
        self.check(CallKind::OpenPopup)?;
        self.popup_open = true;
        self.calls.push(HostCall::OpenPopup);
        Ok(())
    }

    fn close_popup(&mut self) -> Result<(), HostError> {
        self.check(CallKind::ClosePopup)?;
        self.popup_open = false;
        self.calls.push(HostCall::ClosePopup);
        Ok(())
    }

    fn open_modal(&mut self) -> Result<(), HostError> {
        self.check(CallKind::OpenModal)?;
        self.modal_open = true;
        self.calls.push(HostCall::OpenModal);
        Ok(())
    }

    fn close_modal(&mut self) -> Result<(), HostError> {
        self.check(CallKind::CloseModal)?;
        self.modal_open = false;
        self.calls.push(HostCall::CloseModal);
        Ok(())
    }
}
