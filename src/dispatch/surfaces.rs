//! Popup, modal and sibling-instance handlers.

use scene_protocol::actions::{BuildingSearchOverrideRequest, HighlightOverride};
use scene_protocol::{names, Surface};
use tracing::{debug, warn};

use super::Orchestrator;
use crate::continuation::Generation;
use crate::host::{Host, HostError};

/// Open/closed state of one transient surface.
#[derive(Debug, Clone, Default)]
struct Slot {
    open: bool,
    generation: Generation,
}

impl Slot {
    /// Flip open/closed and start a new generation.
    fn set_open(&mut self, open: bool) {
        self.open = open;
        self.generation.bump();
    }
}

/// Transient surface state.
///
/// Every open or close starts a new generation, so replies addressed to an
/// earlier incarnation of a surface can be recognized and dropped.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    popup: Slot,
    popup_data_id: Option<String>,
    modal: Slot,
}

impl SurfaceState {
    pub fn popup_open(&self) -> bool {
        self.popup.open
    }

    pub fn modal_open(&self) -> bool {
        self.modal.open
    }

    /// Dataset the open popup is bound to.
    pub fn popup_data_id(&self) -> Option<&str> {
        self.popup_data_id.as_deref().filter(|_| self.popup.open)
    }

    pub fn popup_bound_to(&self, data_id: &str) -> bool {
        self.popup_data_id() == Some(data_id)
    }

    /// Current generation of a surface. The UI and sibling instances are
    /// never reopened and stay at zero.
    pub fn generation(&self, surface: &Surface) -> u64 {
        match surface {
            Surface::Popup => self.popup.generation.current(),
            Surface::Modal => self.modal.generation.current(),
            Surface::Ui | Surface::Extension(_) => 0,
        }
    }
}

impl<H: Host> Orchestrator<H> {
    pub(super) fn open_popup(&mut self, data_id: Option<String>) {
        self.surfaces.popup.set_open(true);
        self.surfaces.popup_data_id = data_id;
        let result = self.host.open_popup();
        self.report_surface("open_popup", result);
    }

    pub(super) fn close_popup(&mut self) {
        if !self.surfaces.popup.open {
            debug!(session = %self.session, "popup already closed");
            return;
        }
        self.surfaces.popup.set_open(false);
        self.surfaces.popup_data_id = None;
        let result = self.host.close_popup();
        self.report_surface("close_popup", result);
    }

    pub(super) fn open_modal(&mut self) {
        self.surfaces.modal.set_open(true);
        let result = self.host.open_modal();
        self.report_surface("open_modal", result);
        self.notify_catalog();
    }

    pub(super) fn close_modal(&mut self) {
        if !self.surfaces.modal.open {
            debug!(session = %self.session, "modal already closed");
            return;
        }
        self.surfaces.modal.set_open(false);
        let result = self.host.close_modal();
        self.report_surface("close_modal", result);
    }

    /// Forward a building-search highlight to its sibling instance.
    pub(super) fn forward_building_search(&mut self, request: BuildingSearchOverrideRequest) {
        let Some(record) = self.registry.get(&request.data_id) else {
            debug!(session = %self.session, dataset_id = %request.data_id, "building search for unknown dataset ignored");
            return;
        };
        let payload = HighlightOverride {
            layer_id: record.handle.as_str().to_string(),
            data_id: request.data_id,
            overrides: request.overrides,
        };
        let target = Surface::Extension(self.config.extensions.building_search.clone());
        self.send(&target, names::HIGHLIGHT_OVERRIDE, payload);
    }

    fn report_surface(&self, call: &'static str, result: Result<(), HostError>) {
        if let Err(err) = result {
            warn!(session = %self.session, call, error = %err, "surface call failed");
        }
    }
}
