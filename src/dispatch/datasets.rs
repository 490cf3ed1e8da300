//! Dataset lifecycle handlers.

use scene_protocol::actions::{
    AddDatasetRequest, DataCatalogUpdate, OverridesUpdated, UpdateDatasetRequest,
    UpdateVisibilityRequest,
};
use scene_protocol::{names, Surface};
use tracing::warn;

use super::Orchestrator;
use crate::host::Host;
use crate::registry;

impl<H: Host> Orchestrator<H> {
    pub(super) fn add_dataset(&mut self, request: AddDatasetRequest) {
        let data_id = request.dataset.data_id.clone();
        let result = registry::add(
            &mut self.registry,
            &mut self.host,
            request.dataset,
            request.overrides.as_ref(),
            &self.build_options,
        );
        if let Err(err) = result {
            warn!(session = %self.session, dataset_id = %data_id, error = %err, "layer creation failed");
        }
        self.notify_catalog();
    }

    pub(super) fn update_dataset(&mut self, request: UpdateDatasetRequest) {
        let Some(patch) = registry::update_overrides(
            &self.registry,
            &mut self.host,
            &request.data_id,
            &request.overrides,
            &self.build_options,
        ) else {
            return;
        };

        if self.surfaces.popup_bound_to(&request.data_id) {
            self.send(
                &Surface::Popup,
                names::DATASET_OVERRIDES_UPDATED,
                OverridesUpdated {
                    data_id: request.data_id,
                    overrides: patch,
                },
            );
        }
    }

    pub(super) fn update_visibility(&mut self, request: UpdateVisibilityRequest) {
        registry::set_visibility(&mut self.registry, &mut self.host, &request.data_id, request.hide);
    }

    pub(super) fn remove_dataset(&mut self, data_id: &str) {
        if registry::remove(&mut self.registry, &mut self.host, data_id).is_none() {
            return;
        }
        if self.surfaces.popup_bound_to(data_id) {
            self.close_popup();
        }
        self.notify_catalog();
    }

    pub(super) fn remove_all_datasets(&mut self) {
        let removed = registry::remove_all(&mut self.registry, &mut self.host);
        if removed.is_empty() {
            return;
        }
        if removed.iter().any(|r| self.surfaces.popup_bound_to(&r.data_id)) {
            self.close_popup();
        }
        self.notify_catalog();
    }

    /// Send the registered dataset ids to the catalog modal, when open.
    ///
    /// A closed modal is skipped rather than posted to; `openModal` sends the
    /// current catalog, so nothing missed while closed is lost.
    pub(super) fn notify_catalog(&mut self) {
        if !self.surfaces.modal_open() {
            return;
        }
        let update = DataCatalogUpdate {
            data_ids: self.registry.ids(),
        };
        self.send(&Surface::Modal, names::UPDATE_DATA_CATALOG, update);
    }
}
