//! Read-only snapshot queries, answered to the asking surface.

use scene_protocol::actions::LayerQueryResponse;
use scene_protocol::{names, Surface, Tree};
use tracing::{debug, warn};

use super::Orchestrator;
use crate::host::Host;

impl<H: Host> Orchestrator<H> {
    /// Reply with the layer's base definition.
    pub(super) fn find_layer(&mut self, origin: &Surface, data_id: &str) {
        let handle = self.registry.get(data_id).map(|r| r.handle.clone());
        let layer = handle.as_ref().and_then(|h| match self.host.find_layer(h) {
            Ok(layer) => layer,
            Err(err) => {
                warn!(session = %self.session, layer = %h, error = %err, "layer lookup failed");
                None
            }
        });
        self.reply_layer(origin, names::FIND_LAYER, data_id, handle.map(|h| h.as_str().to_string()), layer);
    }

    /// Reply with the layer's pending override patch.
    pub(super) fn get_overridden_layer(&mut self, origin: &Surface, data_id: &str) {
        let handle = self.registry.get(data_id).map(|r| r.handle.clone());
        let overrides = handle.as_ref().and_then(|h| match self.host.overridden_layers() {
            Ok(records) => records.into_iter().find(|r| &r.handle == h).map(|r| r.overrides),
            Err(err) => {
                warn!(session = %self.session, layer = %h, error = %err, "override lookup failed");
                None
            }
        });
        self.reply_layer(
            origin,
            names::GET_OVERRIDDEN_LAYER,
            data_id,
            handle.map(|h| h.as_str().to_string()),
            overrides,
        );
    }

    pub(super) fn get_selection(&mut self, origin: &Surface) {
        let response = self.selection.to_response();
        self.send(origin, names::GET_SELECTION, response);
    }

    fn reply_layer(
        &mut self,
        origin: &Surface,
        action: &'static str,
        data_id: &str,
        layer_id: Option<String>,
        layer: Option<Tree>,
    ) {
        if layer_id.is_none() {
            debug!(session = %self.session, dataset_id = data_id, action, "query for unknown dataset");
        }
        let response = LayerQueryResponse {
            data_id: data_id.to_string(),
            layer_id,
            layer,
        };
        self.send(origin, action, response);
    }
}
