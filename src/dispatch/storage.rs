//! Key-value storage handlers.
//!
//! Writes are fire-and-forget. Reads are asynchronous; the reply goes back
//! to the asking surface only if that surface was not reopened or closed in
//! the meantime.

use scene_protocol::actions::{DataKeysResponse, DataValueResponse};
use scene_protocol::{names, Surface};
use serde_json::Value;
use tracing::{debug, warn};

use super::Orchestrator;
use crate::continuation::{Completion, Continuation};
use crate::host::Host;

impl<H: Host> Orchestrator<H> {
    pub(super) fn save_data(&mut self, key: &str, value: &Value) {
        if let Err(err) = self.host.set_value(key, value) {
            warn!(session = %self.session, key, error = %err, "storage write failed");
        }
    }

    pub(super) fn remove_data(&mut self, key: &str) {
        if let Err(err) = self.host.delete_value(key) {
            warn!(session = %self.session, key, error = %err, "storage delete failed");
        }
    }

    pub(super) fn get_data(&mut self, origin: Surface, key: String) {
        let continuation = self.reply_to(origin, names::GET_DATA);
        let ticket = self.continuations.issue(continuation);
        if let Err(err) = self.host.request_value(ticket, &key) {
            self.continuations.cancel(ticket);
            warn!(session = %self.session, key = %key, error = %err, "storage read failed");
        }
    }

    pub(super) fn list_data_keys(&mut self, origin: Surface) {
        let continuation = self.reply_to(origin, names::LIST_DATA_KEYS);
        let ticket = self.continuations.issue(continuation);
        if let Err(err) = self.host.request_keys(ticket) {
            self.continuations.cancel(ticket);
            warn!(session = %self.session, error = %err, "storage key listing failed");
        }
    }

    pub(super) fn finish_reply(
        &mut self,
        surface: Surface,
        surface_generation: u64,
        action: &'static str,
        completion: Completion,
    ) {
        if self.surfaces.generation(&surface) != surface_generation {
            debug!(session = %self.session, %surface, action, "surface changed since request, reply dropped");
            return;
        }
        match completion {
            Completion::StorageValue { key, value, .. } => {
                self.send(&surface, action, DataValueResponse { key, value })
            }
            Completion::StorageKeys { keys, .. } => {
                self.send(&surface, action, DataKeysResponse { keys })
            }
            other => {
                warn!(session = %self.session, action, completion = ?other, "unexpected completion for reply");
            }
        }
    }

    fn reply_to(&self, surface: Surface, action: &'static str) -> Continuation {
        Continuation::Reply {
            surface_generation: self.surfaces.generation(&surface),
            surface,
            action,
        }
    }
}
