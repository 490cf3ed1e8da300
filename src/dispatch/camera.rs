//! Camera fly-to with terrain sampling.

use scene_protocol::actions::FlyToRequest;
use tracing::{debug, warn};

use super::Orchestrator;
use crate::continuation::{Continuation, DatasetStamp};
use crate::host::{CameraPosition, Host};

impl<H: Host> Orchestrator<H> {
    /// Move the camera. Without an explicit height the terrain is sampled
    /// first and the move happens on completion. An unknown `dataID` leaves
    /// the camera and any pending fly-to untouched.
    pub(super) fn fly_to(&mut self, request: FlyToRequest) {
        let dataset = match request.data_id.as_deref() {
            Some(data_id) => match self.registry.get(data_id) {
                Some(record) => Some(DatasetStamp {
                    data_id: record.data_id.clone(),
                    generation: record.generation,
                }),
                None => {
                    debug!(session = %self.session, dataset_id = data_id, "fly-to for unknown dataset ignored");
                    return;
                }
            },
            None => None,
        };

        let camera_generation = self.camera.bump();

        if let Some(height) = request.height {
            self.move_camera(&request, height);
            return;
        }

        let (lng, lat) = (request.lng, request.lat);
        let ticket = self.continuations.issue(Continuation::FlyTo {
            camera_generation,
            dataset,
            request,
        });
        if let Err(err) = self.host.sample_terrain_height(ticket, lng, lat) {
            self.continuations.cancel(ticket);
            warn!(session = %self.session, error = %err, "terrain sampling failed");
        }
    }

    pub(super) fn finish_fly_to(
        &mut self,
        camera_generation: u64,
        dataset: Option<DatasetStamp>,
        request: FlyToRequest,
        terrain_height: f64,
    ) {
        if !self.camera.is_current(camera_generation) {
            debug!(session = %self.session, "newer fly-to issued, terrain result dropped");
            return;
        }
        if let Some(stamp) = dataset {
            let live = self
                .registry
                .get(&stamp.data_id)
                .is_some_and(|r| r.generation == stamp.generation);
            if !live {
                debug!(session = %self.session, dataset_id = %stamp.data_id, "dataset removed or replaced, fly-to dropped");
                return;
            }
        }
        self.move_camera(&request, terrain_height + self.config.camera_height_offset);
    }

    fn move_camera(&mut self, request: &FlyToRequest, height: f64) {
        let camera = CameraPosition {
            lng: request.lng,
            lat: request.lat,
            height,
            heading: request.heading,
            pitch: request.pitch,
            range: request.range,
        };
        if let Err(err) = self.host.fly_to(&camera) {
            warn!(session = %self.session, error = %err, "camera move failed");
        }
    }
}
