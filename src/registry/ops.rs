//! Registry transitions.
//!
//! Each operation is total over present and absent dataset ids: a miss
//! returns `None` and touches nothing. Show/hide/delete/override failures
//! are logged and the registry still records the requested state; only a
//! failed layer creation is returned to the caller, since no handle exists.

use std::sync::Arc;

use scene_protocol::{DatasetDescriptor, Tree};
use tracing::{debug, info, warn};

use super::{LayerRecord, Registry, Visibility};
use crate::host::{HostError, LayerHandle, LayerHost};
use crate::layer::{appearance, build_layer, resolve_source, BuildOptions};

/// Result of [`add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Already registered; the existing layer was shown again.
    Reshown(LayerHandle),
    /// A new layer was created.
    Created {
        handle: LayerHandle,
        visibility: Visibility,
    },
}

impl AddOutcome {
    pub fn handle(&self) -> &LayerHandle {
        match self {
            Self::Reshown(handle) | Self::Created { handle, .. } => handle,
        }
    }
}

/// Add a dataset, or show it again if it is already registered.
pub fn add<H: LayerHost + ?Sized>(
    registry: &mut Registry,
    host: &mut H,
    descriptor: DatasetDescriptor,
    overrides: Option<&Tree>,
    options: &BuildOptions,
) -> Result<AddOutcome, HostError> {
    if let Some(existing) = registry.get(&descriptor.data_id) {
        let handle = existing.handle.clone();
        report("show_layer", &handle, host.show_layer(&handle));
        registry.set(&descriptor.data_id, Visibility::Showing);
        debug!(dataset_id = %descriptor.data_id, layer = %handle, "dataset already registered, shown again");
        return Ok(AddOutcome::Reshown(handle));
    }

    let payload = build_layer(&descriptor, overrides, options);
    let handle = host.add_layer(&payload)?;

    let visibility = if descriptor.starts_hidden() {
        report("hide_layer", &handle, host.hide_layer(&handle));
        Visibility::Hidden
    } else {
        Visibility::Showing
    };

    let generation = registry.next_generation();
    info!(
        dataset_id = %descriptor.data_id,
        layer = %handle,
        ?visibility,
        generation,
        "dataset added"
    );
    registry.insert(LayerRecord {
        data_id: descriptor.data_id.clone(),
        handle: handle.clone(),
        visibility,
        format: resolve_source(&descriptor).format,
        descriptor: Arc::new(descriptor),
        generation,
    });

    Ok(AddOutcome::Created { handle, visibility })
}

/// Patch a registered layer's overrides, returning the patch applied.
///
/// Transit feed datasets get the near-distance/ground-clamp transform first.
pub fn update_overrides<H: LayerHost + ?Sized>(
    registry: &Registry,
    host: &mut H,
    data_id: &str,
    overrides: &Tree,
    options: &BuildOptions,
) -> Option<Tree> {
    let Some(record) = registry.get(data_id) else {
        debug!(dataset_id = data_id, "update for unknown dataset ignored");
        return None;
    };

    let patch = if record.format.is_transit_feed() {
        appearance::transit_transform(overrides, options.transit_near_distance)
    } else {
        overrides.clone()
    };
    report(
        "override_layer",
        &record.handle,
        host.override_layer(&record.handle, &patch),
    );
    Some(patch)
}

/// Show or hide a registered layer.
pub fn set_visibility<H: LayerHost + ?Sized>(
    registry: &mut Registry,
    host: &mut H,
    data_id: &str,
    hidden: bool,
) -> Option<Visibility> {
    let Some(handle) = registry.get(data_id).map(|r| r.handle.clone()) else {
        debug!(dataset_id = data_id, "visibility change for unknown dataset ignored");
        return None;
    };

    let visibility = if hidden {
        report("hide_layer", &handle, host.hide_layer(&handle));
        Visibility::Hidden
    } else {
        report("show_layer", &handle, host.show_layer(&handle));
        Visibility::Showing
    };
    registry.set(data_id, visibility);
    info!(dataset_id = data_id, layer = %handle, ?visibility, "visibility changed");
    Some(visibility)
}

/// Delete a dataset's layer and drop its record.
pub fn remove<H: LayerHost + ?Sized>(
    registry: &mut Registry,
    host: &mut H,
    data_id: &str,
) -> Option<LayerRecord> {
    let Some(record) = registry.take(data_id) else {
        debug!(dataset_id = data_id, "removal of unknown dataset ignored");
        return None;
    };
    report("delete_layer", &record.handle, host.delete_layer(&record.handle));
    info!(dataset_id = data_id, layer = %record.handle, "dataset removed");
    Some(record)
}

/// Delete every registered layer.
pub fn remove_all<H: LayerHost + ?Sized>(registry: &mut Registry, host: &mut H) -> Vec<LayerRecord> {
    let records = registry.take_all();
    for record in &records {
        report("delete_layer", &record.handle, host.delete_layer(&record.handle));
    }
    info!(count = records.len(), "all datasets removed");
    records
}

fn report(call: &'static str, handle: &LayerHandle, result: Result<(), HostError>) {
    if let Err(err) = result {
        warn!(call, layer = %handle, error = %err, "host call failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CallKind, HostCall, MockHost};
    use serde_json::json;

    fn options() -> BuildOptions {
        BuildOptions::default()
    }

    fn geojson(id: &str) -> DatasetDescriptor {
        DatasetDescriptor::new(id, "GeoJSON", "https://example.com/a.geojson")
    }

    #[test]
    fn test_add_creates_once() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();

        let first = add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        let second = add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();

        assert!(matches!(first, AddOutcome::Created { visibility: Visibility::Showing, .. }));
        assert_eq!(second, AddOutcome::Reshown(first.handle().clone()));
        assert_eq!(registry.len(), 1);
        assert_eq!(host.count(CallKind::AddLayer), 1);
        assert_eq!(host.count(CallKind::ShowLayer), 1);
    }

    #[test]
    fn test_add_hidden() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();

        let outcome = add(
            &mut registry,
            &mut host,
            geojson("d1").with_visible(false),
            None,
            &options(),
        )
        .unwrap();

        let handle = outcome.handle().clone();
        assert_eq!(registry.get("d1").unwrap().visibility, Visibility::Hidden);
        assert!(host.calls().contains(&HostCall::HideLayer { handle }));
    }

    #[test]
    fn test_readd_of_hidden_shows_again() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        set_visibility(&mut registry, &mut host, "d1", true);

        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        assert_eq!(registry.get("d1").unwrap().visibility, Visibility::Showing);
    }

    #[test]
    fn test_failed_create_registers_nothing() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        host.failures_mut().inject_error(CallKind::AddLayer, "engine busy");

        let err = add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap_err();
        assert!(matches!(err, HostError::Rejected { call: "add_layer", .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_generation_changes_on_recreate() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        let first = registry.get("d1").unwrap().generation;

        remove(&mut registry, &mut host, "d1");
        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        assert_ne!(registry.get("d1").unwrap().generation, first);
    }

    #[test]
    fn test_update_overrides_transit_feed() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        add(
            &mut registry,
            &mut host,
            DatasetDescriptor::new("d-gtfs", "GTFS", "https://example.com/gtfs"),
            None,
            &options(),
        )
        .unwrap();

        let patch = update_overrides(
            &registry,
            &mut host,
            "d-gtfs",
            &Tree::from(json!({"marker": {"imageColor": "red"}})),
            &options(),
        )
        .unwrap();

        assert_eq!(
            patch,
            Tree::from(json!({"marker": {"imageColor": "red", "near": 1000, "clampToGround": true}}))
        );
        assert!(patch.get("polyline").is_none());
    }

    #[test]
    fn test_update_overrides_is_a_patch() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        let handle = add(&mut registry, &mut host, geojson("d1"), None, &options())
            .unwrap()
            .handle()
            .clone();

        update_overrides(&registry, &mut host, "d1", &Tree::from(json!({"marker": {"pointColor": "red"}})), &options());
        update_overrides(&registry, &mut host, "d1", &Tree::from(json!({"marker": {"pointSize": 4}})), &options());

        assert_eq!(
            host.overrides_of(&handle),
            Some(Tree::from(json!({"marker": {"pointColor": "red", "pointSize": 4}})))
        );
    }

    #[test]
    fn test_misses_are_no_ops() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();

        assert!(update_overrides(&registry, &mut host, "x", &Tree::map(), &options()).is_none());
        assert!(set_visibility(&mut registry, &mut host, "x", true).is_none());
        assert!(remove(&mut registry, &mut host, "x").is_none());
        assert!(remove_all(&mut registry, &mut host).is_empty());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_failed_hide_still_records_hidden() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        host.failures_mut().inject_error(CallKind::HideLayer, "gone");

        assert_eq!(set_visibility(&mut registry, &mut host, "d1", true), Some(Visibility::Hidden));
        assert_eq!(registry.get("d1").unwrap().visibility, Visibility::Hidden);
    }

    #[test]
    fn test_remove_all() {
        let mut registry = Registry::new();
        let mut host = MockHost::new();
        add(&mut registry, &mut host, geojson("d1"), None, &options()).unwrap();
        add(&mut registry, &mut host, geojson("d2"), None, &options()).unwrap();

        let removed = remove_all(&mut registry, &mut host);
        assert_eq!(removed.len(), 2);
        assert!(registry.is_empty());
        assert_eq!(host.count(CallKind::DeleteLayer), 2);
        assert_eq!(host.layer_count(), 0);
    }
}
