//! Merged layer snapshots.
//!
//! The host keeps a layer's base definition apart from its pending override
//! patch. The reconciler reads "current" state by merging the two for the
//! `data` and `3dtiles` branches.

use std::collections::BTreeMap;

use scene_conditions::ConditionRule;
use scene_protocol::Tree;
use tracing::debug;

use crate::host::{LayerHandle, LayerHost};
use crate::layer::AppearanceCategory;
use crate::merge::deep_merge;

/// Path of a tileset's highlight condition list inside a layer definition.
pub const CONDITIONS_PATH: [&str; 4] = ["3dtiles", "color", "expression", "conditions"];

/// Source of merged layer configurations.
pub trait LayerSnapshots {
    /// Base definition merged with pending overrides; an empty map when the
    /// layer does not exist or cannot be read.
    fn merged(&self, handle: &LayerHandle) -> Tree;
}

/// Reads snapshots straight from a host.
pub struct HostSnapshots<'a, H: ?Sized>(pub &'a H);

impl<H: LayerHost + ?Sized> LayerSnapshots for HostSnapshots<'_, H> {
    fn merged(&self, handle: &LayerHandle) -> Tree {
        let base = match self.0.find_layer(handle) {
            Ok(Some(base)) => base,
            Ok(None) => {
                debug!(layer = %handle, "layer gone, reading as empty");
                return Tree::map();
            }
            Err(err) => {
                debug!(layer = %handle, error = %err, "layer unreadable, reading as empty");
                return Tree::map();
            }
        };

        let patch = match self.0.overridden_layers() {
            Ok(records) => records
                .into_iter()
                .find(|r| &r.handle == handle)
                .map(|r| r.overrides),
            Err(err) => {
                debug!(layer = %handle, error = %err, "overrides unreadable, using base only");
                None
            }
        };

        match patch {
            Some(patch) => merge_snapshot(base, &patch),
            None => base,
        }
    }
}

/// Fixed snapshots, keyed by handle.
impl LayerSnapshots for BTreeMap<LayerHandle, Tree> {
    fn merged(&self, handle: &LayerHandle) -> Tree {
        self.get(handle).cloned().unwrap_or_default()
    }
}

/// Merge the `data` and tileset branches of `patch` into `base`.
pub fn merge_snapshot(mut base: Tree, patch: &Tree) -> Tree {
    for key in ["data", AppearanceCategory::Tileset.key()] {
        let Some(overlay) = patch.get(key) else {
            continue;
        };
        let current = base.remove(key).unwrap_or_default();
        base.insert(key, deep_merge(current, overlay.clone()));
    }
    base
}

/// Whether the layer's declared content type is a tileset.
pub fn is_tileset(layer: &Tree) -> bool {
    layer.get_path(&["data", "type"]).and_then(Tree::as_str) == Some("3dtiles")
}

/// The tileset condition list, if present and well-formed.
pub fn conditions(layer: &Tree) -> Option<Vec<ConditionRule>> {
    let value = serde_json::Value::from(layer.get_path(&CONDITIONS_PATH)?.clone());
    serde_json::from_value(value).ok()
}

/// Override patch replacing a layer's condition list.
pub fn conditions_patch(rules: &[ConditionRule]) -> Tree {
    let rules: Vec<Tree> = rules
        .iter()
        .map(|r| Tree::Sequence(vec![r.predicate.as_str().into(), r.result.as_str().into()]))
        .collect();
    let mut patch = Tree::map();
    patch.insert_path(&CONDITIONS_PATH, Tree::Sequence(rules));
    patch
}
