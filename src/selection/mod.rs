//! Selection-synchronized highlight reconciler
//!
//! On every host "select" event the reconciler shifts the selection state and
//! rewrites tileset condition lists so that the selected feature, and only
//! it, carries the highlight rule. Rules inserted by other features (search
//! highlights and the like) are kept in place.
//!
//! Transition, given the old state and the new selection:
//! 1. The layer read as "previous" is the old current layer, or the incoming
//!    one when nothing was selected before.
//! 2. Shift: previous := current, current := incoming.
//! 3. Read the previous layer. For a tileset, note whether the new feature is
//!    already highlighted there and compute its rules minus any highlight.
//! 4. When the selection was cleared or moved to another layer, and the
//!    previous layer highlights the previously selected feature, write the
//!    stripped rules back (or the catch-all alone). Same-layer changes stop
//!    here.
//! 5. Otherwise highlight the new feature on the current layer, in front of
//!    the stripped rules (same layer) or the layer's own rules.
//!
//! [`reconcile`] is pure: it reads snapshots and returns the rewrites to
//! apply.

mod snapshot;

pub use snapshot::{
    conditions, conditions_patch, is_tileset, merge_snapshot, HostSnapshots, LayerSnapshots,
    CONDITIONS_PATH,
};

use scene_conditions::{strip_feature_highlights, targets_feature, ConditionList, ConditionRule};
use scene_protocol::actions::SelectionResponse;
use scene_protocol::Tree;
use serde::Serialize;

use crate::host::LayerHandle;

/// Current and previous selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub current_layer: Option<LayerHandle>,
    pub current_feature: Option<String>,
    pub previous_layer: Option<LayerHandle>,
    pub previous_feature: Option<String>,
}

impl SelectionState {
    pub fn to_response(&self) -> SelectionResponse {
        SelectionResponse {
            layer_id: self.current_layer.as_ref().map(|h| h.as_str().to_string()),
            feature_id: self.current_feature.clone(),
        }
    }
}

/// A host "select" event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionInput {
    pub layer: Option<LayerHandle>,
    /// Meaningful only for tileset layers.
    pub feature_id: Option<String>,
}

impl SelectionInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn feature(layer: LayerHandle, feature_id: impl Into<String>) -> Self {
        Self {
            layer: Some(layer),
            feature_id: Some(feature_id.into()),
        }
    }

    pub fn layer(layer: LayerHandle) -> Self {
        Self {
            layer: Some(layer),
            feature_id: None,
        }
    }
}

/// Result expressions used for generated rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub highlight_result: String,
    pub catch_all_result: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            highlight_result: "color('red')".to_string(),
            catch_all_result: "color('white')".to_string(),
        }
    }
}

/// A condition list to write to a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionRewrite {
    pub layer: LayerHandle,
    pub conditions: ConditionList,
}

impl ConditionRewrite {
    /// The override patch carrying the new list.
    pub fn to_patch(&self) -> Tree {
        conditions_patch(self.conditions.rules())
    }
}

/// Compute the next selection state and the condition rewrites it implies.
///
/// Layers whose snapshot is missing or not a tileset are never rewritten.
pub fn reconcile(
    state: &SelectionState,
    input: &SelectionInput,
    snapshots: &impl LayerSnapshots,
    style: &HighlightStyle,
) -> (SelectionState, Vec<ConditionRewrite>) {
    let read_layer = state.current_layer.clone().or_else(|| input.layer.clone());

    let next = SelectionState {
        previous_layer: state.current_layer.clone(),
        previous_feature: state.current_feature.clone(),
        current_layer: input.layer.clone(),
        current_feature: input.feature_id.clone(),
    };
    let same_layer = next.current_layer == next.previous_layer;
    let mut rewrites = Vec::new();

    let previous = read_layer.as_ref().map(|h| (h, snapshots.merged(h)));
    let mut should_highlight = false;
    let mut previous_tileset = false;
    let mut previous_rules = Vec::new();
    let mut stripped: Option<Vec<ConditionRule>> = None;

    if let Some((_, layer)) = previous.as_ref().filter(|(_, layer)| is_tileset(layer)) {
        previous_tileset = true;
        previous_rules = conditions(layer).unwrap_or_default();
        should_highlight = next
            .current_feature
            .as_deref()
            .is_some_and(|f| !targets_feature(&previous_rules, f));
        stripped = Some(strip_feature_highlights(&previous_rules));
    }

    let cleared = next.current_layer.is_none() && next.current_feature.is_none();
    let had_highlight = next
        .previous_feature
        .as_deref()
        .is_some_and(|f| targets_feature(&previous_rules, f));

    if (cleared || !same_layer) && previous_tileset && had_highlight {
        if let Some((handle, _)) = previous.as_ref() {
            let rules = stripped.clone().unwrap_or_default();
            rewrites.push(ConditionRewrite {
                layer: (*handle).clone(),
                conditions: ConditionList::normalized(rules, &style.catch_all_result),
            });
        }
        // A same-layer reselection never gets here: it is neither cleared
        // nor a different layer.
        if same_layer {
            return (next, rewrites);
        }
    }

    let (Some(handle), Some(feature)) = (next.current_layer.as_ref(), next.current_feature.as_deref()) else {
        return (next, rewrites);
    };
    if !should_highlight {
        return (next, rewrites);
    }

    let current = snapshots.merged(handle);
    if !is_tileset(&current) {
        return (next, rewrites);
    }

    let rest = match stripped {
        Some(rules) if same_layer => rules,
        _ => conditions(&current).unwrap_or_default(),
    };
    rewrites.push(ConditionRewrite {
        layer: handle.clone(),
        conditions: ConditionList::with_highlight(
            feature,
            &style.highlight_result,
            &rest,
            &style.catch_all_result,
        ),
    });

    (next, rewrites)
}
