//! Override merge engine
//!
//! Deep merge over `Tree` values, by node kind:
//! - Map over map: merged key by key, recursively, at any depth
//! - Map under a non-map override: the map is kept
//! - Sequence or scalar: replaced whole by the override (last wins)
//!
//! A partial override therefore never erases sibling defaults outside the
//! paths it names.

use scene_protocol::Tree;

/// Deep merge two trees.
///
/// A scalar or sequence laid over a map is ignored and the map is returned
/// unchanged, so `{"marker": "off"}` cannot blank out a default `marker` block.
pub fn deep_merge(base: Tree, overlay: Tree) -> Tree {
    match (base, overlay) {
        // Both maps: deep merge
        (Tree::Map(mut base_map), Tree::Map(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Tree::Map(base_map)
        }

        // Tree-valued defaults are refined, never replaced by a leaf
        (base @ Tree::Map(_), _) => base,

        // Sequences and scalars: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence).
pub fn merge_layers(layers: impl IntoIterator<Item = Tree>) -> Tree {
    layers.into_iter().fold(Tree::map(), deep_merge)
}

/// Merge two infobox definitions.
///
/// Same as [`deep_merge`] except for `blocks`: blocks are matched by
/// `(pluginId, extensionId)`; a matching override block is merged into the
/// base block, any other override block is appended.
pub fn merge_infobox(base: Tree, overlay: Tree) -> Tree {
    let base_blocks = base.get("blocks").and_then(Tree::as_sequence).map(<[Tree]>::to_vec);
    let overlay_blocks = overlay.get("blocks").and_then(Tree::as_sequence).map(<[Tree]>::to_vec);

    let mut merged = deep_merge(base, overlay);
    if let (Some(base_blocks), Some(overlay_blocks)) = (base_blocks, overlay_blocks) {
        merged.insert("blocks", Tree::Sequence(merge_blocks(base_blocks, overlay_blocks)));
    }
    merged
}

fn merge_blocks(base: Vec<Tree>, overlay: Vec<Tree>) -> Vec<Tree> {
    let mut blocks = base;
    for block in overlay {
        let key = block_key(&block);
        let existing = key
            .as_ref()
            .and_then(|key| blocks.iter().position(|b| block_key(b).as_ref() == Some(key)));
        match existing {
            Some(index) => {
                let current = std::mem::take(&mut blocks[index]);
                blocks[index] = deep_merge(current, block);
            }
            None => blocks.push(block),
        }
    }
    blocks
}

fn block_key(block: &Tree) -> Option<(String, String)> {
    let plugin = block.get("pluginId").and_then(Tree::as_str).unwrap_or_default();
    let extension = block.get("extensionId").and_then(Tree::as_str)?;
    Some((plugin.to_string(), extension.to_string()))
}
