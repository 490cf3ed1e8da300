//! Infobox binding for classified datasets.

use scene_protocol::Tree;

use super::BuildOptions;
use crate::merge::merge_infobox;

/// Classification codes whose layers get the default infobox block.
pub const INFOBOX_CODES: &[&str] = &[
    "bldg", "tran", "brid", "rail", "frn", "veg", "luse", "urf", "lsld", "fld", "tnm", "htd",
    "ifld", "gen", "shelter", "park", "landmark", "station", "emergency_route", "border",
];

/// Infobox of a new layer.
///
/// Built from the global default, then the default block for classified
/// datasets, then the caller's infobox override.
pub fn binding(type_code: Option<&str>, caller: Option<&Tree>, options: &BuildOptions) -> Tree {
    let mut infobox = global_default();
    if type_code.is_some_and(|code| INFOBOX_CODES.contains(&code)) {
        infobox = merge_infobox(infobox, classified_default(options));
    }
    if let Some(caller) = caller {
        infobox = merge_infobox(infobox, caller.clone());
    }
    infobox
}

fn global_default() -> Tree {
    let mut tree = Tree::map();
    tree.insert_path(&["property", "default", "unselectOnClose"], true);
    tree
}

fn classified_default(options: &BuildOptions) -> Tree {
    let block = Tree::from_pairs([
        ("pluginId", options.infobox_plugin_id.as_str()),
        ("extensionId", options.infobox_extension_id.as_str()),
    ]);
    let display = Tree::from_pairs([
        ("bgcolor", Tree::from("#d9d9d9")),
        ("heightType", Tree::from("auto")),
        ("showTitle", Tree::from(false)),
        ("size", Tree::from("medium")),
    ]);
    Tree::from_pairs([
        ("blocks", Tree::Sequence(vec![block])),
        ("property", Tree::from_pairs([("default", display)])),
    ])
}
