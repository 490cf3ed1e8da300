//! Dataset-layer registry
//!
//! Maps dataset ids to the host layers rendering them. The map is
//! copy-on-write: cloning a [`Registry`] is an O(1) snapshot, and
//! [`Registry::diff`] reports what changed between two snapshots.

mod ops;

pub use ops::{add, remove, remove_all, set_visibility, update_overrides, AddOutcome};

use std::collections::BTreeMap;
use std::sync::Arc;

use scene_protocol::DatasetDescriptor;
use serde::Serialize;

use crate::host::LayerHandle;
use crate::layer::DataFormat;

/// Visibility of a registered layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Showing,
    Hidden,
}

/// One dataset bound to one host layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub data_id: String,
    pub handle: LayerHandle,
    pub visibility: Visibility,
    pub descriptor: Arc<DatasetDescriptor>,
    pub format: DataFormat,
    /// Stamped at creation; a re-created dataset gets a new generation.
    pub generation: u64,
}

/// Registry contents keyed by dataset id.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Arc<BTreeMap<String, LayerRecord>>,
    next_generation: u64,
}

/// Differences between two registry snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Present in both with a different handle, visibility or generation.
    pub changed: Vec<String>,
}

impl RegistryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, data_id: &str) -> Option<&LayerRecord> {
        self.records.get(data_id)
    }

    pub fn contains(&self, data_id: &str) -> bool {
        self.records.contains_key(data_id)
    }

    /// The record whose layer is `handle`.
    pub fn find_by_handle(&self, handle: &LayerHandle) -> Option<&LayerRecord> {
        self.records.values().find(|r| &r.handle == handle)
    }

    /// Registered dataset ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Immutable snapshot sharing storage with `self` until the next write.
    pub fn snapshot(&self) -> Registry {
        self.clone()
    }

    pub fn diff(before: &Registry, after: &Registry) -> RegistryDiff {
        let mut diff = RegistryDiff::default();
        if Arc::ptr_eq(&before.records, &after.records) {
            return diff;
        }

        for (id, record) in after.records.iter() {
            match before.records.get(id) {
                None => diff.added.push(id.clone()),
                Some(old)
                    if old.handle != record.handle
                        || old.visibility != record.visibility
                        || old.generation != record.generation =>
                {
                    diff.changed.push(id.clone())
                }
                Some(_) => {}
            }
        }
        diff.removed = before
            .records
            .keys()
            .filter(|id| !after.records.contains_key(*id))
            .cloned()
            .collect();
        diff
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Insert or replace the record for its dataset id.
    fn insert(&mut self, record: LayerRecord) {
        Arc::make_mut(&mut self.records).insert(record.data_id.clone(), record);
    }

    fn set(&mut self, data_id: &str, visibility: Visibility) -> Option<&LayerRecord> {
        let record = Arc::make_mut(&mut self.records).get_mut(data_id)?;
        record.visibility = visibility;
        Some(record)
    }

    fn take(&mut self, data_id: &str) -> Option<LayerRecord> {
        if !self.records.contains_key(data_id) {
            return None;
        }
        Arc::make_mut(&mut self.records).remove(data_id)
    }

    fn take_all(&mut self) -> Vec<LayerRecord> {
        let records = std::mem::take(&mut self.records);
        Arc::try_unwrap(records)
            .unwrap_or_else(|shared| (*shared).clone())
            .into_values()
            .collect()
    }
}
