//! Failure injection for the mock host

use std::collections::HashMap;

use crate::host::HostError;

/// Host capability calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    AddLayer,
    FindLayer,
    OverrideLayer,
    ShowLayer,
    HideLayer,
    DeleteLayer,
    OverriddenLayers,
    SampleTerrain,
    FlyTo,
    GetData,
    SetData,
    DeleteData,
    ListKeys,
    Post,
    OpenPopup,
    ClosePopup,
    OpenModal,
    CloseModal,
}

impl CallKind {
    pub fn name(&self) -> &'static str {
        match self {
            CallKind::AddLayer => "add_layer",
            CallKind::FindLayer => "find_layer",
            CallKind::OverrideLayer => "override_layer",
            CallKind::ShowLayer => "show_layer",
            CallKind::HideLayer => "hide_layer",
            CallKind::DeleteLayer => "delete_layer",
            CallKind::OverriddenLayers => "overridden_layers",
            CallKind::SampleTerrain => "sample_terrain_height",
            CallKind::FlyTo => "fly_to",
            CallKind::GetData => "request_value",
            CallKind::SetData => "set_value",
            CallKind::DeleteData => "delete_value",
            CallKind::ListKeys => "request_keys",
            CallKind::Post => "post",
            CallKind::OpenPopup => "open_popup",
            CallKind::ClosePopup => "close_popup",
            CallKind::OpenModal => "open_modal",
            CallKind::CloseModal => "close_modal",
        }
    }
}

/// Failure configuration for a call kind
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// Reason reported in the error
    pub reason: String,
    /// Number of times to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fail_count: None,
        }
    }

    /// Set the number of times to fail before succeeding
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }
}

/// Failure injector for the mock host
#[derive(Debug, Default)]
pub struct FailureInjector {
    configs: HashMap<CallKind, FailureConfig>,
    /// Call counts per kind (for fail_count tracking)
    call_counts: HashMap<CallKind, u32>,
}

impl FailureInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&mut self, kind: CallKind, config: FailureConfig) {
        self.configs.insert(kind, config);
        self.call_counts.insert(kind, 0);
    }

    /// Make every call of `kind` fail
    pub fn inject_error(&mut self, kind: CallKind, reason: impl Into<String>) {
        self.inject(kind, FailureConfig::error(reason));
    }

    pub fn clear(&mut self) {
        self.configs.clear();
        self.call_counts.clear();
    }

    pub fn clear_call(&mut self, kind: CallKind) {
        self.configs.remove(&kind);
        self.call_counts.remove(&kind);
    }

    /// The error this call should fail with, if any
    pub fn check(&mut self, kind: CallKind) -> Result<(), HostError> {
        let Some(config) = self.configs.get(&kind) else {
            return Ok(());
        };
        let count = self.call_counts.entry(kind).or_insert(0);
        *count += 1;

        if config.fail_count.is_some_and(|limit| *count > limit) {
            return Ok(());
        }

        Err(HostError::Rejected {
            call: kind.name(),
            reason: config.reason.clone(),
        })
    }
}
