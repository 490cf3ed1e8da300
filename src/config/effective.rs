//! Effective configuration with provenance
//!
//! Captures the merged settings plus where each layer came from.

use chrono::{DateTime, Utc};
use scene_protocol::Tree;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::defaults::OrchestratorConfig;
use crate::merge::merge_layers;

/// Schema identifier
pub const SCHEMA_ID: &str = "scene-orchestrator/effective_config@1";

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Overrides,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/overrides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Effective configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged, validated settings
    pub config: OrchestratorConfig,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config from defaults, an optional TOML file and
    /// optional JSON overrides.
    ///
    /// A file path that does not exist is skipped.
    pub fn build(file: Option<&Path>, overrides: Option<Value>) -> Result<Self, ConfigError> {
        let mut layers = vec![OrchestratorConfig::default().to_tree()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = file {
            if path.exists() {
                let (tree, digest) = load_toml_file(path)?;
                layers.push(tree);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        if let Some(value) = overrides {
            layers.push(Tree::from(value));
            sources.push(ConfigSource {
                origin: ConfigOrigin::Overrides,
                path: None,
                digest: None,
            });
        }

        let merged = Value::from(merge_layers(layers));
        let config: OrchestratorConfig =
            serde_json::from_value(merged).map_err(|e| ConfigError::Parse(e.to_string()))?;
        validate(&config)?;

        Ok(Self {
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            sources,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn load_toml_file(path: &Path) -> Result<(Tree, String), ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::Io(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::Parse(format!("Invalid UTF-8: {}", e)))?;
    let value: toml::Value = toml::from_str(&contents)
        .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;

    Ok((Tree::from(toml_to_json(value)), digest))
}

fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn validate(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.wms_raster_alpha) {
        return Err(ConfigError::Validation(
            "wms_raster_alpha must be in [0, 1]".to_string(),
        ));
    }

    if config.transit_near_distance.is_nan() || config.transit_near_distance <= 0.0 {
        return Err(ConfigError::Validation(
            "transit_near_distance must be positive".to_string(),
        ));
    }

    for (key, expr) in [
        ("highlight_result", &config.highlight_result),
        ("catch_all_result", &config.catch_all_result),
    ] {
        if expr.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} must not be empty", key)));
        }
    }

    if !config.appearance_defaults.is_map() {
        return Err(ConfigError::Validation(
            "appearance_defaults must be a table".to_string(),
        ));
    }

    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
