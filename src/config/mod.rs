//! Orchestrator configuration
//!
//! Layered merge, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML config file
//! 3. JSON overrides (replay tool flags, tests)

mod defaults;
mod effective;

pub use defaults::{ExtensionsConfig, InfoboxConfig, OrchestratorConfig};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
