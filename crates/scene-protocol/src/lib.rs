//! Scene Protocol Types
//!
//! Defines the message envelope exchanged between the host, the orchestrator
//! widget, transient popup/modal surfaces and sibling plugin instances.

pub mod actions;
pub mod envelope;
pub mod error;
pub mod tree;

pub use actions::{names, DatasetDescriptor, InboundAction, SourceConfig};
pub use envelope::{Message, Surface};
pub use error::DecodeError;
pub use tree::{Scalar, Tree};
