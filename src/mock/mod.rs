//! In-process mock host
//!
//! Implements every host capability trait over plain in-memory state for
//! tests and the replay tool. Every successful call is recorded; failures
//! can be injected per call kind.
//!
//! # Asynchronous calls
//!
//! Terrain sampling and storage reads are queued rather than answered.
//! [`MockHost::resolve_pending`] answers them in issue order, which lets a
//! test interleave other messages between a call and its completion.

mod failure;
mod host;

pub use failure::{CallKind, FailureConfig, FailureInjector};
pub use host::{HostCall, MockHost, PostedMessage};
