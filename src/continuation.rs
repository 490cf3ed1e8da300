//! Asynchronous host calls and their stale-result guards.
//!
//! Every asynchronous call is issued with a fresh [`Ticket`] and a
//! [`Continuation`] recording the generation tokens that were current at the
//! time. When the host delivers a [`Completion`], the dispatcher compares
//! those tokens with the current ones and drops the result if anything it
//! refers to was removed or superseded in between.

use std::collections::HashMap;
use std::fmt;

use scene_protocol::actions::FlyToRequest;
use scene_protocol::Surface;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of one outstanding asynchronous host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of an asynchronous host call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Completion {
    TerrainHeight {
        ticket: Ticket,
        height: f64,
    },
    StorageValue {
        ticket: Ticket,
        key: String,
        #[serde(default)]
        value: Option<Value>,
    },
    StorageKeys {
        ticket: Ticket,
        keys: Vec<String>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::TerrainHeight { ticket, .. }
            | Self::StorageValue { ticket, .. }
            | Self::StorageKeys { ticket, .. } => *ticket,
        }
    }
}

/// A dataset as it was when the call was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStamp {
    pub data_id: String,
    pub generation: u64,
}

/// What to do when a completion arrives, and what must still hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Move the camera over sampled terrain.
    FlyTo {
        camera_generation: u64,
        dataset: Option<DatasetStamp>,
        request: FlyToRequest,
    },
    /// Reply to the surface that asked.
    Reply {
        surface: Surface,
        surface_generation: u64,
        action: &'static str,
    },
}

/// Outstanding continuations keyed by ticket.
#[derive(Debug, Default)]
pub struct Continuations {
    next_ticket: u64,
    pending: HashMap<Ticket, Continuation>,
}

impl Continuations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a continuation under a fresh ticket.
    pub fn issue(&mut self, continuation: Continuation) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending.insert(ticket, continuation);
        ticket
    }

    /// Remove and return the continuation for a ticket.
    pub fn take(&mut self, ticket: Ticket) -> Option<Continuation> {
        self.pending.remove(&ticket)
    }

    /// Forget a ticket whose host call could not be issued.
    pub fn cancel(&mut self, ticket: Ticket) {
        self.pending.remove(&ticket);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Monotonic token bumped whenever the thing it guards changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Advance and return the new value.
    pub fn bump(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0 == token
    }
}
