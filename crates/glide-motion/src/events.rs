//! Timeline lifecycle events.
//!
//! Finish callbacks cannot reach the host that is driving them, so surfaces
//! that chain runs (snap → settle, page → next page) poll these events after
//! each `update` instead.
//!
//! ```ignore
//! host.update(16.0);
//! for event in host.drain_events() {
//!     if let TimelineEvent::Finished { key, .. } = event {
//!         println!("{} settled", key);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::RunId;

/// Event emitted when a timed run changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// Run started; its progress-0 sample has been applied.
    Started { run_id: RunId, key: String },
    /// A repeating run wrapped around.
    Iteration { run_id: RunId, key: String, iteration: u32 },
    /// Run reached progress 1 and fired its finish callbacks.
    Finished { run_id: RunId, key: String },
    /// Run was stopped early (explicitly, or replaced by a newer run on the
    /// same key). Finish callbacks did not fire.
    Aborted { run_id: RunId, key: String },
}

impl TimelineEvent {
    pub fn key(&self) -> &str {
        match self {
            Self::Started { key, .. }
            | Self::Iteration { key, .. }
            | Self::Finished { key, .. }
            | Self::Aborted { key, .. } => key,
        }
    }

    pub fn run_id(&self) -> RunId {
        match self {
            Self::Started { run_id, .. }
            | Self::Iteration { run_id, .. }
            | Self::Finished { run_id, .. }
            | Self::Aborted { run_id, .. } => *run_id,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// Queue for collecting events during update cycles.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<TimelineEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TimelineEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<TimelineEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = TimelineEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&TimelineEvent> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events for one run key.
    pub fn events_for_key(&self, key: &str) -> Vec<&TimelineEvent> {
        self.events.iter().filter(|e| e.key() == key).collect()
    }
}
