//! Audit sink implementations.
//!
//! Every slot transition the supervisor performs is recorded here in order,
//! giving a reproducible lifecycle trail alongside the tracing output.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MonitorKind;
use crate::util::clock::now_ms;

/// Lifecycle transition recorded for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Thread spawned and slot filled.
    Started,
    /// `stop` signalled cancellation and is about to join.
    StopRequested,
    /// Thread joined and slot cleared.
    Stopped,
    /// `terminate_all` signalled cancellation without joining.
    TerminateRequested,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::StopRequested => "stop_requested",
            Self::Stopped => "stopped",
            Self::TerminateRequested => "terminate_requested",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Slot the event concerns.
    pub kind: MonitorKind,
    /// Transition taken.
    pub action: AuditAction,
    /// Task instance involved.
    pub run_id: Uuid,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// In-memory audit sink for testing and dev.
///
/// Clones share one bounded buffer, so a test can keep a clone while the
/// supervisor owns another.
#[derive(Debug, Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events for one kind, oldest first.
    #[must_use]
    pub fn events_for(&self, kind: MonitorKind) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if self.max_events == 0 {
            return;
        }
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    kind: MonitorKind,
    action: AuditAction,
    run_id: Uuid,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        kind,
        action,
        run_id,
        created_at_ms: now_ms(),
        detail,
    }
}
