//! Error types for supervisor operations and monitor cycles.

use std::time::Duration;

use thiserror::Error;

use super::MonitorKind;

/// Errors produced by supervisor operations.
///
/// These are caller mistakes or environment failures surfaced synchronously;
/// nothing here is retried by the supervisor.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The slot already holds a running or stopping monitor.
    #[error("{0} monitor is already running")]
    AlreadyRunning(MonitorKind),
    /// A name did not match any monitor kind.
    #[error("unknown monitor kind: {0}")]
    UnknownKind(String),
    /// A zero interval was requested.
    #[error("{0} monitor interval must be greater than 0")]
    InvalidInterval(MonitorKind),
    /// The factory has no collaborator for this kind.
    #[error("no monitor registered for {0}")]
    NoMonitor(MonitorKind),
    /// The OS refused to spawn the monitor thread.
    #[error("failed to spawn {kind} monitor thread: {reason}")]
    Spawn {
        /// Kind whose thread failed to start.
        kind: MonitorKind,
        /// OS error text.
        reason: String,
    },
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::AlreadyRunning(_) => "already_running",
            Self::UnknownKind(_) => "unknown_kind",
            Self::InvalidInterval(_) => "invalid_interval",
            Self::NoMonitor(_) => "no_monitor",
            Self::Spawn { .. } => "spawn_failed",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Failure of a single monitor cycle. Logged and counted, never fatal to the loop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The collaborator reported a failure.
    #[error("cycle failed: {0}")]
    Failed(String),
    /// The collaborator gave up waiting on an external system.
    #[error("cycle timed out after {0:?}")]
    Timeout(Duration),
}

impl CycleError {
    /// Shorthand for [`CycleError::Failed`].
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
