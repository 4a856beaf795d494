//! Pairs a running [`PeriodicTask`] with the OS thread executing it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use super::task::TaskCounters;
use super::{CancelToken, MonitorKind, PeriodicTask, SupervisorError, TaskStats};
use crate::util::now_ms;

/// Handle to a monitor thread.
///
/// Holds everything the supervisor needs after the task itself has moved onto
/// its thread: the cancellation token, the shared counters and the join handle.
pub struct TaskHandle {
    kind: MonitorKind,
    interval: Duration,
    run_id: Uuid,
    started_at_ms: u128,
    token: CancelToken,
    counters: Arc<TaskCounters>,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Move `task` onto a new named OS thread and return its handle.
    ///
    /// # Errors
    ///
    /// Returns `SupervisorError::Spawn` if the OS refuses to create the thread.
    pub fn spawn(
        task: PeriodicTask,
        name_prefix: &str,
        stack_size: usize,
    ) -> Result<Self, SupervisorError> {
        let kind = task.kind();
        let interval = task.interval();
        let run_id = task.run_id();
        let token = task.token();
        let counters = task.counters();

        let join = thread::Builder::new()
            .name(format!("{name_prefix}-{kind}"))
            .stack_size(stack_size)
            .spawn(move || task.run())
            .map_err(|e| SupervisorError::Spawn {
                kind,
                reason: e.to_string(),
            })?;

        debug!(%kind, %run_id, "Monitor thread spawned");

        Ok(Self {
            kind,
            interval,
            run_id,
            started_at_ms: now_ms(),
            token,
            counters,
            join: Some(join),
        })
    }

    /// Kind of the task behind this handle.
    #[must_use]
    pub const fn kind(&self) -> MonitorKind {
        self.kind
    }

    /// Interval the task was started with.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Unique id of the task instance.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Wall-clock start time in milliseconds.
    #[must_use]
    pub const fn started_at_ms(&self) -> u128 {
        self.started_at_ms
    }

    /// Signal the task to stop without waiting.
    pub fn request_cancel(&self) {
        self.token.request_cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the thread has exited, or has already been joined.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Current cycle counters.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        self.counters.snapshot()
    }

    /// Detach the join handle so it can be joined without holding a lock.
    pub(crate) fn take_join(&mut self) -> Option<JoinHandle<()>> {
        self.join.take()
    }

    /// Block until the thread exits.
    ///
    /// Returns `false` if the thread panicked. Does not request cancellation.
    pub fn join(mut self) -> bool {
        self.take_join().is_none_or(|join| join.join().is_ok())
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("kind", &self.kind)
            .field("run_id", &self.run_id)
            .field("interval", &self.interval)
            .field("cancel_requested", &self.is_cancel_requested())
            .field("finished", &self.is_finished())
            .finish()
    }
}
