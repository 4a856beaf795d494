//! The periodic-task contract every monitor runs under.
//!
//! A [`PeriodicTask`] owns one domain collaborator ([`MonitorCycle`]) and drives
//! it on a fixed interval until its [`CancelToken`] fires. Cycle failures are
//! logged and counted; only cancellation ends the loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use monitor_supervisor::core::{CycleReport, FnCycle, MonitorKind, PeriodicTask};
//! use std::time::Duration;
//!
//! let task = PeriodicTask::new(
//!     MonitorKind::Host,
//!     Duration::from_secs(60),
//!     Box::new(FnCycle::new(|| Ok(CycleReport::ok()))),
//! );
//! let token = task.token();
//! let thread = std::thread::spawn(move || task.run());
//! token.request_cancel();
//! thread.join().unwrap();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{CancelToken, CycleError, MonitorKind};

/// Outcome of a successful cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Optional diagnostic text from the collaborator.
    pub diagnostic: Option<String>,
}

impl CycleReport {
    /// A report with no diagnostic.
    #[must_use]
    pub const fn ok() -> Self {
        Self { diagnostic: None }
    }

    /// A report carrying diagnostic text.
    pub fn with_diagnostic(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Domain work performed once per interval (device poll, compliance diff, ...).
///
/// # Threading
///
/// Called from the monitor's dedicated OS thread, inside a single-threaded
/// tokio runtime owned by that thread. A cycle that never returns blocks
/// `Supervisor::stop` for its kind; bounding external calls is the
/// implementor's job.
#[async_trait]
pub trait MonitorCycle: Send + 'static {
    /// Perform one unit of work.
    async fn perform_cycle(&mut self) -> Result<CycleReport, CycleError>;
}

/// Adapter turning a blocking closure into a [`MonitorCycle`].
pub struct FnCycle<F> {
    f: F,
}

impl<F> FnCycle<F>
where
    F: FnMut() -> Result<CycleReport, CycleError> + Send + 'static,
{
    /// Wrap `f`.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> MonitorCycle for FnCycle<F>
where
    F: FnMut() -> Result<CycleReport, CycleError> + Send + 'static,
{
    async fn perform_cycle(&mut self) -> Result<CycleReport, CycleError> {
        (self.f)()
    }
}

/// Snapshot of a task's cycle counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Cycles completed, successful or not.
    pub cycles: u64,
    /// Cycles that returned an error.
    pub failures: u64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
    /// Diagnostic of the most recent successful cycle, if it had one.
    pub last_diagnostic: Option<String>,
}

/// Counters shared between a running task and its handle.
#[derive(Debug, Default)]
pub(crate) struct TaskCounters {
    cycles: AtomicU64,
    failures: AtomicU64,
    last_error: Mutex<Option<String>>,
    last_diagnostic: Mutex<Option<String>>,
}

impl TaskCounters {
    fn record(&self, outcome: &Result<CycleReport, CycleError>) {
        match outcome {
            Ok(report) => {
                if report.diagnostic.is_some() {
                    self.last_diagnostic.lock().clone_from(&report.diagnostic);
                }
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                *self.last_error.lock() = Some(e.to_string());
            }
        }
        // Counted last so a reader that sees N cycles also sees their outcomes.
        self.cycles.fetch_add(1, Ordering::Release);
    }

    pub fn snapshot(&self) -> TaskStats {
        TaskStats {
            cycles: self.cycles.load(Ordering::Acquire),
            failures: self.failures.load(Ordering::Relaxed),
            last_error: self.last_error.lock().clone(),
            last_diagnostic: self.last_diagnostic.lock().clone(),
        }
    }
}

/// A recurring unit of work bound to one monitor kind.
///
/// Created fresh on every start; never reused after it has been cancelled.
pub struct PeriodicTask {
    kind: MonitorKind,
    interval: Duration,
    run_id: Uuid,
    token: CancelToken,
    counters: Arc<TaskCounters>,
    cycle: Box<dyn MonitorCycle>,
}

impl PeriodicTask {
    /// Create a task that runs `cycle` every `interval`.
    #[must_use]
    pub fn new(kind: MonitorKind, interval: Duration, cycle: Box<dyn MonitorCycle>) -> Self {
        Self {
            kind,
            interval,
            run_id: Uuid::new_v4(),
            token: CancelToken::new(),
            counters: Arc::new(TaskCounters::default()),
            cycle,
        }
    }

    /// Kind this task monitors.
    #[must_use]
    pub const fn kind(&self) -> MonitorKind {
        self.kind
    }

    /// Sleep between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Unique id of this task instance.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// A clone of this task's cancellation token.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        self.counters.snapshot()
    }

    pub(crate) fn counters(&self) -> Arc<TaskCounters> {
        Arc::clone(&self.counters)
    }

    /// Ask the loop to exit. Idempotent and visible across threads.
    pub fn request_cancel(&self) {
        self.token.request_cancel();
    }

    /// Run cycles until cancelled. Blocks the calling thread.
    ///
    /// Cancellation is checked before each cycle and wakes the inter-cycle
    /// sleep immediately, so exit latency is bounded by the in-flight cycle.
    pub fn run(mut self) {
        let kind = self.kind;
        let run_id = self.run_id;

        // Each monitor thread owns a single-threaded runtime for async collaborators.
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!(%kind, %run_id, error = %e, "Failed to create monitor runtime");
                return;
            }
        };

        info!(%kind, %run_id, interval = ?self.interval, "Monitor loop started");

        loop {
            if self.token.is_cancelled() {
                break;
            }

            let outcome = rt.block_on(self.cycle.perform_cycle());
            match &outcome {
                Ok(report) => {
                    let diagnostic = report.diagnostic.as_deref();
                    debug!(%kind, %run_id, ?diagnostic, "Monitor cycle completed");
                }
                Err(e) => {
                    warn!(%kind, %run_id, error = %e, "Monitor cycle failed");
                }
            }
            self.counters.record(&outcome);

            if self.token.wait_timeout(self.interval) {
                break;
            }
        }

        let stats = self.counters.snapshot();
        info!(
            %kind,
            %run_id,
            cycles = stats.cycles,
            failures = stats.failures,
            "Monitor loop exited"
        );
    }
}

impl std::fmt::Debug for PeriodicTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicTask")
            .field("kind", &self.kind)
            .field("interval", &self.interval)
            .field("run_id", &self.run_id)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
