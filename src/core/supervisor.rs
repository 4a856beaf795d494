//! Supervisor owning one slot per monitor kind.
//!
//! Each slot is either empty or holds the [`TaskHandle`] of a live monitor
//! thread. A handle is only ever stored together with the task it controls, so
//! a slot can never hold a task without a thread or a thread without a task.
//!
//! # Slot lifecycle
//!
//! ```text
//! Empty --start--> Running --stop/terminate_all--> Stopping --join--> Empty
//! ```
//!
//! Every slot has its own lock. Operations on different kinds never contend,
//! and `stop` joins the monitor thread without holding the slot lock, so
//! `terminate_all` and `state` stay non-blocking while a stop is in progress.
//!
//! # Example
//!
//! ```rust,ignore
//! use monitor_supervisor::core::{CycleReport, FnCycle, MonitorCycle, MonitorKind, Supervisor};
//! use monitor_supervisor::config::SupervisorConfig;
//!
//! let supervisor = Supervisor::new(SupervisorConfig::new(), |kind: MonitorKind| {
//!     Some(Box::new(FnCycle::new(move || Ok(CycleReport::ok()))) as Box<dyn MonitorCycle>)
//! })?;
//!
//! supervisor.start(MonitorKind::Host, None)?;
//! supervisor.stop(MonitorKind::Host);
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SupervisorConfig;
use crate::core::audit::build_audit_event;
use crate::core::{
    AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, MonitorCycle, MonitorGroup, MonitorKind,
    NoopAuditSink, PeriodicTask, SupervisorError, TaskHandle, TaskStats,
};

/// Creates the domain collaborator for a monitor kind on every start.
///
/// Returning `None` means the application has no monitor for that kind.
pub trait MonitorFactory: Send + Sync + 'static {
    /// Build a fresh collaborator for `kind`.
    fn create(&self, kind: MonitorKind) -> Option<Box<dyn MonitorCycle>>;
}

impl<F> MonitorFactory for F
where
    F: Fn(MonitorKind) -> Option<Box<dyn MonitorCycle>> + Send + Sync + 'static,
{
    fn create(&self, kind: MonitorKind) -> Option<Box<dyn MonitorCycle>> {
        self(kind)
    }
}

/// Observable state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// No monitor.
    Empty,
    /// Monitor running, not asked to stop.
    Running,
    /// Cancellation requested; the thread may still be finishing a cycle.
    Stopping,
}

/// Point-in-time view of an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSnapshot {
    /// Slot kind.
    pub kind: MonitorKind,
    /// Running or stopping.
    pub state: SlotState,
    /// Interval the monitor was started with.
    pub interval: Duration,
    /// Task instance id.
    pub run_id: Uuid,
    /// Wall-clock start time in milliseconds.
    pub started_at_ms: u128,
    /// The thread has exited. Without a cancel request this means it died.
    pub finished: bool,
    /// Cycle counters.
    pub stats: TaskStats,
}

/// Lifecycle manager for the fixed set of monitor threads.
///
/// Intended to be driven from a single control thread; concurrent `start` and
/// `stop` on the same kind must be serialized by the caller.
pub struct Supervisor {
    config: SupervisorConfig,
    factory: Box<dyn MonitorFactory>,
    history: InMemoryAuditSink,
    sink: Arc<dyn AuditSink>,
    slots: [Mutex<Option<TaskHandle>>; MonitorKind::COUNT],
}

impl Supervisor {
    /// Create a supervisor with all slots empty.
    ///
    /// # Errors
    ///
    /// Returns `SupervisorError::InvalidConfig` if the configuration is invalid.
    pub fn new<F>(config: SupervisorConfig, factory: F) -> Result<Self, SupervisorError>
    where
        F: MonitorFactory,
    {
        Self::with_sink(config, factory, Arc::new(NoopAuditSink))
    }

    /// Create a supervisor that also forwards lifecycle events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `SupervisorError::InvalidConfig` if the configuration is invalid.
    pub fn with_sink<F>(
        config: SupervisorConfig,
        factory: F,
        sink: Arc<dyn AuditSink>,
    ) -> Result<Self, SupervisorError>
    where
        F: MonitorFactory,
    {
        config.validate().map_err(SupervisorError::InvalidConfig)?;

        debug!(
            stack_size = config.thread_stack_size,
            prefix = %config.thread_name_prefix,
            "Supervisor initialized"
        );

        Ok(Self {
            history: InMemoryAuditSink::new(config.audit_buffer),
            config,
            factory: Box::new(factory),
            sink,
            slots: std::array::from_fn(|_| Mutex::new(None)),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    fn slot(&self, kind: MonitorKind) -> &Mutex<Option<TaskHandle>> {
        &self.slots[kind.index()]
    }

    fn emit(&self, kind: MonitorKind, action: AuditAction, run_id: Uuid, detail: Option<String>) {
        let event = build_audit_event(kind, action, run_id, detail);
        self.history.record(event.clone());
        self.sink.record(event);
    }

    /// Start the monitor for `kind` using the supervisor's factory.
    ///
    /// `interval` falls back to the configured override, then the kind default.
    ///
    /// # Errors
    ///
    /// - `SupervisorError::AlreadyRunning` if the slot is occupied
    /// - `SupervisorError::NoMonitor` if the factory has nothing for `kind`
    /// - `SupervisorError::InvalidInterval` for a zero interval
    /// - `SupervisorError::Spawn` if the thread cannot be created
    pub fn start(
        &self,
        kind: MonitorKind,
        interval: Option<Duration>,
    ) -> Result<Uuid, SupervisorError> {
        if self.slot(kind).lock().is_some() {
            return Err(SupervisorError::AlreadyRunning(kind));
        }
        let cycle = self
            .factory
            .create(kind)
            .ok_or(SupervisorError::NoMonitor(kind))?;
        self.start_with(kind, cycle, interval)
    }

    /// Start the monitor for `kind` with an explicit collaborator.
    ///
    /// # Errors
    ///
    /// Same as [`Supervisor::start`], minus `NoMonitor`.
    pub fn start_with(
        &self,
        kind: MonitorKind,
        cycle: Box<dyn MonitorCycle>,
        interval: Option<Duration>,
    ) -> Result<Uuid, SupervisorError> {
        let interval = interval.unwrap_or_else(|| self.config.interval_for(kind));
        if interval.is_zero() {
            return Err(SupervisorError::InvalidInterval(kind));
        }

        let run_id = {
            let mut slot = self.slot(kind).lock();
            if slot.is_some() {
                return Err(SupervisorError::AlreadyRunning(kind));
            }
            let task = PeriodicTask::new(kind, interval, cycle);
            let handle = TaskHandle::spawn(
                task,
                &self.config.thread_name_prefix,
                self.config.thread_stack_size,
            )?;
            let run_id = handle.run_id();
            *slot = Some(handle);
            run_id
        };

        info!(%kind, %run_id, ?interval, "Started {kind} monitoring thread");
        self.emit(
            kind,
            AuditAction::Started,
            run_id,
            Some(format!("interval_ms={}", interval.as_millis())),
        );
        Ok(run_id)
    }

    /// Stop the monitor for `kind` and wait for its thread to exit.
    ///
    /// Returns `false` if the slot was already empty, or if another `stop` is
    /// still joining it; that slot stays `Stopping` until the other call
    /// finishes. After a `true` return the slot is empty and no thread for
    /// `kind` is running. A panicked monitor thread is logged and its slot
    /// cleared all the same.
    pub fn stop(&self, kind: MonitorKind) -> bool {
        let (join, run_id) = {
            let mut slot = self.slot(kind).lock();
            let Some(handle) = slot.as_mut() else {
                debug!(%kind, "Stop on empty slot ignored");
                return false;
            };
            handle.request_cancel();
            let run_id = handle.run_id();
            let Some(join) = handle.take_join() else {
                debug!(%kind, %run_id, "Stop already in progress");
                return false;
            };
            (join, run_id)
        };

        info!(%kind, %run_id, "Shutting down {kind} monitoring thread");
        self.emit(kind, AuditAction::StopRequested, run_id, None);

        // Joined without the slot lock held.
        let clean = join.join().is_ok();
        if !clean {
            warn!(%kind, %run_id, "Monitor thread panicked");
        }

        {
            let mut slot = self.slot(kind).lock();
            if slot.as_ref().is_some_and(|h| h.run_id() == run_id) {
                *slot = None;
            }
        }

        self.emit(
            kind,
            AuditAction::Stopped,
            run_id,
            (!clean).then(|| "thread panicked".to_string()),
        );
        debug!(%kind, %run_id, "Monitor slot cleared");
        true
    }

    /// Ask every running monitor to stop without waiting for any of them.
    ///
    /// Returns the number of occupied slots signalled. Slots stay occupied
    /// until a later [`Supervisor::stop`] joins them.
    pub fn terminate_all(&self) -> usize {
        info!("Initiating termination of all monitor threads");
        let mut signalled = 0;
        for kind in MonitorKind::ALL {
            let run_id = {
                let slot = self.slot(kind).lock();
                let Some(handle) = slot.as_ref() else {
                    continue;
                };
                handle.request_cancel();
                handle.run_id()
            };
            signalled += 1;
            self.emit(kind, AuditAction::TerminateRequested, run_id, None);
        }
        debug!(signalled, "Termination requested");
        signalled
    }

    /// Start every member of `group` in declared order.
    ///
    /// `intervals` overrides per-kind intervals; kinds not listed use the
    /// configured or default interval. Either every member starts or none
    /// stays running.
    ///
    /// # Errors
    ///
    /// - `SupervisorError::AlreadyRunning` if any member slot is occupied
    /// - any error from [`Supervisor::start`] for a member
    pub fn start_group(
        &self,
        group: MonitorGroup,
        intervals: &[(MonitorKind, Duration)],
    ) -> Result<Vec<Uuid>, SupervisorError> {
        if let Some(busy) = group
            .members()
            .iter()
            .copied()
            .find(|kind| self.slot(*kind).lock().is_some())
        {
            return Err(SupervisorError::AlreadyRunning(busy));
        }

        let mut started = Vec::with_capacity(group.members().len());
        for &kind in group.members() {
            let interval = intervals
                .iter()
                .find_map(|(k, interval)| (*k == kind).then_some(*interval));
            match self.start(kind, interval) {
                Ok(run_id) => started.push((kind, run_id)),
                Err(e) => {
                    warn!(%kind, error = %e, "Group start failed, rolling back");
                    for (kind, _) in started.iter().rev() {
                        self.stop(*kind);
                    }
                    return Err(e);
                }
            }
        }

        info!("Started {}", group.describe());
        Ok(started.into_iter().map(|(_, run_id)| run_id).collect())
    }

    /// Stop every member of `group`, joining one at a time in declared order.
    ///
    /// Returns the number of members that were running.
    pub fn stop_group(&self, group: MonitorGroup) -> usize {
        info!("Shutting down {}", group.describe());
        group
            .members()
            .iter()
            .filter(|kind| self.stop(**kind))
            .count()
    }

    /// Cancel everything, then join every slot in [`MonitorKind::ALL`] order.
    pub fn shutdown(&self) {
        self.terminate_all();
        let stopped = MonitorKind::ALL
            .iter()
            .filter(|kind| self.stop(**kind))
            .count();
        info!(stopped, "Supervisor shut down complete");
    }

    /// Current state of the slot for `kind`.
    #[must_use]
    pub fn state(&self, kind: MonitorKind) -> SlotState {
        match self.slot(kind).lock().as_ref() {
            None => SlotState::Empty,
            Some(handle) if handle.is_cancel_requested() => SlotState::Stopping,
            Some(_) => SlotState::Running,
        }
    }

    /// Whether cancellation has been requested for the monitor in `kind`'s slot.
    ///
    /// `None` if the slot is empty.
    #[must_use]
    pub fn is_cancel_requested(&self, kind: MonitorKind) -> Option<bool> {
        self.slot(kind)
            .lock()
            .as_ref()
            .map(TaskHandle::is_cancel_requested)
    }

    /// Snapshot of the slot for `kind`, or `None` if empty.
    #[must_use]
    pub fn snapshot(&self, kind: MonitorKind) -> Option<SlotSnapshot> {
        let slot = self.slot(kind).lock();
        let handle = slot.as_ref()?;
        Some(SlotSnapshot {
            kind,
            state: if handle.is_cancel_requested() {
                SlotState::Stopping
            } else {
                SlotState::Running
            },
            interval: handle.interval(),
            run_id: handle.run_id(),
            started_at_ms: handle.started_at_ms(),
            finished: handle.is_finished(),
            stats: handle.stats(),
        })
    }

    /// Snapshots of every occupied slot, in slot order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<SlotSnapshot> {
        MonitorKind::ALL
            .iter()
            .filter_map(|kind| self.snapshot(*kind))
            .collect()
    }

    /// Kinds whose slot is occupied.
    #[must_use]
    pub fn active_kinds(&self) -> Vec<MonitorKind> {
        MonitorKind::ALL
            .into_iter()
            .filter(|kind| self.slot(*kind).lock().is_some())
            .collect()
    }

    /// Lifecycle events recorded so far, oldest first, bounded by `audit_buffer`.
    #[must_use]
    pub fn history(&self) -> Vec<AuditEvent> {
        self.history.events()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        // Signal but DON'T join: an explicit shutdown() is required for graceful cleanup.
        let mut detached = 0;
        for slot in &self.slots {
            if let Some(handle) = slot.lock().as_ref() {
                handle.request_cancel();
                detached += 1;
            }
        }
        if detached > 0 {
            debug!(detached, "Supervisor dropped without shutdown - monitor threads detached");
        }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("active", &self.active_kinds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CycleReport, FnCycle};

    fn noop_factory(_kind: MonitorKind) -> Option<Box<dyn MonitorCycle>> {
        Some(Box::new(FnCycle::new(|| Ok(CycleReport::ok()))))
    }

    #[test]
    fn test_start_stop_round_trip() {
        let supervisor = Supervisor::new(SupervisorConfig::new(), noop_factory).unwrap();
        supervisor.start(MonitorKind::Device, None).unwrap();
        assert_eq!(supervisor.state(MonitorKind::Device), SlotState::Running);
        assert_eq!(
            supervisor.snapshot(MonitorKind::Device).unwrap().interval,
            Duration::from_secs(60)
        );

        assert!(supervisor.stop(MonitorKind::Device));
        assert_eq!(supervisor.state(MonitorKind::Device), SlotState::Empty);
        assert!(!supervisor.stop(MonitorKind::Device));
    }

    #[test]
    fn test_concurrent_stop_leaves_slot_to_the_joiner() {
        let supervisor = Supervisor::new(SupervisorConfig::new(), noop_factory).unwrap();
        let kind = MonitorKind::Service;
        let run_id = supervisor.start(kind, Some(Duration::from_secs(3_600))).unwrap();

        // Take the join the way an in-flight stop does and hold on to it.
        let join = {
            let mut slot = supervisor.slot(kind).lock();
            let handle = slot.as_mut().unwrap();
            handle.request_cancel();
            handle.take_join().unwrap()
        };

        assert!(!supervisor.stop(kind));
        assert_eq!(supervisor.state(kind), SlotState::Stopping);
        assert_eq!(supervisor.snapshot(kind).unwrap().run_id, run_id);
        let err = supervisor.start(kind, None).unwrap_err();
        assert!(matches!(err, SupervisorError::AlreadyRunning(MonitorKind::Service)));

        join.join().unwrap();
        supervisor.slot(kind).lock().take();
        assert_eq!(supervisor.state(kind), SlotState::Empty);
    }

    #[test]
    fn test_double_start_rejected() {
        let supervisor = Supervisor::new(SupervisorConfig::new(), noop_factory).unwrap();
        let first = supervisor.start(MonitorKind::Host, None).unwrap();
        let err = supervisor.start(MonitorKind::Host, None).unwrap_err();
        assert!(matches!(err, SupervisorError::AlreadyRunning(MonitorKind::Host)));
        assert_eq!(supervisor.snapshot(MonitorKind::Host).unwrap().run_id, first);
        supervisor.shutdown();
    }

    #[test]
    fn test_zero_interval_rejected() {
        let supervisor = Supervisor::new(SupervisorConfig::new(), noop_factory).unwrap();
        let err = supervisor
            .start(MonitorKind::Worker, Some(Duration::ZERO))
            .unwrap_err();
        assert_eq!(err.as_label(), "invalid_interval");
        assert_eq!(supervisor.state(MonitorKind::Worker), SlotState::Empty);
    }

    #[test]
    fn test_factory_without_monitor() {
        let supervisor = Supervisor::new(SupervisorConfig::new(), |kind: MonitorKind| {
            (kind == MonitorKind::Host)
                .then(|| Box::new(FnCycle::new(|| Ok(CycleReport::ok()))) as Box<dyn MonitorCycle>)
        })
        .unwrap();
        let err = supervisor.start(MonitorKind::Discovery, None).unwrap_err();
        assert!(matches!(err, SupervisorError::NoMonitor(MonitorKind::Discovery)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SupervisorConfig::new().with_thread_stack_size(0);
        let err = Supervisor::new(config, noop_factory).unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidConfig(_)));
    }

    #[test]
    fn test_drop_signals_running_monitors() {
        use std::sync::atomic::{AtomicU64, Ordering};

        let cycles = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&cycles);
        let supervisor = Supervisor::new(SupervisorConfig::new(), move |_kind: MonitorKind| {
            let counter = Arc::clone(&counter);
            Some(Box::new(FnCycle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(CycleReport::ok())
            })) as Box<dyn MonitorCycle>)
        })
        .unwrap();
        supervisor
            .start(MonitorKind::Summaries, Some(Duration::from_millis(10)))
            .unwrap();
        while cycles.load(Ordering::SeqCst) < 2 {
            std::thread::sleep(Duration::from_millis(5));
        }

        drop(supervisor);
        std::thread::sleep(Duration::from_millis(100));
        let after_drop = cycles.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(cycles.load(Ordering::SeqCst), after_drop);
    }
}
