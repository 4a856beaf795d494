//! Core supervision abstractions: monitor kinds, periodic tasks, handles and the supervisor.

pub mod audit;
pub mod cancel;
pub mod error;
pub mod handle;
pub mod kind;
pub mod supervisor;
pub mod task;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink,
};
pub use cancel::CancelToken;
pub use error::{CycleError, SupervisorError};
pub use handle::TaskHandle;
pub use kind::{MonitorGroup, MonitorKind};
pub use supervisor::{MonitorFactory, SlotSnapshot, SlotState, Supervisor};
pub use task::{CycleReport, FnCycle, MonitorCycle, PeriodicTask, TaskStats};
