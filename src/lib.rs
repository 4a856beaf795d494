//! # Monitor Supervisor
//!
//! Lifecycle management for a fixed set of periodic background monitors.
//!
//! A network-management service runs several independent pollers side by side:
//! device reachability, compliance, configuration backup, host liveness,
//! service checks, topology discovery, summary aggregation, worker-pool health
//! and database maintenance. Each one polls an external system on its own
//! interval and has to stop cleanly, without orphaned threads or a lost cycle.
//!
//! ## Key Features
//!
//! - **One slot per kind**: each [`core::MonitorKind`] owns at most one live task
//! - **Dedicated OS threads**: every monitor runs on its own named thread with a
//!   single-threaded tokio runtime for async collaborators
//! - **Interruptible sleeps**: cancellation wakes a sleeping monitor immediately
//! - **Two shutdown paths**: `stop` joins, `terminate_all` only signals
//! - **Grouped operations**: related kinds start and stop in a fixed order
//! - **Audit trail**: every slot transition is recorded in order
//!
//! ## Example
//!
//! ```rust,ignore
//! use monitor_supervisor::builders::SupervisorBuilder;
//! use monitor_supervisor::core::{CycleReport, FnCycle, MonitorCycle, MonitorGroup, MonitorKind};
//!
//! let supervisor = SupervisorBuilder::new().build(|kind: MonitorKind| {
//!     Some(Box::new(FnCycle::new(move || Ok(CycleReport::ok()))) as Box<dyn MonitorCycle>)
//! })?;
//!
//! supervisor.start_group(MonitorGroup::Device, &[])?;
//! supervisor.start(MonitorKind::Host, None)?;
//!
//! // Process exit: signal everything first, then join.
//! supervisor.shutdown();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Monitor kinds, periodic tasks, handles and the supervisor.
pub mod core;
/// Configuration models for the supervisor.
pub mod config;
/// Builders to construct a supervisor from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;
