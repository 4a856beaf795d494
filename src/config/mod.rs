//! Configuration models for the supervisor and its monitor threads.

pub mod supervisor;

pub use supervisor::SupervisorConfig;
