//! Builders to construct a supervisor from configuration.

pub mod supervisor_builder;

pub use supervisor_builder::SupervisorBuilder;
