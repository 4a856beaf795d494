//! Fluent construction of a [`Supervisor`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::SupervisorConfig;
use crate::core::{
    AuditSink, MonitorFactory, MonitorKind, NoopAuditSink, Supervisor, SupervisorError,
};

/// Builder for [`Supervisor`].
///
/// ```rust,ignore
/// let supervisor = SupervisorBuilder::new()
///     .with_config(SupervisorConfig::from_env()?)
///     .with_interval(MonitorKind::Host, Duration::from_secs(30))
///     .with_audit_sink(sink.clone())
///     .build(factory)?;
/// ```
#[derive(Clone)]
pub struct SupervisorBuilder {
    config: SupervisorConfig,
    sink: Arc<dyn AuditSink>,
}

impl SupervisorBuilder {
    /// Start from the default configuration and no external audit sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SupervisorConfig::default(),
            sink: Arc::new(NoopAuditSink),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    /// Override one kind's interval.
    #[must_use]
    pub fn with_interval(mut self, kind: MonitorKind, interval: Duration) -> Self {
        self.config = self.config.with_interval(kind, interval);
        self
    }

    /// Forward lifecycle events to `sink`.
    #[must_use]
    pub fn with_audit_sink<S>(mut self, sink: S) -> Self
    where
        S: AuditSink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    /// Validate the configuration and build the supervisor.
    ///
    /// # Errors
    ///
    /// Returns `SupervisorError::InvalidConfig` if validation fails.
    pub fn build<F>(self, factory: F) -> Result<Supervisor, SupervisorError>
    where
        F: MonitorFactory,
    {
        Supervisor::with_sink(self.config, factory, self.sink)
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SupervisorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
