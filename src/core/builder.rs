use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    config::Config,
    core::StopSignal,
    subscribers::{LogWriter, Subscribe},
};
use super::supervisor::Supervisor;

/// Builder for constructing a shared [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    logger: Option<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self { cfg, logger: None }
    }

    /// Sets the lifecycle logger (default: [`LogWriter`], stdout).
    pub fn with_logger(mut self, logger: Arc<dyn Subscribe>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Overrides the stop signals from the config.
    pub fn with_stop_signals(mut self, signals: impl IntoIterator<Item = StopSignal>) -> Self {
        self.cfg.stop_signals = signals.into_iter().collect();
        self
    }

    /// Enables the PID file in `dir`.
    pub fn with_pid_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.pid_dir = Some(dir.into());
        self
    }

    /// Builds the supervisor behind an `Arc`, ready to be cloned into tasks
    /// that register further tasks.
    ///
    /// # Panics
    /// If the stop signal set is empty.
    pub fn build(self) -> Arc<Supervisor> {
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(LogWriter::new()));
        Arc::new(Supervisor::new_internal(self.cfg, logger))
    }
}
