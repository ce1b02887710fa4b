//! # Supervisor configuration.
//!
//! Provides [`Config`], the settings a [`Supervisor`](crate::Supervisor) is built with.
//! Every field may also be changed through the supervisor's setters, but only
//! while it is still `NotStarted`.
//!
//! ## Sentinel values
//! - `grace = 0s` → replaced by [`DEFAULT_GRACE`] (one minute)
//! - `pid_dir = None` → no PID file

use std::path::PathBuf;
use std::time::Duration;

use crate::core::StopSignal;

/// Drain timeout used when neither the caller nor the config supplies one.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(60);

/// Configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `grace`: default drain timeout for [`Supervisor::run`](crate::Supervisor::run)
/// - `stop_signals`: OS signals that start shutdown (must not be empty)
/// - `pid_dir`: directory for `<pid>.pid`; relative paths resolve against the CWD
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for tasks after the shared context is cancelled.
    ///
    /// Used when `run` is given `Duration::ZERO`.
    pub grace: Duration,

    /// Termination signals to listen for.
    pub stop_signals: Vec<StopSignal>,

    /// Directory for the PID file (`None` = no PID file).
    pub pid_dir: Option<PathBuf>,
}

impl Config {
    /// Resolves the drain timeout for one `run` call.
    ///
    /// - `requested > 0` → `requested`
    /// - otherwise `self.grace`, or [`DEFAULT_GRACE`] if that is zero too
    #[inline]
    pub fn drain_timeout(&self, requested: Duration) -> Duration {
        if !requested.is_zero() {
            requested
        } else if !self.grace.is_zero() {
            self.grace
        } else {
            DEFAULT_GRACE
        }
    }

    /// Returns the PID directory, treating an empty path as unset.
    #[inline]
    pub fn pid_dir(&self) -> Option<&std::path::Path> {
        self.pid_dir
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 60s`
    /// - `stop_signals = [SIGINT, SIGQUIT, SIGTERM]`
    /// - `pid_dir = None`
    fn default() -> Self {
        Self {
            grace: DEFAULT_GRACE,
            stop_signals: StopSignal::DEFAULT.to_vec(),
            pid_dir: None,
        }
    }
}
