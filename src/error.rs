//! Error types used by the gracevisor runtime.
//!
//! [`RuntimeError`] covers failures of the supervisor itself:
//! - **environment errors** (PID file, signal registration) are returned from
//!   [`Supervisor::run`](crate::Supervisor::run) and should end the process;
//! - **sequence errors** (configure after start, run twice) are never returned:
//!   the supervisor panics with the variant's message instead;
//! - **drain timeout** is reported as [`RuntimeError::GraceExceeded`].
//!
//! Task failures are not represented here: a task owns its own errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the gracevisor runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown drain timeout was exceeded; some tasks never returned.
    #[error("drain timeout {grace:?} exceeded; {in_flight} task(s) still running")]
    GraceExceeded {
        /// The drain timeout that was applied.
        grace: Duration,
        /// Number of tasks that had not returned when the timeout fired.
        in_flight: usize,
    },

    /// The PID file could not be written or removed.
    #[error("pid file {path}: {source}")]
    PidFile {
        /// Full path of the PID file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Subscribing to an OS termination signal failed.
    #[error("cannot listen for {signal}: {source}")]
    Signal {
        /// Name of the signal (e.g. `SIGTERM`).
        signal: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `run` was called on a supervisor that already started.
    #[error("supervisor already started, run can only be called once")]
    AlreadyStarted,

    /// A configuration setter was called after `run`.
    #[error("supervisor already started, cannot change {what} after run")]
    ConfigureAfterStart {
        /// Which setting the caller tried to change.
        what: &'static str,
    },

    /// The stop signal set was empty.
    #[error("stop signal set must not be empty")]
    NoStopSignals,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use gracevisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), in_flight: 1 };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::PidFile { .. } => "runtime_pid_file",
            RuntimeError::Signal { .. } => "runtime_signal",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::ConfigureAfterStart { .. } => "runtime_configure_after_start",
            RuntimeError::NoStopSignals => "runtime_no_stop_signals",
        }
    }

    /// Indicates whether the error comes from the deployment environment
    /// (filesystem, signal handlers) rather than from the shutdown outcome
    /// or API misuse.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            RuntimeError::PidFile { .. } | RuntimeError::Signal { .. }
        )
    }
}

/// Aborts the current call with a descriptive message for unrecoverable API misuse.
#[track_caller]
pub(crate) fn misuse(err: RuntimeError) -> ! {
    panic!("gracevisor: {err}")
}
