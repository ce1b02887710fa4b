//! # Lifecycle events emitted by the supervisor.
//!
//! The [`EventKind`] enum names each milestone of [`Supervisor::run`](crate::Supervisor::run):
//! - **Startup**: `Starting`, `PidWritten`
//! - **Shutdown request**: `SignalReceived`, `Waiting`
//! - **Outcome**: `AllExited`, `AllStoppedWithin`, `GraceExceeded`
//! - **Teardown**: `PidRemoved`, `Stopped`
//!
//! The [`Event`] struct carries the timestamp plus optional metadata.
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use gracevisor::{Event, EventKind, StopSignal};
//!
//! let ev = Event::new(EventKind::SignalReceived).with_signal(StopSignal::Terminate);
//! assert_eq!(ev.kind, EventKind::SignalReceived);
//! assert_eq!(ev.signal, Some(StopSignal::Terminate));
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::StopSignal;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Startup ===
    /// Supervisor entered `Running` and launched its pre-start tasks.
    ///
    /// Sets:
    /// - `signals`: stop signals being listened for
    /// - `grace`: drain timeout in effect
    /// - `in_flight`: number of pre-start tasks launched
    Starting,

    /// PID file written.
    ///
    /// Sets:
    /// - `path`: full path of the file
    PidWritten,

    // === Shutdown request ===
    /// A termination signal arrived (OS or notifier).
    ///
    /// Sets:
    /// - `signal`: the received signal
    SignalReceived,

    /// Shared context cancelled; waiting for in-flight tasks to return.
    ///
    /// Sets:
    /// - `grace`: drain timeout
    /// - `in_flight`: tasks still running at this point
    Waiting,

    // === Outcome ===
    /// Every task returned on its own; no cancellation was needed.
    AllExited,

    /// After a signal, every task returned within the drain timeout.
    AllStoppedWithin,

    /// Drain timeout expired with tasks still running.
    ///
    /// Sets:
    /// - `grace`: drain timeout
    /// - `in_flight`: tasks that had not returned
    GraceExceeded,

    // === Teardown ===
    /// PID file removed.
    ///
    /// Sets:
    /// - `path`: full path of the file
    PidRemoved,

    /// Supervisor reached `Stopped`; `run` is about to return.
    Stopped,
}

/// Lifecycle event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Signal that triggered shutdown.
    pub signal: Option<StopSignal>,
    /// Signals listened for.
    pub signals: Option<Arc<[StopSignal]>>,
    /// Drain timeout.
    pub grace: Option<Duration>,
    /// Number of tasks not yet returned.
    pub in_flight: Option<usize>,
    /// PID file path.
    pub path: Option<Arc<Path>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            signal: None,
            signals: None,
            grace: None,
            in_flight: None,
            path: None,
        }
    }

    #[inline]
    pub fn with_signal(mut self, signal: StopSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    #[inline]
    pub fn with_signals(mut self, signals: &[StopSignal]) -> Self {
        self.signals = Some(signals.into());
        self
    }

    #[inline]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = Some(grace);
        self
    }

    #[inline]
    pub fn with_in_flight(mut self, n: usize) -> Self {
        self.in_flight = Some(n);
        self
    }

    #[inline]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns `true` for the three outcome kinds.
    #[inline]
    pub fn is_outcome(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AllExited | EventKind::AllStoppedWithin | EventKind::GraceExceeded
        )
    }
}
