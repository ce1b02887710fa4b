//! # TracingWriter - forwards lifecycle events to `tracing`.
//!
//! Milestones are logged at `INFO`, a drain-timeout expiry at `WARN`.
//! All records use the `gracevisor` target.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that emits one `tracing` record per event.
#[derive(Default)]
pub struct TracingWriter;

impl TracingWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for TracingWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Starting => info!(
                target: "gracevisor",
                seq = e.seq,
                tasks = e.in_flight,
                grace = ?e.grace,
                signals = ?e.signals,
                "supervisor running"
            ),
            EventKind::PidWritten => info!(
                target: "gracevisor",
                seq = e.seq,
                path = ?e.path,
                "pid file written"
            ),
            EventKind::SignalReceived => info!(
                target: "gracevisor",
                seq = e.seq,
                signal = e.signal.map(|s| s.name()),
                "stop signal received"
            ),
            EventKind::Waiting => info!(
                target: "gracevisor",
                seq = e.seq,
                tasks = e.in_flight,
                grace = ?e.grace,
                "waiting for tasks to exit"
            ),
            EventKind::AllExited => info!(target: "gracevisor", seq = e.seq, "all tasks exited"),
            EventKind::AllStoppedWithin => info!(
                target: "gracevisor",
                seq = e.seq,
                "all tasks stopped within grace"
            ),
            EventKind::GraceExceeded => warn!(
                target: "gracevisor",
                seq = e.seq,
                stuck = e.in_flight,
                grace = ?e.grace,
                "drain timeout exceeded"
            ),
            EventKind::PidRemoved => info!(
                target: "gracevisor",
                seq = e.seq,
                path = ?e.path,
                "pid file removed"
            ),
            EventKind::Stopped => info!(target: "gracevisor", seq = e.seq, "supervisor stopped"),
        }
    }

    fn name(&self) -> &'static str {
        "TracingWriter"
    }
}
