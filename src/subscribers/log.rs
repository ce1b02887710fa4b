//! # LogWriter - default event printer
//!
//! Prints every lifecycle [`Event`] to stdout, one line each.
//!
//! ## Example output
//! ```text
//! [running] signals=[SIGINT, SIGQUIT, SIGTERM] tasks=2 grace=60s
//! [pid-written] path=/var/run/app/4242.pid
//! [signal] SIGTERM
//! [waiting] tasks=2 grace=60s
//! [all-stopped-within-grace]
//! [pid-removed] path=/var/run/app/4242.pid
//! [stopped]
//! ```

use std::fmt::Write as _;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders an event as a single log line.
    pub fn render(e: &Event) -> String {
        let mut line = String::new();
        match e.kind {
            EventKind::Starting => {
                line.push_str("[running]");
                if let Some(signals) = &e.signals {
                    let names: Vec<&str> = signals.iter().map(|s| s.name()).collect();
                    let _ = write!(line, " signals=[{}]", names.join(", "));
                }
                if let Some(n) = e.in_flight {
                    let _ = write!(line, " tasks={n}");
                }
                if let Some(grace) = e.grace {
                    let _ = write!(line, " grace={grace:?}");
                }
            }
            EventKind::PidWritten => {
                write_path(&mut line, "pid-written", e);
            }
            EventKind::SignalReceived => {
                let _ = match e.signal {
                    Some(sig) => write!(line, "[signal] {sig}"),
                    None => write!(line, "[signal] unknown"),
                };
            }
            EventKind::Waiting => {
                line.push_str("[waiting]");
                if let Some(n) = e.in_flight {
                    let _ = write!(line, " tasks={n}");
                }
                if let Some(grace) = e.grace {
                    let _ = write!(line, " grace={grace:?}");
                }
            }
            EventKind::AllExited => line.push_str("[all-exited]"),
            EventKind::AllStoppedWithin => line.push_str("[all-stopped-within-grace]"),
            EventKind::GraceExceeded => {
                let _ = write!(
                    line,
                    "[grace-exceeded] stuck={} grace={:?}",
                    e.in_flight.unwrap_or_default(),
                    e.grace.unwrap_or_default()
                );
            }
            EventKind::PidRemoved => {
                write_path(&mut line, "pid-removed", e);
            }
            EventKind::Stopped => line.push_str("[stopped]"),
        }
        line
    }
}

fn write_path(line: &mut String, tag: &str, e: &Event) {
    match e.path.as_deref() {
        Some(path) => {
            let _ = write!(line, "[{tag}] path={}", path.display());
        }
        None => {
            let _ = write!(line, "[{tag}]");
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
