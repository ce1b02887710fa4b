//! # Loggers for supervisor lifecycle events.
//!
//! The supervisor reports each milestone to exactly one [`Subscribe`] implementation,
//! injected with [`SupervisorBuilder::with_logger`](crate::SupervisorBuilder::with_logger)
//! or [`Supervisor::set_logger`](crate::Supervisor::set_logger).
//!
//! ```text
//! Supervisor::run ── on_event(&Event) ──► LogWriter      (stdout, default)
//!                                     ├─► TracingWriter  (tracing records)
//!                                     └─► LogFn / custom
//! ```

mod log;
mod subscriber;
mod trace;

pub use log::LogWriter;
pub use subscriber::{LogFn, Subscribe};
pub use trace::TracingWriter;
