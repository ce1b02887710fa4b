//! Lifecycle events.
//!
//! [`Event`] values are produced by [`Supervisor::run`](crate::Supervisor::run) at each
//! milestone and handed straight to the configured logger
//! ([`Subscribe`](crate::Subscribe)). There is no queue in between: when `run`
//! returns, every event has already been delivered.

mod event;

pub use event::{Event, EventKind};
