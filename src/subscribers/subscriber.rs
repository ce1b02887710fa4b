//! # Logger trait.
//!
//! Provides [`Subscribe`], the extension point through which the supervisor
//! reports lifecycle milestones.
//!
//! ## Rules
//! - `on_event` is awaited inline by `run`; keep it short and non-failing.
//! - Events arrive in `seq` order, one at a time.
//! - Handle errors internally; do not panic.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use gracevisor::{Event, EventKind, Subscribe};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Subscribe for Alerts {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::GraceExceeded) {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of supervisor lifecycle events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed logger.
///
/// ```rust
/// use std::sync::Arc;
/// use gracevisor::{Event, LogFn, Subscribe};
///
/// let logger: Arc<dyn Subscribe> = LogFn::arc(|ev: &Event| eprintln!("{:?}", ev.kind));
/// ```
pub struct LogFn<F> {
    f: F,
}

impl<F> LogFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps a closure and returns it as a shared handle.
    pub fn arc(f: F) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F> Subscribe for LogFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &Event) {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        "LogFn"
    }
}
