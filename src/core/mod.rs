//! Runtime core: lifecycle and shutdown.
//!
//! Internal modules:
//! - [`supervisor`]: state machine, `run` protocol, configuration setters;
//! - [`builder`]: constructs a shared [`Supervisor`];
//! - [`registry`]: pre-start list, lifecycle state, in-flight tracking;
//! - [`signals`]: OS signal forwarding and [`SignalNotifier`];
//! - [`pid`]: PID file written for the lifetime of `run`.

mod builder;
mod pid;
mod registry;
mod signals;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use registry::Lifecycle;
pub use signals::{SignalNotifier, StopSignal};
pub use supervisor::Supervisor;
