//! # gracevisor
//!
//! **Gracevisor** is a process-level supervisor for tokio applications.
//!
//! It starts a dynamic set of background tasks, fans out one shared
//! cancellation signal to all of them when the process receives a termination
//! signal, and waits (bounded by a drain timeout) for them to return.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskSpec   │   │   TaskSpec   │   │   TaskSpec   │
//!     │ task + opts  │   │ task + opts  │   │ (dynamic,    │
//!     │              │   │              │   │ from a task) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ options::apply   ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - Registry (pending list, Lifecycle, shared token, TaskTracker)  │
//! │  - Config (grace, stop signals, pid dir)                          │
//! │  - Logger (Subscribe)                                             │
//! │  - stop channel ◄── OS signal forwarders / SignalNotifier         │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     task.run(token)    task.run(token)    task.run(token)
//!        (one tokio task each, all sharing one CancellationToken)
//! ```
//!
//! ### Lifecycle
//! ```text
//! NotStarted ──run()──► Running ──signal──► Stopping ──drained/timeout──► Stopped
//!                          └───────────── all tasks returned ───────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types                                  |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Supervision**   | Register tasks, run, drain with a deadline.                 | [`Supervisor`], [`Lifecycle`]              |
//! | **Tasks**         | Async cancelable units, closure-backed or custom.           | [`Task`], [`TaskFn`], [`TaskRef`]          |
//! | **Options**       | Timeout and restart decorators, first option outermost.     | [`TaskOption`], [`Expire`], [`Restart`]    |
//! | **Signals**       | OS stop signals and programmatic stop requests.             | [`StopSignal`], [`SignalNotifier`]         |
//! | **Logging**       | Lifecycle events to stdout, `tracing`, or your own logger.  | [`Subscribe`], [`LogWriter`], [`TracingWriter`] |
//! | **Errors**        | Environment failures and drain timeout.                     | [`RuntimeError`]                           |
//! | **Configuration** | Drain timeout default, stop signals, PID directory.         | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use gracevisor::{Config, Supervisor, TaskFn, TaskOption, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default()).build();
//!
//!     // Polls until cancelled, restarting at most three times.
//!     let poller: TaskRef = TaskFn::arc(|ctx: CancellationToken| async move {
//!         tokio::select! {
//!             _ = ctx.cancelled() => {}
//!             _ = tokio::time::sleep(Duration::from_millis(10)) => {}
//!         }
//!     });
//!     sup.go_with(poller, [TaskOption::restart(3)]);
//!
//!     // A task that spawns another task once running.
//!     let parent = sup.clone();
//!     let spawner: TaskRef = TaskFn::arc(move |_ctx: CancellationToken| {
//!         let sup = parent.clone();
//!         async move {
//!             let child: TaskRef = TaskFn::arc(|ctx: CancellationToken| async move {
//!                 ctx.cancelled().await;
//!             });
//!             sup.go_with(child, [TaskOption::expire(Duration::from_millis(50))]);
//!         }
//!     });
//!     sup.go(spawner);
//!
//!     sup.run(Duration::from_secs(5)).await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod options;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_GRACE};
pub use crate::core::{Lifecycle, SignalNotifier, StopSignal, Supervisor, SupervisorBuilder};
pub use error::RuntimeError;
pub use events::{Event, EventKind};
pub use options::{apply as apply_options, Expire, Restart, RestartLimit, TaskOption};
pub use subscribers::{LogFn, LogWriter, Subscribe, TracingWriter};
pub use tasks::{Task, TaskFn, TaskRef, TaskSpec};
