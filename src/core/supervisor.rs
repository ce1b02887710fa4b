//! # Supervisor: lifecycle state machine and shutdown protocol.
//!
//! The [`Supervisor`] owns the registry (pending tasks, shared token, in-flight
//! tracker), the configuration, the logger and the stop-signal channel.
//!
//! ## High-level architecture
//! ```text
//! Before run():
//!   go(task) / register(spec) ──► options::apply ──► Registry.pending
//!   set_stop_signals / set_logger / set_pid_dir     (panic once started)
//!
//! run(drain_timeout):
//!   Registry.start()        NotStarted → Running, token created, pending launched
//!   publish Starting
//!   forward_os_signals()    one forwarder per StopSignal ──► mpsc
//!   PidFile::create()       if configured ──► publish PidWritten
//!
//!   select! {
//!     signal ──► Stopping ──► publish SignalReceived
//!                         ──► token.cancel()      → every task (and late spawns) sees it
//!                         ──► publish Waiting
//!                         ──► timeout(grace, drained):
//!                                ├─ Ok  → publish AllStoppedWithin → Ok(())
//!                                └─ Err → publish GraceExceeded    → Err(GraceExceeded)
//!     drained ──► publish AllExited → Ok(())
//!   }
//!
//! Teardown (every path):
//!   PidFile::remove() ──► publish PidRemoved
//!   token.cancel(), state = Stopped, publish Stopped
//! ```
//!
//! - Detecting the signal never waits on a task; the drain timeout only bounds the waiting phase.
//! - Tasks are never aborted. A task that ignores its context keeps running after
//!   `run` returns; the host is expected to exit the process.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use gracevisor::{Config, StopSignal, Supervisor, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default()).build();
//!
//!     let ticker: TaskRef = TaskFn::arc(|ctx: CancellationToken| async move {
//!         while !ctx.is_cancelled() {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!         }
//!     });
//!     sup.go(ticker);
//!
//!     // Stand-in for SIGTERM from the process manager.
//!     sup.notifier().notify(StopSignal::Terminate);
//!
//!     sup.run(Duration::from_secs(5)).await?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::builder::SupervisorBuilder;
use crate::core::pid::PidFile;
use crate::core::registry::{Lifecycle, Registry};
use crate::core::signals::{self, SignalNotifier, StopSignal};
use crate::error::{misuse, RuntimeError};
use crate::events::{Event, EventKind};
use crate::options::TaskOption;
use crate::subscribers::{LogWriter, Subscribe};
use crate::tasks::{TaskRef, TaskSpec};

/// What ended the wait in `run`.
enum Trigger {
    Signal(StopSignal),
    Drained,
}

/// Coordinates task startup, cancellation fan-out and graceful shutdown.
pub struct Supervisor {
    registry: Registry,
    cfg: Mutex<Config>,
    logger: Mutex<Arc<dyn Subscribe>>,
    signal_tx: mpsc::UnboundedSender<StopSignal>,
    signal_rx: Mutex<Option<mpsc::UnboundedReceiver<StopSignal>>>,
}

impl Supervisor {
    /// Creates a supervisor that logs to stdout via [`LogWriter`].
    ///
    /// # Panics
    /// If `cfg.stop_signals` is empty.
    pub fn new(cfg: Config) -> Self {
        Self::new_internal(cfg, Arc::new(LogWriter::new()))
    }

    /// Returns a builder for a shared supervisor.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, logger: Arc<dyn Subscribe>) -> Self {
        if cfg.stop_signals.is_empty() {
            misuse(RuntimeError::NoStopSignals);
        }
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Self {
            registry: Registry::new(),
            cfg: Mutex::new(cfg),
            logger: Mutex::new(logger),
            signal_tx,
            signal_rx: Mutex::new(Some(signal_rx)),
        }
    }

    // ---------------------------
    // Configuration (NotStarted only)
    // ---------------------------

    /// Replaces the set of OS signals that start shutdown.
    ///
    /// # Panics
    /// If `run` was already called, or `signals` is empty.
    pub fn set_stop_signals(&self, signals: impl IntoIterator<Item = StopSignal>) {
        let signals: Vec<StopSignal> = signals.into_iter().collect();
        if signals.is_empty() {
            misuse(RuntimeError::NoStopSignals);
        }
        self.registry.while_unstarted("stop signals", || {
            self.cfg.lock().stop_signals = signals;
        });
    }

    /// Replaces the logger.
    ///
    /// # Panics
    /// If `run` was already called.
    pub fn set_logger(&self, logger: Arc<dyn Subscribe>) {
        self.registry.while_unstarted("logger", || {
            *self.logger.lock() = logger;
        });
    }

    /// Enables the PID file in `dir`.
    ///
    /// # Panics
    /// If `run` was already called.
    pub fn set_pid_dir(&self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        self.registry.while_unstarted("pid dir", || {
            self.cfg.lock().pid_dir = Some(dir);
        });
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a task without options.
    ///
    /// Before `run` the task is queued; afterwards it starts immediately with the
    /// shared context (already cancelled if shutdown began).
    pub fn go(&self, task: TaskRef) {
        self.register(TaskSpec::new(task));
    }

    /// Registers a task decorated with `options` (first option outermost).
    pub fn go_with(&self, task: TaskRef, options: impl IntoIterator<Item = TaskOption>) {
        self.register(TaskSpec::new(task).with_options(options));
    }

    /// Registers a task specification.
    ///
    /// Safe to call concurrently, including from running tasks.
    pub fn register(&self, spec: TaskSpec) {
        self.registry.register(spec.into_task());
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Returns a handle that delivers stop requests to `run`.
    pub fn notifier(&self) -> SignalNotifier {
        SignalNotifier::new(self.signal_tx.clone())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.registry.state()
    }

    /// Shared cancellation token (`None` before `run`).
    pub fn token(&self) -> Option<CancellationToken> {
        self.registry.token()
    }

    /// Number of tasks queued for `run`.
    pub fn pending(&self) -> usize {
        self.registry.pending()
    }

    /// Number of launched tasks that have not returned yet.
    pub fn in_flight(&self) -> usize {
        self.registry.in_flight()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.cfg.lock().clone()
    }

    // ---------------------------
    // Run
    // ---------------------------

    /// Starts every registered task and blocks until shutdown completes.
    ///
    /// Returns when either:
    /// - all tasks returned on their own → `Ok(())`;
    /// - a stop signal arrived and all tasks returned within the drain timeout → `Ok(())`;
    /// - a stop signal arrived and the drain timeout expired → `Err(GraceExceeded)`;
    /// - signal registration or the PID file failed → `Err(Signal | PidFile)`.
    ///
    /// `drain_timeout = 0` uses [`Config::grace`].
    ///
    /// # Panics
    /// If called more than once, or outside a tokio runtime.
    pub async fn run(&self, drain_timeout: Duration) -> Result<(), RuntimeError> {
        let rt = Handle::current();
        let (token, launched) = self.registry.start(rt.clone());

        let cfg = self.cfg.lock().clone();
        let logger = self.logger.lock().clone();
        let grace = cfg.drain_timeout(drain_timeout);
        let Some(mut stop_rx) = self.signal_rx.lock().take() else {
            misuse(RuntimeError::AlreadyStarted);
        };

        publish(
            &logger,
            Event::new(EventKind::Starting)
                .with_signals(&cfg.stop_signals)
                .with_in_flight(launched)
                .with_grace(grace),
        )
        .await;

        let listeners = CancellationToken::new();
        let _stop_listeners = listeners.clone().drop_guard();
        if let Err(err) =
            signals::forward_os_signals(&cfg.stop_signals, &self.signal_tx, &listeners, &rt)
        {
            self.finish(&token, &logger).await;
            return Err(err);
        }

        let pid = match cfg.pid_dir().map(PidFile::create).transpose() {
            Ok(pid) => pid,
            Err(err) => {
                self.finish(&token, &logger).await;
                return Err(err);
            }
        };
        if let Some(pid) = &pid {
            publish(&logger, Event::new(EventKind::PidWritten).with_path(pid.path())).await;
        }

        let trigger = tokio::select! {
            biased;
            Some(sig) = stop_rx.recv() => Trigger::Signal(sig),
            _ = self.registry.drained() => Trigger::Drained,
        };

        let mut outcome = match trigger {
            Trigger::Drained => {
                publish(&logger, Event::new(EventKind::AllExited)).await;
                Ok(())
            }
            Trigger::Signal(sig) => self.drain(sig, &token, grace, &logger).await,
        };

        if let Some(pid) = pid {
            match pid.remove() {
                Ok(path) => {
                    publish(&logger, Event::new(EventKind::PidRemoved).with_path(&path)).await;
                }
                Err(err) => outcome = Err(err),
            }
        }

        self.finish(&token, &logger).await;
        outcome
    }

    /// Cancels the shared context and waits up to `grace` for in-flight tasks.
    async fn drain(
        &self,
        sig: StopSignal,
        token: &CancellationToken,
        grace: Duration,
        logger: &Arc<dyn Subscribe>,
    ) -> Result<(), RuntimeError> {
        self.registry.set_state(Lifecycle::Stopping);
        publish(logger, Event::new(EventKind::SignalReceived).with_signal(sig)).await;

        token.cancel();
        publish(
            logger,
            Event::new(EventKind::Waiting)
                .with_in_flight(self.registry.in_flight())
                .with_grace(grace),
        )
        .await;

        match time::timeout(grace, self.registry.drained()).await {
            Ok(()) => {
                publish(logger, Event::new(EventKind::AllStoppedWithin)).await;
                Ok(())
            }
            Err(_elapsed) => {
                let in_flight = self.registry.in_flight();
                publish(
                    logger,
                    Event::new(EventKind::GraceExceeded)
                        .with_grace(grace)
                        .with_in_flight(in_flight),
                )
                .await;
                Err(RuntimeError::GraceExceeded { grace, in_flight })
            }
        }
    }

    /// Terminal transition shared by every exit path of `run`.
    async fn finish(&self, token: &CancellationToken, logger: &Arc<dyn Subscribe>) {
        token.cancel();
        self.registry.set_state(Lifecycle::Stopped);
        publish(logger, Event::new(EventKind::Stopped)).await;
    }
}

async fn publish(logger: &Arc<dyn Subscribe>, ev: Event) {
    logger.on_event(&ev).await;
}
