//! # Task registry - pre-start list, lifecycle state and in-flight tracking.
//!
//! The registry decides, under one lock, whether a registered task is parked
//! or launched right away:
//!
//! ```text
//! register(task)
//!   ├─ NotStarted                  → pending.push(task)
//!   └─ Running/Stopping/Stopped    → tracker.spawn_on(task.run(token), runtime)
//!
//! start(runtime)                   (once, NotStarted → Running)
//!   ├─ token = CancellationToken::new()
//!   ├─ drain pending → tracker.spawn_on(...)
//!   └─ tracker.close()             → wait() resolves when the live count hits zero
//! ```
//!
//! ## Rules
//! - The state check and the spawn happen under the same lock as `start`, so a
//!   task registered concurrently with the transition is launched exactly once.
//! - Every launched task gets a clone of the one shared token. After shutdown
//!   began the token is already cancelled, so late tasks see it immediately.
//! - The tracker stays closed after `start`; dynamic spawns keep it non-empty
//!   while they run, which is what makes `drained()` a zero-crossing event.

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::{misuse, RuntimeError};
use crate::tasks::{Task, TaskRef};

/// Supervisor lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Accepting configuration and pre-start tasks.
    NotStarted,
    /// `run` is active; new tasks launch immediately.
    Running,
    /// A stop signal arrived; the shared context is cancelled and tasks are draining.
    Stopping,
    /// `run` returned.
    Stopped,
}

struct Inner {
    state: Lifecycle,
    pending: Vec<TaskRef>,
    token: Option<CancellationToken>,
    runtime: Option<Handle>,
}

/// Registry of supervised tasks.
pub(crate) struct Registry {
    inner: Mutex<Inner>,
    tracker: TaskTracker,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: Lifecycle::NotStarted,
                pending: Vec::new(),
                token: None,
                runtime: None,
            }),
            tracker: TaskTracker::new(),
        }
    }

    /// Parks the task before start, launches it afterwards.
    ///
    /// Returns `true` if the task was launched.
    pub(crate) fn register(&self, task: TaskRef) -> bool {
        let mut inner = self.inner.lock();
        if let (Some(token), Some(rt)) = (inner.token.clone(), inner.runtime.clone()) {
            self.launch(task, token, &rt);
            return true;
        }
        inner.pending.push(task);
        false
    }

    /// Transitions `NotStarted → Running` and launches every pending task.
    ///
    /// Returns the shared token and the number of tasks launched.
    ///
    /// # Panics
    /// If the registry was already started.
    pub(crate) fn start(&self, rt: Handle) -> (CancellationToken, usize) {
        let mut inner = self.inner.lock();
        if inner.state != Lifecycle::NotStarted {
            drop(inner);
            misuse(RuntimeError::AlreadyStarted);
        }

        let token = CancellationToken::new();
        let pending = std::mem::take(&mut inner.pending);
        let launched = pending.len();
        for task in pending {
            self.launch(task, token.clone(), &rt);
        }
        self.tracker.close();

        inner.state = Lifecycle::Running;
        inner.token = Some(token.clone());
        inner.runtime = Some(rt);
        (token, launched)
    }

    /// Runs `f` only while the registry is `NotStarted`, holding the state lock.
    ///
    /// # Panics
    /// If the registry already left `NotStarted`.
    pub(crate) fn while_unstarted<R>(&self, what: &'static str, f: impl FnOnce() -> R) -> R {
        let inner = self.inner.lock();
        if inner.state != Lifecycle::NotStarted {
            drop(inner);
            misuse(RuntimeError::ConfigureAfterStart { what });
        }
        let out = f();
        drop(inner);
        out
    }

    pub(crate) fn set_state(&self, state: Lifecycle) {
        self.inner.lock().state = state;
    }

    pub(crate) fn state(&self) -> Lifecycle {
        self.inner.lock().state
    }

    pub(crate) fn token(&self) -> Option<CancellationToken> {
        self.inner.lock().token.clone()
    }

    /// Number of pre-start tasks waiting for `start`.
    pub(crate) fn pending(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Number of launched tasks that have not returned yet.
    pub(crate) fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Resolves once every launched task has returned (only after `start`).
    pub(crate) async fn drained(&self) {
        self.tracker.wait().await
    }

    fn launch(&self, task: TaskRef, token: CancellationToken, rt: &Handle) {
        self.tracker.spawn_on(async move { task.run(token).await }, rt);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::TaskFn;

    fn counting(runs: Arc<AtomicUsize>) -> TaskRef {
        TaskFn::arc(move |_ctx: CancellationToken| {
            let runs = Arc::clone(&runs);
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test]
    async fn parks_before_start_and_launches_on_start() {
        let runs = Arc::new(AtomicUsize::new(0));
        let reg = Registry::new();

        assert!(!reg.register(counting(runs.clone())));
        assert!(!reg.register(counting(runs.clone())));
        assert_eq!(reg.pending(), 2);
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        let (_token, launched) = reg.start(Handle::current());
        assert_eq!(launched, 2);
        assert_eq!(reg.pending(), 0);
        assert_eq!(reg.state(), Lifecycle::Running);

        tokio::time::timeout(Duration::from_secs(5), reg.drained())
            .await
            .unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn registers_after_start_launch_immediately() {
        let runs = Arc::new(AtomicUsize::new(0));
        let reg = Registry::new();
        let (_token, launched) = reg.start(Handle::current());
        assert_eq!(launched, 0);

        assert!(reg.register(counting(runs.clone())));
        tokio::time::timeout(Duration::from_secs(5), reg.drained())
            .await
            .unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(reg.in_flight(), 0);
    }

    #[tokio::test]
    async fn drained_waits_for_dynamic_tasks() {
        let reg = Registry::new();
        let (token, _) = reg.start(Handle::current());

        reg.register(TaskFn::arc(|ctx: CancellationToken| async move {
            ctx.cancelled().await;
        }));
        assert_eq!(reg.in_flight(), 1);

        let pending = tokio::time::timeout(Duration::from_millis(50), reg.drained()).await;
        assert!(pending.is_err(), "must not drain while a task is live");

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), reg.drained())
            .await
            .unwrap();
    }

    #[tokio::test]
    #[should_panic(expected = "already started")]
    async fn start_twice_panics() {
        let reg = Registry::new();
        reg.start(Handle::current());
        reg.start(Handle::current());
    }

    #[test]
    #[should_panic(expected = "cannot change logger after run")]
    fn configure_after_start_panics() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let reg = Registry::new();
        reg.start(rt.handle().clone());
        reg.while_unstarted("logger", || ());
    }
}
