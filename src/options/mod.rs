//! Task decorators.
//!
//! A [`TaskOption`] turns a task into another task that adds temporal behavior
//! around it, without the task author writing that logic:
//! - [`TaskOption::Expire`] bounds each invocation's context by a deadline ([`Expire`]);
//! - [`TaskOption::Restart`] re-runs the task a bounded or unbounded number of times ([`Restart`]).
//!
//! ## Composition order
//! Options are applied in the order given and the **first option is the outermost
//! wrapper**: it sees the invocation first and wraps everything listed after it.
//!
//! ```text
//! [Restart(2), Expire(d)]  →  Restart { Expire { task } }   each run gets its own `d`
//! [Expire(d), Restart(2)]  →  Expire { Restart { task } }   both runs share one `d`
//! ```
//!
//! Options are plain `Copy` values. Per-invocation state (restart counters,
//! deadlines) lives in the invocation's future, never in the option.

mod expire;
mod restart;

use std::time::Duration;

pub use expire::Expire;
pub use restart::{Restart, RestartLimit};

use crate::tasks::TaskRef;

/// A decorator applied to a task before it is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOption {
    /// Cancel the task's context `Duration` after each invocation starts.
    Expire(Duration),
    /// Re-run the task according to the limit.
    Restart(RestartLimit),
}

impl TaskOption {
    /// Timeout option.
    pub fn expire(after: Duration) -> Self {
        TaskOption::Expire(after)
    }

    /// Restart option; a negative count restarts until cancellation.
    pub fn restart(times: i64) -> Self {
        TaskOption::Restart(RestartLimit::from_count(times))
    }

    /// Restart option without a run limit.
    pub fn restart_forever() -> Self {
        TaskOption::Restart(RestartLimit::Unlimited)
    }

    /// Wraps `task` with this single option.
    pub fn wrap(self, task: TaskRef) -> TaskRef {
        match self {
            TaskOption::Expire(after) => std::sync::Arc::new(Expire::new(task, after)),
            TaskOption::Restart(limit) => std::sync::Arc::new(Restart::new(task, limit)),
        }
    }
}

/// Applies `options` to `task`, first option outermost.
pub fn apply(task: TaskRef, options: &[TaskOption]) -> TaskRef {
    options
        .iter()
        .rev()
        .fold(task, |inner, option| option.wrap(inner))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{Task, TaskFn};

    /// Counts runs and blocks each one until its context is cancelled.
    fn blocking_counter(runs: Arc<AtomicUsize>) -> TaskRef {
        TaskFn::arc(move |ctx: CancellationToken| {
            let runs = Arc::clone(&runs);
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                ctx.cancelled().await;
            }
        })
    }

    #[tokio::test]
    async fn no_options_is_identity() {
        let runs = Arc::new(AtomicUsize::new(0));
        let task = blocking_counter(runs.clone());
        let same = apply(task.clone(), &[]);
        assert!(Arc::ptr_eq(&task, &same));
    }

    #[tokio::test]
    async fn restart_outside_expire_gives_each_run_a_deadline() {
        let runs = Arc::new(AtomicUsize::new(0));
        let task = apply(
            blocking_counter(runs.clone()),
            &[
                TaskOption::restart(2),
                TaskOption::expire(Duration::from_millis(40)),
            ],
        );

        let started = Instant::now();
        task.run(CancellationToken::new()).await;

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn expire_outside_restart_shares_one_deadline() {
        let runs = Arc::new(AtomicUsize::new(0));
        let task = apply(
            blocking_counter(runs.clone()),
            &[
                TaskOption::expire(Duration::from_millis(40)),
                TaskOption::restart(2),
            ],
        );

        let started = Instant::now();
        task.run(CancellationToken::new()).await;

        // The shared context is already cancelled when the second run would start.
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn options_are_plain_values() {
        let opt = TaskOption::expire(Duration::from_secs(1));
        let copy = opt;
        assert_eq!(opt, copy);
        assert_eq!(TaskOption::restart(-5), TaskOption::restart_forever());
    }
}
