//! # Restart decorator.
//!
//! Re-invokes the wrapped task sequentially, in the same context.
//!
//! ```text
//! loop {
//!   ├─► limit reached?           → exit   (Times(n): after n runs; Times(0): never runs)
//!   ├─► not first run:
//!   │     ├─► ctx cancelled?     → exit
//!   │     └─► yield to scheduler
//!   └─► inner.run(ctx).await
//! }
//! ```
//!
//! There is no error inspection: a restart means "run again", not "run again on failure".
//! With [`RestartLimit::Unlimited`] the only way out is cancellation of the context.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::tasks::{Task, TaskRef};

/// How many times a task body runs under [`Restart`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartLimit {
    /// Run at most `n` times in total. `Times(0)` runs nothing.
    Times(u32),
    /// Keep re-running until the context is cancelled.
    Unlimited,
}

impl RestartLimit {
    /// Maps a signed count: negative means unlimited.
    pub fn from_count(times: i64) -> Self {
        if times < 0 {
            RestartLimit::Unlimited
        } else {
            RestartLimit::Times(u32::try_from(times).unwrap_or(u32::MAX))
        }
    }
}

/// Task wrapper that repeats the inner task.
pub struct Restart {
    inner: TaskRef,
    limit: RestartLimit,
}

impl Restart {
    pub fn new(inner: TaskRef, limit: RestartLimit) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl Task for Restart {
    async fn run(&self, ctx: CancellationToken) {
        let mut remaining = match self.limit {
            RestartLimit::Times(n) => Some(n),
            RestartLimit::Unlimited => None,
        };
        let mut first = true;

        loop {
            match remaining.as_mut() {
                Some(0) => break,
                Some(n) => *n -= 1,
                None => {}
            }
            if !first {
                if ctx.is_cancelled() {
                    break;
                }
                tokio::task::yield_now().await;
            }
            first = false;

            self.inner.run(ctx.clone()).await;
        }
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
    async fn runs_exactly_n_times() {
        let runs = Arc::new(AtomicUsize::new(0));
        Restart::new(counting(runs.clone()), RestartLimit::Times(3))
            .run(CancellationToken::new())
            .await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_means_no_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        Restart::new(counting(runs.clone()), RestartLimit::Times(0))
            .run(CancellationToken::new())
            .await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stops_restarting_once_cancelled() {
        let runs = Arc::new(AtomicUsize::new(0));
        let ctx = CancellationToken::new();

        let task: TaskRef = {
            let runs = runs.clone();
            TaskFn::arc(move |ctx: CancellationToken| {
                let runs = Arc::clone(&runs);
                async move {
                    if runs.fetch_add(1, Ordering::SeqCst) == 1 {
                        ctx.cancel();
                    }
                }
            })
        };
        Restart::new(task, RestartLimit::Times(10)).run(ctx).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unlimited_runs_until_cancelled() {
        let runs = Arc::new(AtomicUsize::new(0));
        let ctx = CancellationToken::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            canceller.cancel();
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            Restart::new(counting(runs.clone()), RestartLimit::Unlimited).run(ctx),
        )
        .await
        .expect("unlimited restart must end after cancellation");
        assert!(runs.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn negative_count_is_unlimited() {
        assert_eq!(RestartLimit::from_count(-1), RestartLimit::Unlimited);
        assert_eq!(RestartLimit::from_count(0), RestartLimit::Times(0));
        assert_eq!(RestartLimit::from_count(2), RestartLimit::Times(2));
    }
}
