//! # Timeout decorator.
//!
//! The wrapped task runs on a **child** of the context it is given. The child is
//! cancelled when either:
//! - the parent is cancelled (immediately, through the token tree), or
//! - `after` has elapsed since this invocation started.
//!
//! ```text
//! parent ──child_token()──► child ──► inner.run(child)
//!                             ▲
//!            sleep(after) ────┘ cancel
//! ```
//!
//! The child is always cancelled when the invocation returns, which detaches it
//! from the parent. Expiry only cancels the context: the decorator keeps awaiting
//! the inner task until it returns on its own.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::tasks::{Task, TaskRef};

/// Task wrapper bounding each invocation's context by a deadline.
pub struct Expire {
    inner: TaskRef,
    after: Duration,
}

impl Expire {
    pub fn new(inner: TaskRef, after: Duration) -> Self {
        Self { inner, after }
    }
}

#[async_trait]
impl Task for Expire {
    async fn run(&self, ctx: CancellationToken) {
        let child = ctx.child_token();
        let _release = child.clone().drop_guard();

        let run = self.inner.run(child.clone());
        tokio::pin!(run);

        tokio::select! {
            biased;
            _ = &mut run => return,
            _ = time::sleep(self.after) => child.cancel(),
        }
        run.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use parking_lot::Mutex;

    use super::*;
    use crate::TaskFn;

    fn waiter(seen: Arc<Mutex<Option<CancellationToken>>>) -> TaskRef {
        TaskFn::arc(move |ctx: CancellationToken| {
            let seen = Arc::clone(&seen);
            async move {
                *seen.lock() = Some(ctx.clone());
                ctx.cancelled().await;
            }
        })
    }

    #[tokio::test]
    async fn cancels_after_deadline_without_parent() {
        let seen = Arc::new(Mutex::new(None));
        let task = Expire::new(waiter(seen.clone()), Duration::from_millis(50));
        let parent = CancellationToken::new();

        let started = Instant::now();
        task.run(parent.clone()).await;
        let took = started.elapsed();

        assert!(took >= Duration::from_millis(50), "returned early: {took:?}");
        assert!(took < Duration::from_secs(2), "returned late: {took:?}");
        assert!(!parent.is_cancelled(), "expiry must not leak to the parent");
        assert!(seen.lock().as_ref().unwrap().is_cancelled());
    }

    #[tokio::test]
    async fn parent_cancel_wins_over_deadline() {
        let seen = Arc::new(Mutex::new(None));
        let task = Expire::new(waiter(seen), Duration::from_secs(30));
        let parent = CancellationToken::new();

        let canceller = parent.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        task.run(parent).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn context_released_on_early_return() {
        let seen = Arc::new(Mutex::new(None));
        let quick: TaskRef = {
            let seen = seen.clone();
            TaskFn::arc(move |ctx: CancellationToken| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock() = Some(ctx);
                }
            })
        };
        let task = Expire::new(quick, Duration::from_secs(30));
        let parent = CancellationToken::new();

        task.run(parent.clone()).await;

        assert!(seen.lock().as_ref().unwrap().is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn keeps_waiting_for_task_that_ignores_expiry() {
        let slow: TaskRef = TaskFn::arc(|_ctx: CancellationToken| async move {
            time::sleep(Duration::from_millis(80)).await;
        });
        let task = Expire::new(slow, Duration::from_millis(10));

        let started = Instant::now();
        task.run(CancellationToken::new()).await;
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
