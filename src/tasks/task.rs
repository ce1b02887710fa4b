//! # Task abstraction.
//!
//! A task receives the shared [`CancellationToken`] and should watch it to
//! stop cooperatively during shutdown. The supervisor never aborts a task.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// # Asynchronous, cancelable unit of work.
///
/// `run` may be invoked more than once (see [`TaskOption::Restart`](crate::TaskOption::Restart)),
/// so each call must start from a clean slate. Failures are the task's own
/// business: nothing is returned to the supervisor.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use gracevisor::Task;
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Task for Ticker {
///     async fn run(&self, ctx: CancellationToken) {
///         while !ctx.is_cancelled() {
///             tokio::time::sleep(std::time::Duration::from_millis(10)).await;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the task until completion or cancellation.
    async fn run(&self, ctx: CancellationToken);
}

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;
