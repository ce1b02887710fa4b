//! # Example: graceful
//!
//! A worker process with three kinds of tasks, shut down by Ctrl-C / SIGTERM.
//!
//! Shows how to:
//! - Route lifecycle events through `tracing` with [`TracingWriter`].
//! - Decorate tasks with [`TaskOption::expire`] and [`TaskOption::restart`].
//! - Register a task from inside a running task.
//! - Write a PID file for the lifetime of the process.
//!
//! ## Flow
//! ```text
//! Supervisor::run()
//!     ├─► heartbeat      (runs until cancelled)
//!     ├─► poller         (restart forever, each run expires after 2s)
//!     └─► spawner        (registers a one-shot job, then returns)
//! Ctrl-C ──► SignalReceived ──► token.cancel() ──► drain (5s) ──► Stopped
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example graceful
//! ```

use std::sync::Arc;
use std::time::Duration;

use gracevisor::{Config, Supervisor, TaskFn, TaskOption, TaskRef, TracingWriter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn heartbeat() -> TaskRef {
    TaskFn::arc(|ctx: CancellationToken| async move {
        let mut tick = tokio::time::interval(Duration::from_millis(500));
        loop {
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = tick.tick() => tracing::info!("heartbeat"),
            }
        }
        tracing::info!("heartbeat: bye");
    })
}

fn poller() -> TaskRef {
    TaskFn::arc(|ctx: CancellationToken| async move {
        tracing::info!("poller: polling");
        ctx.cancelled().await;
    })
}

fn spawner(sup: Arc<Supervisor>) -> TaskRef {
    TaskFn::arc(move |_ctx: CancellationToken| {
        let sup = Arc::clone(&sup);
        async move {
            let job: TaskRef = TaskFn::arc(|ctx: CancellationToken| async move {
                tokio::select! {
                    _ = ctx.cancelled() => tracing::warn!("job: cancelled"),
                    _ = tokio::time::sleep(Duration::from_secs(1)) => tracing::info!("job: done"),
                }
            });
            sup.go(job);
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = Config {
        grace: Duration::from_secs(5),
        ..Config::default()
    };
    let sup = Supervisor::builder(cfg)
        .with_logger(Arc::new(TracingWriter::new()))
        .with_pid_dir(std::env::temp_dir())
        .build();

    sup.go(heartbeat());
    sup.go_with(
        poller(),
        [TaskOption::restart_forever(), TaskOption::expire(Duration::from_secs(2))],
    );
    sup.go(spawner(Arc::clone(&sup)));

    sup.run(Duration::ZERO).await?;
    Ok(())
}
