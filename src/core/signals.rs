//! # Termination signal sources.
//!
//! Every stop request reaches [`Supervisor::run`](crate::Supervisor::run) through one
//! channel. Two producers feed it:
//! - one forwarder task per configured OS signal, installed by `run`;
//! - any number of [`SignalNotifier`] handles held by the host.
//!
//! ```text
//! SIGINT  ──► forwarder ──┐
//! SIGTERM ──► forwarder ──┼──► mpsc<StopSignal> ──► Supervisor::run (select!)
//! notifier.notify(..) ────┘
//! ```
//!
//! ## Platforms
//! **Unix:** every [`StopSignal`] maps to a [`SignalKind`](tokio::signal::unix::SignalKind).
//!
//! **Other platforms:** only [`StopSignal::Interrupt`] is observed (via
//! [`tokio::signal::ctrl_c`]); the rest can still be delivered through a notifier.

use std::fmt;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;

/// Termination signals the supervisor can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopSignal {
    /// `SIGINT` (Ctrl-C in a terminal).
    Interrupt,
    /// `SIGQUIT`.
    Quit,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGHUP`.
    Hangup,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
}

impl StopSignal {
    /// The conventional interrupt/quit/terminate triad.
    pub const DEFAULT: [StopSignal; 3] = [
        StopSignal::Interrupt,
        StopSignal::Quit,
        StopSignal::Terminate,
    ];

    /// Returns the POSIX name of the signal.
    pub fn name(self) -> &'static str {
        match self {
            StopSignal::Interrupt => "SIGINT",
            StopSignal::Quit => "SIGQUIT",
            StopSignal::Terminate => "SIGTERM",
            StopSignal::Hangup => "SIGHUP",
            StopSignal::User1 => "SIGUSR1",
            StopSignal::User2 => "SIGUSR2",
        }
    }

    #[cfg(unix)]
    fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            StopSignal::Interrupt => SignalKind::interrupt(),
            StopSignal::Quit => SignalKind::quit(),
            StopSignal::Terminate => SignalKind::terminate(),
            StopSignal::Hangup => SignalKind::hangup(),
            StopSignal::User1 => SignalKind::user_defined1(),
            StopSignal::User2 => SignalKind::user_defined2(),
        }
    }
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle for delivering a stop request without an OS signal.
///
/// A notified signal is handled exactly like one received from the OS.
/// Requests sent before `run` starts are queued and observed as soon as it does.
#[derive(Clone, Debug)]
pub struct SignalNotifier {
    tx: mpsc::UnboundedSender<StopSignal>,
}

impl SignalNotifier {
    pub(crate) fn new(tx: mpsc::UnboundedSender<StopSignal>) -> Self {
        Self { tx }
    }

    /// Requests shutdown as if `signal` had been received.
    ///
    /// Returns `false` if the supervisor has already finished and nobody listens anymore.
    pub fn notify(&self, signal: StopSignal) -> bool {
        self.tx.send(signal).is_ok()
    }
}

/// Installs one forwarder per signal; forwarders exit when `stop` is cancelled.
///
/// Registration happens synchronously, so a failure is reported before `run`
/// commits to waiting on the channel.
#[cfg(unix)]
pub(crate) fn forward_os_signals(
    signals: &[StopSignal],
    tx: &mpsc::UnboundedSender<StopSignal>,
    stop: &CancellationToken,
    rt: &Handle,
) -> Result<(), RuntimeError> {
    use tokio::signal::unix::signal;

    for &sig in signals {
        let _guard = rt.enter();
        let mut stream = signal(sig.kind()).map_err(|source| RuntimeError::Signal {
            signal: sig.name(),
            source,
        })?;

        let tx = tx.clone();
        let stop = stop.clone();
        rt.spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    got = stream.recv() => match got {
                        Some(()) => {
                            if tx.send(sig).is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });
    }
    Ok(())
}

/// Installs a Ctrl-C forwarder if [`StopSignal::Interrupt`] is configured.
#[cfg(not(unix))]
pub(crate) fn forward_os_signals(
    signals: &[StopSignal],
    tx: &mpsc::UnboundedSender<StopSignal>,
    stop: &CancellationToken,
    rt: &Handle,
) -> Result<(), RuntimeError> {
    if !signals.contains(&StopSignal::Interrupt) {
        return Ok(());
    }

    let tx = tx.clone();
    let stop = stop.clone();
    rt.spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                got = tokio::signal::ctrl_c() => {
                    if got.is_err() || tx.send(StopSignal::Interrupt).is_err() {
                        break;
                    }
                }
            }
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_posix() {
        let names: Vec<_> = StopSignal::DEFAULT.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["SIGINT", "SIGQUIT", "SIGTERM"]);
    }

    #[tokio::test]
    async fn notifier_feeds_the_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = SignalNotifier::new(tx);

        assert!(notifier.notify(StopSignal::Hangup));
        assert_eq!(rx.recv().await, Some(StopSignal::Hangup));

        drop(rx);
        assert!(!notifier.notify(StopSignal::Terminate));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forwarders_stop_with_token() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        forward_os_signals(&[StopSignal::User2], &tx, &stop, &Handle::current())
            .expect("register SIGUSR2");
        stop.cancel();
        tokio::task::yield_now().await;
    }
}
