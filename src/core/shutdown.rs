//! Cooperative Shutdown Coordination
//!
//! Provides the write-once [`CancellationToken`] observed by every blocking
//! queue operation, and the [`ShutdownCoordinator`] that turns OS signals or
//! the run timer into a single token signal.
//!
//! # Wake-up protocol
//!
//! Queues register themselves with the token when they are constructed. When
//! the token is signalled it visits every live queue, takes that queue's lock,
//! publishes the flag and broadcasts both of the queue's condition variables
//! before releasing the lock. A waiter either observes the flag before it
//! suspends, or is already suspended when the broadcast arrives; it can never
//! fall between the two.
//!
//! ```text
//! waiter (holds lock)                 signal()
//! ───────────────────                 ─────────────────────────
//! check flag -> false
//! wait() (releases lock)  ─────────▶  lock queue
//!                                     store flag = true
//!                                     notify_all(not_full, not_empty)
//! wakes, re-checks flag   ◀─────────  unlock
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

/// A party that must be woken, under its own lock, when the token is signalled.
pub(crate) trait Interrupt: Send + Sync {
    /// Publish `flag` while holding the listener's exclusive access and wake
    /// every thread suspended on it.
    fn interrupt(&self, flag: &AtomicBool);
}

struct TokenInner {
    cancelled: AtomicBool,
    listeners: Mutex<Vec<Weak<dyn Interrupt>>>,
    // Lets paced workers sleep and still wake the moment the token is set
    nap_lock: Mutex<()>,
    nap: Condvar,
}

/// Process-wide, write-once shutdown signal.
///
/// Cloning the token is cheap; every clone observes the same flag. The flag
/// moves from `false` to `true` exactly once and is never reset.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
                nap_lock: Mutex::new(()),
                nap: Condvar::new(),
            }),
        }
    }

    /// Returns `true` once [`signal`](Self::signal) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Set the flag and wake every thread blocked on a registered queue.
    ///
    /// Idempotent and callable from any thread. Returns `true` only for the
    /// call that performed the `false -> true` transition.
    pub fn signal(&self) -> bool {
        // Serialises concurrent signal() calls and registrations
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let first = !self.inner.cancelled.load(Ordering::Acquire);

        listeners.retain(|listener| listener.strong_count() > 0);
        for listener in listeners.iter().filter_map(Weak::upgrade) {
            listener.interrupt(&self.inner.cancelled);
        }
        self.inner.cancelled.store(true, Ordering::Release);
        drop(listeners);

        let _nap = self
            .inner
            .nap_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.nap.notify_all();

        first
    }

    /// Sleep for `duration` or until the token is signalled, whichever comes
    /// first. Returns `true` if the token was signalled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self
            .inner
            .nap_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while !self.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = match self.inner.nap.wait_timeout(guard, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }

    /// Register a queue so that [`signal`](Self::signal) can wake its waiters.
    pub(crate) fn register(&self, listener: Weak<dyn Interrupt>) {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|existing| existing.strong_count() > 0);
        listeners.push(listener);
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Why the run was asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run time elapsed
    Timeout,
    /// An interrupt or termination signal arrived
    Interrupted,
}

/// Coordinates graceful shutdown across the application
///
/// Owns the run's [`CancellationToken`] and a broadcast channel used to tell
/// the orchestration task that a signal arrived.
pub struct ShutdownCoordinator {
    token: CancellationToken,
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator around `token`
    pub fn new(token: CancellationToken) -> Self {
        // Larger than one so bursts of signals are not dropped
        let (shutdown_tx, _) = broadcast::channel(8);
        Self { token, shutdown_tx }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal the token and notify subscribers
    pub fn trigger_shutdown(&self) -> bool {
        let first = self.token.signal();
        let _ = self.shutdown_tx.send(());
        first
    }

    /// Wait until `run_for` elapses or a shutdown notification arrives.
    ///
    /// Does not signal the token itself; the caller decides when to do so.
    pub async fn wait_for_stop(&self, run_for: Duration) -> StopReason {
        let mut shutdown_rx = self.subscribe();
        if self.token.is_cancelled() {
            return StopReason::Interrupted;
        }
        tokio::select! {
            _ = tokio::time::sleep(run_for) => StopReason::Timeout,
            _ = shutdown_rx.recv() => StopReason::Interrupted,
        }
    }

    /// Set up signal handlers for graceful shutdown
    ///
    /// Must be called from within a tokio runtime. The first signal cancels
    /// the token; a second one forces the process to exit.
    pub fn install_signal_handlers(&self) {
        let signal_count = Arc::new(AtomicUsize::new(0));

        #[cfg(unix)]
        {
            // Restore default SIGPIPE so piping the report into `head` exits quietly
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            }

            use tokio::signal::unix::{signal, SignalKind};
            let signals = [
                ("SIGINT", SignalKind::interrupt()),
                ("SIGTERM", SignalKind::terminate()),
                ("SIGHUP", SignalKind::hangup()),
                ("SIGQUIT", SignalKind::quit()),
            ];

            for (name, kind) in signals {
                let token = self.token.clone();
                let tx = self.shutdown_tx.clone();
                let counter = signal_count.clone();

                tokio::spawn(async move {
                    if let Ok(mut sig) = signal(kind) {
                        while sig.recv().await.is_some() {
                            on_signal(name, &token, &tx, &counter);
                        }
                    }
                });
            }
        }

        #[cfg(not(unix))]
        {
            let token = self.token.clone();
            let tx = self.shutdown_tx.clone();
            tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    on_signal("Ctrl-C", &token, &tx, &signal_count);
                }
            });
        }
    }
}

fn on_signal(
    name: &str,
    token: &CancellationToken,
    tx: &broadcast::Sender<()>,
    counter: &AtomicUsize,
) {
    let prev = counter.fetch_add(1, Ordering::AcqRel);
    if prev >= 1 {
        log::warn!("{} received again; exiting", name);
        std::process::exit(130);
    }
    log::info!("{} received, signalling all workers to terminate", name);
    token.signal();
    let _ = tx.send(());
}
