//! Cooperative cancellation shared between the controlling thread and a worker.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Cloneable cancellation flag with an interruptible wait.
///
/// The flag is a single atomic. The one-slot channel only serves to wake a worker
/// blocked in [`CancellationToken::wait`].
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                wake_tx,
                wake_rx,
            }),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            // Full only if a wake is already pending.
            let _ = self.inner.wake_tx.try_send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Sleeps for `delay` unless cancelled first. Returns `true` when cancelled.
    ///
    /// A zero delay only checks the flag.
    pub fn wait(&self, delay: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        if delay.is_zero() {
            return false;
        }
        match self.inner.wake_rx.recv_timeout(delay) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.is_cancelled()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(!token.wait(Duration::ZERO));
        assert!(!token.wait(Duration::from_millis(1)));
    }

    #[test]
    fn cancel_is_visible_through_clones_and_idempotent() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        other.cancel();
        assert!(token.is_cancelled());
        assert!(token.wait(Duration::ZERO));
        assert!(token.wait(Duration::from_secs(5)));
    }

    #[test]
    fn cancel_interrupts_a_long_wait() {
        let token = CancellationToken::new();
        let worker = token.clone();
        let started = Instant::now();
        let handle = thread::spawn(move || worker.wait(Duration::from_secs(30)));

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        assert!(handle.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
