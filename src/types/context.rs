//! Per-call deadline and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::Error;

/// Deadline and cancellation state threaded through every page fetch.
///
/// Cloning is cheap; clones observe the same cancellation signal.
///
/// ## Example
///
/// ```rust
/// use rds_finder::{CallContext, CancelHandle};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let handle = CancelHandle::new();
/// let ctx = CallContext::background()
///     .with_timeout(Duration::from_secs(30))
///     .with_cancellation(&handle);
///
/// assert!(!ctx.is_cancelled());
/// handle.cancel();
/// assert!(ctx.is_cancelled());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl CallContext {
    /// A context with no deadline and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Bounds the call to `timeout` from now. An earlier deadline wins.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bounds the call to `deadline`. An earlier deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attaches a cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, handle: &CancelHandle) -> Self {
        self.cancel = Some(handle.tx.subscribe());
        self
    }

    /// Returns the effective deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if the attached handle has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fails fast if the call is already cancelled or past its deadline.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::cancelled());
        }
        if self.deadline.is_some_and(|at| Instant::now() >= at) {
            return Err(Error::timeout("deadline exceeded"));
        }
        Ok(())
    }

    /// Runs one network round-trip, aborting on cancellation or deadline.
    ///
    /// `operation` names the round-trip in the resulting error message.
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        self.check()?;

        let mut cancel = self.cancel.clone();
        let cancelled = async move {
            if let Some(rx) = cancel.as_mut() {
                let sender_gone = rx.wait_for(|c| *c).await.is_err();
                if !sender_gone {
                    return;
                }
            }
            std::future::pending::<()>().await
        };

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(Error::cancelled()),
            _ = expired => Err(Error::timeout(format!("deadline exceeded during {}", operation))),
            result = fut => result,
        }
    }
}

/// Cancels every [`CallContext`] it was attached to.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Creates a handle in the not-cancelled state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
