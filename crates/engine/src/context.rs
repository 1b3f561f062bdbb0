//! Request-scoped cancellation and deadlines
//!
//! A [`RequestContext`] travels with one insert/replace request. Clones share
//! the cancellation flag, so a handle kept by the request handler can stop a
//! counter allocation that is spinning on conflicts in another thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use strata_core::{StrataError, StrataResult};

/// Cancellation signal plus optional deadline for one request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Signal cancellation to every clone of this context
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` without a deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if the request was cancelled or its deadline has passed
    ///
    /// # Errors
    /// `Cancelled` takes precedence over `DeadlineExceeded`.
    pub fn check(&self) -> StrataResult<()> {
        if self.is_cancelled() {
            return Err(StrataError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StrataError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Shorten a backoff delay so it never sleeps past the deadline
    pub fn cap_delay(&self, delay: Duration) -> Duration {
        match self.remaining() {
            Some(left) => delay.min(left),
            None => delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_default_context_never_fails() {
        let ctx = RequestContext::new();
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_none());
        assert_eq!(ctx.cap_delay(Duration::from_secs(5)), Duration::from_secs(5));
    }

    #[test]
    fn test_cancel_is_shared_across_clones() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();
        thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.check(), Err(StrataError::Cancelled)));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = RequestContext::new().with_deadline(Instant::now());
        assert!(matches!(ctx.check(), Err(StrataError::DeadlineExceeded)));
        assert_eq!(ctx.cap_delay(Duration::from_millis(50)), Duration::ZERO);
    }

    #[test]
    fn test_cancel_wins_over_deadline() {
        let ctx = RequestContext::new().with_timeout(Duration::ZERO);
        ctx.cancel();
        assert!(matches!(ctx.check(), Err(StrataError::Cancelled)));
    }

    #[test]
    fn test_cap_delay_respects_remaining_time() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.cap_delay(Duration::from_millis(5)), Duration::from_millis(5));
        assert!(ctx.cap_delay(Duration::from_secs(3600)) <= Duration::from_secs(60));
    }
}
