//! Transaction configuration and retry logic
//!
//! Contains RetryConfig for transaction retry behavior and the generic
//! retry loop used by counter allocation and document writes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use strata_core::{StrataError, StrataResult};

use crate::context::RequestContext;
use crate::transaction_ops::{StoreTransaction, TransactionalStore};

// ============================================================================
// Retry Configuration
// ============================================================================

/// Configuration for transaction retry behavior
///
/// Only commit-time conflicts are retried. The defaults suit short, hot
/// transactions such as counter increments: many attempts, small delays.
///
/// # Example
/// ```
/// use strata_engine::RetryConfig;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_base_delay_ms(10)
///     .with_max_delay_ms(200);
/// assert_eq!(config.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries)
    pub max_retries: usize,
    /// Base delay between retries in milliseconds (exponential backoff)
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 64,
            base_delay_ms: 1,
            max_delay_ms: 50,
        }
    }
}

impl RetryConfig {
    /// Create a new RetryConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RetryConfig with no retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set maximum number of retries
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set base delay for exponential backoff
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set maximum delay between retries
    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Reject settings where the cap is below the base delay
    pub fn validate(&self) -> StrataResult<()> {
        if self.max_delay_ms < self.base_delay_ms {
            return Err(StrataError::invalid_input(format!(
                "max_delay_ms ({}) must be >= base_delay_ms ({})",
                self.max_delay_ms, self.base_delay_ms
            )));
        }
        Ok(())
    }

    /// Calculate delay for a given attempt (exponential backoff)
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        // Cap the shift to prevent overflow (1 << 63 is the max for u64)
        let shift = attempt.min(63);
        let multiplier = 1u64 << shift;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

// ============================================================================
// Retry loop
// ============================================================================

/// Run `f` in a fresh transaction, retrying on commit conflicts
///
/// Each attempt begins a new transaction, so `f` observes the state left by
/// whichever transaction won the previous race. An error returned by `f`
/// rolls the transaction back and is surfaced unchanged; only a `Conflict`
/// from commit is retried.
///
/// The context is checked before every attempt, before commit, and before
/// each backoff sleep. Sleeps never extend past the context's deadline.
///
/// # Errors
/// - `RetryExhausted` once `config.max_retries` retries have all conflicted
/// - `Cancelled` / `DeadlineExceeded` from the context
/// - any error from `f`, `begin`, or a non-conflict commit failure
pub fn transaction_with_retry<S, F, T>(
    store: &S,
    ctx: &RequestContext,
    config: &RetryConfig,
    mut f: F,
) -> StrataResult<T>
where
    S: TransactionalStore + ?Sized,
    F: FnMut(&mut dyn StoreTransaction) -> StrataResult<T>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if let Err(e) = ctx.check() {
            warn!(attempt, error = %e, "Transaction retry loop aborted");
            return Err(e);
        }

        let mut txn = store.begin()?;
        let value = match f(txn.as_mut()) {
            Ok(value) => value,
            Err(e) => {
                txn.rollback();
                return Err(e);
            }
        };

        if let Err(e) = ctx.check() {
            txn.rollback();
            warn!(attempt, error = %e, "Transaction retry loop aborted before commit");
            return Err(e);
        }

        match txn.commit() {
            Ok(_) => return Ok(value),
            Err(e) if e.is_conflict() => {
                if attempt < config.max_retries {
                    let delay = ctx.cap_delay(config.calculate_delay(attempt));
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Transaction conflict, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    let attempts = config.max_retries + 1;
    warn!(attempts, "Transaction retries exhausted");
    Err(StrataError::RetryExhausted {
        attempts,
        last_error: Box::new(last_error.unwrap_or_else(|| {
            StrataError::internal("retry loop exited without an attempt".to_string())
        })),
    })
}
