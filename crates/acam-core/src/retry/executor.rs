//! Retry execution engine

use std::future::Future;
use std::time::Instant;

use crate::types::RetryPolicy;

use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::{calculate_delay, AlwaysRetry, RetryPredicate};

/// A retry executor with configurable policy, predicate, and observer
///
/// ```rust
/// use acam_core::retry::{RetryExecutor, TracingObserver};
/// use acam_core::types::RetryPolicy;
///
/// let executor = RetryExecutor::new(RetryPolicy::default())
///     .with_observer(TracingObserver::new("load"))
///     .with_jitter(false);
/// ```
pub struct RetryExecutor<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    jitter: bool,
}

impl RetryExecutor<AlwaysRetry, NoOpObserver> {
    /// Create an executor that retries every error, without observation
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            predicate: AlwaysRetry,
            observer: NoOpObserver,
            jitter: true,
        }
    }
}

impl<P, O> RetryExecutor<P, O> {
    /// Set the retry predicate
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutor<P2, O> {
        RetryExecutor {
            policy: self.policy,
            predicate,
            observer: self.observer,
            jitter: self.jitter,
        }
    }

    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutor<P, O2> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            jitter: self.jitter,
        }
    }

    /// Enable or disable jitter (enabled by default)
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P, O> RetryExecutor<P, O>
where
    O: RetryObserver,
{
    /// Execute an operation with retry logic
    ///
    /// A policy with `max_attempts == 0` still makes one attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + Send + 'static,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if !self.predicate.should_retry(&err) {
                        self.observer.on_rejected(attempt, &err);
                        return Err(RetryError::NonRetryable(err));
                    }

                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: err,
                            total_duration: start.elapsed(),
                        });
                    }

                    let delay = calculate_delay(&self.policy, attempt, self.jitter);
                    self.observer.on_attempt_failed(attempt, &err, delay);

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
