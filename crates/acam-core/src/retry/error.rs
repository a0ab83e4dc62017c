//! Error types for the retry execution engine

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during retry execution
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// All attempts failed
    #[error(
        "retry exhausted after {attempts} attempts over {:.2}s: {source}",
        .total_duration.as_secs_f64()
    )]
    Exhausted {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The error from the final attempt
        source: E,
        /// Total duration spent across all attempts
        total_duration: Duration,
    },

    /// The predicate rejected the error, so no further attempts were made
    #[error("non-retryable error: {0}")]
    NonRetryable(#[source] E),
}

impl<E> RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// Get the underlying error from the last attempt
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { source, .. } => source,
            Self::NonRetryable(source) => source,
        }
    }

    /// Borrow the underlying error from the last attempt
    pub fn inner(&self) -> &E {
        match self {
            Self::Exhausted { source, .. } => source,
            Self::NonRetryable(source) => source,
        }
    }

    /// Number of attempts that were made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            Self::NonRetryable(_) => 1,
        }
    }
}
