//! Retry execution engine with policy-based configuration
//!
//! Wraps fallible async operations (artifact copies, component loads) in a
//! bounded retry loop driven by a [`RetryPolicy`](crate::types::RetryPolicy).
//!
//! ```rust,no_run
//! use acam_core::retry::{RetryExecutor, TracingObserver, TransientIo};
//! use acam_core::types::RetryPolicy;
//!
//! async fn example() -> Result<u64, acam_core::retry::RetryError<std::io::Error>> {
//!     RetryExecutor::new(RetryPolicy::default())
//!         .with_predicate(TransientIo)
//!         .with_observer(TracingObserver::new("copy ACAM.dll"))
//!         .execute(|| tokio::fs::copy("a", "b"))
//!         .await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod strategies;

pub use error::RetryError;
pub use executor::RetryExecutor;
pub use observer::{NoOpObserver, RetryObserver, TracingObserver};
pub use strategies::{calculate_delay, AlwaysRetry, ClosurePredicate, RetryPredicate, TransientIo};
