//! Ordered failover between resolution strategies.
//!
//! A [`Failover`] holds a fixed list of [`Strategy`] values. [`Failover::run`]
//! awaits them one at a time, in order:
//!
//! - [`Outcome::Handled`] stops the run; later strategies are never started
//! - [`Outcome::Declined`] moves on to the next strategy
//! - [`Outcome::Failed`] and a panic inside the strategy are logged and
//!   treated as a decline
//!
//! When every strategy declines, the run ends with [`Exhausted`].
//!
//! Each strategy reports through its return value, so the completion signal
//! is delivered exactly once per attempt and no two strategies overlap.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;

/// Boxed error carried by [`Outcome::Failed`].
pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of one strategy attempt.
pub(crate) enum Outcome<T> {
    /// The strategy claims the request.
    Handled(T),
    /// Nothing applicable was found.
    Declined,
    /// The strategy hit an error; the engine treats it as a decline.
    Failed(BoxError),
}

impl<T> Outcome<T> {
    /// Wrap any error as [`Outcome::Failed`].
    pub(crate) fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }
}

/// One way of resolving a request.
pub(crate) trait Strategy<C: ?Sized, T>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to resolve the request described by `cx`.
    fn attempt<'a>(&'a self, cx: &'a C) -> BoxFuture<'a, Outcome<T>>;
}

/// The strategy that claimed a request and what it produced.
#[derive(Debug)]
pub(crate) struct Resolution<T> {
    /// Name of the winning strategy.
    pub(crate) strategy: &'static str,
    /// Zero-based position of the winning strategy.
    pub(crate) index: usize,
    /// Value returned by the strategy.
    pub(crate) value: T,
}

/// Every strategy declined.
#[derive(Debug, thiserror::Error)]
#[error("all {attempts} resolution strategies declined")]
pub(crate) struct Exhausted {
    /// Number of strategies that were tried.
    pub(crate) attempts: usize,
}

/// Fixed, ordered list of strategies.
pub(crate) struct Failover<C: ?Sized, T> {
    strategies: Vec<Box<dyn Strategy<C, T>>>,
}

impl<C: ?Sized + Sync, T: Send> Failover<C, T> {
    /// Create an empty failover chain.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the end of the chain.
    #[must_use]
    pub(crate) fn then(mut self, strategy: impl Strategy<C, T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies, in order.
    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// Run the strategies in order until one handles the request.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] if every strategy declined, failed or panicked.
    pub(crate) async fn run(&self, cx: &C) -> Result<Resolution<T>, Exhausted> {
        for (index, strategy) in self.strategies.iter().enumerate() {
            let name = strategy.name();
            let attempt = AssertUnwindSafe(strategy.attempt(cx)).catch_unwind().await;

            match attempt {
                Ok(Outcome::Handled(value)) => {
                    tracing::debug!(strategy = name, "Strategy handled request");
                    return Ok(Resolution {
                        strategy: name,
                        index,
                        value,
                    });
                }
                Ok(Outcome::Declined) => {
                    tracing::debug!(strategy = name, "Strategy declined");
                }
                Ok(Outcome::Failed(error)) => {
                    tracing::warn!(strategy = name, %error, "Strategy failed, trying next");
                }
                Err(_) => {
                    tracing::error!(strategy = name, "Strategy panicked, trying next");
                }
            }
        }

        Err(Exhausted {
            attempts: self.strategies.len(),
        })
    }
}
