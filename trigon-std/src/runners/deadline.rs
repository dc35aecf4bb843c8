//! Deadline Runner - Context-bounded execution wrapper.
//!
//! **Note**: This module requires the `tokio` runtime.

use std::sync::Arc;
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use trigon_core::{Action, BoxError, Context, Runner, Values};

/// Error returned when an invocation is cut short by its context.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerError {
    /// The context was cancelled.
    #[error("action was cancelled")]
    Cancelled,
    /// The context's deadline passed.
    #[error("action exceeded its deadline")]
    DeadlineExceeded,
}

/// A Runner that races the inner runner against the context.
///
/// The inner future is dropped as soon as the context is cancelled or its
/// deadline passes. A context that is already cancelled never reaches the
/// inner runner.
///
/// # Example
///
/// ```rust,ignore
/// use trigon_std::runners::DeadlineRunner;
///
/// let runner = DeadlineRunner::new(HttpRunner::default());
/// let ctx = Context::new().with_timeout(Duration::from_secs(5));
/// handler.handle(&ctx, payload).await?;
/// ```
pub struct DeadlineRunner<R> {
    inner: R,
}

impl<R> DeadlineRunner<R> {
    /// Create a new `DeadlineRunner` wrapping the given runner.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner runner.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Runner> Runner for DeadlineRunner<R> {
    async fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        if ctx.is_cancelled() {
            return Err(Box::new(RunnerError::Cancelled));
        }

        let token = ctx.cancellation_token();
        let run = async {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(Box::new(RunnerError::Cancelled) as BoxError),
                result = self.inner.run_action(ctx, action, input) => result,
            }
        };

        match ctx.deadline() {
            Some(deadline) => timeout_at(Instant::from_std(deadline), run)
                .await
                .unwrap_or_else(|_| Err(Box::new(RunnerError::DeadlineExceeded) as BoxError)),
            None => run.await,
        }
    }
}
