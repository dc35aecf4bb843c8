use std::sync::Arc;
use trigon_core::{Action, BoxError, Context, Runner, Values};

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// A Runner wrapper that instruments execution with a `tracing` Span.
///
/// The span records the handler that dispatched the action (read from the
/// context's handler slot) and the action name. Outcomes are logged at
/// `debug` inside the span; errors are passed through unchanged.
pub struct TracingRunner<R> {
    inner: R,
    name: &'static str,
}

impl<R> TracingRunner<R> {
    /// Create a new `TracingRunner` wrapper around a runner.
    pub const fn new(inner: R, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// Get a reference to the inner runner.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Clone> Clone for TracingRunner<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<R: Runner> Runner for TracingRunner<R> {
    #[cfg(feature = "tracing")]
    async fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        let span = tracing::info_span!(
            "run_action",
            runner = %self.name,
            handler = ctx.handler().map_or("", |h| h.name.as_str()),
            action = %action.name(),
            inputs = input.len(),
        );

        async move {
            let result = self.inner.run_action(ctx, action, input).await;
            match &result {
                Ok(output) => tracing::debug!(outputs = output.len(), "action completed"),
                Err(error) => tracing::debug!(%error, "action failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    #[cfg(not(feature = "tracing"))]
    async fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        self.inner.run_action(ctx, action, input).await
    }
}
