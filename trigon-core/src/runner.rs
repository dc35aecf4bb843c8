//! # Execution Boundary (Runner)
//!
//! The runner actually performs a selected action's work. It is opaque to the
//! dispatch core and may suspend for as long as it likes; it must honor the
//! cancellation and deadline carried by the [`Context`] it receives.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Runner`] uses native `async fn` for zero-cost static dispatch. Handlers
//! store runners as [`DynRunner`] trait objects; every `Runner` is a
//! `DynRunner` through a blanket impl.

use crate::{action::Action, context::Context, error::BoxError, value::Values};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// Executes one action given a context and an input mapping.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Runner`",
    label = "missing `Runner` implementation",
    note = "Runners must implement `run_action`."
)]
pub trait Runner: Send + Sync + 'static {
    /// Runs `action` with `input`, returning its result mapping.
    fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> impl Future<Output = Result<Values, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Runner`].
pub trait DynRunner: Send + Sync + 'static {
    /// Runs `action` with `input` (dynamic dispatch version).
    fn run_action_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        action: &'a Arc<dyn Action>,
        input: Values,
    ) -> BoxFuture<'a, Result<Values, BoxError>>;
}

// Blanket implementation: Any type implementing Runner implements DynRunner automatically.
impl<T: Runner> DynRunner for T {
    fn run_action_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        action: &'a Arc<dyn Action>,
        input: Values,
    ) -> BoxFuture<'a, Result<Values, BoxError>> {
        Box::pin(self.run_action(ctx, action, input))
    }
}

// Allow shared DynRunner handles to be used where Runner is expected.
impl Runner for Arc<dyn DynRunner> {
    async fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        (**self).run_action_dyn(ctx, action, input).await
    }
}
