//! # Dispatch Context
//!
//! Carries what an action invocation needs from its caller:
//!
//! - **Cancellation** - a [`CancellationToken`]; contexts derived from a parent
//!   are cancelled when the parent is.
//! - **Deadline** - an optional instant after which the invocation should give up.
//! - **Handler slot** - the configuration of the handler that selected the
//!   action, so the action layer can read handler name and settings without a
//!   global lookup.
//!
//! The dispatch core never waits on any of these itself; it only passes them
//! down to the [`Runner`](crate::Runner).

use crate::config::HandlerConfig;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio_util::sync::CancellationToken;

/// Cancellation, deadline and handler configuration for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
    handler: Option<Arc<HandlerConfig>>,
}

impl Context {
    /// A root context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root context cancelled through `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Sets a deadline, keeping the earlier one if a deadline is already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a child context: cancelled with this one, same deadline and handler.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
            handler: self.handler.clone(),
        }
    }

    /// Derives a child context carrying `config` in its handler slot.
    pub fn with_handler(&self, config: Arc<HandlerConfig>) -> Self {
        let mut child = self.child();
        child.handler = Some(config);
        child
    }

    /// The configuration of the handler that dispatched this invocation.
    pub fn handler(&self) -> Option<&HandlerConfig> {
        self.handler.as_deref()
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The cancellation token.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether this context was cancelled, directly or through a parent.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cancellation_propagates_to_children() {
        let root = Context::new();
        let child = root.with_handler(Arc::new(HandlerConfig::new("h")));

        assert!(!child.is_cancelled());
        root.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_does_not_reach_parent() {
        let root = Context::new();
        let child = root.child();
        child.cancel();
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_handler_slot() {
        let config = Arc::new(
            HandlerConfig::new("orders").with_setting("retries", 3),
        );
        let ctx = Context::new().with_handler(config);

        let handler = ctx.handler().unwrap();
        assert_eq!(handler.name, "orders");
        assert_eq!(handler.setting("retries"), Some(&json!(3)));
        assert!(Context::new().handler().is_none());
    }

    #[test]
    fn test_deadline_keeps_earliest() {
        let now = Instant::now();
        let ctx = Context::new()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(10));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
        assert_eq!(ctx.child().deadline(), ctx.deadline());
    }

    #[test]
    fn test_with_cancellation_shares_token() {
        let token = CancellationToken::new();
        let ctx = Context::with_cancellation(token.clone());

        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(ctx.child().is_cancelled());
    }
}
