//! Testing utilities for Trigon.
//!
//! This module provides deterministic fakes for the collaborators a handler
//! is built from, so dispatch can be tested without real conversion, mapping
//! or execution logic.
//!
//! # Features
//!
//! - [`StaticAction`]: An action with a fixed name and optional metadata
//! - [`EchoRunner`], [`RecordingRunner`], [`FailingRunner`]: Runner fakes
//! - [`IdentityMapper`], [`StaticMapper`], [`FailingMapper`]: Mapper fakes
//! - [`FnExprFactory`]: An expression factory backed by a closure
//! - [`CountingExpr`]: An expression node that counts its evaluations

use crate::resolve::ScopeResolver;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use trigon_core::{
    Action, BoxError, CompiledExpr, Context, Evaluate, Expr, ExprError, ExprFactory, IoMetadata,
    Mapper, Resolver, Runner, Scope, Value, ValueType, Values,
};

// ============================================================================
// Static Action
// ============================================================================

/// An action with a fixed name and optional I/O metadata.
///
/// # Example
///
/// ```rust,ignore
/// let action = StaticAction::new("ship")
///     .with_input("count", ValueType::Integer)
///     .into_action();
/// ```
#[derive(Debug, Clone)]
pub struct StaticAction {
    name: String,
    metadata: Option<IoMetadata>,
}

impl StaticAction {
    /// An action without metadata (input coercion disabled).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: None,
        }
    }

    /// Declares an input field, creating metadata if needed.
    pub fn with_input(mut self, field: impl Into<String>, ty: ValueType) -> Self {
        let metadata = self.metadata.take().unwrap_or_default();
        self.metadata = Some(metadata.input(field, ty));
        self
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: IoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Converts into a shared action handle.
    pub fn into_action(self) -> Arc<dyn Action> {
        Arc::new(self)
    }
}

impl Action for StaticAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn io_metadata(&self) -> Option<&IoMetadata> {
        self.metadata.as_ref()
    }
}

// ============================================================================
// Runners
// ============================================================================

/// A runner that returns its input as the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoRunner;

impl Runner for EchoRunner {
    async fn run_action(
        &self,
        _ctx: &Context,
        _action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        Ok(input)
    }
}

/// One call observed by a [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Name of the action that ran.
    pub action: String,
    /// Name of the dispatching handler, read from the context.
    pub handler: Option<String>,
    /// The input the action received.
    pub input: Values,
}

/// A runner that records every invocation.
///
/// Returns the configured output, or echoes its input if none is set.
///
/// # Example
///
/// ```rust,ignore
/// let runner = RecordingRunner::new();
/// let handler = Handler::new(config, actions, &mappers, &exprs, runner.clone())?;
///
/// handler.handle(&ctx, payload).await?;
///
/// assert_eq!(runner.invocations()[0].action, "ship");
/// ```
#[derive(Clone, Default)]
pub struct RecordingRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    output: Option<Values>,
}

impl RecordingRunner {
    /// A recording runner that echoes its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording runner that returns `output` for every call.
    pub fn with_output(output: Values) -> Self {
        Self {
            invocations: Arc::default(),
            output: Some(output),
        }
    }

    /// Get a clone of the recorded invocations.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of recorded invocations.
    pub fn count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Runner for RecordingRunner {
    async fn run_action(
        &self,
        ctx: &Context,
        action: &Arc<dyn Action>,
        input: Values,
    ) -> Result<Values, BoxError> {
        let output = self.output.clone().unwrap_or_else(|| input.clone());
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                action: action.name().to_string(),
                handler: ctx.handler().map(|h| h.name.clone()),
                input,
            });
        Ok(output)
    }
}

/// A runner that always fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingRunner {
    message: String,
}

impl FailingRunner {
    /// A runner failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Runner for FailingRunner {
    async fn run_action(
        &self,
        _ctx: &Context,
        _action: &Arc<dyn Action>,
        _input: Values,
    ) -> Result<Values, BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Mappers
// ============================================================================

/// A mapper that copies every visible scope value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl Mapper for IdentityMapper {
    fn apply(&self, scope: &dyn Scope) -> Result<Values, BoxError> {
        Ok(scope.snapshot())
    }
}

/// A mapper that ignores the scope and returns fixed values.
#[derive(Debug, Clone, Default)]
pub struct StaticMapper(pub Values);

impl Mapper for StaticMapper {
    fn apply(&self, _scope: &dyn Scope) -> Result<Values, BoxError> {
        Ok(self.0.clone())
    }
}

/// A mapper that always fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingMapper {
    message: String,
}

impl FailingMapper {
    /// A mapper failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Mapper for FailingMapper {
    fn apply(&self, _scope: &dyn Scope) -> Result<Values, BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression factory that builds trees with a closure and binds them
/// with [`ScopeResolver`].
///
/// # Example
///
/// ```rust,ignore
/// let exprs = FnExprFactory::new(|source| match source {
///     "yes" => Ok(Expr::literal(true)),
///     "no" => Ok(Expr::literal(false)),
///     other => Ok(Expr::reference(other)),
/// });
/// ```
pub struct FnExprFactory<F> {
    build: F,
}

impl<F> FnExprFactory<F>
where
    F: Fn(&str) -> Result<Expr, ExprError> + Send + Sync,
{
    /// Wraps a tree-building closure.
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> ExprFactory for FnExprFactory<F>
where
    F: Fn(&str) -> Result<Expr, ExprError> + Send + Sync,
{
    fn new_expr(&self, source: &str) -> Result<CompiledExpr, ExprError> {
        CompiledExpr::compile((self.build)(source)?, &ScopeResolver)
    }
}

/// An expression node that counts evaluations and returns a fixed value.
///
/// Take the [`counter`](CountingExpr::counter) before moving the node into a tree.
pub struct CountingExpr {
    hits: Arc<AtomicUsize>,
    result: Value,
}

impl CountingExpr {
    /// A node evaluating to `result`.
    pub fn returning(result: impl Into<Value>) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            result: result.into(),
        }
    }

    /// A shared handle to the evaluation count.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.hits)
    }
}

impl Evaluate for CountingExpr {
    fn init(&mut self, _resolver: &dyn Resolver, _root: bool) -> Result<(), ExprError> {
        Ok(())
    }

    fn eval(&self, _scope: &dyn Scope) -> Result<Value, ExprError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}
