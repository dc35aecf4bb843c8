//! Expression factories.

use crate::resolve::ScopeResolver;
use trigon_core::{CompiledExpr, Expr, ExprError, ExprFactory, Resolver};

/// Compiles source text as a single reference expression.
///
/// Suited to guards that read a boolean straight out of the payload
/// (`"$.priority"`) and to mapping entries that copy a value across.
#[derive(Debug, Clone, Default)]
pub struct RefExprFactory<R = ScopeResolver> {
    resolver: R,
}

impl RefExprFactory {
    /// A factory binding references with [`ScopeResolver`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Resolver> RefExprFactory<R> {
    /// A factory binding references with `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: Resolver> ExprFactory for RefExprFactory<R> {
    fn new_expr(&self, source: &str) -> Result<CompiledExpr, ExprError> {
        CompiledExpr::compile(Expr::reference(source), &self.resolver)
    }
}
