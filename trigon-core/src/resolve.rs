//! Reference binding contracts.
//!
//! A [`Resolver`] is consulted once per reference while an expression is
//! being bound. The [`Resolution`] it returns is then used on every
//! evaluation, so reference strings are never re-parsed at eval time.

use crate::{error::ExprError, scope::Scope, value::Value};

/// A pre-bound accessor that fetches a value from any conforming scope.
pub trait Resolution: Send + Sync {
    /// Fetches the bound value from `scope`.
    fn get_value(&self, scope: &dyn Scope) -> Result<Value, ExprError>;
}

/// Binds reference strings into [`Resolution`]s.
pub trait Resolver: Send + Sync {
    /// Binds `reference`, failing if it is unknown or malformed.
    fn get_resolution(&self, reference: &str) -> Result<Box<dyn Resolution>, ExprError>;
}

// Blanket impl for closures
impl<F> Resolution for F
where
    F: Fn(&dyn Scope) -> Result<Value, ExprError> + Send + Sync,
{
    fn get_value(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        (self)(scope)
    }
}
