//! Data mapper contracts.

use crate::{error::BoxError, scope::Scope, value::Values};
use std::sync::Arc;

/// Turns one scope's values into a new mapping per a declared transformation.
pub trait Mapper: Send + Sync {
    /// Applies the mapping to `scope`.
    fn apply(&self, scope: &dyn Scope) -> Result<Values, BoxError>;
}

/// Compiles mapping declarations into [`Mapper`]s.
pub trait MapperFactory: Send + Sync {
    /// Compiles `mappings`, failing if any entry cannot be compiled.
    fn new_mapper(&self, mappings: &Values) -> Result<Arc<dyn Mapper>, BoxError>;
}

// Blanket impl for closures
impl<F> Mapper for F
where
    F: Fn(&dyn Scope) -> Result<Values, BoxError> + Send + Sync,
{
    fn apply(&self, scope: &dyn Scope) -> Result<Values, BoxError> {
        (self)(scope)
    }
}
