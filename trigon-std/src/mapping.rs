//! Expression-driven mappers.
//!
//! A mapping declaration is an object whose keys name output fields. Each
//! value is either a literal, copied as-is, or a string starting with `=`
//! whose remainder is compiled as an expression:
//!
//! ```json
//! { "id": "=$.order.id", "source": "webhook", "retries": 3 }
//! ```

use crate::factory::RefExprFactory;
use std::sync::Arc;
use thiserror::Error;
use trigon_core::{
    BoxError, CompiledExpr, ExprError, ExprFactory, Mapper, MapperFactory, Scope, Value, Values,
};

/// A mapping entry failed to compile or evaluate.
#[derive(Error, Debug)]
#[error("mapping '{field}' failed: {source}")]
pub struct MappingError {
    /// The output field being mapped.
    pub field: String,
    /// The expression failure.
    #[source]
    pub source: ExprError,
}

enum Entry {
    Literal(Value),
    Expr(CompiledExpr),
}

/// A compiled mapping declaration.
pub struct ExprMapper {
    entries: Vec<(String, Entry)>,
}

impl ExprMapper {
    /// Compiles every `=`-prefixed entry of `mappings` through `exprs`.
    pub fn compile(mappings: &Values, exprs: &dyn ExprFactory) -> Result<Self, MappingError> {
        let entries = mappings
            .iter()
            .map(|(field, value)| {
                let entry = match value.as_str().and_then(|s| s.strip_prefix('=')) {
                    Some(source) => Entry::Expr(exprs.new_expr(source).map_err(|source| {
                        MappingError {
                            field: field.clone(),
                            source,
                        }
                    })?),
                    None => Entry::Literal(value.clone()),
                };
                Ok((field.clone(), entry))
            })
            .collect::<Result<Vec<_>, MappingError>>()?;
        Ok(Self { entries })
    }

    /// Number of output fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping produces no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Mapper for ExprMapper {
    fn apply(&self, scope: &dyn Scope) -> Result<Values, BoxError> {
        let mut output = Values::new();
        for (field, entry) in &self.entries {
            let value = match entry {
                Entry::Literal(value) => value.clone(),
                Entry::Expr(expr) => expr.eval(scope).map_err(|source| MappingError {
                    field: field.clone(),
                    source,
                })?,
            };
            output.insert(field.clone(), value);
        }
        Ok(output)
    }
}

/// Builds [`ExprMapper`]s, compiling expressions through `F`.
#[derive(Debug, Clone, Default)]
pub struct ExprMapperFactory<F = RefExprFactory> {
    exprs: F,
}

impl ExprMapperFactory {
    /// A factory compiling expressions with [`RefExprFactory`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: ExprFactory> ExprMapperFactory<F> {
    /// A factory compiling expressions with `exprs`.
    pub fn with_exprs(exprs: F) -> Self {
        Self { exprs }
    }
}

impl<F: ExprFactory> MapperFactory for ExprMapperFactory<F> {
    fn new_mapper(&self, mappings: &Values) -> Result<Arc<dyn Mapper>, BoxError> {
        Ok(Arc::new(ExprMapper::compile(mappings, &self.exprs)?))
    }
}
