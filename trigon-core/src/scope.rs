//! Read-only evaluation scopes.

use crate::value::{Value, Values};
use std::{fmt, sync::Arc};

/// A read-only key/value view over one evaluation's data.
///
/// Lookups that miss locally may delegate to a parent scope.
pub trait Scope: Send + Sync {
    /// Looks up a top-level value by name.
    fn get_value(&self, name: &str) -> Option<&Value>;

    /// Copies every visible value, parent entries first, local entries last.
    fn snapshot(&self) -> Values;
}

/// A scope backed by an ordered map, optionally chained to a parent.
#[derive(Clone, Default)]
pub struct SimpleScope {
    values: Values,
    parent: Option<Arc<dyn Scope>>,
}

impl SimpleScope {
    /// Wraps `values`, delegating misses to `parent`.
    pub fn new(values: Values, parent: Option<Arc<dyn Scope>>) -> Self {
        Self { values, parent }
    }

    /// A scope with no values and no parent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The local values.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Consumes the scope, returning the local values.
    pub fn into_values(self) -> Values {
        self.values
    }
}

impl From<Values> for SimpleScope {
    fn from(values: Values) -> Self {
        Self::new(values, None)
    }
}

impl Scope for SimpleScope {
    fn get_value(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.get_value(name)))
    }

    fn snapshot(&self) -> Values {
        let mut all = self
            .parent
            .as_deref()
            .map(|p| p.snapshot())
            .unwrap_or_default();
        for (name, value) in &self.values {
            all.insert(name.clone(), value.clone());
        }
        all
    }
}

impl fmt::Debug for SimpleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleScope")
            .field("values", &self.values)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
