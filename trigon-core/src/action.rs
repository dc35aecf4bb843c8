//! Action contracts.

use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared input and output shape of an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoMetadata {
    /// Input field name to declared type.
    #[serde(default)]
    pub input: BTreeMap<String, ValueType>,
    /// Output field name to declared type.
    #[serde(default)]
    pub output: BTreeMap<String, ValueType>,
}

impl IoMetadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an input field.
    pub fn input(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.input.insert(name.into(), ty);
        self
    }

    /// Declares an output field.
    pub fn output(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.output.insert(name.into(), ty);
        self
    }
}

/// A unit of work a handler routes events to.
///
/// Actions are built outside the handler and executed by a [`Runner`];
/// the handler only reads their metadata.
///
/// [`Runner`]: crate::Runner
pub trait Action: Send + Sync + 'static {
    /// A name identifying the action, for diagnostics.
    fn name(&self) -> &str;

    /// Declared input/output shape. `None` disables input coercion.
    fn io_metadata(&self) -> Option<&IoMetadata>;
}
