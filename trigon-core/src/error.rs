//! Error types for Trigon.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ExprError`] - Errors binding or evaluating an expression
//! - [`CoerceError`] - A value could not be converted to a declared type
//! - [`BuildError`] - Errors constructing a handler from its configuration
//! - [`DispatchError`] - Errors terminating a single `Handle` call
//!
//! Collaborator failures (mappers, runners, custom resolutions) travel as
//! [`BoxError`] and are carried through without re-wrapping their message.

use crate::value::{Value, ValueType};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A value could not be converted to the requested type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unable to coerce {value} to {target}")]
pub struct CoerceError {
    /// The value that failed to convert.
    pub value: Value,
    /// The requested type.
    pub target: ValueType,
}

impl CoerceError {
    pub(crate) fn new(value: Value, target: ValueType) -> Self {
        Self { value, target }
    }
}

/// Errors that can occur while binding or evaluating an expression.
#[derive(Error, Debug)]
pub enum ExprError {
    /// A reference node was evaluated before `init` bound it.
    #[error("reference '{0}' evaluated before it was resolved")]
    Unresolved(String),

    /// The scope holds no value for the referenced name.
    #[error("unknown reference: {0}")]
    UnknownReference(String),

    /// The resolver could not bind a reference string.
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// The reference as written.
        reference: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A list builder received something other than what it builds from.
    #[error("invalid expression list type; expected {expected}, got {got}")]
    InvalidList {
        /// The accepted shape.
        expected: &'static str,
        /// The shape actually received.
        got: &'static str,
    },

    /// An operand could not be coerced.
    #[error(transparent)]
    Coerce(#[from] CoerceError),

    /// An operator does not apply to the operand shapes.
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        /// The operator symbol.
        op: &'static str,
        /// Shape of the left operand.
        left: &'static str,
        /// Shape of the right operand.
        right: &'static str,
    },

    /// A failure raised by an external resolution or compiler.
    #[error(transparent)]
    Other(BoxError),
}

/// Errors that can occur while constructing a handler.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The configuration and the supplied actions disagree in length.
    #[error("handler '{handler}' configures {configured} actions but {provided} were provided")]
    ActionCountMismatch {
        /// Handler name.
        handler: String,
        /// Actions listed in the configuration.
        configured: usize,
        /// Action handles supplied by the caller.
        provided: usize,
    },

    /// A guard expression failed to compile.
    #[error(transparent)]
    Guard(#[from] ExprError),

    /// A mapping declaration failed to compile.
    #[error(transparent)]
    Mapper(BoxError),
}

/// Errors that terminate a single dispatch.
///
/// Nothing is retried; every variant aborts the current `Handle` call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The payload is not empty, not a mapping and not a struct value.
    #[error("unsupported trigger data: {0}")]
    UnsupportedTriggerData(String),

    /// Evaluating a guard failed.
    #[error(transparent)]
    Guard(#[from] ExprError),

    /// A guard evaluated to null.
    #[error("expression has nil result")]
    NilResult,

    /// A guard evaluated to something other than a boolean.
    #[error("expression has a non-bool result")]
    NonBoolResult,

    /// No binding matched the event.
    #[error("no action to execute")]
    NoAction,

    /// An input or output mapper failed.
    #[error(transparent)]
    Mapping(BoxError),

    /// A declared input field could not be converted.
    #[error("unable to coerce input '{field}': {source}")]
    Coercion {
        /// The declared field name.
        field: String,
        /// The underlying conversion failure.
        #[source]
        source: CoerceError,
    },

    /// The runner failed.
    #[error(transparent)]
    Runner(BoxError),
}

impl DispatchError {
    /// Returns the runner's own error if the runner is what failed.
    pub fn into_runner_error(self) -> Option<BoxError> {
        match self {
            DispatchError::Runner(err) => Some(err),
            _ => None,
        }
    }
}
