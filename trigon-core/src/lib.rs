//! # trigon-core
//!
//! Core contracts for the Trigon trigger dispatch runtime.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! collaborators (resolvers, mappers, runners, actions) that don't need the
//! full `trigon-std` implementation.
//!
//! # Two Subsystems
//!
//! ## Expression Tree ([`Expr`])
//!
//! A compiled micro-expression language evaluated against a [`Scope`].
//! Every node goes through two phases:
//!
//! - **Bind** ([`Evaluate::init`]): references are resolved once against a
//!   [`Resolver`], producing opaque [`Resolution`]s.
//! - **Run** ([`Evaluate::eval`]): the resolved tree is evaluated any number of
//!   times, concurrently, against per-event scopes.
//!
//! [`CompiledExpr`] is the only form that leaves the bind phase, so code holding
//! one never sees an unresolved reference.
//!
//! ## Dispatch Contracts
//!
//! The collaborators a trigger handler routes through:
//!
//! - [`Mapper`] / [`MapperFactory`] - input and output data transformation
//! - [`Action`] / [`IoMetadata`] - the routed-to unit and its declared input shape
//! - [`Runner`] / [`DynRunner`] - the external execution boundary
//! - [`Coercer`] - value conversion for declared input fields
//! - [`TriggerData`] - the inbound payload shapes a handler accepts
//! - [`Context`] - cancellation, deadline and handler configuration slot
//!
//! # Error Types
//!
//! - [`ExprError`] - Resolution and evaluation errors
//! - [`CoerceError`] - Value conversion errors
//! - [`BuildError`] - Handler construction errors
//! - [`DispatchError`] - Errors terminating a single dispatch

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod coerce;
mod config;
mod context;
mod error;
mod expr;
mod mapper;
mod payload;
mod resolve;
mod runner;
mod scope;
mod value;

// Re-exports
pub use action::{Action, IoMetadata};
pub use coerce::{Coercer, StandardCoercer, to_bool, to_type};
pub use config::{ActionConfig, HandlerConfig, TriggerConfig};
pub use context::Context;
pub use error::{BoxError, BuildError, CoerceError, DispatchError, ExprError};
pub use expr::{
    BinaryExpr, BinaryOp, CompiledExpr, Evaluate, Expr, ExprFactory, Node, RefExpr, TernaryExpr,
    append_to_expr_list, eval_lr, new_expr_list,
};
pub use mapper::{Mapper, MapperFactory};
pub use payload::{StructValue, TriggerData};
pub use resolve::{Resolution, Resolver};
pub use runner::{DynRunner, Runner};
pub use scope::{Scope, SimpleScope};
pub use value::{Value, ValueType, Values, shape_of};
