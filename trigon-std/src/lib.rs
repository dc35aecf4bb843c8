//! # trigon-std
//!
//! Standard implementations for the Trigon trigger dispatch runtime.
//!
//! This crate provides:
//! - **Resolution**: [`ScopeResolver`](resolve::ScopeResolver) binding `$.path[0]` references
//! - **Expressions**: [`RefExprFactory`](factory::RefExprFactory) compiling reference guards
//! - **Mapping**: [`ExprMapper`](mapping::ExprMapper) and its factory
//! - **Runner wrappers**: Tracing, Deadline
//! - **Testing utilities**: fake runners, mappers, actions and counting expressions

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use trigon_core;

// Modules
pub mod factory;
pub mod mapping;
pub mod resolve;
pub mod runners;
pub mod testing;
