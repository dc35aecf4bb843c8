//! # trigon - Guarded Trigger-to-Action Dispatch
//!
//! A trigger delivers events; a [`Handler`] decides which action runs for
//! each one. Every configured action may carry a guard expression, an input
//! mapping and an output mapping. On each event the handler:
//!
//! 1. normalizes the payload into a mapping ([`TriggerData`]),
//! 2. picks the first action whose guard is true (an unguarded action
//!    always matches),
//! 3. builds the action input through the input mapper, or passes the
//!    payload through,
//! 4. coerces the fields the action declares in its [`IoMetadata`],
//! 5. hands the input to a [`Runner`] together with a context carrying the
//!    handler configuration,
//! 6. shapes the result through the output mapper, if any.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trigon::prelude::*;
//!
//! let trigger = TriggerConfig::from_json(include_str!("orders.json"))?;
//! let config = trigger.handler("on_order").cloned().unwrap();
//!
//! let handler = Handler::new(
//!     config,
//!     vec![ship, archive],
//!     &ExprMapperFactory::new(),
//!     &RefExprFactory::new(),
//!     TracingRunner::new(HttpRunner::default(), "http"),
//! )?;
//!
//! let result = handler.handle(&Context::new(), payload).await?;
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): debug logs for binding construction and action
//!   selection, and span instrumentation in [`runners::TracingRunner`].
//! - `timeout`: [`runners::DeadlineRunner`], which enforces context
//!   cancellation and deadlines on any runner.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod binding;
mod handler;

pub use binding::{ActionBinding, build_bindings};
pub use handler::Handler;

pub use trigon_core::{
    // Actions
    Action,
    ActionConfig,
    // Expressions
    BinaryExpr,
    BinaryOp,
    // Errors
    BoxError,
    BuildError,
    CoerceError,
    // Coercion
    Coercer,
    CompiledExpr,
    // Context
    Context,
    DispatchError,
    DynRunner,
    Evaluate,
    Expr,
    ExprError,
    ExprFactory,
    // Configuration
    HandlerConfig,
    IoMetadata,
    // Mapping
    Mapper,
    MapperFactory,
    Node,
    RefExpr,
    Resolution,
    Resolver,
    // Execution
    Runner,
    // Scopes
    Scope,
    SimpleScope,
    StandardCoercer,
    // Payloads
    StructValue,
    TernaryExpr,
    TriggerConfig,
    TriggerData,
    // Values
    Value,
    ValueType,
    Values,
    append_to_expr_list,
    eval_lr,
    new_expr_list,
    shape_of,
    to_bool,
    to_type,
};

/// Expression factories.
pub mod factory {
    pub use trigon_std::factory::RefExprFactory;
}

/// Expression-driven mappers.
pub mod mapping {
    pub use trigon_std::mapping::{ExprMapper, ExprMapperFactory, MappingError};
}

/// Path-based reference resolution.
pub mod resolve {
    pub use trigon_std::resolve::{PathResolution, ScopeResolver};
}

/// Runner wrappers.
pub mod runners {
    #![allow(clippy::wildcard_imports)]
    pub use trigon_std::runners::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use trigon_std::testing::*;
}

/// Prelude module - common imports for Trigon.
///
/// # Usage
///
/// ```rust,ignore
/// use trigon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, ActionConfig, BoxError, BuildError, Context, DispatchError, Expr, ExprFactory,
        Handler, HandlerConfig, IoMetadata, Mapper, MapperFactory, Runner, TriggerConfig,
        TriggerData, Value, ValueType, Values,
        factory::RefExprFactory,
        mapping::ExprMapperFactory,
        runners::TracingRunner,
    };
}
