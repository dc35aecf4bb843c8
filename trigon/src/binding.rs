//! Action bindings.
//!
//! A binding pairs an action with the guard that selects it and the mappers
//! that shape its input and output. Bindings are compiled once, when the
//! handler is built, and are read-only afterwards.

use std::{fmt, sync::Arc};
use trigon_core::{
    Action, BuildError, CompiledExpr, DispatchError, ExprFactory, HandlerConfig, Mapper,
    MapperFactory, Scope, Value,
};

/// An action together with its compiled guard and mappers.
pub struct ActionBinding {
    action: Arc<dyn Action>,
    guard: Option<CompiledExpr>,
    input_mapper: Option<Arc<dyn Mapper>>,
    output_mapper: Option<Arc<dyn Mapper>>,
}

impl ActionBinding {
    /// The bound action.
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    /// The compiled guard. `None` matches every event.
    pub fn guard(&self) -> Option<&CompiledExpr> {
        self.guard.as_ref()
    }

    /// The input mapper, if the action declares one.
    pub fn input_mapper(&self) -> Option<&Arc<dyn Mapper>> {
        self.input_mapper.as_ref()
    }

    /// The output mapper, if the action declares one.
    pub fn output_mapper(&self) -> Option<&Arc<dyn Mapper>> {
        self.output_mapper.as_ref()
    }

    /// Evaluates the guard against `scope`.
    ///
    /// A binding without a guard always matches. A guard must produce a
    /// boolean; null and any other shape are errors.
    pub fn matches(&self, scope: &dyn Scope) -> Result<bool, DispatchError> {
        let Some(guard) = &self.guard else {
            return Ok(true);
        };
        match guard.eval(scope)? {
            Value::Bool(matched) => Ok(matched),
            Value::Null => Err(DispatchError::NilResult),
            _ => Err(DispatchError::NonBoolResult),
        }
    }
}

impl fmt::Debug for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBinding")
            .field("action", &self.action.name())
            .field("guard", &self.guard)
            .field("input_mapper", &self.input_mapper.is_some())
            .field("output_mapper", &self.output_mapper.is_some())
            .finish()
    }
}

/// Builds one binding per configured action, in configuration order.
///
/// `actions` must line up with `config.actions`. The first compile failure
/// aborts the build and is returned unchanged.
pub fn build_bindings(
    config: &HandlerConfig,
    actions: Vec<Arc<dyn Action>>,
    mappers: &dyn MapperFactory,
    exprs: &dyn ExprFactory,
) -> Result<Vec<ActionBinding>, BuildError> {
    if config.actions.len() != actions.len() {
        return Err(BuildError::ActionCountMismatch {
            handler: config.name.clone(),
            configured: config.actions.len(),
            provided: actions.len(),
        });
    }

    config
        .actions
        .iter()
        .zip(actions)
        .map(|(declared, action)| {
            let guard = declared
                .guard()
                .map(|source| exprs.new_expr(source))
                .transpose()?;
            let input_mapper = (!declared.input.is_empty())
                .then(|| mappers.new_mapper(&declared.input))
                .transpose()
                .map_err(BuildError::Mapper)?;
            let output_mapper = (!declared.output.is_empty())
                .then(|| mappers.new_mapper(&declared.output))
                .transpose()
                .map_err(BuildError::Mapper)?;

            Ok(ActionBinding {
                action,
                guard,
                input_mapper,
                output_mapper,
            })
        })
        .collect()
}
