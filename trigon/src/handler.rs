//! Trigger handler dispatch.

use crate::binding::{ActionBinding, build_bindings};
use std::{fmt, sync::Arc};
use trigon_core::{
    Action, BuildError, Coercer, Context, DispatchError, DynRunner, ExprFactory, HandlerConfig,
    MapperFactory, Runner, Scope, SimpleScope, StandardCoercer, TriggerData, Value, Values,
};

/// Routes trigger events to the first action whose guard matches.
///
/// A handler is built once from its configuration and is then shared by
/// every event the trigger delivers. [`Handler::handle`] takes `&self` and
/// keeps no state between calls, so concurrent dispatch needs no locking.
///
/// # Example
///
/// ```rust,ignore
/// let handler = Handler::new(
///     config,
///     vec![ship, archive],
///     &ExprMapperFactory::new(),
///     &RefExprFactory::new(),
///     HttpRunner::default(),
/// )?;
///
/// let result = handler.handle(&Context::new(), payload).await?;
/// ```
pub struct Handler {
    config: Arc<HandlerConfig>,
    bindings: Vec<ActionBinding>,
    runner: Arc<dyn DynRunner>,
    coercer: Arc<dyn Coercer>,
}

impl Handler {
    /// Compiles the bindings for `config` and `actions`.
    ///
    /// `actions` must list one handle per configured action, in the same
    /// order. Any guard or mapper compile failure aborts construction.
    pub fn new(
        config: impl Into<Arc<HandlerConfig>>,
        actions: Vec<Arc<dyn Action>>,
        mappers: &dyn MapperFactory,
        exprs: &dyn ExprFactory,
        runner: impl Runner,
    ) -> Result<Self, BuildError> {
        let config = config.into();
        let bindings = build_bindings(&config, actions, mappers, exprs)?;

        #[cfg(feature = "tracing")]
        for (index, binding) in bindings.iter().enumerate() {
            tracing::debug!(
                handler = %config.name,
                index,
                action = %binding.action().name(),
                guarded = binding.guard().is_some(),
                input_mapper = binding.input_mapper().is_some(),
                output_mapper = binding.output_mapper().is_some(),
                "bound action"
            );
        }

        Ok(Self {
            config,
            bindings,
            runner: Arc::new(runner),
            coercer: Arc::new(StandardCoercer),
        })
    }

    /// Replaces the coercer applied to declared input fields.
    pub fn with_coercer(mut self, coercer: impl Coercer + 'static) -> Self {
        self.coercer = Arc::new(coercer);
        self
    }

    /// The handler name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The handler's own settings, without the parent fallback.
    pub fn settings(&self) -> &Values {
        &self.config.settings
    }

    /// Looks up a setting, falling back to the parent trigger's settings.
    pub fn get_setting(&self, name: &str) -> Option<&Value> {
        self.config.setting(name)
    }

    /// The handler configuration.
    pub fn config(&self) -> &Arc<HandlerConfig> {
        &self.config
    }

    /// The compiled bindings, in configuration order.
    pub fn bindings(&self) -> &[ActionBinding] {
        &self.bindings
    }

    /// Dispatches one trigger event.
    ///
    /// The payload is consumed. When the selected action has no input
    /// mapper, the payload mapping itself becomes the action input and is
    /// coerced in place; callers that still need the original must pass a
    /// clone.
    pub async fn handle(
        &self,
        ctx: &Context,
        data: impl Into<TriggerData>,
    ) -> Result<Values, DispatchError> {
        let scope = SimpleScope::from(data.into().into_values()?);
        let binding = self.select(&scope)?;

        let mut input = match binding.input_mapper() {
            Some(mapper) => mapper.apply(&scope).map_err(DispatchError::Mapping)?,
            None => scope.into_values(),
        };
        self.coerce_inputs(binding, &mut input)?;

        let ctx = ctx.with_handler(Arc::clone(&self.config));
        let results = self
            .runner
            .run_action_dyn(&ctx, binding.action(), input)
            .await
            .map_err(DispatchError::Runner)?;

        match binding.output_mapper() {
            Some(mapper) => mapper
                .apply(&SimpleScope::from(results))
                .map_err(DispatchError::Mapping),
            None => Ok(results),
        }
    }

    fn select(&self, scope: &dyn Scope) -> Result<&ActionBinding, DispatchError> {
        for binding in &self.bindings {
            if binding.matches(scope)? {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    handler = %self.config.name,
                    action = %binding.action().name(),
                    "selected action"
                );
                return Ok(binding);
            }
        }
        Err(DispatchError::NoAction)
    }

    fn coerce_inputs(
        &self,
        binding: &ActionBinding,
        input: &mut Values,
    ) -> Result<(), DispatchError> {
        let Some(metadata) = binding.action().io_metadata() else {
            return Ok(());
        };
        for (field, ty) in &metadata.input {
            if let Some(slot) = input.get_mut(field) {
                *slot = self
                    .coercer
                    .coerce(slot.take(), *ty)
                    .map_err(|source| DispatchError::Coercion {
                        field: field.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", self.config.name)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.config.name)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}
