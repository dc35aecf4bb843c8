#![allow(dead_code)]

use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use trigon::{
    Action, ActionConfig, Evaluate, Expr, ExprError, Handler, HandlerConfig, Resolver, Runner,
    Scope, Value, Values,
    mapping::ExprMapperFactory,
    testing::{FnExprFactory, StaticAction},
};

// ============================================================================
// Values
// ============================================================================

/// Builds a mapping from a `json!` object literal.
pub fn values(value: Value) -> Values {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

// ============================================================================
// Guards
// ============================================================================

/// A guard node that always fails to evaluate.
pub struct BrokenGuard {
    pub hits: Arc<AtomicUsize>,
}

impl Evaluate for BrokenGuard {
    fn init(&mut self, _resolver: &dyn Resolver, _root: bool) -> Result<(), ExprError> {
        Ok(())
    }

    fn eval(&self, _scope: &dyn Scope) -> Result<Value, ExprError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Err(ExprError::Other("guard exploded".into()))
    }
}

/// Guard sources used across the dispatch tests:
///
/// - `"true"`, `"false"`, `"nil"`, `"number"`: literal results
/// - `"error"`: evaluation fails
/// - `"uncompilable"`: compilation fails
/// - anything else: a payload reference
pub fn guards() -> FnExprFactory<impl Fn(&str) -> Result<Expr, ExprError> + Send + Sync> {
    FnExprFactory::new(|source| match source {
        "true" => Ok(Expr::literal(true)),
        "false" => Ok(Expr::literal(false)),
        "nil" => Ok(Expr::literal(Value::Null)),
        "number" => Ok(Expr::literal(7)),
        "error" => Ok(Expr::custom(BrokenGuard {
            hits: Arc::default(),
        })),
        "uncompilable" => Err(ExprError::InvalidReference {
            reference: source.to_string(),
            reason: "not an expression".into(),
        }),
        other => Ok(Expr::reference(other)),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// One action per declaration, named `a0`, `a1`, ...
pub fn actions_for(config: &HandlerConfig) -> Vec<Arc<dyn Action>> {
    (0..config.actions.len())
        .map(|i| StaticAction::new(format!("a{i}")).into_action())
        .collect()
}

/// A handler over `guards` (in order), with passthrough mapping.
pub fn guarded_handler(guards_in_order: &[Option<&str>], runner: impl Runner) -> Handler {
    let config = guards_in_order
        .iter()
        .fold(HandlerConfig::new("guarded"), |config, guard| {
            config.with_action(match guard {
                Some(source) => ActionConfig::new().when(*source),
                None => ActionConfig::new(),
            })
        });
    let actions = actions_for(&config);
    Handler::new(config, actions, &ExprMapperFactory::new(), &guards(), runner)
        .expect("handler should build")
}

/// A handler with a single unguarded action.
pub fn single_action_handler(
    config: ActionConfig,
    action: Arc<dyn Action>,
    runner: impl Runner,
) -> Handler {
    Handler::new(
        HandlerConfig::new("single").with_action(config),
        vec![action],
        &ExprMapperFactory::new(),
        &guards(),
        runner,
    )
    .expect("handler should build")
}

/// A sample order payload.
pub fn order() -> Values {
    values(json!({
        "order": { "id": 42, "total": "19.5" },
        "priority": true,
        "count": "3",
    }))
}
