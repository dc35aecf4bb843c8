//! # Expression Tree
//!
//! Composable expression nodes with a two-phase lifecycle:
//!
//! 1. **Bind** - [`Evaluate::init`] walks the tree once, asking a [`Resolver`]
//!    to bind every reference. Must complete before the tree is shared.
//! 2. **Run** - [`Evaluate::eval`] reads the bound tree against a [`Scope`].
//!    The tree is immutable during this phase, so any number of callers may
//!    evaluate it concurrently.
//!
//! [`CompiledExpr`] is produced only by a successful bind of a root node and
//! is what handlers hold on to.
//!
//! Node kinds form a closed set ([`Expr`]); new kinds plug in through
//! [`Expr::Custom`] by implementing [`Evaluate`].

use crate::{
    coerce::to_bool,
    error::ExprError,
    resolve::{Resolution, Resolver},
    scope::Scope,
    value::{Value, shape_of},
};
use std::{cmp::Ordering, fmt};

/// The capability every expression node implements.
pub trait Evaluate: Send + Sync {
    /// Binds the node and its children. Must be called once, to completion,
    /// before [`eval`](Evaluate::eval); not safe to run concurrently with it.
    fn init(&mut self, resolver: &dyn Resolver, root: bool) -> Result<(), ExprError>;

    /// Produces a value for `scope`.
    fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError>;
}

/// An expression tree node.
pub enum Expr {
    /// A constant.
    Literal(Value),
    /// A reference into the scope.
    Ref(RefExpr),
    /// `if ? then : else`.
    Ternary(Box<TernaryExpr>),
    /// A binary operator.
    Binary(Box<BinaryExpr>),
    /// A node kind registered from outside this crate.
    Custom(Box<dyn Evaluate>),
}

impl Expr {
    /// A constant node.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// An unresolved reference node. Surrounding whitespace is trimmed.
    pub fn reference(raw: impl AsRef<str>) -> Self {
        Expr::Ref(RefExpr::new(raw))
    }

    /// A ternary node.
    pub fn ternary(if_expr: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Expr::Ternary(Box::new(TernaryExpr {
            if_expr,
            then_expr,
            else_expr,
        }))
    }

    /// A binary operator node.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(Box::new(BinaryExpr { op, left, right }))
    }

    /// Wraps a custom node kind.
    pub fn custom(node: impl Evaluate + 'static) -> Self {
        Expr::Custom(Box::new(node))
    }
}

impl Evaluate for Expr {
    fn init(&mut self, resolver: &dyn Resolver, root: bool) -> Result<(), ExprError> {
        match self {
            Expr::Literal(_) => Ok(()),
            Expr::Ref(r) => r.init(resolver),
            Expr::Ternary(t) => t.init(resolver),
            Expr::Binary(b) => b.init(resolver),
            Expr::Custom(node) => node.init(resolver, root),
        }
    }

    fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        match self {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Ref(r) => r.eval(scope),
            Expr::Ternary(t) => t.eval(scope),
            Expr::Binary(b) => b.eval(scope),
            Expr::Custom(node) => node.eval(scope),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Expr::Ref(r) => fmt::Debug::fmt(r, f),
            Expr::Ternary(t) => fmt::Debug::fmt(t, f),
            Expr::Binary(b) => fmt::Debug::fmt(b, f),
            Expr::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// Reference

enum RefState {
    Unresolved(String),
    Resolved(Box<dyn Resolution>),
}

/// A reference node.
///
/// Holds either the raw reference string or, once bound, its resolution.
/// The transition is one-way; the raw string is dropped on success.
pub struct RefExpr {
    state: RefState,
}

impl RefExpr {
    /// An unresolved reference. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self {
            state: RefState::Unresolved(raw.as_ref().trim().to_string()),
        }
    }

    /// Whether [`init`](Evaluate::init) has bound this reference.
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, RefState::Resolved(_))
    }

    fn init(&mut self, resolver: &dyn Resolver) -> Result<(), ExprError> {
        if let RefState::Unresolved(raw) = &self.state {
            let resolution = resolver.get_resolution(raw)?;
            self.state = RefState::Resolved(resolution);
        }
        Ok(())
    }

    fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        match &self.state {
            RefState::Resolved(resolution) => resolution.get_value(scope),
            RefState::Unresolved(raw) => Err(ExprError::Unresolved(raw.clone())),
        }
    }
}

impl fmt::Debug for RefExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            RefState::Unresolved(raw) => f.debug_tuple("Ref").field(raw).finish(),
            RefState::Resolved(_) => f.write_str("Ref(<resolved>)"),
        }
    }
}

// Ternary

/// `if ? then : else`. Exactly one branch is evaluated.
#[derive(Debug)]
pub struct TernaryExpr {
    if_expr: Expr,
    then_expr: Expr,
    else_expr: Expr,
}

impl TernaryExpr {
    fn init(&mut self, resolver: &dyn Resolver) -> Result<(), ExprError> {
        self.if_expr.init(resolver, false)?;
        self.then_expr.init(resolver, false)?;
        self.else_expr.init(resolver, false)
    }

    fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        let condition = self.if_expr.eval(scope)?;
        if to_bool(&condition)? {
            self.then_expr.eval(scope)
        } else {
            self.else_expr.eval(scope)
        }
    }
}

// Binary

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`, short-circuiting.
    And,
    /// `||`, short-circuiting.
    Or,
}

impl BinaryOp {
    /// The operator as written.
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// A binary operator applied to two operands.
#[derive(Debug)]
pub struct BinaryExpr {
    op: BinaryOp,
    left: Expr,
    right: Expr,
}

impl BinaryExpr {
    fn init(&mut self, resolver: &dyn Resolver) -> Result<(), ExprError> {
        self.left.init(resolver, false)?;
        self.right.init(resolver, false)
    }

    fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        let result = match self.op {
            BinaryOp::And => {
                to_bool(&self.left.eval(scope)?)? && to_bool(&self.right.eval(scope)?)?
            }
            BinaryOp::Or => {
                to_bool(&self.left.eval(scope)?)? || to_bool(&self.right.eval(scope)?)?
            }
            BinaryOp::Eq => {
                let (lv, rv) = eval_lr(&self.left, &self.right, scope)?;
                loosely_equal(&lv, &rv)
            }
            BinaryOp::NotEq => {
                let (lv, rv) = eval_lr(&self.left, &self.right, scope)?;
                !loosely_equal(&lv, &rv)
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let (lv, rv) = eval_lr(&self.left, &self.right, scope)?;
                let ordering = compare(&lv, &rv).ok_or(ExprError::TypeMismatch {
                    op: self.op.symbol(),
                    left: shape_of(&lv),
                    right: shape_of(&rv),
                })?;
                match self.op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::LtEq => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }
            }
        };
        Ok(Value::Bool(result))
    }
}

fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Evaluates `left` then `right`.
///
/// If `left` fails, `right` is never evaluated and the left error is returned.
pub fn eval_lr(left: &Expr, right: &Expr, scope: &dyn Scope) -> Result<(Value, Value), ExprError> {
    let lv = left.eval(scope)?;
    let rv = right.eval(scope)?;
    Ok((lv, rv))
}

// Builder inputs

/// A value handed to the tree builders by the parser front end.
#[derive(Debug)]
pub enum Node {
    /// A built expression.
    Expr(Expr),
    /// A sequence of built expressions.
    List(Vec<Expr>),
    /// A raw token.
    Token(String),
}

impl Node {
    fn shape(&self) -> &'static str {
        match self {
            Node::Expr(_) => "expression",
            Node::List(_) => "expression list",
            Node::Token(_) => "token",
        }
    }
}

/// Starts an expression sequence from a single expression.
pub fn new_expr_list(x: Node) -> Result<Vec<Expr>, ExprError> {
    match x {
        Node::Expr(expr) => Ok(vec![expr]),
        other => Err(ExprError::InvalidList {
            expected: "expression",
            got: other.shape(),
        }),
    }
}

/// Appends one more expression to an existing sequence.
pub fn append_to_expr_list(list: Node, x: Node) -> Result<Vec<Expr>, ExprError> {
    let mut list = match list {
        Node::List(list) => list,
        other => {
            return Err(ExprError::InvalidList {
                expected: "expression list",
                got: other.shape(),
            });
        }
    };
    match x {
        Node::Expr(expr) => {
            list.push(expr);
            Ok(list)
        }
        other => Err(ExprError::InvalidList {
            expected: "expression",
            got: other.shape(),
        }),
    }
}

// Compiled form

/// A root expression whose bind phase completed successfully.
///
/// Read-only from here on; share it freely across concurrent evaluations.
#[derive(Debug)]
pub struct CompiledExpr(Expr);

impl CompiledExpr {
    /// Binds `expr` as a root against `resolver`.
    pub fn compile(mut expr: Expr, resolver: &dyn Resolver) -> Result<Self, ExprError> {
        expr.init(resolver, true)?;
        Ok(Self(expr))
    }

    /// Evaluates the expression against `scope`.
    pub fn eval(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        self.0.eval(scope)
    }

    /// The bound tree.
    pub fn expr(&self) -> &Expr {
        &self.0
    }
}

/// Compiles expression source text into a [`CompiledExpr`].
pub trait ExprFactory: Send + Sync {
    /// Parses, builds and binds `source`.
    fn new_expr(&self, source: &str) -> Result<CompiledExpr, ExprError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scope::SimpleScope, value::Values};
    use serde_json::json;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    };

    /// Resolves a bare name to a top-level scope lookup.
    struct NameResolver;

    impl Resolver for NameResolver {
        fn get_resolution(&self, reference: &str) -> Result<Box<dyn Resolution>, ExprError> {
            if reference.is_empty() || reference.contains(' ') {
                return Err(ExprError::InvalidReference {
                    reference: reference.to_string(),
                    reason: "not a name".into(),
                });
            }
            let name = reference.to_string();
            Ok(Box::new(move |scope: &dyn Scope| {
                scope
                    .get_value(&name)
                    .cloned()
                    .ok_or_else(|| ExprError::UnknownReference(name.clone()))
            }))
        }
    }

    /// Counts evaluations and returns a fixed value, or fails.
    struct Spy {
        hits: Arc<AtomicUsize>,
        result: Option<Value>,
    }

    impl Spy {
        fn new(result: Option<Value>) -> (Self, Arc<AtomicUsize>) {
            let hits = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    hits: Arc::clone(&hits),
                    result,
                },
                hits,
            )
        }
    }

    impl Evaluate for Spy {
        fn init(&mut self, _resolver: &dyn Resolver, _root: bool) -> Result<(), ExprError> {
            Ok(())
        }

        fn eval(&self, _scope: &dyn Scope) -> Result<Value, ExprError> {
            self.hits.fetch_add(1, AtomicOrdering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| ExprError::Other("spy evaluated".into()))
        }
    }

    fn scope(v: Value) -> SimpleScope {
        match v {
            Value::Object(map) => SimpleScope::from(map),
            _ => SimpleScope::from(Values::new()),
        }
    }

    #[test]
    fn test_reference_trims_and_resolves() {
        let mut expr = Expr::reference("  count \n");
        expr.init(&NameResolver, true).unwrap();
        assert_eq!(expr.eval(&scope(json!({"count": 3}))).unwrap(), json!(3));
    }

    #[test]
    fn test_reference_is_reusable_across_scopes() {
        let expr = CompiledExpr::compile(Expr::reference("user"), &NameResolver).unwrap();
        let a = scope(json!({"user": "alice"}));
        let b = scope(json!({"user": "bob"}));

        assert_eq!(expr.eval(&a).unwrap(), json!("alice"));
        assert_eq!(expr.eval(&b).unwrap(), json!("bob"));
        assert_eq!(expr.eval(&a).unwrap(), json!("alice"));
    }

    #[test]
    fn test_eval_before_init_fails() {
        let expr = Expr::reference("user");
        let err = expr.eval(&scope(json!({"user": 1}))).unwrap_err();
        assert!(matches!(err, ExprError::Unresolved(ref r) if r == "user"));
    }

    #[test]
    fn test_init_failure_surfaces_resolver_error() {
        let err = CompiledExpr::compile(Expr::reference("not a name"), &NameResolver).unwrap_err();
        assert!(matches!(err, ExprError::InvalidReference { .. }));
    }

    #[test]
    fn test_init_is_a_noop_once_resolved() {
        let mut expr = RefExpr::new("x");
        expr.init(&NameResolver).unwrap();
        assert!(expr.is_resolved());
        expr.init(&NameResolver).unwrap();
        assert!(expr.is_resolved());
    }

    #[test]
    fn test_ternary_initializes_every_branch() {
        let mut expr = Expr::ternary(
            Expr::reference("flag"),
            Expr::literal(1),
            Expr::reference("bad name"),
        );
        assert!(expr.init(&NameResolver, true).is_err());
    }

    #[test]
    fn test_ternary_true_skips_else() {
        let (then_spy, then_hits) = Spy::new(Some(json!("then")));
        let (else_spy, else_hits) = Spy::new(None);
        let expr = CompiledExpr::compile(
            Expr::ternary(
                Expr::reference("flag"),
                Expr::custom(then_spy),
                Expr::custom(else_spy),
            ),
            &NameResolver,
        )
        .unwrap();

        let value = expr.eval(&scope(json!({"flag": "true"}))).unwrap();

        assert_eq!(value, json!("then"));
        assert_eq!(then_hits.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(else_hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_ternary_false_skips_then() {
        let (then_spy, then_hits) = Spy::new(None);
        let (else_spy, else_hits) = Spy::new(Some(json!("else")));
        let expr = CompiledExpr::compile(
            Expr::ternary(
                Expr::reference("flag"),
                Expr::custom(then_spy),
                Expr::custom(else_spy),
            ),
            &NameResolver,
        )
        .unwrap();

        let value = expr.eval(&scope(json!({"flag": 0}))).unwrap();

        assert_eq!(value, json!("else"));
        assert_eq!(then_hits.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(else_hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_ternary_condition_errors_short_circuit() {
        let (then_spy, then_hits) = Spy::new(Some(json!(1)));
        let (else_spy, else_hits) = Spy::new(Some(json!(2)));
        let expr = CompiledExpr::compile(
            Expr::ternary(
                Expr::reference("missing"),
                Expr::custom(then_spy),
                Expr::custom(else_spy),
            ),
            &NameResolver,
        )
        .unwrap();

        let err = expr.eval(&scope(json!({}))).unwrap_err();

        assert!(matches!(err, ExprError::UnknownReference(ref n) if n == "missing"));
        assert_eq!(then_hits.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(else_hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_ternary_uncoercible_condition() {
        let expr = Expr::ternary(Expr::literal("perhaps"), Expr::literal(1), Expr::literal(2));
        let err = expr.eval(&SimpleScope::empty()).unwrap_err();
        assert!(matches!(err, ExprError::Coerce(_)));
    }

    #[test]
    fn test_eval_lr_skips_right_on_left_error() {
        let (left, _) = Spy::new(None);
        let (right, right_hits) = Spy::new(Some(json!(1)));
        let result = eval_lr(
            &Expr::custom(left),
            &Expr::custom(right),
            &SimpleScope::empty(),
        );

        assert!(result.is_err());
        assert_eq!(right_hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_binary_comparisons() {
        let s = scope(json!({"count": 3, "name": "b"}));
        let cases = [
            (BinaryOp::Eq, Expr::reference("count"), Expr::literal(3.0), true),
            (BinaryOp::NotEq, Expr::reference("count"), Expr::literal(3), false),
            (BinaryOp::Lt, Expr::reference("count"), Expr::literal(5), true),
            (BinaryOp::GtEq, Expr::reference("count"), Expr::literal(3), true),
            (BinaryOp::Gt, Expr::reference("name"), Expr::literal("a"), true),
            (BinaryOp::LtEq, Expr::reference("name"), Expr::literal("a"), false),
        ];
        for (op, left, right, expected) in cases {
            let expr = CompiledExpr::compile(Expr::binary(op, left, right), &NameResolver).unwrap();
            assert_eq!(expr.eval(&s).unwrap(), json!(expected), "{}", op.symbol());
        }
    }

    #[test]
    fn test_binary_ordering_type_mismatch() {
        let expr = Expr::binary(BinaryOp::Lt, Expr::literal(1), Expr::literal("1"));
        let err = expr.eval(&SimpleScope::empty()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "operator '<' cannot be applied to number and string"
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let (spy, hits) = Spy::new(None);
        let and = Expr::binary(BinaryOp::And, Expr::literal(false), Expr::custom(spy));
        assert_eq!(and.eval(&SimpleScope::empty()).unwrap(), json!(false));
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);

        let (spy, hits) = Spy::new(None);
        let or = Expr::binary(BinaryOp::Or, Expr::literal("yes"), Expr::custom(spy));
        assert_eq!(or.eval(&SimpleScope::empty()).unwrap(), json!(true));
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_expr_list_builders() {
        let list = new_expr_list(Node::Expr(Expr::literal(1))).unwrap();
        let list = append_to_expr_list(Node::List(list), Node::Expr(Expr::literal(2))).unwrap();
        let values: Vec<Value> = list
            .iter()
            .map(|e| e.eval(&SimpleScope::empty()).unwrap())
            .collect();
        assert_eq!(values, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_expr_list_builders_reject_misuse() {
        let err = new_expr_list(Node::Token("x".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid expression list type; expected expression, got token"
        );

        let err = append_to_expr_list(Node::Expr(Expr::literal(1)), Node::Expr(Expr::literal(2)))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid expression list type; expected expression list, got expression"
        );

        let err = append_to_expr_list(Node::List(Vec::new()), Node::List(Vec::new())).unwrap_err();
        assert!(matches!(err, ExprError::InvalidList { got: "expression list", .. }));
    }

    #[test]
    fn test_compiled_expr_is_shareable_across_threads() {
        let expr = Arc::new(CompiledExpr::compile(Expr::reference("n"), &NameResolver).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let expr = Arc::clone(&expr);
                std::thread::spawn(move || expr.eval(&scope(json!({"n": i}))).unwrap())
            })
            .collect();
        let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![json!(0), json!(1), json!(2), json!(3)]);
    }
}
