//! Entry points and chaining methods for constructing expression trees.
//!
//! Every operation evaluates eagerly: by the time a builder call returns,
//! the resulting node already carries its final [`Value`]. There is no
//! separate evaluation pass anywhere downstream of this module.

pub mod conditional;
mod operand;

use std::ops::{BitAnd, BitOr, Not as NotOp};
use std::rc::Rc;

pub use conditional::{if_, IncompleteConditional, PartialConditional};
pub use operand::{Binding, IntoOperand};

use crate::error::EvalError;
use crate::node::{CaseLabels, Node, NodeId, Operator};
use crate::value::Value;

/// A handle to an already-evaluated node. Cloning an `Expr` is cheap: it
/// just clones the underlying `Rc`.
#[derive(Debug, Clone)]
pub struct Expr {
    pub(crate) node: Rc<Node>,
}

pub type LookupMap = hashbrown::HashMap<String, Value>;

fn and_eval(a: &Value, b: &Value) -> Result<Value, EvalError> {
    Ok(Value::Bool(a.as_bool()? && b.as_bool()?))
}

fn or_eval(a: &Value, b: &Value) -> Result<Value, EvalError> {
    Ok(Value::Bool(a.as_bool()? || b.as_bool()?))
}

impl Expr {
    fn wrap(node: Rc<Node>) -> Expr {
        Expr { node }
    }

    pub fn node(&self) -> &Rc<Node> {
        &self.node
    }

    pub fn value(&self) -> &Value {
        self.node.value()
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    /// Shared skeleton for every binary operator that may need to flatten
    /// into its left-hand operand: evaluate, then either concatenate onto
    /// an existing same-operator node (`flattens`) or wrap a fresh binary
    /// node. `Plus`/`Times`/`And`/`Or` pass `flattens = true`; `Minus` and
    /// `DividedBy` pass `false` and stay strictly binary left-associative.
    fn flatten_or_wrap(
        self,
        operator: Operator,
        flattens: bool,
        rhs: impl IntoOperand,
        eval: fn(&Value, &Value) -> Result<Value, EvalError>,
    ) -> Result<Expr, EvalError> {
        let rhs_node = rhs.into_operand();
        let value = eval(self.node.value(), rhs_node.value())?;
        let operands = if flattens && self.node.operator() == operator {
            let mut ops = self.node.operands().to_vec();
            ops.push(rhs_node);
            ops
        } else {
            vec![self.node.clone(), rhs_node]
        };
        Ok(Expr::wrap(Node::new(None, value, operator, operands, None)))
    }

    pub fn plus(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::Plus, true, rhs, Value::add)
    }

    pub fn minus(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::Minus, false, rhs, Value::sub)
    }

    pub fn times(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::Times, true, rhs, Value::mul)
    }

    pub fn divided_by(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::DividedBy, false, rhs, Value::div)
    }

    /// Builds a comparison node. The operator is stored as `positive` when
    /// the comparison holds and as its `dual` when it doesn't — the node's
    /// own `value` is always the literal boolean result.
    fn comparison(
        self,
        positive: Operator,
        dual: Operator,
        rhs: impl IntoOperand,
        eval: fn(&Value, &Value) -> Result<bool, EvalError>,
    ) -> Result<Expr, EvalError> {
        let rhs_node = rhs.into_operand();
        let result = eval(self.node.value(), rhs_node.value())?;
        let operator = if result { positive } else { dual };
        let node = Node::new(
            None,
            Value::Bool(result),
            operator,
            vec![self.node.clone(), rhs_node],
            None,
        );
        Ok(Expr::wrap(node))
    }

    pub fn eq(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Eq, Operator::Neq, rhs, Value::eq_val)
    }

    pub fn neq(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Neq, Operator::Eq, rhs, Value::ne_val)
    }

    pub fn gt(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Gt, Operator::Lte, rhs, Value::gt)
    }

    pub fn gte(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Gte, Operator::Lt, rhs, Value::ge)
    }

    pub fn lt(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Lt, Operator::Gte, rhs, Value::lt)
    }

    pub fn lte(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.comparison(Operator::Lte, Operator::Gt, rhs, Value::le)
    }

    /// `Null`-ness as a comparison: `is_not_null` is just `!= Null`, so it
    /// reuses the same flip-on-false comparison machinery and the existing
    /// `Eq`/`Neq` operator vocabulary rather than inventing a new tag.
    pub fn is_not_null(self) -> Result<Expr, EvalError> {
        self.neq(Value::Null)
    }

    pub fn and_(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::And, true, rhs, and_eval)
    }

    pub fn or_(self, rhs: impl IntoOperand) -> Result<Expr, EvalError> {
        self.flatten_or_wrap(Operator::Or, true, rhs, or_eval)
    }

    pub fn not(self) -> Result<Expr, EvalError> {
        let inner = self.node.value().as_bool()?;
        let node = Node::new(
            None,
            Value::Bool(!inner),
            Operator::Not,
            vec![self.node.clone()],
            None,
        );
        Ok(Expr::wrap(node))
    }

    /// Ternary shorthand: `then_expr.if_(cond).else_(other)` is the
    /// two-branch specialization of the full `if_/then/elif_/else_` chain —
    /// `self` is the `then` arm, `cond` the (already-evaluated) condition.
    pub fn if_(self, cond: Expr) -> Result<PartialConditional, EvalError> {
        Ok(conditional::if_(cond)?.then(self))
    }
}

impl BitAnd for Expr {
    type Output = Result<Expr, EvalError>;
    fn bitand(self, rhs: Expr) -> Self::Output {
        self.and_(rhs)
    }
}

impl BitOr for Expr {
    type Output = Result<Expr, EvalError>;
    fn bitor(self, rhs: Expr) -> Self::Output {
        self.or_(rhs)
    }
}

impl NotOp for Expr {
    type Output = Result<Expr, EvalError>;
    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

/// Wraps any operand as-is without creating a redundant node. The common
/// entry point for a tree built from an existing sub-expression.
pub fn numeric(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    let node = operand.into_operand();
    node.value().require_numeric()?;
    Ok(Expr::wrap(node))
}

pub fn int(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    numeric(operand)
}

pub fn float(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    numeric(operand)
}

pub fn boolean(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    let node = operand.into_operand();
    node.value().as_bool()?;
    Ok(Expr::wrap(node))
}

pub fn not(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    Expr::wrap(operand.into_operand()).not()
}

pub fn is_not_null(operand: impl IntoOperand) -> Result<Expr, EvalError> {
    Expr::wrap(operand.into_operand()).is_not_null()
}

/// Convenience sugar for "And of N operands" (N >= 1). A single operand is
/// returned unwrapped rather than boxed in a redundant `And` node.
pub fn all_of(operands: impl IntoIterator<Item = Expr>) -> Result<Expr, EvalError> {
    let mut iter = operands.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| EvalError::ArgumentError("and_ requires at least one operand".into()))?;
    iter.try_fold(first, |acc, next| acc.and_(next))
}

/// Convenience sugar for "Or of N operands" (N >= 1).
pub fn any_of(operands: impl IntoIterator<Item = Expr>) -> Result<Expr, EvalError> {
    let mut iter = operands.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| EvalError::ArgumentError("or_ requires at least one operand".into()))?;
    iter.try_fold(first, |acc, next| acc.or_(next))
}

pub fn lookup(map: &LookupMap, key: &str) -> Result<Expr, EvalError> {
    let value = map
        .get(key)
        .cloned()
        .ok_or_else(|| EvalError::KeyNotFound(Value::Str(key.to_string())))?;
    let key_node = Node::new(None, Value::Str(key.to_string()), Operator::Leaf, Vec::new(), None);
    let value_node = Node::new(None, value.clone(), Operator::Leaf, Vec::new(), None);
    let case = CaseLabels::Lookup {
        key: Value::Str(key.to_string()),
    };
    let node = Node::new(
        None,
        value,
        Operator::Lookup,
        vec![key_node, value_node],
        Some(case),
    );
    Ok(Expr::wrap(node))
}

/// A lookup that never fails: falls back to `default` and records whether
/// it did so in [`CaseLabels::UncertainLookup`].
pub fn uncertain_lookup(map: &LookupMap, key: &str, default: Value) -> Expr {
    let (value, used_default) = match map.get(key) {
        Some(v) => (v.clone(), false),
        None => (default, true),
    };
    let key_node = Node::new(None, Value::Str(key.to_string()), Operator::Leaf, Vec::new(), None);
    let value_node = Node::new(None, value.clone(), Operator::Leaf, Vec::new(), None);
    let case = CaseLabels::UncertainLookup {
        key: Value::Str(key.to_string()),
        used_default,
    };
    let node = Node::new(
        None,
        value,
        Operator::UncertainLookup,
        vec![key_node, value_node],
        Some(case),
    );
    Expr::wrap(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, value: impl Into<Value>) -> Expr {
        Expr::wrap(Binding::named(name, value).into_operand())
    }

    #[test]
    fn worked_arithmetic_chain_matches_spec_example() {
        let a = int(Binding::named("a", 0)).unwrap();
        let b = Binding::named("b", 1);
        let c = Binding::named("c", 2);
        let d = Binding::named("d", 3);
        let e = Binding::named("e", 4);
        let sum = a.plus(b).unwrap().minus(c).unwrap();
        let scaled = sum.times(d).unwrap();
        let result = scaled.divided_by(e).unwrap();
        assert_eq!(*result.value(), Value::Float(-0.75));
    }

    #[test]
    fn plus_flattens_same_operator_chains() {
        let a = leaf("a", 1);
        let b = leaf("b", 2);
        let c = leaf("c", 3);
        let sum = a.plus(b).unwrap().plus(c).unwrap();
        assert_eq!(sum.node().operands().len(), 3);
    }

    #[test]
    fn minus_never_flattens() {
        let a = leaf("a", 5);
        let b = leaf("b", 1);
        let c = leaf("c", 1);
        let diff = a.minus(b).unwrap().minus(c).unwrap();
        assert_eq!(diff.node().operands().len(), 2);
    }

    #[test]
    fn false_comparison_stores_the_dual_operator() {
        let a = leaf("a", 2);
        let b = leaf("b", 4);
        let cmp = a.gt(b).unwrap();
        assert_eq!(*cmp.value(), Value::Bool(false));
        assert_eq!(cmp.node().operator(), Operator::Lte);
    }

    #[test]
    fn division_by_zero_propagates() {
        let a = leaf("a", 1);
        let b = leaf("b", 0);
        assert!(matches!(a.divided_by(b), Err(EvalError::DivisionByZero)));
    }

    #[test]
    fn conditional_picks_the_first_true_branch() {
        let cond1 = boolean(leaf("c1", false)).unwrap();
        let cond2 = boolean(leaf("c2", true)).unwrap();
        let then1 = leaf("t1", 1);
        let then2 = leaf("t2", 2);
        let else_ = leaf("e", 3);
        let result = conditional::if_(cond1)
            .unwrap()
            .then(then1)
            .elif_(cond2)
            .unwrap()
            .then(then2)
            .else_(else_);
        assert_eq!(*result.value(), Value::Int(2));
    }

    #[test]
    fn ternary_if_else_picks_the_then_branch_when_true() {
        let then_ = leaf("t", 1);
        let else_ = leaf("e", 2);
        let cond = boolean(leaf("c", true)).unwrap();
        let result = then_.if_(cond).unwrap().else_(else_);
        assert_eq!(*result.value(), Value::Int(1));
    }

    #[test]
    fn uncertain_lookup_falls_back_to_default() {
        let map: LookupMap = LookupMap::new();
        let result = uncertain_lookup(&map, "missing", Value::Int(42));
        assert_eq!(*result.value(), Value::Int(42));
        assert!(matches!(
            result.node().case_labels(),
            Some(CaseLabels::UncertainLookup { used_default: true, .. })
        ));
    }

    #[test]
    fn lookup_fails_on_missing_key() {
        let map: LookupMap = LookupMap::new();
        assert!(matches!(lookup(&map, "missing"), Err(EvalError::KeyNotFound(_))));
    }
}
