//! Typed `if/then/elif/else` state machine. Each state only exposes the
//! methods legal at that point in the grammar, so an incomplete chain is a
//! compile error rather than a runtime [`EvalError::BuilderStateError`].

use std::rc::Rc;

use crate::builder::Expr;
use crate::error::EvalError;
use crate::node::{CaseLabels, Node, Operator};
use crate::value::Value;

/// An `if`/`elif` condition has been supplied; a `then` branch must follow.
pub struct IncompleteConditional {
    conds: Vec<Rc<Node>>,
    thens: Vec<Rc<Node>>,
    pending_cond: Rc<Node>,
}

/// A complete `(cond, then)` chain; another `elif` or the closing `else`
/// may follow.
pub struct PartialConditional {
    conds: Vec<Rc<Node>>,
    thens: Vec<Rc<Node>>,
}

/// Starts a conditional chain. `cond` must already evaluate to `Bool`.
pub fn if_(cond: Expr) -> Result<IncompleteConditional, EvalError> {
    cond.node.value().as_bool()?;
    Ok(IncompleteConditional {
        conds: Vec::new(),
        thens: Vec::new(),
        pending_cond: cond.node,
    })
}

impl IncompleteConditional {
    pub fn then(self, expr: Expr) -> PartialConditional {
        let mut conds = self.conds;
        conds.push(self.pending_cond);
        let mut thens = self.thens;
        thens.push(expr.node);
        PartialConditional { conds, thens }
    }
}

impl PartialConditional {
    pub fn elif_(self, cond: Expr) -> Result<IncompleteConditional, EvalError> {
        cond.node.value().as_bool()?;
        Ok(IncompleteConditional {
            conds: self.conds,
            thens: self.thens,
            pending_cond: cond.node,
        })
    }

    /// Closes the chain. Because every condition was evaluated eagerly as
    /// it was added, the taken branch is already known: the first `cond`
    /// whose value is `True`, or the `else` arm if none held.
    pub fn else_(self, expr: Expr) -> Expr {
        let PartialConditional { conds, thens } = self;
        let taken = conds
            .iter()
            .position(|c| matches!(c.value(), Value::Bool(true)));

        let value = match taken {
            Some(i) => thens[i].value().clone(),
            None => expr.node.value().clone(),
        };
        let taken_idx = taken.unwrap_or(conds.len());

        let mut operands = Vec::with_capacity(conds.len() * 2 + 1);
        for (cond, then) in conds.iter().zip(thens.iter()) {
            operands.push(cond.clone());
            operands.push(then.clone());
        }
        operands.push(expr.node);

        let node = Node::new(
            None,
            value,
            Operator::Conditional,
            operands,
            Some(CaseLabels::Conditional { taken: taken_idx }),
        );
        Expr { node }
    }
}
