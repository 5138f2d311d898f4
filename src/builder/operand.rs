//! Operand normalization: every builder method accepts either an already
//! built node, a named literal [`Binding`], or the `(&str, value)` sugar for
//! one, and flattens them all to `Rc<Node>` behind [`IntoOperand`].

use std::rc::Rc;

use crate::builder::Expr;
use crate::node::{Node, Operator};
use crate::value::Value;

/// A name bound to a literal value, the operand form of `a=0` in the
/// informal notation builder calls are described with.
#[derive(Debug, Clone)]
pub struct Binding {
    name: Option<String>,
    value: Value,
}

impl Binding {
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Binding {
        Binding {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Binding {
        Binding {
            name: None,
            value: value.into(),
        }
    }
}

/// Normalizes any supported operand shape into the `Rc<Node>` the tree
/// actually stores.
pub trait IntoOperand {
    fn into_operand(self) -> Rc<Node>;
}

impl IntoOperand for Rc<Node> {
    fn into_operand(self) -> Rc<Node> {
        self
    }
}

impl IntoOperand for Expr {
    fn into_operand(self) -> Rc<Node> {
        self.node
    }
}

impl IntoOperand for &Expr {
    fn into_operand(self) -> Rc<Node> {
        self.node.clone()
    }
}

impl IntoOperand for Binding {
    fn into_operand(self) -> Rc<Node> {
        Node::new(self.name, self.value, Operator::Leaf, Vec::new(), None)
    }
}

impl IntoOperand for Value {
    fn into_operand(self) -> Rc<Node> {
        Node::new(None, self, Operator::Leaf, Vec::new(), None)
    }
}

impl<V: Into<Value>> IntoOperand for (&str, V) {
    fn into_operand(self) -> Rc<Node> {
        let (name, value) = self;
        Node::new(Some(name.to_string()), value.into(), Operator::Leaf, Vec::new(), None)
    }
}
