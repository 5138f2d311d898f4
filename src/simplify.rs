//! Reduces a tree to the minimal sub-tree that actually caused its value,
//! pruning boolean short-circuit branches and collapsing connectives that
//! flip duality (`And`/`False` rewrites to `Or`, and vice versa).

use std::rc::Rc;

use crate::node::{CaseLabels, Node, Operator};
use crate::value::Value;

pub fn simplify(node: &Rc<Node>) -> Rc<Node> {
    match node.operator() {
        Operator::Leaf => node.clone(),
        Operator::Not => simplify_not(node),
        Operator::And => simplify_and(node),
        Operator::Or => simplify_or(node),
        Operator::Conditional => simplify_conditional(node),
        _ => simplify_operands_only(node),
    }
}

/// Erases the `Not` tag itself, but the simplified operand cannot simply
/// be returned as-is: its own recorded value is the *pre*-negation result,
/// while this position's value must be the `Not` node's already-inverted
/// one (§8 property 4). For an atomic operand (`Leaf`/`Lookup`/
/// `UncertainLookup`) the renderer prints the operand's own value inline,
/// so the inversion is carried out-of-band via `CaseLabels::NotErased`
/// rather than overwriting it — a negated leaf still renders its original
/// binding, only the value used at *this* position flips. Compound
/// operands (`Gt`, `And`, `Conditional`, …) never render their own
/// `value` directly — only their operands — so no such tracking is needed
/// there; only the top `value` field changes.
fn simplify_not(node: &Rc<Node>) -> Rc<Node> {
    let operand = simplify(&node.operands()[0]);
    let case_labels = match operand.operator() {
        Operator::Leaf | Operator::Lookup | Operator::UncertainLookup => {
            // If `operand` is itself already `Not`-erased (a double negation),
            // its own `value` is the once-inverted result, not the original
            // binding — reuse its `display_value` instead of re-deriving one.
            let display_value = match operand.case_labels() {
                Some(CaseLabels::NotErased { display_value }) => display_value.clone(),
                _ => operand.value().clone(),
            };
            Some(CaseLabels::NotErased { display_value })
        }
        _ => operand.case_labels().cloned(),
    };
    Node::new(
        operand.name().map(str::to_string),
        node.value().clone(),
        operand.operator(),
        operand.operands().to_vec(),
        case_labels,
    )
}

fn simplify_operands_only(node: &Rc<Node>) -> Rc<Node> {
    let operands: Vec<_> = node.operands().iter().map(simplify).collect();
    Node::from_parts(
        node.id(),
        node.name().map(str::to_string),
        node.value().clone(),
        node.operator(),
        operands,
        node.case_labels().cloned(),
    )
}

fn is_false(v: &Value) -> bool {
    matches!(v, Value::Bool(false))
}

fn is_true(v: &Value) -> bool {
    matches!(v, Value::Bool(true))
}

/// `And` with value `True` keeps every operand (all of them had to be true
/// for the conjunction to hold). `And` with value `False` rewrites to `Or`,
/// keeping only the operands that caused the failure.
///
/// The rewritten `Or` is tagged `CaseLabels::SimplifiedConnective` so a
/// second `simplify` pass recognizes it as already minimal instead of
/// flipping it back to `And` — without this, `simplify` would not be a
/// fixed point on its own output (§8 property 3).
fn simplify_and(node: &Rc<Node>) -> Rc<Node> {
    if matches!(node.case_labels(), Some(CaseLabels::SimplifiedConnective)) {
        return node.clone();
    }

    if matches!(node.value(), Value::Bool(true)) {
        let operands: Vec<_> = node.operands().iter().map(simplify).collect();
        return Node::new(
            node.name().map(str::to_string),
            Value::Bool(true),
            Operator::And,
            operands,
            None,
        );
    }

    let retained: Vec<_> = node
        .operands()
        .iter()
        .filter(|o| is_false(o.value()))
        .map(simplify)
        .collect();
    if retained.len() == 1 {
        return retained.into_iter().next().unwrap();
    }
    Node::new(
        node.name().map(str::to_string),
        Value::Bool(false),
        Operator::Or,
        retained,
        Some(CaseLabels::SimplifiedConnective),
    )
}

/// `Or` with value `True` rewrites by keeping only the operands that caused
/// the success. `Or` with value `False` keeps every operand (all of them
/// had to fail for the disjunction to fail) and is tagged
/// `CaseLabels::SimplifiedConnective` for the same fixed-point reason as
/// `simplify_and`'s rewrite.
fn simplify_or(node: &Rc<Node>) -> Rc<Node> {
    if matches!(node.case_labels(), Some(CaseLabels::SimplifiedConnective)) {
        return node.clone();
    }

    if matches!(node.value(), Value::Bool(false)) {
        let operands: Vec<_> = node.operands().iter().map(simplify).collect();
        return Node::new(
            node.name().map(str::to_string),
            Value::Bool(false),
            Operator::And,
            operands,
            Some(CaseLabels::SimplifiedConnective),
        );
    }

    let retained: Vec<_> = node
        .operands()
        .iter()
        .filter(|o| is_true(o.value()))
        .map(simplify)
        .collect();
    if retained.len() == 1 {
        return retained.into_iter().next().unwrap();
    }
    Node::new(
        node.name().map(str::to_string),
        Value::Bool(true),
        Operator::Or,
        retained,
        None,
    )
}

/// Reduces a `Conditional` to the single condition chain that justifies
/// its value: the (false) conditions leading up to and including the one
/// that held, or every (false) condition plus the `else` arm.
fn simplify_conditional(node: &Rc<Node>) -> Rc<Node> {
    match node.case_labels() {
        Some(CaseLabels::SimplifiedConditional { is_else }) => {
            let operands: Vec<_> = node.operands().iter().map(simplify).collect();
            Node::new(
                node.name().map(str::to_string),
                node.value().clone(),
                Operator::Conditional,
                operands,
                Some(CaseLabels::SimplifiedConditional { is_else: *is_else }),
            )
        }
        Some(CaseLabels::Conditional { taken }) => {
            let operands = node.operands();
            let num_conds = operands.len() / 2;
            let mut retained = Vec::new();
            let is_else = *taken >= num_conds;
            if !is_else {
                for i in 0..=*taken {
                    retained.push(simplify(&operands[i * 2]));
                }
                retained.push(simplify(&operands[taken * 2 + 1]));
            } else {
                for i in 0..num_conds {
                    retained.push(simplify(&operands[i * 2]));
                }
                retained.push(simplify(&operands[operands.len() - 1]));
            }
            Node::new(
                node.name().map(str::to_string),
                node.value().clone(),
                Operator::Conditional,
                retained,
                Some(CaseLabels::SimplifiedConditional { is_else }),
            )
        }
        _ => simplify_operands_only(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{boolean, Binding, IntoOperand};

    fn bool_leaf(name: &str, value: bool) -> Rc<Node> {
        Binding::named(name, value).into_operand()
    }

    #[test]
    fn or_true_keeps_only_the_true_operands() {
        let x = bool_leaf("x", false);
        let y = bool_leaf("y", true);
        let z = bool_leaf("z", true);
        let or_node = Node::new(None, Value::Bool(true), Operator::Or, vec![x, y, z], None);
        let simplified = simplify(&or_node);
        assert_eq!(simplified.operator(), Operator::Or);
        assert_eq!(simplified.operands().len(), 2);
    }

    #[test]
    fn and_false_rewrites_to_or_of_the_false_operands() {
        let x = bool_leaf("x", true);
        let y = bool_leaf("y", false);
        let z = bool_leaf("z", false);
        let and_node = Node::new(None, Value::Bool(false), Operator::And, vec![x, y, z], None);
        let simplified = simplify(&and_node);
        assert_eq!(simplified.operator(), Operator::Or);
        assert_eq!(simplified.operands().len(), 2);
        assert_eq!(*simplified.value(), Value::Bool(false));
    }

    #[test]
    fn or_false_keeps_all_operands_and_rewrites_to_and() {
        let x = bool_leaf("x", false);
        let y = bool_leaf("y", false);
        let z = bool_leaf("z", false);
        let or_node = Node::new(None, Value::Bool(false), Operator::Or, vec![x, y, z], None);
        let simplified = simplify(&or_node);
        assert_eq!(simplified.operator(), Operator::And);
        assert_eq!(simplified.operands().len(), 3);
    }

    #[test]
    fn single_surviving_operand_collapses_the_connective() {
        let x = bool_leaf("x", true);
        let y = bool_leaf("y", false);
        let and_node = Node::new(None, Value::Bool(false), Operator::And, vec![x, y], None);
        let simplified = simplify(&and_node);
        assert_eq!(simplified.operator(), Operator::Leaf);
        assert_eq!(*simplified.value(), Value::Bool(false));
    }

    #[test]
    fn not_is_always_elided() {
        let x = boolean(bool_leaf("x", true)).unwrap();
        let negated = x.not().unwrap();
        let simplified = simplify(negated.node());
        assert_eq!(simplified.operator(), Operator::Leaf);
    }

    #[test]
    fn simplifying_twice_is_idempotent() {
        let x = bool_leaf("x", true);
        let y = bool_leaf("y", false);
        let z = bool_leaf("z", false);
        let or_node = Node::new(None, Value::Bool(true), Operator::Or, vec![x, y, z], None);
        let once = simplify(&or_node);
        let twice = simplify(&once);
        assert_eq!(once.operator(), twice.operator());
        assert_eq!(once.operands().len(), twice.operands().len());
    }

    #[test]
    fn and_false_rewrite_does_not_flip_back_to_and_on_a_second_pass() {
        let x = bool_leaf("x", false);
        let y = bool_leaf("y", false);
        let and_node = Node::new(None, Value::Bool(false), Operator::And, vec![x, y], None);
        let once = simplify(&and_node);
        let twice = simplify(&once);
        assert_eq!(once.operator(), Operator::Or);
        assert_eq!(once.operator(), twice.operator());
        assert_eq!(once.operands().len(), twice.operands().len());
        assert_eq!(*once.value(), *twice.value());
    }

    #[test]
    fn double_negation_display_value_survives_two_erasures() {
        let x = boolean(bool_leaf("x", true)).unwrap();
        let double_negated = x.not().unwrap().not().unwrap();
        let simplified = simplify(double_negated.node());
        assert_eq!(simplified.operator(), Operator::Leaf);
        assert_eq!(*simplified.value(), Value::Bool(true));
        match simplified.case_labels() {
            Some(CaseLabels::NotErased { display_value }) => {
                assert_eq!(*display_value, Value::Bool(true));
            }
            other => panic!("expected NotErased case labels, found {other:?}"),
        }
    }
}
