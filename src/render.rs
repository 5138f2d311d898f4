//! Renders a tree as the canonical `"<value> because <expression>"` audit
//! string. Operates on either a raw or an already-[`crate::simplify::simplify`]d
//! tree; the two only differ in how much of the tree is left to walk.

use crate::node::{CaseLabels, Node, Operator};

/// Renders `node` as `"<value> because <expression>"`.
pub fn render(node: &Node) -> String {
    format!("{} because {}", node.value(), render_top(node))
}

fn render_top(node: &Node) -> String {
    if let Operator::Not = node.operator() {
        return render_top(&node.operands()[0]);
    }
    render_body(node)
}

/// A `Not`-erased atomic operand displays the value it was originally bound
/// to (`CaseLabels::NotErased::display_value`), not the node's own `value`
/// — which, post-erasure, holds the inverted result used at its position in
/// the tree instead.
fn render_leaf(node: &Node) -> String {
    let value = match node.case_labels() {
        Some(CaseLabels::NotErased { display_value }) => display_value,
        _ => node.value(),
    };
    match node.name() {
        Some(name) => format!("({name} := {value})"),
        None => value.to_string(),
    }
}

/// Renders `node` as it appears nested inside a parent expression: atomic
/// nodes (leaves, lookups) render bare, everything else gets wrapped in
/// parentheses, and `Not` is always transparent.
fn render_operand(node: &Node) -> String {
    match node.operator() {
        Operator::Leaf | Operator::Lookup | Operator::UncertainLookup => render_leaf(node),
        Operator::Not => render_operand(&node.operands()[0]),
        _ => format!("({})", render_body(node)),
    }
}

fn symbol(op: Operator) -> &'static str {
    match op {
        Operator::Plus => "+",
        Operator::Minus => "-",
        Operator::Times => "\u{00D7}",
        Operator::DividedBy => "/",
        Operator::Eq => "=",
        Operator::Neq => "\u{2260}",
        Operator::Gt => ">",
        Operator::Gte => "\u{2265}",
        Operator::Lt => "<",
        Operator::Lte => "\u{2264}",
        Operator::And => "and",
        Operator::Or => "or",
        _ => unreachable!("symbol() called for a non-infix operator"),
    }
}

fn render_body(node: &Node) -> String {
    match node.operator() {
        Operator::Leaf | Operator::Lookup | Operator::UncertainLookup => render_leaf(node),
        Operator::Not => render_body(&node.operands()[0]),
        Operator::Plus | Operator::Times | Operator::And | Operator::Or => {
            let sep = format!(" {} ", symbol(node.operator()));
            node.operands()
                .iter()
                .map(|op| render_operand(op))
                .collect::<Vec<_>>()
                .join(sep.as_str())
        }
        Operator::Minus
        | Operator::DividedBy
        | Operator::Eq
        | Operator::Neq
        | Operator::Gt
        | Operator::Gte
        | Operator::Lt
        | Operator::Lte => {
            let sym = symbol(node.operator());
            let operands = node.operands();
            format!("{} {sym} {}", render_operand(&operands[0]), render_operand(&operands[1]))
        }
        Operator::Conditional => render_conditional_body(node),
    }
}

fn render_conditional_body(node: &Node) -> String {
    match node.case_labels() {
        Some(CaseLabels::SimplifiedConditional { is_else }) => {
            render_simplified_conditional(node, *is_else)
        }
        _ => render_full_conditional(node),
    }
}

/// `"<then> when <cond_1> and .. and <cond_k>"` for the taken branch, or
/// `"<else> when not (<cond_1>) and .."` when every condition failed.
fn render_simplified_conditional(node: &Node, is_else: bool) -> String {
    let operands = node.operands();
    let expr = &operands[operands.len() - 1];
    let conds = &operands[..operands.len() - 1];
    let joined = conds
        .iter()
        .map(|c| {
            if is_else {
                format!("not ({})", render_operand(c))
            } else {
                render_operand(c)
            }
        })
        .collect::<Vec<_>>()
        .join(" and ");
    format!("{} when {}", render_operand(expr), joined)
}

/// Renders an unsimplified `Conditional` chain literally, branch by branch.
/// The spec only defines the simplified rendering; this is the reasonable
/// fallback for a caller that renders before simplifying.
fn render_full_conditional(node: &Node) -> String {
    let operands = node.operands();
    let num_conds = (operands.len() - 1) / 2;
    let mut parts = Vec::with_capacity(num_conds + 1);
    for i in 0..num_conds {
        let cond = &operands[2 * i];
        let then = &operands[2 * i + 1];
        parts.push(format!("{} when {}", render_operand(then), render_operand(cond)));
    }
    parts.push(format!("else {}", render_operand(&operands[operands.len() - 1])));
    parts.join(", ")
}
