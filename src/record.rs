//! Bidirectional mapping between a tree and a flat, persistable sequence of
//! records — the shape a `Sink`/`Source` actually writes and reads.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::node::{CaseLabels, Node, NodeId, Operator};
use crate::value::Value;

/// One row of a flattened tree. `id`/`parent_id` link rows back into a
/// tree; `child_index` records the operand's position so reconstruction
/// restores operand order exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub name: Option<String>,
    pub value: serde_json::Value,
    pub operator: String,
    pub child_index: u32,
}

/// Flattens `root` into a pre-order sequence of `Record`s. Values round
/// trip as JSON for transport; operators round trip as their string tags.
pub fn flatten(root: &Rc<Node>) -> Vec<Record> {
    let mut out = Vec::new();
    flatten_into(root, None, 0, &mut out);
    out
}

fn flatten_into(node: &Rc<Node>, parent_id: Option<u64>, child_index: u32, out: &mut Vec<Record>) {
    out.push(Record {
        id: node.id().raw(),
        parent_id,
        name: node.name().map(str::to_string),
        value: value_to_json(node.value()),
        operator: node.operator().tag().to_string(),
        child_index,
    });
    for (i, child) in node.operands().iter().enumerate() {
        flatten_into(child, Some(node.id().raw()), i as u32, out);
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).expect("Value always serializes to JSON")
}

fn value_from_json(value: &serde_json::Value) -> Result<Value, EvalError> {
    serde_json::from_value(value.clone())
        .map_err(|e| EvalError::IntegrityError(format!("invalid value payload: {e}")))
}

/// Rebuilds a tree from records produced by [`flatten`].
///
/// Reconstruction restores values, operators, names, operand order, and
/// tree shape exactly. It does **not** restore [`CaseLabels`] metadata —
/// `Record` has no column for it — so `Lookup`/`UncertainLookup` case
/// labels are derived best-effort (an `UncertainLookup`'s `used_default`
/// flag cannot be recovered and comes back as `false`), and `Conditional`
/// nodes are always reconstructed as a full, not-yet-simplified chain: a
/// tree that was flattened *after* calling `simplify()` reconstructs with
/// its conditional reinterpreted against the full-chain shape. Persist
/// before simplifying if the distinction matters to you.
pub fn reconstruct(records: &[Record]) -> Result<Rc<Node>, EvalError> {
    if records.is_empty() {
        return Err(EvalError::IntegrityError("no records to reconstruct".into()));
    }

    let mut by_id: hashbrown::HashMap<u64, &Record> = hashbrown::HashMap::new();
    for r in records {
        if by_id.insert(r.id, r).is_some() {
            return Err(EvalError::IntegrityError(format!("duplicate record id {}", r.id)));
        }
    }

    let mut children: hashbrown::HashMap<u64, Vec<&Record>> = hashbrown::HashMap::new();
    let mut roots = Vec::new();
    for r in records {
        match r.parent_id {
            Some(pid) => {
                if !by_id.contains_key(&pid) {
                    return Err(EvalError::IntegrityError(format!(
                        "record {} references missing parent {pid}",
                        r.id
                    )));
                }
                children.entry(pid).or_default().push(r);
            }
            None => roots.push(r),
        }
    }
    if roots.len() != 1 {
        return Err(EvalError::IntegrityError(format!(
            "expected exactly one root record, found {}",
            roots.len()
        )));
    }

    let mut visiting = hashbrown::HashSet::new();
    build_node(roots[0], &children, &mut visiting)
}

fn build_node<'a>(
    record: &'a Record,
    children: &hashbrown::HashMap<u64, Vec<&'a Record>>,
    visiting: &mut hashbrown::HashSet<u64>,
) -> Result<Rc<Node>, EvalError> {
    if !visiting.insert(record.id) {
        return Err(EvalError::IntegrityError(format!(
            "cycle detected at record {}",
            record.id
        )));
    }

    let operator = Operator::from_tag(&record.operator)
        .ok_or_else(|| EvalError::IntegrityError(format!("unknown operator tag {:?}", record.operator)))?;

    let mut kids = children.get(&record.id).cloned().unwrap_or_default();
    kids.sort_by_key(|r| r.child_index);
    let operand_nodes = kids
        .iter()
        .map(|k| build_node(k, children, visiting))
        .collect::<Result<Vec<_>, _>>()?;

    let value = value_from_json(&record.value)?;
    let case_labels = derive_case_labels(operator, &operand_nodes);

    visiting.remove(&record.id);
    Ok(Node::from_parts(
        NodeId::from_raw(record.id),
        record.name.clone(),
        value,
        operator,
        operand_nodes,
        case_labels,
    ))
}

fn derive_case_labels(operator: Operator, operands: &[Rc<Node>]) -> Option<CaseLabels> {
    match operator {
        Operator::Lookup => operands.first().map(|key_node| CaseLabels::Lookup {
            key: key_node.value().clone(),
        }),
        Operator::UncertainLookup => operands.first().map(|key_node| CaseLabels::UncertainLookup {
            key: key_node.value().clone(),
            used_default: false,
        }),
        Operator::Conditional => {
            let num_conds = operands.len() / 2;
            let taken = (0..num_conds)
                .find(|&i| matches!(operands[2 * i].value(), Value::Bool(true)))
                .unwrap_or(num_conds);
            Some(CaseLabels::Conditional { taken })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{conditional, int, Binding, IntoOperand};
    use crate::render::render;

    fn leaf(name: &str, value: impl Into<Value>) -> Rc<Node> {
        Binding::named(name, value).into_operand()
    }

    #[test]
    fn flatten_then_reconstruct_preserves_shape_and_values() {
        let a = int(leaf("a", 2)).unwrap();
        let b = leaf("b", 3);
        let tree = a.plus(b).unwrap();
        let records = flatten(tree.node());
        let rebuilt = reconstruct(&records).unwrap();
        assert_eq!(rebuilt.operator(), tree.node().operator());
        assert_eq!(*rebuilt.value(), *tree.node().value());
        assert_eq!(rebuilt.operands().len(), tree.node().operands().len());
        assert_eq!(render(&rebuilt), render(tree.node()));
    }

    #[test]
    fn reconstruct_rejects_dangling_parent() {
        let records = vec![Record {
            id: 2,
            parent_id: Some(1),
            name: None,
            value: serde_json::json!({"int": 1}),
            operator: "leaf".into(),
            child_index: 0,
        }];
        assert!(matches!(reconstruct(&records), Err(EvalError::IntegrityError(_))));
    }

    #[test]
    fn reconstruct_rejects_multiple_roots() {
        let records = vec![
            Record {
                id: 1,
                parent_id: None,
                name: None,
                value: serde_json::json!({"int": 1}),
                operator: "leaf".into(),
                child_index: 0,
            },
            Record {
                id: 2,
                parent_id: None,
                name: None,
                value: serde_json::json!({"int": 2}),
                operator: "leaf".into(),
                child_index: 0,
            },
        ];
        assert!(matches!(reconstruct(&records), Err(EvalError::IntegrityError(_))));
    }

    #[test]
    fn conditional_round_trips_through_records() {
        let cond1 = crate::builder::boolean(leaf("c1", true)).unwrap();
        let then1 = int(leaf("t1", 1)).unwrap();
        let else_ = int(leaf("e", 2)).unwrap();
        let result = conditional::if_(cond1).unwrap().then(then1).else_(else_);
        let records = flatten(result.node());
        let rebuilt = reconstruct(&records).unwrap();
        assert_eq!(*rebuilt.value(), Value::Int(1));
        assert_eq!(rebuilt.operands().len(), result.node().operands().len());
    }
}
