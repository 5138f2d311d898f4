//! The immutable tree node: every node carries its own already-evaluated
//! value, so walking a tree never re-runs arithmetic or comparisons.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Process-wide unique identifier minted once per constructed node.
///
/// Two trees built in the same process never collide on id, which is what
/// lets [`crate::record::flatten`] use raw ids as parent/child links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    pub(crate) fn next() -> Self {
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed vocabulary of operators a node can carry. This is also the
/// persisted tag vocabulary used by [`crate::record::Record::operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Leaf,
    Plus,
    Minus,
    Times,
    DividedBy,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
    Not,
    Conditional,
    Lookup,
    UncertainLookup,
}

impl Operator {
    pub fn tag(&self) -> &'static str {
        match self {
            Operator::Leaf => "leaf",
            Operator::Plus => "plus",
            Operator::Minus => "minus",
            Operator::Times => "times",
            Operator::DividedBy => "divided_by",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Conditional => "conditional",
            Operator::Lookup => "lookup",
            Operator::UncertainLookup => "uncertain_lookup",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Operator> {
        Some(match tag {
            "leaf" => Operator::Leaf,
            "plus" => Operator::Plus,
            "minus" => Operator::Minus,
            "times" => Operator::Times,
            "divided_by" => Operator::DividedBy,
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            "conditional" => Operator::Conditional,
            "lookup" => Operator::Lookup,
            "uncertain_lookup" => Operator::UncertainLookup,
            _ => return None,
        })
    }
}

/// Metadata that doesn't fit the generic `(operator, operands, value)` shape
/// but is needed by a specific operator's builder or simplifier.
///
/// None of this is required to survive a flatten/reconstruct round trip —
/// see `DESIGN.md` for what that means for reconstructed conditional nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaseLabels {
    /// A freshly built, not-yet-simplified `Conditional`. `taken` is the
    /// index of the live `(cond, then)` pair (`0..num_conds`), or
    /// `num_conds` if no condition held and the `else` arm is live.
    Conditional { taken: usize },
    /// A `Conditional` produced by [`crate::simplify::simplify`]. Operands
    /// are `[cond_1, .., cond_k, expr]`; `is_else` says whether `expr` is
    /// the taken `then` (false) or the `else` arm (true).
    SimplifiedConditional { is_else: bool },
    Lookup { key: Value },
    UncertainLookup { key: Value, used_default: bool },
    /// Left behind by `simplify`'s `Not` erasure on an atomic (`Leaf`/
    /// `Lookup`/`UncertainLookup`) operand. The node's own `value` is the
    /// already-inverted post-`Not` result (the `<value> because` prefix and
    /// any further causal use read it directly); `display_value` is the
    /// pre-negation value the node still renders as, since erasing `Not`
    /// doesn't change what the operand itself was bound to.
    NotErased { display_value: Value },
    /// Marks a node produced by `simplify`'s `And`/`Or` duality rewrite
    /// (`And` with value `false` rewritten to `Or`, or vice versa) as
    /// already causally minimal, so a later `simplify` pass doesn't flip
    /// the connective back instead of leaving it a fixed point.
    SimplifiedConnective,
}

/// An immutable node in an expression tree.
///
/// A `Node` always carries its final, already-computed `value` — there is
/// no lazy or re-entrant evaluation step anywhere in this crate.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: Option<String>,
    value: Value,
    operator: Operator,
    operands: Vec<Rc<Node>>,
    case_labels: Option<CaseLabels>,
}

impl Node {
    pub(crate) fn new(
        name: Option<String>,
        value: Value,
        operator: Operator,
        operands: Vec<Rc<Node>>,
        case_labels: Option<CaseLabels>,
    ) -> Rc<Node> {
        Rc::new(Node {
            id: NodeId::next(),
            name,
            value,
            operator,
            operands,
            case_labels,
        })
    }

    /// Builds a node around an already-known id and value, bypassing the
    /// normal evaluate-at-construction path. Used only by
    /// [`crate::record::reconstruct`], which restores values it already
    /// persisted rather than recomputing them.
    pub(crate) fn from_parts(
        id: NodeId,
        name: Option<String>,
        value: Value,
        operator: Operator,
        operands: Vec<Rc<Node>>,
        case_labels: Option<CaseLabels>,
    ) -> Rc<Node> {
        Rc::new(Node {
            id,
            name,
            value,
            operator,
            operands,
            case_labels,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Rc<Node>] {
        &self.operands
    }

    pub fn case_labels(&self) -> Option<&CaseLabels> {
        self.case_labels.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.operator, Operator::Leaf)
    }
}
