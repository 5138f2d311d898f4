//! An embedded, explainable expression-tree builder and evaluator.
//!
//! A tree built through [`builder`] evaluates eagerly: every [`node::Node`]
//! already carries its final [`value::Value`] by the time a builder call
//! returns. [`simplify::simplify`] reduces a tree to the sub-tree that
//! actually caused its value; [`render::render`] turns either form into a
//! `"<value> because <expression>"` audit string; [`record`] flattens a
//! tree to a persistable row sequence and rebuilds it, behind the
//! storage-agnostic [`persist::Sink`]/[`persist::Source`] traits.

pub mod builder;
pub mod error;
pub mod node;
pub mod persist;
pub mod record;
pub mod render;
pub mod simplify;
pub mod value;

pub use builder::{
    all_of, any_of, boolean, float, if_, int, is_not_null, lookup, not, numeric, uncertain_lookup,
    Binding, Expr, IncompleteConditional, IntoOperand, LookupMap, PartialConditional,
};
pub use error::EvalError;
pub use node::{CaseLabels, Node, NodeId, Operator};
pub use persist::{Sink, Source};
pub use record::{flatten, reconstruct, Record};
pub use render::render;
pub use simplify::simplify;
pub use value::Value;

/// Re-exports everything most callers need with a single `use auditree::prelude::*;`.
pub mod prelude {
    pub use crate::builder::{
        all_of, any_of, boolean, float, if_, int, is_not_null, lookup, not, numeric,
        uncertain_lookup, Binding, Expr, IncompleteConditional, IntoOperand, LookupMap,
        PartialConditional,
    };
    pub use crate::error::EvalError;
    pub use crate::node::{CaseLabels, Node, NodeId, Operator};
    pub use crate::persist::{Sink, Source};
    pub use crate::record::{flatten, reconstruct, Record};
    pub use crate::render::render;
    pub use crate::simplify::simplify;
    pub use crate::value::Value;
}
