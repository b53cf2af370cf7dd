//! Node identifiers and node kinds.

use crate::arena::ArenaId;
use fcn_common::TruthTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, copyable ID of a node in a [`LogicNetwork`](crate::LogicNetwork).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the raw index as `usize`, for indexing per-node vectors.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ArenaId for NodeId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What a node computes.
///
/// Fan-outs are buffers with more than one consumer; they are not a separate
/// kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// Constant `false` or `true`.
    Constant(bool),
    /// A primary input.
    PrimaryInput,
    /// Identity. Used for wires, fan-outs and dedicated output nodes.
    Buffer,
    /// Negation.
    Inverter,
    /// Two-input AND.
    And,
    /// Two-input OR.
    Or,
    /// Two-input NAND.
    Nand,
    /// Two-input NOR.
    Nor,
    /// Two-input XOR.
    Xor,
    /// Two-input XNOR.
    Xnor,
    /// Three-input majority.
    Majority,
}

impl NodeKind {
    /// Returns the number of fan-ins a node of this kind has.
    pub fn arity(self) -> usize {
        match self {
            NodeKind::Constant(_) | NodeKind::PrimaryInput => 0,
            NodeKind::Buffer | NodeKind::Inverter => 1,
            NodeKind::Majority => 3,
            _ => 2,
        }
    }

    /// Returns the Boolean function, or `None` for primary inputs.
    pub fn function(self) -> Option<TruthTable> {
        Some(match self {
            NodeKind::Constant(v) => TruthTable::constant(v),
            NodeKind::PrimaryInput => return None,
            NodeKind::Buffer => TruthTable::identity(),
            NodeKind::Inverter => TruthTable::not(),
            NodeKind::And => TruthTable::and(),
            NodeKind::Or => TruthTable::or(),
            NodeKind::Nand => TruthTable::nand(),
            NodeKind::Nor => TruthTable::nor(),
            NodeKind::Xor => TruthTable::xor(),
            NodeKind::Xnor => TruthTable::xnor(),
            NodeKind::Majority => TruthTable::majority(),
        })
    }

    /// Returns `true` for kinds created through `create_node`, i.e. neither
    /// constants nor primary inputs.
    pub fn is_gate(self) -> bool {
        !matches!(self, NodeKind::Constant(_) | NodeKind::PrimaryInput)
    }

    /// Returns `true` for AND, OR and majority, the gates ToPoliNano treats
    /// as conjunctive/disjunctive cells.
    pub fn is_and_or_maj(self) -> bool {
        matches!(self, NodeKind::And | NodeKind::Or | NodeKind::Majority)
    }

    /// Evaluates the node on its fan-in values.
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        match self.function() {
            Some(tt) => tt.evaluate(inputs),
            None => inputs.first().copied().unwrap_or(false),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Constant(false) => "const0",
            NodeKind::Constant(true) => "const1",
            NodeKind::PrimaryInput => "pi",
            NodeKind::Buffer => "buf",
            NodeKind::Inverter => "not",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Nand => "nand",
            NodeKind::Nor => "nor",
            NodeKind::Xor => "xor",
            NodeKind::Xnor => "xnor",
            NodeKind::Majority => "maj",
        })
    }
}

/// A node record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// What the node computes.
    pub kind: NodeKind,
    /// Driving nodes, in operand order.
    pub fanins: Vec<NodeId>,
    /// Consuming nodes. A node consuming this one twice appears twice.
    pub fanouts: Vec<NodeId>,
    /// Number of primary outputs driven by this node.
    pub po_refs: u32,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, fanins: Vec<NodeId>) -> Self {
        Self {
            kind,
            fanins,
            fanouts: Vec::new(),
            po_refs: 0,
        }
    }

    /// Returns the number of consumers, counting primary output references.
    pub fn fanout_size(&self) -> usize {
        self.fanouts.len() + self.po_refs as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_function() {
        for kind in [
            NodeKind::Buffer,
            NodeKind::Inverter,
            NodeKind::And,
            NodeKind::Xnor,
            NodeKind::Majority,
        ] {
            let tt = kind.function().unwrap();
            assert_eq!(usize::from(tt.num_vars()), kind.arity(), "{kind}");
        }
        assert!(NodeKind::PrimaryInput.function().is_none());
    }

    #[test]
    fn evaluate_gates() {
        assert!(NodeKind::Nand.evaluate(&[true, false]));
        assert!(!NodeKind::Nor.evaluate(&[true, false]));
        assert!(NodeKind::Inverter.evaluate(&[false]));
        assert!(NodeKind::Constant(true).evaluate(&[]));
        assert!(NodeKind::PrimaryInput.evaluate(&[true]));
    }

    #[test]
    fn gate_classification() {
        assert!(!NodeKind::PrimaryInput.is_gate());
        assert!(!NodeKind::Constant(false).is_gate());
        assert!(NodeKind::Buffer.is_gate());
        assert!(NodeKind::Majority.is_and_or_maj());
        assert!(!NodeKind::Xor.is_and_or_maj());
    }

    #[test]
    fn node_id_display_and_serde() {
        let id = NodeId::from_raw(12);
        assert_eq!(id.to_string(), "n12");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<NodeId>(&json).unwrap(), id);
    }
}
