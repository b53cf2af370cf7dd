//! The logic network graph.

use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeKind};
use fcn_common::{Ident, Interner, TruthTable};
use std::sync::Arc;

/// A primary output: a named reference to its driving node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimaryOutput {
    /// The node whose value is exposed.
    pub driver: NodeId,
    /// Output name.
    pub name: Ident,
}

/// Errors raised while building a network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The number of fan-ins does not match the node kind.
    #[error("{kind} expects {expected} fan-ins, got {found}")]
    ArityMismatch {
        /// Requested kind.
        kind: NodeKind,
        /// Fan-ins the kind requires.
        expected: usize,
        /// Fan-ins supplied.
        found: usize,
    },
    /// Constants and primary inputs have their own constructors.
    #[error("{0} cannot be created as a gate")]
    NotAGate(NodeKind),
    /// A fan-in does not belong to this network.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// A combinational logic network.
///
/// Nodes are appended to an arena, so a node's fan-ins always exist before
/// the node itself. Rewiring passes may later insert buffers between existing
/// nodes, which is why [`TopologicalView`](crate::TopologicalView) rather than
/// arena order is used wherever a topological order is required.
#[derive(Clone, Debug)]
pub struct LogicNetwork {
    name: Option<Ident>,
    nodes: Arena<NodeId, Node>,
    pis: Vec<NodeId>,
    pi_names: Vec<Ident>,
    pos: Vec<PrimaryOutput>,
    constants: [Option<NodeId>; 2],
    interner: Arc<Interner>,
}

impl Default for LogicNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicNetwork {
    /// Creates an empty network with its own interner.
    pub fn new() -> Self {
        Self::with_interner(Arc::new(Interner::new()))
    }

    /// Creates an empty network sharing an existing interner.
    pub fn with_interner(interner: Arc<Interner>) -> Self {
        Self {
            name: None,
            nodes: Arena::new(),
            pis: Vec::new(),
            pi_names: Vec::new(),
            pos: Vec::new(),
            constants: [None, None],
            interner,
        }
    }

    /// Creates an empty network that shares this network's interner and name.
    pub fn empty_like(&self) -> Self {
        let mut ntk = Self::with_interner(Arc::clone(&self.interner));
        ntk.name = self.name;
        ntk
    }

    /// Returns the interner holding all names of this network.
    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }

    /// Sets the network name.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(self.interner.get_or_intern(name));
    }

    /// Returns the network name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.map(|n| self.interner.resolve(n))
    }

    /// Returns the node for a constant value, creating it on first use.
    pub fn get_constant(&mut self, value: bool) -> NodeId {
        let slot = usize::from(value);
        if let Some(id) = self.constants[slot] {
            return id;
        }
        let id = self.nodes.alloc(Node::new(NodeKind::Constant(value), Vec::new()));
        self.constants[slot] = Some(id);
        id
    }

    /// Creates a named primary input.
    pub fn create_pi(&mut self, name: &str) -> NodeId {
        let id = self.nodes.alloc(Node::new(NodeKind::PrimaryInput, Vec::new()));
        self.pis.push(id);
        self.pi_names.push(self.interner.get_or_intern(name));
        id
    }

    /// Creates a named primary output driven by `driver`.
    pub fn create_po(&mut self, driver: NodeId, name: &str) {
        self.nodes[driver].po_refs += 1;
        let name = self.interner.get_or_intern(name);
        self.pos.push(PrimaryOutput { driver, name });
    }

    /// Creates a gate of the given kind.
    pub fn create_node(&mut self, kind: NodeKind, fanins: &[NodeId]) -> Result<NodeId, NetworkError> {
        if !kind.is_gate() {
            return Err(NetworkError::NotAGate(kind));
        }
        if fanins.len() != kind.arity() {
            return Err(NetworkError::ArityMismatch {
                kind,
                expected: kind.arity(),
                found: fanins.len(),
            });
        }
        if let Some(&unknown) = fanins.iter().find(|&&f| !self.nodes.contains(f)) {
            return Err(NetworkError::UnknownNode(unknown));
        }
        let id = self.nodes.alloc(Node::new(kind, fanins.to_vec()));
        for &f in fanins {
            self.nodes[f].fanouts.push(id);
        }
        Ok(id)
    }

    fn create_fixed(&mut self, kind: NodeKind, fanins: &[NodeId]) -> NodeId {
        let id = self.nodes.alloc(Node::new(kind, fanins.to_vec()));
        for &f in fanins {
            self.nodes[f].fanouts.push(id);
        }
        id
    }

    /// Creates a buffer.
    pub fn create_buf(&mut self, a: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Buffer, &[a])
    }

    /// Creates an inverter.
    pub fn create_not(&mut self, a: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Inverter, &[a])
    }

    /// Creates a two-input AND.
    pub fn create_and(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::And, &[a, b])
    }

    /// Creates a two-input OR.
    pub fn create_or(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Or, &[a, b])
    }

    /// Creates a two-input NAND.
    pub fn create_nand(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Nand, &[a, b])
    }

    /// Creates a two-input NOR.
    pub fn create_nor(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Nor, &[a, b])
    }

    /// Creates a two-input XOR.
    pub fn create_xor(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Xor, &[a, b])
    }

    /// Creates a two-input XNOR.
    pub fn create_xnor(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Xnor, &[a, b])
    }

    /// Creates a three-input majority.
    pub fn create_maj(&mut self, a: NodeId, b: NodeId, c: NodeId) -> NodeId {
        self.create_fixed(NodeKind::Majority, &[a, b, c])
    }

    /// Points primary output `index` at a new driver.
    pub(crate) fn redirect_po(&mut self, index: usize, driver: NodeId) {
        let old = self.pos[index].driver;
        self.nodes[old].po_refs -= 1;
        self.nodes[driver].po_refs += 1;
        self.pos[index].driver = driver;
    }

    /// Returns the node record.
    ///
    /// # Panics
    ///
    /// Panics if `n` does not belong to this network.
    pub fn node(&self, n: NodeId) -> &Node {
        &self.nodes[n]
    }

    /// Returns the kind of a node.
    pub fn kind(&self, n: NodeId) -> NodeKind {
        self.nodes[n].kind
    }

    /// Returns the fan-ins of a node.
    pub fn fanins(&self, n: NodeId) -> &[NodeId] {
        &self.nodes[n].fanins
    }

    /// Returns the consuming nodes of a node, without primary outputs.
    pub fn fanouts(&self, n: NodeId) -> &[NodeId] {
        &self.nodes[n].fanouts
    }

    /// Returns the number of consumers including primary output references.
    pub fn fanout_size(&self, n: NodeId) -> usize {
        self.nodes[n].fanout_size()
    }

    /// Returns the number of fan-ins.
    pub fn fanin_size(&self, n: NodeId) -> usize {
        self.nodes[n].fanins.len()
    }

    /// Returns the Boolean function of a node, `None` for primary inputs.
    pub fn node_function(&self, n: NodeId) -> Option<TruthTable> {
        self.nodes[n].kind.function()
    }

    /// Iterates over all node IDs in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids()
    }

    /// Returns the total number of nodes, constants included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes that are neither constants nor primary inputs.
    pub fn num_gates(&self) -> usize {
        self.nodes.iter().filter(|(_, n)| n.kind.is_gate()).count()
    }

    /// Returns the primary inputs in creation order.
    pub fn pis(&self) -> &[NodeId] {
        &self.pis
    }

    /// Returns the primary outputs in creation order.
    pub fn pos(&self) -> &[PrimaryOutput] {
        &self.pos
    }

    /// Returns the number of primary inputs.
    pub fn num_pis(&self) -> usize {
        self.pis.len()
    }

    /// Returns the number of primary outputs.
    pub fn num_pos(&self) -> usize {
        self.pos.len()
    }

    /// Returns the name of primary input `index`.
    pub fn pi_name(&self, index: usize) -> &str {
        self.interner.resolve(self.pi_names[index])
    }

    /// Returns the name of primary output `index`.
    pub fn po_name(&self, index: usize) -> &str {
        self.interner.resolve(self.pos[index].name)
    }

    /// Returns the position of `n` among the primary inputs.
    pub fn pi_index(&self, n: NodeId) -> Option<usize> {
        self.pis.iter().position(|&p| p == n)
    }

    /// Returns `true` for constant nodes.
    pub fn is_constant(&self, n: NodeId) -> bool {
        matches!(self.nodes[n].kind, NodeKind::Constant(_))
    }

    /// Returns `true` for primary inputs.
    pub fn is_pi(&self, n: NodeId) -> bool {
        self.nodes[n].kind == NodeKind::PrimaryInput
    }

    /// Returns `true` if the node drives at least one primary output.
    pub fn is_po(&self, n: NodeId) -> bool {
        self.nodes[n].po_refs > 0
    }

    /// Returns `true` for buffers.
    pub fn is_buf(&self, n: NodeId) -> bool {
        self.nodes[n].kind == NodeKind::Buffer
    }

    /// Returns `true` for buffers with more than one consumer.
    pub fn is_fanout(&self, n: NodeId) -> bool {
        self.is_buf(n) && self.fanout_size(n) > 1
    }

    /// Returns `true` for inverters.
    pub fn is_inv(&self, n: NodeId) -> bool {
        self.nodes[n].kind == NodeKind::Inverter
    }

    /// Returns the largest fan-in count of any node.
    pub fn max_fanin_size(&self) -> usize {
        self.nodes.iter().map(|(_, n)| n.fanins.len()).max().unwrap_or(0)
    }

    /// Returns `true` if some node has more than `limit` fan-ins.
    pub fn has_high_degree_fanin(&self, limit: usize) -> bool {
        self.max_fanin_size() > limit
    }

    /// Returns the first node reading the same non-constant signal more than
    /// once, together with that signal.
    pub fn find_repeated_fanin(&self) -> Option<(NodeId, NodeId)> {
        self.node_ids().find_map(|n| {
            let fanins = self.fanins(n);
            fanins.iter().enumerate().find_map(|(i, &f)| {
                (!self.is_constant(f) && fanins[i + 1..].contains(&f)).then_some((n, f))
            })
        })
    }
}
