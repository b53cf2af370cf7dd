//! The placeable view of a preprocessed network.
//!
//! Constants are not placed; every other node becomes a vertex and every
//! connection between two vertices an edge. Vertices and edges are numbered
//! densely so the model can key its variables by index.

use fcn_common::{FcnResult, InternalError, TruthTable};
use fcn_network::{all_incoming_edge_paths, LogicNetwork, NodeId, NodeKind, TopologicalView};
use std::collections::HashMap;

/// A connection between two vertices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertexEdge {
    /// Driving vertex.
    pub source: usize,
    /// Consuming vertex.
    pub target: usize,
}

/// A placeable node.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// Node in the preprocessed network.
    pub node: NodeId,
    /// What the node computes.
    pub kind: NodeKind,
    /// Function matched against blacklists; `None` for primary inputs.
    pub function: Option<TruthTable>,
    /// Position among the primary inputs.
    pub pi_index: Option<usize>,
    /// Position among the primary outputs, for dedicated output nodes.
    pub po_index: Option<usize>,
    /// Buffer with more than one consumer.
    pub is_fanout: bool,
    /// Incoming edges in operand order, constants omitted.
    pub in_edges: Vec<usize>,
    /// Outgoing edges.
    pub out_edges: Vec<usize>,
    /// Longest edge count from a vertex without incoming edges.
    pub level: u32,
    /// Longest edge count to a vertex without outgoing edges.
    pub inverse_level: u32,
}

impl Vertex {
    /// Returns `true` for primary inputs.
    pub fn is_pi(&self) -> bool {
        self.pi_index.is_some()
    }

    /// Returns `true` for dedicated output nodes.
    pub fn is_po(&self) -> bool {
        self.po_index.is_some()
    }

    /// Returns the number of incoming edges.
    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    /// Returns the number of outgoing edges.
    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }
}

/// A network after fan-out and output substitution, seen as vertices and
/// edges.
#[derive(Clone, Debug)]
pub struct PreparedNetwork {
    network: LogicNetwork,
    vertices: Vec<Vertex>,
    edges: Vec<VertexEdge>,
    vertex_of: HashMap<NodeId, usize>,
    edge_of: HashMap<(usize, usize), usize>,
    outputs: Vec<usize>,
    depth: u32,
}

impl PreparedNetwork {
    /// Builds the view. Vertices follow a topological order.
    ///
    /// Fails if a node reads the same signal twice, since its two
    /// connections could not be told apart.
    pub fn new(network: LogicNetwork) -> FcnResult<Self> {
        let view = TopologicalView::new(&network)?;
        let mut vertices = Vec::new();
        let mut vertex_of = HashMap::new();
        for &n in view.order() {
            if network.is_constant(n) {
                continue;
            }
            vertex_of.insert(n, vertices.len());
            vertices.push(Vertex {
                node: n,
                kind: network.kind(n),
                function: network.node_function(n),
                pi_index: network.pi_index(n),
                po_index: None,
                is_fanout: network.is_fanout(n),
                in_edges: Vec::new(),
                out_edges: Vec::new(),
                level: 0,
                inverse_level: 0,
            });
        }

        let mut edges = Vec::new();
        let mut edge_of = HashMap::new();
        for target in 0..vertices.len() {
            let n = vertices[target].node;
            for &f in network.fanins(n) {
                let Some(&source) = vertex_of.get(&f) else {
                    continue;
                };
                if edge_of.insert((source, target), edges.len()).is_some() {
                    return Err(InternalError::new(format!(
                        "{n} reads {f} more than once"
                    )));
                }
                vertices[source].out_edges.push(edges.len());
                vertices[target].in_edges.push(edges.len());
                edges.push(VertexEdge { source, target });
            }
        }

        let mut outputs = Vec::with_capacity(network.num_pos());
        for (index, po) in network.pos().iter().enumerate() {
            let v = *vertex_of.get(&po.driver).ok_or_else(|| {
                InternalError::new(format!("output {index} is driven by a constant"))
            })?;
            if vertices[v].po_index.is_some() || !vertices[v].out_edges.is_empty() {
                return Err(InternalError::new(format!(
                    "output {index} has no dedicated output node"
                )));
            }
            vertices[v].po_index = Some(index);
            outputs.push(v);
        }

        for v in 0..vertices.len() {
            let level = vertices[v]
                .in_edges
                .iter()
                .map(|&e| vertices[edges[e].source].level + 1)
                .max()
                .unwrap_or(0);
            vertices[v].level = level;
        }
        for v in (0..vertices.len()).rev() {
            let inverse = vertices[v]
                .out_edges
                .iter()
                .map(|&e| vertices[edges[e].target].inverse_level + 1)
                .max()
                .unwrap_or(0);
            vertices[v].inverse_level = inverse;
        }
        let depth = vertices.iter().map(|v| v.level).max().unwrap_or(0);

        Ok(Self {
            network,
            vertices,
            edges,
            vertex_of,
            edge_of,
            outputs,
            depth,
        })
    }

    /// Returns the preprocessed network.
    pub fn network(&self) -> &LogicNetwork {
        &self.network
    }

    /// Returns all vertices in topological order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns a vertex.
    pub fn vertex(&self, v: usize) -> &Vertex {
        &self.vertices[v]
    }

    /// Returns the number of vertices, the lower bound on the layout area.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns all edges.
    pub fn edges(&self) -> &[VertexEdge] {
        &self.edges
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex of a node, `None` for constants.
    pub fn vertex_of(&self, n: NodeId) -> Option<usize> {
        self.vertex_of.get(&n).copied()
    }

    /// Returns the edge between two vertices.
    pub fn edge_between(&self, source: usize, target: usize) -> Option<usize> {
        self.edge_of.get(&(source, target)).copied()
    }

    /// Returns the dedicated output vertices in output order.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Returns the primary input vertices.
    pub fn inputs(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.vertices.len()).filter(|&v| self.vertices[v].is_pi())
    }

    /// Returns the largest level of any vertex.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns every path from a source vertex into `v` as edge indices.
    pub fn incoming_paths(&self, v: usize) -> FcnResult<Vec<Vec<usize>>> {
        all_incoming_edge_paths(&self.network, self.vertices[v].node)
            .into_iter()
            .map(|path| {
                path.iter()
                    .map(|e| {
                        let source = self.vertex_of(e.source);
                        let target = self.vertex_of(e.target);
                        source
                            .zip(target)
                            .and_then(|(s, t)| self.edge_between(s, t))
                            .ok_or_else(|| {
                                InternalError::new(format!(
                                    "path edge {} -> {} is not a vertex edge",
                                    e.source, e.target
                                ))
                            })
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcn_network::{blueprints, substitute_po_signals};

    fn prepared(mut ntk: LogicNetwork) -> PreparedNetwork {
        substitute_po_signals(&mut ntk);
        PreparedNetwork::new(ntk).unwrap()
    }

    #[test]
    fn and_network_vertices() {
        let p = prepared(blueprints::and_network());
        // a, b, and, output buffer
        assert_eq!(p.num_vertices(), 4);
        assert_eq!(p.num_edges(), 3);
        assert_eq!(p.inputs().count(), 2);
        let out = p.outputs()[0];
        assert!(p.vertex(out).is_po());
        assert_eq!(p.vertex(out).level, 2);
        assert_eq!(p.depth(), 2);
        let and = p.edges()[p.vertex(out).in_edges[0]].source;
        assert_eq!(p.vertex(and).kind, NodeKind::And);
        assert_eq!(p.vertex(and).in_degree(), 2);
        assert_eq!(p.vertex(and).inverse_level, 1);
    }

    #[test]
    fn constants_are_not_vertices() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let one = ntk.get_constant(true);
        let f = ntk.create_and(a, one);
        ntk.create_po(f, "f");
        let p = prepared(ntk);
        assert_eq!(p.num_vertices(), 3);
        let and = p
            .vertices()
            .iter()
            .position(|v| v.kind == NodeKind::And)
            .unwrap();
        assert_eq!(p.vertex(and).in_degree(), 1);
    }

    #[test]
    fn duplicate_operands_are_rejected() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let f = ntk.create_xor(a, a);
        ntk.create_po(f, "f");
        substitute_po_signals(&mut ntk);
        assert!(PreparedNetwork::new(ntk).is_err());
    }

    #[test]
    fn paths_into_reconvergent_output() {
        let p = prepared(blueprints::unbalanced_and_inv());
        let paths = p.incoming_paths(p.outputs()[0]).unwrap();
        let mut lengths: Vec<usize> = paths.iter().map(Vec::len).collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![2, 3]);
    }
}
