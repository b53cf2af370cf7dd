//! Topological order, levels and inverse levels.

use crate::network::LogicNetwork;
use crate::node::NodeId;
use fcn_common::{FcnResult, InternalError};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

/// Precomputed ordering information of a network.
///
/// Levels count gates on the longest path from any primary input or constant
/// (both at level 0). Inverse levels count the longest path towards a node
/// without consumers (at inverse level 0). Primary output references do not
/// count as consumers for inverse levels.
#[derive(Clone, Debug)]
pub struct TopologicalView {
    order: Vec<NodeId>,
    levels: Vec<u32>,
    inverse_levels: Vec<u32>,
    depth: u32,
}

impl TopologicalView {
    /// Computes the view.
    ///
    /// Fails only if the network contains a cycle, which the construction API
    /// does not allow.
    pub fn new(ntk: &LogicNetwork) -> FcnResult<Self> {
        let mut graph: DiGraph<NodeId, ()> = DiGraph::with_capacity(ntk.size(), ntk.size());
        for n in ntk.node_ids() {
            graph.add_node(n);
        }
        for n in ntk.node_ids() {
            for &f in ntk.fanins(n) {
                graph.add_edge(NodeIndex::new(f.index()), NodeIndex::new(n.index()), ());
            }
        }
        let order: Vec<NodeId> = toposort(&graph, None)
            .map_err(|cycle| {
                InternalError::new(format!(
                    "logic network contains a cycle through {}",
                    graph[cycle.node_id()]
                ))
            })?
            .into_iter()
            .map(|ix| graph[ix])
            .collect();

        let mut levels = vec![0u32; ntk.size()];
        for &n in &order {
            levels[n.index()] = ntk
                .fanins(n)
                .iter()
                .map(|f| levels[f.index()] + 1)
                .max()
                .unwrap_or(0);
        }

        let mut inverse_levels = vec![0u32; ntk.size()];
        for &n in order.iter().rev() {
            inverse_levels[n.index()] = ntk
                .fanouts(n)
                .iter()
                .map(|f| inverse_levels[f.index()] + 1)
                .max()
                .unwrap_or(0);
        }

        let depth = ntk
            .pos()
            .iter()
            .map(|po| levels[po.driver.index()])
            .max()
            .unwrap_or(0);

        Ok(Self {
            order,
            levels,
            inverse_levels,
            depth,
        })
    }

    /// Returns all nodes in topological order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns the level of a node.
    pub fn level(&self, n: NodeId) -> u32 {
        self.levels[n.index()]
    }

    /// Returns the inverse level of a node.
    pub fn inverse_level(&self, n: NodeId) -> u32 {
        self.inverse_levels[n.index()]
    }

    /// Returns the largest level of any primary output driver.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_levels() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_buf(a);
        let c = ntk.create_not(b);
        ntk.create_po(c, "f");
        let view = TopologicalView::new(&ntk).unwrap();
        assert_eq!(view.order(), &[a, b, c]);
        assert_eq!(view.level(c), 2);
        assert_eq!(view.depth(), 2);
        assert_eq!(view.inverse_level(a), 2);
        assert_eq!(view.inverse_level(c), 0);
    }

    #[test]
    fn order_respects_late_insertions() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_pi("b");
        let f = ntk.create_and(a, b);
        ntk.create_po(f, "f");
        let out = ntk.create_buf(f);
        ntk.redirect_po(0, out);
        let view = TopologicalView::new(&ntk).unwrap();
        let pos = |n: NodeId| view.order().iter().position(|&x| x == n).unwrap();
        assert!(pos(a) < pos(f));
        assert!(pos(f) < pos(out));
        assert_eq!(view.depth(), 2);
    }

    #[test]
    fn unbalanced_levels() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_pi("b");
        let n = ntk.create_not(b);
        let f = ntk.create_and(a, n);
        ntk.create_po(f, "f");
        let view = TopologicalView::new(&ntk).unwrap();
        assert_eq!(view.level(f), 2);
        assert_eq!(view.inverse_level(a), 1);
        assert_eq!(view.inverse_level(b), 2);
    }
}
