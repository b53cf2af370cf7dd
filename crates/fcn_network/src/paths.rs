//! Enumeration of input-to-node paths.

use crate::network::LogicNetwork;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// A directed connection from a driving node to a consuming node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Edge {
    /// Driving node.
    pub source: NodeId,
    /// Consuming node.
    pub target: NodeId,
}

impl Edge {
    /// Creates an edge.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

/// A path as the sequence of edges from a primary input to some node.
pub type EdgePath = Vec<Edge>;

/// Returns every path from a fan-in-free node to `n`.
///
/// A node without fan-ins yields a single empty path. Edges leaving constants
/// are not part of any path, so a gate fed only by constants yields none.
pub fn all_incoming_edge_paths(ntk: &LogicNetwork, n: NodeId) -> Vec<EdgePath> {
    if ntk.fanin_size(n) == 0 {
        return vec![Vec::new()];
    }
    let mut paths = Vec::new();
    for &f in ntk.fanins(n) {
        if ntk.is_constant(f) {
            continue;
        }
        for mut path in all_incoming_edge_paths(ntk, f) {
            path.push(Edge::new(f, n));
            paths.push(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_has_one_empty_path() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        assert_eq!(all_incoming_edge_paths(&ntk, a), vec![Vec::<Edge>::new()]);
    }

    #[test]
    fn reconvergent_paths() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_pi("b");
        let n = ntk.create_not(b);
        let f = ntk.create_and(a, n);
        let paths = all_incoming_edge_paths(&ntk, f);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], vec![Edge::new(a, f)]);
        assert_eq!(paths[1], vec![Edge::new(b, n), Edge::new(n, f)]);
    }

    #[test]
    fn constants_are_skipped() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let one = ntk.get_constant(true);
        let f = ntk.create_and(a, one);
        let g = ntk.create_not(one);
        assert_eq!(all_incoming_edge_paths(&ntk, f).len(), 1);
        assert!(all_incoming_edge_paths(&ntk, g).is_empty());
    }
}
