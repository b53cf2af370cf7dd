//! Logic networks consumed by the exact physical design engine.
//!
//! A [`LogicNetwork`] is a directed acyclic graph of primary inputs, constants
//! and gates stored in an [`Arena`]. Primary outputs reference their driving
//! node. The crate also provides the network-side preprocessing the engine
//! relies on:
//!
//! - [`TopologicalView`]: topological order, levels, inverse levels and depth
//! - [`all_incoming_edge_paths`]: every input-to-node path as a list of edges
//! - [`fanout_substitution`] and [`substitute_po_signals`]: bounded out-degree
//!   and dedicated output nodes
//! - [`simulate`]: exhaustive functional simulation
//! - [`random_network`] and [`blueprints`]: seeded and hand-made benchmarks

#![warn(missing_docs)]

pub mod arena;
pub mod blueprints;
pub mod network;
pub mod node;
pub mod paths;
pub mod random;
pub mod simulate;
pub mod substitution;
pub mod topo;

pub use arena::{Arena, ArenaId};
pub use network::{LogicNetwork, NetworkError, PrimaryOutput};
pub use node::{Node, NodeId, NodeKind};
pub use paths::{all_incoming_edge_paths, Edge, EdgePath};
pub use random::{random_network, RandomNetworkConfig};
pub use simulate::{simulate, truth_tables};
pub use substitution::{
    fanout_substitution, is_fanout_substituted, substitute_po_signals, FanoutSubstitutionParams,
    SubstitutionStrategy,
};
pub use topo::TopologicalView;
