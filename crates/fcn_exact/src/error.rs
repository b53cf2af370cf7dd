//! Errors reported by the exact engine.

use fcn_common::InternalError;
use fcn_config::ConfigError;
use fcn_network::NodeId;

/// Reasons the exact engine refuses to run or fails while running.
///
/// Exhausting the search space or the timeout is not an error; it yields an
/// outcome without a layout.
#[derive(Debug, thiserror::Error)]
pub enum ExactError {
    /// The requested clocking scheme is not in the registry.
    #[error("unsupported clocking scheme `{0}`")]
    UnsupportedClockingScheme(String),
    /// A node has more fan-ins than any tile of the scheme can receive.
    #[error("network has nodes with more than {max_in_degree} fan-ins")]
    HighDegreeFanin {
        /// Largest in-degree of the clocking scheme.
        max_in_degree: u8,
    },
    /// A gate reads the same signal on more than one operand.
    #[error("node {node} reads {operand} more than once")]
    RepeatedOperand {
        /// The reading gate.
        node: NodeId,
        /// The signal it reads twice.
        operand: NodeId,
    },
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A broken invariant inside the engine.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
