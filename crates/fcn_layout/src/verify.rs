//! Design-rule checks for placed layouts.

use crate::coordinates::Tile;
use crate::layout::{ElementFunction, GateLayout, Signal};
use fcn_network::NodeKind;

/// A design-rule violation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// An element lies outside the layout.
    #[error("element on {0} lies outside the layout")]
    OutOfBounds(Tile),
    /// A signal refers to a tile without an element.
    #[error("{tile} reads from empty tile {source_tile}")]
    MissingSource {
        /// Reading tile.
        tile: Tile,
        /// Referenced tile.
        source_tile: Tile,
    },
    /// A signal comes from a tile that does not touch the reader.
    #[error("{tile} reads from non-adjacent tile {source_tile}")]
    NonAdjacent {
        /// Reading tile.
        tile: Tile,
        /// Driving tile.
        source_tile: Tile,
    },
    /// A signal runs against the clock flow.
    #[error("{tile} reads from {source_tile} against the clock flow")]
    AgainstClock {
        /// Reading tile.
        tile: Tile,
        /// Driving tile.
        source_tile: Tile,
    },
    /// Only wire segments may occupy the crossing layer.
    #[error("non-wire element on crossing tile {0}")]
    CrossingNotWire(Tile),
    /// A reserved primary input was never placed.
    #[error("primary input {0} is not placed")]
    UnplacedInput(usize),
    /// The number of incoming signals does not match the element.
    #[error("{tile} has {found} inputs, expected {expected}")]
    FaninMismatch {
        /// Offending tile.
        tile: Tile,
        /// Inputs the element requires.
        expected: usize,
        /// Inputs present.
        found: usize,
    },
    /// A signal other than a fan-out feeds more than one element.
    #[error("{tile} drives {consumers} elements but is not a fan-out")]
    Overused {
        /// Driving tile.
        tile: Tile,
        /// Number of consumers.
        consumers: usize,
    },
}

/// Checks `layout` against the design rules and returns every violation.
///
/// An empty result means the layout is well-formed: every element sits
/// inside the grid, reads only from occupied, adjacent, correctly clocked
/// tiles, and has as many inputs as its function requires.
pub fn verify_layout(layout: &GateLayout) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (index, placed) in layout.input_tiles().iter().enumerate() {
        if placed.is_none() {
            violations.push(Violation::UnplacedInput(index));
        }
    }

    for (t, element) in layout.elements() {
        if !layout.contains(t) {
            violations.push(Violation::OutOfBounds(t));
        }
        if !t.is_ground() && !element.is_wire() {
            violations.push(Violation::CrossingNotWire(t));
        }

        let expected = match element.function {
            ElementFunction::Input(_) => 0,
            ElementFunction::Output(_) => 1,
            ElementFunction::Logic(kind) => kind.arity(),
        };
        if element.inputs.len() != expected {
            violations.push(Violation::FaninMismatch {
                tile: t,
                expected,
                found: element.inputs.len(),
            });
        }

        for &signal in &element.inputs {
            let Signal::Tile(src) = signal else {
                continue;
            };
            if layout.is_empty_tile(src) {
                violations.push(Violation::MissingSource {
                    tile: t,
                    source_tile: src,
                });
            } else if !layout.topology().is_adjacent(src, t) {
                violations.push(Violation::NonAdjacent {
                    tile: t,
                    source_tile: src,
                });
            } else if !layout.is_incoming_clocked(t, src) {
                violations.push(Violation::AgainstClock {
                    tile: t,
                    source_tile: src,
                });
            }
        }

        let consumers = layout.consumers(t).len();
        let is_fanout = element.function == ElementFunction::Logic(NodeKind::Buffer);
        if consumers > 1 && !is_fanout {
            violations.push(Violation::Overused { tile: t, consumers });
        }
    }

    violations
}
