//! Where in the search a diagnostic applies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subject of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Location {
    /// The whole run, e.g. a parameter warning.
    Global,
    /// A candidate layout shape.
    AspectRatio {
        /// Width in tiles.
        width: u16,
        /// Height in tiles.
        height: u16,
    },
    /// A node of the logic network, by raw index.
    Node(u32),
}

impl Location {
    /// Returns `true` for [`Location::Global`].
    pub fn is_global(&self) -> bool {
        matches!(self, Location::Global)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Global => f.write_str("<global>"),
            Location::AspectRatio { width, height } => write!(f, "{width} x {height}"),
            Location::Node(n) => write!(f, "node {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Location::AspectRatio { width: 3, height: 2 }.to_string(), "3 x 2");
        assert_eq!(Location::Node(7).to_string(), "node 7");
        assert!(Location::Global.is_global());
    }
}
