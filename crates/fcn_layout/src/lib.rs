//! Gate-level layouts for field-coupled nanocomputing.
//!
//! A layout is a rectangular grid of tiles. Each ground tile holds at most one
//! element (an input pin, an output pin, a wire segment or a gate) and may
//! carry a second wire segment on a crossing layer above it. Signals flow
//! between adjacent tiles in the direction prescribed by a [`ClockingScheme`].
//!
//! The exact placement engine produces layouts through the
//! [`GateLevelLayout`] capability trait. [`GateLayout`] is the plain
//! implementation; [`SyncGateLayout`] adds per-tile synchronization delays.

#![warn(missing_docs)]

pub mod clocking;
pub mod coordinates;
pub mod layout;
pub mod simulate;
pub mod topology;
pub mod verify;

pub use clocking::{clocking_scheme, ClockingScheme, SUPPORTED_SCHEMES};
pub use coordinates::{AspectRatio, Direction, Tile};
pub use layout::{
    ElementFunction, GateLayout, GateLevelLayout, LayoutCapabilities, LayoutError, Signal,
    SyncGateLayout, SynchronizationElements, TileElement,
};
pub use simulate::simulate_layout;
pub use topology::Topology;
pub use verify::{verify_layout, Violation};
