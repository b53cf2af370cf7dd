//! Gate-level layouts and the capability trait the placement engine targets.

use crate::clocking::ClockingScheme;
use crate::coordinates::{AspectRatio, Tile};
use crate::topology::Topology;
use fcn_network::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value feeding a tile element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Signal {
    /// The output of the element on a tile.
    Tile(Tile),
    /// A constant value. Constants occupy no tile.
    Constant(bool),
}

impl Signal {
    /// Returns the driving tile, if the signal is not constant.
    pub fn tile(self) -> Option<Tile> {
        match self {
            Signal::Tile(t) => Some(t),
            Signal::Constant(_) => None,
        }
    }
}

/// What an element computes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementFunction {
    /// Primary input pin with its index.
    Input(usize),
    /// Primary output pin with its index.
    Output(usize),
    /// A logic function. [`NodeKind::Buffer`] denotes a wire segment, or a
    /// fan-out when it has several consumers.
    Logic(NodeKind),
}

/// The content of an occupied tile.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TileElement {
    /// What the element computes.
    pub function: ElementFunction,
    /// Incoming signals in operand order.
    pub inputs: Vec<Signal>,
}

impl TileElement {
    /// Returns `true` for wire segments and fan-outs.
    pub fn is_wire(&self) -> bool {
        self.function == ElementFunction::Logic(NodeKind::Buffer)
    }

    /// Returns `true` for primary input and output pins.
    pub fn is_pin(&self) -> bool {
        matches!(
            self.function,
            ElementFunction::Input(_) | ElementFunction::Output(_)
        )
    }
}

/// Errors raised while editing a layout.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The tile lies outside the aspect ratio or above the crossing layer.
    #[error("tile {0} is out of bounds")]
    OutOfBounds(Tile),
    /// The tile already holds an element.
    #[error("tile {0} is already occupied")]
    Occupied(Tile),
    /// No primary input with this index was reserved.
    #[error("primary input {0} was not reserved")]
    UnknownInput(usize),
    /// Constants and primary inputs are not gates.
    #[error("{0} cannot be placed as a gate")]
    NotAGate(NodeKind),
    /// The number of incoming signals does not match the function.
    #[error("{kind} expects {expected} inputs, got {found}")]
    ArityMismatch {
        /// Requested function.
        kind: NodeKind,
        /// Inputs the function requires.
        expected: usize,
        /// Inputs supplied.
        found: usize,
    },
}

/// A gate-level layout on a clocked grid.
#[derive(Clone, Debug)]
pub struct GateLayout {
    name: Option<String>,
    aspect_ratio: AspectRatio,
    scheme: ClockingScheme,
    topology: Topology,
    elements: BTreeMap<Tile, TileElement>,
    clock_overrides: BTreeMap<(u16, u16), u8>,
    inputs: Vec<Option<Tile>>,
    input_names: Vec<String>,
    outputs: Vec<Tile>,
    output_names: Vec<String>,
}

impl GateLayout {
    /// Creates an empty layout.
    pub fn new(aspect_ratio: AspectRatio, scheme: ClockingScheme, topology: Topology) -> Self {
        Self {
            name: None,
            aspect_ratio,
            scheme,
            topology,
            elements: BTreeMap::new(),
            clock_overrides: BTreeMap::new(),
            inputs: Vec::new(),
            input_names: Vec::new(),
            outputs: Vec::new(),
            output_names: Vec::new(),
        }
    }

    /// Sets the layout name.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Returns the layout name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the size of the layout.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    /// Returns the clocking scheme.
    pub fn scheme(&self) -> ClockingScheme {
        self.scheme
    }

    /// Returns the tile topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns `true` if `t` lies inside the layout on layer 0 or 1.
    pub fn contains(&self, t: Tile) -> bool {
        t.z <= 1 && self.aspect_ratio.contains(t)
    }

    // -- clocking --

    /// Returns the clock phase of the position of `t`.
    pub fn clock_number(&self, t: Tile) -> u8 {
        self.clock_overrides
            .get(&(t.x, t.y))
            .copied()
            .unwrap_or_else(|| self.scheme.clock_number(t.x, t.y))
    }

    /// Overrides the clock phase of the position of `t`.
    ///
    /// Meaningful for irregular schemes only; regular schemes ignore it.
    pub fn assign_clock_number(&mut self, t: Tile, clock: u8) {
        if !self.scheme.is_regular() {
            self.clock_overrides.insert((t.x, t.y), clock % self.scheme.num_clocks());
        }
    }

    /// Returns `true` if information can flow from `from` into `to`: the
    /// tiles touch and `to` is one phase behind `from`.
    pub fn is_outgoing_clocked(&self, from: Tile, to: Tile) -> bool {
        let c = u16::from(self.scheme.num_clocks());
        self.topology.is_adjacent(from, to)
            && (u16::from(self.clock_number(from)) + 1) % c == u16::from(self.clock_number(to))
    }

    /// Returns `true` if information can flow from `from` into `to`, seen
    /// from the receiving tile.
    pub fn is_incoming_clocked(&self, to: Tile, from: Tile) -> bool {
        self.is_outgoing_clocked(from, to)
    }

    /// Returns the ground tiles `t` can send information to.
    pub fn outgoing_clocked_tiles(&self, t: Tile) -> Vec<Tile> {
        self.topology
            .adjacent_tiles(self.aspect_ratio, t)
            .into_iter()
            .filter(|&at| self.is_outgoing_clocked(t, at))
            .collect()
    }

    /// Returns the ground tiles `t` can receive information from.
    pub fn incoming_clocked_tiles(&self, t: Tile) -> Vec<Tile> {
        self.topology
            .adjacent_tiles(self.aspect_ratio, t)
            .into_iter()
            .filter(|&at| self.is_incoming_clocked(t, at))
            .collect()
    }

    // -- construction --

    /// Declares the primary inputs in network order. They are placed later
    /// with [`place_input`](Self::place_input).
    pub fn reserve_inputs<S: AsRef<str>>(&mut self, names: &[S]) {
        self.inputs = vec![None; names.len()];
        self.input_names = names.iter().map(|n| n.as_ref().to_string()).collect();
    }

    fn check_free(&self, t: Tile) -> Result<(), LayoutError> {
        if !self.contains(t) {
            return Err(LayoutError::OutOfBounds(t));
        }
        if self.elements.contains_key(&t) {
            return Err(LayoutError::Occupied(t));
        }
        Ok(())
    }

    /// Places reserved primary input `index` on `t`.
    pub fn place_input(&mut self, index: usize, t: Tile) -> Result<Signal, LayoutError> {
        if index >= self.inputs.len() {
            return Err(LayoutError::UnknownInput(index));
        }
        self.check_free(t)?;
        self.inputs[index] = Some(t);
        self.elements.insert(
            t,
            TileElement {
                function: ElementFunction::Input(index),
                inputs: Vec::new(),
            },
        );
        Ok(Signal::Tile(t))
    }

    /// Places a gate of `kind` on `t`, fed by `inputs`.
    pub fn create_gate(
        &mut self,
        kind: NodeKind,
        t: Tile,
        inputs: &[Signal],
    ) -> Result<Signal, LayoutError> {
        if !kind.is_gate() {
            return Err(LayoutError::NotAGate(kind));
        }
        if inputs.len() != kind.arity() {
            return Err(LayoutError::ArityMismatch {
                kind,
                expected: kind.arity(),
                found: inputs.len(),
            });
        }
        self.check_free(t)?;
        self.elements.insert(
            t,
            TileElement {
                function: ElementFunction::Logic(kind),
                inputs: inputs.to_vec(),
            },
        );
        Ok(Signal::Tile(t))
    }

    /// Places a wire segment on `t`.
    pub fn create_wire(&mut self, t: Tile, input: Signal) -> Result<Signal, LayoutError> {
        self.create_gate(NodeKind::Buffer, t, &[input])
    }

    /// Places the next primary output pin on `t`.
    pub fn create_output(&mut self, t: Tile, input: Signal, name: &str) -> Result<(), LayoutError> {
        self.check_free(t)?;
        self.elements.insert(
            t,
            TileElement {
                function: ElementFunction::Output(self.outputs.len()),
                inputs: vec![input],
            },
        );
        self.outputs.push(t);
        self.output_names.push(name.to_string());
        Ok(())
    }

    // -- queries --

    /// Returns the element on `t`.
    pub fn element(&self, t: Tile) -> Option<&TileElement> {
        self.elements.get(&t)
    }

    /// Returns `true` if `t` holds no element.
    pub fn is_empty_tile(&self, t: Tile) -> bool {
        !self.elements.contains_key(&t)
    }

    /// Iterates over all occupied tiles in row-major order.
    pub fn elements(&self) -> impl Iterator<Item = (Tile, &TileElement)> {
        self.elements.iter().map(|(&t, e)| (t, e))
    }

    /// Returns the tiles whose elements read the output of `t`.
    pub fn consumers(&self, t: Tile) -> Vec<Tile> {
        self.elements
            .iter()
            .flat_map(|(&at, e)| {
                e.inputs
                    .iter()
                    .filter(move |s| s.tile() == Some(t))
                    .map(move |_| at)
            })
            .collect()
    }

    /// Returns the placement of each reserved primary input.
    pub fn input_tiles(&self) -> &[Option<Tile>] {
        &self.inputs
    }

    /// Returns the output pin tiles in output order.
    pub fn output_tiles(&self) -> &[Tile] {
        &self.outputs
    }

    /// Returns the name of primary input `index`.
    pub fn input_name(&self, index: usize) -> Option<&str> {
        self.input_names.get(index).map(String::as_str)
    }

    /// Returns the name of primary output `index`.
    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.output_names.get(index).map(String::as_str)
    }

    /// Returns the number of reserved primary inputs.
    pub fn num_pis(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of primary outputs.
    pub fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    /// Counts logic gates. Pins, wire segments and fan-outs are not gates.
    pub fn num_gates(&self) -> usize {
        self.elements.values().filter(|e| !e.is_pin() && !e.is_wire()).count()
    }

    /// Counts wire tiles: pins, wire segments and fan-outs.
    pub fn num_wires(&self) -> usize {
        self.elements.values().filter(|e| e.is_pin() || e.is_wire()).count()
    }

    /// Counts elements on the crossing layer.
    pub fn num_crossings(&self) -> usize {
        self.elements.keys().filter(|t| !t.is_ground()).count()
    }
}

/// Per-tile synchronization delays, in full clock cycles.
pub trait SynchronizationElements {
    /// Returns the delay of the position of `t`.
    fn synchronization_delay(&self, t: Tile) -> u8;

    /// Sets the delay of the position of `t`.
    fn assign_synchronization_delay(&mut self, t: Tile, delay: u8);
}

/// What a layout type can represent.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LayoutCapabilities {
    /// Per-tile synchronization delays are stored.
    pub synchronization_elements: bool,
    /// Opposite-tile queries are answered, which straight inverters need.
    pub opposite_tiles: bool,
}

/// A layout type the exact engine can produce.
pub trait GateLevelLayout: Sized + Send {
    /// Creates an empty layout.
    fn create(aspect_ratio: AspectRatio, scheme: ClockingScheme, topology: Topology) -> Self;

    /// Returns what this layout type supports.
    fn capabilities() -> LayoutCapabilities;

    /// Returns the underlying gate layout.
    fn gate_layout(&self) -> &GateLayout;

    /// Returns the underlying gate layout mutably.
    fn gate_layout_mut(&mut self) -> &mut GateLayout;

    /// Returns the synchronization-delay store, if the type has one.
    fn synchronization_elements_mut(&mut self) -> Option<&mut dyn SynchronizationElements> {
        None
    }
}

impl GateLevelLayout for GateLayout {
    fn create(aspect_ratio: AspectRatio, scheme: ClockingScheme, topology: Topology) -> Self {
        Self::new(aspect_ratio, scheme, topology)
    }

    fn capabilities() -> LayoutCapabilities {
        LayoutCapabilities {
            synchronization_elements: false,
            opposite_tiles: true,
        }
    }

    fn gate_layout(&self) -> &GateLayout {
        self
    }

    fn gate_layout_mut(&mut self) -> &mut GateLayout {
        self
    }
}

/// A gate layout with synchronization elements.
#[derive(Clone, Debug)]
pub struct SyncGateLayout {
    layout: GateLayout,
    delays: BTreeMap<(u16, u16), u8>,
}

impl SyncGateLayout {
    /// Returns the delay of `t`, 0 if none was assigned.
    pub fn synchronization_delay(&self, t: Tile) -> u8 {
        self.delays.get(&(t.x, t.y)).copied().unwrap_or(0)
    }

    /// Returns the sum of all delays.
    pub fn total_synchronization_delay(&self) -> u64 {
        self.delays.values().map(|&d| u64::from(d)).sum()
    }
}

impl SynchronizationElements for SyncGateLayout {
    fn synchronization_delay(&self, t: Tile) -> u8 {
        SyncGateLayout::synchronization_delay(self, t)
    }

    fn assign_synchronization_delay(&mut self, t: Tile, delay: u8) {
        if delay == 0 {
            self.delays.remove(&(t.x, t.y));
        } else {
            self.delays.insert((t.x, t.y), delay);
        }
    }
}

impl GateLevelLayout for SyncGateLayout {
    fn create(aspect_ratio: AspectRatio, scheme: ClockingScheme, topology: Topology) -> Self {
        Self {
            layout: GateLayout::new(aspect_ratio, scheme, topology),
            delays: BTreeMap::new(),
        }
    }

    fn capabilities() -> LayoutCapabilities {
        LayoutCapabilities {
            synchronization_elements: true,
            opposite_tiles: true,
        }
    }

    fn gate_layout(&self) -> &GateLayout {
        &self.layout
    }

    fn gate_layout_mut(&mut self) -> &mut GateLayout {
        &mut self.layout
    }

    fn synchronization_elements_mut(&mut self) -> Option<&mut dyn SynchronizationElements> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocking::clocking_scheme;

    fn twoddwave(w: u16, h: u16) -> GateLayout {
        GateLayout::new(
            AspectRatio::new(w, h),
            clocking_scheme("2DDWAVE").unwrap(),
            Topology::Cartesian,
        )
    }

    #[test]
    fn and_gate_layout() {
        let mut layout = twoddwave(2, 2);
        layout.reserve_inputs(&["a", "b"]);
        let a = layout.place_input(0, Tile::new(1, 0)).unwrap();
        let b = layout.place_input(1, Tile::new(0, 1)).unwrap();
        let f = layout.create_gate(NodeKind::And, Tile::new(1, 1), &[a, b]).unwrap();
        assert_eq!(layout.num_gates(), 1);
        assert_eq!(layout.num_wires(), 2);
        assert_eq!(layout.consumers(Tile::new(1, 0)), vec![Tile::new(1, 1)]);
        assert_eq!(
            layout.create_output(Tile::new(1, 1), f, "f"),
            Err(LayoutError::Occupied(Tile::new(1, 1)))
        );
        assert_eq!(layout.input_name(1), Some("b"));
    }

    #[test]
    fn rejects_bad_placements() {
        let mut layout = twoddwave(2, 2);
        layout.reserve_inputs(&["a"]);
        assert_eq!(
            layout.place_input(1, Tile::new(0, 0)),
            Err(LayoutError::UnknownInput(1))
        );
        assert_eq!(
            layout.place_input(0, Tile::new(2, 0)),
            Err(LayoutError::OutOfBounds(Tile::new(2, 0)))
        );
        assert!(matches!(
            layout.create_gate(NodeKind::And, Tile::new(0, 0), &[Signal::Constant(true)]),
            Err(LayoutError::ArityMismatch { expected: 2, found: 1, .. })
        ));
        assert_eq!(
            layout.create_gate(NodeKind::PrimaryInput, Tile::new(0, 0), &[]),
            Err(LayoutError::NotAGate(NodeKind::PrimaryInput))
        );
    }

    #[test]
    fn clock_flow_follows_scheme() {
        let layout = twoddwave(3, 3);
        let center = Tile::new(1, 1);
        let mut out = layout.outgoing_clocked_tiles(center);
        out.sort();
        assert_eq!(out, vec![Tile::new(2, 1), Tile::new(1, 2)]);
        assert!(layout.is_incoming_clocked(center, Tile::new(0, 1)));
        assert!(!layout.is_incoming_clocked(center, Tile::new(2, 1)));
        // crossing-layer tiles share the phase of their position
        assert!(layout.is_outgoing_clocked(center.above(), Tile::new(2, 1).above()));
    }

    #[test]
    fn open_scheme_uses_overrides() {
        let mut layout = GateLayout::new(
            AspectRatio::new(2, 1),
            clocking_scheme("OPEN").unwrap(),
            Topology::Cartesian,
        );
        assert!(!layout.is_outgoing_clocked(Tile::new(0, 0), Tile::new(1, 0)));
        layout.assign_clock_number(Tile::new(0, 0), 3);
        assert!(layout.is_outgoing_clocked(Tile::new(0, 0), Tile::new(1, 0)));
        assert_eq!(layout.clock_number(Tile::new(0, 0).above()), 3);
    }

    #[test]
    fn regular_scheme_ignores_overrides() {
        let mut layout = twoddwave(2, 2);
        layout.assign_clock_number(Tile::new(0, 0), 2);
        assert_eq!(layout.clock_number(Tile::new(0, 0)), 0);
    }

    #[test]
    fn crossings_and_fanouts_count_as_wires() {
        let mut layout = twoddwave(3, 3);
        layout.reserve_inputs(&["a"]);
        let a = layout.place_input(0, Tile::new(0, 0)).unwrap();
        let fo = layout.create_wire(Tile::new(1, 0), a).unwrap();
        layout.create_wire(Tile::new(2, 0), fo).unwrap();
        layout.create_wire(Tile::new(1, 1).above(), fo).unwrap();
        assert_eq!(layout.num_wires(), 4);
        assert_eq!(layout.num_crossings(), 1);
        assert_eq!(layout.consumers(Tile::new(1, 0)).len(), 2);
    }

    #[test]
    fn sync_layout_stores_delays() {
        let mut layout = SyncGateLayout::create(
            AspectRatio::new(2, 2),
            clocking_scheme("2DDWAVE").unwrap(),
            Topology::Cartesian,
        );
        assert!(SyncGateLayout::capabilities().synchronization_elements);
        assert!(!GateLayout::capabilities().synchronization_elements);
        let store = layout.synchronization_elements_mut().unwrap();
        store.assign_synchronization_delay(Tile::new(1, 0), 2);
        assert_eq!(layout.synchronization_delay(Tile::new(1, 0)), 2);
        assert_eq!(layout.synchronization_delay(Tile::new(1, 0).above()), 2);
        assert_eq!(layout.total_synchronization_delay(), 2);
        assert!(layout.gate_layout().is_empty_tile(Tile::new(1, 0)));
    }
}
