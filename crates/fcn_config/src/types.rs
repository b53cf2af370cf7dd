//! Configuration types deserialized from `exact.toml`.

use fcn_common::TruthTable;
use serde::Deserialize;

/// The top-level configuration of an exact physical design run.
#[derive(Debug, Default, Deserialize)]
pub struct ExactConfig {
    /// Search and model options.
    #[serde(default)]
    pub exact: ExactSection,
    /// Gate functions forbidden on individual tiles.
    #[serde(default)]
    pub blacklist: Vec<BlacklistEntry>,
}

/// The `[exact]` table.
///
/// Every field is optional. Missing fields take the defaults listed on
/// [`ExactSection::default`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExactSection {
    /// Name of the clocking scheme, matched case-insensitively.
    pub scheme: String,
    /// Largest total number of tiles to explore.
    pub upper_bound_area: u64,
    /// Largest layout width to explore.
    pub upper_bound_x: u16,
    /// Largest layout height to explore.
    pub upper_bound_y: u16,
    /// Only try aspect ratios of exactly the upper bound area.
    pub fixed_size: bool,
    /// Number of worker threads exploring aspect ratios concurrently.
    pub num_threads: usize,
    /// Allow two wire segments to share a tile on different layers.
    pub crossings: bool,
    /// Place primary inputs and outputs as dedicated tiles.
    pub io_pins: bool,
    /// Restrict primary inputs and outputs to the layout border.
    pub border_io: bool,
    /// Allow per-tile synchronization delays.
    pub synchronization_elements: bool,
    /// Require inverters to be entered and left on opposite sides.
    pub straight_inverters: bool,
    /// Skip the global path-length balancing.
    pub desynchronize: bool,
    /// Minimize the number of wire segments.
    pub minimize_wires: bool,
    /// Minimize the number of crossing tiles.
    pub minimize_crossings: bool,
    /// Technology-specific placement rules.
    pub technology: Technology,
    /// Tile neighbourhood of the layout grid.
    pub topology: TopologyKind,
    /// Largest synchronization delay a single tile may carry.
    pub max_synchronization_delay: u8,
    /// Global timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ExactSection {
    /// 2DDWave clocking, unbounded (`u16::MAX`) shapes, one thread, I/O pins
    /// on tiles, a timeout of 4294967 ms and every optional rule disabled.
    fn default() -> Self {
        Self {
            scheme: "2DDWave".to_string(),
            upper_bound_area: u64::from(u16::MAX),
            upper_bound_x: u16::MAX,
            upper_bound_y: u16::MAX,
            fixed_size: false,
            num_threads: 1,
            crossings: false,
            io_pins: true,
            border_io: false,
            synchronization_elements: false,
            straight_inverters: false,
            desynchronize: false,
            minimize_wires: false,
            minimize_crossings: false,
            technology: Technology::default(),
            topology: TopologyKind::default(),
            max_synchronization_delay: 2,
            timeout_ms: 4_294_967,
        }
    }
}

/// Technology-specific rule set.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    /// No additional rules (default).
    #[default]
    None,
    /// ToPoliNano rules for shifted columnar NML layouts.
    Topolinano,
}

/// Tile neighbourhood of the layout grid.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Square tiles with four neighbours (default).
    #[default]
    Cartesian,
    /// Odd columns shifted down by half a tile; six neighbours.
    ShiftedCartesian,
}

/// A single `[[blacklist]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BlacklistEntry {
    /// Column of the tile.
    pub x: u16,
    /// Row of the tile.
    pub y: u16,
    /// The forbidden function.
    pub function: GateFunction,
    /// Port orientations that are forbidden. Empty forbids the function on
    /// the tile entirely.
    #[serde(default)]
    pub ports: Vec<PortListConfig>,
}

/// A gate function name usable in a blacklist.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GateFunction {
    /// Two-input AND.
    And,
    /// Two-input OR.
    Or,
    /// Two-input NAND.
    Nand,
    /// Two-input NOR.
    Nor,
    /// Two-input XOR.
    Xor,
    /// Two-input XNOR.
    Xnor,
    /// Three-input majority.
    Maj,
    /// Inverter.
    Not,
    /// Wire segment, buffer or fan-out.
    Wire,
}

impl GateFunction {
    /// Returns the truth table matched against network nodes.
    pub fn truth_table(self) -> TruthTable {
        match self {
            GateFunction::And => TruthTable::and(),
            GateFunction::Or => TruthTable::or(),
            GateFunction::Nand => TruthTable::nand(),
            GateFunction::Nor => TruthTable::nor(),
            GateFunction::Xor => TruthTable::xor(),
            GateFunction::Xnor => TruthTable::xnor(),
            GateFunction::Maj => TruthTable::majority(),
            GateFunction::Not => TruthTable::not(),
            GateFunction::Wire => TruthTable::identity(),
        }
    }
}

/// Input and output sides of a blacklisted port configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PortListConfig {
    /// Sides the signals enter from.
    #[serde(default)]
    pub inputs: Vec<PortDirection>,
    /// Sides the signals leave through.
    #[serde(default)]
    pub outputs: Vec<PortDirection>,
}

impl PortListConfig {
    /// Returns `true` if neither inputs nor outputs are given.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

/// A side of a tile.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    /// Up.
    North,
    /// Up and right.
    NorthEast,
    /// Right.
    East,
    /// Down and right.
    SouthEast,
    /// Down.
    South,
    /// Down and left.
    SouthWest,
    /// Left.
    West,
    /// Up and left.
    NorthWest,
}
