//! The options record of an exact run.

use fcn_config::{ExactConfig, ExactSection, Technology, TopologyKind};
use fcn_layout::Topology;
use std::time::Duration;

/// Options of an exact placement and routing run.
///
/// [`Default`] matches the defaults of an empty `exact.toml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactParams {
    /// Name of the clocking scheme, matched case-insensitively.
    pub scheme: String,
    /// Largest number of tiles to explore.
    pub upper_bound_area: u64,
    /// Largest width to explore.
    pub upper_bound_x: u16,
    /// Largest height to explore.
    pub upper_bound_y: u16,
    /// Only explore shapes of exactly the upper bound area.
    pub fixed_size: bool,
    /// Worker threads. Zero is treated as one.
    pub num_threads: usize,
    /// Allow two wire segments to share a tile.
    pub crossings: bool,
    /// Place primary inputs and outputs on tiles of their own.
    pub io_pins: bool,
    /// Restrict primary inputs and outputs to the layout border.
    pub border_io: bool,
    /// Balance path lengths with per-tile synchronization delays.
    pub synchronization_elements: bool,
    /// Force inverters to be passed straight through.
    pub straight_inverters: bool,
    /// Skip the global path-length balancing.
    pub desynchronize: bool,
    /// Minimize the number of wire segments of a found layout.
    pub minimize_wires: bool,
    /// Minimize the number of crossing tiles of a found layout.
    pub minimize_crossings: bool,
    /// Technology-specific placement rules.
    pub technology: Technology,
    /// Tile neighbourhood.
    pub topology: Topology,
    /// Largest delay a synchronization element may add.
    pub max_synchronization_delay: u8,
    /// Wall-clock budget of the whole run.
    pub timeout: Duration,
}

impl Default for ExactParams {
    fn default() -> Self {
        Self::from_section(&ExactSection::default())
    }
}

impl ExactParams {
    /// Converts a loaded configuration.
    pub fn from_config(config: &ExactConfig) -> Self {
        Self::from_section(&config.exact)
    }

    fn from_section(s: &ExactSection) -> Self {
        Self {
            scheme: s.scheme.clone(),
            upper_bound_area: s.upper_bound_area,
            upper_bound_x: s.upper_bound_x,
            upper_bound_y: s.upper_bound_y,
            fixed_size: s.fixed_size,
            num_threads: s.num_threads,
            crossings: s.crossings,
            io_pins: s.io_pins,
            border_io: s.border_io,
            synchronization_elements: s.synchronization_elements,
            straight_inverters: s.straight_inverters,
            desynchronize: s.desynchronize,
            minimize_wires: s.minimize_wires,
            minimize_crossings: s.minimize_crossings,
            technology: s.technology,
            topology: match s.topology {
                TopologyKind::Cartesian => Topology::Cartesian,
                TopologyKind::ShiftedCartesian => Topology::ShiftedCartesian,
            },
            max_synchronization_delay: s.max_synchronization_delay,
            timeout: Duration::from_millis(s.timeout_ms),
        }
    }

    /// Returns the effective area bound, the smaller of the area bound and
    /// the product of the side bounds.
    pub fn area_bound(&self) -> u64 {
        self.upper_bound_area
            .min(u64::from(self.upper_bound_x) * u64::from(self.upper_bound_y))
    }
}
