//! Everything a worker needs to know about the run, shared read-only.

use crate::blacklist::SurfaceBlacklist;
use crate::params::ExactParams;
use crate::prepared::PreparedNetwork;
use fcn_config::Technology;
use fcn_layout::{ClockingScheme, LayoutCapabilities, Topology};

/// The preprocessed network together with the effective settings.
///
/// Options a layout type cannot represent are already switched off here.
pub(crate) struct SearchContext {
    pub network: PreparedNetwork,
    pub params: ExactParams,
    pub scheme: ClockingScheme,
    pub blacklist: SurfaceBlacklist,
    pub straight_inverters: bool,
    pub synchronization_elements: bool,
    /// Level distances from the border sides prune placements.
    pub hierarchy: bool,
}

impl SearchContext {
    /// Combines the run settings with what the layout type can store.
    pub fn new(
        network: PreparedNetwork,
        params: ExactParams,
        scheme: ClockingScheme,
        blacklist: SurfaceBlacklist,
        capabilities: LayoutCapabilities,
    ) -> Self {
        Self {
            straight_inverters: params.straight_inverters && capabilities.opposite_tiles,
            synchronization_elements: params.synchronization_elements
                && capabilities.synchronization_elements,
            hierarchy: params.border_io,
            network,
            params,
            scheme,
            blacklist,
        }
    }

    pub fn is_regular(&self) -> bool {
        self.scheme.is_regular()
    }

    pub fn num_clocks(&self) -> u8 {
        self.scheme.num_clocks()
    }

    pub fn is_scheme(&self, name: &str) -> bool {
        self.scheme.is(name)
    }

    /// ToPoliNano rules need the diagonal neighbours of the shifted grid.
    pub fn topolinano(&self) -> bool {
        self.params.technology == Technology::Topolinano
            && self.params.topology == Topology::ShiftedCartesian
    }

    /// Synchronization elements that take part in path balancing.
    pub fn sync_delays(&self) -> bool {
        self.synchronization_elements && !self.params.desynchronize
    }
}
