//! Exact placement and routing of logic networks on clocked FCN layouts.
//!
//! The engine searches aspect ratios in order of increasing area and asks a
//! SAT solver, shape by shape, whether the network can be placed and routed
//! on it. The first satisfiable shape yields a layout of minimum area. Solver
//! states of unsatisfiable shapes are kept and grown into their neighbours
//! instead of being rebuilt.
//!
//! # Pipeline
//!
//! 1. **Check** the clocking scheme, the layout capabilities and the operands
//! 2. **Prepare** the network: bounded fan-outs and dedicated output nodes
//! 3. **Explore** shapes, one or many workers, each with its solver cache
//! 4. **Optimize** a found model for wires, crossings and delays
//! 5. **Extract** the layout and check it against the design rules
//!
//! # Usage
//!
//! ```ignore
//! use fcn_diagnostics::DiagnosticSink;
//! use fcn_exact::{exact, ExactParams};
//! use fcn_layout::GateLayout;
//!
//! let sink = DiagnosticSink::new();
//! let outcome = exact::<GateLayout>(&network, &ExactParams::default(), &sink)?;
//! if let Some(layout) = outcome.layout {
//!     println!("{}", outcome.stats);
//! }
//! ```

#![warn(missing_docs)]

pub mod aspect_ratio;
pub mod blacklist;
pub mod codes;
pub mod error;
pub mod params;
pub mod probe;
pub mod stats;

mod cache;
mod context;
mod encode;
mod explore;
mod extract;
mod model;
mod objective;
mod prepared;
mod sat;

pub use aspect_ratio::AspectRatioIter;
pub use blacklist::{BlacklistedFunction, PortList, SurfaceBlacklist};
pub use error::ExactError;
pub use params::ExactParams;
pub use probe::ShapeProbe;
pub use sat::SolveOutcome;
pub use stats::ExactStats;

use context::SearchContext;
use fcn_config::Technology;
use fcn_diagnostics::{Diagnostic, DiagnosticSink, Location};
use fcn_layout::{clocking_scheme, GateLevelLayout, LayoutCapabilities, Topology};
use fcn_network::{
    fanout_substitution, substitute_po_signals, FanoutSubstitutionParams, LogicNetwork,
    SubstitutionStrategy,
};
use prepared::PreparedNetwork;
use std::time::Instant;

/// A finished run: the layout, if one was found within the bounds, and its
/// statistics.
#[derive(Debug)]
pub struct ExactOutcome<L> {
    /// A layout of minimum area, or `None` if the bounds or the timeout were
    /// exhausted first.
    pub layout: Option<L>,
    /// Figures of the run.
    pub stats: ExactStats,
}

/// Places and routes `network` on a layout of minimum area.
///
/// Returns `Ok` without a layout if no shape within the bounds admits one
/// before the timeout.
pub fn exact<L: GateLevelLayout>(
    network: &LogicNetwork,
    params: &ExactParams,
    sink: &DiagnosticSink,
) -> Result<ExactOutcome<L>, ExactError> {
    exact_with_blacklist(network, &SurfaceBlacklist::new(), params, sink)
}

/// Like [`exact`], keeping the functions of `blacklist` off their tiles.
pub fn exact_with_blacklist<L: GateLevelLayout>(
    network: &LogicNetwork,
    blacklist: &SurfaceBlacklist,
    params: &ExactParams,
    sink: &DiagnosticSink,
) -> Result<ExactOutcome<L>, ExactError> {
    let start = Instant::now();
    let deadline = start.checked_add(params.timeout);

    // 1-2. checks and preprocessing
    let ctx = prepare(network, params, blacklist.clone(), L::capabilities(), sink)?;

    // 3-5. search, optimization and extraction
    let found = explore::explore::<L>(&ctx, deadline, sink)?;
    if found.timed_out {
        sink.emit(
            Diagnostic::warning(
                codes::TIMEOUT,
                format!("timeout of {} ms reached", params.timeout.as_millis()),
                Location::Global,
            )
            .with_note("shapes left unexplored may hold a smaller layout"),
        );
    }

    let mut stats = ExactStats {
        num_aspect_ratios: found.num_aspect_ratios,
        ..Default::default()
    };
    let layout = found.best.map(|(ar, layout)| {
        let gates = layout.gate_layout();
        stats.x_size = ar.width;
        stats.y_size = ar.height;
        stats.num_gates = gates.num_gates();
        stats.num_wires = gates.num_wires();
        layout
    });
    stats.time_total = start.elapsed();
    Ok(ExactOutcome { layout, stats })
}

/// Checks the run settings against the network and the layout type and
/// builds the search context.
pub(crate) fn prepare(
    network: &LogicNetwork,
    params: &ExactParams,
    blacklist: SurfaceBlacklist,
    capabilities: LayoutCapabilities,
    sink: &DiagnosticSink,
) -> Result<SearchContext, ExactError> {
    let Some(scheme) = clocking_scheme(&params.scheme) else {
        sink.emit(
            Diagnostic::error(
                codes::UNSUPPORTED_SCHEME,
                format!("unsupported clocking scheme `{}`", params.scheme),
                Location::Global,
            )
            .with_help(format!(
                "supported schemes: {}",
                fcn_layout::SUPPORTED_SCHEMES.join(", ")
            )),
        );
        return Err(ExactError::UnsupportedClockingScheme(params.scheme.clone()));
    };

    if !params.io_pins {
        sink.emit(Diagnostic::warning(
            codes::IO_PINS_FORCED,
            "I/O pins cannot be disabled; inputs and outputs are placed as pins",
            Location::Global,
        ));
    }
    if params.straight_inverters && !capabilities.opposite_tiles {
        sink.emit(Diagnostic::warning(
            codes::NO_STRAIGHT_INVERTERS,
            "layout type cannot answer opposite-tile queries; straight inverters are not enforced",
            Location::Global,
        ));
    }
    if params.synchronization_elements && !capabilities.synchronization_elements {
        sink.emit(
            Diagnostic::warning(
                codes::NO_SYNCHRONIZATION_ELEMENTS,
                "layout type has no synchronization elements; none are placed",
                Location::Global,
            )
            .with_help("use `SyncGateLayout` to place synchronization elements"),
        );
    }
    if params.technology == Technology::Topolinano && params.topology != Topology::ShiftedCartesian
    {
        sink.emit(Diagnostic::warning(
            codes::TECHNOLOGY_IGNORED,
            "ToPoliNano rules need the shifted Cartesian topology and are not applied",
            Location::Global,
        ));
    }

    let max_in_degree = scheme.max_in_degree();
    if network.has_high_degree_fanin(usize::from(max_in_degree)) {
        sink.emit(Diagnostic::error(
            codes::HIGH_DEGREE_FANIN,
            format!(
                "{} allows at most {max_in_degree} fan-ins per node, the network has {}",
                scheme.name(),
                network.max_fanin_size()
            ),
            Location::Global,
        ));
        return Err(ExactError::HighDegreeFanin { max_in_degree });
    }
    // both operands would leave the same tile towards the same tile
    if let Some((node, operand)) = network.find_repeated_fanin() {
        sink.emit(
            Diagnostic::error(
                codes::REPEATED_OPERAND,
                format!("node {node} reads {operand} on more than one operand"),
                Location::Node(node.as_raw()),
            )
            .with_help("simplify the gate first; AND(a, a) is a and MAJ(a, a, b) is a"),
        );
        return Err(ExactError::RepeatedOperand { node, operand });
    }

    let fanouts = FanoutSubstitutionParams {
        strategy: SubstitutionStrategy::Breadth,
        degree: usize::from(scheme.max_out_degree()),
        threshold: 1,
    };
    let mut substituted = fanout_substitution(network, &fanouts)?;
    substitute_po_signals(&mut substituted);
    let prepared = PreparedNetwork::new(substituted)?;

    Ok(SearchContext::new(
        prepared,
        params.clone(),
        scheme,
        blacklist,
        capabilities,
    ))
}
