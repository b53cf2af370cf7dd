//! Constraint model for one aspect ratio.
//!
//! The builder encodes the delta between a cached solver state and the shape
//! at hand: constraints local to a tile are asserted for the tiles that were
//! added, and border-sensitive constraints are re-asserted for the tiles that
//! just left the eastern or southern border. A satisfying assignment of the
//! result is a valid placement and routing.
//!
//! # Constraint groups
//!
//! 1. Tile exclusivity
//! 2. Vertex placement
//! 3. Fan-in and fan-out routing
//! 4. Primary input clocks and global synchronization
//! 5. Clock phases of irregular schemes
//! 6. Paths and cycle elimination
//! 7. Border I/O
//! 8. Straight inverters
//! 9. Synchronization elements
//! 10. ToPoliNano rules
//! 11. Surface blacklist
//! 12. Degree insufficiencies
//! 13. Number of connections
//! 14. Hierarchy levels

mod paths;
mod placement;
mod routing;
mod symmetry;
mod synchronization;
mod technology;

use crate::cache::CheckPoint;
use crate::context::SearchContext;
use crate::encode;
use crate::sat::{Lit, SatSolver};
use fcn_common::FcnResult;
use fcn_layout::{AspectRatio, GateLayout, Tile};
use std::collections::HashMap;

/// Extends the solver state of `cp` to a model of `ar`.
pub(crate) fn generate(ctx: &SearchContext, ar: AspectRatio, cp: &mut CheckPoint) -> FcnResult<()> {
    ModelBuilder::new(ctx, ar, cp).generate()
}

struct ModelBuilder<'a> {
    ctx: &'a SearchContext,
    ar: AspectRatio,
    /// Empty layout answering clock-flow queries of regular schemes.
    layout: GateLayout,
    cp: &'a mut CheckPoint,
    /// `te(t, e) ∧ tse_k(t)`, shared by all paths through `(t, e)`.
    delayed_wires: HashMap<(Tile, usize, usize), Lit>,
}

impl<'a> ModelBuilder<'a> {
    fn new(ctx: &'a SearchContext, ar: AspectRatio, cp: &'a mut CheckPoint) -> Self {
        Self {
            ctx,
            ar,
            layout: GateLayout::new(ar, ctx.scheme, ctx.params.topology),
            cp,
            delayed_wires: HashMap::new(),
        }
    }

    fn generate(mut self) -> FcnResult<()> {
        let ctx = self.ctx;

        // placement
        self.restrict_tile_elements()?;
        self.restrict_vertices()?;

        // local synchronization
        self.define_fanout_tiles();
        self.define_fanin_tiles();

        // global synchronization
        if !ctx.params.desynchronize {
            self.assign_pi_clocks()?;
            self.global_synchronization()?;
        }

        if !ctx.is_regular() {
            self.restrict_clocks()?;
        }

        // linear schemes are acyclic by construction
        if !ctx.scheme.is_linear() {
            self.establish_paths();
        }

        if ctx.params.border_io {
            self.enforce_border_io();
        }
        if ctx.straight_inverters {
            self.enforce_straight_inverters();
        }
        if ctx.sync_delays() {
            self.restrict_synchronization_elements();
        }
        if ctx.topolinano() {
            self.topolinano_rules()?;
        }
        if !ctx.blacklist.is_empty() {
            self.apply_blacklist();
        }

        // symmetry breaking
        self.prevent_insufficiencies();
        self.define_number_of_connections()?;
        if ctx.hierarchy {
            self.utilize_hierarchy();
        }
        Ok(())
    }

    // -- tile sets --

    fn is_added(&self, t: Tile) -> bool {
        self.cp.added.contains(&t)
    }

    fn is_updated(&self, t: Tile) -> bool {
        self.cp.updated.contains(&t)
    }

    fn added(&self) -> Vec<Tile> {
        self.cp.added.iter().copied().collect()
    }

    fn added_and_updated(&self) -> Vec<Tile> {
        self.cp.added.union(&self.cp.updated).copied().collect()
    }

    fn tiles(&self) -> Vec<Tile> {
        self.ar.tiles().collect()
    }

    /// Tiles whose neighbourhood grows with the next shape.
    fn on_moving_border(&self, t: Tile) -> bool {
        let topo = self.ctx.params.topology;
        topo.is_eastern_border(self.ar, t) || topo.is_southern_border(self.ar, t)
    }

    // -- neighbourhoods --

    /// Tiles `t` may send to. Irregular schemes decide phases in the model, so
    /// every adjacent tile is a candidate.
    fn outgoing(&self, t: Tile) -> Vec<Tile> {
        if self.ctx.is_regular() {
            self.layout.outgoing_clocked_tiles(t)
        } else {
            self.ctx.params.topology.adjacent_tiles(self.ar, t)
        }
    }

    /// Tiles `t` may receive from.
    fn incoming(&self, t: Tile) -> Vec<Tile> {
        if self.ctx.is_regular() {
            self.layout.incoming_clocked_tiles(t)
        } else {
            self.ctx.params.topology.adjacent_tiles(self.ar, t)
        }
    }

    // -- variables --

    fn solver(&mut self) -> &mut SatSolver {
        &mut self.cp.state.solver
    }

    fn tile_nodes(&mut self, t: Tile) -> Vec<Lit> {
        (0..self.ctx.network.num_vertices())
            .map(|v| self.cp.state.tn(t, v))
            .collect()
    }

    fn tile_edges(&mut self, t: Tile) -> Vec<Lit> {
        (0..self.ctx.network.num_edges())
            .map(|e| self.cp.state.te(t, e))
            .collect()
    }

    // -- clauses --

    /// Literals that switch off constraints of `t` once its border moves.
    fn guards(&self, t: Tile) -> Vec<Lit> {
        let topo = self.ctx.params.topology;
        let border = self.cp.state.border;
        let mut guards = Vec::with_capacity(2);
        if topo.is_eastern_border(self.ar, t) {
            guards.push(border.east);
        }
        if topo.is_southern_border(self.ar, t) {
            guards.push(border.south);
        }
        guards
    }

    /// Adds `clause`, guarded if `t` lies on a moving border.
    fn add_for_tile(&mut self, t: Tile, clause: &[Lit]) {
        let guards = self.guards(t);
        encode::add_guarded(self.solver(), &guards, clause);
    }

    fn add_clause<I: IntoIterator<Item = Lit>>(&mut self, lits: I) {
        self.cp.state.add_clause(lits);
    }

    /// Excludes `lit` permanently, or for this shape only if `per_shape`.
    fn exclude(&mut self, lit: Lit, per_shape: bool) {
        if per_shape {
            self.cp.assumptions.push(!lit);
        } else {
            self.add_clause([!lit]);
        }
    }
}
