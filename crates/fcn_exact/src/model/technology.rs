//! Technology rules: straight inverters, the ToPoliNano cell library and the
//! surface blacklist.

use super::ModelBuilder;
use crate::encode;
use crate::sat::Lit;
use fcn_common::{FcnResult, TruthTable};
use fcn_layout::{Direction, Tile};
use fcn_network::NodeKind;

impl ModelBuilder<'_> {
    /// Inverters receive and send through opposite sides of their tile.
    pub(super) fn enforce_straight_inverters(&mut self) {
        let ctx = self.ctx;
        let topo = ctx.params.topology;
        let inverters: Vec<usize> = ctx
            .network
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, vertex)| vertex.kind == NodeKind::Inverter)
            .map(|(v, _)| v)
            .collect();
        if inverters.is_empty() {
            return;
        }

        for t in self.added_and_updated() {
            let mut options = Vec::new();
            for (a, b) in topo.opposite_pairs(self.ar, t) {
                for (t1, t2) in [(a, b), (b, a)] {
                    if ctx.is_regular()
                        && !(self.layout.is_incoming_clocked(t, t1)
                            && self.layout.is_outgoing_clocked(t, t2))
                    {
                        continue;
                    }
                    let incoming = self.cp.state.tc(t1, t);
                    let outgoing = self.cp.state.tc(t, t2);
                    let x = self.cp.state.new_var();
                    self.add_clause([!x, incoming]);
                    self.add_clause([!x, outgoing]);
                    options.push(x);
                }
            }
            for &v in &inverters {
                let mut clause = vec![!self.cp.state.tn(t, v)];
                clause.extend(&options);
                self.add_for_tile(t, &clause);
            }
        }
    }

    /// Placement rules of the ToPoliNano library on the shifted grid.
    ///
    /// Fan-outs receive from the north-west and never feed another fan-out
    /// or conjunctive gate directly. AND, OR and majority gates send to the
    /// north-east, never to the south-east.
    pub(super) fn topolinano_rules(&mut self) -> FcnResult<()> {
        let ctx = self.ctx;
        let ntk = &ctx.network;
        let topo = ctx.params.topology;
        let crossings = ctx.params.crossings;

        for (v, vertex) in ntk.vertices().iter().enumerate() {
            let successors: Vec<usize> = vertex
                .out_edges
                .iter()
                .map(|&e| ntk.edges()[e].target)
                .collect();

            if vertex.is_fanout {
                for &w in &successors {
                    self.forbid_succession(v, w);
                }
                for t in self.added() {
                    let tn = self.cp.state.tn(t, v);
                    if vertex.in_degree() == 0 {
                        self.exclude(tn, false);
                        continue;
                    }
                    let north_west = topo
                        .neighbour_within(self.ar, t, Direction::NorthWest)
                        .filter(|&nw| !ctx.is_regular() || self.layout.is_incoming_clocked(t, nw));
                    match north_west {
                        Some(nw) => {
                            let tc = self.cp.state.tc(nw, t);
                            self.add_clause([!tn, tc]);
                            if crossings {
                                let te = self.tile_edges(nw);
                                encode::at_most_one(self.solver(), &[tn], &te)?;
                            }
                        }
                        None => self.exclude(tn, false),
                    }
                }
            } else if vertex.kind.is_and_or_maj() {
                for &w in &successors {
                    let next = ntk.vertex(w);
                    if next.kind.is_and_or_maj()
                        || next.is_fanout
                        || (ctx.straight_inverters && next.kind == NodeKind::Inverter)
                    {
                        self.forbid_succession(v, w);
                    }
                }
                for t in self.tiles() {
                    let tn = self.cp.state.tn(t, v);
                    match topo.neighbour_within(self.ar, t, Direction::NorthEast) {
                        // the north-eastern neighbour may appear with a wider shape
                        None => self.exclude(tn, true),
                        Some(ne) => {
                            if crossings && (self.is_added(t) || self.is_added(ne)) {
                                let te = self.tile_edges(ne);
                                encode::at_most_one(self.solver(), &[tn], &te)?;
                            }
                        }
                    }
                    if let Some(se) = topo.neighbour_within(self.ar, t, Direction::SouthEast) {
                        if self.is_added(t) || self.is_added(se) {
                            let tc = self.cp.state.tc(t, se);
                            self.add_clause([!tn, !tc]);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// `v` and `w` never sit on directly connected tiles.
    fn forbid_succession(&mut self, v: usize, w: usize) {
        for t in self.tiles() {
            for at in self.outgoing(t) {
                if self.is_added(t) || self.is_added(at) {
                    let here = self.cp.state.tn(t, v);
                    let there = self.cp.state.tn(at, w);
                    self.add_clause([!here, !there]);
                }
            }
        }
    }

    /// Keeps blacklisted functions off their tiles, entirely or in the listed
    /// orientations.
    pub(super) fn apply_blacklist(&mut self) {
        let ctx = self.ctx;
        let topo = ctx.params.topology;
        for t in self.added_and_updated() {
            for entry in ctx.blacklist.at(t) {
                for holder in self.holders(t, entry.function) {
                    if entry.ports.is_empty() {
                        self.exclude(holder, false);
                        continue;
                    }
                    for ports in &entry.ports {
                        for &d in &ports.inputs {
                            if let Some(nb) = topo.neighbour_within(self.ar, t, d) {
                                let tc = self.cp.state.tc(nb, t);
                                self.add_clause([!holder, !tc]);
                            }
                        }
                        for &d in &ports.outputs {
                            if let Some(nb) = topo.neighbour_within(self.ar, t, d) {
                                let tc = self.cp.state.tc(t, nb);
                                self.add_clause([!holder, !tc]);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Literals placing `function` on `t`. Wire segments count as the
    /// identity.
    fn holders(&mut self, t: Tile, function: TruthTable) -> Vec<Lit> {
        let ctx = self.ctx;
        let mut holders: Vec<Lit> = ctx
            .network
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, vertex)| vertex.function == Some(function))
            .map(|(v, _)| self.cp.state.tn(t, v))
            .collect();
        if function.is_identity() {
            holders.extend(self.tile_edges(t));
        }
        holders
    }
}
