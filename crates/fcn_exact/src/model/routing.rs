//! Local routing: every vertex and wire segment connects to its neighbours in
//! the network through clocked tiles, and tiles use exactly as many
//! connections as their content needs.

use super::ModelBuilder;
use crate::encode::{self, Bound, Counter};
use crate::sat::Lit;
use fcn_common::FcnResult;
use fcn_layout::Tile;
use std::collections::{HashMap, HashSet};

/// Which way information passes a tile boundary, seen from the tile.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Flow {
    Out,
    In,
}

impl ModelBuilder<'_> {
    /// A tile holding a vertex or an edge passes it on to a tile that
    /// carries the edge further or holds its target.
    pub(super) fn define_fanout_tiles(&mut self) {
        self.define_flow(Flow::Out);
    }

    /// A tile holding a vertex or an edge receives it from a tile that
    /// carries the edge or holds its source.
    pub(super) fn define_fanin_tiles(&mut self) {
        self.define_flow(Flow::In);
    }

    fn define_flow(&mut self, flow: Flow) {
        let ctx = self.ctx;
        let ntk = &ctx.network;
        let mut options = HashMap::new();
        for t in self.added_and_updated() {
            let neighbours = match flow {
                Flow::Out => self.outgoing(t),
                Flow::In => self.incoming(t),
            };
            for (v, vertex) in ntk.vertices().iter().enumerate() {
                let edges = match flow {
                    Flow::Out => &vertex.out_edges,
                    Flow::In => &vertex.in_edges,
                };
                if edges.is_empty() {
                    continue;
                }
                let holder = self.cp.state.tn(t, v);
                for &e in edges {
                    self.require_neighbour(t, holder, &neighbours, e, flow, &mut options);
                }
            }
            for e in 0..ntk.num_edges() {
                let holder = self.cp.state.te(t, e);
                self.require_neighbour(t, holder, &neighbours, e, flow, &mut options);
            }
        }
    }

    /// Adds `holder → ∨ x_at` over `neighbours`, where each option `x_at`
    /// implies the connection to `at` and that `at` continues edge `e`.
    fn require_neighbour(
        &mut self,
        t: Tile,
        holder: Lit,
        neighbours: &[Tile],
        e: usize,
        flow: Flow,
        options: &mut HashMap<(Tile, Tile, usize), Lit>,
    ) {
        let edge = self.ctx.network.edges()[e];
        let endpoint = match flow {
            Flow::Out => edge.target,
            Flow::In => edge.source,
        };
        let mut clause = Vec::with_capacity(neighbours.len() + 1);
        clause.push(!holder);
        for &at in neighbours {
            let x = match options.get(&(t, at, e)) {
                Some(&x) => x,
                None => {
                    let state = &mut self.cp.state;
                    let connection = match flow {
                        Flow::Out => state.tc(t, at),
                        Flow::In => state.tc(at, t),
                    };
                    let carries = state.te(at, e);
                    let holds = state.tn(at, endpoint);
                    let x = state.new_var();
                    state.add_clause([!x, connection]);
                    state.add_clause([!x, carries, holds]);
                    options.insert((t, at, e), x);
                    x
                }
            };
            clause.push(x);
        }
        self.add_for_tile(t, &clause);
    }

    /// One clock phase per tile of an irregular scheme. Connected tiles are
    /// one phase apart, and empty tiles are fixed to phase 0.
    pub(super) fn restrict_clocks(&mut self) -> FcnResult<()> {
        let clocks = self.ctx.num_clocks();
        let topo = self.ctx.params.topology;
        let mut done = HashSet::new();
        for t in self.added() {
            let tcl: Vec<Lit> = (0..clocks).map(|c| self.cp.state.tcl(t, c)).collect();
            encode::exactly_one(self.solver(), &tcl)?;

            let mut occupied = self.tile_nodes(t);
            occupied.extend(self.tile_edges(t));
            occupied.push(tcl[0]);
            self.add_clause(occupied);

            for at in topo.adjacent_tiles(self.ar, t) {
                for (from, to) in [(t, at), (at, t)] {
                    if !done.insert((from, to)) {
                        continue;
                    }
                    let tc = self.cp.state.tc(from, to);
                    for c in 0..clocks {
                        let here = self.cp.state.tcl(from, c);
                        let next = self.cp.state.tcl(to, (c + 1) % clocks);
                        self.add_clause([!tc, !here, next]);
                    }
                }
            }
        }
        Ok(())
    }

    /// Vertices use as many connections as they have edges, wire segments one
    /// in each direction, crossings two. Empty tiles have no connections.
    pub(super) fn define_number_of_connections(&mut self) -> FcnResult<()> {
        let ctx = self.ctx;
        let crossings = ctx.params.crossings;
        let ntk = &ctx.network;
        let max_degree = ntk
            .vertices()
            .iter()
            .map(|v| v.in_degree().max(v.out_degree()))
            .max()
            .unwrap_or(0)
            .max(2);
        for t in self.added_and_updated() {
            let guards = self.guards(t);
            let acc: Vec<Lit> = self
                .outgoing(t)
                .into_iter()
                .map(|at| self.cp.state.tc(t, at))
                .collect();
            let iacc: Vec<Lit> = self
                .incoming(t)
                .into_iter()
                .map(|at| self.cp.state.tc(at, t))
                .collect();
            let tn = self.tile_nodes(t);
            let te = self.tile_edges(t);
            let solver = self.solver();
            let outgoing = Counter::new(solver, &acc, 0..=max_degree)?;
            let incoming = Counter::new(solver, &iacc, 0..=max_degree)?;

            for (vertex, &holder) in ntk.vertices().iter().zip(&tn) {
                let mut premise = guards.clone();
                premise.push(holder);
                outgoing.require_exactly(solver, &premise, vertex.out_degree())?;
                incoming.require_exactly(solver, &premise, vertex.in_degree())?;
            }

            if !te.is_empty() {
                let wires = Counter::new(solver, &te, 0..=2)?;
                let mut single = guards.clone();
                if let Bound::Lit(one) = wires.at_least(solver, 1)? {
                    single.push(one);
                }
                let two = wires.at_least(solver, 2)?;
                if let Bound::Lit(two) = two {
                    single.push(!two);
                }
                outgoing.require_exactly(solver, &single, 1)?;
                incoming.require_exactly(solver, &single, 1)?;

                if let (true, Bound::Lit(two)) = (crossings, two) {
                    if acc.len() < 2 || iacc.len() < 2 {
                        encode::add_guarded(solver, &guards, &[!two]);
                    } else {
                        let mut double = guards.clone();
                        double.push(two);
                        outgoing.require_exactly(solver, &double, 2)?;
                        incoming.require_exactly(solver, &double, 2)?;
                    }
                }
            }

            let occupancy: Vec<Lit> = tn.iter().chain(&te).copied().collect();
            for &connection in acc.iter().chain(&iacc) {
                let mut clause = Vec::with_capacity(occupancy.len() + 1);
                clause.push(!connection);
                clause.extend(&occupancy);
                encode::add_guarded(solver, &guards, &clause);
            }
        }
        Ok(())
    }
}
