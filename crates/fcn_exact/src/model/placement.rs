//! Tile exclusivity, vertex placement and border I/O.

use super::ModelBuilder;
use crate::encode::{self, Counter};
use crate::sat::Lit;
use fcn_common::FcnResult;

impl ModelBuilder<'_> {
    /// A tile holds one vertex, or with crossings up to two edges and no
    /// vertex. Without crossings it holds one vertex or one edge.
    pub(super) fn restrict_tile_elements(&mut self) -> FcnResult<()> {
        let crossings = self.ctx.params.crossings;
        for t in self.added() {
            let tn = self.tile_nodes(t);
            let te = self.tile_edges(t);
            let solver = self.solver();
            if !crossings {
                let all: Vec<Lit> = tn.into_iter().chain(te).collect();
                encode::at_most_one(solver, &[], &all)?;
                continue;
            }
            encode::at_most_one(solver, &[], &tn)?;
            if te.len() > 2 {
                let count = Counter::new(solver, &te, 2..=2)?;
                let at_most_two = count.at_most(solver, 2)?;
                encode::require(solver, &[], at_most_two);
            }
            if !tn.is_empty() && !te.is_empty() {
                let has_node = solver.new_var();
                for &n in &tn {
                    solver.add_clause([!n, has_node]);
                }
                for &e in &te {
                    solver.add_clause([!e, !has_node]);
                }
            }
        }
        Ok(())
    }

    /// Every vertex sits on exactly one tile of the shape.
    ///
    /// The at-least-one half spans the whole shape and only holds while both
    /// border literals do. The at-most-one half stays valid for larger shapes.
    pub(super) fn restrict_vertices(&mut self) -> FcnResult<()> {
        let border = self.cp.state.border;
        let tiles = self.tiles();
        for v in 0..self.ctx.network.num_vertices() {
            let tn: Vec<Lit> = tiles.iter().map(|&t| self.cp.state.tn(t, v)).collect();
            let solver = self.solver();
            encode::add_guarded(solver, &[border.east, border.south], &tn);
            encode::at_most_one(solver, &[], &tn)?;
        }
        Ok(())
    }

    /// Primary inputs and outputs on the border. Columnar and row schemes
    /// pin them to the side their information enters and leaves.
    pub(super) fn enforce_border_io(&mut self) {
        let ctx = self.ctx;
        let topo = ctx.params.topology;
        let ar = self.ar;
        let columnar = ctx.is_scheme("COLUMNAR");
        let row = ctx.is_scheme("ROW");
        let added = self.added();
        let touched = self.added_and_updated();

        for v in ctx.network.inputs() {
            // western and northern borders never move
            if columnar || row {
                for &t in &added {
                    if (columnar && t.x != 0) || (row && t.y != 0) {
                        let tn = self.cp.state.tn(t, v);
                        self.exclude(tn, false);
                    }
                }
            } else {
                for &t in &touched {
                    if !topo.is_border(ar, t) {
                        let tn = self.cp.state.tn(t, v);
                        self.exclude(tn, false);
                    }
                }
            }
        }

        for &v in ctx.network.outputs() {
            for &t in &touched {
                let allowed = if columnar {
                    topo.is_eastern_border(ar, t)
                } else if row {
                    topo.is_southern_border(ar, t)
                } else {
                    topo.is_border(ar, t)
                };
                if !allowed {
                    let tn = self.cp.state.tn(t, v);
                    self.exclude(tn, false);
                }
            }
        }
    }
}
