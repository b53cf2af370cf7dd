//! Global synchronization: all paths into a primary output take the same
//! number of clock phases, counting the start phase of their input and the
//! delays of synchronization elements on the way.

use super::ModelBuilder;
use crate::encode::{self, Counter};
use crate::sat::Lit;
use fcn_common::FcnResult;

impl ModelBuilder<'_> {
    /// Ties every primary input to the clock phase of its tile.
    pub(super) fn assign_pi_clocks(&mut self) -> FcnResult<()> {
        let ctx = self.ctx;
        if ctx.params.border_io && ctx.scheme.is_linear() {
            return Ok(());
        }
        let clocks = ctx.num_clocks();
        let inputs: Vec<usize> = ctx.network.inputs().collect();

        if self.cp.fresh {
            for &pi in &inputs {
                let ncl: Vec<Lit> = (0..clocks).map(|c| self.cp.state.ncl(pi, c)).collect();
                encode::exactly_one(self.solver(), &ncl)?;
            }
        }

        for t in self.added() {
            for &pi in &inputs {
                let tn = self.cp.state.tn(t, pi);
                if ctx.is_regular() {
                    let ncl = self.cp.state.ncl(pi, self.layout.clock_number(t));
                    self.add_clause([!tn, ncl]);
                } else {
                    for c in 0..clocks {
                        let ncl = self.cp.state.ncl(pi, c);
                        let tcl = self.cp.state.tcl(t, c);
                        self.add_clause([!tn, !ncl, tcl]);
                        self.add_clause([!tn, ncl, !tcl]);
                    }
                }
            }
        }
        Ok(())
    }

    /// Equalizes the lengths of all paths into each primary output.
    pub(super) fn global_synchronization(&mut self) -> FcnResult<()> {
        let ctx = self.ctx;
        if ctx.params.border_io {
            if ctx.is_scheme("2DDWAVE") {
                // inputs within one clock period of the origin share a wave
                let limit = u16::from(ctx.num_clocks()) - 1;
                let inputs: Vec<usize> = ctx.network.inputs().collect();
                for t in self.added() {
                    if t.x > limit || t.y > limit {
                        for &pi in &inputs {
                            let tn = self.cp.state.tn(t, pi);
                            self.exclude(tn, false);
                        }
                    }
                }
                return Ok(());
            }
            if ctx.is_scheme("COLUMNAR") || ctx.is_scheme("ROW") {
                return Ok(());
            }
        }

        for &po in ctx.network.outputs() {
            let paths = ctx.network.incoming_paths(po)?;
            if paths.len() < 2 {
                continue;
            }
            let mut counts: Vec<(Counter, i64)> = Vec::with_capacity(paths.len());
            for path in &paths {
                counts.push((self.path_length(path)?, path.len() as i64));
            }
            let guards = [self.cp.state.border.east, self.cp.state.border.south];
            let (first, first_edges) = &counts[0];
            for (count, edges) in &counts[1..] {
                // lengths include one phase per vertex on the path
                let d = first_edges - edges;
                let upper = (count.ceiling() as i64).max(first.ceiling() as i64 + d);
                for j in 1i64.min(d + 1)..=upper {
                    let solver = &mut self.cp.state.solver;
                    let longer = count.at_least(solver, j)?;
                    let shorter = first.at_least(solver, j - d)?;
                    encode::equate(solver, &guards, longer, shorter);
                }
            }
        }
        Ok(())
    }

    /// Counts the clock phases a path spends on wires, in delays and before
    /// its primary input starts.
    fn path_length(&mut self, path: &[usize]) -> FcnResult<Counter> {
        let ctx = self.ctx;
        let clocks = u32::from(ctx.num_clocks());
        let max_delay = ctx.params.max_synchronization_delay;
        let tiles = self.tiles();
        let mut inputs: Vec<(Lit, u32)> = Vec::new();

        if let Some(&e) = path.first() {
            let source = ctx.network.edges()[e].source;
            if ctx.network.vertex(source).is_pi() {
                for c in 1..ctx.num_clocks() {
                    inputs.push((self.cp.state.ncl(source, c), u32::from(c)));
                }
            }
        }

        for &e in path {
            for &t in &tiles {
                let te = self.cp.state.te(t, e);
                inputs.push((te, 1));
                if !ctx.sync_delays() {
                    continue;
                }
                let tse = self.cp.state.tse(t, max_delay);
                for (k, &delay) in tse.iter().enumerate() {
                    let delayed = match self.delayed_wires.get(&(t, e, k)) {
                        Some(&a) => a,
                        None => {
                            let a = self.cp.state.new_var();
                            self.add_clause([!a, te]);
                            self.add_clause([!a, delay]);
                            self.add_clause([a, !te, !delay]);
                            self.delayed_wires.insert((t, e, k), a);
                            a
                        }
                    };
                    inputs.push((delayed, clocks));
                }
            }
        }

        let area = self.ar.area() as usize;
        let clocks = clocks as usize;
        let reachable = 2 * area + clocks + clocks * usize::from(max_delay) * 2 * area;
        Counter::weighted(self.solver(), &inputs, reachable)
    }

    /// Delays are unary, and only tiles carrying a wire have one.
    pub(super) fn restrict_synchronization_elements(&mut self) {
        let max_delay = self.ctx.params.max_synchronization_delay;
        for t in self.added() {
            let tse = self.cp.state.tse(t, max_delay);
            let Some(&first) = tse.first() else {
                continue;
            };
            for pair in tse.windows(2) {
                self.add_clause([!pair[1], pair[0]]);
            }
            let mut clause = vec![!first];
            clause.extend(self.tile_edges(t));
            self.add_clause(clause);
        }
    }
}
