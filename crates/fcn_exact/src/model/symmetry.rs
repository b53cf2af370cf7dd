//! Symmetry breaking: tiles that cannot host an element in any solution are
//! ruled out up front.

use super::ModelBuilder;
use fcn_layout::Tile;

impl ModelBuilder<'_> {
    /// Vertices need as many usable neighbours as they have edges, wire
    /// segments at least one in each direction.
    ///
    /// Tiles on a moving border get more neighbours with the next shape, so
    /// their exclusions only hold for this one.
    pub(super) fn prevent_insufficiencies(&mut self) {
        let ctx = self.ctx;
        let topo = ctx.params.topology;
        let tiles: Vec<Tile> = self
            .tiles()
            .into_iter()
            .filter(|&t| self.is_added(t) || self.is_updated(t) || self.on_moving_border(t))
            .collect();

        for t in tiles {
            let per_shape = self.on_moving_border(t);
            let (out, inp, shared) = if ctx.is_regular() {
                (self.outgoing(t).len(), self.incoming(t).len(), false)
            } else {
                let adjacent = topo.adjacent_tiles(self.ar, t).len();
                (adjacent, adjacent, true)
            };

            for (v, vertex) in ctx.network.vertices().iter().enumerate() {
                let insufficient = if shared {
                    vertex.in_degree() + vertex.out_degree() > out
                } else {
                    vertex.out_degree() > out || vertex.in_degree() > inp
                };
                if insufficient {
                    let tn = self.cp.state.tn(t, v);
                    self.exclude(tn, per_shape);
                }
            }

            let no_wires = if shared { out < 2 } else { out == 0 || inp == 0 };
            if no_wires {
                for te in self.tile_edges(t) {
                    self.exclude(te, per_shape);
                }
            }
        }
    }

    /// With inputs and outputs on the border, a vertex of level `l` lies at
    /// least `l` tiles away from the input side and a vertex of inverse level
    /// `l` at least `l` tiles away from the output side.
    pub(super) fn utilize_hierarchy(&mut self) {
        let ctx = self.ctx;
        let ar = self.ar;
        let (w, h) = (u32::from(ar.width), u32::from(ar.height));

        // distance from the input and the output side
        let distances: fn(Tile, u32, u32) -> (u32, u32) = if ctx.is_scheme("COLUMNAR") {
            |t, w, _| (u32::from(t.x), w - 1 - u32::from(t.x))
        } else if ctx.is_scheme("ROW") {
            |t, _, h| (u32::from(t.y), h - 1 - u32::from(t.y))
        } else if ctx.is_scheme("2DDWAVE") {
            |t, w, h| {
                let (x, y) = (u32::from(t.x), u32::from(t.y));
                (x + y, (w - 1 - x) + (h - 1 - y))
            }
        } else {
            return;
        };
        let added = self.added();
        let tiles = self.tiles();
        for (v, vertex) in ctx.network.vertices().iter().enumerate() {
            for &t in &added {
                if distances(t, w, h).0 < vertex.level {
                    let tn = self.cp.state.tn(t, v);
                    self.exclude(tn, false);
                    for &e in &vertex.out_edges {
                        let te = self.cp.state.te(t, e);
                        self.exclude(te, false);
                    }
                }
            }

            // the output side moves with the shape
            for &t in &tiles {
                if distances(t, w, h).1 < vertex.inverse_level {
                    let tn = self.cp.state.tn(t, v);
                    self.exclude(tn, true);
                    for &e in &vertex.in_edges {
                        let te = self.cp.state.te(t, e);
                        self.exclude(te, true);
                    }
                }
            }
        }
    }
}
