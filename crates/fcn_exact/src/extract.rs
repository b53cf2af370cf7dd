//! Turns a model into a layout.

use crate::cache::Variables;
use crate::context::SearchContext;
use crate::sat::{Lit, Model};
use fcn_common::{FcnResult, InternalError};
use fcn_layout::{verify_layout, AspectRatio, GateLayout, GateLevelLayout, LayoutError, Signal, Tile};
use fcn_network::NodeKind;
use std::collections::HashMap;

/// Builds the layout `model` describes and checks it against the design
/// rules.
pub(crate) fn extract<L: GateLevelLayout>(
    ctx: &SearchContext,
    ar: AspectRatio,
    vars: &Variables,
    model: &Model,
) -> FcnResult<L> {
    let mut layout = L::create(ar, ctx.scheme, ctx.params.topology);
    {
        let mut builder = Extractor {
            ctx,
            ar,
            vars,
            model,
            layout: layout.gate_layout_mut(),
            branch: HashMap::new(),
        };
        builder.build()?;
    }

    if ctx.sync_delays() {
        if let Some(elements) = layout.synchronization_elements_mut() {
            for t in ar.tiles() {
                let delay = model.count(vars.get_tse(t));
                elements.assign_synchronization_delay(t, delay as u8);
            }
        }
    }

    let violations = verify_layout(layout.gate_layout());
    if !violations.is_empty() {
        let listed: Vec<String> = violations.iter().map(ToString::to_string).collect();
        return Err(InternalError::new(format!(
            "extracted layout violates design rules: {}",
            listed.join("; ")
        )));
    }
    Ok(layout)
}

struct Extractor<'a> {
    ctx: &'a SearchContext,
    ar: AspectRatio,
    vars: &'a Variables,
    model: &'a Model,
    layout: &'a mut GateLayout,
    /// Signal at the end of each routed edge.
    branch: HashMap<usize, Signal>,
}

impl Extractor<'_> {
    fn build(&mut self) -> FcnResult<()> {
        let ctx = self.ctx;
        let ntk = &ctx.network;
        let network = ntk.network();

        // 1. clock phases chosen by the model
        if !ctx.is_regular() {
            for t in self.ar.tiles() {
                let phase = (0..ctx.num_clocks()).find(|&c| self.holds(self.vars.get_tcl(t, c)));
                if let Some(c) = phase {
                    self.layout.assign_clock_number(t, c);
                }
            }
        }

        // 2. inputs keep their network order
        let names: Vec<&str> = (0..network.num_pis()).map(|i| network.pi_name(i)).collect();
        self.layout.reserve_inputs(&names);

        let tiles: Vec<Tile> = (0..ntk.num_vertices())
            .map(|v| self.tile_of(v))
            .collect::<FcnResult<_>>()?;

        // 3. vertices in topological order, each followed by its out-edges
        for (v, vertex) in ntk.vertices().iter().enumerate() {
            let t = tiles[v];
            let signal = if let Some(index) = vertex.pi_index {
                self.layout.place_input(index, t).map_err(placement_error)?
            } else if vertex.is_po() {
                continue;
            } else {
                let inputs = self.operands(v)?;
                self.layout
                    .create_gate(vertex.kind, t, &inputs)
                    .map_err(placement_error)?
            };
            for &e in &vertex.out_edges {
                let target = tiles[ntk.edges()[e].target];
                self.route(e, t, target, signal)?;
            }
        }

        // 4. outputs in network order
        for (index, &v) in ntk.outputs().iter().enumerate() {
            let input = self
                .operands(v)?
                .first()
                .copied()
                .ok_or_else(|| InternalError::new(format!("output {index} has no driver")))?;
            self.layout
                .create_output(tiles[v], input, network.po_name(index))
                .map_err(placement_error)?;
        }

        if let Some(name) = network.name() {
            self.layout.set_name(name);
        }
        Ok(())
    }

    fn holds(&self, lit: Option<Lit>) -> bool {
        lit.is_some_and(|l| self.model.value(l))
    }

    fn tile_of(&self, v: usize) -> FcnResult<Tile> {
        self.ar
            .tiles()
            .find(|&t| self.holds(self.vars.get_tn(t, v)))
            .ok_or_else(|| InternalError::new(format!("vertex {v} is not placed")))
    }

    /// Incoming signals of vertex `v` in the operand order of its node.
    fn operands(&self, v: usize) -> FcnResult<Vec<Signal>> {
        let ntk = &self.ctx.network;
        let network = ntk.network();
        let node = ntk.vertex(v).node;
        network
            .fanins(node)
            .iter()
            .map(|&f| {
                if let NodeKind::Constant(value) = network.kind(f) {
                    return Ok(Signal::Constant(value));
                }
                ntk.vertex_of(f)
                    .and_then(|source| ntk.edge_between(source, v))
                    .and_then(|e| self.branch.get(&e).copied())
                    .ok_or_else(|| InternalError::new(format!("operand {f} of vertex {v} is not routed")))
            })
            .collect()
    }

    /// Follows edge `e` from `start` to `target`, placing wire segments on the
    /// tiles the model routes it through.
    fn route(&mut self, e: usize, start: Tile, target: Tile, signal: Signal) -> FcnResult<()> {
        let topo = self.ctx.params.topology;
        let mut current = start;
        let mut signal = signal;
        let mut visited = vec![start];

        // a path can cross every tile twice
        for _ in 0..=2 * self.ar.area() {
            let connected = |at: Tile| self.holds(self.vars.get_tc(current, at));
            if topo.is_adjacent(current, target) && connected(target) {
                self.branch.insert(e, signal);
                return Ok(());
            }
            let next = topo
                .adjacent_tiles(self.ar, current)
                .into_iter()
                .find(|&at| {
                    !visited.contains(&at) && connected(at) && self.holds(self.vars.get_te(at, e))
                })
                .ok_or_else(|| {
                    InternalError::new(format!("edge {e} breaks off at {current}"))
                })?;
            let tile = if self.layout.is_empty_tile(next) {
                next
            } else {
                next.above()
            };
            signal = self.layout.create_wire(tile, signal).map_err(placement_error)?;
            visited.push(next);
            current = next;
        }
        Err(InternalError::new(format!("edge {e} does not reach {target}")))
    }
}

fn placement_error(err: LayoutError) -> InternalError {
    InternalError::new(format!("model places an element illegally: {err}"))
}
