//! The search over aspect ratios.
//!
//! Workers pull shapes from one shared cursor in enumeration order. Each
//! worker owns its solver cache and its interrupt. A worker that finds a
//! layout publishes it if it is strictly smaller than the best one so far
//! and interrupts every peer busy with a shape at least as large.

use crate::aspect_ratio::AspectRatioIter;
use crate::cache::SolverCache;
use crate::codes;
use crate::context::SearchContext;
use crate::extract::extract;
use crate::model;
use crate::objective;
use crate::sat::{Interrupt, SolveOutcome};
use fcn_common::{FcnResult, InternalError};
use fcn_diagnostics::{Diagnostic, DiagnosticSink, Location};
use fcn_layout::{AspectRatio, GateLevelLayout, Topology};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// What an exploration leaves behind.
pub(crate) struct Exploration<L> {
    /// The smallest layout found, with its shape.
    pub best: Option<(AspectRatio, L)>,
    /// Shapes taken from the cursor, skipped ones included.
    pub num_aspect_ratios: usize,
    /// The deadline ended at least one worker.
    pub timed_out: bool,
}

/// Explores shapes from the lower bound up to the area bound with
/// `ctx.params.num_threads` workers.
pub(crate) fn explore<L: GateLevelLayout>(
    ctx: &SearchContext,
    deadline: Option<Instant>,
    sink: &DiagnosticSink,
) -> FcnResult<Exploration<L>> {
    let bound = ctx.params.area_bound();
    let start = if ctx.params.fixed_size {
        bound
    } else {
        ctx.network.num_vertices() as u64
    };
    let workers = ctx.params.num_threads.max(1);
    let coordinator = Coordinator {
        ctx,
        sink,
        bound,
        cursor: Mutex::new(AspectRatioIter::new(start)),
        best: Mutex::new(None),
        claims: Mutex::new(
            (0..workers)
                .map(|_| Claim {
                    area: None,
                    interrupt: Interrupt::new(deadline),
                })
                .collect(),
        ),
        examined: AtomicUsize::new(0),
        timed_out: AtomicBool::new(false),
    };

    if workers == 1 {
        coordinator.run(0)?;
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("exact-worker-{i}"))
            .build()
            .map_err(|e| InternalError::new(format!("cannot start workers: {e}")))?;
        pool.install(|| {
            (0..workers)
                .into_par_iter()
                .try_for_each(|id| coordinator.run(id))
        })?;
    }

    Ok(Exploration {
        num_aspect_ratios: coordinator.examined.load(Ordering::Relaxed),
        timed_out: coordinator.timed_out.load(Ordering::Relaxed),
        best: coordinator.best.into_inner().unwrap_or_else(PoisonError::into_inner),
    })
}

/// The shape a worker is busy with, and the way to stop it.
struct Claim {
    area: Option<u64>,
    interrupt: Interrupt,
}

enum Attempt<L> {
    Found(L),
    Unsat,
    Interrupted,
}

struct Coordinator<'a, L> {
    ctx: &'a SearchContext,
    sink: &'a DiagnosticSink,
    bound: u64,
    cursor: Mutex<AspectRatioIter>,
    best: Mutex<Option<(AspectRatio, L)>>,
    claims: Mutex<Vec<Claim>>,
    examined: AtomicUsize,
    timed_out: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn location(ar: AspectRatio) -> Location {
    Location::AspectRatio {
        width: ar.width,
        height: ar.height,
    }
}

impl<L: GateLevelLayout> Coordinator<'_, L> {
    /// The loop of worker `id`. Returns once the cursor passes the bound, a
    /// smaller layout exists or the worker is interrupted.
    fn run(&self, id: usize) -> FcnResult<()> {
        let interrupt = lock(&self.claims)[id].interrupt.clone();
        let mut cache = SolverCache::new(interrupt.clone());
        let mut previous: Option<AspectRatio> = None;

        loop {
            if interrupt.is_triggered() {
                self.note_timeout(&interrupt);
                return Ok(());
            }
            let Some(ar) = self.claim() else {
                return Ok(());
            };
            // the claim is visible before the best layout is read, so a
            // publishing peer either sees it or this worker sees the layout
            lock(&self.claims)[id].area = Some(ar.area());
            if self.best_area().is_some_and(|best| ar.area() >= best) {
                return Ok(());
            }

            self.examined.fetch_add(1, Ordering::Relaxed);
            self.sink.emit(Diagnostic::note(
                codes::EXAMINING,
                format!("examining {}x{}", ar.width, ar.height),
                location(ar),
            ));
            if is_skippable(self.ctx, ar, previous) {
                self.sink.emit(Diagnostic::note(
                    codes::SKIPPED,
                    format!("{}x{} cannot hold the network", ar.width, ar.height),
                    location(ar),
                ));
                continue;
            }
            previous = Some(ar);

            match attempt::<L>(self.ctx, &mut cache, ar, self.sink)? {
                Attempt::Found(layout) => {
                    self.publish(id, ar, layout);
                    return Ok(());
                }
                Attempt::Unsat => {}
                Attempt::Interrupted => {
                    self.note_timeout(&interrupt);
                    return Ok(());
                }
            }
        }
    }

    /// Takes the next shape within the bound.
    fn claim(&self) -> Option<AspectRatio> {
        let mut cursor = lock(&self.cursor);
        if *cursor > self.bound {
            return None;
        }
        cursor.next()
    }

    fn best_area(&self) -> Option<u64> {
        lock(&self.best).as_ref().map(|(ar, _)| ar.area())
    }

    fn publish(&self, id: usize, ar: AspectRatio, layout: L) {
        {
            let mut best = lock(&self.best);
            if best.as_ref().is_some_and(|(b, _)| b.area() <= ar.area()) {
                return;
            }
            *best = Some((ar, layout));
        }
        self.sink.emit(Diagnostic::note(
            codes::FOUND,
            format!("found a {}x{} layout", ar.width, ar.height),
            location(ar),
        ));
        for (other, claim) in lock(&self.claims).iter().enumerate() {
            if other != id && claim.area.is_some_and(|a| a >= ar.area()) {
                claim.interrupt.trigger();
            }
        }
    }

    fn note_timeout(&self, interrupt: &Interrupt) {
        if interrupt.timed_out() {
            self.timed_out.store(true, Ordering::Relaxed);
        }
    }
}

/// Builds the model of `ar` on top of the cached states, solves it and
/// extracts the layout of a model.
fn attempt<L: GateLevelLayout>(
    ctx: &SearchContext,
    cache: &mut SolverCache,
    ar: AspectRatio,
    sink: &DiagnosticSink,
) -> FcnResult<Attempt<L>> {
    let mut cp = cache.fetch(ar);
    model::generate(ctx, ar, &mut cp)?;
    let assumptions = cp.solve_assumptions();
    match cp.state.solver.solve(&assumptions) {
        SolveOutcome::Sat => {
            let found = cp.state.solver.model();
            let layout = objective::optimize(ctx, ar, &cp.state, &assumptions, found)
                .and_then(|best| extract::<L>(ctx, ar, &cp.state.vars, &best));
            match layout {
                Ok(layout) => Ok(Attempt::Found(layout)),
                Err(e) => {
                    sink.emit(Diagnostic::error(codes::INTERNAL, e.to_string(), location(ar)));
                    Err(e)
                }
            }
        }
        SolveOutcome::Unsat => {
            cache.store(ar, cp.state);
            sink.emit(Diagnostic::note(
                codes::CACHED,
                format!("kept the solver state of {}x{}", ar.width, ar.height),
                location(ar),
            ));
            Ok(Attempt::Unsat)
        }
        SolveOutcome::Interrupted => Ok(Attempt::Interrupted),
    }
}

/// Returns `true` if `ar` provably cannot hold the network, or is the
/// rotation of `previous`, the shape this worker solved last.
pub(crate) fn is_skippable(
    ctx: &SearchContext,
    ar: AspectRatio,
    previous: Option<AspectRatio>,
) -> bool {
    let params = &ctx.params;
    if ar.area() > params.area_bound()
        || ar.width > params.upper_bound_x
        || ar.height > params.upper_bound_y
    {
        return true;
    }

    // irregular clocks on the plain grid look the same turned by 90 degrees
    if !ctx.is_regular() {
        return params.topology == Topology::Cartesian
            && ctx.blacklist.is_empty()
            && ar.width != ar.height
            && previous == Some(ar.transposed());
    }

    let network = ctx.network.network();
    let io = network.num_pis().max(network.num_pos());
    let depth = u64::from(ctx.network.depth());
    // every edge advances one column (row) in a columnar (row) scheme
    if ctx.is_scheme("COLUMNAR") {
        return u64::from(ar.width) <= depth
            || (params.border_io && usize::from(ar.height) < io);
    }
    if ctx.is_scheme("ROW") {
        return u64::from(ar.height) <= depth
            || (params.border_io && usize::from(ar.width) < io);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blacklist::SurfaceBlacklist;
    use crate::params::ExactParams;
    use fcn_layout::{GateLayout, GateLevelLayout};
    use fcn_network::{blueprints, LogicNetwork};

    fn context(ntk: LogicNetwork, params: ExactParams) -> SearchContext {
        crate::prepare(
            &ntk,
            &params,
            SurfaceBlacklist::new(),
            GateLayout::capabilities(),
            &DiagnosticSink::new(),
        )
        .unwrap()
    }

    #[test]
    fn bounds_skip_oversized_shapes() {
        let params = ExactParams {
            upper_bound_x: 3,
            upper_bound_y: 2,
            ..Default::default()
        };
        let ctx = context(blueprints::and_network(), params);
        assert!(!is_skippable(&ctx, AspectRatio::new(3, 2), None));
        assert!(is_skippable(&ctx, AspectRatio::new(4, 1), None));
        assert!(is_skippable(&ctx, AspectRatio::new(1, 3), None));
    }

    #[test]
    fn columnar_needs_a_column_per_level() {
        let params = ExactParams {
            scheme: "columnar".into(),
            border_io: true,
            ..Default::default()
        };
        // a, b -> and -> po: depth 2, two inputs
        let ctx = context(blueprints::and_network(), params);
        assert!(is_skippable(&ctx, AspectRatio::new(2, 3), None));
        assert!(is_skippable(&ctx, AspectRatio::new(3, 1), None));
        assert!(!is_skippable(&ctx, AspectRatio::new(3, 2), None));
    }

    #[test]
    fn row_is_columnar_turned() {
        let params = ExactParams {
            scheme: "row".into(),
            border_io: true,
            ..Default::default()
        };
        let ctx = context(blueprints::and_network(), params);
        assert!(is_skippable(&ctx, AspectRatio::new(3, 2), None));
        assert!(!is_skippable(&ctx, AspectRatio::new(2, 3), None));
    }

    #[test]
    fn open_skips_the_rotation_of_the_last_shape() {
        let params = ExactParams {
            scheme: "open".into(),
            ..Default::default()
        };
        let ctx = context(blueprints::and_network(), params);
        let ar = AspectRatio::new(3, 2);
        assert!(!is_skippable(&ctx, ar, None));
        assert!(is_skippable(&ctx, ar, Some(AspectRatio::new(2, 3))));
        assert!(!is_skippable(&ctx, AspectRatio::new(2, 2), Some(AspectRatio::new(2, 2))));
    }

    #[test]
    fn single_worker_finds_the_and_gate() {
        let ctx = context(blueprints::and_network(), ExactParams::default());
        let sink = DiagnosticSink::new();
        let found = explore::<GateLayout>(&ctx, None, &sink).unwrap();
        let (ar, layout) = found.best.unwrap();
        assert_eq!(ar.area(), 6);
        assert_eq!(layout.num_gates(), 1);
        assert!(!found.timed_out);
        assert!(found.num_aspect_ratios >= 2);
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::FOUND));
    }

    #[test]
    fn exhausted_bound_yields_nothing() {
        let params = ExactParams {
            upper_bound_area: 5,
            ..Default::default()
        };
        let ctx = context(blueprints::and_network(), params);
        let sink = DiagnosticSink::new();
        let found = explore::<GateLayout>(&ctx, None, &sink).unwrap();
        assert!(found.best.is_none());
        // 4 and 5 tiles: 1x4 2x2 4x1 1x5 5x1
        assert_eq!(found.num_aspect_ratios, 5);
    }

    #[test]
    fn several_workers_agree_on_the_area() {
        let params = ExactParams {
            num_threads: 3,
            ..Default::default()
        };
        let ctx = context(blueprints::and_network(), params);
        let sink = DiagnosticSink::new();
        let found = explore::<GateLayout>(&ctx, None, &sink).unwrap();
        assert_eq!(found.best.unwrap().0.area(), 6);
    }
}
