//! Single-shape checks outside the search loop.
//!
//! A [`ShapeProbe`] answers whether one aspect ratio admits a placement,
//! either by growing the states it cached for smaller shapes or on a fresh
//! solver. Comparing the two is how state reuse is validated.

use crate::blacklist::SurfaceBlacklist;
use crate::cache::SolverCache;
use crate::context::SearchContext;
use crate::error::ExactError;
use crate::explore;
use crate::model;
use crate::params::ExactParams;
use crate::sat::{Interrupt, SolveOutcome};
use fcn_common::FcnResult;
use fcn_diagnostics::DiagnosticSink;
use fcn_layout::{AspectRatio, GateLayout, GateLevelLayout};
use fcn_network::LogicNetwork;

/// A prepared network with a solver cache of its own.
pub struct ShapeProbe {
    ctx: SearchContext,
    cache: SolverCache,
}

impl ShapeProbe {
    /// Prepares `network` for [`GateLayout`] targets.
    pub fn new(network: &LogicNetwork, params: &ExactParams) -> Result<Self, ExactError> {
        Self::with_blacklist(network, &SurfaceBlacklist::new(), params)
    }

    /// Prepares `network` with surface restrictions.
    pub fn with_blacklist(
        network: &LogicNetwork,
        blacklist: &SurfaceBlacklist,
        params: &ExactParams,
    ) -> Result<Self, ExactError> {
        let sink = DiagnosticSink::new();
        let ctx = crate::prepare(
            network,
            params,
            blacklist.clone(),
            GateLayout::capabilities(),
            &sink,
        )?;
        Ok(Self {
            ctx,
            cache: SolverCache::new(Interrupt::new(None)),
        })
    }

    /// Drops the level-distance pruning of border I/O runs, leaving a model
    /// whose satisfiability the pruning must not change.
    pub fn without_hierarchy(mut self) -> Self {
        self.ctx.hierarchy = false;
        self
    }

    /// Returns the smallest area the search starts at.
    pub fn lower_bound(&self) -> u64 {
        self.ctx.network.num_vertices() as u64
    }

    /// Solves `ar` on top of the cached states. Unsatisfiable states are
    /// cached in turn.
    pub fn check(&mut self, ar: AspectRatio) -> FcnResult<SolveOutcome> {
        let mut cp = self.cache.fetch(ar);
        model::generate(&self.ctx, ar, &mut cp)?;
        let assumptions = cp.solve_assumptions();
        let outcome = cp.state.solver.solve(&assumptions);
        if outcome == SolveOutcome::Unsat {
            self.cache.store(ar, cp.state);
        }
        Ok(outcome)
    }

    /// Solves `ar` on a solver built for it alone.
    pub fn check_fresh(&self, ar: AspectRatio) -> FcnResult<SolveOutcome> {
        let mut cp = SolverCache::new(Interrupt::new(None)).fetch(ar);
        model::generate(&self.ctx, ar, &mut cp)?;
        let assumptions = cp.solve_assumptions();
        Ok(cp.state.solver.solve(&assumptions))
    }

    /// Returns `true` if the search skips `ar` after solving `previous`.
    pub fn is_skippable(&self, ar: AspectRatio, previous: Option<AspectRatio>) -> bool {
        explore::is_skippable(&self.ctx, ar, previous)
    }

    /// Returns the number of cached solver states.
    pub fn num_cached(&self) -> usize {
        self.cache.len()
    }
}
