//! Lexicographic minimization of a found placement.
//!
//! The incremental solver of a shape is never touched: its clause log is
//! replayed into a fresh solver with the shape assumptions as unit clauses.
//! Each objective is then lowered one step at a time under an assumption and
//! fixed at its optimum with a hard clause before the next one starts.

use crate::cache::SolverState;
use crate::context::SearchContext;
use crate::encode::{self, Bound, Counter};
use crate::sat::{Lit, Model, SatSolver, SolveOutcome};
use fcn_common::FcnResult;
use fcn_layout::{AspectRatio, Tile};

/// What a layout is minimized for, in order of priority.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Objective {
    /// Wire segments.
    Wires,
    /// Tiles with two wire segments.
    Crossings,
    /// Sum of synchronization delays.
    SynchronizationDelay,
}

impl Objective {
    /// Returns the objectives a run asks for.
    pub fn enabled(ctx: &SearchContext) -> Vec<Objective> {
        let mut objectives = Vec::new();
        if ctx.params.minimize_wires {
            objectives.push(Objective::Wires);
        }
        if ctx.params.minimize_crossings && ctx.params.crossings {
            objectives.push(Objective::Crossings);
        }
        if ctx.sync_delays() {
            objectives.push(Objective::SynchronizationDelay);
        }
        objectives
    }
}

/// How a descent ended.
#[derive(Debug, PartialEq, Eq)]
enum Descent {
    /// The cost reached its minimum, which is now fixed.
    Converged(Model),
    /// The interrupt fired; the model is the best one found.
    Interrupted(Model),
}

/// Improves `model`, a model of `state` under `assumptions`, objective by
/// objective. An interrupt ends the descent with the best model so far.
pub(crate) fn optimize(
    ctx: &SearchContext,
    ar: AspectRatio,
    state: &SolverState,
    assumptions: &[Lit],
    model: Model,
) -> FcnResult<Model> {
    let objectives = Objective::enabled(ctx);
    if objectives.is_empty() {
        return Ok(model);
    }
    let mut solver = state.solver.replay(assumptions);
    let mut best = model;
    for objective in objectives {
        let lits = cost_literals(objective, ctx, ar, state, &mut solver)?;
        match descend(&mut solver, &lits, best)? {
            Descent::Converged(improved) => best = improved,
            Descent::Interrupted(kept) => return Ok(kept),
        }
    }
    Ok(best)
}

/// The literals whose count is the cost of `objective`.
fn cost_literals(
    objective: Objective,
    ctx: &SearchContext,
    ar: AspectRatio,
    state: &SolverState,
    solver: &mut SatSolver,
) -> FcnResult<Vec<Lit>> {
    let edges = ctx.network.num_edges();
    let tile_edges = |t: Tile| -> Vec<Lit> {
        (0..edges)
            .filter_map(|e| state.vars.get_te(t, e))
            .collect()
    };
    let lits = match objective {
        Objective::Wires => ar.tiles().flat_map(tile_edges).collect(),
        Objective::Crossings => {
            let mut crossings = Vec::new();
            for t in ar.tiles() {
                let wires = Counter::new(solver, &tile_edges(t), 1..=2)?;
                if let Bound::Lit(crossing) = wires.at_least(solver, 2)? {
                    crossings.push(crossing);
                }
            }
            crossings
        }
        Objective::SynchronizationDelay => ar
            .tiles()
            .flat_map(|t| state.vars.get_tse(t).to_vec())
            .collect(),
    };
    Ok(lits)
}

/// Lowers the number of true `lits` until the solver refuses, then fixes the
/// count at the reached minimum.
///
fn descend(solver: &mut SatSolver, lits: &[Lit], model: Model) -> FcnResult<Descent> {
    let mut best = model;
    let mut cost = best.count(lits);
    if lits.is_empty() {
        return Ok(Descent::Converged(best));
    }
    let count = Counter::new(solver, lits, 0..=cost)?;

    while cost > 0 {
        let Bound::Lit(below) = count.at_most(solver, cost as i64 - 1)? else {
            break;
        };
        match solver.solve(&[below]) {
            SolveOutcome::Sat => {
                best = solver.model();
                cost = best.count(lits);
            }
            SolveOutcome::Unsat => break,
            SolveOutcome::Interrupted => return Ok(Descent::Interrupted(best)),
        }
    }
    let optimum = count.at_most(solver, cost as i64)?;
    encode::require(solver, &[], optimum);
    Ok(Descent::Converged(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::Interrupt;

    #[test]
    fn descent_reaches_the_minimum() {
        let mut solver = SatSolver::new(Interrupt::new(None));
        let x: Vec<Lit> = (0..4).map(|_| solver.new_var()).collect();
        // at least two of the four
        solver.add_clause([x[0], x[1]]);
        solver.add_clause([x[2], x[3]]);
        solver.add_clause(x.iter().copied());
        assert_eq!(solver.solve(&x), SolveOutcome::Sat);
        let start = solver.model();
        assert_eq!(start.count(&x), 4);

        let Descent::Converged(best) = descend(&mut solver, &x, start).unwrap() else {
            panic!("descent was interrupted");
        };
        assert_eq!(best.count(&x), 2);
        // the optimum is now a hard constraint
        assert_eq!(solver.solve(&x[..3]), SolveOutcome::Unsat);
        assert_eq!(solver.solve(&[x[0], x[2]]), SolveOutcome::Sat);
    }

    #[test]
    fn interrupted_descent_keeps_the_start() {
        let interrupt = Interrupt::new(None);
        let mut solver = SatSolver::new(interrupt.clone());
        let x: Vec<Lit> = (0..3).map(|_| solver.new_var()).collect();
        assert_eq!(solver.solve(&x), SolveOutcome::Sat);
        let start = solver.model();
        interrupt.trigger();
        let kept = descend(&mut solver, &x, start.clone()).unwrap();
        assert_eq!(kept, Descent::Interrupted(start));
    }

    #[test]
    fn zero_cost_needs_no_search() {
        let mut solver = SatSolver::new(Interrupt::new(None));
        let x = solver.new_var();
        assert_eq!(solver.solve(&[!x]), SolveOutcome::Sat);
        let start = solver.model();
        let best = descend(&mut solver, &[x], start.clone()).unwrap();
        assert_eq!(best, Descent::Converged(start));
    }
}
