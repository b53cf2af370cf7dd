//! Cardinality constraints on top of RustSAT encodings.
//!
//! At-most-one goes to `am1::Pairwise` or `am1::Ladder` depending on the
//! length of the list. Counting goes to a `card::Totalizer` encoded in both
//! directions, so that its bounds can be read as literals and compared.

use crate::sat::{Lit, SatSolver};
use fcn_common::{FcnResult, InternalError};
use rustsat::encodings::am1::{self, Encode as _};
use rustsat::encodings::card::{BoundBoth as _, BoundLower as _, BoundUpper as _, Totalizer};
use std::ops::RangeInclusive;

/// Lists up to this length get pairwise at-most-one clauses.
const PAIRWISE_LIMIT: usize = 6;

/// A bound that is either decided while encoding or depends on a literal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    /// Holds in every model.
    True,
    /// Holds in no model.
    False,
    /// Holds iff the literal does.
    Lit(Lit),
}

impl Bound {
    /// Returns the negated bound.
    pub fn negate(self) -> Bound {
        match self {
            Bound::True => Bound::False,
            Bound::False => Bound::True,
            Bound::Lit(l) => Bound::Lit(!l),
        }
    }
}

/// Adds `guards → clause`: the clause extended by the negated guards.
pub fn add_guarded(solver: &mut SatSolver, guards: &[Lit], clause: &[Lit]) {
    solver.add_clause(guards.iter().map(|&g| !g).chain(clause.iter().copied()));
}

/// Adds `guards → bound`.
pub fn require(solver: &mut SatSolver, guards: &[Lit], bound: Bound) {
    match bound {
        Bound::True => {}
        Bound::False => add_guarded(solver, guards, &[]),
        Bound::Lit(l) => add_guarded(solver, guards, &[l]),
    }
}

/// Adds `guards → (a ⇔ b)`.
pub fn equate(solver: &mut SatSolver, guards: &[Lit], a: Bound, b: Bound) {
    match (a, b) {
        (Bound::Lit(x), Bound::Lit(y)) => {
            add_guarded(solver, guards, &[!x, y]);
            add_guarded(solver, guards, &[x, !y]);
        }
        (Bound::Lit(x), fixed) | (fixed, Bound::Lit(x)) => {
            let x = if fixed == Bound::True { x } else { !x };
            add_guarded(solver, guards, &[x]);
        }
        (x, y) if x == y => {}
        _ => add_guarded(solver, guards, &[]),
    }
}

/// Adds `guards → at most one of lits`.
pub fn at_most_one(solver: &mut SatSolver, guards: &[Lit], lits: &[Lit]) -> FcnResult<()> {
    if lits.len() < 2 {
        return Ok(());
    }
    let lits = lits.iter().map(|&l| rustsat::types::Lit::from(l));
    if lits.len() <= PAIRWISE_LIMIT {
        let mut pairwise = am1::Pairwise::from_iter(lits);
        solver.encode(guards, |cnf, vars| pairwise.encode(cnf, vars))
    } else {
        let mut ladder = am1::Ladder::from_iter(lits);
        solver.encode(guards, |cnf, vars| ladder.encode(cnf, vars))
    }
}

/// Requires exactly one of `lits`. An empty list makes the solver
/// unsatisfiable.
pub fn exactly_one(solver: &mut SatSolver, lits: &[Lit]) -> FcnResult<()> {
    solver.add_clause(lits.iter().copied());
    at_most_one(solver, &[], lits)
}

/// The number of true literals in a list, or the weighted sum of a list.
///
/// Bounds are readable for the range the counter was encoded for. A bound
/// above the ceiling is decided without the encoding.
pub struct Counter {
    totalizer: Totalizer,
    ceiling: usize,
}

impl Counter {
    /// Counts `lits`, with bounds readable within `bounds`.
    pub fn new(
        solver: &mut SatSolver,
        lits: &[Lit],
        bounds: RangeInclusive<usize>,
    ) -> FcnResult<Self> {
        Self::encode(solver, lits.iter().copied(), lits.len(), bounds)
    }

    /// Sums `inputs`, each literal counting with its weight, for a sum known
    /// to never exceed `ceiling`. Every bound up to the ceiling is readable.
    pub fn weighted(
        solver: &mut SatSolver,
        inputs: &[(Lit, u32)],
        ceiling: usize,
    ) -> FcnResult<Self> {
        // a literal heavier than the ceiling is just as false as one at it
        let lits = inputs.iter().flat_map(|&(l, w)| {
            std::iter::repeat(l).take((w as usize).min(ceiling + 1))
        });
        let total: usize = inputs.iter().map(|&(_, w)| w as usize).sum();
        Self::encode(solver, lits, total.min(ceiling), 0..=ceiling)
    }

    fn encode(
        solver: &mut SatSolver,
        lits: impl Iterator<Item = Lit>,
        ceiling: usize,
        bounds: RangeInclusive<usize>,
    ) -> FcnResult<Self> {
        let mut totalizer: Totalizer = lits.map(rustsat::types::Lit::from).collect();
        if ceiling > 0 {
            let bounds = *bounds.start()..=(*bounds.end()).min(ceiling);
            solver.encode(&[], |cnf, vars| totalizer.encode_both(bounds, cnf, vars))?;
        }
        Ok(Self { totalizer, ceiling })
    }

    /// Returns the largest value the count can take.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Returns the bound `count >= k`.
    pub fn at_least(&self, solver: &mut SatSolver, k: i64) -> FcnResult<Bound> {
        if k <= 0 {
            return Ok(Bound::True);
        }
        let k = k as usize;
        if k > self.ceiling {
            return Ok(Bound::False);
        }
        let lits = self
            .totalizer
            .enforce_lb(k)
            .map_err(|err| InternalError::new(format!("count >= {k}: {err}")))?;
        Ok(conjunction(solver, lits))
    }

    /// Returns the bound `count <= k`.
    pub fn at_most(&self, solver: &mut SatSolver, k: i64) -> FcnResult<Bound> {
        if k < 0 {
            return Ok(Bound::False);
        }
        let k = k as usize;
        if k >= self.ceiling {
            return Ok(Bound::True);
        }
        let lits = self
            .totalizer
            .enforce_ub(k)
            .map_err(|err| InternalError::new(format!("count <= {k}: {err}")))?;
        Ok(conjunction(solver, lits))
    }

    /// Adds `guards → count = k`.
    pub fn require_exactly(
        &self,
        solver: &mut SatSolver,
        guards: &[Lit],
        k: usize,
    ) -> FcnResult<()> {
        let k = k as i64;
        let at_least = self.at_least(solver, k)?;
        require(solver, guards, at_least);
        let at_most = self.at_most(solver, k)?;
        require(solver, guards, at_most);
        Ok(())
    }
}

/// Folds the unit literals an encoding enforces a bound with into one bound.
fn conjunction(solver: &mut SatSolver, lits: Vec<rustsat::types::Lit>) -> Bound {
    let lits: Vec<Lit> = lits.into_iter().map(Lit::from).collect();
    match lits.as_slice() {
        [] => Bound::True,
        [l] => Bound::Lit(*l),
        _ => {
            let all = solver.new_var();
            for &l in &lits {
                solver.add_clause([!all, l]);
            }
            solver.add_clause(std::iter::once(all).chain(lits.iter().map(|&l| !l)));
            Bound::Lit(all)
        }
    }
}
