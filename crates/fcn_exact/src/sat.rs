//! The SAT backend: CaDiCaL behind a cooperative interrupt.
//!
//! Every clause is also recorded, so a solver can be replayed into a fresh
//! instance for optimization without touching the incremental original.
//! Cardinality encodings come from RustSAT and are fed through
//! [`SatSolver::encode`].

use cadical::{Callbacks, Solver};
use fcn_common::{FcnResult, InternalError};
use rustsat::instances::{BasicVarManager, Cnf, ManageVars};
use rustsat::types::Var;
use std::ops::Not;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A literal in DIMACS convention: a non-zero variable index with a sign.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Lit(i32);

impl Lit {
    /// Returns the variable index, starting at 1.
    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Returns `true` for the positive literal of its variable.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl From<Lit> for rustsat::types::Lit {
    fn from(lit: Lit) -> Self {
        let var = Var::new(lit.var() - 1);
        if lit.is_positive() {
            var.pos_lit()
        } else {
            var.neg_lit()
        }
    }
}

impl From<rustsat::types::Lit> for Lit {
    fn from(lit: rustsat::types::Lit) -> Self {
        let var = lit.var().idx() as i32 + 1;
        Lit(if lit.is_neg() { -var } else { var })
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

/// A cancellation token shared between a worker and its peers.
///
/// Triggered explicitly by [`trigger`](Self::trigger) or implicitly once the
/// deadline has passed. The solver polls it through its termination callback.
#[derive(Clone, Debug)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Interrupt {
    /// Creates an untriggered token.
    pub fn new(deadline: Option<Instant>) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline,
        }
    }

    /// Asks every solve watching this token to stop.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once the token was triggered or the deadline passed.
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.timed_out()
    }

    /// Returns `true` once the deadline passed.
    pub fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Callbacks for Interrupt {
    fn terminate(&mut self) -> bool {
        self.is_triggered()
    }
}

/// Result of a satisfiability check.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolveOutcome {
    /// A model exists.
    Sat,
    /// No model exists under the given assumptions.
    Unsat,
    /// The check was cancelled before it finished.
    Interrupted,
}

/// An incremental solver with a clause log.
pub struct SatSolver {
    solver: Solver<Interrupt>,
    interrupt: Interrupt,
    num_vars: i32,
    clauses: Vec<Vec<i32>>,
}

impl SatSolver {
    /// Creates an empty solver watching `interrupt`.
    pub fn new(interrupt: Interrupt) -> Self {
        let mut solver: Solver<Interrupt> = Solver::new();
        solver.set_callbacks(Some(interrupt.clone()));
        Self {
            solver,
            interrupt,
            num_vars: 0,
            clauses: Vec::new(),
        }
    }

    /// Returns the interrupt this solver watches.
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Allocates a fresh variable and returns its positive literal.
    pub fn new_var(&mut self) -> Lit {
        self.num_vars += 1;
        Lit(self.num_vars)
    }

    /// Returns the number of allocated variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars as usize
    }

    /// Returns the number of clauses added so far.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Adds a clause. An empty clause makes the solver unsatisfiable.
    pub fn add_clause<I: IntoIterator<Item = Lit>>(&mut self, lits: I) {
        let clause: Vec<i32> = lits.into_iter().map(|l| l.0).collect();
        self.solver.add_clause(clause.iter().copied());
        self.clauses.push(clause);
    }

    /// Runs a RustSAT encoding against this solver.
    ///
    /// Auxiliary variables are numbered after the existing ones. Every
    /// produced clause is extended by the negated `guards`, so the encoding
    /// only binds while all guards hold.
    pub fn encode<T, F>(&mut self, guards: &[Lit], encoding: F) -> FcnResult<T>
    where
        F: FnOnce(&mut Cnf, &mut dyn ManageVars) -> Result<T, rustsat::OutOfMemory>,
    {
        let mut vars = BasicVarManager::from_next_free(Var::new(self.num_vars as u32));
        let mut cnf = Cnf::new();
        let out = encoding(&mut cnf, &mut vars)
            .map_err(|err| InternalError::new(format!("encoding failed: {err}")))?;
        if let Some(max) = vars.max_var() {
            self.num_vars = self.num_vars.max(max.idx() as i32 + 1);
        }
        for clause in cnf.iter() {
            let lits = clause.iter().map(|&l| Lit::from(l));
            self.add_clause(guards.iter().map(|&g| !g).chain(lits));
        }
        Ok(out)
    }

    /// Checks satisfiability under `assumptions`, which hold for this call
    /// only.
    pub fn solve(&mut self, assumptions: &[Lit]) -> SolveOutcome {
        if self.interrupt.is_triggered() {
            return SolveOutcome::Interrupted;
        }
        match self.solver.solve_with(assumptions.iter().map(|l| l.0)) {
            Some(true) => SolveOutcome::Sat,
            Some(false) => SolveOutcome::Unsat,
            None => SolveOutcome::Interrupted,
        }
    }

    /// Returns the assignment of the last successful check.
    pub fn model(&self) -> Model {
        let known = self.solver.max_variable().min(self.num_vars);
        let values = (1..=self.num_vars)
            .map(|v| v <= known && self.solver.value(v) == Some(true))
            .collect();
        Model { values }
    }

    /// Builds a fresh solver from the clause log, with `units` added as
    /// unit clauses. Variables keep their indices.
    pub fn replay(&self, units: &[Lit]) -> SatSolver {
        let mut copy = SatSolver::new(self.interrupt.clone());
        copy.num_vars = self.num_vars;
        for clause in &self.clauses {
            copy.solver.add_clause(clause.iter().copied());
            copy.clauses.push(clause.clone());
        }
        for &unit in units {
            copy.add_clause([unit]);
        }
        copy
    }
}

/// A total assignment. Variables unknown to the solver are `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// Returns the value of `lit`.
    pub fn value(&self, lit: Lit) -> bool {
        let assigned = self
            .values
            .get(lit.var() as usize - 1)
            .copied()
            .unwrap_or(false);
        assigned == lit.is_positive()
    }

    /// Counts the literals of `lits` that are true.
    pub fn count(&self, lits: &[Lit]) -> usize {
        lits.iter().filter(|&&l| self.value(l)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn solver() -> SatSolver {
        SatSolver::new(Interrupt::new(None))
    }

    #[test]
    fn satisfiable_with_model() {
        let mut s = solver();
        let a = s.new_var();
        let b = s.new_var();
        s.add_clause([a, b]);
        s.add_clause([!a]);
        assert_eq!(s.solve(&[]), SolveOutcome::Sat);
        let m = s.model();
        assert!(!m.value(a));
        assert!(m.value(b));
        assert!(m.value(!a));
        assert_eq!(m.count(&[a, b]), 1);
    }

    #[test]
    fn assumptions_are_temporary() {
        let mut s = solver();
        let a = s.new_var();
        let b = s.new_var();
        s.add_clause([!a, b]);
        assert_eq!(s.solve(&[a, !b]), SolveOutcome::Unsat);
        assert_eq!(s.solve(&[a]), SolveOutcome::Sat);
    }

    #[test]
    fn triggered_interrupt_skips_the_check() {
        let interrupt = Interrupt::new(None);
        let mut s = SatSolver::new(interrupt.clone());
        let a = s.new_var();
        s.add_clause([a]);
        interrupt.trigger();
        assert_eq!(s.solve(&[]), SolveOutcome::Interrupted);
    }

    #[test]
    fn deadline_in_the_past_interrupts() {
        let past = Instant::now() - Duration::from_millis(1);
        let mut s = SatSolver::new(Interrupt::new(Some(past)));
        let a = s.new_var();
        s.add_clause([a]);
        assert!(s.interrupt().timed_out());
        assert_eq!(s.solve(&[]), SolveOutcome::Interrupted);
    }

    #[test]
    fn replay_keeps_clauses_and_adds_units() {
        let mut s = solver();
        let a = s.new_var();
        let b = s.new_var();
        s.add_clause([a, b]);
        let mut copy = s.replay(&[!a]);
        assert_eq!(copy.num_vars(), 2);
        assert_eq!(copy.num_clauses(), 2);
        assert_eq!(copy.solve(&[]), SolveOutcome::Sat);
        assert!(copy.model().value(b));
        assert_eq!(copy.solve(&[!b]), SolveOutcome::Unsat);
        assert_eq!(s.solve(&[!b]), SolveOutcome::Sat);
    }

    #[test]
    fn literals_convert_both_ways() {
        let mut s = solver();
        let a = s.new_var();
        let b = s.new_var();
        for lit in [a, !a, b, !b] {
            let converted = rustsat::types::Lit::from(lit);
            assert_eq!(converted.is_neg(), !lit.is_positive());
            assert_eq!(Lit::from(converted), lit);
        }
    }

    #[test]
    fn encodings_allocate_after_existing_variables() {
        let mut s = solver();
        let a = s.new_var();
        let fresh = s
            .encode(&[], |cnf, vars| {
                let aux = vars.new_var().pos_lit();
                cnf.add_binary(!aux, a.into());
                Ok(Lit::from(aux))
            })
            .unwrap();
        assert_eq!(fresh.var(), 2);
        assert_eq!(s.num_vars(), 2);
        assert_eq!(s.num_clauses(), 1);
        assert_eq!(s.solve(&[fresh, !a]), SolveOutcome::Unsat);
    }

    #[test]
    fn guarded_encodings_bind_under_their_guard() {
        let mut s = solver();
        let g = s.new_var();
        let a = s.new_var();
        s.encode(&[g], |cnf, _| {
            cnf.add_unit(a.into());
            Ok(())
        })
        .unwrap();
        assert_eq!(s.solve(&[g, !a]), SolveOutcome::Unsat);
        assert_eq!(s.solve(&[!g, !a]), SolveOutcome::Sat);
    }

    #[test]
    fn unused_variables_read_false() {
        let mut s = solver();
        let a = s.new_var();
        let unused = s.new_var();
        s.add_clause([a]);
        assert_eq!(s.solve(&[]), SolveOutcome::Sat);
        assert!(!s.model().value(unused));
    }
}
