//! Solver states and their reuse across neighbouring aspect ratios.
//!
//! A state built for `w x h` stays valid for `(w+1) x h` and `w x (h+1)`
//! except for constraints of the border that moves. Those constraints are
//! guarded by the east and south assumption literals. Growing a state swaps
//! the literal of the moving border for a fresh one and permanently falsifies
//! the old one, which disables the stale constraints without deleting them.

use crate::sat::{Interrupt, Lit, SatSolver};
use fcn_layout::{AspectRatio, Tile};
use std::collections::{BTreeSet, HashMap};

/// The pair of border literals of a solver state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BorderLiterals {
    /// Guards constraints of the eastern column.
    pub east: Lit,
    /// Guards constraints of the southern row.
    pub south: Lit,
}

/// Decision variables, created on first use.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    tn: HashMap<(Tile, usize), Lit>,
    te: HashMap<(Tile, usize), Lit>,
    tc: HashMap<(Tile, Tile), Lit>,
    tp: HashMap<(Tile, Tile), Lit>,
    tcl: HashMap<(Tile, u8), Lit>,
    ncl: HashMap<(usize, u8), Lit>,
    tse: HashMap<Tile, Vec<Lit>>,
}

impl Variables {
    /// Tile `t` holds vertex `v`.
    pub fn get_tn(&self, t: Tile, v: usize) -> Option<Lit> {
        self.tn.get(&(t, v)).copied()
    }

    /// Tile `t` carries edge `e`.
    pub fn get_te(&self, t: Tile, e: usize) -> Option<Lit> {
        self.te.get(&(t, e)).copied()
    }

    /// Information flows from `a` into `b`.
    pub fn get_tc(&self, a: Tile, b: Tile) -> Option<Lit> {
        self.tc.get(&(a, b)).copied()
    }

    /// Tile `t` is in clock phase `c`.
    pub fn get_tcl(&self, t: Tile, c: u8) -> Option<Lit> {
        self.tcl.get(&(t, c)).copied()
    }

    /// Unary delay of the synchronization element on `t`.
    pub fn get_tse(&self, t: Tile) -> &[Lit] {
        self.tse.get(&t).map_or(&[], Vec::as_slice)
    }
}

/// A solver with its variables and border literals.
pub struct SolverState {
    /// The incremental solver.
    pub solver: SatSolver,
    /// Its decision variables.
    pub vars: Variables,
    /// Its current border literals.
    pub border: BorderLiterals,
}

impl SolverState {
    /// Creates an empty state with fresh border literals.
    pub fn new(interrupt: Interrupt) -> Self {
        let mut solver = SatSolver::new(interrupt);
        let border = BorderLiterals {
            east: solver.new_var(),
            south: solver.new_var(),
        };
        Self {
            solver,
            vars: Variables::default(),
            border,
        }
    }

    /// Adds a clause.
    pub fn add_clause<I: IntoIterator<Item = Lit>>(&mut self, lits: I) {
        self.solver.add_clause(lits);
    }

    /// Allocates an auxiliary variable.
    pub fn new_var(&mut self) -> Lit {
        self.solver.new_var()
    }

    /// Tile `t` holds vertex `v`.
    pub fn tn(&mut self, t: Tile, v: usize) -> Lit {
        let solver = &mut self.solver;
        *self.vars.tn.entry((t, v)).or_insert_with(|| solver.new_var())
    }

    /// Tile `t` carries edge `e`.
    pub fn te(&mut self, t: Tile, e: usize) -> Lit {
        let solver = &mut self.solver;
        *self.vars.te.entry((t, e)).or_insert_with(|| solver.new_var())
    }

    /// Information flows from `a` into `b`.
    pub fn tc(&mut self, a: Tile, b: Tile) -> Lit {
        let solver = &mut self.solver;
        *self.vars.tc.entry((a, b)).or_insert_with(|| solver.new_var())
    }

    /// `b` is reachable from `a`.
    pub fn tp(&mut self, a: Tile, b: Tile) -> Lit {
        let solver = &mut self.solver;
        *self.vars.tp.entry((a, b)).or_insert_with(|| solver.new_var())
    }

    /// Tile `t` is in clock phase `c`.
    pub fn tcl(&mut self, t: Tile, c: u8) -> Lit {
        let solver = &mut self.solver;
        *self.vars.tcl.entry((t, c)).or_insert_with(|| solver.new_var())
    }

    /// Primary input vertex `v` starts in clock phase `c`.
    pub fn ncl(&mut self, v: usize, c: u8) -> Lit {
        let solver = &mut self.solver;
        *self.vars.ncl.entry((v, c)).or_insert_with(|| solver.new_var())
    }

    /// Unary delay of the synchronization element on `t`: the `k`-th literal
    /// holds iff the delay is larger than `k`.
    pub fn tse(&mut self, t: Tile, max_delay: u8) -> Vec<Lit> {
        let solver = &mut self.solver;
        self.vars
            .tse
            .entry(t)
            .or_insert_with(|| (0..max_delay).map(|_| solver.new_var()).collect())
            .clone()
    }
}

/// A state prepared for one aspect ratio, with the tiles the builder still
/// has to encode.
pub struct CheckPoint {
    /// The state to extend.
    pub state: SolverState,
    /// Tiles that did not exist in the previous shape.
    pub added: BTreeSet<Tile>,
    /// Tiles that left the east or south border.
    pub updated: BTreeSet<Tile>,
    /// Assumptions valid for this shape only.
    pub assumptions: Vec<Lit>,
    /// `true` if the solver was created for this shape.
    pub fresh: bool,
}

impl CheckPoint {
    /// Returns the assumptions of a check: both border literals plus the
    /// shape-specific ones.
    pub fn solve_assumptions(&self) -> Vec<Lit> {
        let mut all = vec![self.state.border.east, self.state.border.south];
        all.extend(&self.assumptions);
        all
    }
}

/// Unsatisfiable states of one worker, keyed by aspect ratio.
pub struct SolverCache {
    states: HashMap<AspectRatio, SolverState>,
    interrupt: Interrupt,
}

impl SolverCache {
    /// Creates an empty cache whose solvers watch `interrupt`.
    pub fn new(interrupt: Interrupt) -> Self {
        Self {
            states: HashMap::new(),
            interrupt,
        }
    }

    /// Returns the number of stored states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no state is stored.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns `true` if a state for `ar` is stored.
    pub fn contains(&self, ar: AspectRatio) -> bool {
        self.states.contains_key(&ar)
    }

    /// Stores the state of `ar` for later extension.
    pub fn store(&mut self, ar: AspectRatio, state: SolverState) {
        self.states.insert(ar, state);
    }

    /// Prepares a state for `ar`.
    ///
    /// The state of `(w-1) x h` is grown east, otherwise the state of
    /// `w x (h-1)` is grown south; the used entry leaves the cache. Without
    /// either a fresh state covering every tile is created.
    pub fn fetch(&mut self, ar: AspectRatio) -> CheckPoint {
        let (w, h) = (ar.width, ar.height);
        if w > 1 {
            if let Some(state) = self.states.remove(&AspectRatio::new(w - 1, h)) {
                return grow_east(state, ar);
            }
        }
        if h > 1 {
            if let Some(state) = self.states.remove(&AspectRatio::new(w, h - 1)) {
                return grow_south(state, ar);
            }
        }
        CheckPoint {
            state: SolverState::new(self.interrupt.clone()),
            added: ar.tiles().collect(),
            updated: BTreeSet::new(),
            assumptions: Vec::new(),
            fresh: true,
        }
    }
}

fn grow_east(mut state: SolverState, ar: AspectRatio) -> CheckPoint {
    let old = state.border.east;
    state.add_clause([!old]);
    state.border.east = state.new_var();
    let x = ar.max_x();
    CheckPoint {
        state,
        added: (0..ar.height).map(|y| Tile::new(x, y)).collect(),
        updated: (0..ar.height).map(|y| Tile::new(x - 1, y)).collect(),
        assumptions: Vec::new(),
        fresh: false,
    }
}

fn grow_south(mut state: SolverState, ar: AspectRatio) -> CheckPoint {
    let old = state.border.south;
    state.add_clause([!old]);
    state.border.south = state.new_var();
    let y = ar.max_y();
    CheckPoint {
        state,
        added: (0..ar.width).map(|x| Tile::new(x, y)).collect(),
        updated: (0..ar.width).map(|x| Tile::new(x, y - 1)).collect(),
        assumptions: Vec::new(),
        fresh: false,
    }
}
