//! The decision engine boundary.
//!
//! The refinement loop submits clauses and cardinality bounds and asks for a
//! candidate assignment; the engine answers `Sat` with a total edge coloring
//! or `Unsat` once the accumulated constraints admit no candidate. The
//! engine's internal search is a black box; incremental solving (retaining
//! learned structure across calls) is allowed and the default implementation
//! uses it, but nothing in the loop depends on it.
//!
//! [`SatEngine`] is the shipped implementation on top of the varisat CDCL
//! solver. Edge variables are allocated up front, one per [`EdgeId`] in
//! order; the edge-to-variable mapping is held here explicitly and never
//! smuggled through solver state. Cardinality bounds are lowered to CNF with
//! the sequential-counter encoding, using fresh auxiliary variables beyond
//! the edge range.

use log::debug;
use thiserror::Error;
use varisat::{ExtendFormula, Solver};

use crate::assignment::{Assignment, Side};
use crate::clause::{Clause, Lit};

/// Answer of a single decision engine call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Response {
    /// A candidate assignment satisfying every constraint submitted so far.
    Sat(Assignment),
    /// The accumulated constraints are unsatisfiable.
    Unsat,
}

/// A fault inside the decision engine itself. Not a negative answer:
/// unsatisfiability is reported through [`Response::Unsat`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    transient: bool,
}

impl EngineError {
    /// A fatal engine fault.
    pub fn fatal(message: impl Into<String>) -> Self {
        EngineError {
            message: message.into(),
            transient: false,
        }
    }

    /// A fault the engine labels as transient; the caller may retry once.
    pub fn transient(message: impl Into<String>) -> Self {
        EngineError {
            message: message.into(),
            transient: true,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

/// A black-box decision procedure over edge variables.
///
/// Constraints accumulate across calls; there is no retraction.
pub trait DecisionEngine {
    /// Adds a clause that all future candidates must satisfy.
    fn add_clause(&mut self, clause: &Clause);

    /// Adds an at-most-`bound` constraint over the literals.
    fn add_at_most(&mut self, lits: &[Lit], bound: usize);

    /// Produces a candidate assignment, or proves unsatisfiability.
    fn solve(&mut self) -> Result<Response, EngineError>;
}

/// The default SAT-backed decision engine.
pub struct SatEngine {
    solver: Solver<'static>,
    num_edges: usize,
}

impl SatEngine {
    /// Creates an engine over `num_edges` edge variables.
    pub fn new(num_edges: usize) -> Self {
        let mut solver = Solver::new();
        // Edge variables first, in edge-id order; auxiliaries come later.
        for _ in 0..num_edges {
            solver.new_var();
        }
        SatEngine { solver, num_edges }
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    fn lit(&self, lit: Lit) -> varisat::Lit {
        let var = varisat::Var::from_index(lit.edge());
        if lit.is_positive() {
            varisat::Lit::positive(var)
        } else {
            varisat::Lit::negative(var)
        }
    }
}

impl DecisionEngine for SatEngine {
    fn add_clause(&mut self, clause: &Clause) {
        let lits: Vec<varisat::Lit> = clause.lits().iter().map(|&l| self.lit(l)).collect();
        self.solver.add_clause(&lits);
    }

    fn add_at_most(&mut self, lits: &[Lit], bound: usize) {
        let lits: Vec<varisat::Lit> = lits.iter().map(|&l| self.lit(l)).collect();
        encode_at_most(&mut self.solver, &lits, bound);
    }

    fn solve(&mut self) -> Result<Response, EngineError> {
        match self.solver.solve() {
            Ok(true) => {
                let model = self
                    .solver
                    .model()
                    .ok_or_else(|| EngineError::fatal("solver reported sat without a model"))?;
                let mut sides = vec![Side::Zero; self.num_edges];
                for lit in model {
                    let index = lit.var().index();
                    if index < self.num_edges && lit.is_positive() {
                        sides[index] = Side::One;
                    }
                }
                Ok(Response::Sat(Assignment::from_sides(sides)))
            }
            Ok(false) => Ok(Response::Unsat),
            Err(e) => Err(EngineError::fatal(e.to_string())),
        }
    }
}

/// Sequential-counter (Sinz) encoding of `at most bound` over `lits`,
/// emitting clauses and fresh auxiliary variables into `formula`.
fn encode_at_most(formula: &mut impl ExtendFormula, lits: &[varisat::Lit], bound: usize) {
    let n = lits.len();
    if bound >= n {
        return;
    }
    if bound == 0 {
        for &x in lits {
            formula.add_clause(&[!x]);
        }
        return;
    }

    debug!("encoding at-most-{} over {} literals", bound, n);

    // s[i][j] means "at least j+1 of the first i+1 literals are true".
    let k = bound;
    let s: Vec<Vec<varisat::Lit>> = (0..n - 1)
        .map(|_| (0..k).map(|_| formula.new_lit()).collect())
        .collect();

    formula.add_clause(&[!lits[0], s[0][0]]);
    for j in 1..k {
        formula.add_clause(&[!s[0][j]]);
    }
    for i in 1..n - 1 {
        formula.add_clause(&[!lits[i], s[i][0]]);
        formula.add_clause(&[!s[i - 1][0], s[i][0]]);
        for j in 1..k {
            formula.add_clause(&[!lits[i], !s[i - 1][j - 1], s[i][j]]);
            formula.add_clause(&[!s[i - 1][j], s[i][j]]);
        }
        formula.add_clause(&[!lits[i], !s[i - 1][k - 1]]);
    }
    formula.add_clause(&[!lits[n - 1], !s[n - 2][k - 1]]);
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_sat_and_unsat() {
        let mut engine = SatEngine::new(2);
        engine.add_clause(&Clause::new([Lit::pos(0)]));
        engine.add_clause(&Clause::new([Lit::neg(1)]));

        match engine.solve().unwrap() {
            Response::Sat(a) => {
                assert_eq!(a.len(), 2);
                assert_eq!(a.side(0), Side::One);
                assert_eq!(a.side(1), Side::Zero);
            }
            Response::Unsat => panic!("expected sat"),
        }

        // Constraints accumulate: forcing the opposite phase is now unsat.
        engine.add_clause(&Clause::new([Lit::neg(0)]));
        assert_eq!(engine.solve().unwrap(), Response::Unsat);
    }

    #[test]
    fn test_candidate_is_total() {
        let mut engine = SatEngine::new(4);
        engine.add_clause(&Clause::new([Lit::pos(2)]));
        match engine.solve().unwrap() {
            Response::Sat(a) => assert_eq!(a.len(), 4),
            Response::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_at_most_bound_respected() {
        // At most 2 of 4: forcing any 3 literals true must be unsat, while
        // every choice of 2 stays sat.
        for forced in 0..4u32 {
            let mut engine = SatEngine::new(4);
            engine.add_at_most(&(0..4).map(Lit::pos).collect::<Vec<_>>(), 2);
            for i in 0..4 {
                if i != forced as usize {
                    engine.add_clause(&Clause::new([Lit::pos(i)]));
                }
            }
            assert_eq!(engine.solve().unwrap(), Response::Unsat);
        }

        let mut engine = SatEngine::new(4);
        engine.add_at_most(&(0..4).map(Lit::pos).collect::<Vec<_>>(), 2);
        engine.add_clause(&Clause::new([Lit::pos(0)]));
        engine.add_clause(&Clause::new([Lit::pos(3)]));
        match engine.solve().unwrap() {
            Response::Sat(a) => {
                let trues = (0..4).filter(|&i| a.side(i) == Side::One).count();
                assert!(trues <= 2);
            }
            Response::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_at_most_zero() {
        let mut engine = SatEngine::new(3);
        engine.add_at_most(&(0..3).map(Lit::pos).collect::<Vec<_>>(), 0);
        match engine.solve().unwrap() {
            Response::Sat(a) => {
                assert!((0..3).all(|i| a.side(i) == Side::Zero));
            }
            Response::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_at_most_trivial_bound_adds_nothing() {
        let mut engine = SatEngine::new(3);
        engine.add_at_most(&(0..3).map(Lit::pos).collect::<Vec<_>>(), 3);
        for i in 0..3 {
            engine.add_clause(&Clause::new([Lit::pos(i)]));
        }
        match engine.solve().unwrap() {
            Response::Sat(a) => assert!((0..3).all(|i| a.side(i) == Side::One)),
            Response::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_at_most_over_negative_lits() {
        // At most 1 false among 3 edges: at least 2 must be on side 1.
        let mut engine = SatEngine::new(3);
        engine.add_at_most(&(0..3).map(Lit::neg).collect::<Vec<_>>(), 1);
        engine.add_clause(&Clause::new([Lit::neg(0)]));
        engine.add_clause(&Clause::new([Lit::neg(1)]));
        assert_eq!(engine.solve().unwrap(), Response::Unsat);
    }

    #[test]
    fn test_engine_error_labels() {
        assert!(!EngineError::fatal("boom").is_transient());
        assert!(EngineError::transient("busy").is_transient());
        assert_eq!(EngineError::fatal("boom").to_string(), "boom");
    }
}
