//! The refinement loop: counterexample-guided search for a biplanar
//! partition.
//!
//! The loop drives a fixed cycle: ask the decision engine for a candidate
//! edge coloring satisfying the accumulated constraints (`SOLVING`), check
//! both sides with the planarity oracle concurrently (`CHECKING`), and on
//! failure synthesize forbidding clauses from the returned witnesses and go
//! again (`REFINING`). It terminates with the partition on success, or with
//! `Infeasible` once the engine proves the constraints unsatisfiable.
//!
//! Termination: the clause space is finite, clauses only accumulate, and
//! every refinement step forbids at least the candidate that just failed, so
//! no candidate repeats and the loop ends in finitely many iterations.
//!
//! The loop owns the evolving clause set and the current assignment; the
//! graph (and blow-up structure, if enabled) are read-only inputs.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::blowup::{BlowUpError, BlowUpOptions, BlownGraph};
use crate::bounds::{bound_constraints, exceeds_capacity};
use crate::clause::{Clause, ClauseSet};
use crate::engine::{DecisionEngine, EngineError, Response, SatEngine};
use crate::graph::{Edge, Graph};
use crate::oracle::{KuratowskiOracle, PlanarityCheck, PlanarityOracle};
use crate::refine::witness_clauses;

/// A successful biplanar partition: two disjoint edge sets covering the
/// graph, each inducing a planar subgraph.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Partition {
    pub side0: BTreeSet<Edge>,
    pub side1: BTreeSet<Edge>,
}

/// Terminal result of a solve. `Infeasible` is a valid negative answer, not
/// a fault.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Biplanar(Partition),
    Infeasible,
}

impl Outcome {
    pub fn is_biplanar(&self) -> bool {
        matches!(self, Outcome::Biplanar(_))
    }
}

#[derive(Debug, Error)]
pub enum SolveError {
    /// The oracle contradicted itself (bad witness, or a verdict flip on
    /// re-verification). Unrecoverable: the oracle implementation is broken
    /// and continuing could loop forever.
    #[error("planarity oracle inconsistency at iteration {iteration}: {reason}")]
    OracleInconsistency { iteration: u64, reason: String },
    /// The decision engine itself failed.
    #[error(
        "decision engine fault at iteration {iteration} ({clauses} accumulated clauses): {source}"
    )]
    Engine {
        #[source]
        source: EngineError,
        iteration: u64,
        clauses: usize,
    },
    #[error(transparent)]
    BlowUp(#[from] BlowUpError),
}

/// The refinement loop orchestrator.
///
/// Owns the decision engine, the oracle, and the monotonically growing
/// clause set. Constraints are installed between iterations only; the two
/// per-side checks of an iteration run as scoped threads over immutable
/// inputs.
pub struct Solver<'g, E, O> {
    graph: &'g Graph,
    engine: E,
    oracle: O,
    clauses: ClauseSet,
    iteration: u64,
    bounds_installed: bool,
}

impl<'g, E: DecisionEngine, O: PlanarityOracle> Solver<'g, E, O> {
    pub fn new(graph: &'g Graph, engine: E, oracle: O) -> Self {
        Solver {
            graph,
            engine,
            oracle,
            clauses: ClauseSet::new(),
            iteration: 0,
            bounds_installed: false,
        }
    }

    /// Installs setup clauses (e.g. a blow-up encoding) before the loop
    /// starts.
    pub fn add_setup_clauses(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        for clause in clauses {
            self.engine.add_clause(&clause);
            self.clauses.push(clause);
        }
    }

    /// Number of completed engine iterations.
    pub fn iterations(&self) -> u64 {
        self.iteration
    }

    /// Number of accumulated clauses (setup plus refinement).
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Runs the loop to a terminal outcome.
    pub fn run(&mut self) -> Result<Outcome, SolveError> {
        // INIT: the counting bound can rule the instance out before any
        // engine call.
        if exceeds_capacity(self.graph) {
            info!(
                "infeasible by counting: {} edges exceed two planar halves of {} vertices",
                self.graph.num_edges(),
                self.graph.num_vertices()
            );
            return Ok(Outcome::Infeasible);
        }
        // Bounds go in once; a repeated run must not re-encode them.
        if !self.bounds_installed {
            for bound in bound_constraints(self.graph) {
                self.engine.add_at_most(&bound.lits, bound.bound);
            }
            self.bounds_installed = true;
        }

        loop {
            self.iteration += 1;

            // SOLVING
            let assignment = match self.next_candidate()? {
                Response::Sat(assignment) => assignment,
                Response::Unsat => {
                    info!(
                        "unsatisfiable after {} iterations, {} clauses",
                        self.iteration,
                        self.clauses.len()
                    );
                    return Ok(Outcome::Infeasible);
                }
            };
            if assignment.len() != self.graph.num_edges() {
                return Err(self.engine_fault(EngineError::fatal(format!(
                    "partial assignment: {} of {} edges",
                    assignment.len(),
                    self.graph.num_edges()
                ))));
            }

            // CHECKING
            let (side0, side1) = assignment.partition(self.graph);
            debug!(
                "iteration {}: candidate with |side0| = {}, |side1| = {}",
                self.iteration,
                side0.len(),
                side1.len()
            );
            let (check0, check1) = self.check_sides(&side0, &side1)?;

            if check0.is_planar() && check1.is_planar() {
                // Defensive cross-validation before declaring success;
                // a verdict flip means the oracle is broken.
                let (re0, re1) = self.check_sides(&side0, &side1)?;
                if !re0.is_planar() || !re1.is_planar() {
                    return Err(SolveError::OracleInconsistency {
                        iteration: self.iteration,
                        reason: "a side certified planar failed re-verification".to_string(),
                    });
                }
                info!(
                    "biplanar partition found after {} iterations, {} clauses",
                    self.iteration,
                    self.clauses.len()
                );
                return Ok(Outcome::Biplanar(Partition { side0, side1 }));
            }

            // REFINING
            for (name, check, side) in [("side 0", check0, &side0), ("side 1", check1, &side1)] {
                if let PlanarityCheck::NonPlanar { witness } = check {
                    self.validate_witness(&witness, side, name)?;
                    debug!(
                        "iteration {}: {} non-planar, witness of {} edges",
                        self.iteration,
                        name,
                        witness.len()
                    );
                    for clause in witness_clauses(self.graph, &witness) {
                        self.engine.add_clause(&clause);
                        self.clauses.push(clause);
                    }
                }
            }
        }
    }

    /// One engine call, with a single backed-off retry on a fault the
    /// engine labels transient.
    fn next_candidate(&mut self) -> Result<Response, SolveError> {
        match self.engine.solve() {
            Ok(response) => Ok(response),
            Err(e) if e.is_transient() => {
                warn!(
                    "transient engine fault at iteration {}: {}; retrying once",
                    self.iteration, e
                );
                thread::sleep(Duration::from_millis(10));
                self.engine.solve().map_err(|e| self.engine_fault(e))
            }
            Err(e) => Err(self.engine_fault(e)),
        }
    }

    /// The two per-side checks read disjoint immutable inputs, so they run
    /// as a pair of scoped threads and join before any clause is added.
    fn check_sides(
        &self,
        side0: &BTreeSet<Edge>,
        side1: &BTreeSet<Edge>,
    ) -> Result<(PlanarityCheck, PlanarityCheck), SolveError> {
        let oracle = &self.oracle;
        let vertices = self.graph.vertices();
        let (r0, r1) = thread::scope(|s| {
            let h0 = s.spawn(move || oracle.check(vertices, side0));
            let h1 = s.spawn(move || oracle.check(vertices, side1));
            (h0.join(), h1.join())
        });
        let check0 = r0.map_err(|_| self.oracle_panic("side 0"))?;
        let check1 = r1.map_err(|_| self.oracle_panic("side 1"))?;
        Ok((check0, check1))
    }

    fn validate_witness(
        &self,
        witness: &BTreeSet<Edge>,
        side: &BTreeSet<Edge>,
        name: &str,
    ) -> Result<(), SolveError> {
        if witness.is_empty() {
            return Err(SolveError::OracleInconsistency {
                iteration: self.iteration,
                reason: format!("empty witness for {}", name),
            });
        }
        if !witness.is_subset(side) {
            return Err(SolveError::OracleInconsistency {
                iteration: self.iteration,
                reason: format!("witness for {} is not a subset of its edges", name),
            });
        }
        Ok(())
    }

    fn engine_fault(&self, source: EngineError) -> SolveError {
        SolveError::Engine {
            source,
            iteration: self.iteration,
            clauses: self.clauses.len(),
        }
    }

    fn oracle_panic(&self, name: &str) -> SolveError {
        SolveError::OracleInconsistency {
            iteration: self.iteration,
            reason: format!("planarity check for {} panicked", name),
        }
    }
}

/// Solves the direct encoding with the default engine and oracle.
pub fn solve_biplanar(graph: &Graph) -> Result<Outcome, SolveError> {
    let engine = SatEngine::new(graph.num_edges());
    let mut solver = Solver::new(graph, engine, KuratowskiOracle);
    solver.run()
}

/// Solves the blow-up encoding with the default engine and oracle. The
/// outcome's partition is over the blown graph's edges, which is returned
/// alongside.
pub fn solve_blown(
    graph: &Graph,
    options: &BlowUpOptions,
) -> Result<(BlownGraph, Outcome), SolveError> {
    let blown = BlownGraph::encode(graph, options)?;
    let outcome = {
        let engine = SatEngine::new(blown.graph().num_edges());
        let mut solver = Solver::new(blown.graph(), engine, KuratowskiOracle);
        solver.add_setup_clauses(blown.clauses());
        solver.run()?
    };
    Ok((blown, outcome))
}
