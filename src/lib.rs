//! # biplanar-rs: Biplanar Edge Partitioning in Rust
//!
//! **`biplanar-rs`** decides whether a graph's edges can be split into two
//! subsets that each induce a planar subgraph --- a **biplanar partition**
//! (equivalently, whether the graph has thickness at most two).
//!
//! ## How it works
//!
//! The solver runs a **counterexample-guided refinement loop** (lazy
//! constraint generation): a SAT-backed decision engine proposes a candidate
//! 2-coloring of the edges under the accumulated constraints, and a
//! planarity oracle checks both sides concurrently. When a side is
//! non-planar, the oracle returns a **Kuratowski-style witness** --- a
//! minimal edge subset certifying non-planarity --- and two clauses are
//! synthesized forbidding the all-same-side assignment of those edges. The
//! loop terminates with a partition or a proof that none exists.
//!
//! Cardinality bounds from Euler's formula (`3n - 6` edges per side) are
//! installed up front, and an instance whose edge count exceeds two planar
//! halves is rejected without invoking the engine at all.
//!
//! ## Key Features
//!
//! - **Black-box collaborators**: the decision engine and the planarity
//!   oracle sit behind traits ([`engine::DecisionEngine`],
//!   [`oracle::PlanarityOracle`]); the shipped defaults are an incremental
//!   SAT engine and an exact Kuratowski-subdivision oracle.
//! - **Blow-up encoding**: an optional mode that replaces every edge with
//!   four linked copies (plus spanning-tree and star-vertex consistency
//!   clauses) to pose a relaxed embedding question ([`blowup`]).
//! - **Parallel checking**: the two per-side planarity checks run as scoped
//!   threads over immutable inputs.
//!
//! ## Basic Usage
//!
//! ```rust
//! use biplanar_rs::graph::Graph;
//! use biplanar_rs::solver::{solve_biplanar, Outcome};
//!
//! // K5 is non-planar, but splits into a planar 9-edge part and the rest.
//! let mut pairs = Vec::new();
//! for u in 1..=5 {
//!     for v in (u + 1)..=5 {
//!         pairs.push((u, v));
//!     }
//! }
//! let graph = Graph::from_edges(pairs).unwrap();
//!
//! match solve_biplanar(&graph).unwrap() {
//!     Outcome::Biplanar(partition) => {
//!         assert_eq!(partition.side0.len() + partition.side1.len(), 10);
//!         assert!(partition.side0.is_disjoint(&partition.side1));
//!     }
//!     Outcome::Infeasible => unreachable!("K5 is biplanar"),
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`graph`]**: vertices, canonical edges, and validated graphs.
//! - **[`solver`]**: the refinement loop orchestrator.
//! - **[`oracle`]**: the planarity oracle contract and reference
//!   implementation.
//! - **[`engine`]**: the decision engine contract and SAT-backed default.
//! - **[`blowup`]**: the blow-up encoding.
//! - **[`bounds`]**: Euler cardinality bounds.
//! - **[`io`]**: plain-text edge-list and partition files.

pub mod assignment;
pub mod blowup;
pub mod bounds;
pub mod clause;
pub mod engine;
pub mod graph;
pub mod io;
pub mod oracle;
pub mod refine;
pub mod solver;
