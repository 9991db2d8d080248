//! Constraint synthesis from non-planarity witnesses.
//!
//! A witness is a set of edges that ended up on one side together and form a
//! non-planar subgraph there. Two clauses rule out exactly the all-same-side
//! assignments of those edges: at least one witness edge must sit on side 1,
//! and at least one must sit on side 0. This is the minimal change that fixes
//! the observed violation, so the decision engine keeps maximum freedom for
//! its next candidate. The pair is symmetric in the offending side, and is
//! added unconditionally without deduplication.

use std::collections::BTreeSet;

use crate::clause::{Clause, Lit};
use crate::graph::{Edge, Graph};

/// Converts a violation witness into its two forbidding clauses.
///
/// # Panics
///
/// Panics if the witness is empty or contains an edge unknown to the graph.
/// The refinement loop validates the witness against the oracle contract
/// before calling this (a broken oracle surfaces as an inconsistency error,
/// not a panic here).
pub fn witness_clauses(graph: &Graph, witness: &BTreeSet<Edge>) -> [Clause; 2] {
    assert!(!witness.is_empty(), "Witness must be non-empty");
    let ids: Vec<_> = witness
        .iter()
        .map(|&e| {
            graph
                .edge_id(e)
                .unwrap_or_else(|| panic!("Witness edge {} is not in the graph", e))
        })
        .collect();

    // At least one witness edge on side 1, and at least one on side 0.
    let stay = Clause::new(ids.iter().map(|&id| Lit::pos(id)));
    let leave = Clause::new(ids.iter().map(|&id| Lit::neg(id)));
    [stay, leave]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_witness_clauses() {
        let g = Graph::from_edges([(1, 2), (2, 3), (1, 3)]).unwrap();
        let witness: BTreeSet<Edge> = [g.edge(0), g.edge(2)].into_iter().collect();

        let [c1, c2] = witness_clauses(&g, &witness);
        assert_eq!(c1.len(), 2);
        assert_eq!(c2.len(), 2);
        assert!(c1.lits().iter().all(|l| l.is_positive()));
        assert!(c2.lits().iter().all(|l| !l.is_positive()));

        let ids: Vec<_> = c1.lits().iter().map(|l| l.edge()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_empty_witness_panics() {
        let g = Graph::from_edges([(1, 2)]).unwrap();
        witness_clauses(&g, &BTreeSet::new());
    }
}
