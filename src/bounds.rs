//! Cardinality bounds derived from Euler's formula.
//!
//! A planar simple graph on `n >= 3` vertices has at most `3n - 6` edges, so
//! each side of a biplanar partition is bounded by that count. The two bound
//! constraints are symmetric: at most `3n - 6` edges on side 1, and at most
//! `3n - 6` edges on side 0. If the total edge count exceeds twice the limit,
//! no partition can exist and the solve short-circuits without ever invoking
//! the decision engine.

use crate::clause::Lit;
use crate::graph::Graph;

/// An at-most-`bound` constraint over the given literals, consumed once by
/// the decision engine at setup.
#[derive(Debug, Clone)]
pub struct CardBound {
    pub lits: Vec<Lit>,
    pub bound: usize,
}

/// Maximum edge count of a planar simple graph on `n` vertices.
///
/// `3n - 6` for `n >= 3`; below that, every simple graph is planar, so the
/// limit is the total possible edge count.
pub fn planar_edge_limit(n: usize) -> usize {
    if n >= 3 {
        3 * n - 6
    } else {
        n * n.saturating_sub(1) / 2
    }
}

/// Whether the graph has more edges than two planar halves can carry.
pub fn exceeds_capacity(graph: &Graph) -> bool {
    graph.num_edges() > 2 * planar_edge_limit(graph.num_vertices())
}

/// The per-side bound constraints for the graph.
///
/// Empty for `n <= 2`, where no planarity bound is binding. Bounds that the
/// edge count cannot reach are emitted anyway; the engine's cardinality
/// encoder drops them as trivial.
pub fn bound_constraints(graph: &Graph) -> Vec<CardBound> {
    let n = graph.num_vertices();
    if n <= 2 {
        return Vec::new();
    }
    let limit = planar_edge_limit(n);
    let m = graph.num_edges();
    vec![
        // side 1: sum of positive phases <= limit
        CardBound {
            lits: (0..m).map(Lit::pos).collect(),
            bound: limit,
        },
        // side 0: sum of negative phases <= limit
        CardBound {
            lits: (0..m).map(Lit::neg).collect(),
            bound: limit,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_graph(n: u32) -> Graph {
        let mut pairs = Vec::new();
        for u in 1..=n {
            for v in (u + 1)..=n {
                pairs.push((u, v));
            }
        }
        Graph::from_edges(pairs).unwrap()
    }

    #[test]
    fn test_limit() {
        assert_eq!(planar_edge_limit(0), 0);
        assert_eq!(planar_edge_limit(1), 0);
        assert_eq!(planar_edge_limit(2), 1);
        assert_eq!(planar_edge_limit(3), 3);
        assert_eq!(planar_edge_limit(5), 9);
        assert_eq!(planar_edge_limit(11), 27);
    }

    #[test]
    fn test_capacity_of_empty_graph() {
        let g = Graph::new([], []).unwrap();
        assert!(!exceeds_capacity(&g));
        assert!(bound_constraints(&g).is_empty());
    }

    #[test]
    fn test_capacity() {
        // K9 has 36 edges, under the capacity 2 * 21 = 42.
        assert!(!exceeds_capacity(&complete_graph(9)));
        // K11 has 55 edges, over the capacity 2 * 27 = 54.
        assert!(exceeds_capacity(&complete_graph(11)));
    }

    #[test]
    fn test_bounds_skipped_for_tiny_graphs() {
        let g = Graph::from_edges([(1, 2)]).unwrap();
        assert!(bound_constraints(&g).is_empty());
    }

    #[test]
    fn test_bounds_trivial_when_not_binding() {
        // Triangle: 3 edges, limit 3. The bounds are emitted but vacuous.
        let g = complete_graph(3);
        let bounds = bound_constraints(&g);
        assert_eq!(bounds.len(), 2);
        assert!(bounds.iter().all(|b| b.bound >= b.lits.len()));
    }

    #[test]
    fn test_bounds_symmetric() {
        // K5: 10 edges, limit 9.
        let g = complete_graph(5);
        let bounds = bound_constraints(&g);
        assert_eq!(bounds.len(), 2);
        for b in &bounds {
            assert_eq!(b.lits.len(), 10);
            assert_eq!(b.bound, 9);
        }
        assert!(bounds[0].lits.iter().all(|l| l.is_positive()));
        assert!(bounds[1].lits.iter().all(|l| !l.is_positive()));
    }
}
