//! Candidate edge 2-colorings produced by the decision engine.

use std::collections::BTreeSet;
use std::fmt;

use crate::clause::Clause;
use crate::graph::{Edge, EdgeId, Graph};

/// One of the two sides of a biplanar partition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Side {
    Zero,
    One,
}

impl Side {
    pub const fn flip(self) -> Self {
        match self {
            Side::Zero => Side::One,
            Side::One => Side::Zero,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Zero => write!(f, "0"),
            Side::One => write!(f, "1"),
        }
    }
}

/// A total mapping from every edge to a side. Immutable once produced;
/// consumed by the oracle and then discarded or promoted to the result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Assignment {
    sides: Vec<Side>,
}

impl Assignment {
    pub fn from_sides(sides: Vec<Side>) -> Self {
        Assignment { sides }
    }

    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// The side of the given edge.
    ///
    /// # Panics
    ///
    /// Panics if `edge` is out of range.
    pub fn side(&self, edge: EdgeId) -> Side {
        self.sides[edge]
    }

    /// Splits the graph's edges into the side-0 and side-1 sets.
    pub fn partition(&self, graph: &Graph) -> (BTreeSet<Edge>, BTreeSet<Edge>) {
        debug_assert_eq!(self.sides.len(), graph.num_edges());
        let mut side0 = BTreeSet::new();
        let mut side1 = BTreeSet::new();
        for (id, &side) in self.sides.iter().enumerate() {
            match side {
                Side::Zero => side0.insert(graph.edge(id)),
                Side::One => side1.insert(graph.edge(id)),
            };
        }
        (side0, side1)
    }

    /// Whether this assignment satisfies the clause.
    pub fn satisfies(&self, clause: &Clause) -> bool {
        clause.lits().iter().any(|lit| {
            let on_one = self.sides[lit.edge()] == Side::One;
            on_one == lit.is_positive()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Lit;

    #[test]
    fn test_side_flip() {
        assert_eq!(Side::Zero.flip(), Side::One);
        assert_eq!(Side::One.flip(), Side::Zero);
    }

    #[test]
    fn test_partition() {
        let g = Graph::from_edges([(1, 2), (2, 3), (1, 3)]).unwrap();
        let a = Assignment::from_sides(vec![Side::Zero, Side::One, Side::Zero]);
        let (s0, s1) = a.partition(&g);
        assert_eq!(s0.len(), 2);
        assert_eq!(s1.len(), 1);
        assert!(s1.contains(&g.edge(1)));
        assert!(s0.is_disjoint(&s1));
    }

    #[test]
    fn test_satisfies() {
        let a = Assignment::from_sides(vec![Side::Zero, Side::One]);
        assert!(a.satisfies(&Clause::new([Lit::pos(1)])));
        assert!(a.satisfies(&Clause::new([Lit::neg(0), Lit::neg(1)])));
        assert!(!a.satisfies(&Clause::new([Lit::pos(0), Lit::neg(1)])));
    }
}
