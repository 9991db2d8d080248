//! Edge literals, clauses, and the monotonically growing clause set.
//!
//! A literal is an edge variable or its negation; the positive phase means
//! "this edge is on side 1". A clause is a disjunction of literals that all
//! future candidate assignments must keep satisfied. Clauses accumulate and
//! are never retracted, which is what makes the refinement loop terminate.

use std::fmt;
use std::ops::Neg;

use crate::graph::EdgeId;

/// A signed edge literal. Positive means the edge is assigned side 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit {
    edge: EdgeId,
    positive: bool,
}

impl Lit {
    /// The positive literal: edge on side 1.
    pub const fn pos(edge: EdgeId) -> Self {
        Lit { edge, positive: true }
    }

    /// The negative literal: edge on side 0.
    pub const fn neg(edge: EdgeId) -> Self {
        Lit { edge, positive: false }
    }

    pub const fn edge(self) -> EdgeId {
        self.edge
    }

    pub const fn is_positive(self) -> bool {
        self.positive
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Lit {
            edge: self.edge,
            positive: !self.positive,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e{}", if self.positive { "" } else { "~" }, self.edge)
    }
}

/// A disjunction of edge literals.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Clause(Vec<Lit>);

impl Clause {
    pub fn new(lits: impl IntoIterator<Item = Lit>) -> Self {
        let lits: Vec<Lit> = lits.into_iter().collect();
        assert!(!lits.is_empty(), "Clauses must be non-empty");
        Clause(lits)
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;
    type IntoIter = std::slice::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Append-only clause accumulator owned by the refinement loop.
///
/// There is deliberately no removal API.
#[derive(Debug, Default, Clone)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn new() -> Self {
        ClauseSet::default()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn extend(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.clauses.extend(clauses);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit() {
        let p = Lit::pos(3);
        let n = Lit::neg(3);
        assert_eq!(-p, n);
        assert_eq!(-n, p);
        assert!(p.is_positive());
        assert_eq!(p.edge(), 3);
        assert_eq!(p.to_string(), "e3");
        assert_eq!(n.to_string(), "~e3");
    }

    #[test]
    fn test_clause_display() {
        let c = Clause::new([Lit::pos(0), Lit::neg(2)]);
        assert_eq!(c.to_string(), "(e0 | ~e2)");
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_clause_set_grows() {
        let mut set = ClauseSet::new();
        assert!(set.is_empty());
        set.push(Clause::new([Lit::pos(0)]));
        set.extend([Clause::new([Lit::neg(1)]), Clause::new([Lit::pos(2)])]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().count(), 3);
    }
}
