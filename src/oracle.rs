//! The planarity oracle boundary.
//!
//! The refinement loop only depends on the [`PlanarityOracle`] contract: a
//! pure, sound, terminating decision procedure that either certifies an edge
//! subset planar or returns a non-empty witness — a subset of the input edges
//! forming a non-planar subgraph, minimal under the oracle's own certificate
//! semantics. The witness is treated abstractly as "a sufficient edge subset
//! for re-coloring"; any planarity algorithm with witness extraction fits.
//!
//! [`KuratowskiOracle`] is the shipped reference implementation: exact
//! planarity by exhaustive search for a K5 or K3,3 subdivision, suitable for
//! the instance sizes this tool targets. Production users with larger inputs
//! can plug in any oracle honoring the contract.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{Edge, Vertex};

/// Verdict of a planarity check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlanarityCheck {
    Planar,
    /// The witness is a non-empty subset of the checked edges whose induced
    /// subgraph is non-planar (a Kuratowski-style certificate).
    NonPlanar { witness: BTreeSet<Edge> },
}

impl PlanarityCheck {
    pub fn is_planar(&self) -> bool {
        matches!(self, PlanarityCheck::Planar)
    }
}

/// A black-box planarity decision procedure with witness extraction.
///
/// Implementations must be sound (never report `Planar` for a non-planar
/// input), must terminate, and must be pure functions of their input. The
/// verdict must be stable across calls even if the internal certificate is
/// not. `Sync` is required because the two per-side checks of an iteration
/// run concurrently.
pub trait PlanarityOracle: Sync {
    /// Decides planarity of the subgraph induced by `edges`.
    ///
    /// The full vertex set is supplied so that isolated vertices stay
    /// present for deterministic vertex coverage; planarity itself does not
    /// depend on them.
    fn check(&self, vertices: &BTreeSet<Vertex>, edges: &BTreeSet<Edge>) -> PlanarityCheck;
}

type Adjacency = BTreeMap<Vertex, Vec<Vertex>>;

/// Exact planarity testing by Kuratowski subdivision search.
///
/// By Kuratowski's theorem a graph is planar iff it contains no subdivision
/// of K5 or K3,3. The search enumerates candidate branch vertices (degree
/// at least 4 for K5, at least 3 for K3,3) and looks for internally
/// vertex-disjoint linking paths by backtracking. The witness is the edge
/// set of the found subdivision.
#[derive(Debug, Default, Clone, Copy)]
pub struct KuratowskiOracle;

impl PlanarityOracle for KuratowskiOracle {
    fn check(&self, _vertices: &BTreeSet<Vertex>, edges: &BTreeSet<Edge>) -> PlanarityCheck {
        // The smallest Kuratowski subgraph is K3,3 with 9 edges.
        if edges.len() < 9 {
            return PlanarityCheck::Planar;
        }

        let adj = adjacency(edges);

        if let Some(witness) = find_k5(&adj) {
            return PlanarityCheck::NonPlanar { witness };
        }
        if let Some(witness) = find_k33(&adj) {
            return PlanarityCheck::NonPlanar { witness };
        }
        PlanarityCheck::Planar
    }
}

fn adjacency(edges: &BTreeSet<Edge>) -> Adjacency {
    let mut adj: Adjacency = BTreeMap::new();
    for &e in edges {
        let (u, v) = e.endpoints();
        adj.entry(u).or_default().push(v);
        adj.entry(v).or_default().push(u);
    }
    for neighbors in adj.values_mut() {
        neighbors.sort();
    }
    adj
}

/// Searches for a K5 subdivision: 5 branch vertices of degree >= 4 linked
/// by 10 internally disjoint paths.
fn find_k5(adj: &Adjacency) -> Option<BTreeSet<Edge>> {
    let candidates: Vec<Vertex> = adj
        .iter()
        .filter(|(_, neighbors)| neighbors.len() >= 4)
        .map(|(&v, _)| v)
        .collect();
    if candidates.len() < 5 {
        return None;
    }

    choose(&candidates, 5, 0, &mut Vec::new(), &mut |branch| {
        let mut pairs = Vec::with_capacity(10);
        for i in 0..branch.len() {
            for j in (i + 1)..branch.len() {
                pairs.push((branch[i], branch[j]));
            }
        }
        link(adj, branch, &pairs)
    })
}

/// Searches for a K3,3 subdivision: 6 branch vertices of degree >= 3, split
/// 3/3, linked by the 9 cross paths.
fn find_k33(adj: &Adjacency) -> Option<BTreeSet<Edge>> {
    let candidates: Vec<Vertex> = adj
        .iter()
        .filter(|(_, neighbors)| neighbors.len() >= 3)
        .map(|(&v, _)| v)
        .collect();
    if candidates.len() < 6 {
        return None;
    }

    choose(&candidates, 6, 0, &mut Vec::new(), &mut |branch| {
        // Fix branch[0] on the left class to enumerate each bipartition once.
        for i in 1..5 {
            for j in (i + 1)..6 {
                let left = [branch[0], branch[i], branch[j]];
                let right: Vec<Vertex> = (1..6)
                    .filter(|&k| k != i && k != j)
                    .map(|k| branch[k])
                    .collect();
                let mut pairs = Vec::with_capacity(9);
                for &u in &left {
                    for &v in &right {
                        pairs.push((u, v));
                    }
                }
                if let Some(witness) = link(adj, branch, &pairs) {
                    return Some(witness);
                }
            }
        }
        None
    })
}

/// Enumerates `k`-combinations of `items`, calling `f` on each until it
/// produces a witness.
fn choose<F>(
    items: &[Vertex],
    k: usize,
    start: usize,
    acc: &mut Vec<Vertex>,
    f: &mut F,
) -> Option<BTreeSet<Edge>>
where
    F: FnMut(&[Vertex]) -> Option<BTreeSet<Edge>>,
{
    if acc.len() == k {
        return f(acc);
    }
    if items.len() - start < k - acc.len() {
        return None;
    }
    for i in start..items.len() {
        acc.push(items[i]);
        let found = choose(items, k, i + 1, acc, f);
        acc.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Tries to connect every pair of branch vertices by internally
/// vertex-disjoint paths; returns the edge set of the linked subdivision.
fn link(adj: &Adjacency, branch: &[Vertex], pairs: &[(Vertex, Vertex)]) -> Option<BTreeSet<Edge>> {
    let mut search = PathSearch {
        adj,
        branch: branch.iter().copied().collect(),
        used: BTreeSet::new(),
        paths: Vec::new(),
    };
    if search.solve(pairs) {
        let mut witness = BTreeSet::new();
        for path in &search.paths {
            for pair in path.windows(2) {
                witness.insert(Edge::new(pair[0], pair[1]));
            }
        }
        Some(witness)
    } else {
        None
    }
}

struct PathSearch<'a> {
    adj: &'a Adjacency,
    branch: BTreeSet<Vertex>,
    /// Interior vertices of committed paths.
    used: BTreeSet<Vertex>,
    paths: Vec<Vec<Vertex>>,
}

impl PathSearch<'_> {
    fn solve(&mut self, pairs: &[(Vertex, Vertex)]) -> bool {
        let Some(&(u, v)) = pairs.first() else {
            return true;
        };
        let mut path = vec![u];
        self.extend_path(&mut path, v, &pairs[1..])
    }

    fn extend_path(
        &mut self,
        path: &mut Vec<Vertex>,
        target: Vertex,
        rest: &[(Vertex, Vertex)],
    ) -> bool {
        let current = *path.last().unwrap();
        let neighbors = match self.adj.get(&current) {
            Some(neighbors) => neighbors.clone(),
            None => return false,
        };
        for w in neighbors {
            if w == target {
                // Commit this path and recurse into the remaining pairs.
                let interior: Vec<Vertex> = path[1..].to_vec();
                self.used.extend(interior.iter().copied());
                path.push(target);
                self.paths.push(path.clone());
                if self.solve(rest) {
                    return true;
                }
                self.paths.pop();
                path.pop();
                for x in &interior {
                    self.used.remove(x);
                }
            } else if !self.branch.contains(&w) && !self.used.contains(&w) && !path.contains(&w) {
                path.push(w);
                if self.extend_path(path, target, rest) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }
}
