//! The blow-up encoding.
//!
//! Each original edge `(a, b)` is replaced by four edges over the original
//! vertices and their shadow copies, in the fixed order `ab, a'b', a'b, ab'`.
//! The four copies of a group are mutually constrained: no monochromatic
//! group, and no "matching" pattern splitting `{ab, a'b'}` against
//! `{a'b, ab'}`. Along a DFS spanning tree of the original graph (rooted at
//! a maximum-degree vertex) additional clauses restrict the transition
//! pattern between adjacent groups so the relaxed structure stays coherent
//! along a backbone. An optional star-vertex extension adds one synthetic
//! vertex per designated triangle, with six incident edges and its own fixed
//! clause set.
//!
//! All clause templates here are finite and generated once from the graph
//! shape; the refinement loop never adapts them.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use thiserror::Error;

use crate::clause::{Clause, Lit};
use crate::graph::{Edge, EdgeId, Graph, GraphError, Vertex};

/// Configuration of the blow-up encoder.
#[derive(Debug, Default, Clone)]
pub struct BlowUpOptions {
    /// Triangles of the original graph that receive a star vertex each.
    /// Designating the same triangle twice adds two distinct star vertices.
    pub stars: Vec<[Vertex; 3]>,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BlowUpError {
    #[error("star corner {0} is not a vertex of the original graph")]
    UnknownCorner(Vertex),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A synthetic star vertex with its six incident edges, in the fixed order
/// `av, a'v, bv, b'v, cv, c'v`.
#[derive(Debug, Clone)]
pub struct StarGroup {
    pub center: Vertex,
    pub corners: [Vertex; 3],
    pub edges: [EdgeId; 6],
}

/// The blown-up graph together with its group structure and the consistency
/// clauses installed at setup. Constructed once; immutable thereafter.
#[derive(Debug, Clone)]
pub struct BlownGraph {
    graph: Graph,
    /// Per original edge, the four copies `ab, a'b', a'b, ab'`.
    groups: Vec<[EdgeId; 4]>,
    /// Per spanning-tree edge, the group literals oriented parent-to-child
    /// (third and fourth copies swapped when the stored group runs against
    /// the tree orientation).
    tree_groups: Vec<[EdgeId; 4]>,
    stars: Vec<StarGroup>,
    shadow_offset: u32,
}

impl BlownGraph {
    /// Expands the original graph into its blow-up.
    pub fn encode(original: &Graph, options: &BlowUpOptions) -> Result<Self, BlowUpError> {
        let shadow_offset = original.max_vertex_id().map_or(0, |id| id + 1);
        let shadow = |v: Vertex| Vertex::new(v.id() + shadow_offset);
        // Star ids start above the shadow range.
        let star_base = shadow_offset * 2;

        let mut vertices = BTreeSet::new();
        for &v in original.vertices() {
            vertices.insert(v);
            vertices.insert(shadow(v));
        }

        let mut pairs = Vec::with_capacity(4 * original.num_edges() + 6 * options.stars.len());
        let mut groups = Vec::with_capacity(original.num_edges());
        for edge in original.edges() {
            let (a, b) = edge.endpoints();
            let base = pairs.len();
            pairs.push((a, b));
            pairs.push((shadow(a), shadow(b)));
            pairs.push((shadow(a), b));
            pairs.push((a, shadow(b)));
            groups.push([base, base + 1, base + 2, base + 3]);
        }

        let mut stars = Vec::with_capacity(options.stars.len());
        for (k, &corners) in options.stars.iter().enumerate() {
            for corner in corners {
                if !original.vertices().contains(&corner) {
                    return Err(BlowUpError::UnknownCorner(corner));
                }
            }
            let center = Vertex::new(star_base + k as u32);
            vertices.insert(center);
            let base = pairs.len();
            for corner in corners {
                pairs.push((corner, center));
                pairs.push((shadow(corner), center));
            }
            stars.push(StarGroup {
                center,
                corners,
                edges: [base, base + 1, base + 2, base + 3, base + 4, base + 5],
            });
        }

        let graph = Graph::new(vertices, pairs)?;

        let tree_groups = spanning_tree(original)
            .into_iter()
            .map(|(parent, child)| {
                let edge = Edge::new(parent, child);
                let id = original
                    .edge_id(edge)
                    .expect("spanning tree edges come from the original graph");
                let [v0, v1, v2, v3] = groups[id];
                // Forward when the stored canonical order matches the tree
                // orientation; otherwise the roles of a'b and ab' swap.
                if edge.a() == parent {
                    [v0, v1, v2, v3]
                } else {
                    [v0, v1, v3, v2]
                }
            })
            .collect();

        debug!(
            "blow-up: {} vertices, {} edges, {} groups, {} stars",
            graph.num_vertices(),
            graph.num_edges(),
            groups.len(),
            stars.len()
        );

        Ok(BlownGraph {
            graph,
            groups,
            tree_groups,
            stars,
            shadow_offset,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn groups(&self) -> &[[EdgeId; 4]] {
        &self.groups
    }

    pub fn stars(&self) -> &[StarGroup] {
        &self.stars
    }

    /// The shadow copy of an original vertex.
    pub fn shadow(&self, v: Vertex) -> Vertex {
        Vertex::new(v.id() + self.shadow_offset)
    }

    /// All consistency clauses of the encoding: per-group, spanning-tree,
    /// and star-vertex clauses.
    pub fn clauses(&self) -> Vec<Clause> {
        let mut clauses = Vec::new();

        for &[v0, v1, v2, v3] in &self.groups {
            // No monochromatic group, in either direction.
            clauses.push(Clause::new([
                Lit::neg(v0),
                Lit::neg(v1),
                Lit::neg(v2),
                Lit::neg(v3),
            ]));
            clauses.push(Clause::new([
                Lit::pos(v0),
                Lit::pos(v1),
                Lit::pos(v2),
                Lit::pos(v3),
            ]));
            // No matching pattern: {ab, a'b'} against {a'b, ab'}.
            clauses.push(Clause::new([
                Lit::neg(v0),
                Lit::neg(v1),
                Lit::pos(v2),
                Lit::pos(v3),
            ]));
            clauses.push(Clause::new([
                Lit::pos(v0),
                Lit::pos(v1),
                Lit::neg(v2),
                Lit::neg(v3),
            ]));
        }

        for &[v0, v1, v2, v3] in &self.tree_groups {
            // 3-1 split: the singleton copy must be ab or a'b'.
            clauses.push(Clause::new([
                Lit::pos(v0),
                Lit::pos(v1),
                Lit::neg(v2),
                Lit::pos(v3),
            ]));
            clauses.push(Clause::new([
                Lit::neg(v0),
                Lit::neg(v1),
                Lit::pos(v2),
                Lit::neg(v3),
            ]));
            clauses.push(Clause::new([
                Lit::pos(v0),
                Lit::pos(v1),
                Lit::pos(v2),
                Lit::neg(v3),
            ]));
            clauses.push(Clause::new([
                Lit::neg(v0),
                Lit::neg(v1),
                Lit::neg(v2),
                Lit::pos(v3),
            ]));
            // 2-2 split centered at the child: ab, a'b together against
            // a'b', ab' is forbidden.
            clauses.push(Clause::new([
                Lit::pos(v0),
                Lit::pos(v2),
                Lit::neg(v1),
                Lit::neg(v3),
            ]));
        }

        for star in &self.stars {
            // The two incidences of each blown pair disagree.
            for pair in [(0, 1), (2, 3), (4, 5)] {
                let x = star.edges[pair.0];
                let y = star.edges[pair.1];
                clauses.push(Clause::new([Lit::neg(x), Lit::neg(y)]));
                clauses.push(Clause::new([Lit::pos(x), Lit::pos(y)]));
            }

            // Non-paired endpoints sharing a side pull their own blown edge
            // onto that side.
            let [a, b, c] = star.corners;
            let endpoints = [
                a,
                self.shadow(a),
                b,
                self.shadow(b),
                c,
                self.shadow(c),
            ];
            for i1 in 0..6 {
                for i2 in (i1 + 1)..6 {
                    if i2 == i1 + 1 && i1 % 2 == 0 {
                        // A blown pair has no edge between its copies.
                        continue;
                    }
                    let between = Edge::new(endpoints[i1], endpoints[i2]);
                    if let Some(ab) = self.graph.edge_id(between) {
                        let e1 = star.edges[i1];
                        let e2 = star.edges[i2];
                        clauses.push(Clause::new([Lit::neg(e1), Lit::neg(e2), Lit::pos(ab)]));
                        clauses.push(Clause::new([Lit::pos(e1), Lit::pos(e2), Lit::neg(ab)]));
                    }
                }
            }
        }

        clauses
    }
}

/// DFS spanning tree of the original graph, rooted at a maximum-degree
/// vertex (smallest id on ties). Returns oriented `(parent, child)` edges in
/// discovery order; only the root's component is spanned.
fn spanning_tree(graph: &Graph) -> Vec<(Vertex, Vertex)> {
    let mut adj: BTreeMap<Vertex, Vec<Vertex>> = BTreeMap::new();
    for edge in graph.edges() {
        let (u, v) = edge.endpoints();
        adj.entry(u).or_default().push(v);
        adj.entry(v).or_default().push(u);
    }
    for neighbors in adj.values_mut() {
        neighbors.sort();
    }

    let Some(root) = adj
        .iter()
        .max_by_key(|(v, neighbors)| (neighbors.len(), std::cmp::Reverse(*v)))
        .map(|(&v, _)| v)
    else {
        return Vec::new();
    };

    let mut tree = Vec::new();
    let mut visited = BTreeSet::from([root]);
    dfs(root, &adj, &mut visited, &mut tree);
    tree
}

fn dfs(
    u: Vertex,
    adj: &BTreeMap<Vertex, Vec<Vertex>>,
    visited: &mut BTreeSet<Vertex>,
    tree: &mut Vec<(Vertex, Vertex)>,
) {
    for &v in &adj[&u] {
        if visited.insert(v) {
            tree.push((u, v));
            dfs(v, adj, visited, tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn triangle() -> Graph {
        Graph::from_edges([(0, 1), (1, 2), (0, 2)]).unwrap()
    }

    #[test]
    fn test_blown_shape() {
        let g = triangle();
        let blown = BlownGraph::encode(&g, &BlowUpOptions::default()).unwrap();

        assert_eq!(blown.graph().num_vertices(), 6);
        assert_eq!(blown.graph().num_edges(), 12);
        assert_eq!(blown.groups().len(), 3);

        // Group of edge 0-1: 0-1, 3-4, 1-3, 0-4 (shadow offset 3).
        let [v0, v1, v2, v3] = blown.groups()[0];
        let e = |id| blown.graph().edge(id);
        assert_eq!(e(v0), Edge::new(Vertex::new(0), Vertex::new(1)));
        assert_eq!(e(v1), Edge::new(Vertex::new(3), Vertex::new(4)));
        assert_eq!(e(v2), Edge::new(Vertex::new(3), Vertex::new(1)));
        assert_eq!(e(v3), Edge::new(Vertex::new(0), Vertex::new(4)));
    }

    #[test]
    fn test_group_clause_count() {
        let g = triangle();
        let blown = BlownGraph::encode(&g, &BlowUpOptions::default()).unwrap();
        // 4 group clauses per edge plus 5 tree clauses per spanning-tree
        // edge (the triangle's tree has 2 edges).
        assert_eq!(blown.clauses().len(), 3 * 4 + 2 * 5);
    }

    #[test]
    fn test_spanning_tree_root_is_max_degree() {
        // Star around vertex 5 plus a pendant chain.
        let g = Graph::from_edges([(5, 1), (5, 2), (5, 3), (1, 2), (3, 4)]).unwrap();
        let tree = spanning_tree(&g);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].0, Vertex::new(5));
        // Every vertex is reached exactly once.
        let children: BTreeSet<Vertex> = tree.iter().map(|&(_, c)| c).collect();
        assert_eq!(children.len(), 4);
        assert!(!children.contains(&Vertex::new(5)));
    }

    #[test]
    fn test_tree_orientation_swaps_copies() {
        // Path 1-2-3: vertex 2 has maximum degree and becomes the root, so
        // the tree edge (2, 1) runs against the canonical order of edge 1-2.
        let g = Graph::from_edges([(1, 2), (2, 3)]).unwrap();
        let blown = BlownGraph::encode(&g, &BlowUpOptions::default()).unwrap();

        let group_12 = blown.groups()[0];
        let reversed: Vec<_> = blown
            .tree_groups
            .iter()
            .filter(|tg| tg[0] == group_12[0])
            .collect();
        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0], &[group_12[0], group_12[1], group_12[3], group_12[2]]);

        // Edge 2-3 runs forward.
        let group_23 = blown.groups()[1];
        assert!(blown.tree_groups.contains(&group_23));
    }

    #[test]
    fn test_star_group() {
        let g = triangle();
        let opts = BlowUpOptions {
            stars: vec![[Vertex::new(0), Vertex::new(1), Vertex::new(2)]],
        };
        let blown = BlownGraph::encode(&g, &opts).unwrap();

        assert_eq!(blown.graph().num_vertices(), 7);
        assert_eq!(blown.graph().num_edges(), 12 + 6);
        assert_eq!(blown.stars().len(), 1);

        let star = &blown.stars()[0];
        assert_eq!(star.center, Vertex::new(6));
        let e = blown.graph().edge(star.edges[1]);
        assert!(e.touches(star.center));
        assert!(e.touches(blown.shadow(Vertex::new(0))));

        // 3 disagree pairs (2 clauses each) plus 12 non-paired endpoint
        // pairs, all of which have a blown edge in a triangle (2 clauses
        // each), on top of group and tree clauses.
        let clauses = blown.clauses();
        assert_eq!(clauses.len(), 3 * 4 + 2 * 5 + 3 * 2 + 12 * 2);
    }

    #[test]
    fn test_unknown_corner_rejected() {
        let g = triangle();
        let opts = BlowUpOptions {
            stars: vec![[Vertex::new(0), Vertex::new(1), Vertex::new(9)]],
        };
        let err = BlownGraph::encode(&g, &opts).unwrap_err();
        assert_eq!(err, BlowUpError::UnknownCorner(Vertex::new(9)));
    }
}
