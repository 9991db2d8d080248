//! The immutable graph model shared by every other component.
//!
//! Vertices are opaque integer identifiers. Edges are unordered pairs of
//! distinct vertices, canonicalized with the smaller endpoint first, so an
//! [`Edge`] can be used directly as a map key. A [`Graph`] additionally
//! assigns every edge a dense [`EdgeId`], which is the variable space the
//! decision engine works over.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

/// Dense index of an edge within a [`Graph`].
pub type EdgeId = usize;

/// An opaque vertex identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Vertex(u32);

impl Vertex {
    pub const fn new(id: u32) -> Self {
        Vertex(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Vertex {
    fn from(id: u32) -> Self {
        Vertex(id)
    }
}

/// An unordered pair of distinct vertices, stored smaller endpoint first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Edge {
    a: Vertex,
    b: Vertex,
}

impl Edge {
    /// Creates a canonical edge.
    ///
    /// # Panics
    ///
    /// Panics if `u == v`. Self-loops are rejected earlier, at graph
    /// ingestion, with [`GraphError::SelfLoop`].
    pub fn new(u: Vertex, v: Vertex) -> Self {
        assert_ne!(u, v, "Edges must join distinct vertices");
        if u < v {
            Edge { a: u, b: v }
        } else {
            Edge { a: v, b: u }
        }
    }

    /// The smaller endpoint.
    pub const fn a(self) -> Vertex {
        self.a
    }

    /// The larger endpoint.
    pub const fn b(self) -> Vertex {
        self.b
    }

    pub const fn endpoints(self) -> (Vertex, Vertex) {
        (self.a, self.b)
    }

    /// Whether `v` is one of the two endpoints.
    pub fn touches(self, v: Vertex) -> bool {
        self.a == v || self.b == v
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// Rejected at ingestion, before the solver runs.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GraphError {
    #[error("self-loop at vertex {0}")]
    SelfLoop(Vertex),
    #[error("edge {0} references vertex {1} outside the vertex set")]
    UnknownEndpoint(Edge, Vertex),
    #[error("duplicate edge {0}")]
    DuplicateEdge(Edge),
}

/// A set of vertices plus a set of edges whose endpoints all belong to the
/// vertex set. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: BTreeSet<Vertex>,
    edges: Vec<Edge>,
    index: HashMap<Edge, EdgeId>,
}

impl Graph {
    /// Builds a graph from an explicit vertex set and raw endpoint pairs.
    ///
    /// Isolated vertices are kept; they matter for deterministic vertex
    /// coverage when calling the planarity oracle on edge subsets.
    pub fn new(
        vertices: impl IntoIterator<Item = Vertex>,
        pairs: impl IntoIterator<Item = (Vertex, Vertex)>,
    ) -> Result<Self, GraphError> {
        let vertices: BTreeSet<Vertex> = vertices.into_iter().collect();
        let mut edges = Vec::new();
        let mut index = HashMap::new();

        for (u, v) in pairs {
            if u == v {
                return Err(GraphError::SelfLoop(u));
            }
            let edge = Edge::new(u, v);
            for w in [u, v] {
                if !vertices.contains(&w) {
                    return Err(GraphError::UnknownEndpoint(edge, w));
                }
            }
            if index.contains_key(&edge) {
                return Err(GraphError::DuplicateEdge(edge));
            }
            index.insert(edge, edges.len());
            edges.push(edge);
        }

        Ok(Graph { vertices, edges, index })
    }

    /// Builds a graph from raw id pairs, deriving the vertex set from the
    /// edge endpoints.
    pub fn from_edges(pairs: impl IntoIterator<Item = (u32, u32)>) -> Result<Self, GraphError> {
        let pairs: Vec<(Vertex, Vertex)> = pairs
            .into_iter()
            .map(|(u, v)| (Vertex::new(u), Vertex::new(v)))
            .collect();
        let vertices: BTreeSet<Vertex> = pairs.iter().flat_map(|&(u, v)| [u, v]).collect();
        Graph::new(vertices, pairs)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &BTreeSet<Vertex> {
        &self.vertices
    }

    /// All edges, in [`EdgeId`] order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge with the given dense index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id]
    }

    pub fn edge_id(&self, edge: Edge) -> Option<EdgeId> {
        self.index.get(&edge).copied()
    }

    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.index.contains_key(&edge)
    }

    /// The edge set as an ordered set, e.g. for diagnostic output.
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        self.edges.iter().copied().collect()
    }

    /// The largest vertex id in use, or `None` for the empty graph.
    pub fn max_vertex_id(&self) -> Option<u32> {
        self.vertices.iter().next_back().map(|v| v.id())
    }
}
