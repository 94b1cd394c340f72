use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{InvalidGraph, Result};
use crate::index::{new_index, AsIndex, IndexedVec};
use crate::Set;

new_index!(pub index VertexId);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_usize())
    }
}

impl Serialize for VertexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.to_usize() as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    P0,
    P1,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::P0 => Player::P1,
            Player::P1 => Player::P0,
        }
    }

    /// The player favoured by a priority: even priorities belong to player 0.
    pub fn of_priority(priority: usize) -> Player {
        match priority % 2 {
            0 => Player::P0,
            _ => Player::P1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::P0 => 0,
            Player::P1 => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl Serialize for Player {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

/// Vertex properties every game family shares: who moves, and the priority.
pub trait GameVertex {
    fn player(&self) -> Player;
    fn priority(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParityVertex {
    pub name: String,
    pub player: Player,
    pub priority: usize,
}

impl ParityVertex {
    pub fn new(name: impl Into<String>, player: Player, priority: usize) -> Self {
        Self { name: name.into(), player, priority }
    }
}

impl GameVertex for ParityVertex {
    fn player(&self) -> Player {
        self.player
    }

    fn priority(&self) -> usize {
        self.priority
    }
}

/// Immutable game graph, generic over the vertex properties `V` and edge properties `E`.
///
/// Vertices are numbered in creation order and successors are kept in insertion order, so
/// iteration is reproducible. Every vertex has at least one successor and there are no
/// parallel edges: the only way to obtain a `Graph` is through [`GraphBuilder::build`], which
/// checks both.
#[derive(Clone, Debug)]
pub struct Graph<V, E = ()> {
    vertices: IndexedVec<VertexId, V>,
    succs: IndexedVec<VertexId, Vec<VertexId>>,
    labels: IndexedVec<VertexId, Vec<E>>,
    preds: IndexedVec<VertexId, Vec<VertexId>>,
}

pub type ParityGame = Graph<ParityVertex>;

impl<V, E> Graph<V, E> {
    /// Assembles a graph from adjacency lists the caller already knows to be well formed.
    pub(crate) fn from_parts(
        vertices: IndexedVec<VertexId, V>,
        succs: IndexedVec<VertexId, Vec<VertexId>>,
        labels: IndexedVec<VertexId, Vec<E>>,
    ) -> Self {
        let mut preds = vertices.indexes().map(|_| Vec::new()).collect::<IndexedVec<_, _>>();
        for (u, vs) in succs.enumerate() {
            for &v in vs {
                preds[v].push(u);
            }
        }

        Self { vertices, succs, labels, preds }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.succs.iter().map(Vec::len).sum()
    }

    pub fn vertex(&self, v: VertexId) -> &V {
        &self.vertices[v]
    }

    pub fn edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, &E)> + '_ {
        self.succs[v].iter().copied().zip(&self.labels[v])
    }
}

impl<V: GameVertex, E> ParityGraph for Graph<V, E> {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn player_of(&self, v: VertexId) -> Player {
        self.vertices[v].player()
    }

    fn priority_of(&self, v: VertexId) -> usize {
        self.vertices[v].priority()
    }

    fn successors_of(&self, v: VertexId) -> impl Iterator<Item = VertexId> {
        self.succs[v].iter().copied()
    }

    fn predecessors_of(&self, v: VertexId) -> impl Iterator<Item = VertexId> {
        self.preds[v].iter().copied()
    }
}

/// Read-only view of a game that the solvers work on.
pub trait ParityGraph {
    fn vertex_count(&self) -> usize;

    fn player_of(&self, v: VertexId) -> Player;
    fn priority_of(&self, v: VertexId) -> usize;

    fn successors_of(&self, v: VertexId) -> impl Iterator<Item = VertexId>;
    fn predecessors_of(&self, v: VertexId) -> impl Iterator<Item = VertexId>;

    fn vertices(&self) -> impl DoubleEndedIterator<Item = VertexId> + ExactSizeIterator {
        (0..self.vertex_count()).map(VertexId)
    }

    fn max_priority(&self) -> Option<usize> {
        self.vertices().map(|v| self.priority_of(v)).max()
    }

    fn vertices_with_priority(&self, priority: usize) -> impl Iterator<Item = VertexId> {
        self.vertices().filter(move |&v| self.priority_of(v) == priority)
    }
}

pub struct GraphBuilder<V, E = ()> {
    vertices: IndexedVec<VertexId, V>,
    edges: Vec<(VertexId, VertexId, E)>,
}

impl<V, E> Default for GraphBuilder<V, E> {
    fn default() -> Self {
        Self { vertices: IndexedVec::default(), edges: Vec::new() }
    }
}

impl<V, E> GraphBuilder<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: V) -> VertexId {
        self.vertices.push(vertex)
    }

    /// Edges are only checked by [`GraphBuilder::build`].
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: E) {
        self.edges.push((from, to, label));
    }

    pub fn build(self) -> Result<Graph<V, E>> {
        let n = self.vertices.len();
        let mut succs = (0..n).map(|_| Vec::new()).collect::<IndexedVec<VertexId, _>>();
        let mut labels = (0..n).map(|_| Vec::new()).collect::<IndexedVec<VertexId, _>>();

        let mut seen = Set::default();
        for (from, to, label) in self.edges {
            for v in [from, to] {
                if v.to_usize() >= n {
                    return Err(InvalidGraph::UnknownVertex(v).into());
                }
            }
            if !seen.insert((from, to)) {
                return Err(InvalidGraph::DuplicateEdge { from, to }.into());
            }

            succs[from].push(to);
            labels[from].push(label);
        }

        if let Some(v) = succs.indexes().find(|&v| succs[v].is_empty()) {
            return Err(InvalidGraph::DeadEnd(v).into());
        }

        Ok(Graph::from_parts(self.vertices, succs, labels))
    }
}

impl<E> GraphBuilder<ParityVertex, E> {
    /// Adds a vertex named after its index.
    pub fn add_parity_vertex(&mut self, player: Player, priority: usize) -> VertexId {
        let name = self.vertices.len().to_string();
        self.add_vertex(ParityVertex::new(name, player, priority))
    }
}
