use crate::attractor::VertexSet;
use crate::graph::{GameVertex, Graph, ParityGraph, Player, VertexId};
use crate::index::IndexedVec;
use crate::solution::{Regions, RsSolution, Strategies};

#[derive(Clone, Copy, Debug)]
pub struct SubVertex {
    player: Player,
    priority: usize,
}

impl GameVertex for SubVertex {
    fn player(&self) -> Player {
        self.player
    }

    fn priority(&self) -> usize {
        self.priority
    }
}

/// A copy of a game with some vertices removed, renumbered from zero.
pub struct Subgame {
    pub graph: Graph<SubVertex>,
    to_parent: IndexedVec<VertexId, VertexId>,
}

impl Subgame {
    /// `removed` must be an attractor, so that every remaining vertex keeps a successor.
    pub fn without<G: ParityGraph>(graph: &G, removed: &VertexSet) -> Self {
        let mut vertices = IndexedVec::<VertexId, _>::new();
        let mut to_parent = IndexedVec::<VertexId, _>::new();
        let mut to_child = IndexedVec::<VertexId, _>::repeat(None, graph.vertex_count());

        for v in graph.vertices().filter(|v| !removed.contains(v)) {
            let vertex = SubVertex { player: graph.player_of(v), priority: graph.priority_of(v) };
            to_child[v] = Some(vertices.push(vertex));
            to_parent.push(v);
        }

        let succs = to_parent
            .iter()
            .map(|&v| graph.successors_of(v).filter_map(|w| to_child[w]).collect::<Vec<_>>())
            .collect::<IndexedVec<VertexId, _>>();
        let labels = succs.iter().map(|s| vec![(); s.len()]).collect();

        Self { graph: Graph::from_parts(vertices, succs, labels), to_parent }
    }

    pub fn parent(&self, v: VertexId) -> VertexId {
        self.to_parent[v]
    }

    /// Copies the regions and strategies of a solution of the subgame into `into`, a solution
    /// of the parent game.
    pub fn merge_into(&self, solution: &RsSolution, into: &mut RsSolution) {
        for (v, player) in solution.regions.iter() {
            into.set_winner(self.parent(v), player);
        }
        for (v, w) in solution.strategies.iter() {
            into.set_strategy(self.parent(v), self.parent(w));
        }
    }
}
