use crate::graph::{ParityGraph, Player, VertexId};
use crate::solution::StrategyMap;
use crate::Set;

pub type VertexSet = Set<VertexId>;

pub struct Attractor {
    pub set: VertexSet,
    /// Witness successor for every vertex of the attracting player that was pulled in.
    pub strategy: StrategyMap,
}

/// Computes the vertices of `active` from which `player` can force the play into
/// `target ∩ active` without leaving `active`.
pub fn attractor<G: ParityGraph>(
    graph: &G,
    active: &VertexSet,
    player: Player,
    target: &VertexSet,
) -> Attractor {
    let mut set = target.iter().copied().filter(|v| active.contains(v)).collect::<VertexSet>();
    let mut strategy = StrategyMap::default();

    if set.is_empty() || set.len() == active.len() {
        return Attractor { set, strategy };
    }

    let mut changed = true;
    while changed && set.len() < active.len() {
        changed = false;

        for v in graph.vertices() {
            if !active.contains(&v) || set.contains(&v) {
                continue;
            }

            let mut succs = graph.successors_of(v).filter(|w| active.contains(w)).peekable();

            if graph.player_of(v) == player {
                // One edge into the attractor is enough.
                let Some(w) = succs.find(|w| set.contains(w)) else { continue };
                strategy.set(v, w);
            } else {
                // The opponent must have no way out, and somewhere to go.
                if succs.peek().is_none() || !succs.all(|w| set.contains(&w)) {
                    continue;
                }
            }

            set.insert(v);
            changed = true;
        }
    }

    tracing::trace!(target: "attractor", ?player, targets = target.len(), size = set.len(), "attractor computed");

    Attractor { set, strategy }
}
