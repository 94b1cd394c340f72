use std::collections::HashMap;

use anyhow::{bail, Result};
use pg_solver::graph::{GraphBuilder, ParityGame, ParityVertex, VertexId};
use pg_solver::index::IndexedVec;

use crate::ParsedGame;

/// Builds the solver's graph, numbering vertices in file order. Also returns the file id of
/// every vertex.
pub fn to_game(parsed: &ParsedGame) -> Result<(ParityGame, IndexedVec<VertexId, usize>)> {
    let mut builder = GraphBuilder::new();
    let mut ids = IndexedVec::new();
    let mut id_to_vertex = HashMap::new();

    for n in &parsed.nodes {
        let name = n.name.clone().unwrap_or_else(|| n.id.to_string());
        let v = builder.add_vertex(ParityVertex::new(name, n.player, n.priority));
        ids.push(n.id);

        if id_to_vertex.insert(n.id, v).is_some() {
            bail!("vertex {} is declared twice", n.id);
        }
    }

    for n in &parsed.nodes {
        let v = id_to_vertex[&n.id];
        for &s in &n.successors {
            let Some(&w) = id_to_vertex.get(&s) else {
                bail!("successor {s} of vertex {} is not declared", n.id);
            };
            builder.add_edge(v, w, ());
        }
    }

    Ok((builder.build()?, ids))
}
