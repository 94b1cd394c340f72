use pg_solver::graph::{ParityGame, ParityGraph, VertexId};
use pg_solver::index::IndexedVec;
use pg_solver::solution::{Regions, RsSolution, Strategies};

/// Writes a solution in the PGSolver format, using the file ids returned by [`crate::to_game`].
/// Undecided vertices are skipped.
pub fn write_parity_sol(game: &ParityGame, ids: &IndexedVec<VertexId, usize>, solution: &RsSolution) -> String {
    let max_id = ids.iter().copied().max().unwrap_or(0);
    let mut out = format!("paritysol {max_id};\n");

    for v in game.vertices() {
        let Some(winner) = solution.winner(v) else { continue };
        out += &match solution.strategy(v) {
            Some(w) => format!("{} {winner} {};\n", ids[v], ids[w]),
            None => format!("{} {winner};\n", ids[v]),
        };
    }

    out
}
