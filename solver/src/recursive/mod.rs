//! McNaughton–Zielonka: attract to the highest priority, solve what is left, and retry
//! without whatever the opponent manages to win there.

mod subgame;


use crate::attractor::{attractor, VertexSet};
use crate::error::{Error, Result};
use crate::graph::{ParityGraph, Player};
use crate::solution::{Regions, RsSolution, Strategies};
use crate::solver::Solver;

use self::subgame::Subgame;

#[derive(Clone, Debug, Default)]
pub struct RecursiveSolver {
    /// Calls at this depth or deeper fail. The root call is at depth 0.
    pub max_depth: Option<usize>,
}

impl RecursiveSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth: Some(max_depth) }
    }
}

#[derive(Default)]
struct RecursionStats {
    max_depth_reached: usize,
    subgames_created: usize,
}

impl<G: ParityGraph> Solver<G> for RecursiveSolver {
    type Solution = RsSolution;

    fn solve(&self, graph: &G) -> Result<RsSolution> {
        tracing::debug!(target: "recursive", vertices = graph.vertex_count(), "solving");

        let mut stats = RecursionStats::default();
        let mut solution = self.solve_at(graph, 0, &mut stats)?;

        solution.statistics.set("max_depth_reached", stats.max_depth_reached as u64);
        solution.statistics.set("subgames_created", stats.subgames_created as u64);

        tracing::debug!(
            target: "recursive",
            max_depth_reached = stats.max_depth_reached,
            subgames_created = stats.subgames_created,
            "solved"
        );

        Ok(solution)
    }

    fn name(&self) -> &'static str {
        "Recursive Parity Game Solver"
    }
}

impl RecursiveSolver {
    fn solve_at<G: ParityGraph>(
        &self,
        graph: &G,
        depth: usize,
        stats: &mut RecursionStats,
    ) -> Result<RsSolution> {
        if let Some(limit) = self.max_depth {
            if depth >= limit {
                return Err(Error::RecursionLimitExceeded { limit });
            }
        }
        stats.max_depth_reached = stats.max_depth_reached.max(depth);

        let mut solution = RsSolution::new();
        let Some(d) = graph.max_priority() else { return Ok(solution) };

        let player = Player::of_priority(d);
        let opponent = player.opponent();
        let all = graph.vertices().collect::<VertexSet>();
        let top = graph.vertices_with_priority(d).collect::<VertexSet>();

        let attr = attractor(graph, &all, player, &top);
        for &v in &attr.set {
            solution.set_winner(v, player);
        }
        for (v, w) in attr.strategy.iter() {
            solution.set_strategy(v, w);
        }

        let sub = Subgame::without(graph, &attr.set);
        stats.subgames_created += 1;
        let sub_solution = self.solve_at(&sub.graph, depth + 1, stats)?;

        let lost = sub_solution.regions.region(opponent).map(|v| sub.parent(v)).collect::<VertexSet>();

        tracing::trace!(
            target: "recursive",
            depth,
            max_priority = d,
            attracted = attr.set.len(),
            lost = lost.len(),
            "level"
        );

        if lost.is_empty() {
            sub.merge_into(&sub_solution, &mut solution);
        } else {
            // What the opponent wins in the subgame it also wins here, with the same moves.
            for (v, w) in sub_solution.strategies.iter() {
                if sub_solution.is_won_by(v, opponent) {
                    solution.set_strategy(sub.parent(v), sub.parent(w));
                }
            }

            let escape = attractor(graph, &all, opponent, &lost);
            for &v in &escape.set {
                solution.set_winner(v, opponent);
            }
            for (v, w) in escape.strategy.iter() {
                solution.set_strategy(v, w);
            }

            let rest = Subgame::without(graph, &escape.set);
            stats.subgames_created += 1;
            let rest_solution = self.solve_at(&rest.graph, depth + 1, stats)?;
            rest.merge_into(&rest_solution, &mut solution);
        }

        complete_strategies(graph, &mut solution);

        Ok(solution)
    }
}

/// Keeps strategies only where the owner wins, and gives every such vertex one that stays in
/// its region.
fn complete_strategies<G: ParityGraph>(graph: &G, solution: &mut RsSolution) {
    let RsSolution { regions, strategies, .. } = solution;

    strategies.retain(|v, _| regions.get(v) == Some(graph.player_of(v)));

    for v in graph.vertices() {
        let owner = graph.player_of(v);
        if regions.get(v) != Some(owner) || strategies.get(v).is_some() {
            continue;
        }
        if let Some(w) = graph.successors_of(v).find(|&w| regions.get(w) == Some(owner)) {
            strategies.set(v, w);
        }
    }
}
