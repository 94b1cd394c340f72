use std::thread;

use itertools::Itertools;
use quickcheck::{Arbitrary, Gen, QuickCheck};

use crate::graph::{GraphBuilder, ParityGame, ParityGraph, ParityVertex, Player, VertexId};
use crate::index::AsIndex;
use crate::recursive::RecursiveSolver;
use crate::solution::{Regions, RsSolution, Strategies};
use crate::spm::ProgressMeasuresSolver;
use crate::{Error, InvalidGraph, Solver};

fn build<'a>(rows: impl IntoIterator<Item = (Player, usize, &'a [usize])>) -> ParityGame {
    let mut builder: GraphBuilder<ParityVertex> = GraphBuilder::new();
    let mut edges = Vec::new();
    for (player, priority, succs) in rows {
        let v = builder.add_parity_vertex(player, priority);
        edges.extend(succs.iter().map(|&w| (v, VertexId(w))));
    }
    for (v, w) in edges {
        builder.add_edge(v, w, ());
    }
    builder.build().unwrap()
}

/// One row per vertex: owner, priority and successors.
pub fn game(rows: &[(Player, usize, &[usize])]) -> ParityGame {
    build(rows.iter().copied())
}

type Rows = Vec<(Player, usize, Vec<usize>)>;

fn build_rows(rows: &Rows) -> ParityGame {
    build(rows.iter().map(|(player, priority, succs)| (*player, *priority, &succs[..])))
}

/// `n` vertices with priorities below `priorities` and 1 to 3 successors each.
fn random_rows(g: &mut Gen, n: usize, priorities: usize) -> Rows {
    let mut rows = Vec::with_capacity(n);
    for _ in 0..n {
        let player = if bool::arbitrary(g) { Player::P1 } else { Player::P0 };
        let priority = usize::arbitrary(g) % priorities;
        let degree = 1 + usize::arbitrary(g) % 3;
        let succs = (0..degree).map(|_| usize::arbitrary(g) % n).unique().collect_vec();
        rows.push((player, priority, succs));
    }
    rows
}

/// Up to 10 vertices, priorities up to 6, and 1 to 3 successors each.
#[derive(Clone, Debug)]
pub struct SmallGame {
    rows: Rows,
}

impl SmallGame {
    pub fn build(&self) -> ParityGame {
        build_rows(&self.rows)
    }
}

impl Arbitrary for SmallGame {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = 1 + usize::arbitrary(g) % 10;
        Self { rows: random_rows(g, n, 7) }
    }
}

/// 50 to 150 vertices with priorities up to 15, big enough for the worklist and the
/// stabilization passes to interleave.
#[derive(Clone, Debug)]
pub struct LargeGame {
    rows: Rows,
}

impl LargeGame {
    pub fn build(&self) -> ParityGame {
        build_rows(&self.rows)
    }
}

impl Arbitrary for LargeGame {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = 50 + usize::arbitrary(g) % 101;
        Self { rows: random_rows(g, n, 16) }
    }
}

/// Checks that every vertex is decided, and that in each region the owner's strategy together
/// with any opponent move never leaves the region and only closes cycles the region's winner
/// wins.
pub fn is_winning(g: &ParityGame, solution: &RsSolution) -> bool {
    if g.vertices().any(|v| solution.winner(v).is_none()) {
        return false;
    }

    for player in [Player::P0, Player::P1] {
        let region = solution.regions.region(player).collect_vec();
        let inside = |v: VertexId| solution.is_won_by(v, player);

        // Moves allowed once the winner commits to its strategy.
        let mut moves = vec![Vec::new(); g.vertex_count()];
        for &v in &region {
            if g.player_of(v) == player {
                let Some(w) = solution.strategy(v) else { return false };
                if !g.successors_of(v).any(|s| s == w) || !inside(w) {
                    return false;
                }
                moves[v.to_usize()] = vec![w];
            } else {
                if !g.successors_of(v).all(inside) {
                    return false;
                }
                moves[v.to_usize()] = g.successors_of(v).collect_vec();
            }
        }

        // No cycle whose highest priority favours the opponent.
        let losing = region.iter().map(|&v| g.priority_of(v)).filter(|&d| Player::of_priority(d) != player);
        for d in losing.unique() {
            for &s in region.iter().filter(|&&v| g.priority_of(v) == d) {
                let mut seen = vec![false; g.vertex_count()];
                let mut stack = moves[s.to_usize()].clone();
                while let Some(v) = stack.pop() {
                    if g.priority_of(v) > d || std::mem::replace(&mut seen[v.to_usize()], true) {
                        continue;
                    }
                    if v == s {
                        return false;
                    }
                    stack.extend(&moves[v.to_usize()]);
                }
            }
        }
    }

    true
}

#[test]
fn builder_rejects_malformed_graphs() {
    let mut b: GraphBuilder<ParityVertex> = GraphBuilder::new();
    let v = b.add_parity_vertex(Player::P0, 0);
    b.add_edge(v, VertexId(1), ());
    assert_eq!(b.build().unwrap_err(), Error::InvalidGraph(InvalidGraph::UnknownVertex(VertexId(1))));

    let mut b: GraphBuilder<ParityVertex> = GraphBuilder::new();
    let v = b.add_parity_vertex(Player::P0, 0);
    b.add_edge(v, v, ());
    b.add_edge(v, v, ());
    assert_eq!(b.build().unwrap_err(), Error::InvalidGraph(InvalidGraph::DuplicateEdge { from: v, to: v }));

    let mut b: GraphBuilder<ParityVertex> = GraphBuilder::new();
    let v = b.add_parity_vertex(Player::P0, 0);
    let w = b.add_parity_vertex(Player::P1, 3);
    b.add_edge(v, w, ());
    assert_eq!(b.build().unwrap_err(), Error::InvalidGraph(InvalidGraph::DeadEnd(w)));
}

#[test]
fn graph_accessors() {
    let g = game(&[(Player::P0, 4, &[1, 2]), (Player::P1, 1, &[0]), (Player::P1, 4, &[2, 0])]);

    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 5);
    assert_eq!(g.vertex(VertexId(1)).name, "1");
    assert_eq!(g.successors_of(VertexId(2)).collect_vec(), [VertexId(2), VertexId(0)]);
    assert_eq!(g.predecessors_of(VertexId(0)).collect_vec(), [VertexId(1), VertexId(2)]);
    assert_eq!(g.max_priority(), Some(4));
    assert_eq!(g.vertices_with_priority(4).collect_vec(), [VertexId(0), VertexId(2)]);
    assert_eq!(g.vertices().rev().next(), Some(VertexId(2)));
}

#[test]
fn edge_properties_follow_their_edges() {
    let mut b: GraphBuilder<ParityVertex, i64> = GraphBuilder::new();
    let v = b.add_parity_vertex(Player::P0, 1);
    let w = b.add_parity_vertex(Player::P1, 2);
    b.add_edge(v, w, -4);
    b.add_edge(w, w, 7);
    b.add_edge(w, v, 0);
    let g = b.build().unwrap();

    assert_eq!(g.edges(w).map(|(u, &weight)| (u, weight)).collect_vec(), [(w, 7), (v, 0)]);

    // Labels do not matter to the parity solvers.
    let solution = RecursiveSolver::new().solve(&g).unwrap();
    assert!(solution.is_won_by(v, Player::P0) && solution.is_won_by(w, Player::P0));
}

#[test]
fn solver_names() {
    let g = game(&[(Player::P0, 0, &[0])]);
    assert_eq!(Solver::<ParityGame>::name(&ProgressMeasuresSolver::new()), "Progressive Small Progress Measures");
    assert_eq!(Solver::<ParityGame>::name(&RecursiveSolver::new()), "Recursive Parity Game Solver");
    assert!(RecursiveSolver::new().solve(&g).is_ok());
}

#[test]
fn solvers_agree() {
    fn prop(game: SmallGame) -> bool {
        let g = game.build();
        let spm = ProgressMeasuresSolver::new().solve(&g).unwrap();
        let rec = RecursiveSolver::new().solve(&g).unwrap();
        spm.regions == rec.regions
    }

    QuickCheck::new().tests(500).quickcheck(prop as fn(SmallGame) -> bool);
}

#[test]
fn strategies_are_winning() {
    fn prop(game: SmallGame) -> bool {
        let g = game.build();
        let spm = ProgressMeasuresSolver::new().solve(&g).unwrap();
        let rec = RecursiveSolver::new().solve(&g).unwrap();
        is_winning(&g, &spm) && is_winning(&g, &rec)
    }

    QuickCheck::new().tests(500).quickcheck(prop as fn(SmallGame) -> bool);
}

#[test]
fn stabilization_is_sound() {
    fn prop(game: SmallGame) -> bool {
        let g = game.build();
        [Some(0), Some(1), None].into_iter().all(|stabilize_every| {
            let solution = ProgressMeasuresSolver { stabilize_every }.solve(&g).unwrap();
            is_winning(&g, &solution)
        })
    }

    QuickCheck::new().tests(300).quickcheck(prop as fn(SmallGame) -> bool);
}

#[test]
fn large_games_agree() {
    fn prop(game: LargeGame) -> bool {
        let g = game.build();
        let rec = RecursiveSolver::new().solve(&g).unwrap();
        is_winning(&g, &rec)
            && [ProgressMeasuresSolver::default(), ProgressMeasuresSolver { stabilize_every: Some(0) }]
                .iter()
                .all(|spm| {
                    let solution = spm.solve(&g).unwrap();
                    solution.regions == rec.regions && is_winning(&g, &solution)
                })
    }

    QuickCheck::new().tests(30).quickcheck(prop as fn(LargeGame) -> bool);
}

#[test]
fn deterministic() {
    fn prop(game: SmallGame) -> bool {
        let g = game.build();
        let spm = ProgressMeasuresSolver::new();
        let rec = RecursiveSolver::new();
        spm.solve(&g).unwrap() == spm.solve(&g).unwrap() && rec.solve(&g).unwrap() == rec.solve(&g).unwrap()
    }

    QuickCheck::new().tests(200).quickcheck(prop as fn(SmallGame) -> bool);
}

#[test]
fn independent_solves_on_threads() {
    let games = [
        game(&[(Player::P0, 1, &[1]), (Player::P1, 2, &[0])]),
        game(&[(Player::P1, 2, &[0, 1]), (Player::P0, 3, &[1])]),
    ];
    let solver = &ProgressMeasuresSolver::new();

    let sequential = games.iter().map(|g| solver.solve(g).unwrap()).collect_vec();
    let parallel = thread::scope(|s| {
        let handles = games.iter().map(|g| s.spawn(move || solver.solve(g).unwrap())).collect_vec();
        handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
    });

    assert_eq!(sequential, parallel);
}
