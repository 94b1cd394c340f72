//! Small progress measures, in the progressive flavour that tracks the measures of both
//! players at once and shrinks the coordinate bounds as vertices get decided.

mod measure;


use std::collections::VecDeque;
use std::iter;

use either::Either::{Left, Right};

use crate::error::Result;
use crate::graph::{ParityGraph, Player, VertexId};
use crate::index::IndexedVec;
use crate::solution::{Regions, RsSolution, Strategies};
use crate::solver::Solver;

use self::measure::{copy, Counts, Measures};

#[derive(Clone, Debug)]
pub struct ProgressMeasuresSolver {
    /// Run a stabilization pass after every `n * |V|` successful lifts. `None` never runs one.
    pub stabilize_every: Option<usize>,
}

impl Default for ProgressMeasuresSolver {
    fn default() -> Self {
        Self { stabilize_every: Some(10) }
    }
}

impl ProgressMeasuresSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_stabilization() -> Self {
        Self { stabilize_every: None }
    }
}

impl<G: ParityGraph> Solver<G> for ProgressMeasuresSolver {
    type Solution = RsSolution;

    fn solve(&self, graph: &G) -> Result<RsSolution> {
        tracing::debug!(target: "spm", vertices = graph.vertex_count(), "solving");

        let mut lifter = Lifter::new(graph);
        lifter.run(self.stabilize_every);
        Ok(lifter.into_solution())
    }

    fn name(&self) -> &'static str {
        "Progressive Small Progress Measures"
    }
}

/// State of one run, dropped when the run ends.
struct Lifter<'a, G> {
    graph: &'a G,

    pms: Measures,
    counts: Counts,
    /// Best successor for the owner, with respect to the opponent's measure.
    strategy: IndexedVec<VertexId, Option<VertexId>>,

    tmp: Vec<usize>,
    best: Vec<usize>,

    todo: VecDeque<VertexId>,
    dirty: IndexedVec<VertexId, bool>,
    unstable: IndexedVec<VertexId, bool>,

    lifts: u64,
    lift_attempts: u64,
}

impl<'a, G: ParityGraph> Lifter<'a, G> {
    fn new(graph: &'a G) -> Self {
        let n = graph.vertex_count();
        let k = graph.max_priority().map_or(0, |d| d + 1).max(2);

        let mut counts = Counts::new(k);
        for v in graph.vertices() {
            counts.add(graph.priority_of(v));
        }

        Self {
            graph,
            pms: Measures::new(n, k),
            counts,
            strategy: IndexedVec::repeat(None, n),
            tmp: vec![0; k],
            best: vec![0; k],
            todo: VecDeque::new(),
            dirty: IndexedVec::repeat(false, n),
            unstable: IndexedVec::repeat(false, n),
            lifts: 0,
            lift_attempts: 0,
        }
    }

    fn run(&mut self, stabilize_every: Option<usize>) {
        let graph = self.graph;

        for v in graph.vertices().rev() {
            if self.lift(v, None) {
                for u in graph.predecessors_of(v) {
                    if self.lift(u, Some(v)) {
                        self.push(u);
                    }
                }
            }
        }

        let interval = stabilize_every.map(|c| c.saturating_mul(graph.vertex_count()) as u64);
        let mut last_stabilize = 0;

        while let Some(v) = self.pop() {
            for u in graph.predecessors_of(v) {
                if self.lift(u, Some(v)) {
                    self.push(u);
                }
            }

            if let Some(interval) = interval {
                if last_stabilize + interval < self.lifts {
                    last_stabilize = self.lifts;
                    self.stabilize(Player::P0);
                    self.stabilize(Player::P1);
                }
            }
        }
    }

    fn into_solution(self) -> RsSolution {
        let graph = self.graph;
        let mut solution = RsSolution::new();

        for v in graph.vertices() {
            debug_assert_ne!(self.pms.is_top(v, Player::P0), self.pms.is_top(v, Player::P1));

            let winner = if self.pms.is_top(v, Player::P0) { Player::P0 } else { Player::P1 };
            solution.set_winner(v, winner);

            if graph.player_of(v) == winner {
                if let Some(w) = self.strategy[v] {
                    solution.set_strategy(v, w);
                }
            }
        }

        solution.statistics.set("lifts", self.lifts);
        solution.statistics.set("lift_attempts", self.lift_attempts);

        tracing::debug!(
            target: "spm",
            won_by_p0 = solution.regions.region(Player::P0).count(),
            won_by_p1 = solution.regions.region(Player::P1).count(),
            lifts = self.lifts,
            "solved"
        );

        solution
    }

    fn push(&mut self, v: VertexId) {
        if !self.dirty[v] {
            self.dirty[v] = true;
            self.todo.push_back(v);
        }
    }

    fn pop(&mut self) -> Option<VertexId> {
        let v = self.todo.pop_front()?;
        self.dirty[v] = false;
        Some(v)
    }

    /// Raises the measures of `v` to what its successors (or only `target`, the one that just
    /// changed) require. Returns whether any of the two measures changed.
    fn lift(&mut self, v: VertexId, target: Option<VertexId>) -> bool {
        if self.pms.is_top(v, Player::P0) && self.pms.is_top(v, Player::P1) {
            return false;
        }

        let graph = self.graph;
        let owner = graph.player_of(v);
        let opponent = owner.opponent();
        let d = graph.priority_of(v);

        let mut changed = [None; 2];

        // The owner raises its own measure as soon as a single successor allows it.
        if !self.pms.is_top(v, owner) {
            let succs = match target {
                Some(t) => Left(iter::once(t)),
                None => Right(graph.successors_of(v)),
            };

            for w in succs {
                self.counts.prog(&mut self.tmp, self.pms.get(w), d, owner);
                if self.counts.less(self.pms.get(v), &self.tmp, d, owner) {
                    copy(self.pms.get_mut(v), &self.tmp, owner);
                    changed[owner.index()] = Some(w);
                }
            }
        }

        // The opponent's measure follows the least successor, which only moves if it was the
        // one that changed.
        if !self.pms.is_top(v, opponent) && (target.is_none() || target == self.strategy[v]) {
            let mut best_to = None;
            for w in graph.successors_of(v) {
                self.counts.prog(&mut self.tmp, self.pms.get(w), d, opponent);
                if best_to.is_none() || self.counts.less(&self.tmp, &self.best, d, opponent) {
                    self.best.copy_from_slice(&self.tmp);
                    best_to = Some(w);
                }
            }

            self.strategy[v] = best_to;

            if self.counts.less(self.pms.get(v), &self.best, d, opponent) {
                copy(self.pms.get_mut(v), &self.best, opponent);
                changed[opponent.index()] = best_to;
            }
        }

        for pl in [Player::P0, Player::P1] {
            if changed[pl.index()].is_some()
                && self.pms.is_top(v, pl)
                && Player::of_priority(d) == pl
            {
                self.counts.retire(d);
            }
        }

        if changed.iter().any(Option::is_some) {
            self.lifts += 1;
            true
        } else {
            self.lift_attempts += 1;
            false
        }
    }

    /// Whether `pl`'s measure of `v` is below what its successors require.
    fn can_lift(&mut self, v: VertexId, pl: Player) -> bool {
        if self.pms.is_top(v, pl) {
            return false;
        }

        let graph = self.graph;
        let d = graph.priority_of(v);

        if graph.player_of(v) == pl {
            for w in graph.successors_of(v) {
                self.counts.prog(&mut self.tmp, self.pms.get(w), d, pl);
                if self.counts.less(self.pms.get(v), &self.tmp, d, pl) {
                    return true;
                }
            }
            false
        } else {
            let mut best_to = None;
            for w in graph.successors_of(v) {
                self.counts.prog(&mut self.tmp, self.pms.get(w), d, pl);
                if best_to.is_none() || self.counts.less(&self.tmp, &self.best, d, pl) {
                    self.best.copy_from_slice(&self.tmp);
                    best_to = Some(w);
                }
            }
            best_to.is_some() && self.counts.less(self.pms.get(v), &self.best, d, pl)
        }
    }

    /// Whether the opponent of `pl`, moving from `v`, has a successor outside the unstable set
    /// whose measure already justifies the one of `v`.
    fn is_held(&mut self, v: VertexId, pl: Player) -> bool {
        let graph = self.graph;
        let d = graph.priority_of(v);

        let mut best_to = None;
        for w in graph.successors_of(v) {
            if self.unstable[w] {
                continue;
            }
            self.counts.prog(&mut self.tmp, self.pms.get(w), d, pl);
            if best_to.is_none() || self.counts.less(&self.tmp, &self.best, d, pl) {
                self.best.copy_from_slice(&self.tmp);
                best_to = Some(w);
            }
        }

        best_to.is_some() && !self.counts.less(self.pms.get(v), &self.best, d, pl)
    }

    /// Finds the vertices where `pl`'s measure can never change again and gives them to the
    /// opponent right away.
    ///
    /// A vertex is unstable if its measure is saturated or can be lifted, if `pl` owns it and
    /// can move to an unstable vertex, or if the opponent owns it and cannot stay among stable
    /// vertices. Everything else is a trap for `pl` with a finite measure, hence won by the
    /// opponent.
    fn stabilize(&mut self, pl: Player) {
        let graph = self.graph;
        let opponent = pl.opponent();

        let mut queue = VecDeque::new();
        for v in graph.vertices() {
            let unstable = self.pms.is_top(v, pl) || self.can_lift(v, pl);
            self.unstable[v] = unstable;
            if unstable {
                queue.push_back(v);
            }
        }

        while let Some(v) = queue.pop_front() {
            for u in graph.predecessors_of(v) {
                if self.unstable[u] || (graph.player_of(u) != pl && self.is_held(u, pl)) {
                    continue;
                }
                self.unstable[u] = true;
                queue.push_back(u);
            }
        }

        let mut retired = 0;
        for v in graph.vertices() {
            if self.unstable[v] || self.pms.is_top(v, opponent) {
                continue;
            }

            let d = graph.priority_of(v);
            if Player::of_priority(d) == opponent {
                self.counts.retire(d);
            }
            self.pms.set_top(v, opponent);
            self.push(v);
            retired += 1;
        }

        tracing::trace!(target: "spm", ?pl, retired, lifts = self.lifts, "stabilized");
    }
}
