use crate::error::Result;

/// A complete solving algorithm for games of type `G`.
///
/// Solving is a pure function of the graph and its vertex order: all working state lives in
/// the call, so a solver can be shared between threads and reused freely.
pub trait Solver<G> {
    type Solution;

    fn solve(&self, graph: &G) -> Result<Self::Solution>;

    fn name(&self) -> &'static str;
}
