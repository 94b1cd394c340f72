pub mod attractor;
mod error;
pub mod graph;
pub mod index;
pub mod recursive;
pub mod solution;
mod solver;
pub mod spm;

#[cfg(test)]
mod test;

pub use error::{Error, InvalidGraph, Result};
pub use solver::Solver;

pub type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
