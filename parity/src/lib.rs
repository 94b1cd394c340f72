mod conv;
mod parser;
mod sol;


pub use conv::to_game;
pub use parser::{parse_parity_game, parse_parity_sol};
pub use sol::write_parity_sol;

use pg_solver::graph::Player;

#[derive(Debug)]
pub struct Node {
    pub id: usize,
    pub priority: usize,
    pub player: Player,
    pub successors: Vec<usize>,
    pub name: Option<String>,
}

/// A game as written in the file, before ids are resolved.
#[derive(Debug)]
pub struct ParsedGame {
    pub nodes: Vec<Node>,
}
