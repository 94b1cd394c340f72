use chumsky::error::Simple;
use chumsky::primitive::{choice, end, just, none_of};
use chumsky::text::TextParser;
use chumsky::{text, Parser};
use pg_solver::graph::Player;

use crate::{Node, ParsedGame};

fn number() -> impl Parser<char, usize, Error = Simple<char>> + Clone {
    text::int(10)
        .try_map(|n: String, span| n.parse::<usize>().map_err(|e| Simple::custom(span, e)))
        .padded()
}

fn player() -> impl Parser<char, Player, Error = Simple<char>> + Clone {
    choice((just('0').to(Player::P0), just('1').to(Player::P1)))
}

/// Parses a game in the PGSolver format:
///
/// ```text
/// parity <max id>;
/// [start <id>;]
/// <id> <priority> <owner> <succ>,<succ>,... ["name"];
/// ```
pub fn parse_parity_game(source: &str) -> Result<ParsedGame, Vec<Simple<char>>> {
    let parity = just("parity").padded();
    let start = just("start").padded();
    let comma = just(',').padded();
    let semi = just(';');
    let newline = text::newline();

    let header = parity.then(number()).then(semi).then(newline);
    let start = start.then(number()).then(semi).then(newline).or_not();

    let successors = number().separated_by(comma).at_least(1);
    let name = none_of("\"").repeated().collect::<String>().delimited_by(just('"'), just('"'));
    let comment = none_of(";").repeated();
    let row = number()
        .then(number())
        .then(player())
        .then(successors)
        .then(name.padded().or_not())
        .then_ignore(comment);
    let row = row.map(|((((id, priority), player), successors), name)| Node {
        id,
        priority,
        player,
        successors,
        name,
    });

    let rows = row.then_ignore(semi).separated_by(newline).allow_trailing();
    let game = header
        .ignore_then(start)
        .ignore_then(rows)
        .then_ignore(text::whitespace())
        .then_ignore(end())
        .map(|nodes| ParsedGame { nodes });

    game.parse(source)
}

/// Parses a solution in the PGSolver format, `paritysol <max id>;` followed by
/// `<id> <winner> [<successor>];` rows.
pub fn parse_parity_sol(source: &str) -> Result<Vec<(usize, Player, Option<usize>)>, Vec<Simple<char>>> {
    let paritysol = just("paritysol").padded();
    let semi = just(';');
    let newline = text::newline();

    let header = paritysol.then(number()).then(semi).then(newline);

    let row = number().then(player()).then(number().or_not());
    let row = row.map(|((id, winner), successor)| (id, winner, successor));

    let rows = row.then_ignore(semi).separated_by(newline).allow_trailing();
    let sol = header.ignore_then(rows).then_ignore(text::whitespace()).then_ignore(end());

    sol.parse(source)
}
