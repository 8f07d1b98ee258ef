//! Static reasoning-family registry.
//!
//! Groups the 30 benchmark games into 4 reasoning families based on the
//! dominant cognitive skill each puzzle exercises. The registry is a
//! constant table: it is the only process-lifetime shared resource in the
//! core, and it is read-only.

use serde::{Deserialize, Serialize};

/// One of the four reasoning categories partitioning the game set.
///
/// `Unknown` tags games outside the declared registry; they still run and
/// appear in flat game lists, but are excluded from every family average.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Deductive logic puzzles.
    Logic,
    /// Constraint-interaction puzzles.
    Constraint,
    /// Feedback-driven search puzzles.
    Search,
    /// Sequential planning puzzles.
    Planning,
    /// Not in the declared registry.
    Unknown,
}

impl Family {
    /// The four families that appear in benchmark reports, in declared
    /// order.
    pub const REPORTED: [Family; 4] = [
        Family::Logic,
        Family::Constraint,
        Family::Search,
        Family::Planning,
    ];
}

/// Total number of games in the declared registry.
pub const TOTAL_GAMES: usize = 30;

static LOGIC_GAMES: &[&str] = &[
    "sudoku",
    "binary",
    "futoshiki",
    "nonogram",
    "logic",
    "skyscrapers",
    "nqueens",
    "graph_coloring",
    "cryptarithmetic",
    "hitori",
];

static CONSTRAINT_GAMES: &[&str] = &[
    "kenken",
    "kakuro",
    "killer",
    "slither",
    "bridges",
    "nurikabe",
    "fillomino",
    "shikaku",
    "hidato",
    "star_battle",
    "tents",
    "einstein",
];

static SEARCH_GAMES: &[&str] = &["mastermind", "minesweeper", "numberlink", "lights"];

static PLANNING_GAMES: &[&str] = &["sokoban", "rush_hour", "knapsack", "scheduler"];

/// Returns the reasoning family for a game, or [`Family::Unknown`] if the
/// game is not in the declared registry.
pub fn family_of(game_id: &str) -> Family {
    for family in Family::REPORTED {
        if games_in(family).iter().any(|&declared| declared == game_id) {
            return family;
        }
    }
    Family::Unknown
}

/// Returns the declared game list for a family, in registry order.
pub fn games_in(family: Family) -> &'static [&'static str] {
    match family {
        Family::Logic => LOGIC_GAMES,
        Family::Constraint => CONSTRAINT_GAMES,
        Family::Search => SEARCH_GAMES,
        Family::Planning => PLANNING_GAMES,
        Family::Unknown => &[],
    }
}

/// Iterates over every declared game id, family by family.
pub fn all_games() -> impl Iterator<Item = &'static str> {
    Family::REPORTED
        .into_iter()
        .flat_map(|family| games_in(family).iter().copied())
}
