//! The uniform contract every puzzle game satisfies.
//!
//! Game rule code lives outside the core and is reached only through the
//! [`PuzzleGame`] trait: a narrow capability set, not a class hierarchy.
//! The core never interprets move arguments (actions are opaque strings
//! that each game parses itself), and each game owns its seeded random
//! state, so all nondeterminism flows through the injected seed.

use thiserror::Error;

use crate::families::{family_of, Family};
use crate::models::Difficulty;

/// Errors a game can signal through the puzzle contract.
#[derive(Error, Debug)]
pub enum GameError {
    /// The game's internal generator could not build a puzzle instance for
    /// this `(difficulty, seed)` pair.
    #[error("puzzle generation failed: {0}")]
    GenerationFailed(String),
}

/// Outcome of submitting one action to a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied.
    Accepted {
        /// Whether the move reduced the game's remaining work.
        advances: bool,
        /// Whether the move overwrote a previously filled state cell with a
        /// different value, i.e. a backtrack.
        overwrites_filled_cell: bool,
    },
    /// The move was rejected; observable state is unchanged.
    Rejected {
        /// Game-supplied reason, recorded for diagnostics only.
        reason: String,
    },
}

impl MoveOutcome {
    /// Whether the move was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }
}

/// A progressive hint produced by a game's internal solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// The action to submit, in the game's own action syntax. The contract
    /// only requires that `validate_move` accepts what `get_hint` returns.
    pub action: String,
    /// Human-readable explanation of the hint.
    pub text: String,
}

/// The contract every game obeys.
///
/// A game is a stateful object parameterized by `(difficulty, seed)`.
/// [`generate`](PuzzleGame::generate) is the only entry that mutates puzzle
/// identity; after it, identity is frozen and
/// [`validate_move`](PuzzleGame::validate_move) is the only state-mutating
/// operation. Two instances built from the same `(difficulty, seed)` pair
/// must be byte-identical in their initial observable state.
///
/// Every instance is owned by exactly one episode and dropped at episode
/// end.
pub trait PuzzleGame {
    /// Stable identifier for this game (e.g., `"sudoku"`).
    fn game_id(&self) -> &str;

    /// Builds the puzzle instance deterministically from the construction
    /// parameters.
    fn generate(&mut self) -> Result<(), GameError>;

    /// Validates and, if accepted, applies one opaque action. A rejected
    /// move must leave observable state unchanged.
    fn validate_move(&mut self, action: &str) -> MoveOutcome;

    /// True exactly when the puzzle is solved.
    fn is_complete(&self) -> bool;

    /// Returns the next progressive hint, or `None` when the puzzle is
    /// solved or the game's internal solver cannot derive one. Must not
    /// mutate game state.
    fn get_hint(&self) -> Option<Hint>;

    /// Non-negative count of observable units still to resolve (cells,
    /// pairs, edges, moves; game-specific). This is the distance-to-goal
    /// signal for the progress metrics.
    fn remaining_work(&self) -> u64;

    /// Best-known minimum successful-move count to solution for this
    /// seed/difficulty, or `None` if the game cannot compute it.
    fn optimal_steps(&self) -> Option<u64>;

    /// Static reasoning-family classification.
    fn family_tag(&self) -> Family {
        family_of(self.game_id())
    }

    /// Renders the current observable state for external agents and trace
    /// streams.
    fn render(&self) -> String;
}

/// Constructor for puzzle instances, keyed by `(difficulty, seed)`.
pub type GameFactory = Box<dyn Fn(Difficulty, u64) -> Box<dyn PuzzleGame> + Send + Sync>;
