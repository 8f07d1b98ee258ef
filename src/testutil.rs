//! Shared in-crate test fixtures: a deterministic synthetic game and a
//! scripted agent.

use crate::engine::agent::{AgentContext, AgentDecision, AgentStrategy};
use crate::models::Difficulty;
use crate::puzzle::{GameError, GameFactory, Hint, MoveOutcome, PuzzleGame};

/// A deterministic fill-the-sequence puzzle for driving the engine.
///
/// The instance has N cells (N depends on difficulty); each must be set to
/// a target value derived from the seed. Actions use the syntax
/// `set <index> <value>` with values 1-9. Setting an already-filled cell to
/// a different value is accepted and counts as a backtrack.
pub struct SequenceGame {
    game_id: String,
    difficulty: Difficulty,
    seed: u64,
    cells: Vec<Option<u8>>,
    target: Vec<u8>,
    generated: bool,
    fail_generation: bool,
}

impl SequenceGame {
    pub fn new(game_id: &str, difficulty: Difficulty, seed: u64) -> Self {
        SequenceGame {
            game_id: game_id.to_string(),
            difficulty,
            seed,
            cells: Vec::new(),
            target: Vec::new(),
            generated: false,
            fail_generation: false,
        }
    }

    /// A variant whose generator always fails.
    pub fn failing(game_id: &str, difficulty: Difficulty, seed: u64) -> Self {
        let mut game = SequenceGame::new(game_id, difficulty, seed);
        game.fail_generation = true;
        game
    }

    pub fn len(difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 20,
        }
    }
}

impl PuzzleGame for SequenceGame {
    fn game_id(&self) -> &str {
        &self.game_id
    }

    fn generate(&mut self) -> Result<(), GameError> {
        if self.fail_generation {
            return Err(GameError::GenerationFailed(
                "no solvable instance for this seed".to_string(),
            ));
        }
        let len = SequenceGame::len(self.difficulty);
        self.target = (0..len)
            .map(|i| ((self.seed + i as u64) % 9 + 1) as u8)
            .collect();
        self.cells = vec![None; len];
        self.generated = true;
        Ok(())
    }

    fn validate_move(&mut self, action: &str) -> MoveOutcome {
        let mut parts = action.split_whitespace();
        let (verb, index, value) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(verb), Some(index), Some(value), None) => (verb, index, value),
            _ => {
                return MoveOutcome::Rejected {
                    reason: "expected: set <index> <value>".to_string(),
                }
            }
        };
        if verb != "set" {
            return MoveOutcome::Rejected {
                reason: format!("unknown command: {verb}"),
            };
        }
        let index: usize = match index.parse() {
            Ok(index) if index < self.cells.len() => index,
            _ => {
                return MoveOutcome::Rejected {
                    reason: "index out of range".to_string(),
                }
            }
        };
        let value: u8 = match value.parse() {
            Ok(value) if (1..=9).contains(&value) => value,
            _ => {
                return MoveOutcome::Rejected {
                    reason: "value out of range".to_string(),
                }
            }
        };
        let previous = self.cells[index];
        let overwrites_filled_cell = matches!(previous, Some(old) if old != value);
        let advances = value == self.target[index] && previous != Some(value);
        self.cells[index] = Some(value);
        MoveOutcome::Accepted {
            advances,
            overwrites_filled_cell,
        }
    }

    fn is_complete(&self) -> bool {
        self.generated && self.remaining_work() == 0
    }

    fn get_hint(&self) -> Option<Hint> {
        let (index, &value) = self
            .target
            .iter()
            .enumerate()
            .find(|(i, &value)| self.cells[*i] != Some(value))?;
        Some(Hint {
            action: format!("set {index} {value}"),
            text: format!("cell {index} should be {value}"),
        })
    }

    fn remaining_work(&self) -> u64 {
        self.target
            .iter()
            .enumerate()
            .filter(|(i, &value)| self.cells[*i] != Some(value))
            .count() as u64
    }

    fn optimal_steps(&self) -> Option<u64> {
        Some(self.target.len() as u64)
    }

    fn render(&self) -> String {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(value) => char::from(b'0' + value),
                None => '.',
            })
            .collect()
    }
}

/// Factory for [`SequenceGame`] registered under `game_id`.
pub fn sequence_factory(game_id: &'static str) -> GameFactory {
    Box::new(move |difficulty, seed| Box::new(SequenceGame::new(game_id, difficulty, seed)))
}

/// Factory whose games always fail generation.
pub fn failing_factory(game_id: &'static str) -> GameFactory {
    Box::new(move |difficulty, seed| Box::new(SequenceGame::failing(game_id, difficulty, seed)))
}

/// An external agent that replays a fixed list of actions, then gives up.
pub struct ScriptedAgent {
    actions: Vec<String>,
    position: usize,
}

impl ScriptedAgent {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedAgent {
            actions: actions.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }
}

impl AgentStrategy for ScriptedAgent {
    fn propose(&mut self, _game: &dyn PuzzleGame, _ctx: &AgentContext) -> AgentDecision {
        let action = match self.actions.get(self.position) {
            Some(action) => action.clone(),
            None => return AgentDecision::GiveUp,
        };
        self.position += 1;
        AgentDecision::Action {
            action,
            from_hint: false,
        }
    }
}
