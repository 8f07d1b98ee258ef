//! Agent strategies that drive the episode move loop.
//!
//! The engine is agnostic to where actions come from: a strategy receives
//! the game (read-only) and a small context snapshot, and returns either an
//! opaque action or a give-up signal. The built-in strategy proxies the
//! game's own progressive hints; external agents plug in through the same
//! trait using the rendered observation.

use crate::puzzle::PuzzleGame;

/// Context snapshot handed to the agent before each proposal.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext {
    /// Valid moves made so far.
    pub steps: u64,
    /// Invalid attempts so far.
    pub invalid: u64,
    /// Hint-derived actions still allowed by the episode's solver config.
    /// Zero in solver-free mode.
    pub hints_remaining: u32,
}

/// One proposal from an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    /// Submit this action to the game.
    Action {
        /// Opaque action string in the game's own syntax.
        action: String,
        /// Whether the action was derived from the game's internal solver.
        from_hint: bool,
    },
    /// The agent cannot (or will not) continue; the episode fails.
    GiveUp,
}

/// A pluggable source of actions for the episode engine.
pub trait AgentStrategy {
    /// Proposes the next action. The game reference is read-only; only the
    /// engine applies moves.
    fn propose(&mut self, game: &dyn PuzzleGame, ctx: &AgentContext) -> AgentDecision;
}

/// The built-in hint-driven solver agent.
///
/// Proxies [`PuzzleGame::get_hint`], giving up when the hint budget is
/// exhausted or the game cannot derive a further hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintAgent;

impl AgentStrategy for HintAgent {
    fn propose(&mut self, game: &dyn PuzzleGame, ctx: &AgentContext) -> AgentDecision {
        if ctx.hints_remaining == 0 {
            return AgentDecision::GiveUp;
        }
        match game.get_hint() {
            Some(hint) => AgentDecision::Action {
                action: hint.action,
                from_hint: true,
            },
            None => AgentDecision::GiveUp,
        }
    }
}
