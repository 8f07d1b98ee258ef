//! Evaluation harness: runs batches of episodes and aggregates reports.
//!
//! The harness owns a registry of game factories and exposes the three
//! caller-facing operations: one episode, one game (N episodes), or a full
//! benchmark over many games. Per-episode errors never escape (they are
//! reified into `EpisodeResult` fields), and only configuration errors
//! (unknown game, invalid options) surface to the caller.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::engine::agent::{AgentStrategy, HintAgent};
use crate::engine::{run_episode, CancelToken, EpisodeOptions};
use crate::families::family_of;
use crate::models::{
    BenchmarkResult, Difficulty, EpisodeLimits, EpisodeResult, GameReport, SolverConfig,
};
use crate::puzzle::GameFactory;
use crate::scoring::build_benchmark_result;

/// Errors visible at the harness boundary.
///
/// These are configuration errors, rejected synchronously before any
/// episode runs; everything that happens inside an episode is reported
/// through the episode's own result.
#[derive(Error, Debug, Serialize)]
pub enum HarnessError {
    /// The requested game id has no registered factory.
    #[error("unknown game: {0}")]
    UnknownGame(String),
    /// The evaluation options are contradictory or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Batch-evaluation options shared by every episode of a run.
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Difficulty level for every episode.
    pub difficulty: Difficulty,
    /// Episode count per game when `seeds` is not supplied.
    pub episodes: u32,
    /// Explicit seed list; overrides `episodes` when present.
    pub seeds: Option<Vec<u64>>,
    /// Hint/solver configuration.
    pub solver: SolverConfig,
    /// Per-episode move and wall-clock limits.
    pub limits: EpisodeLimits,
    /// Whether episodes retain step-level move records.
    pub record_move_history: bool,
    /// Cancellation token shared by every episode of the run. Episodes
    /// that were already complete when the token fires are preserved;
    /// the rest come back as `Abandoned`.
    pub cancel: CancelToken,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        EvaluationOptions {
            difficulty: Difficulty::default(),
            episodes: 5,
            seeds: None,
            solver: SolverConfig::default(),
            limits: EpisodeLimits::default(),
            record_move_history: false,
            cancel: CancelToken::new(),
        }
    }
}

impl EvaluationOptions {
    /// Seeds for one game's episodes: the explicit list, or `42 + i` for
    /// reproducibility when none was supplied.
    fn seed_plan(&self) -> Vec<u64> {
        match &self.seeds {
            Some(seeds) => seeds.clone(),
            None => (0..u64::from(self.episodes)).map(|i| 42 + i).collect(),
        }
    }

    fn episode_options(&self) -> EpisodeOptions {
        EpisodeOptions {
            solver: self.solver.clone(),
            limits: self.limits.clone(),
            record_move_history: self.record_move_history,
            cancel: self.cancel.clone(),
        }
    }

    fn validate(&self) -> Result<(), HarnessError> {
        match &self.seeds {
            Some(seeds) if seeds.is_empty() => Err(HarnessError::InvalidConfiguration(
                "explicit seed list is empty".to_string(),
            )),
            None if self.episodes == 0 => Err(HarnessError::InvalidConfiguration(
                "episodes must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Registry of game factories, keyed by game id.
///
/// Game rule code lives outside the core; callers register a factory per
/// game id and the harness drives instances through the puzzle contract.
///
/// # Example
///
/// ```no_run
/// use puzzlebench_core::harness::{EvaluationOptions, GameCatalog};
/// use puzzlebench_core::models::Difficulty;
/// # use puzzlebench_core::puzzle::{GameError, Hint, MoveOutcome, PuzzleGame};
/// # struct Demo;
/// # impl PuzzleGame for Demo {
/// #     fn game_id(&self) -> &str { "sudoku" }
/// #     fn generate(&mut self) -> Result<(), GameError> { Ok(()) }
/// #     fn validate_move(&mut self, _action: &str) -> MoveOutcome {
/// #         MoveOutcome::Rejected { reason: String::new() }
/// #     }
/// #     fn is_complete(&self) -> bool { true }
/// #     fn get_hint(&self) -> Option<Hint> { None }
/// #     fn remaining_work(&self) -> u64 { 0 }
/// #     fn optimal_steps(&self) -> Option<u64> { None }
/// #     fn render(&self) -> String { String::new() }
/// # }
///
/// let mut catalog = GameCatalog::new();
/// catalog.register("sudoku", Box::new(|_difficulty, _seed| Box::new(Demo)));
///
/// let options = EvaluationOptions {
///     difficulty: Difficulty::Easy,
///     episodes: 5,
///     ..Default::default()
/// };
/// let result = catalog.evaluate_many(&["sudoku"], &options).unwrap();
/// println!("Reasoning Score: {:.1}", result.reasoning_score());
/// ```
#[derive(Default)]
pub struct GameCatalog {
    factories: BTreeMap<String, GameFactory>,
}

impl GameCatalog {
    pub fn new() -> Self {
        GameCatalog {
            factories: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) the factory for a game id.
    pub fn register(&mut self, game_id: impl Into<String>, factory: GameFactory) {
        self.factories.insert(game_id.into(), factory);
    }

    /// Whether a factory is registered under this id.
    pub fn contains(&self, game_id: &str) -> bool {
        self.factories.contains_key(game_id)
    }

    /// Registered game ids, in sorted order.
    pub fn game_ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    fn factory(&self, game_id: &str) -> Result<&GameFactory, HarnessError> {
        self.factories
            .get(game_id)
            .ok_or_else(|| HarnessError::UnknownGame(game_id.to_string()))
    }

    /// Runs a single episode with the built-in hint agent.
    pub fn run_episode(
        &self,
        game_id: &str,
        difficulty: Difficulty,
        seed: u64,
        solver: &SolverConfig,
        limits: &EpisodeLimits,
    ) -> Result<EpisodeResult, HarnessError> {
        let factory = self.factory(game_id)?;
        let options = EpisodeOptions {
            solver: solver.clone(),
            limits: limits.clone(),
            record_move_history: false,
            cancel: CancelToken::new(),
        };
        let mut agent = HintAgent;
        Ok(run_episode(
            factory, difficulty, seed, &mut agent, &options, None,
        ))
    }

    /// Runs N episodes of one game with the built-in hint agent and
    /// aggregates them into a [`GameReport`].
    pub fn evaluate_game(
        &self,
        game_id: &str,
        options: &EvaluationOptions,
    ) -> Result<GameReport, HarnessError> {
        self.evaluate_game_with(game_id, options, &mut || Box::new(HintAgent))
    }

    /// Runs N episodes of one game with a caller-supplied agent strategy
    /// (one fresh agent per episode).
    pub fn evaluate_game_with(
        &self,
        game_id: &str,
        options: &EvaluationOptions,
        make_agent: &mut dyn FnMut() -> Box<dyn AgentStrategy>,
    ) -> Result<GameReport, HarnessError> {
        let factory = self.factory(game_id)?;
        options.validate()?;

        let seeds = options.seed_plan();
        let total = seeds.len();
        let episode_options = options.episode_options();
        let mut episodes = Vec::with_capacity(total);
        for (index, seed) in seeds.into_iter().enumerate() {
            log::debug!("evaluating {game_id} episode {}/{total} (seed={seed})", index + 1);
            let mut agent = make_agent();
            let result = run_episode(
                factory,
                options.difficulty,
                seed,
                agent.as_mut(),
                &episode_options,
                None,
            );
            episodes.push(result);
        }

        Ok(GameReport {
            game_id: game_id.to_string(),
            family: family_of(game_id),
            difficulty: options.difficulty,
            episodes,
        })
    }

    /// Evaluates many games and aggregates everything into a
    /// [`BenchmarkResult`].
    ///
    /// Unknown game ids are rejected up front, before any episode runs.
    pub fn evaluate_many(
        &self,
        game_ids: &[&str],
        options: &EvaluationOptions,
    ) -> Result<BenchmarkResult, HarnessError> {
        for game_id in game_ids {
            if !self.contains(game_id) {
                return Err(HarnessError::UnknownGame(game_id.to_string()));
            }
        }
        options.validate()?;

        let mut reports = Vec::with_capacity(game_ids.len());
        for game_id in game_ids {
            reports.push(self.evaluate_game(game_id, options)?);
        }

        let episodes_per_game = options
            .seeds
            .as_ref()
            .map(|seeds| seeds.len() as u32)
            .unwrap_or(options.episodes);
        Ok(build_benchmark_result(
            reports,
            options.difficulty,
            episodes_per_game,
            &options.solver.describe(),
        ))
    }

    /// Evaluates every registered game, in sorted id order.
    pub fn evaluate_all(
        &self,
        options: &EvaluationOptions,
    ) -> Result<BenchmarkResult, HarnessError> {
        let game_ids: Vec<&str> = self.game_ids().collect();
        self.evaluate_many(&game_ids, options)
    }
}
