//! # Puzzlebench-Core: Reasoning Benchmark Engine
//!
//! This crate is the evaluation and scoring pipeline of a reasoning
//! benchmark over combinatorial puzzle games. It generates puzzle
//! instances through a uniform game contract, drives an agent (the
//! built-in hint solver or an external strategy) through seeded,
//! deterministic episodes, captures per-step behavioral telemetry, and
//! aggregates everything into a single bounded score, the *Reasoning
//! Score*, comparing agents across four cognitive families: deductive
//! logic, constraint interaction, feedback search, and sequential
//! planning.
//!
//! Game rule code lives outside this crate: each game is a black box
//! implementing [`puzzle::PuzzleGame`] and registered with a
//! [`harness::GameCatalog`]. The core never interprets move arguments and
//! never calls a random primitive: all nondeterminism flows through the
//! injected seed.
//!
//! ## Quick Example
//!
//! ```no_run
//! use puzzlebench_core::harness::{EvaluationOptions, GameCatalog};
//! use puzzlebench_core::models::{Difficulty, SolverConfig};
//! # use puzzlebench_core::puzzle::{GameError, Hint, MoveOutcome, PuzzleGame};
//! # struct MySudoku;
//! # impl PuzzleGame for MySudoku {
//! #     fn game_id(&self) -> &str { "sudoku" }
//! #     fn generate(&mut self) -> Result<(), GameError> { Ok(()) }
//! #     fn validate_move(&mut self, _action: &str) -> MoveOutcome {
//! #         MoveOutcome::Accepted { advances: true, overwrites_filled_cell: false }
//! #     }
//! #     fn is_complete(&self) -> bool { true }
//! #     fn get_hint(&self) -> Option<Hint> { None }
//! #     fn remaining_work(&self) -> u64 { 0 }
//! #     fn optimal_steps(&self) -> Option<u64> { None }
//! #     fn render(&self) -> String { String::new() }
//! # }
//!
//! let mut catalog = GameCatalog::new();
//! catalog.register("sudoku", Box::new(|_difficulty, _seed| Box::new(MySudoku)));
//!
//! let options = EvaluationOptions {
//!     difficulty: Difficulty::Easy,
//!     episodes: 5,
//!     solver: SolverConfig::default(),
//!     ..Default::default()
//! };
//!
//! match catalog.evaluate_many(&["sudoku"], &options) {
//!     Ok(result) => {
//!         println!("Reasoning Score: {:.1}", result.reasoning_score());
//!         println!("Coverage: {:.0}%", result.coverage() * 100.0);
//!         println!("{}", serde_json::to_string_pretty(&result.to_document()).unwrap());
//!     }
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`puzzle`]: the contract every game satisfies
//! - [`trace`] / [`metrics`]: per-episode telemetry and its frozen view
//! - [`engine`]: seeded, time-bounded episode execution
//! - [`harness`]: N-episode evaluation and benchmark assembly
//! - [`families`]: the static 30-game / 4-family registry
//! - [`scoring`]: weighted episode scores and the aggregation chain

pub mod engine;
pub mod families;
pub mod harness;
pub mod metrics;
pub mod models;
pub mod puzzle;
pub mod scoring;
pub mod trace;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::agent::{AgentContext, AgentDecision, AgentStrategy, HintAgent};
pub use engine::{run_episode, CancelToken, EpisodeOptions};
pub use harness::{EvaluationOptions, GameCatalog, HarnessError};
pub use models::{BenchmarkResult, Difficulty, EpisodeResult, EpisodeStatus, SolverConfig};
pub use puzzle::{GameFactory, PuzzleGame};
