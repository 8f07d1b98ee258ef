//! Data models and types for the benchmark core API.
//!
//! This module contains the public data structures that flow across the
//! evaluation pipeline: episode configuration, per-episode results, and the
//! aggregated game/family/benchmark reports. The API is designed to be
//! serializable (JSON) for easy integration with CLIs, wire servers, and
//! stored result archives.
//!
//! All result types are frozen values: every derived quantity is a pure
//! function of the stored fields, so results can be cloned freely and
//! compare structurally equal after a serialization round-trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::families::Family;
use crate::metrics::{round3, ReasoningMetrics};

/// Puzzle difficulty level, shared by every game.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    /// The lowercase name used in serialized documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of an episode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeStatus {
    /// The puzzle's completion predicate became true.
    Solved,
    /// The agent gave up, exhausted the move budget, or hit an error.
    Failed,
    /// The wall-clock budget ran out.
    Timeout,
    /// Cooperative cancellation was signaled mid-episode.
    Abandoned,
}

impl EpisodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeStatus::Solved => "solved",
            EpisodeStatus::Failed => "failed",
            EpisodeStatus::Timeout => "timeout",
            EpisodeStatus::Abandoned => "abandoned",
        }
    }
}

/// Hint/solver configuration for an episode.
///
/// Controls whether the game's internal solver may be consulted, how many
/// hint-derived actions are allowed, and how strongly hint reliance reduces
/// the adjusted score.
///
/// # Example
///
/// ```no_run
/// use puzzlebench_core::models::SolverConfig;
///
/// // Default: hints allowed, budget of 100, no score penalty.
/// let default_config = SolverConfig::default();
///
/// // Pure agent reasoning: hints disabled entirely.
/// let pure = SolverConfig::solver_free();
/// assert!(!pure.solver_allowed);
/// assert_eq!(default_config.hint_budget, 100);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Whether the game's internal solver may supply hint actions.
    #[serde(default = "default_solver_allowed")]
    pub solver_allowed: bool,
    /// Maximum number of hint-derived actions per episode.
    #[serde(default = "default_hint_budget")]
    pub hint_budget: u32,
    /// Score penalty per fraction of hint-derived moves, in `[0, 1]`.
    #[serde(default)]
    pub hint_penalty: f64,
}

fn default_solver_allowed() -> bool {
    true
}

fn default_hint_budget() -> u32 {
    100
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            solver_allowed: true,
            hint_budget: 100,
            hint_penalty: 0.0,
        }
    }
}

impl SolverConfig {
    /// The distinguished solver-free configuration: hints disabled, forcing
    /// the agent to propose every action itself.
    pub fn solver_free() -> Self {
        SolverConfig {
            solver_allowed: false,
            hint_budget: 0,
            hint_penalty: 0.0,
        }
    }

    /// Human-readable description, used as the benchmark's solver label.
    pub fn describe(&self) -> String {
        if !self.solver_allowed {
            "solver-free".to_string()
        } else {
            format!(
                "hints (budget={}, penalty={})",
                self.hint_budget, self.hint_penalty
            )
        }
    }
}

/// Hard resource limits for one episode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpisodeLimits {
    /// Cap on total actions (valid + invalid) per episode.
    #[serde(default = "default_max_moves")]
    pub max_moves: u64,
    /// Cap on elapsed wall-clock time per episode, in milliseconds.
    #[serde(default = "default_max_wall_time_ms")]
    pub max_wall_time_ms: u64,
    /// Episode fails once a single run of consecutive invalid moves exceeds
    /// this length. Guards the built-in agent against infinite invalid loops.
    #[serde(default = "default_max_consecutive_invalid")]
    pub max_consecutive_invalid: u64,
}

fn default_max_moves() -> u64 {
    1000
}

fn default_max_wall_time_ms() -> u64 {
    30_000
}

fn default_max_consecutive_invalid() -> u64 {
    50
}

impl Default for EpisodeLimits {
    fn default() -> Self {
        EpisodeLimits {
            max_moves: 1000,
            max_wall_time_ms: 30_000,
            max_consecutive_invalid: 50,
        }
    }
}

/// Record of a single move attempt, for step-level analysis.
///
/// Immutable once appended to a trace. Capture is opt-in: the default
/// episode configuration keeps no move history, only the exact counters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveRecord {
    /// Action index within the episode (0-based, counts valid and invalid).
    pub step: u64,
    /// The opaque action string submitted to the game.
    pub action: String,
    /// Whether the game accepted the move.
    pub success: bool,
    /// Whether the move advanced toward the solution (false for plateaus
    /// and backtracks).
    #[serde(default)]
    pub advances_solution: bool,
    /// Whether the action came from the game's internal solver.
    #[serde(default)]
    pub hint_used: bool,
    /// Milliseconds since episode start.
    #[serde(default)]
    pub timestamp_ms: u64,
}

/// Complete result of a single puzzle episode.
///
/// This is the core output of the episode engine. Identity, timing, outcome
/// counters, and the frozen reasoning metrics are stored; every normalized
/// rate is derived on demand so the value stays consistent under cloning
/// and serialization.
///
/// # Example
///
/// ```no_run
/// # fn demo(result: puzzlebench_core::models::EpisodeResult) {
/// if result.success() {
///     println!(
///         "{} seed {} solved in {} steps (efficiency {:.3})",
///         result.game_id,
///         result.seed,
///         result.steps_taken,
///         result.efficiency_score(),
///     );
/// }
/// # }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    // === Identity ===
    /// Game identifier (e.g., `"sudoku"`).
    pub game_id: String,
    /// Reasoning family from the static registry.
    pub family: Family,
    /// Difficulty level used.
    pub difficulty: Difficulty,
    /// Seed the puzzle instance was generated from.
    pub seed: u64,

    // === Timing ===
    /// Episode start timestamp (UTC).
    pub started_at: DateTime<Utc>,
    /// Episode end timestamp (UTC).
    pub ended_at: DateTime<Utc>,
    /// Total wall-clock time in milliseconds.
    pub wall_time_ms: u64,

    // === Outcome ===
    /// Final episode status.
    pub status: EpisodeStatus,
    /// Total valid moves made.
    pub steps_taken: u64,
    /// Rejected move attempts.
    pub invalid_actions: u64,
    /// Hint-derived actions consumed.
    pub hints_used: u64,

    /// Best-known minimum successful-move count for this seed, if the game
    /// can compute it.
    #[serde(default)]
    pub optimal_steps: Option<u64>,

    /// Solver/hint configuration the episode ran under.
    #[serde(default)]
    pub solver_config: SolverConfig,

    /// Optional step-level move history (empty unless capture was enabled).
    #[serde(default)]
    pub move_history: Vec<MoveRecord>,

    /// Reasoning depth metrics derived from the episode trace.
    #[serde(default)]
    pub reasoning_metrics: Option<ReasoningMetrics>,

    /// Diagnostic string for episodes that failed outside normal play
    /// (e.g., puzzle generation errors).
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl EpisodeResult {
    /// Whether the puzzle was solved.
    pub fn success(&self) -> bool {
        self.status == EpisodeStatus::Solved
    }

    /// Ratio of optimal steps to actual steps (1.0 = optimal play).
    ///
    /// Returns 0.0 if the puzzle was not solved, the optimum is unknown, or
    /// no steps were taken.
    pub fn efficiency_score(&self) -> f64 {
        if !self.success() || self.steps_taken == 0 {
            return 0.0;
        }
        match self.optimal_steps {
            Some(optimal) => (optimal as f64 / self.steps_taken as f64).min(1.0),
            None => 0.0,
        }
    }

    /// Fraction of all actions that were rejected.
    pub fn error_rate(&self) -> f64 {
        let total = self.steps_taken + self.invalid_actions;
        if total == 0 {
            return 0.0;
        }
        self.invalid_actions as f64 / total as f64
    }

    /// Fraction of valid moves that came from hints (tool reliance).
    pub fn hint_dependency(&self) -> f64 {
        if self.steps_taken == 0 {
            return 0.0;
        }
        (self.hints_used as f64 / self.steps_taken as f64).min(1.0)
    }

    /// Efficiency score discounted by the configured hint penalty.
    ///
    /// `adjusted = efficiency × (1 − hint_penalty × hint_dependency)`,
    /// floored at zero.
    pub fn adjusted_score(&self) -> f64 {
        let penalty = self.solver_config.hint_penalty * self.hint_dependency();
        (self.efficiency_score() * (1.0 - penalty)).max(0.0)
    }

    /// One-line episode summary document for logging and streaming.
    ///
    /// Numeric rates are rounded to 3 decimal places on emission; internal
    /// arithmetic stays in full precision.
    pub fn summary(&self) -> serde_json::Value {
        let mut doc = json!({
            "game": self.game_id,
            "family": self.family,
            "seed": self.seed,
            "difficulty": self.difficulty.as_str(),
            "status": self.status.as_str(),
            "success": self.success(),
            "steps": self.steps_taken,
            "invalid": self.invalid_actions,
            "hints": self.hints_used,
            "efficiency": round3(self.efficiency_score()),
            "error_rate": round3(self.error_rate()),
            "hint_dependency": round3(self.hint_dependency()),
            "time_ms": self.wall_time_ms,
        });
        if let Some(metrics) = &self.reasoning_metrics {
            doc["reasoning"] = metrics.summary();
        }
        if let Some(reason) = &self.failure_reason {
            doc["failure_reason"] = json!(reason);
        }
        doc
    }
}

/// Aggregated episodes for one game at one difficulty.
///
/// A report with an empty episode list is a *placeholder*: the game belongs
/// to a family's declared set but was not evaluated in this run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameReport {
    /// Game identifier.
    pub game_id: String,
    /// Reasoning family from the static registry.
    pub family: Family,
    /// Difficulty level used.
    pub difficulty: Difficulty,
    /// Per-episode results, ordered by supplied seed (or seed index).
    #[serde(default)]
    pub episodes: Vec<EpisodeResult>,
}

impl GameReport {
    /// A placeholder entry for a game that was not evaluated.
    pub fn placeholder(game_id: &str, family: Family, difficulty: Difficulty) -> Self {
        GameReport {
            game_id: game_id.to_string(),
            family,
            difficulty,
            episodes: Vec::new(),
        }
    }

    /// Number of episodes run.
    pub fn episodes_evaluated(&self) -> usize {
        self.episodes.len()
    }

    /// Number of episodes solved.
    pub fn episodes_solved(&self) -> usize {
        self.episodes.iter().filter(|e| e.success()).count()
    }

    /// Fraction of episodes solved.
    pub fn solve_rate(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes_solved() as f64 / self.episodes.len() as f64
    }

    /// Per-episode scores (0-100), including zeros for unsolved episodes.
    pub fn episode_scores(&self) -> Vec<f64> {
        self.episodes
            .iter()
            .map(crate::scoring::score_episode)
            .collect()
    }

    /// Mean episode score for this game (0-100), or 0 with no episodes.
    pub fn score(&self) -> f64 {
        let scores = self.episode_scores();
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    /// Population standard deviation of episode scores (divisor = N).
    pub fn score_std(&self) -> f64 {
        let scores = self.episode_scores();
        if scores.len() < 2 {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let variance =
            scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / scores.len() as f64;
        variance.sqrt()
    }
}

/// Aggregated game reports for one reasoning family.
///
/// Contains one entry per game in the family's declared set, in registry
/// order; games missing from the run appear as placeholders so coverage is
/// always computable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FamilyReport {
    /// Family name.
    pub family: Family,
    /// One report per declared game, placeholders included.
    #[serde(default)]
    pub games: Vec<GameReport>,
    /// Size of the family's declared game set.
    pub expected_game_count: usize,
}

impl FamilyReport {
    /// Number of games with at least one evaluated episode.
    pub fn evaluated_count(&self) -> usize {
        self.games
            .iter()
            .filter(|g| g.episodes_evaluated() > 0)
            .count()
    }

    /// Fraction of the declared game set actually evaluated.
    pub fn coverage(&self) -> f64 {
        if self.expected_game_count == 0 {
            return 0.0;
        }
        self.evaluated_count() as f64 / self.expected_game_count as f64
    }

    /// Mean game score across evaluated games (0-100), or 0 with none.
    pub fn score(&self) -> f64 {
        let scored: Vec<f64> = self
            .games
            .iter()
            .filter(|g| g.episodes_evaluated() > 0)
            .map(|g| g.score())
            .collect();
        if scored.is_empty() {
            return 0.0;
        }
        scored.iter().sum::<f64>() / scored.len() as f64
    }
}

/// Complete benchmark result: metadata, per-game and per-family reports,
/// and the derived top-line Reasoning Score.
///
/// # Example
///
/// ```no_run
/// # fn demo(result: puzzlebench_core::models::BenchmarkResult) {
/// println!("Reasoning Score: {:.1}", result.reasoning_score());
/// for family in &result.families {
///     println!(
///         "  {:?}: {:.1} ({}/{} games)",
///         family.family,
///         family.score(),
///         family.evaluated_count(),
///         family.expected_game_count,
///     );
/// }
/// # }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// When the benchmark was run (UTC).
    pub timestamp: DateTime<Utc>,
    /// Difficulty level used across the run.
    pub difficulty: Difficulty,
    /// Target episodes per game.
    pub episodes_per_game: u32,
    /// Human-readable solver configuration description.
    pub solver_desc: String,
    /// Per-family reports, in registry family order, placeholders included.
    #[serde(default)]
    pub families: Vec<FamilyReport>,
    /// Flat list of evaluated game reports (no placeholders), including
    /// games outside the declared registry.
    #[serde(default)]
    pub games: Vec<GameReport>,
}

impl BenchmarkResult {
    /// The top-line Reasoning Score (0-100): mean of family scores over
    /// families with at least one evaluated game, or 0 if none.
    pub fn reasoning_score(&self) -> f64 {
        let scores: Vec<f64> = self
            .families
            .iter()
            .filter(|f| f.evaluated_count() > 0)
            .map(|f| f.score())
            .collect();
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    /// Total episodes across all evaluated games.
    pub fn total_episodes(&self) -> usize {
        self.games.iter().map(|g| g.episodes_evaluated()).sum()
    }

    /// Total solved episodes across all evaluated games.
    pub fn total_solved(&self) -> usize {
        self.games.iter().map(|g| g.episodes_solved()).sum()
    }

    /// Aggregate solve rate across all episodes.
    pub fn overall_solve_rate(&self) -> f64 {
        let total = self.total_episodes();
        if total == 0 {
            return 0.0;
        }
        self.total_solved() as f64 / total as f64
    }

    /// Fraction of the declared game set that was evaluated.
    pub fn coverage(&self) -> f64 {
        let evaluated = self
            .games
            .iter()
            .filter(|g| g.episodes_evaluated() > 0)
            .count();
        evaluated as f64 / crate::families::TOTAL_GAMES as f64
    }

    /// Number of families with at least one evaluated game.
    pub fn families_evaluated(&self) -> usize {
        self.families
            .iter()
            .filter(|f| f.evaluated_count() > 0)
            .count()
    }

    /// Stable key/value document view of the whole result.
    ///
    /// Scores are rounded to 2 decimal places, rates to 3; the timestamp is
    /// ISO-8601 UTC. This is the canonical external serialization.
    pub fn to_document(&self) -> serde_json::Value {
        let mut families = serde_json::Map::new();
        for fam in &self.families {
            families.insert(
                format!("{:?}", fam.family),
                json!({
                    "score": round2(fam.score()),
                    "evaluated": fam.evaluated_count(),
                    "total": fam.expected_game_count,
                    "coverage": round3(fam.coverage()),
                }),
            );
        }
        let mut games = serde_json::Map::new();
        for game in &self.games {
            if game.episodes_evaluated() == 0 {
                continue;
            }
            games.insert(
                game.game_id.clone(),
                json!({
                    "score": round2(game.score()),
                    "score_std": round2(game.score_std()),
                    "family": game.family,
                    "episodes": game.episodes_evaluated(),
                    "solved": game.episodes_solved(),
                    "solve_rate": round3(game.solve_rate()),
                }),
            );
        }
        json!({
            "reasoning_score": round2(self.reasoning_score()),
            "timestamp": self.timestamp.to_rfc3339(),
            "difficulty": self.difficulty.as_str(),
            "episodes_per_game": self.episodes_per_game,
            "solver_config": self.solver_desc,
            "coverage": round3(self.coverage()),
            "overall_solve_rate": round3(self.overall_solve_rate()),
            "families_evaluated": self.families_evaluated(),
            "families": families,
            "games": games,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
