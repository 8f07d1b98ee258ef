//! Scoring pipeline: episode score → game mean → family mean → top-line
//! Reasoning Score.
//!
//! The per-episode score favors getting to the goal (efficiency, 40%)
//! while penalizing the four distinct failure modes the trace exposes
//! (errors, revisions, non-monotonic progress, and tool reliance) equally
//! at 15% each. Families are combined with an arithmetic mean so partial
//! coverage still produces a defined score; the coverage fraction is
//! reported separately.

use chrono::Utc;

use crate::families::{games_in, Family};
use crate::models::{BenchmarkResult, Difficulty, EpisodeResult, FamilyReport, GameReport};

/// Weight of the efficiency component.
pub const W_EFFICIENCY: f64 = 0.40;
/// Weight of the error-inverse component.
pub const W_ERROR: f64 = 0.15;
/// Weight of the backtrack-inverse component.
pub const W_BACKTRACK: f64 = 0.15;
/// Weight of the progress-steadiness component.
pub const W_STEADINESS: f64 = 0.15;
/// Weight of the hint-independence component.
pub const W_HINT: f64 = 0.15;

/// Computes the 0-100 score for one episode.
///
/// Unsolved episodes always score 0. Solved episodes combine:
/// - efficiency (40%): `optimal_steps / steps_taken`, with a step-count
///   fallback when the optimum is unknown
/// - error inverse (15%): `1 − error_rate`
/// - backtrack inverse (15%): `1 − min(1, backtrack_rate)`
/// - progress steadiness (15%)
/// - hint independence (15%): `1 − hint_dependency`
///
/// The raw score is clamped to `[0, 100]` and rounded to 2 decimal places
/// for storage.
pub fn score_episode(episode: &EpisodeResult) -> f64 {
    if !episode.success() {
        return 0.0;
    }

    let efficiency = if episode.optimal_steps.is_some() {
        episode.efficiency_score()
    } else {
        (1.0 - (episode.steps_taken as f64 - 1.0) / 100.0).max(0.0)
    };

    let error = 1.0 - episode.error_rate();

    let (backtrack, steadiness) = match &episode.reasoning_metrics {
        Some(metrics) => (
            1.0 - metrics.backtrack_rate().min(1.0),
            metrics.progress_steadiness(),
        ),
        None => (1.0, 1.0),
    };

    let hint = 1.0 - episode.hint_dependency();

    let raw = W_EFFICIENCY * efficiency
        + W_ERROR * error
        + W_BACKTRACK * backtrack
        + W_STEADINESS * steadiness
        + W_HINT * hint;

    round2((raw * 100.0).clamp(0.0, 100.0))
}

/// Aggregates game reports into a complete [`BenchmarkResult`].
///
/// Every declared family appears with one entry per declared game, in
/// registry order; games missing from `reports` become placeholders so
/// coverage stays computable. Games outside the declared registry stay in
/// the flat game list but join no family average.
pub fn build_benchmark_result(
    reports: Vec<GameReport>,
    difficulty: Difficulty,
    episodes_per_game: u32,
    solver_desc: &str,
) -> BenchmarkResult {
    let mut families = Vec::with_capacity(Family::REPORTED.len());
    for family in Family::REPORTED {
        let declared = games_in(family);
        let mut games = Vec::with_capacity(declared.len());
        for game_id in declared {
            match reports.iter().find(|r| r.game_id == *game_id) {
                Some(report) => games.push(report.clone()),
                None => games.push(GameReport::placeholder(game_id, family, difficulty)),
            }
        }
        families.push(FamilyReport {
            family,
            games,
            expected_game_count: declared.len(),
        });
    }

    let games: Vec<GameReport> = reports
        .into_iter()
        .filter(|report| report.episodes_evaluated() > 0)
        .collect();

    BenchmarkResult {
        timestamp: Utc::now(),
        difficulty,
        episodes_per_game,
        solver_desc: solver_desc.to_string(),
        families,
        games,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
