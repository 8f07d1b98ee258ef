//! Reasoning depth metrics derived from an episode trace.
//!
//! Goes beyond binary success/failure to measure *how* an agent reasons:
//! did it revise earlier placements, how steadily did it approach the
//! solution, were errors isolated or clustered, and how much work did it
//! spend relative to the optimal path.
//!
//! Every metric is defined for every trace, including pathological ones
//! (zero-length, all-failed, all-backtracks).

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Frozen reasoning metrics for one episode.
///
/// Stores the raw tracking data collected by the trace recorder; the
/// normalized rates are derived on demand. Rates round to 3 decimal places
/// in [`summary`](ReasoningMetrics::summary) only; internal arithmetic
/// stays in full precision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ReasoningMetrics {
    /// Times the agent overwrote a previously filled position.
    #[serde(default)]
    pub backtrack_count: u64,
    /// Remaining work after each valid move.
    #[serde(default)]
    pub solver_distance_trace: Vec<u64>,
    /// Longest consecutive run of invalid moves.
    #[serde(default)]
    pub error_streak_max: u64,
    /// Lengths of each consecutive run of invalid moves.
    #[serde(default)]
    pub error_streaks: Vec<u64>,
    /// Total actions taken, valid and invalid.
    #[serde(default)]
    pub total_actions: u64,
    /// Minimum steps to solve, when the game could compute it.
    #[serde(default)]
    pub optimal_path_length: Option<u64>,
}

impl ReasoningMetrics {
    /// Fraction of valid moves that were revisions of earlier placements.
    ///
    /// 0.0 = no backtracks, 1.0 = every move was a revision. Returns 0.0
    /// for an empty trace.
    pub fn backtrack_rate(&self) -> f64 {
        let valid_moves = self.solver_distance_trace.len();
        if valid_moves == 0 {
            return 0.0;
        }
        self.backtrack_count as f64 / valid_moves as f64
    }

    /// Ratio of total actions to the optimal path length.
    ///
    /// 1.0 = no wasted actions; higher = more wasted reasoning. Returns
    /// 0.0 when the optimal path length is unknown or nothing was done.
    pub fn reasoning_overhead(&self) -> f64 {
        let optimal = match self.optimal_path_length {
            Some(optimal) if optimal > 0 => optimal,
            _ => return 0.0,
        };
        if self.total_actions == 0 {
            return 0.0;
        }
        self.total_actions as f64 / optimal as f64
    }

    /// Average remaining-work reduction per valid move, floored at zero.
    ///
    /// 1.0 = every move reduced remaining work by exactly one. Returns 0.0
    /// with fewer than two snapshots.
    pub fn progress_velocity(&self) -> f64 {
        let trace = &self.solver_distance_trace;
        if trace.len() < 2 {
            return 0.0;
        }
        let first = trace[0] as f64;
        let last = trace[trace.len() - 1] as f64;
        let steps = (trace.len() - 1) as f64;
        ((first - last) / steps).max(0.0)
    }

    /// Fraction of adjacent snapshot pairs where remaining work strictly
    /// decreased.
    ///
    /// 1.0 = perfectly monotonic progress. Defined as 1.0 with fewer than
    /// two snapshots (vacuous monotonicity).
    pub fn progress_steadiness(&self) -> f64 {
        let trace = &self.solver_distance_trace;
        if trace.len() < 2 {
            return 1.0;
        }
        let monotonic = trace.windows(2).filter(|pair| pair[1] < pair[0]).count();
        monotonic as f64 / (trace.len() - 1) as f64
    }

    /// Mean length of the consecutive-error streaks, or 0.0 with none.
    pub fn avg_error_streak(&self) -> f64 {
        if self.error_streaks.is_empty() {
            return 0.0;
        }
        self.error_streaks.iter().sum::<u64>() as f64 / self.error_streaks.len() as f64
    }

    /// Flat document view with derived rates rounded to 3 decimal places.
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "backtrack_count": self.backtrack_count,
            "backtrack_rate": round3(self.backtrack_rate()),
            "reasoning_overhead": round3(self.reasoning_overhead()),
            "progress_velocity": round3(self.progress_velocity()),
            "progress_steadiness": round3(self.progress_steadiness()),
            "error_streak_max": self.error_streak_max,
            "avg_error_streak": round3(self.avg_error_streak()),
            "total_actions": self.total_actions,
            "optimal_path_length": self.optimal_path_length,
        })
    }
}

/// Rounds to 3 decimal places for external emission.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
