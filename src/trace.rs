//! Append-only per-episode trace recorder.
//!
//! The episode engine drives one [`ReasoningTrace`] per episode: every move
//! attempt is folded into exact counters (error streaks, backtracks,
//! remaining-work snapshots), with optional step-level move history.
//! Memory is O(steps + invalid actions); the counters and streak list are
//! always exact.

use crate::models::MoveRecord;

/// Mutable behavioral trace of one episode.
///
/// Constructed at episode start, fed by the engine on every move attempt,
/// and frozen into a [`ReasoningMetrics`](crate::metrics::ReasoningMetrics)
/// at episode end. Never mutated thereafter.
#[derive(Debug, Clone)]
pub struct ReasoningTrace {
    /// Successful moves that overwrote a previously filled state cell.
    backtrack_count: u64,
    /// Remaining-work snapshot after each successful move. Monotonic
    /// non-increasing by convention but not enforced; a game may report
    /// local regressions.
    solver_distance_trace: Vec<u64>,
    /// Lengths of completed runs of consecutive invalid moves.
    error_streaks: Vec<u64>,
    /// Length of the currently open run of invalid moves.
    open_streak: u64,
    /// Total actions recorded, valid and invalid.
    total_actions: u64,
    /// Optimal-work estimate copied from the game at episode start.
    optimal_path_length: Option<u64>,
    /// Whether step-level move records are kept.
    record_moves: bool,
    moves: Vec<MoveRecord>,
}

impl ReasoningTrace {
    /// Creates an empty trace carrying the game's optimal-work estimate.
    pub fn new(optimal_path_length: Option<u64>) -> Self {
        ReasoningTrace {
            backtrack_count: 0,
            solver_distance_trace: Vec::new(),
            error_streaks: Vec::new(),
            open_streak: 0,
            total_actions: 0,
            optimal_path_length,
            record_moves: false,
            moves: Vec::new(),
        }
    }

    /// Enables step-level [`MoveRecord`] capture for this episode.
    pub fn with_move_history(mut self) -> Self {
        self.record_moves = true;
        self
    }

    /// Records a rejected move attempt.
    pub fn record_rejected(&mut self, action: &str, hint_used: bool, timestamp_ms: u64) {
        self.push_move(action, false, false, hint_used, timestamp_ms);
        self.open_streak += 1;
        self.total_actions += 1;
    }

    /// Records an accepted move and the remaining-work snapshot taken
    /// after it was applied.
    pub fn record_accepted(
        &mut self,
        action: &str,
        remaining_work: u64,
        advances: bool,
        overwrites_filled_cell: bool,
        hint_used: bool,
        timestamp_ms: u64,
    ) {
        self.push_move(action, true, advances, hint_used, timestamp_ms);
        if self.open_streak > 0 {
            self.error_streaks.push(self.open_streak);
            self.open_streak = 0;
        }
        self.solver_distance_trace.push(remaining_work);
        if overwrites_filled_cell {
            self.backtrack_count += 1;
        }
        self.total_actions += 1;
    }

    fn push_move(
        &mut self,
        action: &str,
        success: bool,
        advances: bool,
        hint_used: bool,
        timestamp_ms: u64,
    ) {
        if !self.record_moves {
            return;
        }
        self.moves.push(MoveRecord {
            step: self.total_actions,
            action: action.to_string(),
            success,
            advances_solution: advances,
            hint_used,
            timestamp_ms,
        });
    }

    /// Length of the currently open run of consecutive invalid moves.
    pub fn open_streak(&self) -> u64 {
        self.open_streak
    }

    /// Total actions recorded so far, valid and invalid.
    pub fn total_actions(&self) -> u64 {
        self.total_actions
    }

    /// Number of remaining-work snapshots (one per accepted move).
    pub fn snapshots(&self) -> usize {
        self.solver_distance_trace.len()
    }

    /// Closes the trace: flushes any open error streak and freezes the
    /// collected data into metrics plus the optional move history.
    pub fn finalize(mut self) -> (crate::metrics::ReasoningMetrics, Vec<MoveRecord>) {
        if self.open_streak > 0 {
            self.error_streaks.push(self.open_streak);
            self.open_streak = 0;
        }
        let error_streak_max = self.error_streaks.iter().copied().max().unwrap_or(0);
        let metrics = crate::metrics::ReasoningMetrics {
            backtrack_count: self.backtrack_count,
            solver_distance_trace: self.solver_distance_trace,
            error_streak_max,
            error_streaks: self.error_streaks,
            total_actions: self.total_actions,
            optimal_path_length: self.optimal_path_length,
        };
        (metrics, self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaks_close_on_accepted_moves() {
        let mut trace = ReasoningTrace::new(Some(3));
        trace.record_rejected("bad", false, 0);
        trace.record_rejected("bad", false, 0);
        trace.record_accepted("ok", 2, true, false, false, 0);
        trace.record_rejected("bad", false, 0);
        trace.record_accepted("ok", 1, true, false, false, 0);

        let (metrics, _) = trace.finalize();
        assert_eq!(metrics.error_streaks, vec![2, 1]);
        assert_eq!(metrics.error_streak_max, 2);
        assert_eq!(metrics.total_actions, 5);
        assert_eq!(metrics.solver_distance_trace, vec![2, 1]);
    }

    #[test]
    fn trailing_open_streak_is_flushed_at_finalize() {
        let mut trace = ReasoningTrace::new(None);
        trace.record_accepted("ok", 4, true, false, false, 0);
        trace.record_rejected("bad", false, 0);
        trace.record_rejected("bad", false, 0);
        trace.record_rejected("bad", false, 0);
        assert_eq!(trace.open_streak(), 3);

        let (metrics, _) = trace.finalize();
        assert_eq!(metrics.error_streaks, vec![3]);
        assert_eq!(metrics.error_streak_max, 3);
    }

    #[test]
    fn backtracks_are_counted_per_overwrite() {
        let mut trace = ReasoningTrace::new(Some(2));
        trace.record_accepted("set 0 1", 1, true, false, false, 0);
        trace.record_accepted("set 0 2", 1, false, true, false, 0);
        trace.record_accepted("set 0 3", 0, true, true, false, 0);

        let (metrics, _) = trace.finalize();
        assert_eq!(metrics.backtrack_count, 2);
        assert_eq!(metrics.solver_distance_trace.len(), 3);
    }

    #[test]
    fn empty_trace_finalizes_cleanly() {
        let (metrics, moves) = ReasoningTrace::new(None).finalize();
        assert_eq!(metrics.total_actions, 0);
        assert_eq!(metrics.error_streak_max, 0);
        assert!(metrics.error_streaks.is_empty());
        assert!(metrics.solver_distance_trace.is_empty());
        assert!(moves.is_empty());
    }

    #[test]
    fn move_history_is_opt_in() {
        let mut trace = ReasoningTrace::new(None);
        trace.record_accepted("ok", 1, true, false, false, 5);
        let (_, moves) = trace.finalize();
        assert!(moves.is_empty());

        let mut trace = ReasoningTrace::new(None).with_move_history();
        trace.record_rejected("bad", true, 3);
        trace.record_accepted("ok", 1, true, false, false, 5);
        let (_, moves) = trace.finalize();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].step, 0);
        assert!(!moves[0].success);
        assert!(moves[0].hint_used);
        assert_eq!(moves[1].step, 1);
        assert!(moves[1].success);
        assert_eq!(moves[1].timestamp_ms, 5);
    }
}
