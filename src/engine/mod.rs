//! Episode engine: drives one puzzle instance from generation to
//! termination and emits one `EpisodeResult`.
//!
//! The engine is single-writer within an episode: one puzzle's move loop
//! runs sequentially, and every move boundary is a suspension point where
//! cancellation, the wall-clock budget, and the move budget are checked.
//! For fixed `(game, difficulty, seed, solver_config, limits)` and a
//! deterministic agent, every field of the emitted result except the
//! timing fields is byte-identical across runs.

pub mod agent;
pub mod tracer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::models::{Difficulty, EpisodeLimits, EpisodeResult, EpisodeStatus, SolverConfig};
use crate::puzzle::{GameFactory, MoveOutcome};
use crate::trace::ReasoningTrace;
use self::agent::{AgentContext, AgentDecision, AgentStrategy};
use self::tracer::EpisodeTracer;

/// Cooperative cancellation token shared between a caller and any number
/// of running episodes.
///
/// When signaled, each episode exits at its next move boundary with
/// `status = Abandoned`, preserving the partial trace.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    /// Signals cancellation to every episode holding a clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for one episode run.
#[derive(Debug, Clone, Default)]
pub struct EpisodeOptions {
    /// Hint/solver configuration.
    pub solver: SolverConfig,
    /// Hard move and wall-clock limits.
    pub limits: EpisodeLimits,
    /// Whether to retain step-level move records in the result. Off by
    /// default; the per-move timestamps make results non-reproducible
    /// byte-for-byte.
    pub record_move_history: bool,
    /// Cooperative cancellation token checked at each move boundary.
    pub cancel: CancelToken,
}

/// Runs one seeded episode to completion, failure, timeout, or
/// abandonment.
///
/// The puzzle instance is constructed from `(difficulty, seed)`, owned by
/// this episode, and dropped when it returns. Errors never escape: a
/// generation failure becomes `status = Failed` with a diagnostic in
/// `failure_reason`.
///
/// # Example
///
/// ```no_run
/// use puzzlebench_core::engine::agent::HintAgent;
/// use puzzlebench_core::engine::{run_episode, EpisodeOptions};
/// use puzzlebench_core::models::Difficulty;
/// use puzzlebench_core::puzzle::GameFactory;
///
/// # fn demo(factory: GameFactory) {
/// let mut agent = HintAgent;
/// let result = run_episode(
///     &factory,
///     Difficulty::Easy,
///     42,
///     &mut agent,
///     &EpisodeOptions::default(),
///     None,
/// );
/// println!("{}: {} steps", result.status.as_str(), result.steps_taken);
/// # }
/// ```
pub fn run_episode(
    factory: &GameFactory,
    difficulty: Difficulty,
    seed: u64,
    agent: &mut dyn AgentStrategy,
    options: &EpisodeOptions,
    mut episode_tracer: Option<&mut EpisodeTracer>,
) -> EpisodeResult {
    let started_at = Utc::now();
    let clock = Instant::now();

    let mut game = factory(difficulty, seed);
    let game_id = game.game_id().to_string();
    let family = game.family_tag();

    if let Some(t) = episode_tracer.as_deref_mut() {
        t.start_episode(&game_id, seed, difficulty, &options.solver);
    }

    let mut steps_taken: u64 = 0;
    let mut invalid_actions: u64 = 0;
    let mut hints_used: u64 = 0;
    let mut failure_reason: Option<String> = None;

    let (status, optimal_steps, trace) = if let Err(err) = game.generate() {
        log::warn!("{game_id} seed {seed}: {err}");
        failure_reason = Some(err.to_string());
        (EpisodeStatus::Failed, None, ReasoningTrace::new(None))
    } else {
        let optimal_steps = game.optimal_steps();
        let mut trace = ReasoningTrace::new(optimal_steps);
        if options.record_move_history {
            trace = trace.with_move_history();
        }

        let mut status = EpisodeStatus::Failed;
        let mut solved = game.is_complete();
        while !solved {
            if options.cancel.is_cancelled() {
                status = EpisodeStatus::Abandoned;
                break;
            }
            let elapsed = clock.elapsed().as_millis() as u64;
            if elapsed >= options.limits.max_wall_time_ms {
                status = EpisodeStatus::Timeout;
                break;
            }
            if steps_taken + invalid_actions >= options.limits.max_moves {
                status = EpisodeStatus::Failed;
                failure_reason = Some("move budget exhausted".to_string());
                break;
            }

            let hints_remaining = if options.solver.solver_allowed {
                options
                    .solver
                    .hint_budget
                    .saturating_sub(hints_used.min(u64::from(u32::MAX)) as u32)
            } else {
                0
            };
            let ctx = AgentContext {
                steps: steps_taken,
                invalid: invalid_actions,
                hints_remaining,
            };

            if let Some(t) = episode_tracer.as_deref_mut() {
                if t.observations_enabled() {
                    t.record_observation(elapsed, &game.render());
                }
            }

            let (action, from_hint) = match agent.propose(game.as_ref(), &ctx) {
                AgentDecision::Action { action, from_hint } => (action, from_hint),
                AgentDecision::GiveUp => {
                    status = EpisodeStatus::Failed;
                    failure_reason = Some("agent gave up without an action".to_string());
                    break;
                }
            };
            if from_hint {
                hints_used += 1;
                if let Some(t) = episode_tracer.as_deref_mut() {
                    t.record_hint(elapsed, &action, hints_remaining.saturating_sub(1));
                }
            }

            let outcome = game.validate_move(&action);
            let accepted = outcome.is_accepted();
            match outcome {
                MoveOutcome::Accepted {
                    advances,
                    overwrites_filled_cell,
                } => {
                    trace.record_accepted(
                        &action,
                        game.remaining_work(),
                        advances,
                        overwrites_filled_cell,
                        from_hint,
                        elapsed,
                    );
                    steps_taken += 1;
                }
                MoveOutcome::Rejected { reason } => {
                    log::debug!("{game_id} seed {seed}: rejected {action:?}: {reason}");
                    trace.record_rejected(&action, from_hint, elapsed);
                    invalid_actions += 1;
                }
            }
            if let Some(t) = episode_tracer.as_deref_mut() {
                t.record_action(elapsed, &action, accepted);
            }
            if !accepted && trace.open_streak() > options.limits.max_consecutive_invalid {
                status = EpisodeStatus::Failed;
                failure_reason = Some(format!(
                    "exceeded {} consecutive invalid moves",
                    options.limits.max_consecutive_invalid
                ));
                break;
            }

            solved = game.is_complete();
        }
        if solved {
            status = EpisodeStatus::Solved;
        }
        (status, optimal_steps, trace)
    };

    let (metrics, move_history) = trace.finalize();
    let wall_time_ms = clock.elapsed().as_millis() as u64;
    let ended_at = Utc::now();

    if let Some(t) = episode_tracer.as_deref_mut() {
        t.end_episode(
            wall_time_ms,
            status.as_str(),
            steps_taken,
            invalid_actions,
            hints_used,
            optimal_steps,
        );
    }
    log::debug!(
        "{game_id} seed {seed}: {} ({steps_taken} steps, {invalid_actions} invalid, {wall_time_ms}ms)",
        status.as_str()
    );

    EpisodeResult {
        game_id,
        family,
        difficulty,
        seed,
        started_at,
        ended_at,
        wall_time_ms,
        status,
        steps_taken,
        invalid_actions,
        hints_used,
        optimal_steps,
        solver_config: options.solver.clone(),
        move_history,
        reasoning_metrics: Some(metrics),
        failure_reason,
    }
}
