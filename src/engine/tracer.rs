//! Streaming per-episode event log.
//!
//! An optional JSONL trace of episode lifecycle events for offline
//! analysis. Events are always kept in memory for the current episode and
//! can additionally be written line-by-line to any `io::Write` sink.
//!
//! Output format (one JSON object per line):
//!
//! ```text
//! {"type":"episode_start","id":"ep_a1b2c3d4e5f6","ts":0,"game":"sudoku","seed":42,...}
//! {"type":"action","id":"ep_a1b2c3d4e5f6","ts":12,"action":"place 1 5 7","success":true}
//! {"type":"episode_end","id":"ep_a1b2c3d4e5f6","ts":840,"status":"solved","moves":45,...}
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::{Difficulty, SolverConfig};

/// The five kinds of streaming trace events.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    EpisodeStart,
    Observation,
    Action,
    Hint,
    EpisodeEnd,
}

/// A single event in an episode trace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: TraceEventKind,
    /// Identifier of the episode this event belongs to, unique within a
    /// process run.
    pub episode_id: String,
    /// Milliseconds since episode start.
    pub timestamp_ms: u64,
    /// Event-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl TraceEvent {
    /// Single-line JSON with the payload flattened alongside the envelope.
    pub fn to_jsonl(&self) -> String {
        let mut doc = serde_json::Map::new();
        doc.insert("type".to_string(), serde_json::to_value(self.kind).unwrap_or_default());
        doc.insert("id".to_string(), json!(self.episode_id));
        doc.insert("ts".to_string(), json!(self.timestamp_ms));
        if let serde_json::Value::Object(fields) = &self.payload {
            for (key, value) in fields {
                doc.insert(key.clone(), value.clone());
            }
        }
        serde_json::Value::Object(doc).to_string()
    }
}

/// Collects and optionally streams episode trace events.
///
/// The engine drives one tracer through an episode; events for the current
/// episode are retained in memory and flushed line-by-line to the sink, if
/// one is attached.
pub struct EpisodeTracer {
    sink: Option<Box<dyn Write + Send>>,
    events: Vec<TraceEvent>,
    episode_id: Option<String>,
    log_observations: bool,
}

impl Default for EpisodeTracer {
    fn default() -> Self {
        EpisodeTracer::in_memory()
    }
}

impl EpisodeTracer {
    /// A tracer that only retains events in memory.
    pub fn in_memory() -> Self {
        EpisodeTracer {
            sink: None,
            events: Vec::new(),
            episode_id: None,
            log_observations: false,
        }
    }

    /// A tracer that additionally writes JSONL lines to `sink`.
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        EpisodeTracer {
            sink: Some(sink),
            events: Vec::new(),
            episode_id: None,
            log_observations: false,
        }
    }

    /// Enables observation events (the rendered game state before each
    /// proposal). Off by default; observations can be large.
    pub fn log_observations(mut self, enabled: bool) -> Self {
        self.log_observations = enabled;
        self
    }

    /// Whether observation events should be recorded.
    pub fn observations_enabled(&self) -> bool {
        self.log_observations
    }

    /// Events recorded for the current (or most recent) episode.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Identifier of the episode currently being traced, if any.
    pub fn current_episode_id(&self) -> Option<&str> {
        self.episode_id.as_deref()
    }

    /// Begins a new episode trace and returns its identifier.
    pub fn start_episode(
        &mut self,
        game_id: &str,
        seed: u64,
        difficulty: Difficulty,
        solver: &SolverConfig,
    ) -> String {
        let episode_id = format!("ep_{}", &Uuid::new_v4().simple().to_string()[..12]);
        self.episode_id = Some(episode_id.clone());
        self.events.clear();
        self.emit(
            TraceEventKind::EpisodeStart,
            0,
            json!({
                "game": game_id,
                "seed": seed,
                "difficulty": difficulty.as_str(),
                "solver_config": {
                    "solver_allowed": solver.solver_allowed,
                    "hint_budget": solver.hint_budget,
                    "hint_penalty": solver.hint_penalty,
                },
            }),
        );
        episode_id
    }

    /// Records a rendered state observation.
    pub fn record_observation(&mut self, timestamp_ms: u64, rendered: &str) {
        self.emit(
            TraceEventKind::Observation,
            timestamp_ms,
            json!({ "state": rendered }),
        );
    }

    /// Records a submitted action and whether the game accepted it.
    pub fn record_action(&mut self, timestamp_ms: u64, action: &str, success: bool) {
        self.emit(
            TraceEventKind::Action,
            timestamp_ms,
            json!({ "action": action, "success": success }),
        );
    }

    /// Records a consumed hint.
    pub fn record_hint(&mut self, timestamp_ms: u64, action: &str, hints_remaining: u32) {
        self.emit(
            TraceEventKind::Hint,
            timestamp_ms,
            json!({ "hint": action, "hints_remaining": hints_remaining }),
        );
    }

    /// Ends the current episode trace with the final counters.
    pub fn end_episode(
        &mut self,
        timestamp_ms: u64,
        status: &str,
        moves: u64,
        invalid_moves: u64,
        hints_used: u64,
        optimal_steps: Option<u64>,
    ) {
        let mut payload = json!({
            "status": status,
            "moves": moves,
            "invalid_moves": invalid_moves,
            "hints_used": hints_used,
            "wall_time_ms": timestamp_ms,
        });
        if let Some(optimal) = optimal_steps {
            payload["optimal_steps"] = json!(optimal);
            if status == "solved" && moves > 0 {
                let efficiency = (optimal as f64 / moves as f64).min(1.0);
                payload["efficiency"] = json!(crate::metrics::round3(efficiency));
            }
        }
        self.emit(TraceEventKind::EpisodeEnd, timestamp_ms, payload);
        self.episode_id = None;
    }

    fn emit(&mut self, kind: TraceEventKind, timestamp_ms: u64, payload: serde_json::Value) {
        let episode_id = match &self.episode_id {
            Some(id) => id.clone(),
            None => return,
        };
        let event = TraceEvent {
            kind,
            episode_id,
            timestamp_ms,
            payload,
        };
        if let Some(sink) = &mut self.sink {
            let line = event.to_jsonl();
            if let Err(err) = writeln!(sink, "{line}").and_then(|_| sink.flush()) {
                log::warn!("trace sink write failed: {err}");
            }
        }
        self.events.push(event);
    }
}
