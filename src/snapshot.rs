//! Snapshot API for structured interaction with running sessions
//!
//! This module provides a request/response surface over a pool of sessions
//! keyed by id. A caller advances a session a few turns at a time and gets
//! back a flattened view of where the hunt stands, suitable for serving
//! over a wire or feeding to an LLM.

use crate::config::SessionConfig;
use crate::map::Coord;
use crate::session::{DoneReason, Session, StepResult};
use std::collections::HashMap;
use uuid::Uuid;

/// Snapshot request: resume a session by id or start a fresh one, then run
/// it forward a number of turns.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    /// Resume this session; a missing or unknown id starts a new one.
    pub session_id: Option<String>,
    /// Seed for a newly created session.
    pub seed: Option<u64>,
    /// Config for a newly created session.
    pub config: Option<SessionConfig>,
    /// How many turns to run. Stops early when the session ends.
    pub turns: u32,
}

/// Progress counters.
#[derive(Debug, Clone)]
pub struct SnapshotStats {
    pub tiles_known: usize,
    pub cells_visited: usize,
    pub pending_moves: usize,
}

/// Snapshot response: where the session stands after the requested turns.
#[derive(Debug, Clone)]
pub struct SnapshotResponse {
    pub session_id: String,
    pub turn: u64,
    pub done: bool,
    pub done_reason: Option<String>,
    pub position: Coord,
    pub carrying: bool,
    pub phase: String,
    pub gold_located: bool,
    /// The agent's-eye view: unsensed cells blank, agent drawn as '@'.
    pub map_lines: Vec<String>,
    pub stats: SnapshotStats,
    /// Tokens of the actions taken this request, in order.
    pub last_actions: Vec<String>,
    /// Events from the turns this request ran.
    pub events: Vec<String>,
}

/// Manager for a pool of sessions.
pub struct SnapshotManager {
    sessions: HashMap<String, Session>,
    default_config: SessionConfig,
}

impl Default for SnapshotManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Use a specific config for sessions the requests don't configure.
    pub fn with_config(default_config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            default_config,
        }
    }

    /// Process a snapshot request and return a response.
    pub fn process(&mut self, request: SnapshotRequest) -> SnapshotResponse {
        let session_id = match &request.session_id {
            Some(id) if self.sessions.contains_key(id) => id.clone(),
            _ => {
                let new_id = Uuid::new_v4().to_string();
                let mut config = request
                    .config
                    .clone()
                    .unwrap_or_else(|| self.default_config.clone());
                if request.seed.is_some() {
                    config.seed = request.seed;
                }
                self.sessions.insert(new_id.clone(), Session::new(config));
                new_id
            }
        };
        let session = self.sessions.get_mut(&session_id).unwrap();

        let mut last_actions = Vec::new();
        let mut events = Vec::new();
        let mut last_result: Option<StepResult> = None;
        for _ in 0..request.turns {
            let result = session.step();
            if let Some(action) = result.action {
                last_actions.push(action.token().to_string());
            }
            events.extend(result.events.clone());
            let done = result.done;
            last_result = Some(result);
            if done {
                break;
            }
        }

        let session = self.sessions.get(&session_id).unwrap();
        self.build_response(session_id, session, last_result, last_actions, events)
    }

    fn build_response(
        &self,
        session_id: String,
        session: &Session,
        last_result: Option<StepResult>,
        last_actions: Vec<String>,
        events: Vec<String>,
    ) -> SnapshotResponse {
        let state = session.get_state();

        let mut map_lines = Vec::new();
        for row in 0..state.view.size() {
            let mut line = String::new();
            for col in 0..state.view.size() {
                if let Some(cell) = state.view.cell(row, col) {
                    line.push(if cell.agent {
                        '@'
                    } else if !cell.known {
                        ' '
                    } else {
                        cell.tile.kind.display_char()
                    });
                }
            }
            map_lines.push(line);
        }

        let (done, done_reason) = match &last_result {
            Some(result) => (
                result.done,
                result.done_reason.map(|reason| {
                    match reason {
                        DoneReason::GoldReached => "gold_reached",
                        DoneReason::MaxTurns => "max_turns",
                        DoneReason::Stalled => "stalled",
                    }
                    .to_string()
                }),
            ),
            None => (false, None),
        };

        SnapshotResponse {
            session_id,
            turn: state.turn,
            done,
            done_reason,
            position: state.position,
            carrying: state.carrying,
            phase: format!("{:?}", state.phase),
            gold_located: state.gold_located,
            map_lines,
            stats: SnapshotStats {
                tiles_known: state.tiles_known,
                cells_visited: state.cells_visited,
                pending_moves: session.agent().pending_moves(),
            },
            last_actions,
            events,
        }
    }

    /// Get a session by id.
    pub fn get_session(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Remove a session.
    pub fn remove_session(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    /// List all session ids.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }
}
