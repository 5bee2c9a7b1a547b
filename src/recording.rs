//! Turn-by-turn capture and deterministic replay
//!
//! A recording stores the sensor stream a session fed its agent along with
//! what the agent did about it. Because the agent is deterministic, feeding
//! the same stream to a fresh agent must reproduce the run exactly; replays
//! are how regressions in the planner get caught.

use crate::action::Action;
use crate::agent::{Phase, Stacker};
use crate::config::SessionConfig;
use crate::map::Coord;
use crate::session::{Session, StepResult};
use crate::tile::Surroundings;
use serde::{Deserialize, Serialize};

/// One recorded turn: what the agent saw and what it did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u64,
    /// Sensor reading fed to the agent this turn.
    pub sensed: Surroundings,
    /// What the agent chose.
    pub action: Option<Action>,
    /// Dead-reckoned position after the turn, in the agent's frame.
    pub position: Coord,
    pub carrying: bool,
    pub phase: Phase,
}

/// A full captured run, replayable from either the seed or the sensor
/// stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub config: SessionConfig,
    pub seed: u64,
    pub turns: Vec<TurnRecord>,
}

impl Recording {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Recording, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// A session wrapper that captures every turn as it happens.
pub struct RecordingSession {
    session: Session,
    recording: Recording,
}

impl RecordingSession {
    pub fn new(config: SessionConfig) -> Self {
        let session = Session::new(config.clone());
        let seed = session.seed();
        Self {
            session,
            recording: Recording {
                config,
                seed,
                turns: Vec::new(),
            },
        }
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self {
            session: Session::with_seed(config.clone(), seed),
            recording: Recording {
                config,
                seed,
                turns: Vec::new(),
            },
        }
    }

    /// Step the session and append the turn to the recording. The reading
    /// is captured before the step so it is exactly what the agent saw.
    pub fn step(&mut self) -> StepResult {
        let sensed = self.session.world().sense();
        let result = self.session.step();
        self.recording.turns.push(TurnRecord {
            turn: result.state.turn,
            sensed,
            action: result.action,
            position: self.session.agent().position(),
            carrying: self.session.agent().carrying(),
            phase: self.session.agent().phase(),
        });
        result
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn finish(self) -> Recording {
        self.recording
    }
}

/// Outcome of checking a recording against a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub turns_checked: usize,
    /// Index of the first turn that disagreed, if any.
    pub first_divergence: Option<usize>,
}

impl ReplayReport {
    pub fn matches(&self) -> bool {
        self.first_divergence.is_none()
    }
}

/// Drive a fresh agent down the recorded sensor stream and compare its
/// choices turn by turn. This checks the planner alone, with no world in
/// the loop.
pub fn replay_agent(recording: &Recording) -> ReplayReport {
    let mut agent = Stacker::new();
    for (i, record) in recording.turns.iter().enumerate() {
        let action = agent.turn(&record.sensed);
        if action != record.action
            || agent.position() != record.position
            || agent.carrying() != record.carrying
            || agent.phase() != record.phase
        {
            return ReplayReport {
                turns_checked: i + 1,
                first_divergence: Some(i),
            };
        }
    }
    ReplayReport {
        turns_checked: recording.turns.len(),
        first_divergence: None,
    }
}

/// Regenerate the world from the recorded seed, run a fresh session, and
/// compare the action stream. This checks the whole stack end to end.
pub fn verify_replay(recording: &Recording) -> ReplayReport {
    let mut session = Session::with_seed(recording.config.clone(), recording.seed);
    for (i, record) in recording.turns.iter().enumerate() {
        let result = session.step();
        if result.action != record.action {
            return ReplayReport {
                turns_checked: i + 1,
                first_divergence: Some(i),
            };
        }
    }
    ReplayReport {
        turns_checked: recording.turns.len(),
        first_divergence: None,
    }
}
