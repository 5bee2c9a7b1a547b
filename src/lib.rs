//! Stacker Core - A planning engine for block-stacking grid agents
//!
//! This crate provides the full hunt loop for a partially observable grid
//! world with elevation: an agent that maps terrain from a five-cell sensor,
//! quarries loose blocks, and stacks a spiral staircase to reach a gold tile
//! perched above the field.
//!
//! ## Modules
//!
//! - [`agent`] - The planning agent and its phase machine
//! - [`world`] - Ground-truth grid world and action arbitration
//! - [`session`] - Session management and the turn loop
//! - [`pathfind`] - Breadth-first search over the discovered map
//! - [`stairs`] - Staircase geometry and build scheduling
//! - [`recording`] - Recording and replay for regression checks
//! - [`renderer`] - Text and JSON renderers
//! - [`snapshot`] - Run-ahead snapshot API for session inspection

pub mod action;
pub mod agent;
pub mod config;
pub mod map;
pub mod pathfind;
pub mod recording;
pub mod renderer;
mod scenarios; // End-to-end runs on handcrafted and generated worlds
pub mod session;
pub mod snapshot;
pub mod stairs;
pub mod tile;
pub mod world;
pub mod worldgen;

// Core types
pub use action::{Action, Direction};
pub use agent::{Phase, Stacker};
pub use config::SessionConfig;
pub use map::{Coord, TileMap};
pub use session::{DoneReason, Session, SessionState, StepResult};
pub use tile::{Surroundings, Tile, TileKind};
pub use world::{ViewCell, World, WorldView};
pub use worldgen::WorldGenerator;

// Pathfinding and staircase geometry
pub use pathfind::{nearest_matching, shortest_path};
pub use stairs::{detour_moves, ring_around, StairPlan, RING_CELLS};

// Recording and replay
pub use recording::{
    replay_agent, verify_replay, Recording, RecordingSession, ReplayReport, TurnRecord,
};

// Renderers
pub use renderer::{CompactJsonRenderer, JsonRenderer, Renderer, TextRenderer};

// Snapshot API
pub use snapshot::{SnapshotManager, SnapshotRequest, SnapshotResponse, SnapshotStats};
