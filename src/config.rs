//! Session configuration

use serde::{Deserialize, Serialize};

/// Tunables for a session: the generated world's shape and the run limits.
/// All fields have defaults, so partial TOML or YAML files parse fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // ===== World Generation =====
    /// World size in cells as (rows, cols) (default: 48x48)
    pub world_size: (u32, u32),
    /// Random seed for world generation (None = random)
    pub seed: Option<u64>,
    /// Elevation of the gold column (default: 8)
    pub gold_height: i32,
    /// Loose blocks scattered across open ground (default: 40).
    /// A full staircase consumes 22, so keep a healthy margin.
    pub block_count: u32,
    /// Noise threshold carving interior walls; lower means more walls,
    /// 1.0 disables them entirely (default: 0.62)
    pub wall_threshold: f64,
    /// Minimum walking distance between spawn and gold (default: 10)
    pub gold_clearance: i32,

    // ===== Run Limits =====
    /// Turn budget before the session gives up (None = unlimited)
    pub max_turns: Option<u32>,

    // ===== State Reports =====
    /// View radius in state snapshots (default: 5, an 11x11 window)
    pub view_radius: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            world_size: (48, 48),
            seed: None,
            gold_height: 8,
            block_count: 40,
            wall_threshold: 0.62,
            gold_clearance: 10,
            max_turns: Some(4000),
            view_radius: 5,
        }
    }
}

impl SessionConfig {
    /// Flat, wall-free world. Good for watching the agent's full routine
    /// without terrain in the way.
    pub fn open_field() -> Self {
        SessionConfig {
            wall_threshold: 1.0,
            block_count: 48,
            ..Default::default()
        }
    }

    /// Dense interior walls and a longer turn budget to match.
    pub fn walled() -> Self {
        SessionConfig {
            wall_threshold: 0.45,
            max_turns: Some(8000),
            ..Default::default()
        }
    }

    /// Small flat world with a tight budget, sized for tests.
    pub fn quick() -> Self {
        SessionConfig {
            world_size: (20, 20),
            block_count: 26,
            wall_threshold: 1.0,
            gold_clearance: 6,
            max_turns: Some(3000),
            ..Default::default()
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse a config from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
