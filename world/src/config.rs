//! Tunable gameplay parameters.

use maze_chase_core::Direction;
use serde::{Deserialize, Serialize};

/// Gameplay parameters consumed by the world.
///
/// Every field falls back to its default when omitted from a serialized
/// configuration, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Agent speed in world units per second.
    pub agent_speed: f32,
    /// Pursuer speed in world units per second while chasing.
    pub pursuer_speed: f32,
    /// Lives granted at the start of a game.
    pub starting_lives: u32,
    /// Length of fear mode on the first level, in seconds.
    pub fear_duration_secs: f32,
    /// Multiplier applied to pursuer speed during fear mode.
    pub fear_speed_factor: f32,
    /// Minimum overlap ratio for a soft interaction to register.
    pub min_overlap_ratio: f32,
    /// Seconds after level start at which each queued pursuer is released.
    pub release_delays_secs: Vec<f32>,
    /// Points carried by a coin.
    pub coin_value: i32,
    /// Points carried by a fruit.
    pub fruit_value: i32,
    /// Points awarded for capturing a frightened pursuer.
    pub pursuer_value: i32,
    /// Points carried by the agent's death notification.
    pub death_value: i32,
    /// Exit used when a layout does not reveal where its gate leads.
    pub gate_exit: Direction,
    /// Per-level scaling of speed and fear duration.
    pub difficulty: DifficultyCurve,
    /// Whether movers on a loaded layout halt on every tile boundary they
    /// reach, keeping them aligned with corridors.
    pub snap_to_lanes: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            agent_speed: 0.4,
            pursuer_speed: 0.3,
            starting_lives: 3,
            fear_duration_secs: 10.0,
            fear_speed_factor: 0.6,
            min_overlap_ratio: 0.85,
            release_delays_secs: vec![0.0, 0.0, 5.0, 10.0],
            coin_value: 10,
            fruit_value: 50,
            pursuer_value: 200,
            death_value: -500,
            gate_exit: Direction::South,
            difficulty: DifficultyCurve::default(),
            snap_to_lanes: true,
        }
    }
}

/// Difficulty progression applied when a level is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    /// Fractional speed increase per level beyond the first.
    pub speed_step: f32,
    /// Upper bound on the speed multiplier.
    pub max_speed_multiplier: f32,
    /// Seconds of fear removed per level beyond the first.
    pub fear_step_secs: f32,
    /// Shortest fear duration the curve may reach.
    pub min_fear_secs: f32,
}

impl DifficultyCurve {
    /// A curve that keeps every level identical to the first.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            speed_step: 0.0,
            max_speed_multiplier: 1.0,
            fear_step_secs: 0.0,
            min_fear_secs: 0.0,
        }
    }

    /// Speed multiplier for mobile entities on `level` (1-based).
    #[must_use]
    pub fn speed_multiplier(&self, level: u32) -> f32 {
        let raised = 1.0 + self.speed_step * level.saturating_sub(1) as f32;
        raised.clamp(1.0, self.max_speed_multiplier.max(1.0))
    }

    /// Fear duration in seconds on `level`, starting from `base`.
    #[must_use]
    pub fn fear_duration(&self, base: f32, level: u32) -> f32 {
        let shortened = base - self.fear_step_secs * level.saturating_sub(1) as f32;
        shortened.max(self.min_fear_secs.min(base)).max(0.0)
    }
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            speed_step: 0.1,
            max_speed_multiplier: 1.5,
            fear_step_secs: 1.0,
            min_fear_secs: 3.0,
        }
    }
}
