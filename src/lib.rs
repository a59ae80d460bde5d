//! Drill Defense - a steampunk drill versus falling meteorites
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, scoring)
//! - `game`: Phase state machine and session lifecycle around the simulation
//! - `clock`: Frame timestamp to bounded delta-time conversion
//! - `renderer`: WebGPU rendering pipeline (flat colored rectangles)
//! - `platform`: Input port and startup errors shared with the browser glue
//! - `tuning`: Data-driven game balance

pub mod clock;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use clock::{FrameClock, frame_dt};
pub use game::{Game, LoopControl, Phase, SessionResult};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Largest delta-time a single frame may advance (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Session ends in a clear once this much time is survived (seconds)
    pub const SURVIVAL_TIME: f32 = 300.0;
    /// Nightmare phase starts here (seconds)
    pub const NIGHTMARE_TIME: f32 = 240.0;
    /// Seconds per difficulty level
    pub const LEVEL_DURATION: f32 = 10.0;

    /// Meteorite spawn cadence
    pub const BASE_SPAWN_INTERVAL: f32 = 1.5;
    pub const SPAWN_INTERVAL_STEP: f32 = 0.1;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.2;
    pub const NIGHTMARE_SPAWN_INTERVAL: f32 = 0.15;

    /// Multi meteorites unlock after this much time (seconds)
    pub const MULTI_UNLOCK_TIME: f32 = 15.0;
    pub const MULTI_CHANCE: f64 = 0.2;
    pub const BASIC_RADIUS: f32 = 15.0;
    pub const MULTI_RADIUS: f32 = 20.0;
    pub const MULTI_BOUNCES: u8 = 3;

    /// Meteorites enter just above the top edge
    pub const METEOR_SPAWN_Y: f32 = -30.0;
    pub const METEOR_BASE_SPEED: f32 = 50.0;
    pub const METEOR_SPEED_JITTER: f32 = 50.0;
    pub const NIGHTMARE_SPEED_MULT: f32 = 2.0;
    pub const LEVEL_SPEED_STEP: f32 = 0.05;

    /// UFO cadence and flight band
    pub const UFO_INTERVAL: f32 = 10.0;
    pub const UFO_SPEED: f32 = 100.0;
    pub const UFO_EDGE_OFFSET: f32 = 50.0;
    pub const UFO_MIN_Y: f32 = 50.0;
    pub const UFO_Y_BAND: f32 = 100.0;
    pub const UFO_DESPAWN_MARGIN: f32 = 100.0;
    pub const UFO_DROP_CHANCE: f64 = 0.05;
    pub const UFO_DROP_SPEED: f32 = 50.0;

    /// Gravity applied to meteorites moving upward after a bounce (px/s²)
    pub const GRAVITY: f32 = 400.0;
    /// Upward speed after bouncing off the drill
    pub const BOUNCE_SPEED: f32 = 350.0;
    /// Meteorites this far below the viewport are discarded
    pub const METEOR_DESPAWN_MARGIN: f32 = 100.0;

    /// Drill hitbox, bottom edge sits on the ground line
    pub const DRILL_WIDTH: f32 = 32.0;
    pub const DRILL_HEIGHT: f32 = 80.0;
    /// Ground line as a fraction of viewport height
    pub const GROUND_RATIO: f32 = 2.0 / 3.0;

    pub const BOUNCE_SCORE: u64 = 50;
    pub const BASIC_SCORE: u64 = 100;
    pub const MULTI_SCORE: u64 = 500;

    pub const INITIAL_HEALTH: u8 = 5;
    pub const SHAKE_DURATION: f32 = 0.5;
    pub const PANIC_DURATION: f32 = 2.0;

    pub const VILLAGER_COUNT: usize = 10;
    /// Villager speed spread: vx in ±VILLAGER_SPEED/2
    pub const VILLAGER_SPEED: f32 = 20.0;
    pub const PANIC_SPEED_MULT: f32 = 3.0;
    pub const PANIC_FLIP_CHANCE: f64 = 0.05;
    pub const CALM_FLIP_CHANCE: f64 = 0.01;

    /// Particle bursts per event
    pub const BOUNCE_PARTICLES: usize = 5;
    pub const HIT_PARTICLES: usize = 15;
    pub const GROUND_PARTICLES: usize = 20;
    pub const PARTICLE_SPEED: f32 = 300.0;
    pub const PARTICLE_LIFE_MIN: f32 = 0.5;
    pub const PARTICLE_LIFE_JITTER: f32 = 0.5;
    pub const MAX_PARTICLES: usize = 512;

    /// Frame rate the per-frame probabilities were balanced at
    pub const REFERENCE_FPS: f32 = 60.0;
}

/// Current viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate of the ground line (the drill stands on it)
    #[inline]
    pub fn ground_y(&self, ratio: f32) -> f32 {
        self.height * ratio
    }

    /// Whether the viewport is usable for a session
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
