//! Data-driven game balance
//!
//! Every gameplay number lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a partial JSON document can override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ChanceModel;

/// Errors raised while loading a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning json is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance table for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock / progression ===
    pub max_frame_dt: f32,
    pub survival_time: f32,
    pub nightmare_time: f32,
    pub level_duration: f32,

    // === Meteorite spawning ===
    pub base_spawn_interval: f32,
    pub spawn_interval_step: f32,
    pub min_spawn_interval: f32,
    pub nightmare_spawn_interval: f32,
    pub multi_unlock_time: f32,
    pub multi_chance: f64,
    pub basic_radius: f32,
    pub multi_radius: f32,
    pub multi_bounces: u8,
    pub meteor_spawn_y: f32,
    pub meteor_base_speed: f32,
    pub meteor_speed_jitter: f32,
    pub nightmare_speed_mult: f32,
    pub level_speed_step: f32,

    // === UFOs ===
    pub ufo_interval: f32,
    pub ufo_speed: f32,
    pub ufo_edge_offset: f32,
    pub ufo_min_y: f32,
    pub ufo_y_band: f32,
    pub ufo_despawn_margin: f32,
    pub ufo_drop_chance: f64,
    pub ufo_drop_speed: f32,

    // === Physics ===
    pub gravity: f32,
    pub bounce_speed: f32,
    pub meteor_despawn_margin: f32,
    pub drill_width: f32,
    pub drill_height: f32,
    pub ground_ratio: f32,

    // === Scoring / health ===
    pub bounce_score: u64,
    pub basic_score: u64,
    pub multi_score: u64,
    pub initial_health: u8,
    pub shake_duration: f32,
    pub panic_duration: f32,

    // === Villagers ===
    pub villager_count: usize,
    pub villager_speed: f32,
    pub panic_speed_mult: f32,
    pub panic_flip_chance: f64,
    pub calm_flip_chance: f64,

    // === Particles (cosmetic) ===
    pub bounce_particles: usize,
    pub hit_particles: usize,
    pub ground_particles: usize,
    pub particle_speed: f32,
    pub particle_life_min: f32,
    pub particle_life_jitter: f32,
    pub max_particles: usize,

    // === Randomness ===
    /// How per-frame probabilities are applied
    pub chance_model: ChanceModel,
    pub reference_fps: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            survival_time: SURVIVAL_TIME,
            nightmare_time: NIGHTMARE_TIME,
            level_duration: LEVEL_DURATION,

            base_spawn_interval: BASE_SPAWN_INTERVAL,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            nightmare_spawn_interval: NIGHTMARE_SPAWN_INTERVAL,
            multi_unlock_time: MULTI_UNLOCK_TIME,
            multi_chance: MULTI_CHANCE,
            basic_radius: BASIC_RADIUS,
            multi_radius: MULTI_RADIUS,
            multi_bounces: MULTI_BOUNCES,
            meteor_spawn_y: METEOR_SPAWN_Y,
            meteor_base_speed: METEOR_BASE_SPEED,
            meteor_speed_jitter: METEOR_SPEED_JITTER,
            nightmare_speed_mult: NIGHTMARE_SPEED_MULT,
            level_speed_step: LEVEL_SPEED_STEP,

            ufo_interval: UFO_INTERVAL,
            ufo_speed: UFO_SPEED,
            ufo_edge_offset: UFO_EDGE_OFFSET,
            ufo_min_y: UFO_MIN_Y,
            ufo_y_band: UFO_Y_BAND,
            ufo_despawn_margin: UFO_DESPAWN_MARGIN,
            ufo_drop_chance: UFO_DROP_CHANCE,
            ufo_drop_speed: UFO_DROP_SPEED,

            gravity: GRAVITY,
            bounce_speed: BOUNCE_SPEED,
            meteor_despawn_margin: METEOR_DESPAWN_MARGIN,
            drill_width: DRILL_WIDTH,
            drill_height: DRILL_HEIGHT,
            ground_ratio: GROUND_RATIO,

            bounce_score: BOUNCE_SCORE,
            basic_score: BASIC_SCORE,
            multi_score: MULTI_SCORE,
            initial_health: INITIAL_HEALTH,
            shake_duration: SHAKE_DURATION,
            panic_duration: PANIC_DURATION,

            villager_count: VILLAGER_COUNT,
            villager_speed: VILLAGER_SPEED,
            panic_speed_mult: PANIC_SPEED_MULT,
            panic_flip_chance: PANIC_FLIP_CHANCE,
            calm_flip_chance: CALM_FLIP_CHANCE,

            bounce_particles: BOUNCE_PARTICLES,
            hit_particles: HIT_PARTICLES,
            ground_particles: GROUND_PARTICLES,
            particle_speed: PARTICLE_SPEED,
            particle_life_min: PARTICLE_LIFE_MIN,
            particle_life_jitter: PARTICLE_LIFE_JITTER,
            max_particles: MAX_PARTICLES,

            chance_model: ChanceModel::default(),
            reference_fps: REFERENCE_FPS,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "drill_defense_tuning";

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }
        fn probability(field: &'static str, value: f64) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be within [0, 1]",
                })
            }
        }

        positive("max_frame_dt", self.max_frame_dt)?;
        positive("survival_time", self.survival_time)?;
        positive("level_duration", self.level_duration)?;
        positive("min_spawn_interval", self.min_spawn_interval)?;
        positive("nightmare_spawn_interval", self.nightmare_spawn_interval)?;
        positive("ufo_interval", self.ufo_interval)?;
        positive("drill_width", self.drill_width)?;
        positive("drill_height", self.drill_height)?;
        positive("reference_fps", self.reference_fps)?;
        positive("basic_radius", self.basic_radius)?;
        positive("multi_radius", self.multi_radius)?;

        probability("multi_chance", self.multi_chance)?;
        probability("ufo_drop_chance", self.ufo_drop_chance)?;
        probability("panic_flip_chance", self.panic_flip_chance)?;
        probability("calm_flip_chance", self.calm_flip_chance)?;

        if !(self.ground_ratio > 0.0 && self.ground_ratio < 1.0) {
            return Err(TuningError::Invalid {
                field: "ground_ratio",
                reason: "must be strictly between 0 and 1",
            });
        }
        if self.initial_health == 0 {
            return Err(TuningError::Invalid {
                field: "initial_health",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Load an override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
