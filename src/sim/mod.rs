//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Bounded delta-time per step
//! - No rendering or platform dependencies

pub mod arbiter;
pub mod chance;
pub mod collision;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use chance::ChanceModel;
pub use collision::{Rect, circle_rect_overlap, touches_ground};
pub use physics::MeteorEvent;
pub use spawner::{level_for, spawn_interval};
pub use state::{
    GameSession, Hue, Meteorite, MeteoriteKind, Outcome, Particle, Terminal, Ufo, Villager,
};
pub use tick::{TickInput, tick};
