//! Game session and entity types
//!
//! [`GameSession`] is the aggregate root: it owns every entity pool, the
//! scoreboard and the session RNG. A new session is built for every run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::Viewport;
use crate::tuning::Tuning;

/// Palette index shared by entities; the renderer maps it to RGBA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hue {
    Red,
    Blue,
    Green,
    Purple,
}

impl Hue {
    /// Villager shirt colors
    pub const VILLAGER: [Hue; 4] = [Hue::Red, Hue::Blue, Hue::Green, Hue::Purple];
}

/// Meteorite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteoriteKind {
    /// Destroyed by the first drill hit
    Basic,
    /// Bounces off the drill several times before breaking
    Multi,
}

/// A falling meteorite
#[derive(Debug, Clone, PartialEq)]
pub struct Meteorite {
    pub pos: Vec2,
    /// Vertical velocity (positive = falling)
    pub vy: f32,
    pub kind: MeteoriteKind,
    pub radius: f32,
    /// Bounces left before the next drill hit destroys it. Always 0 for Basic.
    pub bounces_left: u8,
    pub hue: Hue,
}

impl Meteorite {
    pub fn basic(pos: Vec2, vy: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            vy,
            kind: MeteoriteKind::Basic,
            radius: tuning.basic_radius,
            bounces_left: 0,
            hue: Hue::Red,
        }
    }

    pub fn multi(pos: Vec2, vy: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            vy,
            kind: MeteoriteKind::Multi,
            radius: tuning.multi_radius,
            bounces_left: tuning.multi_bounces,
            hue: Hue::Purple,
        }
    }

    /// Points awarded when the drill destroys it
    pub fn destroy_score(&self, tuning: &Tuning) -> u64 {
        match self.kind {
            MeteoriteKind::Basic => tuning.basic_score,
            MeteoriteKind::Multi => tuning.multi_score,
        }
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.vy > 0.0
    }
}

/// A UFO crossing the sky
#[derive(Debug, Clone, PartialEq)]
pub struct Ufo {
    pub pos: Vec2,
    pub vx: f32,
    /// One-shot latch: a UFO drops at most one meteorite
    pub has_dropped: bool,
}

/// A cosmetic spark
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left, also used as alpha
    pub life: f32,
    pub hue: Hue,
}

/// A villager wandering below the ground line
#[derive(Debug, Clone, PartialEq)]
pub struct Villager {
    pub pos: Vec2,
    pub vx: f32,
    /// Seconds of panic left
    pub panic: f32,
    pub hue: Hue,
}

impl Villager {
    #[inline]
    pub fn is_panicking(&self) -> bool {
        self.panic > 0.0
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Survived until the survival time
    Clear,
    /// Health ran out
    GameOver,
}

/// Terminal report, produced exactly once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub outcome: Outcome,
    pub score: u64,
    /// Whole seconds survived
    pub time: u32,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Drill x, sampled from the input port once per frame
    pub player_x: f32,
    /// Survival time (seconds), frozen once the session ends. Accumulated
    /// in f64 so long sessions track wall-clock time at any frame rate.
    pub elapsed: f64,
    /// Difficulty level derived from `elapsed`
    pub level: u32,
    pub score: u64,
    pub health: u8,
    /// Seconds of camera shake left
    pub camera_shake: f32,
    pub meteor_timer: f32,
    pub ufo_timer: f32,
    pub meteorites: Vec<Meteorite>,
    pub ufos: Vec<Ufo>,
    pub particles: Vec<Particle>,
    pub villagers: Vec<Villager>,
    /// Set once when the session ends
    pub terminal: Option<Terminal>,
    pub(crate) nightmare_announced: bool,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create a new session with the given seed
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let mut session = Self {
            seed,
            player_x: viewport.width / 2.0,
            viewport,
            elapsed: 0.0,
            level: 1,
            score: 0,
            health: tuning.initial_health,
            camera_shake: 0.0,
            meteor_timer: 0.0,
            ufo_timer: 0.0,
            meteorites: Vec::new(),
            ufos: Vec::new(),
            particles: Vec::new(),
            villagers: Vec::with_capacity(tuning.villager_count),
            terminal: None,
            nightmare_announced: false,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        };

        session.spawn_villagers();
        session
    }

    fn spawn_villagers(&mut self) {
        let ground = self.ground_y();
        let width = self.viewport.width;
        // Villagers walk in the band below the ground line
        let band = (self.viewport.height / 3.0 - 40.0).max(0.0);

        for _ in 0..self.tuning.villager_count {
            let x = self.rng.random::<f32>() * width;
            let y = ground + 20.0 + self.rng.random::<f32>() * band;
            let vx = (self.rng.random::<f32>() - 0.5) * self.tuning.villager_speed;
            let hue = Hue::VILLAGER[self.rng.random_range(0..Hue::VILLAGER.len())];
            self.villagers.push(Villager {
                pos: Vec2::new(x, y),
                vx,
                panic: 0.0,
                hue,
            });
        }
    }

    /// Y of the ground line for the current viewport
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y(self.tuning.ground_ratio)
    }

    /// Drill hitbox: centered on `player_x`, bottom edge on the ground line
    pub fn drill_hitbox(&self) -> Rect {
        let w = self.tuning.drill_width;
        let h = self.tuning.drill_height;
        Rect::new(self.player_x - w / 2.0, self.ground_y() - h, w, h)
    }

    /// Nightmare difficulty is active
    #[inline]
    pub fn is_nightmare(&self) -> bool {
        self.elapsed >= f64::from(self.tuning.nightmare_time)
    }

    /// Still being simulated
    #[inline]
    pub fn is_running(&self) -> bool {
        self.terminal.is_none()
    }

    /// Whole seconds survived so far
    #[inline]
    pub fn survival_seconds(&self) -> u32 {
        self.elapsed.max(0.0).floor() as u32
    }

    /// Apply a resized viewport. The ground line follows implicitly.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_valid() {
            self.viewport = viewport;
        }
    }
}

/// Push a burst of particles, dropping the oldest past the cap
pub(crate) fn emit_particles(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    tuning: &Tuning,
    pos: Vec2,
    hue: Hue,
    count: usize,
) {
    let speed = tuning.particle_speed;
    for _ in 0..count {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * speed,
            (rng.random::<f32>() - 0.5) * speed,
        );
        let life = tuning.particle_life_min + rng.random::<f32>() * tuning.particle_life_jitter;
        particles.push(Particle { pos, vel, life, hue });
    }

    if particles.len() > tuning.max_particles {
        let excess = particles.len() - tuning.max_particles;
        particles.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new(42, Viewport::new(900.0, 600.0), Tuning::default());
        assert_eq!(session.health, 5);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.villagers.len(), 10);
        assert_eq!(session.player_x, 450.0);
        assert_eq!(session.ground_y(), 400.0);
        assert!(session.is_running());
        assert!(session.meteorites.is_empty());
    }

    #[test]
    fn test_villagers_start_below_ground() {
        let session = GameSession::new(7, Viewport::new(900.0, 600.0), Tuning::default());
        for v in &session.villagers {
            assert!(v.pos.x >= 0.0 && v.pos.x <= 900.0);
            assert!(v.pos.y >= session.ground_y() + 20.0);
            assert!(v.pos.y <= 600.0);
            assert!(v.vx.abs() <= 10.0);
            assert!(!v.is_panicking());
        }
    }

    #[test]
    fn test_same_seed_same_village() {
        let a = GameSession::new(99, Viewport::default(), Tuning::default());
        let b = GameSession::new(99, Viewport::default(), Tuning::default());
        assert_eq!(a.villagers, b.villagers);
    }

    #[test]
    fn test_drill_hitbox_sits_on_ground() {
        let mut session = GameSession::new(1, Viewport::new(800.0, 600.0), Tuning::default());
        session.player_x = 100.0;
        let hitbox = session.drill_hitbox();
        assert_eq!(hitbox.x, 84.0);
        assert_eq!(hitbox.y, 320.0);
        assert_eq!(hitbox.bottom(), session.ground_y());
    }

    #[test]
    fn test_meteorite_constructors() {
        let tuning = Tuning::default();
        let basic = Meteorite::basic(Vec2::ZERO, 60.0, &tuning);
        assert_eq!(basic.bounces_left, 0);
        assert_eq!(basic.radius, 15.0);
        assert_eq!(basic.destroy_score(&tuning), 100);

        let multi = Meteorite::multi(Vec2::ZERO, 60.0, &tuning);
        assert_eq!(multi.bounces_left, 3);
        assert_eq!(multi.radius, 20.0);
        assert_eq!(multi.destroy_score(&tuning), 500);
        assert_eq!(multi.hue, Hue::Purple);
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let tuning = Tuning {
            max_particles: 10,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        emit_particles(&mut particles, &mut rng, &tuning, Vec2::ZERO, Hue::Red, 8);
        emit_particles(&mut particles, &mut rng, &tuning, Vec2::ONE, Hue::Blue, 8);
        assert_eq!(particles.len(), 10);
        assert_eq!(particles.iter().filter(|p| p.hue == Hue::Blue).count(), 8);
        for p in &particles {
            assert!(p.life >= 0.5 && p.life <= 1.0);
            assert!(p.vel.x.abs() <= 150.0 && p.vel.y.abs() <= 150.0);
        }
    }
}
