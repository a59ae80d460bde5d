//! Timer-driven spawning policy
//!
//! Meteorites fall on a cadence that tightens with the difficulty level;
//! UFOs cross the sky on a fixed cadence and may drop one multi meteorite.

use glam::Vec2;
use rand::Rng;

use super::state::{GameSession, Meteorite, Ufo};
use crate::tuning::Tuning;

/// Difficulty level for a survival time (starts at 1)
#[inline]
pub fn level_for(elapsed: f32, tuning: &Tuning) -> u32 {
    (elapsed.max(0.0) / tuning.level_duration).floor() as u32 + 1
}

/// Seconds between meteorite spawns
///
/// Shrinks by one step per level down to the floor; nightmare overrides it.
pub fn spawn_interval(elapsed: f32, tuning: &Tuning) -> f32 {
    if elapsed >= tuning.nightmare_time {
        return tuning.nightmare_spawn_interval;
    }
    let level = level_for(elapsed, tuning) as f32;
    (tuning.base_spawn_interval - level * tuning.spawn_interval_step).max(tuning.min_spawn_interval)
}

/// Initial falling speed for a new meteorite, before the random jitter
pub fn speed_multiplier(elapsed: f32, tuning: &Tuning) -> f32 {
    let nightmare = if elapsed >= tuning.nightmare_time {
        tuning.nightmare_speed_mult
    } else {
        1.0
    };
    let level = level_for(elapsed, tuning) as f32;
    nightmare * (1.0 + level * tuning.level_speed_step)
}

/// Advance the meteorite timer and spawn when it fires
pub fn update_meteor_timer(session: &mut GameSession, dt: f32) {
    session.meteor_timer += dt;
    if session.meteor_timer >= spawn_interval(session.elapsed as f32, &session.tuning) {
        session.meteor_timer = 0.0;
        spawn_meteorite(session);
    }
}

/// Spawn one meteorite just above a random x
pub fn spawn_meteorite(session: &mut GameSession) {
    let tuning = &session.tuning;
    let rng = &mut session.rng;

    let multi = session.elapsed >= f64::from(tuning.multi_unlock_time)
        && rng.random_bool(tuning.multi_chance);
    let x = rng.random::<f32>() * session.viewport.width;
    let vy = (tuning.meteor_base_speed + rng.random::<f32>() * tuning.meteor_speed_jitter)
        * speed_multiplier(session.elapsed as f32, tuning);

    let pos = Vec2::new(x, tuning.meteor_spawn_y);
    let meteorite = if multi {
        Meteorite::multi(pos, vy, tuning)
    } else {
        Meteorite::basic(pos, vy, tuning)
    };
    session.meteorites.push(meteorite);
}

/// Advance the UFO timer and spawn when it fires
pub fn update_ufo_timer(session: &mut GameSession, dt: f32) {
    session.ufo_timer += dt;
    if session.ufo_timer >= session.tuning.ufo_interval {
        session.ufo_timer = 0.0;
        spawn_ufo(session);
    }
}

/// Spawn a UFO just off a random side edge, flying inward
pub fn spawn_ufo(session: &mut GameSession) {
    let tuning = &session.tuning;
    let rng = &mut session.rng;

    let from_left = rng.random_bool(0.5);
    let (x, vx) = if from_left {
        (-tuning.ufo_edge_offset, tuning.ufo_speed)
    } else {
        (session.viewport.width + tuning.ufo_edge_offset, -tuning.ufo_speed)
    };
    let y = tuning.ufo_min_y + rng.random::<f32>() * tuning.ufo_y_band;

    log::debug!("UFO spawned at ({:.0}, {:.0}) vx={}", x, y, vx);
    session.ufos.push(Ufo {
        pos: Vec2::new(x, y),
        vx,
        has_dropped: false,
    });
}

/// Let UFOs over the central half of the screen drop their meteorite
pub fn drop_from_ufos(session: &mut GameSession, dt: f32) {
    let tuning = &session.tuning;
    let width = session.viewport.width;
    let (lo, hi) = (width / 4.0, width * 3.0 / 4.0);

    for ufo in session.ufos.iter_mut() {
        if ufo.has_dropped || ufo.pos.x <= lo || ufo.pos.x >= hi {
            continue;
        }
        let drop = tuning.chance_model.roll(
            &mut session.rng,
            tuning.ufo_drop_chance,
            dt,
            tuning.reference_fps,
        );
        if drop {
            ufo.has_dropped = true;
            log::debug!("UFO dropped a meteorite at x={:.0}", ufo.pos.x);
            session
                .meteorites
                .push(Meteorite::multi(ufo.pos, tuning.ufo_drop_speed, tuning));
        }
    }
}
