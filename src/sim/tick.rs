//! Per-frame simulation step
//!
//! Order within a frame: clock, win check, spawners, UFOs, meteorites
//! (with score/health arbitration), particles, villagers.

use super::arbiter::{apply_event, check_clear, check_game_over};
use super::physics::{step_meteorites, step_particles, step_ufos, step_villagers};
use super::spawner::{drop_from_ufos, level_for, update_meteor_timer, update_ufo_timer};
use super::state::{GameSession, Terminal};
use crate::Viewport;

/// Input sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer x in viewport pixels (None = unchanged)
    pub player_x: Option<f32>,
    /// Current viewport if it changed since the last frame
    pub viewport: Option<Viewport>,
}

/// Advance the session by `dt` seconds
///
/// Returns the terminal report on the frame the session ends. Once ended,
/// further calls do nothing.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> Option<Terminal> {
    if !session.is_running() {
        return None;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, session.tuning.max_frame_dt)
    } else {
        0.0
    };

    if let Some(viewport) = input.viewport {
        session.set_viewport(viewport);
    }
    if let Some(x) = input.player_x {
        session.player_x = x;
    }

    session.elapsed += f64::from(dt);
    session.level = level_for(session.elapsed as f32, &session.tuning);

    if session.is_nightmare() && !session.nightmare_announced {
        session.nightmare_announced = true;
        log::info!("Nightmare phase at {:.1}s (score {})", session.elapsed, session.score);
    }

    if let Some(report) = check_clear(session) {
        return Some(report);
    }

    if session.camera_shake > 0.0 {
        session.camera_shake = (session.camera_shake - dt).max(0.0);
    }

    update_ufo_timer(session, dt);
    update_meteor_timer(session, dt);

    step_ufos(session, dt);
    drop_from_ufos(session, dt);

    for event in step_meteorites(session, dt) {
        apply_event(session, event);
    }
    if let Some(report) = check_game_over(session) {
        return Some(report);
    }

    step_particles(session, dt);
    step_villagers(session, dt);

    None
}
