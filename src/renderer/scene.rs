//! Scene building
//!
//! Turns a [`GameSession`] into a flat list of colored triangles in screen
//! pixels. Pure: the same session, settings and timestamp always give the
//! same vertices, so it is tested without a GPU.

use glam::Vec2;

use super::shapes::{push_rect, push_rect_offset};
use super::vertex::{Vertex, colors, hue_color};
use crate::settings::Settings;
use crate::sim::{GameSession, MeteoriteKind};

/// Height of the HUD strip at the top of the screen
pub const HUD_HEIGHT: f32 = 60.0;
/// Max camera offset in either axis while shaking
pub const SHAKE_AMPLITUDE: f32 = 7.5;

const GRASS_HEIGHT: f32 = 10.0;
const PIP_SIZE: f32 = 16.0;
const PIP_GAP: f32 = 6.0;
const MARGIN: f32 = 12.0;

/// Cheap deterministic hash of a timestamp into [0, 1)
fn hash01(time_ms: f64, salt: u32) -> f32 {
    let t = time_ms.max(0.0) as u64 as u32;
    let h = t
        .wrapping_mul(2_654_435_761)
        .wrapping_add(salt.wrapping_mul(40_503))
        .rotate_left(13)
        .wrapping_mul(0x9e37_79b1);
    (h % 1000) as f32 / 1000.0
}

/// Camera offset for this frame
pub fn camera_offset(session: &GameSession, settings: &Settings, time_ms: f64) -> Vec2 {
    if session.camera_shake <= 0.0 || !settings.effective_screen_shake() {
        return Vec2::ZERO;
    }
    let span = SHAKE_AMPLITUDE * 2.0;
    Vec2::new(
        (hash01(time_ms, 1) - 0.5) * span,
        (hash01(time_ms, 2) - 0.5) * span,
    )
}

/// Build every vertex for one frame
pub fn build_scene(session: &GameSession, settings: &Settings, time_ms: f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(
        6 * (16 + session.villagers.len() * 4
            + session.meteorites.len() * 3
            + session.ufos.len() * 3
            + session.particles.len()),
    );
    let offset = camera_offset(session, settings, time_ms);

    draw_world(&mut out, session, offset);
    draw_villagers(&mut out, session, offset);
    draw_drill(&mut out, session, offset, time_ms);
    draw_meteorites(&mut out, session, offset);
    draw_ufos(&mut out, session, offset);
    if settings.particles {
        draw_particles(&mut out, session, offset);
    }
    draw_hud(&mut out, session, settings, time_ms);

    out
}

fn draw_world(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2) {
    let vp = session.viewport;
    let ground = session.ground_y();
    let nightmare = session.is_nightmare();
    let (sky, soil, grass) = if nightmare {
        (
            colors::SKY_NIGHTMARE,
            colors::GROUND_NIGHTMARE,
            colors::GRASS_NIGHTMARE,
        )
    } else {
        (colors::SKY, colors::GROUND, colors::GRASS)
    };

    // Sky stays put; shaken layers overdraw the edges by the amplitude
    push_rect(out, 0.0, 0.0, vp.width, vp.height, sky);
    push_rect_offset(
        out,
        offset,
        -SHAKE_AMPLITUDE,
        ground,
        vp.width + SHAKE_AMPLITUDE * 2.0,
        vp.height - ground + SHAKE_AMPLITUDE,
        soil,
    );
    push_rect_offset(
        out,
        offset,
        -SHAKE_AMPLITUDE,
        ground,
        vp.width + SHAKE_AMPLITUDE * 2.0,
        GRASS_HEIGHT,
        grass,
    );
}

fn draw_villagers(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2) {
    for v in &session.villagers {
        let (x, y) = (v.pos.x, v.pos.y);
        push_rect_offset(out, offset, x - 4.0, y - 8.0, 8.0, 12.0, hue_color(v.hue));
        push_rect_offset(out, offset, x - 4.0, y - 16.0, 8.0, 8.0, colors::VILLAGER_HEAD);
        if v.is_panicking() {
            // "!" above the head
            push_rect_offset(out, offset, x - 1.0, y - 30.0, 2.0, 7.0, colors::WHITE);
            push_rect_offset(out, offset, x - 1.0, y - 21.0, 2.0, 2.0, colors::WHITE);
        }
    }
}

fn draw_drill(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2, time_ms: f64) {
    let x = session.player_x;
    let y = session.ground_y();

    // Tiers, narrowest on top
    push_rect_offset(out, offset, x - 4.0, y - 80.0, 8.0, 20.0, colors::DRILL);
    push_rect_offset(out, offset, x - 8.0, y - 60.0, 16.0, 20.0, colors::DRILL);
    push_rect_offset(out, offset, x - 12.0, y - 40.0, 24.0, 20.0, colors::DRILL);
    push_rect_offset(out, offset, x - 16.0, y - 20.0, 32.0, 20.0, colors::DRILL_BASE);

    // Rider
    let bx = x + 16.0;
    let by = y - 40.0;
    push_rect_offset(out, offset, bx, by, 12.0, 12.0, colors::RIDER_HEAD);
    push_rect_offset(out, offset, bx, by + 12.0, 12.0, 16.0, colors::RIDER_BODY);
    push_rect_offset(out, offset, bx, by + 28.0, 12.0, 12.0, colors::RIDER_LEGS);
    push_rect_offset(out, offset, bx + 12.0, by + 12.0, 8.0, 16.0, colors::RIDER_ARM);

    let flicker = hash01(time_ms, 3);
    if flicker > 0.2 {
        push_rect_offset(
            out,
            offset,
            bx + 14.0,
            by + 28.0,
            4.0,
            8.0 + flicker * 8.0,
            colors::FLAME,
        );
    }
}

fn draw_meteorites(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2) {
    for m in &session.meteorites {
        let (x, y, r) = (m.pos.x, m.pos.y, m.radius);
        let color = hue_color(m.hue);
        push_rect_offset(out, offset, x - r + 4.0, y - r, r * 2.0 - 8.0, r * 2.0, color);
        push_rect_offset(out, offset, x - r, y - r + 4.0, r * 2.0, r * 2.0 - 8.0, color);

        if m.kind == MeteoriteKind::Multi {
            push_rect_offset(out, offset, x - 4.0, y - 4.0, 8.0, 8.0, colors::MULTI_CORE);
            // One pip per bounce left
            let n = f32::from(m.bounces_left);
            let start = x - (n * 6.0 - 2.0) / 2.0;
            for i in 0..m.bounces_left {
                let px = start + f32::from(i) * 6.0;
                push_rect_offset(out, offset, px, y - r - 8.0, 4.0, 4.0, colors::WHITE);
            }
        }
    }
}

fn draw_ufos(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2) {
    for u in &session.ufos {
        let (x, y) = (u.pos.x, u.pos.y);
        push_rect_offset(out, offset, x - 10.0, y - 15.0, 20.0, 15.0, colors::UFO_DOME);
        push_rect_offset(out, offset, x - 25.0, y, 50.0, 10.0, colors::UFO_SAUCER);
        push_rect_offset(out, offset, x - 15.0, y + 10.0, 30.0, 5.0, colors::UFO_BASE);
    }
}

fn draw_particles(out: &mut Vec<Vertex>, session: &GameSession, offset: Vec2) {
    for p in &session.particles {
        let color = colors::with_alpha(hue_color(p.hue), p.life.clamp(0.0, 1.0));
        push_rect_offset(out, offset, p.pos.x, p.pos.y, 4.0, 4.0, color);
    }
}

fn draw_hud(out: &mut Vec<Vertex>, session: &GameSession, settings: &Settings, time_ms: f64) {
    let tuning = &session.tuning;
    let width = session.viewport.width;

    push_rect(out, 0.0, 0.0, width, HUD_HEIGHT, colors::HUD_BAR);

    // Health pips, right-aligned
    let max = tuning.initial_health;
    let pips_width = f32::from(max) * (PIP_SIZE + PIP_GAP) - PIP_GAP;
    let left = width - MARGIN - pips_width;
    for i in 0..max {
        let color = if i < session.health {
            colors::HEALTH
        } else {
            colors::with_alpha(colors::HEALTH, 0.25)
        };
        let x = left + f32::from(i) * (PIP_SIZE + PIP_GAP);
        push_rect(out, x, (HUD_HEIGHT - PIP_SIZE) / 2.0, PIP_SIZE, PIP_SIZE, color);
    }

    // Level bar: progress through the current level
    let bar_width = (width / 3.0).max(0.0);
    let elapsed = session.elapsed as f32;
    let into_level = elapsed - session.level.saturating_sub(1) as f32 * tuning.level_duration;
    let level_progress = (into_level / tuning.level_duration).clamp(0.0, 1.0);
    push_rect(out, MARGIN, 14.0, bar_width, 8.0, colors::with_alpha(colors::WHITE, 0.2));
    push_rect(out, MARGIN, 14.0, bar_width * level_progress, 8.0, colors::WHITE);

    // Survival progress below it
    let survival = (elapsed / tuning.survival_time).clamp(0.0, 1.0);
    let survival_color = if session.is_nightmare() {
        colors::GROUND_NIGHTMARE
    } else {
        colors::GRASS
    };
    push_rect(out, MARGIN, 30.0, bar_width, 8.0, colors::with_alpha(survival_color, 0.2));
    push_rect(out, MARGIN, 30.0, bar_width * survival, 8.0, survival_color);

    // Blinking banner under the HUD in nightmare
    if session.is_nightmare() && settings.allow_flashing() {
        let blink = ((time_ms / 250.0) as u64) % 2 == 0;
        if blink {
            push_rect(out, 0.0, HUD_HEIGHT, width, 4.0, colors::NIGHTMARE_BANNER);
        }
    }
}
