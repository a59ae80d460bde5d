//! Per-frame integration for every entity pool
//!
//! Each pool is updated and compacted in a single `retain_mut` pass.
//! Meteorite collisions don't touch the scoreboard directly; they report
//! [`MeteorEvent`]s that the arbiter applies afterwards.

use glam::Vec2;

use super::collision::{circle_rect_overlap, outside_horizontal, touches_ground};
use super::state::{GameSession, Hue, MeteoriteKind};

/// Something a meteorite did this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeteorEvent {
    /// Multi meteorite bounced off the drill
    Bounce { pos: Vec2, hue: Hue },
    /// Drill destroyed the meteorite
    Destroyed { pos: Vec2, hue: Hue, points: u64 },
    /// Meteorite hit the ground at `x`
    GroundImpact { x: f32, hue: Hue },
}

/// Move meteorites, resolve drill and ground collisions, prune the pool
///
/// Processing halts after the ground impact that would empty the health
/// bar; meteorites after it are left untouched for that frame.
pub fn step_meteorites(session: &mut GameSession, dt: f32) -> Vec<MeteorEvent> {
    let hitbox = session.drill_hitbox();
    let ground = session.ground_y();
    let tuning = &session.tuning;
    let viewport = session.viewport;
    let impacts_allowed = session.health as u32;

    let mut events = Vec::new();
    let mut impacts = 0u32;
    let mut halted = false;

    session.meteorites.retain_mut(|m| {
        if halted {
            return true;
        }

        // Gravity only pulls back meteorites flying up after a bounce
        if m.vy < 0.0 {
            m.vy += tuning.gravity * dt;
        }
        m.pos.y += m.vy * dt;

        // Only falling meteorites can hit, so a bounce can't re-trigger at once
        if m.is_falling() && circle_rect_overlap(m.pos, m.radius, &hitbox) {
            if m.kind == MeteoriteKind::Multi && m.bounces_left > 0 {
                m.bounces_left -= 1;
                m.vy = -tuning.bounce_speed;
                events.push(MeteorEvent::Bounce {
                    pos: m.pos,
                    hue: m.hue,
                });
            } else {
                events.push(MeteorEvent::Destroyed {
                    pos: m.pos,
                    hue: m.hue,
                    points: m.destroy_score(tuning),
                });
                return false;
            }
        }

        if touches_ground(m.pos, m.radius, ground) {
            events.push(MeteorEvent::GroundImpact {
                x: m.pos.x,
                hue: m.hue,
            });
            impacts += 1;
            if impacts >= impacts_allowed {
                halted = true;
            }
            return false;
        }

        // Vertical bound only; x never changes, so meteorites left past the
        // edge by a resize still land
        if m.pos.y - m.radius > viewport.height + tuning.meteor_despawn_margin {
            log::debug!("Discarding stray meteorite at ({:.0}, {:.0})", m.pos.x, m.pos.y);
            return false;
        }

        true
    });

    events
}

/// Fly UFOs sideways and drop the ones well past either edge
pub fn step_ufos(session: &mut GameSession, dt: f32) {
    let width = session.viewport.width;
    let margin = session.tuning.ufo_despawn_margin;

    session.ufos.retain_mut(|ufo| {
        ufo.pos.x += ufo.vx * dt;
        !outside_horizontal(ufo.pos.x, width, margin)
    });
}

/// Move particles and expire dead ones
pub fn step_particles(session: &mut GameSession, dt: f32) {
    session.particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        p.life > 0.0
    });
}

/// Walk villagers, faster and more erratic while panicking
pub fn step_villagers(session: &mut GameSession, dt: f32) {
    let tuning = &session.tuning;
    let width = session.viewport.width;
    let rng = &mut session.rng;

    for v in session.villagers.iter_mut() {
        let (speed, flip_chance) = if v.is_panicking() {
            v.panic = (v.panic - dt).max(0.0);
            (v.vx * tuning.panic_speed_mult, tuning.panic_flip_chance)
        } else {
            (v.vx, tuning.calm_flip_chance)
        };
        v.pos.x += speed * dt;

        if tuning
            .chance_model
            .roll(rng, flip_chance, dt, tuning.reference_fps)
        {
            v.vx = -v.vx;
        }

        // Bounce off the screen edges
        if v.pos.x < 0.0 {
            v.pos.x = 0.0;
            v.vx = -v.vx;
        }
        if v.pos.x > width {
            v.pos.x = width;
            v.vx = -v.vx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::state::{Meteorite, Particle, Ufo};
    use crate::tuning::Tuning;

    fn session() -> GameSession {
        let mut s = GameSession::new(5, Viewport::new(800.0, 600.0), Tuning::default());
        s.player_x = 400.0;
        s
    }

    /// Multi meteorite resting just above the drill top (y = 320), falling
    fn multi_on_drill(s: &GameSession) -> Meteorite {
        Meteorite::multi(Vec2::new(400.0, 305.0), 10.0, &s.tuning)
    }

    #[test]
    fn test_gravity_only_when_rising() {
        let mut s = session();
        s.meteorites
            .push(Meteorite::basic(Vec2::new(50.0, 0.0), 100.0, &s.tuning));
        s.meteorites
            .push(Meteorite::basic(Vec2::new(60.0, 100.0), -200.0, &s.tuning));
        let events = step_meteorites(&mut s, 0.1);
        assert!(events.is_empty());

        assert_eq!(s.meteorites[0].vy, 100.0);
        assert!((s.meteorites[0].pos.y - 10.0).abs() < 1e-4);
        // -200 + 400 * 0.1 = -160, then moves up 16
        assert!((s.meteorites[1].vy - -160.0).abs() < 1e-4);
        assert!((s.meteorites[1].pos.y - 84.0).abs() < 1e-4);
    }

    #[test]
    fn test_basic_hit_destroys_and_scores() {
        let mut s = session();
        s.meteorites
            .push(Meteorite::basic(Vec2::new(400.0, 305.0), 10.0, &s.tuning));
        let events = step_meteorites(&mut s, 0.016);
        assert!(s.meteorites.is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MeteorEvent::Destroyed { points: 100, .. }
        ));
    }

    #[test]
    fn test_multi_bounces_then_breaks() {
        let mut s = session();
        let m = multi_on_drill(&s);
        s.meteorites.push(m);

        for expected_left in [2u8, 1, 0] {
            let events = step_meteorites(&mut s, 0.016);
            assert_eq!(events.len(), 1);
            assert!(matches!(events[0], MeteorEvent::Bounce { .. }));
            assert_eq!(s.meteorites[0].bounces_left, expected_left);
            assert_eq!(s.meteorites[0].vy, -350.0);

            // Put it back on the drill, falling again
            s.meteorites[0].pos.y = 305.0;
            s.meteorites[0].vy = 10.0;
        }

        let events = step_meteorites(&mut s, 0.016);
        assert!(matches!(
            events[0],
            MeteorEvent::Destroyed { points: 500, .. }
        ));
        assert!(s.meteorites.is_empty());
    }

    #[test]
    fn test_rising_meteorite_passes_through_drill() {
        let mut s = session();
        let mut m = multi_on_drill(&s);
        m.vy = -350.0;
        s.meteorites.push(m);
        let events = step_meteorites(&mut s, 0.016);
        assert!(events.is_empty());
        assert_eq!(s.meteorites[0].bounces_left, 3);
    }

    #[test]
    fn test_ground_impact_removes_meteorite() {
        let mut s = session();
        // Far from the drill, about to land (ground at 400)
        s.meteorites
            .push(Meteorite::basic(Vec2::new(100.0, 380.0), 100.0, &s.tuning));
        let events = step_meteorites(&mut s, 0.1);
        assert_eq!(
            events,
            vec![MeteorEvent::GroundImpact {
                x: 100.0,
                hue: Hue::Red
            }]
        );
        assert!(s.meteorites.is_empty());
    }

    #[test]
    fn test_fatal_impact_halts_remaining() {
        let mut s = session();
        s.health = 1;
        s.meteorites
            .push(Meteorite::basic(Vec2::new(100.0, 390.0), 100.0, &s.tuning));
        s.meteorites
            .push(Meteorite::basic(Vec2::new(200.0, 390.0), 100.0, &s.tuning));
        let events = step_meteorites(&mut s, 0.016);
        assert_eq!(events.len(), 1);
        // Second meteorite untouched
        assert_eq!(s.meteorites.len(), 1);
        assert_eq!(s.meteorites[0].pos, Vec2::new(200.0, 390.0));
    }

    #[test]
    fn test_meteorite_below_screen_discarded() {
        let mut s = session();
        s.meteorites
            .push(Meteorite::basic(Vec2::new(100.0, 720.0), 10.0, &s.tuning));
        let events = step_meteorites(&mut s, 0.016);
        assert!(events.is_empty());
        assert!(s.meteorites.is_empty());
    }

    #[test]
    fn test_meteorite_past_edge_after_shrink_still_lands() {
        let mut s = session();
        s.meteorites
            .push(Meteorite::basic(Vec2::new(700.0, 100.0), 100.0, &s.tuning));
        s.set_viewport(Viewport::new(400.0, 600.0));

        let mut events = Vec::new();
        for _ in 0..100 {
            events = step_meteorites(&mut s, 0.05);
            if s.meteorites.is_empty() {
                break;
            }
        }
        assert_eq!(
            events,
            vec![MeteorEvent::GroundImpact {
                x: 700.0,
                hue: Hue::Red
            }]
        );
    }

    #[test]
    fn test_ufos_pruned_past_margin() {
        let mut s = session();
        s.ufos.push(Ufo {
            pos: Vec2::new(895.0, 100.0),
            vx: 100.0,
            has_dropped: false,
        });
        s.ufos.push(Ufo {
            pos: Vec2::new(-50.0, 100.0),
            vx: 100.0,
            has_dropped: false,
        });
        step_ufos(&mut s, 0.1);
        assert_eq!(s.ufos.len(), 1);
        assert!((s.ufos[0].pos.x - -40.0).abs() < 1e-4);
    }

    #[test]
    fn test_particles_expire() {
        let mut s = session();
        s.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, -10.0),
            life: 0.15,
            hue: Hue::Red,
        });
        step_particles(&mut s, 0.1);
        assert_eq!(s.particles.len(), 1);
        assert!((s.particles[0].pos.x - 1.0).abs() < 1e-4);
        step_particles(&mut s, 0.1);
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_villager_wall_bounce() {
        let mut s = session();
        s.tuning.calm_flip_chance = 0.0;
        s.villagers.truncate(1);
        s.villagers[0].pos.x = 0.5;
        s.villagers[0].vx = -10.0;
        step_villagers(&mut s, 0.1);
        assert_eq!(s.villagers[0].pos.x, 0.0);
        assert_eq!(s.villagers[0].vx, 10.0);
    }

    #[test]
    fn test_panicked_villager_runs_faster() {
        let mut s = session();
        s.tuning.panic_flip_chance = 0.0;
        s.villagers.truncate(1);
        s.villagers[0].pos.x = 400.0;
        s.villagers[0].vx = 10.0;
        s.villagers[0].panic = 2.0;
        step_villagers(&mut s, 0.1);
        assert!((s.villagers[0].pos.x - 403.0).abs() < 1e-4);
        assert!((s.villagers[0].panic - 1.9).abs() < 1e-4);
    }
}
