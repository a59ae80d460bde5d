//! Score, health and terminal outcome bookkeeping
//!
//! The only code that writes `score`, `health` or `terminal`. Score never
//! decreases and health never increases within a session.

use glam::Vec2;

use super::physics::MeteorEvent;
use super::state::{GameSession, Outcome, Terminal, emit_particles};

/// Apply one meteorite event to the scoreboard and effects
pub fn apply_event(session: &mut GameSession, event: MeteorEvent) {
    let count = match event {
        MeteorEvent::Bounce { .. } => session.tuning.bounce_particles,
        MeteorEvent::Destroyed { .. } => session.tuning.hit_particles,
        MeteorEvent::GroundImpact { .. } => session.tuning.ground_particles,
    };

    let (pos, hue) = match event {
        MeteorEvent::Bounce { pos, hue } => {
            let points = session.tuning.bounce_score;
            award(session, points);
            (pos, hue)
        }
        MeteorEvent::Destroyed { pos, hue, points } => {
            award(session, points);
            (pos, hue)
        }
        MeteorEvent::GroundImpact { x, hue } => {
            ground_impact(session);
            (Vec2::new(x, session.ground_y()), hue)
        }
    };

    emit_particles(
        &mut session.particles,
        &mut session.rng,
        &session.tuning,
        pos,
        hue,
        count,
    );
}

/// Add points
#[inline]
pub fn award(session: &mut GameSession, points: u64) {
    session.score = session.score.saturating_add(points);
}

/// A meteorite reached the ground: lose health, shake, panic the village
pub fn ground_impact(session: &mut GameSession) {
    session.health = session.health.saturating_sub(1);
    session.camera_shake = session.tuning.shake_duration;
    let panic = session.tuning.panic_duration;
    for v in session.villagers.iter_mut() {
        v.panic = panic;
    }
    log::debug!("Ground impact, health now {}", session.health);
}

/// Check the win condition; returns the report if the session just cleared
pub fn check_clear(session: &mut GameSession) -> Option<Terminal> {
    if session.elapsed >= f64::from(session.tuning.survival_time) {
        finish(session, Outcome::Clear)
    } else {
        None
    }
}

/// Check the lose condition; returns the report if the session just ended
pub fn check_game_over(session: &mut GameSession) -> Option<Terminal> {
    if session.health == 0 {
        finish(session, Outcome::GameOver)
    } else {
        None
    }
}

/// Record the terminal report. Only the first call has any effect.
pub fn finish(session: &mut GameSession, outcome: Outcome) -> Option<Terminal> {
    if session.terminal.is_some() {
        return None;
    }
    let report = Terminal {
        outcome,
        score: session.score,
        time: session.survival_seconds(),
    };
    log::info!(
        "Session {:?}: score {} after {}s (seed {})",
        outcome,
        report.score,
        report.time,
        session.seed
    );
    session.terminal = Some(report);
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::state::Hue;
    use crate::tuning::Tuning;

    fn session() -> GameSession {
        GameSession::new(11, Viewport::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_bounce_event_scores_and_sparks() {
        let mut s = session();
        apply_event(
            &mut s,
            MeteorEvent::Bounce {
                pos: Vec2::new(10.0, 10.0),
                hue: Hue::Purple,
            },
        );
        assert_eq!(s.score, 50);
        assert_eq!(s.particles.len(), 5);
    }

    #[test]
    fn test_destroyed_event_scores_and_sparks() {
        let mut s = session();
        apply_event(
            &mut s,
            MeteorEvent::Destroyed {
                pos: Vec2::ZERO,
                hue: Hue::Red,
                points: 100,
            },
        );
        assert_eq!(s.score, 100);
        assert_eq!(s.particles.len(), 15);
    }

    #[test]
    fn test_ground_impact_effects() {
        let mut s = session();
        apply_event(
            &mut s,
            MeteorEvent::GroundImpact {
                x: 123.0,
                hue: Hue::Red,
            },
        );
        assert_eq!(s.health, 4);
        assert_eq!(s.camera_shake, 0.5);
        assert_eq!(s.particles.len(), 20);
        assert!(s.particles.iter().all(|p| p.pos == Vec2::new(123.0, 400.0)));
        assert!(s.villagers.iter().all(|v| v.panic == 2.0));
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_finish_only_once() {
        let mut s = session();
        s.elapsed = 42.7;
        s.score = 900;
        let report = finish(&mut s, Outcome::GameOver).unwrap();
        assert_eq!(report.time, 42);
        assert_eq!(report.score, 900);
        assert!(finish(&mut s, Outcome::Clear).is_none());
        assert_eq!(s.terminal.unwrap().outcome, Outcome::GameOver);
    }

    #[test]
    fn test_health_never_underflows() {
        let mut s = session();
        for _ in 0..10 {
            ground_impact(&mut s);
        }
        assert_eq!(s.health, 0);
        assert!(check_game_over(&mut s).is_some());
    }
}
