//! End-to-end gameplay scenarios through the public simulation API

use drill_defense::sim::arbiter::apply_event;
use drill_defense::sim::physics::step_meteorites;
use drill_defense::sim::{GameSession, Meteorite, MeteoriteKind, Outcome, TickInput, tick};
use drill_defense::{Tuning, Viewport};
use glam::Vec2;

fn session(seed: u64) -> GameSession {
    GameSession::new(seed, Viewport::new(800.0, 600.0), Tuning::default())
}

#[test]
fn test_multi_meteorite_worth_650_over_its_life() {
    let mut s = session(11);
    s.player_x = 400.0;
    let tuning = s.tuning.clone();
    // Just above the drill tip (ground 400, tip 320)
    s.meteorites
        .push(Meteorite::multi(Vec2::new(400.0, 290.0), 50.0, &tuning));

    let mut bounces = 0;
    for _ in 0..100_000 {
        for event in step_meteorites(&mut s, 0.05) {
            if matches!(event, drill_defense::sim::MeteorEvent::Bounce { .. }) {
                bounces += 1;
            }
            apply_event(&mut s, event);
        }
        if s.meteorites.is_empty() {
            break;
        }
    }

    assert!(s.meteorites.is_empty(), "meteorite should be destroyed");
    assert_eq!(bounces, 3);
    assert_eq!(s.score, 3 * 50 + 500);
    assert_eq!(s.health, 5);
}

#[test]
fn test_basic_meteorite_on_drill_scores_100() {
    let mut s = session(12);
    s.player_x = 200.0;
    let tuning = s.tuning.clone();
    s.meteorites
        .push(Meteorite::basic(Vec2::new(200.0, 310.0), 100.0, &tuning));

    tick(&mut s, &TickInput::default(), 0.05);

    assert!(s.meteorites.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(s.particles.len(), 15);
}

#[test]
fn test_clear_at_survival_time() {
    let mut s = session(13);
    s.score = 1234;
    s.elapsed = 299.95;
    let tuning = s.tuning.clone();
    // Would hit the ground this frame, but the clear check runs first
    s.meteorites
        .push(Meteorite::basic(Vec2::new(50.0, 384.0), 100.0, &tuning));

    let report = tick(&mut s, &TickInput::default(), 0.1).expect("session should end");
    assert_eq!(report.outcome, Outcome::Clear);
    assert_eq!(report.time, 300);
    assert_eq!(report.score, 1234);
    assert_eq!(s.health, 5);

    // Ended sessions don't move
    assert!(tick(&mut s, &TickInput::default(), 0.1).is_none());
    assert_eq!(s.terminal, Some(report));
}

#[test]
fn test_game_over_reports_whole_seconds() {
    let mut s = session(14);
    s.elapsed = 76.5;
    s.health = 1;
    s.score = 800;
    let tuning = s.tuning.clone();
    s.meteorites
        .push(Meteorite::basic(Vec2::new(100.0, 383.0), 100.0, &tuning));

    let report = tick(&mut s, &TickInput::default(), 0.05).expect("session should end");
    assert_eq!(report.outcome, Outcome::GameOver);
    assert_eq!(report.time, 76);
    assert_eq!(report.score, 800);
    assert_eq!(s.health, 0);
}

#[test]
fn test_ground_impact_costs_one_health_and_panics_village() {
    let mut s = session(15);
    let tuning = s.tuning.clone();
    s.meteorites
        .push(Meteorite::basic(Vec2::new(100.0, 383.0), 100.0, &tuning));

    assert!(tick(&mut s, &TickInput::default(), 0.05).is_none());

    assert_eq!(s.health, 4);
    assert_eq!(s.score, 0);
    assert_eq!(s.camera_shake, 0.5);
    assert_eq!(s.particles.len(), 20);
    assert!(s.villagers.iter().all(|v| v.is_panicking()));
}

#[test]
fn test_simultaneous_impacts_stop_at_zero_health() {
    let mut s = session(16);
    s.health = 2;
    let tuning = s.tuning.clone();
    for x in [100.0, 150.0, 600.0] {
        s.meteorites
            .push(Meteorite::basic(Vec2::new(x, 383.0), 100.0, &tuning));
    }

    let report = tick(&mut s, &TickInput::default(), 0.05).expect("session should end");
    assert_eq!(report.outcome, Outcome::GameOver);
    assert_eq!(s.health, 0);
    // The third meteorite was never processed
    assert_eq!(s.meteorites.len(), 1);
}

#[test]
fn test_ufo_drops_one_multi_meteorite() {
    let tuning = Tuning {
        ufo_drop_chance: 1.0,
        ..Tuning::default()
    };
    let mut s = GameSession::new(17, Viewport::new(800.0, 600.0), tuning);
    s.ufos.push(drill_defense::sim::Ufo {
        pos: Vec2::new(390.0, 120.0),
        vx: 100.0,
        has_dropped: false,
    });

    for _ in 0..10 {
        tick(&mut s, &TickInput::default(), 0.02);
    }

    let drops: Vec<_> = s
        .meteorites
        .iter()
        .filter(|m| m.kind == MeteoriteKind::Multi)
        .collect();
    assert_eq!(drops.len(), 1);
    assert!(s.ufos[0].has_dropped);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut s = session(seed);
        let input = TickInput {
            player_x: Some(250.0),
            viewport: None,
        };
        for _ in 0..3000 {
            if tick(&mut s, &input, 1.0 / 60.0).is_some() {
                break;
            }
        }
        (
            s.score,
            s.health,
            s.elapsed,
            s.meteorites.len(),
            s.ufos.len(),
            s.villagers.iter().map(|v| v.pos.x).collect::<Vec<_>>(),
        )
    };

    assert_eq!(run(2024), run(2024));
}
