//! Phase state machine and session lifecycle
//!
//! `Menu -> Playing -> {GameOver, Clear} -> Playing -> ...`
//!
//! [`Game`] owns the current [`GameSession`], the frame clock and the input
//! port. The surrounding UI calls [`Game::start`] / [`Game::reset`], drives
//! [`Game::frame`] once per animation frame and reads [`Game::result`] when
//! the loop stops.

use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::clock::FrameClock;
use crate::platform::{InputPort, StartError};
use crate::sim::{GameSession, Outcome, Terminal, TickInput, tick};
use crate::tuning::Tuning;

/// Top-level session status shared with the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Menu,
    Playing,
    GameOver,
    Clear,
}

impl From<Outcome> for Phase {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clear => Phase::Clear,
            Outcome::GameOver => Phase::GameOver,
        }
    }
}

/// Final score and survival time, written once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub phase: Phase,
    pub score: u64,
    /// Whole seconds survived
    pub time: u32,
}

impl From<Terminal> for SessionResult {
    fn from(t: Terminal) -> Self {
        Self {
            phase: t.outcome.into(),
            score: t.score,
            time: t.time,
        }
    }
}

/// Whether the frame loop should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Drives one session at a time
#[derive(Debug)]
pub struct Game {
    phase: Phase,
    session: Option<GameSession>,
    clock: FrameClock,
    input: InputPort,
    tuning: Tuning,
    viewport: Viewport,
    player_x: f32,
    result: Option<SessionResult>,
}

impl Game {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: Phase::Menu,
            session: None,
            clock: FrameClock::new(tuning.max_frame_dt),
            input: InputPort::new(),
            tuning,
            viewport: Viewport::default(),
            player_x: 0.0,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current (or last finished) session, for rendering
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Final score/time of the last finished session
    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    /// Handle for input callbacks to post pointer positions into
    pub fn input_port(&self) -> InputPort {
        self.input.clone()
    }

    /// Build a fresh session and enter `Playing`
    ///
    /// Any previous session is discarded.
    pub fn start(&mut self, seed: u64, viewport: Viewport) -> Result<(), StartError> {
        if !viewport.is_valid() {
            return Err(StartError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.session = Some(GameSession::new(seed, viewport, self.tuning.clone()));
        self.viewport = viewport;
        self.player_x = viewport.width / 2.0;
        self.clock = FrameClock::new(self.tuning.max_frame_dt);
        self.input.clear();
        self.result = None;
        self.phase = Phase::Playing;

        log::info!(
            "Session started (seed {}, {}x{})",
            seed,
            viewport.width,
            viewport.height
        );
        Ok(())
    }

    /// Retry / play again: same as [`Game::start`]
    pub fn reset(&mut self, seed: u64, viewport: Viewport) -> Result<(), StartError> {
        self.start(seed, viewport)
    }

    /// Run one frame at `now_ms`
    ///
    /// `viewport` is the current canvas size; pass it every frame, resizes
    /// are detected here.
    pub fn frame(&mut self, now_ms: f64, viewport: Viewport) -> LoopControl {
        if self.phase != Phase::Playing {
            return LoopControl::Stop;
        }
        let Some(session) = self.session.as_mut() else {
            return LoopControl::Stop;
        };

        let dt = self.clock.advance(now_ms);

        let resized = viewport.is_valid() && viewport != self.viewport;
        if resized {
            self.viewport = viewport;
            // Keep the drill on screen after shrinking
            if self.player_x > viewport.width {
                self.player_x = viewport.width / 2.0;
            }
        }
        if let Some(x) = self.input.take() {
            self.player_x = x;
        }

        let input = TickInput {
            player_x: Some(self.player_x),
            viewport: resized.then_some(viewport),
        };

        match tick(session, &input, dt) {
            Some(report) => {
                let result = SessionResult::from(report);
                self.result = Some(result);
                self.phase = result.phase;
                LoopControl::Stop
            }
            None => LoopControl::Continue,
        }
    }
}
