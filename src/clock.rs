//! Frame clock
//!
//! Converts high-resolution frame timestamps (milliseconds) into a bounded
//! delta-time so a stalled tab can't fling entities through collision checks.

use crate::consts::MAX_FRAME_DT;

/// Delta-time in seconds between two millisecond timestamps, clamped to
/// `[0, max_dt]`. Non-finite input yields 0.
#[inline]
pub fn frame_dt(prev_ms: f64, now_ms: f64, max_dt: f32) -> f32 {
    let dt = ((now_ms - prev_ms) / 1000.0) as f32;
    if dt.is_finite() {
        dt.clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    }
}

/// Remembers the previous frame timestamp
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Advance to `now_ms` and return the bounded delta. The first call
    /// after construction or [`FrameClock::reset`] returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(prev) => frame_dt(prev, now_ms, self.max_dt),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (new session)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Start counting from `now_ms` without producing a delta
    pub fn prime(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dt_normal_frame() {
        let dt = frame_dt(1000.0, 1016.0, MAX_FRAME_DT);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_frame_dt_caps_stalls() {
        // Tab backgrounded for 5 seconds
        assert_eq!(frame_dt(0.0, 5000.0, MAX_FRAME_DT), MAX_FRAME_DT);
    }

    #[test]
    fn test_frame_dt_never_negative() {
        assert_eq!(frame_dt(2000.0, 1000.0, MAX_FRAME_DT), 0.0);
        assert_eq!(frame_dt(0.0, f64::NAN, MAX_FRAME_DT), 0.0);
    }

    #[test]
    fn test_clock_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(12345.0), 0.0);
        let dt = clock.advance(12395.0);
        assert!((dt - 0.05).abs() < 1e-6);

        clock.reset();
        assert_eq!(clock.advance(99999.0), 0.0);
    }

    #[test]
    fn test_clock_prime() {
        let mut clock = FrameClock::default();
        clock.prime(100.0);
        assert!((clock.advance(120.0) - 0.02).abs() < 1e-6);
    }
}
