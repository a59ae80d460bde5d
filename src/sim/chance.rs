//! Random event rates
//!
//! Some events were balanced as "N% per rendered frame". [`ChanceModel`]
//! decides whether that stays frame-coupled or is converted to a
//! frame-rate independent rate.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a per-frame probability is applied to a step of length `dt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChanceModel {
    /// Roll the raw probability once per step, whatever the step length
    PerFrame,
    /// Treat the probability as balanced at the reference frame rate and
    /// scale it to `dt` (Poisson process)
    #[default]
    PerSecond,
}

impl ChanceModel {
    /// Probability that the event fires during a step of `dt` seconds
    pub fn step_probability(self, per_frame: f64, dt: f32, reference_fps: f32) -> f64 {
        let per_frame = per_frame.clamp(0.0, 1.0);
        match self {
            ChanceModel::PerFrame => per_frame,
            ChanceModel::PerSecond => {
                if per_frame >= 1.0 {
                    return 1.0;
                }
                if dt <= 0.0 {
                    return 0.0;
                }
                // Rate λ such that 1 - e^(-λ/fps) == per_frame
                let rate = -(1.0 - per_frame).ln() * reference_fps as f64;
                1.0 - (-rate * dt as f64).exp()
            }
        }
    }

    /// Roll the event for one step
    pub fn roll<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        per_frame: f64,
        dt: f32,
        reference_fps: f32,
    ) -> bool {
        let p = self.step_probability(per_frame, dt, reference_fps);
        p > 0.0 && rng.random_bool(p.min(1.0))
    }
}
