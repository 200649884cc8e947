//! Time-deferred attribute animation driven by an explicit chart clock.
//!
//! Rendering schedules tweens relative to the chart's current time and returns
//! immediately; hosts advance the clock with `tick` from their frame loop.

mod animated;

pub use animated::{Animated, AnimatedPaint};

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    QuadInOut,
    CubicInOut,
}

impl Ease {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// One transition slot: starts `delay_ms` after the render, runs `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Stage {
    #[must_use]
    pub const fn new(delay_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            delay_ms,
            duration_ms,
            ease,
        }
    }

    #[must_use]
    pub fn start_at(&self, render_ms: f64) -> f64 {
        render_ms + self.delay_ms
    }

    #[must_use]
    pub fn end_at(&self, render_ms: f64) -> f64 {
        self.start_at(render_ms) + self.duration_ms
    }
}

/// The three back-to-back stages every render runs through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagedTransitions {
    /// Leaving shapes shrink to their neutral geometry, then are removed.
    pub remove: Stage,
    /// Surviving and entering shapes move into place.
    pub position: Stage,
    /// Shapes grow to their final size and take their fill.
    pub size: Stage,
}

pub const STAGE_DURATION_MS: f64 = 300.0;

impl StagedTransitions {
    /// Linear stages of `STAGE_DURATION_MS`, each delayed by the previous ones.
    #[must_use]
    pub const fn standard() -> Self {
        Self::uniform(STAGE_DURATION_MS, Ease::Linear)
    }

    #[must_use]
    pub const fn uniform(duration_ms: f64, ease: Ease) -> Self {
        Self {
            remove: Stage::new(0.0, duration_ms, ease),
            position: Stage::new(duration_ms, duration_ms, ease),
            size: Stage::new(duration_ms * 2.0, duration_ms, ease),
        }
    }

    /// Stages that complete on the next clock tick.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::uniform(0.0, Ease::Linear)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.remove
            .end_at(0.0)
            .max(self.position.end_at(0.0))
            .max(self.size.end_at(0.0))
    }
}

impl Default for StagedTransitions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Monotonic animation clock in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    now_ms: f64,
}

impl Clock {
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Moves the clock forward; negative or non-finite steps are ignored.
    pub fn advance(&mut self, elapsed_ms: f64) -> f64 {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.now_ms += elapsed_ms;
        }
        self.now_ms
    }
}
