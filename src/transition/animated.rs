use crate::render::Color;

use super::Stage;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    start_ms: f64,
    stage: Stage,
}

/// Numeric attribute with at most one pending tween.
///
/// Scheduling a new tween interrupts the previous one: the new tween starts
/// from whatever value was current when it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated {
    value: f64,
    tween: Option<Tween>,
}

impl Animated {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value, tween: None }
    }

    /// Value as of the last `advance`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value once every pending tween has completed.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.tween.map_or(self.value, |tween| tween.to)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Jumps to `value`, dropping any pending tween.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.tween = None;
    }

    /// Schedules a tween toward `to` within `stage` of a render issued at `render_ms`.
    pub fn animate_to(&mut self, to: f64, render_ms: f64, stage: Stage) {
        self.tween = Some(Tween {
            from: self.value,
            to,
            start_ms: stage.start_at(render_ms),
            stage,
        });
    }

    /// Updates the current value for clock time `now_ms`.
    pub fn advance(&mut self, now_ms: f64) {
        let Some(tween) = self.tween else {
            return;
        };
        if now_ms < tween.start_ms {
            self.value = tween.from;
            return;
        }
        let elapsed = now_ms - tween.start_ms;
        if elapsed >= tween.stage.duration_ms {
            self.value = tween.to;
            self.tween = None;
            return;
        }
        let t = tween.stage.ease.apply(elapsed / tween.stage.duration_ms);
        self.value = tween.from + (tween.to - tween.from) * t;
    }

    /// Freezes at the current value.
    pub fn interrupt(&mut self) {
        self.tween = None;
    }

    pub fn finish(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.value = tween.to;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PaintTween {
    from: Option<String>,
    to: Option<String>,
    start_ms: f64,
    stage: Stage,
}

/// Fill value that interpolates in RGB when both ends parse as colors and
/// otherwise switches when its stage begins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimatedPaint {
    value: Option<String>,
    tween: Option<PaintTween>,
}

impl AnimatedPaint {
    #[must_use]
    pub fn new(value: Option<String>) -> Self {
        Self { value, tween: None }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.tween {
            Some(tween) => tween.to.as_deref(),
            None => self.value.as_deref(),
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn animate_to(&mut self, to: Option<String>, render_ms: f64, stage: Stage) {
        if self.tween.is_none() && self.value == to {
            return;
        }
        self.tween = Some(PaintTween {
            from: self.value.clone(),
            to,
            start_ms: stage.start_at(render_ms),
            stage,
        });
    }

    pub fn advance(&mut self, now_ms: f64) {
        let Some(tween) = &self.tween else {
            return;
        };
        if now_ms < tween.start_ms {
            return;
        }
        let elapsed = now_ms - tween.start_ms;
        if elapsed >= tween.stage.duration_ms {
            self.finish();
            return;
        }

        let endpoints = tween
            .from
            .as_deref()
            .and_then(Color::parse_css)
            .zip(tween.to.as_deref().and_then(Color::parse_css));
        self.value = match endpoints {
            Some((from, to)) => {
                let t = tween.stage.ease.apply(elapsed / tween.stage.duration_ms);
                Some(from.lerp(to, t).to_css_hex())
            }
            None => tween.to.clone(),
        };
    }

    pub fn interrupt(&mut self) {
        self.tween = None;
    }

    pub fn finish(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.value = tween.to;
        }
    }
}
