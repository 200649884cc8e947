use serde::{Deserialize, Serialize};

use crate::core::ticks::{self, DEFAULT_TICK_COUNT};
use crate::error::{ChartError, ChartResult};

/// Interpolation family of a continuous scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Linear,
    /// Power scale with exponent 0.5; maps values to area-proportional radii.
    Sqrt,
    Pow {
        exponent: f64,
    },
    /// Logarithmic scale; the domain must not include or cross zero.
    Log {
        base: f64,
    },
}

impl ScaleType {
    /// Checks the type's own parameters; domain compatibility is checked by the scale.
    pub fn validate(self) -> ChartResult<()> {
        match self {
            Self::Linear | Self::Sqrt => Ok(()),
            Self::Pow { exponent } => {
                if !exponent.is_finite() || exponent <= 0.0 {
                    return Err(ChartError::InvalidDomain(format!(
                        "pow exponent must be finite and > 0, got {exponent}"
                    )));
                }
                Ok(())
            }
            Self::Log { base } => {
                if !base.is_finite() || base <= 0.0 || base == 1.0 {
                    return Err(ChartError::InvalidDomain(format!(
                        "log base must be finite, > 0 and != 1, got {base}"
                    )));
                }
                Ok(())
            }
        }
    }

    fn exponent(self) -> Option<f64> {
        match self {
            Self::Sqrt => Some(0.5),
            Self::Pow { exponent } => Some(exponent),
            Self::Linear | Self::Log { .. } => None,
        }
    }
}

/// Continuous mapping from a data domain to a pixel range.
///
/// Values are mapped linearly in transformed space (`x`, `sign(x)|x|^k`, or
/// `log_b x`), so padding computed by inverting pixel offsets is exact for all
/// scale types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    kind: ScaleType,
    domain: (f64, f64),
    range: (f64, f64),
    #[serde(default)]
    reflect: bool,
}

impl ContinuousScale {
    pub fn new(kind: ScaleType, domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        kind.validate()?;
        validate_pair(domain, "domain").map_err(ChartError::InvalidDomain)?;
        validate_pair(range, "range").map_err(ChartError::InvalidRange)?;

        let mut reflect = false;
        if let ScaleType::Log { .. } = kind {
            if domain.0 > 0.0 && domain.1 > 0.0 {
                reflect = false;
            } else if domain.0 < 0.0 && domain.1 < 0.0 {
                reflect = true;
            } else {
                return Err(ChartError::InvalidDomain(format!(
                    "log domain must not include or cross zero, got [{}, {}]",
                    domain.0, domain.1
                )));
            }
        }

        Ok(Self {
            kind,
            domain,
            range,
            reflect,
        })
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Self::new(ScaleType::Linear, domain, range)
    }

    #[must_use]
    pub fn kind(&self) -> ScaleType {
        self.kind
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    fn transform(&self, value: f64) -> f64 {
        match self.kind {
            ScaleType::Linear => value,
            ScaleType::Sqrt | ScaleType::Pow { .. } => {
                let exponent = self.kind.exponent().unwrap_or(1.0);
                value.signum() * value.abs().powf(exponent)
            }
            ScaleType::Log { base } => {
                if self.reflect {
                    -log_base(-value, base)
                } else {
                    log_base(value, base)
                }
            }
        }
    }

    fn untransform(&self, value: f64) -> f64 {
        match self.kind {
            ScaleType::Linear => value,
            ScaleType::Sqrt | ScaleType::Pow { .. } => {
                let exponent = self.kind.exponent().unwrap_or(1.0);
                value.signum() * value.abs().powf(exponent.recip())
            }
            ScaleType::Log { base } => {
                if self.reflect {
                    -base.powf(-value)
                } else {
                    base.powf(value)
                }
            }
        }
    }

    /// Maps a domain value to the range.
    ///
    /// A degenerate domain maps every value to the middle of the range.
    /// The result may be non-finite for values outside a log scale's support.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let t0 = self.transform(self.domain.0);
        let t1 = self.transform(self.domain.1);
        let (r0, r1) = self.range;
        let span = t1 - t0;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (self.transform(value) - t0) / span * (r1 - r0)
    }

    /// Maps a domain value to the range, rejecting values the scale cannot represent.
    pub fn scale_checked(&self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "value must be finite, got {value}"
            )));
        }
        let pixel = self.scale(value);
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "value {value} is outside the support of a {:?} scale",
                self.kind
            )));
        }
        Ok(pixel)
    }

    /// Maps a range value back to the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let t0 = self.transform(self.domain.0);
        let t1 = self.transform(self.domain.1);
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (pixel - r0) / span
        };
        self.untransform(t0 + normalized * (t1 - t0))
    }

    /// Tick values spread over the domain; `None` asks for the default count.
    #[must_use]
    pub fn ticks(&self, count: Option<usize>) -> Vec<f64> {
        let count = count.unwrap_or(DEFAULT_TICK_COUNT);
        match self.kind {
            ScaleType::Log { base } => self.log_ticks(base, count),
            _ => ticks::ticks(self.domain.0, self.domain.1, count),
        }
    }

    /// Spacing between adjacent linear ticks; drives default label precision.
    #[must_use]
    pub fn tick_step(&self, count: Option<usize>) -> f64 {
        ticks::tick_step(
            self.domain.0,
            self.domain.1,
            count.unwrap_or(DEFAULT_TICK_COUNT),
        )
    }

    fn log_ticks(&self, base: f64, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (mut lo, mut hi) = (d0.min(d1), d0.max(d1));
        if self.reflect {
            (lo, hi) = (-hi, -lo);
        }
        let i = log_base(lo, base).floor();
        let j = log_base(hi, base).ceil();
        let sign = if self.reflect { -1.0 } else { 1.0 };

        let mut values = Vec::new();
        if j - i < count as f64 {
            let whole_base = base.fract() == 0.0 && base >= 2.0;
            let multiples = if whole_base { base as usize - 1 } else { 1 };
            let mut power = i;
            while power <= j {
                let magnitude = base.powf(power);
                for multiple in 1..=multiples {
                    let value = magnitude * multiple as f64;
                    if value >= lo && value <= hi {
                        values.push(sign * value);
                    }
                }
                power += 1.0;
            }
        } else {
            values = ticks::ticks(i, j, count.min((j - i) as usize))
                .into_iter()
                .map(|exponent| base.powf(exponent))
                .filter(|value| *value >= lo && *value <= hi)
                .map(|value| sign * value)
                .collect();
        }

        values.sort_by(f64::total_cmp);
        if d1 < d0 {
            values.reverse();
        }
        values
    }
}

fn log_base(value: f64, base: f64) -> f64 {
    if base == 10.0 {
        value.log10()
    } else if base == 2.0 {
        value.log2()
    } else {
        value.ln() / base.ln()
    }
}

fn validate_pair(pair: (f64, f64), name: &str) -> Result<(), String> {
    if !pair.0.is_finite() || !pair.1.is_finite() {
        return Err(format!(
            "{name} bounds must be finite, got [{}, {}]",
            pair.0, pair.1
        ));
    }
    Ok(())
}
