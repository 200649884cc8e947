use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Four-sided canvas margin in pixels.
///
/// Serialized as the `[top, bottom, left, right]` tuple hosts already use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Margin {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Checks the margin against the canvas it is applied to.
    pub fn validate(self, width: f64, height: f64) -> ChartResult<()> {
        for (side, value) in [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidMargin(format!(
                    "`{side}` must be finite and >= 0, got {value}"
                )));
            }
        }
        if self.left + self.right > width {
            return Err(ChartError::InvalidMargin(format!(
                "horizontal margin {} exceeds width {width}",
                self.left + self.right
            )));
        }
        if self.top + self.bottom > height {
            return Err(ChartError::InvalidMargin(format!(
                "vertical margin {} exceeds height {height}",
                self.top + self.bottom
            )));
        }
        Ok(())
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

impl From<[f64; 4]> for Margin {
    fn from([top, bottom, left, right]: [f64; 4]) -> Self {
        Self::new(top, bottom, left, right)
    }
}

impl From<Margin> for [f64; 4] {
    fn from(margin: Margin) -> Self {
        [margin.top, margin.bottom, margin.left, margin.right]
    }
}

/// Pixel coordinate inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Identity of a record inside a keyed join.
///
/// Two records are the same shape when their key accessor returns equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Int(i64),
    Number(OrderedFloat<f64>),
    Text(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{}", value.0),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}
