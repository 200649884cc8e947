use serde::{Deserialize, Serialize};

use crate::core::types::{Margin, Point};
use crate::error::{ChartError, ChartResult};

/// Named anchor inside the margin box: {top, middle, bottom} x {left, center, right}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Margin-aware coordinate helper used to place chart groups on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: f64,
    height: f64,
    margin: Margin,
}

impl Grid {
    pub fn new(width: f64, height: f64, margin: Margin) -> ChartResult<Self> {
        validate_size(width, height)?;
        margin.validate(width, height)?;
        Ok(Self {
            width,
            height,
            margin,
        })
    }

    pub fn set_width(&mut self, width: f64) -> ChartResult<()> {
        *self = Self::new(width, self.height, self.margin)?;
        Ok(())
    }

    pub fn set_height(&mut self, height: f64) -> ChartResult<()> {
        *self = Self::new(self.width, height, self.margin)?;
        Ok(())
    }

    pub fn set_margin(&mut self, margin: Margin) -> ChartResult<()> {
        *self = Self::new(self.width, self.height, margin)?;
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.margin.top
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.height - self.margin.bottom
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.margin.left
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.width - self.margin.right
    }

    /// Vertical midpoint of the inner box.
    #[must_use]
    pub fn middle(&self) -> f64 {
        self.top() + self.inner_height() / 2.0
    }

    /// Horizontal midpoint of the inner box.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.left() + self.inner_width() / 2.0
    }

    #[must_use]
    pub fn point(&self, anchor: Anchor) -> Point {
        let (x, y) = match anchor {
            Anchor::TopLeft => (self.left(), self.top()),
            Anchor::TopCenter => (self.center(), self.top()),
            Anchor::TopRight => (self.right(), self.top()),
            Anchor::MiddleLeft => (self.left(), self.middle()),
            Anchor::MiddleCenter => (self.center(), self.middle()),
            Anchor::MiddleRight => (self.right(), self.middle()),
            Anchor::BottomLeft => (self.left(), self.bottom()),
            Anchor::BottomCenter => (self.center(), self.bottom()),
            Anchor::BottomRight => (self.right(), self.bottom()),
        };
        Point::new(x, y)
    }

    /// Anchor rendered as `"(x,y)"`.
    #[must_use]
    pub fn point_string(&self, anchor: Anchor) -> String {
        let point = self.point(anchor);
        format!("({},{})", point.x, point.y)
    }

    /// Anchor rendered as an SVG `translate(x,y)` transform.
    #[must_use]
    pub fn translate(&self, anchor: Anchor) -> String {
        format!("translate{}", self.point_string(anchor))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            margin: Margin::uniform(0.0),
        }
    }
}

pub(crate) fn validate_size(width: f64, height: f64) -> ChartResult<()> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ChartError::InvalidSize { width, height });
    }
    Ok(())
}
