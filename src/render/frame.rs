use crate::core::grid::validate_size;
use crate::error::{ChartError, ChartResult};
use crate::render::SvgElement;

const NUMERIC_ATTRS: [&str; 7] = ["x", "y", "width", "height", "cx", "cy", "r"];
const NON_NEGATIVE_ATTRS: [&str; 3] = ["width", "height", "r"];

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub root: SvgElement,
}

impl RenderFrame {
    #[must_use]
    pub fn new(width: f64, height: f64, root: SvgElement) -> Self {
        Self {
            width,
            height,
            root,
        }
    }

    /// Rejects frames whose geometry would draw garbage (NaN, negative sizes).
    pub fn validate(&self) -> ChartResult<()> {
        validate_size(self.width, self.height)?;
        validate_element(&self.root)
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.root.count()
    }
}

fn validate_element(element: &SvgElement) -> ChartResult<()> {
    for name in NUMERIC_ATTRS {
        let Some(raw) = element.attr(name) else {
            continue;
        };
        let value: f64 = raw.parse().map_err(|_| {
            ChartError::InvalidData(format!(
                "<{}> attribute `{name}` is not numeric: `{raw}`",
                element.tag
            ))
        })?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "<{}> attribute `{name}` must be finite",
                element.tag
            )));
        }
        if NON_NEGATIVE_ATTRS.contains(&name) && value < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "<{}> attribute `{name}` must be >= 0, got {value}",
                element.tag
            )));
        }
    }
    element.children.iter().try_for_each(validate_element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_radius_is_rejected() {
        let root = SvgElement::new("svg").with_child(SvgElement::new("circle").with_attr("r", -1.0));
        let frame = RenderFrame::new(100.0, 100.0, root);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn nan_geometry_is_rejected() {
        let root = SvgElement::new("svg").with_child(SvgElement::new("rect").with_attr("x", f64::NAN));
        assert!(RenderFrame::new(10.0, 10.0, root).validate().is_err());
    }

    #[test]
    fn well_formed_frame_passes() {
        let root = SvgElement::new("svg")
            .with_child(SvgElement::new("rect").with_attr("x", 1.5).with_attr("height", 0.0));
        let frame = RenderFrame::new(10.0, 10.0, root);
        frame.validate().expect("valid");
        assert_eq!(frame.element_count(), 2);
    }
}
