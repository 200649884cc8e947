use serde::{Deserialize, Serialize};

use crate::core::{BandScale, ContinuousScale, FormatSpec, ScaleType, TickFormat, precision_fixed};
use crate::render::SvgElement;
use crate::transition::{Animated, Stage};

pub const TICK_SIZE_PX: f64 = 6.0;
pub const TICK_PADDING_PX: f64 = 3.0;
const AXIS_FONT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrient {
    Bottom,
    Left,
}

impl AxisOrient {
    fn label_shift(self) -> f64 {
        match self {
            Self::Bottom => TICK_SIZE_PX + TICK_PADDING_PX,
            Self::Left => -(TICK_SIZE_PX + TICK_PADDING_PX),
        }
    }

    fn label_dy_em(self) -> f64 {
        match self {
            Self::Bottom => 0.71,
            Self::Left => 0.32,
        }
    }
}

/// One labelled tick, positioned along the axis in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub label: String,
    pub offset: f64,
    /// Label distance from the axis line, perpendicular to it.
    pub label_shift: f64,
    pub label_dy_em: f64,
}

impl AxisTick {
    fn new(orient: AxisOrient, label: String, offset: f64) -> Self {
        Self {
            label,
            offset,
            label_shift: orient.label_shift(),
            label_dy_em: orient.label_dy_em(),
        }
    }

    /// Moves a bottom-axis label above the line so it clears a downward bar.
    pub fn lift_above_line(&mut self) {
        self.label_shift = -(TICK_SIZE_PX + TICK_PADDING_PX);
        self.label_dy_em = 0.0;
    }

    #[must_use]
    pub fn is_lifted(&self) -> bool {
        self.label_shift < 0.0 && self.label_dy_em == 0.0
    }
}

/// Tick layout for one axis, independent of where the axis is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub orient: AxisOrient,
    pub range: (f64, f64),
    pub ticks: Vec<AxisTick>,
}

impl AxisLayout {
    #[must_use]
    pub fn empty(orient: AxisOrient) -> Self {
        Self {
            orient,
            range: (0.0, 0.0),
            ticks: Vec::new(),
        }
    }

    /// Ticks for a continuous scale; without a format, label precision follows the tick step.
    #[must_use]
    pub fn continuous(
        orient: AxisOrient,
        scale: &ContinuousScale,
        count: Option<usize>,
        format: Option<&TickFormat>,
    ) -> Self {
        let fallback;
        let format = match format {
            Some(format) => format,
            None => {
                fallback = default_format(scale, count);
                &fallback
            }
        };
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|value| AxisTick::new(orient, format.format(value), scale.scale(value)))
            .filter(|tick| tick.offset.is_finite())
            .collect();
        Self {
            orient,
            range: scale.range(),
            ticks,
        }
    }

    /// One tick per band, centered, labelled with the key.
    #[must_use]
    pub fn band(orient: AxisOrient, scale: &BandScale) -> Self {
        let ticks = scale
            .keys()
            .iter()
            .filter_map(|key| {
                let center = scale.center(key)?;
                Some(AxisTick::new(orient, key.to_string(), center))
            })
            .collect();
        Self {
            orient,
            range: scale.range(),
            ticks,
        }
    }

    /// `<g>` containing the domain line and tick marks, d3-axis style.
    #[must_use]
    pub fn element(&self, class: &str, translate: (f64, f64)) -> SvgElement {
        let (r0, r1) = self.range;
        let domain_path = match self.orient {
            AxisOrient::Bottom => format!("M{r0},{TICK_SIZE_PX}V0H{r1}V{TICK_SIZE_PX}"),
            AxisOrient::Left => format!("M-{TICK_SIZE_PX},{r0}H0V{r1}H-{TICK_SIZE_PX}"),
        };
        let anchor = match self.orient {
            AxisOrient::Bottom => "middle",
            AxisOrient::Left => "end",
        };

        let mut group = SvgElement::new("g")
            .with_class("axis")
            .with_class(class)
            .with_attr("transform", format!("translate({},{})", translate.0, translate.1))
            .with_attr("fill", "none")
            .with_attr("font-size", AXIS_FONT_SIZE)
            .with_attr("font-family", crate::style::FONT)
            .with_attr("text-anchor", anchor)
            .with_child(
                SvgElement::new("path")
                    .with_class("domain")
                    .with_attr("stroke", "currentColor")
                    .with_attr("d", domain_path),
            );

        for tick in &self.ticks {
            let (tick_transform, line, text) = match self.orient {
                AxisOrient::Bottom => (
                    format!("translate({},0)", tick.offset),
                    SvgElement::new("line")
                        .with_attr("stroke", "currentColor")
                        .with_attr("y2", TICK_SIZE_PX),
                    SvgElement::new("text")
                        .with_attr("fill", "currentColor")
                        .with_attr("y", tick.label_shift)
                        .with_attr("dy", format!("{}em", tick.label_dy_em)),
                ),
                AxisOrient::Left => (
                    format!("translate(0,{})", tick.offset),
                    SvgElement::new("line")
                        .with_attr("stroke", "currentColor")
                        .with_attr("x2", -TICK_SIZE_PX),
                    SvgElement::new("text")
                        .with_attr("fill", "currentColor")
                        .with_attr("x", tick.label_shift)
                        .with_attr("dy", format!("{}em", tick.label_dy_em)),
                ),
            };
            group.push_child(
                SvgElement::new("g")
                    .with_class("tick")
                    .with_attr("transform", tick_transform)
                    .with_child(line)
                    .with_child(text.with_text(tick.label.clone())),
            );
        }
        group
    }
}

fn default_format(scale: &ContinuousScale, count: Option<usize>) -> TickFormat {
    match scale.kind() {
        ScaleType::Log { .. } => TickFormat::Specifier(FormatSpec {
            comma: false,
            precision: None,
            trim: true,
            kind: crate::core::FormatKind::Si,
        }),
        _ => TickFormat::Specifier(FormatSpec::fixed_grouped(precision_fixed(
            scale.tick_step(count),
        ))),
    }
}

/// Axis layout plus its animated placement on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    pub layout: AxisLayout,
    pub x: Animated,
    pub y: Animated,
}

impl AxisState {
    #[must_use]
    pub fn new(orient: AxisOrient, x: f64, y: f64) -> Self {
        Self {
            layout: AxisLayout::empty(orient),
            x: Animated::new(x),
            y: Animated::new(y),
        }
    }

    /// Replaces the ticks and moves the axis within the positional stage.
    pub fn update(&mut self, layout: AxisLayout, to: (f64, f64), render_ms: f64, stage: Stage) {
        self.layout = layout;
        self.x.interrupt();
        self.y.interrupt();
        self.x.animate_to(to.0, render_ms, stage);
        self.y.animate_to(to.1, render_ms, stage);
    }

    pub fn advance(&mut self, now_ms: f64) {
        self.x.advance(now_ms);
        self.y.advance(now_ms);
    }

    pub fn finish(&mut self) {
        self.x.finish();
        self.y.finish();
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    #[must_use]
    pub fn element(&self, class: &str) -> SvgElement {
        self.layout.element(class, (self.x.value(), self.y.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Key;

    #[test]
    fn continuous_ticks_use_step_precision() {
        let scale = ContinuousScale::linear((0.0, 1.0), (0.0, 100.0)).expect("scale");
        let layout = AxisLayout::continuous(AxisOrient::Left, &scale, Some(5), None);
        let labels: Vec<&str> = layout.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
        assert_eq!(layout.ticks[5].offset, 100.0);
    }

    #[test]
    fn explicit_format_overrides_default() {
        let scale = ContinuousScale::linear((0.0, 2000.0), (0.0, 100.0)).expect("scale");
        let format = TickFormat::parse("~s").expect("format");
        let layout = AxisLayout::continuous(AxisOrient::Bottom, &scale, Some(2), Some(&format));
        let labels: Vec<&str> = layout.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1k", "2k"]);
    }

    #[test]
    fn band_ticks_sit_at_band_centers() {
        let scale = BandScale::new([Key::from("a"), Key::from("b")], (0.0, 200.0), 0.0)
            .expect("scale");
        let layout = AxisLayout::band(AxisOrient::Bottom, &scale);
        assert_eq!(layout.ticks.len(), 2);
        assert_eq!(layout.ticks[1].offset, 150.0);
        assert_eq!(layout.ticks[1].label, "b");
        assert!(!layout.ticks[1].is_lifted());
    }

    #[test]
    fn element_contains_domain_and_ticks() {
        let scale = ContinuousScale::linear((0.0, 10.0), (100.0, 0.0)).expect("scale");
        let layout = AxisLayout::continuous(AxisOrient::Left, &scale, Some(2), None);
        let group = layout.element("y-axis", (10.0, 20.0));
        assert_eq!(group.attr("transform"), Some("translate(10,20)"));
        assert_eq!(group.find_all_by_class("tick").len(), layout.ticks.len());
        assert_eq!(group.find_all_by_class("domain").len(), 1);
    }
}
