use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Anchor, Grid, Margin};
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer, SvgElement};
use crate::style::{DEFAULT_STYLE, StyleConfig};

/// Vertical offset of the title baseline from the top of the canvas.
pub const TITLE_OFFSET_PX: f64 = 25.0;
const X_LABEL_DY_PX: f64 = 30.0;
const Y_LABEL_DY_PX: f64 = -30.0;

/// Canvas options shared by every chart type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    /// Mount target in the host document.
    pub container: String,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub title: Option<String>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            container: "body".to_owned(),
            width: 800.0,
            height: 800.0,
            margin: Margin::default(),
            title: None,
        }
    }
}

/// Canvas state: size, grid, class tag and title.
#[derive(Debug, Clone)]
pub struct Visualisation {
    container: String,
    class_tag: String,
    grid: Grid,
    title: Option<String>,
    style: &'static StyleConfig,
}

impl Visualisation {
    pub fn new(config: &VisConfig, class_tag: impl Into<String>) -> ChartResult<Self> {
        Self::with_style(config, class_tag, &DEFAULT_STYLE)
    }

    pub fn with_style(
        config: &VisConfig,
        class_tag: impl Into<String>,
        style: &'static StyleConfig,
    ) -> ChartResult<Self> {
        let grid = Grid::new(config.width, config.height, config.margin)?;
        Ok(Self {
            container: config.container.clone(),
            class_tag: class_tag.into(),
            grid,
            title: config.title.clone(),
            style,
        })
    }

    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    #[must_use]
    pub fn class_tag(&self) -> &str {
        &self.class_tag
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn style(&self) -> &'static StyleConfig {
        self.style
    }

    #[must_use]
    pub fn title_transform(&self) -> String {
        format!("translate({},{TITLE_OFFSET_PX})", self.grid.width() / 2.0)
    }

    /// Root `<svg>` sized to the canvas, styled, with the title as first child.
    #[must_use]
    pub fn canvas_element(&self) -> SvgElement {
        let mut svg = SvgElement::new("svg")
            .with_class(self.class_tag.clone())
            .with_class("vis")
            .with_attr("width", self.grid.width())
            .with_attr("height", self.grid.height())
            .with_attr("data-container", &self.container);
        self.style.apply_style_svg(&mut svg);

        let mut title = SvgElement::new("text")
            .with_class("title")
            .with_attr("transform", self.title_transform());
        if let Some(text) = &self.title {
            title.text = Some(text.clone());
        }
        self.style.apply_style_title(&mut title);
        svg.push_child(title);
        svg
    }

    /// Horizontal axis label, centered below the plot.
    #[must_use]
    pub fn x_label_element(&self, text: Option<&str>) -> SvgElement {
        self.label_element(
            "x-label",
            text,
            self.grid.translate(Anchor::BottomCenter),
            X_LABEL_DY_PX,
        )
    }

    /// Vertical axis label, rotated along the left edge of the plot.
    #[must_use]
    pub fn y_label_element(&self, text: Option<&str>) -> SvgElement {
        self.label_element(
            "y-label",
            text,
            format!("{} rotate(-90)", self.grid.translate(Anchor::MiddleLeft)),
            Y_LABEL_DY_PX,
        )
    }

    fn label_element(&self, class: &str, text: Option<&str>, transform: String, dy: f64) -> SvgElement {
        let mut label = SvgElement::new("text")
            .with_class("legend")
            .with_class(class)
            .with_attr("transform", transform)
            .with_attr("dy", dy);
        if let Some(text) = text {
            label.text = Some(text.to_owned());
        }
        self.style.apply_style_legend(&mut label);
        label
    }

    pub(crate) fn resize_width(&mut self, width: f64) -> ChartResult<()> {
        self.grid.set_width(width)?;
        debug!(width, class = %self.class_tag, "canvas width changed");
        Ok(())
    }

    pub(crate) fn resize_height(&mut self, height: f64) -> ChartResult<()> {
        self.grid.set_height(height)?;
        debug!(height, class = %self.class_tag, "canvas height changed");
        Ok(())
    }

    pub(crate) fn resize_margin(&mut self, margin: Margin) -> ChartResult<()> {
        self.grid.set_margin(margin)?;
        debug!(?margin, class = %self.class_tag, "canvas margin changed");
        Ok(())
    }

    pub(crate) fn replace_title(&mut self, title: Option<String>) {
        self.title = title;
    }
}

/// Resize contract shared by every chart.
///
/// Dimension setters update the grid, then call `on_resize` so the chart can
/// reposition its own groups. Failed updates leave the canvas unchanged and
/// skip the hook.
pub trait Visualise {
    fn visualisation(&self) -> &Visualisation;

    fn visualisation_mut(&mut self) -> &mut Visualisation;

    /// Chart-specific reposition hook; the base canvas has nothing to move.
    fn on_resize(&mut self) -> ChartResult<()> {
        Ok(())
    }

    /// Canvas tree for the current state.
    fn frame(&self) -> RenderFrame;

    fn grid(&self) -> &Grid {
        self.visualisation().grid()
    }

    fn set_width(&mut self, width: f64) -> ChartResult<&mut Self>
    where
        Self: Sized,
    {
        self.visualisation_mut().resize_width(width)?;
        self.on_resize()?;
        Ok(self)
    }

    fn set_height(&mut self, height: f64) -> ChartResult<&mut Self>
    where
        Self: Sized,
    {
        self.visualisation_mut().resize_height(height)?;
        self.on_resize()?;
        Ok(self)
    }

    fn set_margin(&mut self, margin: impl Into<Margin>) -> ChartResult<&mut Self>
    where
        Self: Sized,
    {
        self.visualisation_mut().resize_margin(margin.into())?;
        self.on_resize()?;
        Ok(self)
    }

    /// Sets or clears (`None`) the title text.
    fn set_title(&mut self, title: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        self.visualisation_mut()
            .replace_title(title.map(str::to_owned));
        self
    }

    /// Hands the current frame to `renderer`.
    fn draw<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()>
    where
        Self: Sized,
    {
        renderer.render(&self.frame())
    }
}

impl Visualise for Visualisation {
    fn visualisation(&self) -> &Visualisation {
        self
    }

    fn visualisation_mut(&mut self) -> &mut Visualisation {
        self
    }

    fn frame(&self) -> RenderFrame {
        RenderFrame::new(self.grid.width(), self.grid.height(), self.canvas_element())
    }
}
