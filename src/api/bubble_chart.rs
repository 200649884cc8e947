use std::collections::HashMap;
use std::mem;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Anchor, ContinuousScale, Key, ScaleType, TickFormat};
use crate::error::ChartResult;
use crate::interaction::{HoverChange, PointerEvent, PointerEventKind};
use crate::render::{RenderFrame, SvgElement, SvgRenderer};
use crate::transition::StagedTransitions;

use super::accessor::{Accessor, Fill, PointerCallbacks, PointerHandler};
use super::axis::{AxisLayout, AxisOrient, AxisState};
use super::chart_config::{
    BubbleChartConfig, parse_format, validate_domain, validate_radius_range,
};
use super::chart_runtime::{
    ChartRuntime, empty_domain, evaluate, extent, keyed_rows, zero_based_domain, zero_pixel,
};
use super::shapes::BubbleGeometry;
use super::snapshot::{ChartKind, ChartSnapshot};
use super::visualisation::{Visualisation, Visualise};

pub const BUBBLE_CHART_CLASS: &str = "bubblechart";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleDatum {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl BubbleDatum {
    #[must_use]
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }
}

/// Construction options: serializable config plus accessors and callbacks.
pub struct BubbleChartOptions<T> {
    pub config: BubbleChartConfig,
    pub x: Accessor<T, f64>,
    pub y: Accessor<T, f64>,
    pub r: Accessor<T, f64>,
    /// Defaults to the record index.
    pub keys: Accessor<T, Key>,
    pub color: Fill<T>,
    pub tooltips: Option<Accessor<T, String>>,
    /// Override `config.x_format` / `config.y_format` when set.
    pub x_formatter: Option<TickFormat>,
    pub y_formatter: Option<TickFormat>,
    pub callbacks: PointerCallbacks<T>,
    pub transitions: StagedTransitions,
    /// Rendered immediately when non-empty.
    pub data: Vec<T>,
}

impl<T> BubbleChartOptions<T> {
    pub fn new(
        x: impl Into<Accessor<T, f64>>,
        y: impl Into<Accessor<T, f64>>,
        r: impl Into<Accessor<T, f64>>,
    ) -> Self {
        Self {
            config: BubbleChartConfig::default(),
            x: x.into(),
            y: y.into(),
            r: r.into(),
            keys: Accessor::indexed(|_, index| Key::Index(index)),
            color: Fill::default(),
            tooltips: None,
            x_formatter: None,
            y_formatter: None,
            callbacks: PointerCallbacks::default(),
            transitions: StagedTransitions::standard(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BubbleChartConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: impl Into<Accessor<T, Key>>) -> Self {
        self.keys = keys.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<Fill<T>>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn with_tooltips(mut self, text: impl Into<Accessor<T, String>>) -> Self {
        self.tooltips = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_over(mut self, handler: PointerHandler<T>) -> Self {
        self.callbacks.over = Some(handler);
        self
    }

    #[must_use]
    pub fn with_out(mut self, handler: PointerHandler<T>) -> Self {
        self.callbacks.out = Some(handler);
        self
    }

    #[must_use]
    pub fn with_click(mut self, handler: PointerHandler<T>) -> Self {
        self.callbacks.click = Some(handler);
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: StagedTransitions) -> Self {
        self.transitions = transitions;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.data = data;
        self
    }
}

impl Default for BubbleChartOptions<BubbleDatum> {
    fn default() -> Self {
        Self::new(
            |datum: &BubbleDatum| datum.x,
            |datum: &BubbleDatum| datum.y,
            |datum: &BubbleDatum| datum.r,
        )
    }
}

#[derive(Debug, Clone)]
struct BubbleTarget {
    cx: f64,
    cy: f64,
    r: f64,
    fill: Option<String>,
}

struct BubbleLayout {
    rows: Vec<(Key, usize)>,
    x_scale: ContinuousScale,
    y_scale: ContinuousScale,
    r_scale: ContinuousScale,
    targets: Vec<BubbleTarget>,
}

/// Scatter of circles sized by a third dimension, axes crossing at zero.
pub struct BubbleChart<T> {
    vis: Visualisation,
    config: BubbleChartConfig,
    x: Accessor<T, f64>,
    y: Accessor<T, f64>,
    r: Accessor<T, f64>,
    keys: Accessor<T, Key>,
    color: Accessor<T, Option<String>>,
    tooltip_text: Option<Accessor<T, String>>,
    x_format: Option<TickFormat>,
    y_format: Option<TickFormat>,
    x_scale: Option<ContinuousScale>,
    y_scale: Option<ContinuousScale>,
    r_scale: Option<ContinuousScale>,
    x_axis: AxisState,
    y_axis: AxisState,
    runtime: ChartRuntime<T, BubbleGeometry>,
}

impl<T> BubbleChart<T> {
    pub fn new(options: BubbleChartOptions<T>) -> ChartResult<Self> {
        let BubbleChartOptions {
            config,
            x,
            y,
            r,
            keys,
            color,
            tooltips,
            x_formatter,
            y_formatter,
            callbacks,
            transitions,
            data,
        } = options;

        let vis = Visualisation::new(&config.vis, BUBBLE_CHART_CLASS)?;
        for kind in [config.x_type, config.y_type, config.r_type] {
            kind.validate()?;
        }
        for domain in [config.x_domain, config.y_domain, config.r_domain] {
            validate_domain(domain)?;
        }
        validate_radius_range(config.r_range)?;
        let x_format = match x_formatter {
            Some(format) => Some(format),
            None => parse_format(config.x_format.as_deref())?,
        };
        let y_format = match y_formatter {
            Some(format) => Some(format),
            None => parse_format(config.y_format.as_deref())?,
        };

        let grid = *vis.grid();
        let mut chart = Self {
            vis,
            config,
            x,
            y,
            r,
            keys,
            color: color.into_accessor(),
            tooltip_text: tooltips,
            x_format,
            y_format,
            x_scale: None,
            y_scale: None,
            r_scale: None,
            x_axis: AxisState::new(AxisOrient::Bottom, grid.left(), grid.bottom()),
            y_axis: AxisState::new(AxisOrient::Left, grid.left(), grid.top()),
            runtime: ChartRuntime::new(callbacks, transitions),
        };
        if !data.is_empty() {
            chart.render(data)?;
        }
        Ok(chart)
    }

    /// Joins `data` against the current bubbles and schedules the staged transitions.
    ///
    /// Invalid data is rejected before anything changes.
    pub fn render(&mut self, data: Vec<T>) -> ChartResult<&mut Self> {
        let layout = self.layout(&data)?;
        self.apply(data, layout);
        Ok(self)
    }

    /// Re-renders the last dataset; a no-op before the first render.
    pub fn refresh(&mut self) -> ChartResult<&mut Self> {
        if self.runtime.rendered {
            let layout = self.layout(&self.runtime.data)?;
            let data = mem::take(&mut self.runtime.data);
            self.apply(data, layout);
        }
        Ok(self)
    }

    fn layout(&self, data: &[T]) -> ChartResult<BubbleLayout> {
        let grid = self.vis.grid();
        let config = &self.config;
        let rows = keyed_rows(data, &self.keys);
        let xs = evaluate(data, &rows, &self.x, "x")?;
        let ys = evaluate(data, &rows, &self.y, "y")?;
        let rs = evaluate(data, &rows, &self.r, "r")?;

        let r_domain = config
            .r_domain
            .unwrap_or_else(|| radius_domain(config.r_type, &rs));
        let r_scale = ContinuousScale::new(config.r_type, r_domain, config.r_range)?;
        let radii = rs
            .iter()
            .map(|&value| r_scale.scale_checked(value).map(|px| px.max(0.0)))
            .collect::<ChartResult<Vec<_>>>()?;
        let max_radius = radii
            .iter()
            .copied()
            .fold(config.r_range.0.max(config.r_range.1), f64::max);

        let x_domain = config
            .x_domain
            .unwrap_or_else(|| zero_based_domain(config.x_type, &xs));
        let x_domain = pad_for_radius(config.x_type, x_domain, grid.inner_width(), max_radius)?;
        let x_scale = ContinuousScale::new(config.x_type, x_domain, (0.0, grid.inner_width()))?;

        let y_domain = config
            .y_domain
            .unwrap_or_else(|| zero_based_domain(config.y_type, &ys));
        let y_domain = pad_for_radius(config.y_type, y_domain, grid.inner_height(), max_radius)?;
        let y_scale = ContinuousScale::new(config.y_type, y_domain, (grid.inner_height(), 0.0))?;

        let mut targets = Vec::with_capacity(rows.len());
        for (position, (_, index)) in rows.iter().enumerate() {
            targets.push(BubbleTarget {
                cx: x_scale.scale_checked(xs[position])?,
                cy: y_scale.scale_checked(ys[position])?,
                r: radii[position],
                fill: self.color.get(&data[*index], *index),
            });
        }

        Ok(BubbleLayout {
            rows,
            x_scale,
            y_scale,
            r_scale,
            targets,
        })
    }

    fn apply(&mut self, data: Vec<T>, layout: BubbleLayout) {
        let BubbleLayout {
            rows,
            x_scale,
            y_scale,
            r_scale,
            targets,
        } = layout;
        let grid = *self.vis.grid();
        let now = self.runtime.begin_render(data);
        let stages = self.runtime.transitions;

        let x_layout = AxisLayout::continuous(
            AxisOrient::Bottom,
            &x_scale,
            self.config.x_ticks,
            self.x_format.as_ref(),
        );
        let y_layout = AxisLayout::continuous(
            AxisOrient::Left,
            &y_scale,
            self.config.y_ticks,
            self.y_format.as_ref(),
        );
        let x_zero = zero_pixel(&x_scale, 0.0);
        let y_zero = zero_pixel(&y_scale, grid.inner_height());
        self.x_axis.update(
            x_layout,
            (grid.left(), grid.top() + y_zero),
            now,
            stages.position,
        );
        self.y_axis
            .update(y_layout, (grid.left() + x_zero, grid.top()), now, stages.position);
        trace!(x_zero, y_zero, "axes scheduled at zero crossing");

        let entry_points: HashMap<usize, (f64, f64)> = rows
            .iter()
            .zip(&targets)
            .map(|((_, index), target)| (*index, (target.cx, target.cy)))
            .collect();
        let outcome = self.runtime.shapes.join(&rows, stages.remove.end_at(now), |_, index| {
            let (cx, cy) = entry_points.get(&index).copied().unwrap_or_default();
            BubbleGeometry::new(cx, cy, 0.0)
        });

        for key in &outcome.exited {
            if let Some(shape) = self.runtime.shapes.get_mut(key) {
                shape.geometry.r.animate_to(0.0, now, stages.remove);
            }
        }
        for ((key, _), target) in rows.iter().zip(targets) {
            if let Some(shape) = self.runtime.shapes.get_mut(key) {
                shape.geometry.cx.animate_to(target.cx, now, stages.position);
                shape.geometry.cy.animate_to(target.cy, now, stages.position);
                shape.geometry.r.animate_to(target.r, now, stages.size);
                shape.fill.animate_to(target.fill, now, stages.size);
            }
        }
        // Larger bubbles first so smaller ones stay visible on top.
        self.runtime
            .shapes
            .sort_active_by(|a, b| b.geometry.r.target().total_cmp(&a.geometry.r.target()));

        self.x_scale = Some(x_scale);
        self.y_scale = Some(y_scale);
        self.r_scale = Some(r_scale);
        self.runtime.rebind_tooltips(self.tooltip_text.as_ref());
        self.runtime.rebind_events();
        debug!(
            entered = outcome.entered.len(),
            updated = outcome.updated.len(),
            exited = outcome.exited.len(),
            at_ms = now,
            "bubble chart rendered"
        );
    }

    fn reconfigure<V>(&mut self, field: fn(&mut Self) -> &mut V, value: V) -> ChartResult<&mut Self> {
        let previous = mem::replace(field(self), value);
        if let Err(err) = self.refresh() {
            *field(self) = previous;
            return Err(err);
        }
        Ok(self)
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.runtime.data
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.runtime.rendered
    }

    /// Current settings, including the live canvas size and title.
    #[must_use]
    pub fn config(&self) -> BubbleChartConfig {
        let grid = self.vis.grid();
        let mut config = self.config.clone();
        config.vis.container = self.vis.container().to_owned();
        config.vis.width = grid.width();
        config.vis.height = grid.height();
        config.vis.margin = grid.margin();
        config.vis.title = self.vis.title().map(str::to_owned);
        config
    }

    #[must_use]
    pub fn x_scale(&self) -> Option<&ContinuousScale> {
        self.x_scale.as_ref()
    }

    #[must_use]
    pub fn y_scale(&self) -> Option<&ContinuousScale> {
        self.y_scale.as_ref()
    }

    #[must_use]
    pub fn r_scale(&self) -> Option<&ContinuousScale> {
        self.r_scale.as_ref()
    }

    pub fn set_x(&mut self, x: impl Into<Accessor<T, f64>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.x, x.into())
    }

    pub fn set_y(&mut self, y: impl Into<Accessor<T, f64>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.y, y.into())
    }

    pub fn set_r(&mut self, r: impl Into<Accessor<T, f64>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.r, r.into())
    }

    pub fn set_keys(&mut self, keys: impl Into<Accessor<T, Key>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.keys, keys.into())
    }

    /// Constant colour, `None` for the stylesheet default, or a per-record function.
    pub fn set_color(&mut self, color: impl Into<Fill<T>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.color, color.into().into_accessor())
    }

    /// Replaces the tooltip text accessor and rebinds tooltips without re-rendering.
    pub fn set_tooltips(&mut self, text: Option<Accessor<T, String>>) -> &mut Self {
        self.tooltip_text = text;
        self.runtime.rebind_tooltips(self.tooltip_text.as_ref());
        self
    }

    pub fn set_x_type(&mut self, kind: ScaleType) -> ChartResult<&mut Self> {
        kind.validate()?;
        self.reconfigure(|chart| &mut chart.config.x_type, kind)
    }

    pub fn set_y_type(&mut self, kind: ScaleType) -> ChartResult<&mut Self> {
        kind.validate()?;
        self.reconfigure(|chart| &mut chart.config.y_type, kind)
    }

    pub fn set_r_type(&mut self, kind: ScaleType) -> ChartResult<&mut Self> {
        kind.validate()?;
        self.reconfigure(|chart| &mut chart.config.r_type, kind)
    }

    /// Explicit x domain before radius padding; `None` derives it from the data.
    pub fn set_x_domain(&mut self, domain: Option<(f64, f64)>) -> ChartResult<&mut Self> {
        validate_domain(domain)?;
        self.reconfigure(|chart| &mut chart.config.x_domain, domain)
    }

    /// Explicit y domain before radius padding; `None` derives it from the data.
    pub fn set_y_domain(&mut self, domain: Option<(f64, f64)>) -> ChartResult<&mut Self> {
        validate_domain(domain)?;
        self.reconfigure(|chart| &mut chart.config.y_domain, domain)
    }

    pub fn set_r_domain(&mut self, domain: Option<(f64, f64)>) -> ChartResult<&mut Self> {
        validate_domain(domain)?;
        self.reconfigure(|chart| &mut chart.config.r_domain, domain)
    }

    /// Rendered radius range in pixels.
    pub fn set_r_range(&mut self, range: (f64, f64)) -> ChartResult<&mut Self> {
        validate_radius_range(range)?;
        self.reconfigure(|chart| &mut chart.config.r_range, range)
    }

    pub fn set_x_ticks(&mut self, ticks: Option<usize>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.config.x_ticks, ticks)
    }

    pub fn set_y_ticks(&mut self, ticks: Option<usize>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.config.y_ticks, ticks)
    }

    pub fn set_x_format(&mut self, specifier: Option<&str>) -> ChartResult<&mut Self> {
        let format = parse_format(specifier)?;
        self.reconfigure(|chart| &mut chart.x_format, format)?;
        self.config.x_format = specifier.map(str::to_owned);
        Ok(self)
    }

    pub fn set_y_format(&mut self, specifier: Option<&str>) -> ChartResult<&mut Self> {
        let format = parse_format(specifier)?;
        self.reconfigure(|chart| &mut chart.y_format, format)?;
        self.config.y_format = specifier.map(str::to_owned);
        Ok(self)
    }

    pub fn set_x_formatter(&mut self, format: TickFormat) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.x_format, Some(format))?;
        self.config.x_format = None;
        Ok(self)
    }

    pub fn set_y_formatter(&mut self, format: TickFormat) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.y_format, Some(format))?;
        self.config.y_format = None;
        Ok(self)
    }

    pub fn set_x_label(&mut self, label: Option<&str>) -> &mut Self {
        self.config.x_label = label.map(str::to_owned);
        self
    }

    pub fn set_y_label(&mut self, label: Option<&str>) -> &mut Self {
        self.config.y_label = label.map(str::to_owned);
        self
    }

    pub fn set_over(&mut self, handler: Option<PointerHandler<T>>) -> &mut Self {
        self.runtime.callbacks.over = handler;
        self
    }

    pub fn set_out(&mut self, handler: Option<PointerHandler<T>>) -> &mut Self {
        self.runtime.callbacks.out = handler;
        self
    }

    pub fn set_click(&mut self, handler: Option<PointerHandler<T>>) -> &mut Self {
        self.runtime.callbacks.click = handler;
        self
    }

    pub fn highlight_bubbles<K: Into<Key>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
    ) -> &mut Self {
        self.select_bubbles(keys, Some("highlighted"))
    }

    /// Marks bubbles whose key is in `keys` with `class` (default `selected`).
    pub fn select_bubbles<K: Into<Key>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
        class: Option<&str>,
    ) -> &mut Self {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        let class = class.unwrap_or("selected");
        self.runtime.shapes.select(&keys, class);
        debug!(count = keys.len(), class, "bubbles selected");
        self
    }

    pub fn tick(&mut self, elapsed_ms: f64) -> f64 {
        let now = self.runtime.tick(elapsed_ms);
        self.x_axis.advance(now);
        self.y_axis.advance(now);
        now
    }

    pub fn finish_transitions(&mut self) -> &mut Self {
        self.runtime.finish();
        self.x_axis.finish();
        self.y_axis.finish();
        self
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.runtime.shapes.is_animating() || self.x_axis.is_animating() || self.y_axis.is_animating()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> HoverChange {
        let local = self.plot_local(x, y);
        self.runtime.pointer_move(x, y, local)
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64) -> HoverChange {
        self.runtime.pointer_leave(x, y)
    }

    /// Fires `click` for the topmost bubble under canvas `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Key> {
        let local = self.plot_local(x, y);
        self.runtime.click(x, y, local)
    }

    pub fn dispatch(&mut self, event: PointerEvent) -> Option<Key> {
        match event.kind {
            PointerEventKind::Over => self.pointer_move(event.x, event.y).entered,
            PointerEventKind::Out => self.pointer_leave(event.x, event.y).left,
            PointerEventKind::Click => self.click(event.x, event.y),
        }
    }

    fn plot_local(&self, x: f64, y: f64) -> (f64, f64) {
        let grid = self.vis.grid();
        (x - grid.left(), y - grid.top())
    }

    pub fn to_svg(&self) -> ChartResult<String> {
        let mut renderer = SvgRenderer::new();
        self.draw(&mut renderer)?;
        Ok(renderer.into_string())
    }

    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        let grid = self.vis.grid();
        let mut domains = IndexMap::new();
        for (name, scale) in [("x", &self.x_scale), ("y", &self.y_scale), ("r", &self.r_scale)] {
            if let Some(scale) = scale {
                domains.insert(name.to_owned(), scale.domain());
            }
        }
        ChartSnapshot {
            kind: ChartKind::Bubble,
            width: grid.width(),
            height: grid.height(),
            title: self.vis.title().map(str::to_owned),
            clock_ms: self.runtime.clock.now(),
            domains,
            categories: Vec::new(),
            x_axis: self.x_axis.layout.clone(),
            y_axis: self.y_axis.layout.clone(),
            shapes: self.runtime.shape_snapshots(),
        }
    }

    fn bubbles_element(&self) -> SvgElement {
        let mut group = SvgElement::new("g")
            .with_class("bubbles")
            .with_attr("transform", self.vis.grid().translate(Anchor::TopLeft));
        for shape in self.runtime.shapes.iter() {
            let geometry = &shape.geometry;
            let mut circle = SvgElement::new("circle")
                .with_class("bubble")
                .with_attr("cx", geometry.cx.value())
                .with_attr("cy", geometry.cy.value())
                .with_attr("r", geometry.r.value());
            self.runtime.decorate(shape, &mut circle);
            group.push_child(circle);
        }
        group
    }
}

impl<T> Visualise for BubbleChart<T> {
    fn visualisation(&self) -> &Visualisation {
        &self.vis
    }

    fn visualisation_mut(&mut self) -> &mut Visualisation {
        &mut self.vis
    }

    fn on_resize(&mut self) -> ChartResult<()> {
        self.refresh().map(|_| ())
    }

    fn frame(&self) -> RenderFrame {
        let grid = self.vis.grid();
        let root = self
            .vis
            .canvas_element()
            .with_child(self.bubbles_element())
            .with_child(self.x_axis.element("x-axis"))
            .with_child(self.y_axis.element("y-axis"))
            .with_child(self.vis.x_label_element(self.config.x_label.as_deref()))
            .with_child(self.vis.y_label_element(self.config.y_label.as_deref()));
        RenderFrame::new(grid.width(), grid.height(), root)
    }
}

/// `[0, max]` for power-family scales; the data extent on log scales.
fn radius_domain(kind: ScaleType, values: &[f64]) -> (f64, f64) {
    match (extent(values), kind) {
        (None, kind) => empty_domain(kind),
        (Some(bounds), ScaleType::Log { .. }) => bounds,
        (Some((_, hi)), _) => (0.0, hi),
    }
}

/// Widens `domain` so values inside it land at least `radius` pixels from
/// either end of a `[0, extent]` pixel range.
///
/// The padding is solved in the scale's own space, so it is exact for every
/// scale type. With no room for two radii the domain is left as is.
fn pad_for_radius(
    kind: ScaleType,
    domain: (f64, f64),
    extent: f64,
    radius: f64,
) -> ChartResult<(f64, f64)> {
    if radius <= 0.0 {
        return Ok(domain);
    }
    if extent <= 2.0 * radius {
        warn!(extent, radius, "plot too small to pad for bubble radius");
        return Ok(domain);
    }
    let inset = ContinuousScale::new(kind, domain, (radius, extent - radius))?;
    Ok((inset.invert(0.0), inset.invert(extent)))
}
