use std::mem;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::band_scale::validate_padding;
use crate::core::{Anchor, BandScale, ContinuousScale, Key, ScaleType, TickFormat};
use crate::error::ChartResult;
use crate::interaction::{HoverChange, PointerEvent, PointerEventKind};
use crate::render::{RenderFrame, SvgElement, SvgRenderer};
use crate::transition::StagedTransitions;

use super::accessor::{Accessor, Fill, PointerCallbacks, PointerHandler};
use super::axis::{AxisLayout, AxisOrient, AxisState};
use super::chart_config::{BarChartConfig, parse_format, validate_domain};
use super::chart_runtime::{ChartRuntime, evaluate, keyed_rows, zero_based_domain, zero_pixel};
use super::shapes::{BarGeometry, JoinOutcome};
use super::snapshot::{ChartKind, ChartSnapshot};
use super::visualisation::{Visualisation, Visualise};

pub const BAR_CHART_CLASS: &str = "barchart";

/// Ready-made record for hosts without their own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub key: String,
    pub value: f64,
}

impl BarDatum {
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Construction options: serializable config plus accessors and callbacks.
pub struct BarChartOptions<T> {
    pub config: BarChartConfig,
    pub values: Accessor<T, f64>,
    /// Defaults to the record index.
    pub keys: Accessor<T, Key>,
    pub color: Fill<T>,
    pub tooltips: Option<Accessor<T, String>>,
    /// Overrides `config.y_format` when set.
    pub y_formatter: Option<TickFormat>,
    pub callbacks: PointerCallbacks<T>,
    pub transitions: StagedTransitions,
    /// Rendered immediately when non-empty.
    pub data: Vec<T>,
}

impl<T> BarChartOptions<T> {
    pub fn new(values: impl Into<Accessor<T, f64>>) -> Self {
        Self {
            config: BarChartConfig::default(),
            values: values.into(),
            keys: Accessor::indexed(|_, index| Key::Index(index)),
            color: Fill::default(),
            tooltips: None,
            y_formatter: None,
            callbacks: PointerCallbacks::default(),
            transitions: StagedTransitions::standard(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BarChartConfig) -> Self {
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
    pub fn with_y_formatter(mut self, format: TickFormat) -> Self {
        self.y_formatter = Some(format);
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

impl Default for BarChartOptions<BarDatum> {
    fn default() -> Self {
        Self::new(|datum: &BarDatum| datum.value).with_keys(|datum: &BarDatum| Key::from(&datum.key))
    }
}

#[derive(Debug, Clone)]
struct BarTarget {
    x: f64,
    y: f64,
    height: f64,
    negative: bool,
    fill: Option<String>,
}

/// Everything a render needs, computed before any chart state changes.
struct BarLayout {
    rows: Vec<(Key, usize)>,
    x_scale: BandScale,
    y_scale: ContinuousScale,
    baseline: f64,
    targets: Vec<BarTarget>,
}

/// Vertical bar chart: one band per key, bars grow from the zero line.
pub struct BarChart<T> {
    vis: Visualisation,
    config: BarChartConfig,
    values: Accessor<T, f64>,
    keys: Accessor<T, Key>,
    color: Accessor<T, Option<String>>,
    tooltip_text: Option<Accessor<T, String>>,
    y_format: Option<TickFormat>,
    x_scale: Option<BandScale>,
    y_scale: Option<ContinuousScale>,
    x_axis: AxisState,
    y_axis: AxisState,
    runtime: ChartRuntime<T, BarGeometry>,
}

impl<T> BarChart<T> {
    pub fn new(options: BarChartOptions<T>) -> ChartResult<Self> {
        let BarChartOptions {
            config,
            values,
            keys,
            color,
            tooltips,
            y_formatter,
            callbacks,
            transitions,
            data,
        } = options;

        let vis = Visualisation::new(&config.vis, BAR_CHART_CLASS)?;
        validate_padding(config.padding)?;
        config.y_type.validate()?;
        validate_domain(config.y_domain)?;
        let y_format = match y_formatter {
            Some(format) => Some(format),
            None => parse_format(config.y_format.as_deref())?,
        };

        let grid = *vis.grid();
        let mut chart = Self {
            vis,
            config,
            values,
            keys,
            color: color.into_accessor(),
            tooltip_text: tooltips,
            y_format,
            x_scale: None,
            y_scale: None,
            x_axis: AxisState::new(AxisOrient::Bottom, grid.left(), grid.bottom()),
            y_axis: AxisState::new(AxisOrient::Left, grid.left(), grid.top()),
            runtime: ChartRuntime::new(callbacks, transitions),
        };
        if !data.is_empty() {
            chart.render(data)?;
        }
        Ok(chart)
    }

    /// Joins `data` against the current bars and schedules the staged transitions.
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

    fn layout(&self, data: &[T]) -> ChartResult<BarLayout> {
        let grid = self.vis.grid();
        let rows = keyed_rows(data, &self.keys);
        let values = evaluate(data, &rows, &self.values, "value")?;

        let domain = self
            .config
            .y_domain
            .unwrap_or_else(|| zero_based_domain(self.config.y_type, &values));
        let y_scale = ContinuousScale::new(self.config.y_type, domain, (grid.inner_height(), 0.0))?;
        let x_scale = BandScale::new(
            rows.iter().map(|(key, _)| key.clone()),
            (0.0, grid.inner_width()),
            self.config.padding,
        )?;
        let baseline = zero_pixel(&y_scale, grid.inner_height());

        let targets = rows
            .iter()
            .zip(&values)
            .map(|((key, index), &value)| {
                let top = y_scale.scale_checked(value)?;
                Ok(BarTarget {
                    x: x_scale.position(key).unwrap_or(0.0),
                    y: top.min(baseline),
                    height: (top - baseline).abs(),
                    negative: value < 0.0,
                    fill: self.color.get(&data[*index], *index),
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        Ok(BarLayout {
            rows,
            x_scale,
            y_scale,
            baseline,
            targets,
        })
    }

    fn apply(&mut self, data: Vec<T>, layout: BarLayout) {
        let BarLayout {
            rows,
            x_scale,
            y_scale,
            baseline,
            targets,
        } = layout;
        let grid = *self.vis.grid();
        let now = self.runtime.begin_render(data);
        let stages = self.runtime.transitions;
        let bandwidth = x_scale.bandwidth();

        let mut x_layout = AxisLayout::band(AxisOrient::Bottom, &x_scale);
        for (tick, target) in x_layout.ticks.iter_mut().zip(&targets) {
            if target.negative {
                tick.lift_above_line();
            }
        }
        let y_layout = AxisLayout::continuous(
            AxisOrient::Left,
            &y_scale,
            self.config.y_ticks,
            self.y_format.as_ref(),
        );
        self.x_axis
            .update(x_layout, (grid.left(), grid.top() + baseline), now, stages.position);
        self.y_axis
            .update(y_layout, (grid.left(), grid.top()), now, stages.position);
        trace!(delay_ms = stages.position.delay_ms, "axes scheduled");

        let outcome = self.runtime.shapes.join(&rows, stages.remove.end_at(now), |key, _| {
            BarGeometry::new(x_scale.position(key).unwrap_or(0.0), baseline, bandwidth, 0.0)
        });

        for key in &outcome.exited {
            if let Some(shape) = self.runtime.shapes.get_mut(key) {
                shape.geometry.y.animate_to(baseline, now, stages.remove);
                shape.geometry.height.animate_to(0.0, now, stages.remove);
            }
        }
        for ((key, _), target) in rows.iter().zip(targets) {
            if let Some(shape) = self.runtime.shapes.get_mut(key) {
                shape.geometry.x.animate_to(target.x, now, stages.position);
                shape.geometry.width.animate_to(bandwidth, now, stages.position);
                shape.geometry.y.animate_to(target.y, now, stages.size);
                shape.geometry.height.animate_to(target.height, now, stages.size);
                shape.fill.animate_to(target.fill, now, stages.size);
            }
        }
        trace!(
            remove_ms = stages.remove.end_at(now),
            size_ms = stages.size.end_at(now),
            "bar stages scheduled"
        );

        self.x_scale = Some(x_scale);
        self.y_scale = Some(y_scale);
        self.runtime.rebind_tooltips(self.tooltip_text.as_ref());
        self.runtime.rebind_events();
        log_render(&outcome, now);
    }

    /// Replaces one setting and re-renders; the previous value is restored when
    /// the re-render fails.
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
    pub fn config(&self) -> BarChartConfig {
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
    pub fn x_scale(&self) -> Option<&BandScale> {
        self.x_scale.as_ref()
    }

    #[must_use]
    pub fn y_scale(&self) -> Option<&ContinuousScale> {
        self.y_scale.as_ref()
    }

    pub fn set_values(&mut self, values: impl Into<Accessor<T, f64>>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.values, values.into())
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

    pub fn set_y_type(&mut self, kind: ScaleType) -> ChartResult<&mut Self> {
        kind.validate()?;
        self.reconfigure(|chart| &mut chart.config.y_type, kind)
    }

    /// Explicit value domain; `None` derives it from the data.
    pub fn set_y_domain(&mut self, domain: Option<(f64, f64)>) -> ChartResult<&mut Self> {
        validate_domain(domain)?;
        self.reconfigure(|chart| &mut chart.config.y_domain, domain)
    }

    pub fn set_y_ticks(&mut self, ticks: Option<usize>) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.config.y_ticks, ticks)
    }

    /// Tick label specifier such as `",.2f"` or `"~s"`; `None` restores the default.
    pub fn set_y_format(&mut self, specifier: Option<&str>) -> ChartResult<&mut Self> {
        let format = parse_format(specifier)?;
        self.reconfigure(|chart| &mut chart.y_format, format)?;
        self.config.y_format = specifier.map(str::to_owned);
        Ok(self)
    }

    /// Custom tick label formatter.
    pub fn set_y_formatter(&mut self, format: TickFormat) -> ChartResult<&mut Self> {
        self.reconfigure(|chart| &mut chart.y_format, Some(format))?;
        self.config.y_format = None;
        Ok(self)
    }

    pub fn set_padding(&mut self, padding: f64) -> ChartResult<&mut Self> {
        validate_padding(padding)?;
        self.reconfigure(|chart| &mut chart.config.padding, padding)
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

    /// Marks bars whose key is in `keys` as `highlighted`; an empty set clears it.
    pub fn highlight_bars<K: Into<Key>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.select_bars(keys, Some("highlighted"))
    }

    /// Marks bars whose key is in `keys` with `class` (default `selected`).
    pub fn select_bars<K: Into<Key>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
        class: Option<&str>,
    ) -> &mut Self {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        let class = class.unwrap_or("selected");
        self.runtime.shapes.select(&keys, class);
        debug!(count = keys.len(), class, "bars selected");
        self
    }

    /// Advances the animation clock; returns the new clock time.
    pub fn tick(&mut self, elapsed_ms: f64) -> f64 {
        let now = self.runtime.tick(elapsed_ms);
        self.x_axis.advance(now);
        self.y_axis.advance(now);
        now
    }

    /// Jumps every transition to its end state.
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

    /// Hover hit test at canvas coordinates; fires `out`/`over` on change.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> HoverChange {
        let local = self.plot_local(x, y);
        self.runtime.pointer_move(x, y, local)
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64) -> HoverChange {
        self.runtime.pointer_leave(x, y)
    }

    /// Fires `click` for the topmost bar under canvas `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Key> {
        let local = self.plot_local(x, y);
        self.runtime.click(x, y, local)
    }

    /// Sends an event from a host: `Over`/`Out` are treated as pointer moves
    /// and leaves, `Click` as a click.
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
        if let Some(scale) = &self.y_scale {
            domains.insert("y".to_owned(), scale.domain());
        }
        ChartSnapshot {
            kind: ChartKind::Bar,
            width: grid.width(),
            height: grid.height(),
            title: self.vis.title().map(str::to_owned),
            clock_ms: self.runtime.clock.now(),
            domains,
            categories: self
                .x_scale
                .as_ref()
                .map(|scale| scale.keys().iter().cloned().collect())
                .unwrap_or_default(),
            x_axis: self.x_axis.layout.clone(),
            y_axis: self.y_axis.layout.clone(),
            shapes: self.runtime.shape_snapshots(),
        }
    }

    fn bars_element(&self) -> SvgElement {
        let mut group = SvgElement::new("g")
            .with_class("bars")
            .with_attr("transform", self.vis.grid().translate(Anchor::TopLeft));
        for shape in self.runtime.shapes.iter() {
            let geometry = &shape.geometry;
            let mut rect = SvgElement::new("rect")
                .with_class("bar")
                .with_attr("x", geometry.x.value())
                .with_attr("y", geometry.y.value())
                .with_attr("width", geometry.width.value())
                .with_attr("height", geometry.height.value());
            self.runtime.decorate(shape, &mut rect);
            group.push_child(rect);
        }
        group
    }
}

impl<T> Visualise for BarChart<T> {
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
            .with_child(self.bars_element())
            .with_child(self.x_axis.element("x-axis"))
            .with_child(self.y_axis.element("y-axis"))
            .with_child(self.vis.x_label_element(self.config.x_label.as_deref()))
            .with_child(self.vis.y_label_element(self.config.y_label.as_deref()));
        RenderFrame::new(grid.width(), grid.height(), root)
    }
}

fn log_render(outcome: &JoinOutcome, now: f64) {
    debug!(
        entered = outcome.entered.len(),
        updated = outcome.updated.len(),
        exited = outcome.exited.len(),
        at_ms = now,
        "bar chart rendered"
    );
}
