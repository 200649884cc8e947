use indexmap::IndexSet;
use tracing::{trace, warn};

use crate::core::{ContinuousScale, Key, ScaleType};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HoverChange, HoverState, PointerEvent, PointerEventKind};
use crate::render::SvgElement;
use crate::transition::{Clock, StagedTransitions};

use super::accessor::{Accessor, PointerCallbacks};
use super::shapes::{Shape, ShapeGeometry, ShapeSet};
use super::snapshot::{GeometrySnapshotSource, ShapeSnapshot};
use super::tooltip::{Tooltip, TooltipBindings};

/// Domain used for a continuous dimension when there is no data to derive one from.
pub const EMPTY_DOMAIN: (f64, f64) = (0.0, 1.0);
/// Log scales cannot span zero, so they fall back to one decade instead.
pub const EMPTY_LOG_DOMAIN: (f64, f64) = (1.0, 10.0);

/// Per-chart state shared by every chart type: last dataset, joined shapes,
/// tooltips, pointer bindings and the animation clock.
pub(crate) struct ChartRuntime<T, G> {
    pub(crate) data: Vec<T>,
    pub(crate) rendered: bool,
    pub(crate) shapes: ShapeSet<G>,
    pub(crate) tooltips: TooltipBindings,
    pub(crate) callbacks: PointerCallbacks<T>,
    pub(crate) hover: HoverState,
    pub(crate) clock: Clock,
    pub(crate) transitions: StagedTransitions,
}

impl<T, G: ShapeGeometry> ChartRuntime<T, G> {
    pub(crate) fn new(callbacks: PointerCallbacks<T>, transitions: StagedTransitions) -> Self {
        Self {
            data: Vec::new(),
            rendered: false,
            shapes: ShapeSet::default(),
            tooltips: TooltipBindings::default(),
            callbacks,
            hover: HoverState::default(),
            clock: Clock::default(),
            transitions,
        }
    }

    /// Stores `data` as the last dataset and stops in-flight tweens; returns
    /// the clock time the new stages are scheduled from.
    pub(crate) fn begin_render(&mut self, data: Vec<T>) -> f64 {
        let now = self.clock.now();
        self.data = data;
        self.rendered = true;
        self.shapes.interrupt(now);
        now
    }

    pub(crate) fn tick(&mut self, elapsed_ms: f64) -> f64 {
        let now = self.clock.advance(elapsed_ms);
        self.shapes.advance(now);
        now
    }

    pub(crate) fn finish(&mut self) {
        self.shapes.finish();
    }

    /// Replaces every tooltip; shapes only get one when `text` is configured.
    pub(crate) fn rebind_tooltips(&mut self, text: Option<&Accessor<T, String>>) {
        let tips = match text {
            Some(text) => self
                .shapes
                .active()
                .filter_map(|shape| {
                    let index = shape.datum?;
                    let datum = self.data.get(index)?;
                    Some(Tooltip::new(shape.key.clone(), text.get(datum, index)))
                })
                .collect(),
            None => Vec::new(),
        };
        let destroyed = self.tooltips.replace(tips);
        trace!(destroyed, created = self.tooltips.len(), "tooltips rebound");
    }

    /// Adds the shared per-shape markup: key, state classes, fill and tooltip.
    pub(crate) fn decorate(&self, shape: &Shape<G>, element: &mut SvgElement) {
        element.set_attr("data-key", &shape.key);
        for class in &shape.classes {
            element.add_class(class.clone());
        }
        if let Some(fill) = shape.fill.value() {
            element.set_style("fill", fill);
        }
        if shape.is_exiting() {
            return;
        }
        if let Some(tip) = self.tooltips.get(&shape.key) {
            tip.bind(element);
        }
    }

    /// Drops hover state pointing at a shape that is no longer bound.
    pub(crate) fn rebind_events(&mut self) {
        let shapes = &self.shapes;
        self.hover
            .forget_unless(|key| shapes.get(key).is_some_and(|shape| !shape.is_exiting()));
    }

    /// Topmost bound shape under the plot-local point.
    pub(crate) fn hit_test(&self, x: f64, y: f64) -> Option<Key> {
        self.shapes
            .active()
            .rev()
            .find(|shape| shape.geometry.contains(x, y))
            .map(|shape| shape.key.clone())
    }

    /// Updates hover from a pointer at canvas `(x, y)`, plot-local `local`.
    pub(crate) fn pointer_move(&mut self, x: f64, y: f64, local: (f64, f64)) -> HoverChange {
        let hit = self.hit_test(local.0, local.1);
        let change = self.hover.update(hit);
        self.dispatch_change(&change, x, y);
        change
    }

    pub(crate) fn pointer_leave(&mut self, x: f64, y: f64) -> HoverChange {
        let change = self.hover.update(None);
        self.dispatch_change(&change, x, y);
        change
    }

    pub(crate) fn click(&mut self, x: f64, y: f64, local: (f64, f64)) -> Option<Key> {
        let key = self.hit_test(local.0, local.1)?;
        self.dispatch(PointerEventKind::Click, x, y, &key);
        Some(key)
    }

    fn dispatch_change(&self, change: &HoverChange, x: f64, y: f64) {
        if let Some(left) = &change.left {
            self.dispatch(PointerEventKind::Out, x, y, left);
        }
        if let Some(entered) = &change.entered {
            self.dispatch(PointerEventKind::Over, x, y, entered);
        }
    }

    fn dispatch(&self, kind: PointerEventKind, x: f64, y: f64, key: &Key) -> bool {
        let handler = match kind {
            PointerEventKind::Over => self.callbacks.over.as_ref(),
            PointerEventKind::Out => self.callbacks.out.as_ref(),
            PointerEventKind::Click => self.callbacks.click.as_ref(),
        };
        let datum = self
            .shapes
            .get(key)
            .and_then(|shape| shape.datum)
            .and_then(|index| self.data.get(index));
        match (handler, datum) {
            (Some(handler), Some(datum)) => {
                trace!(?kind, %key, "dispatching pointer event");
                handler(&PointerEvent::new(kind, x, y), datum);
                true
            }
            _ => false,
        }
    }
}

impl<T, G: ShapeGeometry + GeometrySnapshotSource> ChartRuntime<T, G> {
    pub(crate) fn shape_snapshots(&self) -> Vec<ShapeSnapshot> {
        self.shapes
            .iter()
            .map(|shape| {
                let tooltip = self.tooltips.get(&shape.key).map(|tip| tip.content.clone());
                ShapeSnapshot::from_shape(shape, tooltip)
            })
            .collect()
    }
}

/// Evaluates `keys` over `data`, keeping the first record of each key.
pub(crate) fn keyed_rows<T>(data: &[T], keys: &Accessor<T, Key>) -> Vec<(Key, usize)> {
    let mut seen = IndexSet::with_capacity(data.len());
    let mut rows = Vec::with_capacity(data.len());
    for (index, datum) in data.iter().enumerate() {
        let key = keys.get(datum, index);
        if seen.insert(key.clone()) {
            rows.push((key, index));
        } else {
            warn!(%key, index, "duplicate key dropped from join");
        }
    }
    rows
}

/// Evaluates a numeric accessor for each joined row, rejecting non-finite output.
pub(crate) fn evaluate<T>(
    data: &[T],
    rows: &[(Key, usize)],
    accessor: &Accessor<T, f64>,
    name: &str,
) -> ChartResult<Vec<f64>> {
    rows.iter()
        .map(|(key, index)| {
            let value = accessor.get(&data[*index], *index);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ChartError::InvalidData(format!(
                    "{name} accessor returned {value} for key {key}"
                )))
            }
        })
        .collect()
}

/// Extent of `values`, or `None` when empty.
pub(crate) fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &value| match acc {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}

pub(crate) fn empty_domain(kind: ScaleType) -> (f64, f64) {
    match kind {
        ScaleType::Log { .. } => EMPTY_LOG_DOMAIN,
        _ => EMPTY_DOMAIN,
    }
}

/// Data-derived domain for a position dimension: widened to include zero,
/// except on log scales where zero is outside the support.
pub(crate) fn zero_based_domain(kind: ScaleType, values: &[f64]) -> (f64, f64) {
    match (extent(values), kind) {
        (None, kind) => empty_domain(kind),
        (Some(bounds), ScaleType::Log { .. }) => bounds,
        (Some((lo, hi)), _) => (lo.min(0.0), hi.max(0.0)),
    }
}

/// Pixel position of value zero, or `fallback` when zero cannot be mapped.
pub(crate) fn zero_pixel(scale: &ContinuousScale, fallback: f64) -> f64 {
    let pixel = scale.scale(0.0);
    if pixel.is_finite() { pixel } else { fallback }
}
