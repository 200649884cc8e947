use std::cmp::Ordering;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::core::Key;
use crate::transition::{Animated, AnimatedPaint};

/// Animated geometry of one shape kind.
pub trait ShapeGeometry: Clone {
    fn advance(&mut self, now_ms: f64);
    fn interrupt(&mut self);
    fn finish(&mut self);
    fn is_animating(&self) -> bool;
    /// Hit test at the current animated geometry, in plot coordinates.
    fn contains(&self, x: f64, y: f64) -> bool;
}

/// Rectangle of a bar, relative to the plot origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub x: Animated,
    pub y: Animated,
    pub width: Animated,
    pub height: Animated,
}

impl BarGeometry {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Animated::new(x),
            y: Animated::new(y),
            width: Animated::new(width),
            height: Animated::new(height),
        }
    }

    fn parts_mut(&mut self) -> [&mut Animated; 4] {
        [
            &mut self.x,
            &mut self.y,
            &mut self.width,
            &mut self.height,
        ]
    }

    fn parts(&self) -> [&Animated; 4] {
        [&self.x, &self.y, &self.width, &self.height]
    }
}

impl ShapeGeometry for BarGeometry {
    fn advance(&mut self, now_ms: f64) {
        self.parts_mut().into_iter().for_each(|v| v.advance(now_ms));
    }

    fn interrupt(&mut self) {
        self.parts_mut().into_iter().for_each(Animated::interrupt);
    }

    fn finish(&mut self) {
        self.parts_mut().into_iter().for_each(Animated::finish);
    }

    fn is_animating(&self) -> bool {
        self.parts().into_iter().any(Animated::is_animating)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (left, top) = (self.x.value(), self.y.value());
        x >= left
            && x <= left + self.width.value()
            && y >= top
            && y <= top + self.height.value()
    }
}

/// Circle of a bubble, relative to the plot origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleGeometry {
    pub cx: Animated,
    pub cy: Animated,
    pub r: Animated,
}

impl BubbleGeometry {
    #[must_use]
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            cx: Animated::new(cx),
            cy: Animated::new(cy),
            r: Animated::new(r),
        }
    }
}

impl ShapeGeometry for BubbleGeometry {
    fn advance(&mut self, now_ms: f64) {
        for value in [&mut self.cx, &mut self.cy, &mut self.r] {
            value.advance(now_ms);
        }
    }

    fn interrupt(&mut self) {
        for value in [&mut self.cx, &mut self.cy, &mut self.r] {
            value.interrupt();
        }
    }

    fn finish(&mut self) {
        for value in [&mut self.cx, &mut self.cy, &mut self.r] {
            value.finish();
        }
    }

    fn is_animating(&self) -> bool {
        [&self.cx, &self.cy, &self.r]
            .into_iter()
            .any(Animated::is_animating)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx.value(), y - self.cy.value());
        dx.hypot(dy) <= self.r.value()
    }
}

/// One data-bound visual element.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape<G> {
    pub key: Key,
    /// Index of the bound record in the last dataset; `None` once exiting.
    pub datum: Option<usize>,
    pub geometry: G,
    pub fill: AnimatedPaint,
    pub classes: SmallVec<[String; 2]>,
    /// Clock time at which an exiting shape is removed.
    pub remove_at_ms: Option<f64>,
}

impl<G: ShapeGeometry> Shape<G> {
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.remove_at_ms.is_some()
    }

    pub fn set_class(&mut self, class: &str, enabled: bool) {
        let present = self.classes.iter().position(|c| c == class);
        match (present, enabled) {
            (None, true) => self.classes.push(class.to_owned()),
            (Some(index), false) => {
                self.classes.remove(index);
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Keys sorted into the three join sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinOutcome {
    pub entered: Vec<Key>,
    pub updated: Vec<Key>,
    pub exited: Vec<Key>,
}

/// Keyed collection of shapes in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSet<G> {
    shapes: IndexMap<Key, Shape<G>>,
}

impl<G> Default for ShapeSet<G> {
    fn default() -> Self {
        Self {
            shapes: IndexMap::new(),
        }
    }
}

impl<G: ShapeGeometry> ShapeSet<G> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Shape<G>> {
        self.shapes.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Shape<G>> {
        self.shapes.get_mut(key)
    }

    /// Shapes in paint order (later shapes are drawn on top).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape<G>> {
        self.shapes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape<G>> {
        self.shapes.values_mut()
    }

    /// Shapes bound to the current dataset.
    pub fn active(&self) -> impl DoubleEndedIterator<Item = &Shape<G>> {
        self.shapes.values().filter(|shape| !shape.is_exiting())
    }

    /// Stops all in-flight tweens at their current values and drops shapes
    /// still exiting from an earlier render.
    pub fn interrupt(&mut self, now_ms: f64) {
        self.advance(now_ms);
        let before = self.shapes.len();
        self.shapes.retain(|_, shape| !shape.is_exiting());
        for shape in self.shapes.values_mut() {
            shape.geometry.interrupt();
            shape.fill.interrupt();
        }
        let dropped = before - self.shapes.len();
        if dropped > 0 {
            trace!(dropped, "interrupted exiting shapes");
        }
    }

    /// Reconciles shapes against `rows`, given as `(key, datum index)` with
    /// distinct keys in data order.
    ///
    /// New keys are created with `enter`; vanished keys are marked exiting
    /// and left in place until `remove_at_ms`. Afterwards exiting shapes paint
    /// first and bound shapes follow in data order.
    pub fn join(
        &mut self,
        rows: &[(Key, usize)],
        remove_at_ms: f64,
        mut enter: impl FnMut(&Key, usize) -> G,
    ) -> JoinOutcome {
        let mut outcome = JoinOutcome::default();
        let mut next = IndexMap::with_capacity(rows.len());

        for (key, datum) in rows {
            let shape = match self.shapes.shift_remove(key) {
                Some(mut shape) => {
                    shape.datum = Some(*datum);
                    outcome.updated.push(key.clone());
                    shape
                }
                None => {
                    outcome.entered.push(key.clone());
                    Shape {
                        key: key.clone(),
                        datum: Some(*datum),
                        geometry: enter(key, *datum),
                        fill: AnimatedPaint::default(),
                        classes: SmallVec::new(),
                        remove_at_ms: None,
                    }
                }
            };
            next.insert(key.clone(), shape);
        }

        let mut exiting: IndexMap<Key, Shape<G>> = std::mem::take(&mut self.shapes);
        for shape in exiting.values_mut() {
            shape.datum = None;
            shape.remove_at_ms = Some(remove_at_ms);
            outcome.exited.push(shape.key.clone());
        }
        exiting.extend(next);
        self.shapes = exiting;
        outcome
    }

    /// Reorders bound shapes with `compare`; exiting shapes stay underneath.
    pub fn sort_active_by(&mut self, mut compare: impl FnMut(&Shape<G>, &Shape<G>) -> Ordering) {
        self.shapes.sort_by(|_, a, _, b| match (a.is_exiting(), b.is_exiting()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => Ordering::Equal,
            (false, false) => compare(a, b),
        });
    }

    /// Advances every tween and removes exiting shapes whose time has come.
    pub fn advance(&mut self, now_ms: f64) {
        for shape in self.shapes.values_mut() {
            shape.geometry.advance(now_ms);
            shape.fill.advance(now_ms);
        }
        self.shapes
            .retain(|_, shape| shape.remove_at_ms.is_none_or(|at| now_ms < at));
    }

    pub fn finish(&mut self) {
        self.shapes.retain(|_, shape| !shape.is_exiting());
        for shape in self.shapes.values_mut() {
            shape.geometry.finish();
            shape.fill.finish();
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.shapes.values().any(|shape| {
            shape.is_exiting() || shape.geometry.is_animating() || shape.fill.is_animating()
        })
    }

    /// Clears `class` everywhere, then sets it on bound shapes whose key is in `keys`.
    pub fn select(&mut self, keys: &[Key], class: &str) {
        for shape in self.shapes.values_mut() {
            shape.set_class(class, false);
        }
        for key in keys {
            if let Some(shape) = self.shapes.get_mut(key) {
                if !shape.is_exiting() {
                    shape.set_class(class, true);
                }
            }
        }
    }
}
