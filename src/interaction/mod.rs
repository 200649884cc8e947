use serde::{Deserialize, Serialize};

use crate::core::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer entered a shape.
    Over,
    /// Pointer left a shape.
    Out,
    Click,
}

/// Pointer event delivered to chart callbacks, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }
}

/// Hover transition produced by a pointer move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<Key>,
    pub entered: Option<Key>,
}

impl HoverChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.entered.is_none()
    }
}

/// Tracks which shape is under the pointer so over/out fire once per crossing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HoverState {
    hovered: Option<Key>,
}

impl HoverState {
    #[must_use]
    pub fn hovered(&self) -> Option<&Key> {
        self.hovered.as_ref()
    }

    /// Records the shape now under the pointer and reports the crossing, if any.
    pub fn update(&mut self, hit: Option<Key>) -> HoverChange {
        if self.hovered == hit {
            return HoverChange {
                left: None,
                entered: None,
            };
        }
        let left = std::mem::replace(&mut self.hovered, hit.clone());
        HoverChange { left, entered: hit }
    }

    /// Drops the hovered shape without reporting it; used when the shape no
    /// longer exists, since a removed element never sees the pointer leave.
    pub fn forget_unless(&mut self, still_present: impl Fn(&Key) -> bool) {
        if self.hovered.as_ref().is_some_and(|key| !still_present(key)) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_reports_each_crossing_once() {
        let mut hover = HoverState::default();
        let change = hover.update(Some(Key::from("a")));
        assert_eq!(change.entered, Some(Key::from("a")));
        assert_eq!(change.left, None);

        assert!(hover.update(Some(Key::from("a"))).is_empty());

        let change = hover.update(Some(Key::from("b")));
        assert_eq!(change.left, Some(Key::from("a")));
        assert_eq!(change.entered, Some(Key::from("b")));

        let change = hover.update(None);
        assert_eq!(change.left, Some(Key::from("b")));
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn forgotten_shapes_do_not_report_leaving() {
        let mut hover = HoverState::default();
        hover.update(Some(Key::from(1_usize)));
        hover.forget_unless(|_| false);
        assert!(hover.update(None).is_empty());
    }
}
