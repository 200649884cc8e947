use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Key;
use crate::render::SvgElement;

pub const TOOLTIP_FADE_MS: u32 = 50;
pub const TOOLTIP_THEME: &str = "vis-dark";

/// Popover bound to one shape; rebuilt from scratch on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    pub key: Key,
    pub content: String,
    pub allow_html: bool,
    pub duration_ms: u32,
    pub theme: String,
}

impl Tooltip {
    #[must_use]
    pub fn new(key: Key, content: String) -> Self {
        Self {
            key,
            content,
            allow_html: true,
            duration_ms: TOOLTIP_FADE_MS,
            theme: TOOLTIP_THEME.to_owned(),
        }
    }

    /// Adds popover attributes plus a plain `<title>` fallback to `shape`.
    pub fn bind(&self, shape: &mut SvgElement) {
        shape.set_attr("data-tippy-content", &self.content);
        shape.set_attr("data-tippy-theme", &self.theme);
        shape.set_attr("data-tippy-duration", self.duration_ms);
        shape.set_attr("data-tippy-allowhtml", self.allow_html);
        shape.push_child(SvgElement::new("title").with_text(self.content.clone()));
    }
}

/// Tooltips currently attached to the chart's shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TooltipBindings {
    tips: IndexMap<Key, Tooltip>,
}

impl TooltipBindings {
    /// Disposes every existing tooltip; returns how many were destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let destroyed = self.tips.len();
        self.tips.clear();
        destroyed
    }

    /// Later tips replace earlier ones bound to the same key.
    pub fn replace(&mut self, tips: Vec<Tooltip>) -> usize {
        let destroyed = self.destroy_all();
        self.tips = tips.into_iter().map(|tip| (tip.key.clone(), tip)).collect();
        destroyed
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Tooltip> {
        self.tips.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }
}
