use std::fmt::Display;

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Retained SVG node: tag, ordered attributes, classes, inline style, text and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub classes: SmallVec<[String; 2]>,
    pub styles: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<SvgElement>,
}

impl SvgElement {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: SvgElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Display) {
        self.attrs.insert(name.into(), value.to_string());
    }

    pub fn set_style(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.styles.insert(name.into(), value.into());
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn push_child(&mut self, child: SvgElement) {
        self.children.push(child);
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for elements carrying `class`.
    #[must_use]
    pub fn find_all_by_class<'a>(&'a self, class: &str) -> Vec<&'a SvgElement> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a SvgElement>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    /// Number of elements in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SvgElement::count).sum::<usize>()
    }
}
