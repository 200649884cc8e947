use std::fmt::Write;

use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer, SvgElement};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Serializes frames to standalone SVG markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
    frames_rendered: usize,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the most recent frame.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.output
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let mut markup = String::new();
        write_element(&mut markup, &frame.root, true)
            .map_err(|e| ChartError::Render(format!("failed to write svg markup: {e}")))?;
        self.output = markup;
        self.frames_rendered += 1;
        Ok(())
    }
}

fn write_element(out: &mut String, element: &SvgElement, is_root: bool) -> std::fmt::Result {
    write!(out, "<{}", element.tag)?;
    if is_root {
        write!(out, " xmlns=\"{SVG_NAMESPACE}\"")?;
    }
    if !element.classes.is_empty() {
        write!(out, " class=\"{}\"", escape_xml(&element.classes.join(" ")))?;
    }
    for (name, value) in &element.attrs {
        write!(out, " {name}=\"{}\"", escape_xml(value))?;
    }
    if !element.styles.is_empty() {
        let style = element
            .styles
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(out, " style=\"{}\"", escape_xml(&style))?;
    }

    if element.text.is_none() && element.children.is_empty() {
        return out.write_str("/>");
    }
    out.write_char('>')?;
    if let Some(text) = &element.text {
        out.write_str(&escape_xml(text))?;
    }
    for child in &element.children {
        write_element(out, child, false)?;
    }
    write!(out, "</{}>", element.tag)
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_nested_markup_with_escaping() {
        let root = SvgElement::new("svg")
            .with_class("vis")
            .with_attr("width", 20)
            .with_attr("height", 10)
            .with_child(SvgElement::new("text").with_text("a < b & \"c\""))
            .with_child(SvgElement::new("g").with_style("fill", "red"));
        let mut renderer = SvgRenderer::new();
        renderer
            .render(&RenderFrame::new(20.0, 10.0, root))
            .expect("render");

        assert_eq!(
            renderer.output(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"vis\" width=\"20\" height=\"10\">\
             <text>a &lt; b &amp; &quot;c&quot;</text><g style=\"fill: red\"/></svg>"
        );
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn invalid_frames_are_not_written() {
        let root = SvgElement::new("svg").with_child(SvgElement::new("rect").with_attr("width", -2));
        let mut renderer = SvgRenderer::new();
        assert!(renderer.render(&RenderFrame::new(5.0, 5.0, root)).is_err());
        assert!(renderer.output().is_empty());
    }
}
