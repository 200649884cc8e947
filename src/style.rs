//! Static visual defaults applied to the canvas, title and axis labels.

use crate::render::SvgElement;

pub const BLACK: &str = "#282828";
pub const GREY: &str = "#656565";
pub const WHITE: &str = "#fefefe";
pub const FONT: &str = "sans-serif";

/// Style table shared by a chart family. Not mutable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    pub vis_border: &'static str,
    pub vis_back_color: &'static str,
    pub title_font: &'static str,
    pub title_align: &'static str,
    pub title_color: &'static str,
    pub title_size: &'static str,
    pub title_weight: &'static str,
    pub legend_font: &'static str,
    pub legend_color: &'static str,
    pub legend_align: &'static str,
    pub legend_size: &'static str,
}

pub static DEFAULT_STYLE: StyleConfig = StyleConfig {
    vis_border: "solid 1px #282828",
    vis_back_color: WHITE,
    title_font: FONT,
    title_align: "middle",
    title_color: GREY,
    title_size: "1.2em",
    title_weight: "bold",
    legend_font: FONT,
    legend_color: GREY,
    legend_align: "middle",
    legend_size: "0.8em",
};

impl StyleConfig {
    pub fn apply_style_svg(&self, svg: &mut SvgElement) {
        svg.set_style("border", self.vis_border);
        svg.set_style("background-color", self.vis_back_color);
    }

    pub fn apply_style_title(&self, title: &mut SvgElement) {
        title.set_style("font-family", self.title_font);
        title.set_style("fill", self.title_color);
        title.set_style("font-size", self.title_size);
        title.set_style("text-anchor", self.title_align);
        title.set_style("font-weight", self.title_weight);
    }

    /// Axis labels use the legend entries of the table.
    pub fn apply_style_legend(&self, label: &mut SvgElement) {
        label.set_style("font-family", self.legend_font);
        label.set_style("fill", self.legend_color);
        label.set_style("font-size", self.legend_size);
        label.set_style("text-anchor", self.legend_align);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_style_uses_border_and_background() {
        let mut svg = SvgElement::new("svg");
        DEFAULT_STYLE.apply_style_svg(&mut svg);
        assert_eq!(svg.styles.get("border").map(String::as_str), Some("solid 1px #282828"));
        assert_eq!(svg.styles.get("background-color").map(String::as_str), Some(WHITE));
    }

    #[test]
    fn title_style_is_bold_and_centered() {
        let mut title = SvgElement::new("text");
        DEFAULT_STYLE.apply_style_title(&mut title);
        assert_eq!(title.styles.get("font-weight").map(String::as_str), Some("bold"));
        assert_eq!(title.styles.get("text-anchor").map(String::as_str), Some("middle"));
        assert_eq!(title.styles.get("fill").map(String::as_str), Some(GREY));
    }
}
