mod element;
mod frame;
mod null_renderer;
mod primitives;
mod svg_renderer;

pub use element::SvgElement;
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::Color;
pub use svg_renderer::SvgRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
