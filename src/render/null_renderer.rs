use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// without serializing markup.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_element_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_element_count = frame.element_count();
        self.frames_rendered += 1;
        Ok(())
    }
}
