pub mod band_scale;
pub mod grid;
pub mod scale;
pub mod tick_format;
pub mod ticks;
pub mod types;

pub use band_scale::BandScale;
pub use grid::{Anchor, Grid};
pub use scale::{ContinuousScale, ScaleType};
pub use tick_format::{FormatKind, FormatSpec, TickFormat};
pub use ticks::{
    DEFAULT_TICK_COUNT, MAX_TICK_COUNT, precision_fixed, tick_increment, tick_step, ticks,
};
pub use types::{Key, Margin, Point};
