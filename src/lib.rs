//! vis-charts: declarative bar and bubble charts rendered as SVG.
//!
//! Charts own their scales, axes and a keyed shape set. Every render joins the
//! new dataset against the shapes by key and schedules three staged transitions
//! on an explicit clock; hosts advance it with `tick` and serialize the current
//! frame through a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod style;
pub mod telemetry;
pub mod transition;

pub use api::{
    Accessor, BarChart, BarChartConfig, BarChartOptions, BarDatum, BubbleChart,
    BubbleChartConfig, BubbleChartOptions, BubbleDatum, ChartSnapshot, Fill, PointerHandler,
    VisConfig, Visualise,
};
pub use error::{ChartError, ChartResult};
