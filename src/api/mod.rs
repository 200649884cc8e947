mod accessor;
mod axis;
mod bar_chart;
mod bubble_chart;
mod chart_config;
mod chart_runtime;
mod shapes;
mod snapshot;
mod tooltip;
mod visualisation;

pub use accessor::{Accessor, Fill, PointerCallbacks, PointerHandler};
pub use axis::{AxisLayout, AxisOrient, AxisState, AxisTick, TICK_PADDING_PX, TICK_SIZE_PX};
pub use bar_chart::{BAR_CHART_CLASS, BarChart, BarChartOptions, BarDatum};
pub use bubble_chart::{BUBBLE_CHART_CLASS, BubbleChart, BubbleChartOptions, BubbleDatum};
pub use chart_config::{
    BarChartConfig, BubbleChartConfig, DEFAULT_BAR_PADDING, DEFAULT_RADIUS_RANGE,
};
pub use chart_runtime::{EMPTY_DOMAIN, EMPTY_LOG_DOMAIN};
pub use shapes::{BarGeometry, BubbleGeometry, JoinOutcome, Shape, ShapeGeometry, ShapeSet};
pub use snapshot::{
    CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartKind, ChartSnapshot, GeometrySnapshot,
    GeometrySnapshotSource, ShapeSnapshot,
};
pub use tooltip::{TOOLTIP_FADE_MS, TOOLTIP_THEME, Tooltip, TooltipBindings};
pub use visualisation::{TITLE_OFFSET_PX, VisConfig, Visualisation, Visualise};
