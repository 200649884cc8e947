use serde::{Deserialize, Serialize};

use crate::core::{ScaleType, TickFormat};
use crate::error::{ChartError, ChartResult};

use super::visualisation::VisConfig;

pub const DEFAULT_BAR_PADDING: f64 = 0.1;
pub const DEFAULT_RADIUS_RANGE: (f64, f64) = (0.0, 25.0);

/// Serializable bar chart options; closures are supplied via `BarChartOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    #[serde(flatten)]
    pub vis: VisConfig,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub y_type: ScaleType,
    /// Explicit value domain; derived from the data when absent.
    pub y_domain: Option<(f64, f64)>,
    pub y_ticks: Option<usize>,
    pub y_format: Option<String>,
    /// Inner and outer band padding, as a fraction of the band step.
    pub padding: f64,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            vis: VisConfig::default(),
            x_label: None,
            y_label: None,
            y_type: ScaleType::Linear,
            y_domain: None,
            y_ticks: None,
            y_format: None,
            padding: DEFAULT_BAR_PADDING,
        }
    }
}

/// Serializable bubble chart options; closures are supplied via `BubbleChartOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleChartConfig {
    #[serde(flatten)]
    pub vis: VisConfig,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_type: ScaleType,
    pub x_domain: Option<(f64, f64)>,
    pub x_ticks: Option<usize>,
    pub x_format: Option<String>,
    pub y_type: ScaleType,
    pub y_domain: Option<(f64, f64)>,
    pub y_ticks: Option<usize>,
    pub y_format: Option<String>,
    pub r_type: ScaleType,
    pub r_domain: Option<(f64, f64)>,
    /// Rendered radius range in pixels.
    pub r_range: (f64, f64),
}

impl Default for BubbleChartConfig {
    fn default() -> Self {
        Self {
            vis: VisConfig::default(),
            x_label: None,
            y_label: None,
            x_type: ScaleType::Linear,
            x_domain: None,
            x_ticks: None,
            x_format: None,
            y_type: ScaleType::Linear,
            y_domain: None,
            y_ticks: None,
            y_format: None,
            r_type: ScaleType::Sqrt,
            r_domain: None,
            r_range: DEFAULT_RADIUS_RANGE,
        }
    }
}

macro_rules! impl_json_config {
    ($config:ty, $name:literal) => {
        impl $config {
            /// Serializes config to pretty JSON.
            pub fn to_json_pretty(&self) -> ChartResult<String> {
                serde_json::to_string_pretty(self).map_err(|e| {
                    ChartError::InvalidData(format!("failed to serialize {} config: {e}", $name))
                })
            }

            /// Deserializes config from JSON; missing fields take their defaults.
            pub fn from_json_str(input: &str) -> ChartResult<Self> {
                serde_json::from_str(input).map_err(|e| {
                    ChartError::InvalidData(format!("failed to parse {} config: {e}", $name))
                })
            }
        }
    };
}

impl_json_config!(BarChartConfig, "bar chart");
impl_json_config!(BubbleChartConfig, "bubble chart");

pub(crate) fn parse_format(specifier: Option<&str>) -> ChartResult<Option<TickFormat>> {
    specifier.map(TickFormat::parse).transpose()
}

pub(crate) fn validate_domain(domain: Option<(f64, f64)>) -> ChartResult<()> {
    match domain {
        Some((d0, d1)) if !d0.is_finite() || !d1.is_finite() => Err(ChartError::InvalidDomain(
            format!("domain bounds must be finite, got [{d0}, {d1}]"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_radius_range(range: (f64, f64)) -> ChartResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() || range.0 < 0.0 || range.1 < 0.0 {
        return Err(ChartError::InvalidRange(format!(
            "radius range must be finite and >= 0, got [{}, {}]",
            range.0, range.1
        )));
    }
    Ok(())
}
