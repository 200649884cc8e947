use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Key;
use crate::error::{ChartError, ChartResult};

use super::axis::AxisLayout;
use super::shapes::{BarGeometry, BubbleGeometry, Shape, ShapeGeometry};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Bubble,
}

/// Current (possibly mid-transition) geometry of one shape, plot-relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometrySnapshot {
    Bar {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Bubble {
        cx: f64,
        cy: f64,
        r: f64,
    },
}

pub trait GeometrySnapshotSource {
    fn snapshot(&self) -> GeometrySnapshot;
}

impl GeometrySnapshotSource for BarGeometry {
    fn snapshot(&self) -> GeometrySnapshot {
        GeometrySnapshot::Bar {
            x: self.x.value(),
            y: self.y.value(),
            width: self.width.value(),
            height: self.height.value(),
        }
    }
}

impl GeometrySnapshotSource for BubbleGeometry {
    fn snapshot(&self) -> GeometrySnapshot {
        GeometrySnapshot::Bubble {
            cx: self.cx.value(),
            cy: self.cy.value(),
            r: self.r.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub key: Key,
    pub geometry: GeometrySnapshot,
    pub fill: Option<String>,
    pub classes: Vec<String>,
    pub exiting: bool,
    pub tooltip: Option<String>,
}

impl ShapeSnapshot {
    pub(crate) fn from_shape<G>(shape: &Shape<G>, tooltip: Option<String>) -> Self
    where
        G: ShapeGeometry + GeometrySnapshotSource,
    {
        Self {
            key: shape.key.clone(),
            geometry: shape.geometry.snapshot(),
            fill: shape.fill.value().map(str::to_owned),
            classes: shape.classes.iter().cloned().collect(),
            exiting: shape.is_exiting(),
            tooltip,
        }
    }
}

/// Serializable chart state used by regression tests and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    pub title: Option<String>,
    pub clock_ms: f64,
    /// Continuous domains by dimension name (`x`, `y`, `r`).
    pub domains: IndexMap<String, (f64, f64)>,
    /// Band keys of a categorical axis, in axis order.
    pub categories: Vec<Key>,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
    pub shapes: Vec<ShapeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChartSnapshotJsonContractV1 {
    schema_version: u32,
    snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    #[must_use]
    pub fn shape(&self, key: &Key) -> Option<&ShapeSnapshot> {
        self.shapes.iter().find(|shape| &shape.key == key)
    }

    #[must_use]
    pub fn domain(&self, dimension: &str) -> Option<(f64, f64)> {
        self.domains.get(dimension).copied()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both a bare snapshot and the versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::axis::AxisOrient;

    fn snapshot() -> ChartSnapshot {
        let mut domains = IndexMap::new();
        domains.insert("y".to_owned(), (-3.0, 5.0));
        ChartSnapshot {
            kind: ChartKind::Bar,
            width: 400.0,
            height: 300.0,
            title: None,
            clock_ms: 0.0,
            domains,
            categories: vec![Key::from("a")],
            x_axis: AxisLayout::empty(AxisOrient::Bottom),
            y_axis: AxisLayout::empty(AxisOrient::Left),
            shapes: vec![ShapeSnapshot {
                key: Key::from("a"),
                geometry: GeometrySnapshot::Bar {
                    x: 1.0,
                    y: 2.0,
                    width: 3.0,
                    height: 4.0,
                },
                fill: Some("#ff0000".to_owned()),
                classes: vec!["selected".to_owned()],
                exiting: false,
                tooltip: None,
            }],
        }
    }

    #[test]
    fn contract_payload_is_accepted_by_compat_reader() {
        let original = snapshot();
        let json = original.to_json_contract_v1_pretty().expect("serialize");
        assert!(json.contains("\"schema_version\": 1"));
        let parsed = ChartSnapshot::from_json_compat_str(&json).expect("parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let json = serde_json::json!({ "schema_version": 9, "snapshot": snapshot() }).to_string();
        let err = ChartSnapshot::from_json_compat_str(&json).expect_err("version");
        assert!(err.to_string().contains("unsupported snapshot schema version: 9"));
    }
}
