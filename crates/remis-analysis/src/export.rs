//! Renderer-facing comparison output
//!
//! Flattens a [`ComparisonResult`] into plain serializable structs so a
//! chart frontend can draw it without knowing any estimator types. Curves
//! become `(x, y)` point lists, confidence bands become parallel lower and
//! upper traces aligned index-for-index with the curve, and failed groups
//! become label/message pairs for display next to the chart.
//!
//! The serialized shape, trimmed to one group:
//!
//! ```json
//! {
//!   "confidence_level": 0.95,
//!   "axis_limits": { "x_min": 0.0, "x_max": 40.0, "y_min": 0.0, "y_max": 1.0 },
//!   "groups": [
//!     {
//!       "label": "treatment 1",
//!       "color": "#1f6f43",
//!       "points": [{ "x": 0.0, "y": 1.0 }, { "x": 6.0, "y": 0.857 }],
//!       "lower": [{ "x": 0.0, "y": 1.0 }, { "x": 6.0, "y": 0.334 }],
//!       "upper": [{ "x": 0.0, "y": 1.0 }, { "x": 6.0, "y": 0.978 }],
//!       "median": { "status": "reached", "time": 23.0 }
//!     }
//!   ],
//!   "failures": [{ "label": "treatment 9", "message": "no records match group 'treatment 9'" }]
//! }
//! ```

use remis_stats::median::MedianSurvival;
use serde::{Deserialize, Serialize};

use crate::comparison::{AxisLimits, ComparisonResult, GroupCurve, GroupFailure};

/// One chart coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ChartPoint {
    /// Time coordinate.
    pub x: f64,
    /// Probability coordinate.
    pub y: f64,
}

/// One drawable curve with its optional band and median.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurveSeries {
    /// Group label for the legend.
    pub label: String,
    /// Display color as `#rrggbb`, assigned by the caller.
    pub color: Option<String>,
    /// Survival curve as step-plot anchor points.
    pub points: Vec<ChartPoint>,
    /// Lower confidence trace, aligned with `points`.
    pub lower: Option<Vec<ChartPoint>>,
    /// Upper confidence trace, aligned with `points`.
    pub upper: Option<Vec<ChartPoint>>,
    /// Median survival marker, when the comparison resolved one.
    pub median: Option<MedianSurvival>,
}

impl CurveSeries {
    /// Flattens one fitted group. The color is left unset.
    #[must_use]
    pub fn from_group(group: &GroupCurve) -> Self {
        let points = group
            .curve
            .points()
            .iter()
            .map(|point| ChartPoint {
                x: point.time,
                y: point.survival,
            })
            .collect();

        let (lower, upper) = group.band.as_ref().map_or((None, None), |band| {
            let mut lower = Vec::with_capacity(band.intervals().len());
            let mut upper = Vec::with_capacity(band.intervals().len());
            for (point, interval) in group.curve.points().iter().zip(band.intervals()) {
                lower.push(ChartPoint {
                    x: point.time,
                    y: interval.lower,
                });
                upper.push(ChartPoint {
                    x: point.time,
                    y: interval.upper,
                });
            }
            (Some(lower), Some(upper))
        });

        Self {
            label: group.label.clone(),
            color: None,
            points,
            lower,
            upper,
            median: group.median,
        }
    }
}

/// A failed group, reduced to its label and a display message.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FailureReport {
    /// Label of the failed group.
    pub label: String,
    /// Human-readable reason the group produced no curve.
    pub message: String,
}

impl FailureReport {
    /// Renders one group failure for display.
    #[must_use]
    pub fn from_failure(failure: &GroupFailure) -> Self {
        Self {
            label: failure.label.clone(),
            message: failure.error.to_string(),
        }
    }
}

/// A complete comparison, flattened for serialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComparisonExport {
    /// Level of the confidence traces, present when bands were computed.
    pub confidence_level: Option<f64>,
    /// Axis ranges forwarded from the configuration.
    pub axis_limits: Option<AxisLimits>,
    /// Drawable curves, in comparison order.
    pub groups: Vec<CurveSeries>,
    /// Groups that produced no curve.
    pub failures: Vec<FailureReport>,
}

impl ComparisonExport {
    /// Flattens a comparison result into its serializable form.
    #[must_use]
    pub fn from_result(result: &ComparisonResult) -> Self {
        Self {
            confidence_level: result
                .config
                .show_confidence
                .then(|| result.config.confidence_level.value()),
            axis_limits: result.config.axis_limits,
            groups: result.groups.iter().map(CurveSeries::from_group).collect(),
            failures: result
                .failures
                .iter()
                .map(FailureReport::from_failure)
                .collect(),
        }
    }
}
