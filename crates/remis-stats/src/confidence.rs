//! Pointwise confidence intervals for survival curves
//!
//! This module turns the Greenwood variance carried by each
//! [`SurvivalPoint`](crate::survival::SurvivalPoint) into a pointwise
//! confidence band using the log-minus-log transform.
//!
//! # Why log-minus-log
//!
//! A symmetric interval `S ± z * se` can leave the `[0, 1]` range near the
//! ends of the curve. Transforming to `log(-log S)`, building the symmetric
//! interval there, and mapping back gives bounds
//!
//! ```text
//! S ^ exp(±z * se(log(-log S)))
//! ```
//!
//! which stay inside `[0, 1]` without any clamping. This is the same interval
//! construction used by standard survival analysis tooling at the default
//! 95% level.
//!
//! Where the curve sits exactly at 1 (before any event) or 0 (after the last
//! subject at risk had the event) the transform is undefined and the interval
//! collapses to the zero-width `[S, S]`.

use serde::{Deserialize, Serialize};

use crate::survival::SurvivalCurve;

/// Error for a confidence level outside the open interval (0, 1).
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("confidence level must be strictly between 0 and 1, got {level}")]
pub struct InvalidLevelError {
    /// The rejected level.
    pub level: f64,
}

/// A validated two-sided confidence level, such as 0.95.
///
/// The type makes invalid levels unrepresentable past the construction
/// boundary: estimation code can take a `ConfidenceLevel` by value and never
/// re-validate.
///
/// # Examples
///
/// ```
/// use remis_stats::confidence::ConfidenceLevel;
///
/// let level = ConfidenceLevel::new(0.95).unwrap();
/// assert!((level.z_score() - 1.96).abs() < 1e-4);
///
/// assert!(ConfidenceLevel::new(1.0).is_err());
/// assert!(ConfidenceLevel::new(-0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Validates a two-sided confidence level.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevelError`] unless `0 < level < 1`. NaN is rejected.
    pub fn new(level: f64) -> Result<Self, InvalidLevelError> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(InvalidLevelError { level })
        }
    }

    /// Returns the level as a plain fraction.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the two-sided standard-normal critical value for this level.
    ///
    /// For the default level of 0.95 this is the familiar 1.96.
    #[must_use]
    pub fn z_score(self) -> f64 {
        normal_quantile(0.5 + self.0 / 2.0)
    }
}

impl Default for ConfidenceLevel {
    /// The conventional 95% level.
    fn default() -> Self {
        Self(0.95)
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = InvalidLevelError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

/// Lower and upper survival bounds at one curve point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ConfidenceInterval {
    /// Lower survival bound.
    pub lower: f64,
    /// Upper survival bound.
    pub upper: f64,
}

/// A pointwise confidence band aligned with a survival curve.
///
/// The band carries one [`ConfidenceInterval`] per curve point, in the same
/// order, so index `i` of the band belongs to index `i` of
/// [`SurvivalCurve::points`].
///
/// # Examples
///
/// ```
/// use remis_stats::{
///     confidence::{ConfidenceBand, ConfidenceLevel},
///     sample::EventSample,
///     survival::SurvivalCurve,
/// };
///
/// let sample = EventSample::from_pairs([(3.0, true), (5.0, true), (9.0, false)]).unwrap();
/// let curve = SurvivalCurve::fit(&sample);
/// let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());
///
/// assert_eq!(band.intervals().len(), curve.points().len());
/// // At time zero the curve is exactly 1 and the interval is zero-width.
/// assert_eq!(band.intervals()[0].lower, 1.0);
/// assert_eq!(band.intervals()[0].upper, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfidenceBand {
    level: ConfidenceLevel,
    intervals: Vec<ConfidenceInterval>,
}

impl ConfidenceBand {
    /// Computes the Greenwood log-minus-log band for a fitted curve.
    ///
    /// Each point's interval is `S ^ exp(±z * se)` where `se` is the standard
    /// error of `log(-log S)` derived from the point's Greenwood variance.
    /// The exponent with the plus sign gives the lower bound (pushing `S`
    /// toward 0), the minus sign the upper bound.
    #[must_use]
    pub fn from_curve(curve: &SurvivalCurve, level: ConfidenceLevel) -> Self {
        let z = level.z_score();
        let intervals = curve
            .points()
            .iter()
            .map(|point| {
                let s = point.survival;
                if s > 0.0 && s < 1.0 {
                    let se = point.variance.sqrt() / (s * s.ln()).abs();
                    let spread = (z * se).exp();
                    ConfidenceInterval {
                        lower: s.powf(spread),
                        upper: s.powf(1.0 / spread),
                    }
                } else {
                    // Transform undefined at the extremes; zero-width interval
                    ConfidenceInterval { lower: s, upper: s }
                }
            })
            .collect();
        Self { level, intervals }
    }

    /// Returns the level the band was computed for.
    #[must_use]
    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    /// Returns the intervals, index-aligned with the curve points.
    #[must_use]
    pub fn intervals(&self) -> &[ConfidenceInterval] {
        &self.intervals
    }
}

/// Inverse standard-normal CDF via the Acklam rational approximation.
///
/// Accurate to about 1e-9 over the whole open interval, far below the
/// tolerances that matter for confidence bands.
#[allow(clippy::excessive_precision)]
fn normal_quantile(p: f64) -> f64 {
    assert!(p > 0.0 && p < 1.0, "quantile probability must be in (0, 1)");

    // Acklam (2003) coefficients
    const CENTRAL_NUM: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const CENTRAL_DEN: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const TAIL_NUM: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const TAIL_DEN: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const TAIL_SPLIT: f64 = 0.02425;

    let tail = |q: f64| {
        (((((TAIL_NUM[0] * q + TAIL_NUM[1]) * q + TAIL_NUM[2]) * q + TAIL_NUM[3]) * q
            + TAIL_NUM[4])
            * q
            + TAIL_NUM[5])
            / ((((TAIL_DEN[0] * q + TAIL_DEN[1]) * q + TAIL_DEN[2]) * q + TAIL_DEN[3]) * q + 1.0)
    };

    if p < TAIL_SPLIT {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - TAIL_SPLIT {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((CENTRAL_NUM[0] * r + CENTRAL_NUM[1]) * r + CENTRAL_NUM[2]) * r + CENTRAL_NUM[3]) * r
            + CENTRAL_NUM[4])
            * r
            + CENTRAL_NUM[5])
            * q
            / (((((CENTRAL_DEN[0] * r + CENTRAL_DEN[1]) * r + CENTRAL_DEN[2]) * r
                + CENTRAL_DEN[3])
                * r
                + CENTRAL_DEN[4])
                * r
                + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::EventSample;

    fn remission_curve() -> SurvivalCurve {
        let pairs = [
            (6.0, true),
            (6.0, true),
            (6.0, true),
            (6.0, false),
            (7.0, true),
            (9.0, false),
            (10.0, true),
            (10.0, false),
            (11.0, false),
            (13.0, true),
            (16.0, true),
            (17.0, false),
            (19.0, false),
            (20.0, false),
            (22.0, true),
            (23.0, true),
            (25.0, false),
            (32.0, false),
            (32.0, false),
            (34.0, false),
            (35.0, false),
        ];
        let sample = EventSample::from_pairs(pairs).unwrap();
        SurvivalCurve::fit(&sample)
    }

    #[test]
    fn test_level_validation() {
        assert!(ConfidenceLevel::new(0.5).is_ok());
        assert!(ConfidenceLevel::new(0.95).is_ok());
        assert!(ConfidenceLevel::new(0.999).is_ok());

        assert!(ConfidenceLevel::new(0.0).is_err());
        assert!(ConfidenceLevel::new(1.0).is_err());
        assert!(ConfidenceLevel::new(-0.2).is_err());
        assert!(ConfidenceLevel::new(1.5).is_err());
        assert!(ConfidenceLevel::new(f64::NAN).is_err());
    }

    #[test]
    fn test_default_level_is_95_percent() {
        let level = ConfidenceLevel::default();
        assert!((level.value() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_z_scores_for_common_levels() {
        let z90 = ConfidenceLevel::new(0.90).unwrap().z_score();
        let z95 = ConfidenceLevel::new(0.95).unwrap().z_score();
        let z99 = ConfidenceLevel::new(0.99).unwrap().z_score();

        assert!((z90 - 1.6449).abs() < 1e-4);
        assert!((z95 - 1.9600).abs() < 1e-4);
        assert!((z99 - 2.5758).abs() < 1e-4);
    }

    #[test]
    fn test_z_score_in_tail_region() {
        // Pushes the quantile argument past the central region split
        let z = ConfidenceLevel::new(0.9999).unwrap().z_score();
        assert!((z - 3.8906).abs() < 1e-3);
    }

    #[test]
    fn test_band_matches_published_values() {
        // 95% band for the treated remission arm at t=6: [0.6197, 0.9515]
        let curve = remission_curve();
        let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());

        let idx = curve
            .points()
            .iter()
            .position(|p| (p.time - 6.0).abs() < 1e-12)
            .unwrap();
        let interval = band.intervals()[idx];

        assert!((interval.lower - 0.6197).abs() < 1e-3);
        assert!((interval.upper - 0.9515).abs() < 1e-3);
    }

    #[test]
    fn test_band_brackets_the_estimate() {
        let curve = remission_curve();
        let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());

        assert_eq!(band.intervals().len(), curve.points().len());
        for (point, interval) in curve.points().iter().zip(band.intervals()) {
            assert!(interval.lower >= 0.0);
            assert!(interval.upper <= 1.0);
            assert!(interval.lower <= point.survival);
            assert!(point.survival <= interval.upper);
        }
    }

    #[test]
    fn test_band_collapses_at_extremes() {
        // Before any event the curve is exactly 1
        let sample = EventSample::from_pairs([(4.0, false), (8.0, false)]).unwrap();
        let curve = SurvivalCurve::fit(&sample);
        let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());
        for interval in band.intervals() {
            assert_eq!(interval.lower, 1.0);
            assert_eq!(interval.upper, 1.0);
        }

        // Once the curve reaches exactly 0 the interval is [0, 0]
        let sample = EventSample::from_pairs([(2.0, true), (5.0, true)]).unwrap();
        let curve = SurvivalCurve::fit(&sample);
        let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());
        let last = band.intervals().last().unwrap();
        assert_eq!(last.lower, 0.0);
        assert_eq!(last.upper, 0.0);
    }

    #[test]
    fn test_higher_level_widens_the_band() {
        let curve = remission_curve();
        let narrow = ConfidenceBand::from_curve(&curve, ConfidenceLevel::new(0.90).unwrap());
        let wide = ConfidenceBand::from_curve(&curve, ConfidenceLevel::new(0.99).unwrap());

        let idx = curve
            .points()
            .iter()
            .position(|p| (p.time - 13.0).abs() < 1e-12)
            .unwrap();
        let narrow_width = narrow.intervals()[idx].upper - narrow.intervals()[idx].lower;
        let wide_width = wide.intervals()[idx].upper - wide.intervals()[idx].lower;
        assert!(wide_width > narrow_width);
    }

    #[test]
    fn test_level_round_trips_through_f64() {
        let level = ConfidenceLevel::try_from(0.8).unwrap();
        assert!((f64::from(level) - 0.8).abs() < 1e-12);
        assert!(ConfidenceLevel::try_from(2.0).is_err());
    }
}
