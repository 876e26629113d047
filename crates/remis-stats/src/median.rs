//! Median survival time with an explicit not-reached marker

use serde::{Deserialize, Serialize};

use crate::survival::SurvivalCurve;

/// Median survival time of a fitted curve.
///
/// The median is the first observed time at which the survival probability is
/// at or below 0.5, read off the right-continuous step function directly. No
/// interpolation between steps: with survival exactly 0.5 at time `t`, the
/// median is `t`, not a midpoint of neighboring times.
///
/// Heavily censored samples can stay above 0.5 through the last observed
/// time. That outcome is a first-class value, `NotReached`, so consumers are
/// never handed a NaN or a sentinel number they might mistake for a time.
///
/// Serialized form is tagged and explicit:
///
/// ```json
/// {"status": "reached", "time": 23.0}
/// {"status": "not_reached"}
/// ```
///
/// # Examples
///
/// ```
/// use remis_stats::{median::MedianSurvival, sample::EventSample, survival::SurvivalCurve};
///
/// let sample = EventSample::from_pairs([
///     (5.0, true),
///     (5.0, true),
///     (10.0, false),
///     (12.0, true),
/// ])
/// .unwrap();
/// let curve = SurvivalCurve::fit(&sample);
///
/// // Survival hits exactly 0.5 at t=5
/// assert_eq!(curve.median_survival(), MedianSurvival::Reached { time: 5.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MedianSurvival {
    /// The survival probability reached 0.5 at this observed time.
    Reached {
        /// First time with survival at or below 0.5.
        time: f64,
    },
    /// The survival probability stayed above 0.5 through the whole curve.
    NotReached,
}

impl MedianSurvival {
    /// Resolves the median from a fitted curve.
    ///
    /// Scans the points in increasing time order and returns the first whose
    /// survival probability is at or below 0.5.
    #[must_use]
    pub fn from_curve(curve: &SurvivalCurve) -> Self {
        curve
            .points()
            .iter()
            .find(|point| point.survival <= 0.5)
            .map_or(Self::NotReached, |point| Self::Reached { time: point.time })
    }

    /// Returns the median time, or `None` when it was never reached.
    #[must_use]
    pub fn time(self) -> Option<f64> {
        match self {
            Self::Reached { time } => Some(time),
            Self::NotReached => None,
        }
    }

    /// Returns `true` when the curve reached the 0.5 threshold.
    #[must_use]
    pub fn is_reached(self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::EventSample;

    fn median_of(pairs: &[(f64, bool)]) -> MedianSurvival {
        let sample = EventSample::from_pairs(pairs.iter().copied()).unwrap();
        MedianSurvival::from_curve(&SurvivalCurve::fit(&sample))
    }

    #[test]
    fn test_exact_half_counts_as_reached() {
        // S(5) = 0.5 exactly: the median is 5, with no averaging toward 12
        let median = median_of(&[(5.0, true), (5.0, true), (10.0, false), (12.0, true)]);
        assert_eq!(median, MedianSurvival::Reached { time: 5.0 });
    }

    #[test]
    fn test_first_crossing_wins_when_curve_jumps_past_half() {
        // S(1) = 0.25, well below the threshold in a single step
        let median = median_of(&[(1.0, true), (1.0, true), (1.0, true), (2.0, true)]);
        assert_eq!(median, MedianSurvival::Reached { time: 1.0 });
    }

    #[test]
    fn test_heavy_censoring_leaves_median_not_reached() {
        let median = median_of(&[
            (2.0, true),
            (4.0, false),
            (6.0, false),
            (8.0, false),
            (10.0, false),
        ]);
        assert_eq!(median, MedianSurvival::NotReached);
        assert!(!median.is_reached());
        assert_eq!(median.time(), None);
    }

    #[test]
    fn test_all_censored_never_reaches() {
        let median = median_of(&[(1.0, false), (2.0, false), (3.0, false)]);
        assert_eq!(median, MedianSurvival::NotReached);
    }

    #[test]
    fn test_remission_treated_arm_median() {
        // 6-MP remission durations (weeks), 21 subjects, heavy censoring.
        // S(22) is about 0.538, S(23) about 0.448: the first crossing is 23.
        let median = median_of(&[
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
        ]);
        assert_eq!(median, MedianSurvival::Reached { time: 23.0 });
    }

    #[test]
    fn test_remission_placebo_arm_median() {
        // Placebo remission durations (weeks), 21 subjects, no censoring
        let durations = [
            1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 4.0, 5.0, 5.0, 8.0, 8.0, 8.0, 8.0, 11.0, 11.0, 12.0,
            12.0, 15.0, 17.0, 22.0, 23.0,
        ];
        let median = median_of(
            &durations
                .iter()
                .map(|&t| (t, true))
                .collect::<Vec<(f64, bool)>>(),
        );
        assert_eq!(median, MedianSurvival::Reached { time: 8.0 });
    }

    #[test]
    fn test_median_time_accessor() {
        let median = median_of(&[(4.0, true), (9.0, true)]);
        assert!(median.is_reached());
        let time = median.time().unwrap();
        assert!((time - 4.0).abs() < 1e-12);
    }
}
