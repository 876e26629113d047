use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{median::MedianSurvival, sample::EventSample};

/// One step of a Kaplan-Meier survival curve.
///
/// Each point describes the estimator state at one distinct observed
/// duration: how many subjects were still at risk just before that time, how
/// many events occurred at it, the survival probability from that time on,
/// and the Greenwood variance of the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SurvivalPoint {
    /// Distinct observed duration this point belongs to.
    pub time: f64,
    /// Number of subjects at risk just before `time`. Subjects censored
    /// exactly at `time` still count as at risk here.
    pub at_risk: usize,
    /// Number of events observed at `time` (0 for censor-only times).
    pub events: usize,
    /// Estimated probability of surviving beyond `time`.
    pub survival: f64,
    /// Greenwood variance estimate of `survival` (0 while survival is 1 and
    /// once it reaches 0).
    pub variance: f64,
}

/// Kaplan-Meier product-limit estimate of a survival function.
///
/// The estimator handles right-censored observations: a censored record
/// reduces the at-risk count for later times but never counts as an event, so
/// the curve is not dragged down by subjects whose true event time is
/// unknown.
///
/// The curve is a right-continuous step function. It starts at probability
/// 1.0 at time zero and carries one point per distinct observed duration,
/// whether or not an event occurred there, so downstream series keep a point
/// for every observed time. Between points the probability is constant.
///
/// # Examples
///
/// ```
/// use remis_stats::{sample::EventSample, survival::SurvivalCurve};
///
/// // Two events at 5, a censoring at 10, an event at 12.
/// let sample = EventSample::from_pairs([
///     (5.0, true),
///     (5.0, true),
///     (10.0, false),
///     (12.0, true),
/// ])
/// .unwrap();
/// let curve = SurvivalCurve::fit(&sample);
///
/// assert_eq!(curve.survival_at(4.9), 1.0);
/// assert_eq!(curve.survival_at(5.0), 0.5);
/// assert_eq!(curve.survival_at(11.0), 0.5); // censoring does not drop the curve
/// assert_eq!(curve.survival_at(12.0), 0.0); // last subject at risk had the event
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurvivalCurve {
    points: Vec<SurvivalPoint>,
}

impl SurvivalCurve {
    /// Fits the product-limit estimator to a validated sample.
    ///
    /// Walks the sorted records once, grouping tied durations. For a group at
    /// time `t` with `d` events out of `n` subjects at risk, the survival
    /// probability is multiplied by `1 - d/n`; censored records in the group
    /// leave the probability unchanged and only shrink the at-risk count for
    /// later groups. When `d == n` the probability drops to exactly 0.
    ///
    /// The Greenwood variance term `d / (n * (n - d))` is accumulated in the
    /// same pass, so every point carries the variance needed for confidence
    /// intervals without a second walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use remis_stats::{sample::EventSample, survival::SurvivalCurve};
    ///
    /// let sample = EventSample::from_pairs([(3.0, true), (7.0, false)]).unwrap();
    /// let curve = SurvivalCurve::fit(&sample);
    ///
    /// // Anchor at time zero, then one point per distinct duration.
    /// assert_eq!(curve.points().len(), 3);
    /// assert_eq!(curve.points()[0].survival, 1.0);
    /// assert_eq!(curve.points()[1].survival, 0.5);
    /// assert_eq!(curve.points()[2].survival, 0.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(sample: &EventSample) -> Self {
        let records = sample.records();
        let total = records.len();

        let mut points = Vec::new();
        let mut survival = 1.0;
        let mut greenwood_sum = 0.0;

        let mut i = 0;
        while i < total {
            let time = records[i].duration;
            let at_risk = total - i;

            // Count events in the tie group at this time
            let mut events = 0;
            let mut j = i;
            while j < total && records[j].duration.total_cmp(&time) == Ordering::Equal {
                if records[j].event_observed {
                    events += 1;
                }
                j += 1;
            }

            let variance = if events == at_risk {
                // Every remaining subject had the event: the curve reaches
                // exactly 0 and the Greenwood term is undefined.
                survival = 0.0;
                0.0
            } else {
                if events > 0 {
                    let d = events as f64;
                    let n = at_risk as f64;
                    survival *= 1.0 - d / n;
                    greenwood_sum += d / (n * (n - d));
                }
                survival * survival * greenwood_sum
            };

            points.push(SurvivalPoint {
                time,
                at_risk,
                events,
                survival,
                variance,
            });

            i = j;
        }

        // Anchor the curve at probability 1.0 at time zero, unless the first
        // observed time is a censor-only group at zero that already is that
        // anchor.
        let needs_anchor = points
            .first()
            .is_none_or(|first| first.time > 0.0 || first.events > 0);
        if needs_anchor {
            points.insert(
                0,
                SurvivalPoint {
                    time: 0.0,
                    at_risk: total,
                    events: 0,
                    survival: 1.0,
                    variance: 0.0,
                },
            );
        }

        Self { points }
    }

    /// Returns the curve points in increasing time order.
    ///
    /// The first point is always at time 0.0 with survival 1.0.
    #[must_use]
    pub fn points(&self) -> &[SurvivalPoint] {
        &self.points
    }

    /// Returns the survival probability at a specific time.
    ///
    /// The curve is a right-continuous step function: the probability stays
    /// constant between observed times and changes exactly at event times.
    /// Times before zero report 1.0; times past the last observation report
    /// the final probability.
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        self.points
            .iter()
            .rev()
            .find(|point| point.time <= time)
            .map_or(1.0, |point| point.survival)
    }

    /// Returns the largest observed time on the curve.
    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.points.last().map_or(0.0, |point| point.time)
    }

    /// Returns the median survival time under step semantics.
    ///
    /// See [`MedianSurvival::from_curve`] for the crossing rule.
    #[must_use]
    pub fn median_survival(&self) -> MedianSurvival {
        MedianSurvival::from_curve(self)
    }

    /// Returns explicit staircase coordinates for plotting.
    ///
    /// Every drop contributes a corner point, so the result can be drawn with
    /// straight line segments by renderers that have no step mode.
    #[must_use]
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        let mut coords = Vec::with_capacity(self.points.len() * 2);
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 && self.points[i - 1].survival > point.survival {
                coords.push((point.time, self.points[i - 1].survival));
            }
            coords.push((point.time, point.survival));
        }
        coords
    }
}
