//! Per-group descriptive statistics
//!
//! Counts, mean durations, and the Kaplan-Meier median for one sample,
//! suitable for a summary table. The two means exist to expose censoring
//! bias: averaging every duration as if it were an event time understates
//! survival whenever censored subjects are present, because their true event
//! times lie beyond the recorded durations.

use remis_stats::{
    median::MedianSurvival,
    sample::{EventRecord, EventSample, InvalidInputError},
    survival::SurvivalCurve,
};

/// Descriptive statistics for one group of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Total number of records.
    pub count: usize,
    /// Records where the event was observed.
    pub events: usize,
    /// Records censored before the event.
    pub censored: usize,
    /// Mean duration over event records only, `None` when there are none.
    pub mean_observed: Option<f64>,
    /// Mean duration over all records, censored included.
    pub mean_naive: f64,
    /// Median survival time from the fitted curve.
    pub median: MedianSurvival,
}

impl GroupSummary {
    /// Computes the summary for a validated sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use remis_analysis::summary::GroupSummary;
    /// use remis_stats::sample::{EventRecord, EventSample};
    ///
    /// let sample = EventSample::new(vec![
    ///     EventRecord::new(10.0, true),
    ///     EventRecord::new(20.0, false),
    /// ])
    /// .unwrap();
    /// let summary = GroupSummary::from_sample(&sample);
    ///
    /// assert_eq!(summary.mean_observed, Some(10.0));
    /// assert_eq!(summary.mean_naive, 15.0);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn from_sample(sample: &EventSample) -> Self {
        let records = sample.records();
        let count = records.len();
        let events = sample.event_count();

        let observed_total: f64 = records
            .iter()
            .filter(|record| record.event_observed)
            .map(|record| record.duration)
            .sum();
        let mean_observed = (events > 0).then(|| observed_total / events as f64);

        let naive_total: f64 = records.iter().map(|record| record.duration).sum();
        let mean_naive = naive_total / count as f64;

        let median = SurvivalCurve::fit(sample).median_survival();

        Self {
            count,
            events,
            censored: sample.censored_count(),
            mean_observed,
            mean_naive,
            median,
        }
    }

    /// Validates the records and computes their summary.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError`] when the records fail sample validation.
    pub fn from_records(records: &[EventRecord]) -> Result<Self, InvalidInputError> {
        let sample = EventSample::new(records.to_vec())?;
        Ok(Self::from_sample(&sample))
    }

    /// Share of records that were censored, as a percentage.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn censoring_rate(&self) -> f64 {
        self.censored as f64 / self.count as f64 * 100.0
    }

    /// Naive mean relative to the observed-event mean.
    ///
    /// Values below 1.0 mean censoring is dragging the naive average under
    /// the event-only average. `None` when no events were observed or the
    /// observed mean is zero.
    #[must_use]
    pub fn bias_ratio(&self) -> Option<f64> {
        self.mean_observed
            .filter(|mean| *mean > 0.0)
            .map(|mean| self.mean_naive / mean)
    }
}
