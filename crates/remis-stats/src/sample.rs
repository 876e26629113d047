//! Validated time-to-event observations
//!
//! This module provides the input types for survival estimation: individual
//! [`EventRecord`] observations and the [`EventSample`] collection that
//! validates and orders them.
//!
//! # Right-Censored Observations
//!
//! Each record carries a follow-up duration and an event flag. When the flag
//! is `false` the record is right-censored: the subject was still event-free
//! when observation stopped, so the true event time is only known to exceed
//! the recorded duration.
//!
//! ```text
//! Observed:  |----x   (event at duration 12)
//! Censored:  |------>  (event-free at duration 12, true time unknown)
//! ```
//!
//! Every estimator in this crate consumes an [`EventSample`], which guarantees
//! at construction time that the data is non-empty, finite, non-negative, and
//! sorted by duration. Invalid input is rejected with [`InvalidInputError`]
//! before any estimation happens; there is no silent fallback curve.

/// A single time-to-event observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    /// Follow-up duration in study time units. Must be finite and non-negative.
    pub duration: f64,
    /// Whether the event occurred at `duration` (`false` = right-censored).
    pub event_observed: bool,
}

impl EventRecord {
    /// Creates a new observation.
    ///
    /// Validation happens when the record enters an [`EventSample`], not here.
    #[must_use]
    pub fn new(duration: f64, event_observed: bool) -> Self {
        Self {
            duration,
            event_observed,
        }
    }
}

/// Error for input data that cannot be turned into a valid sample.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    /// The input contained no records at all.
    #[display("sample contains no records")]
    EmptySample,
    /// A record carried a negative duration.
    #[display("record {index} has negative duration {duration}")]
    NegativeDuration { index: usize, duration: f64 },
    /// A record carried a NaN or infinite duration.
    #[display("record {index} has non-finite duration")]
    NonFiniteDuration { index: usize },
}

/// A validated collection of observations, sorted ascending by duration.
///
/// Construction is the single validation point for survival input: an
/// `EventSample` is guaranteed non-empty with finite, non-negative durations,
/// so the estimators built on top of it cannot fail on malformed data.
///
/// # Examples
///
/// ```
/// use remis_stats::sample::EventSample;
///
/// let sample = EventSample::from_pairs([(12.0, true), (5.0, true), (9.0, false)]).unwrap();
/// assert_eq!(sample.records().len(), 3);
/// assert_eq!(sample.records()[0].duration, 5.0);
/// assert_eq!(sample.event_count(), 2);
/// assert_eq!(sample.censored_count(), 1);
/// ```
///
/// Invalid input is rejected up front:
///
/// ```
/// use remis_stats::sample::EventSample;
///
/// assert!(EventSample::from_pairs([]).is_err());
/// assert!(EventSample::from_pairs([(-1.0, true)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventSample {
    records: Vec<EventRecord>,
}

impl EventSample {
    /// Validates and sorts a collection of records into a sample.
    ///
    /// # Arguments
    ///
    /// * `records` - Observations in any order; the sample sorts them by
    ///   duration (ties stay adjacent).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError`] if the input is empty or any duration is
    /// negative or non-finite. The reported index refers to the input order.
    pub fn new(mut records: Vec<EventRecord>) -> Result<Self, InvalidInputError> {
        if records.is_empty() {
            return Err(InvalidInputError::EmptySample);
        }
        for (index, record) in records.iter().enumerate() {
            if !record.duration.is_finite() {
                return Err(InvalidInputError::NonFiniteDuration { index });
            }
            if record.duration < 0.0 {
                return Err(InvalidInputError::NegativeDuration {
                    index,
                    duration: record.duration,
                });
            }
        }
        records.sort_by(|a, b| a.duration.total_cmp(&b.duration));
        Ok(Self { records })
    }

    /// Builds a sample from `(duration, event_observed)` pairs.
    ///
    /// # Errors
    ///
    /// Same validation as [`EventSample::new`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self, InvalidInputError>
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let records = pairs
            .into_iter()
            .map(|(duration, event_observed)| EventRecord::new(duration, event_observed))
            .collect();
        Self::new(records)
    }

    /// Returns the records sorted ascending by duration.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Returns the number of records with an observed event.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.records.iter().filter(|r| r.event_observed).count()
    }

    /// Returns the number of right-censored records.
    #[must_use]
    pub fn censored_count(&self) -> usize {
        self.records.len() - self.event_count()
    }

    /// Returns the largest duration in the sample.
    #[must_use]
    pub fn max_duration(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.duration)
    }
}
