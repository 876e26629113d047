//! Subject-level dataset loaded from disk
//!
//! This module provides the data structures for the subjects file: one
//! [`SubjectRecord`] per study participant, bundled into a [`Cohort`].
//!
//! # Data Structure
//!
//! ```text
//! Cohort
//! └─ subjects: Vec<SubjectRecord>
//!     ├─ duration (follow-up time)
//!     ├─ event_observed (false = right-censored)
//!     └─ labels: map of grouping columns (e.g. "Rx", "sex")
//! ```
//!
//! The cohort is loaded once by the caller and passed by shared reference
//! into every comparison or summary call. Nothing in this crate mutates it or
//! stashes it in a global; each invocation recomputes from the handle it was
//! given.
//!
//! # Serialization
//!
//! All types implement `serde` traits for JSON:
//!
//! ```json
//! {
//!   "subjects": [
//!     {
//!       "duration": 6.0,
//!       "event_observed": true,
//!       "labels": {"Rx": "0", "sex": "male"}
//!     }
//!   ]
//! }
//! ```
//!
//! Label values are kept as strings on purpose: grouping treats them as
//! opaque category names, so `"0"`/`"1"` treatment codes and `"male"` /
//! `"female"` spellings need no special cases.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use remis_analysis::dataset::{Cohort, SubjectRecord};
//!
//! let cohort = Cohort {
//!     subjects: vec![
//!         SubjectRecord {
//!             duration: 6.0,
//!             event_observed: true,
//!             labels: BTreeMap::from([("Rx".to_string(), "0".to_string())]),
//!         },
//!         SubjectRecord {
//!             duration: 10.0,
//!             event_observed: false,
//!             labels: BTreeMap::from([("Rx".to_string(), "1".to_string())]),
//!         },
//!     ],
//! };
//!
//! assert_eq!(cohort.len(), 2);
//! assert_eq!(cohort.event_count(), 1);
//! assert_eq!(cohort.label_values("Rx"), vec!["0".to_string(), "1".to_string()]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use remis_stats::sample::EventRecord;
use serde::{Deserialize, Serialize};

/// The full subject-level dataset for one analysis session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cohort {
    /// All study participants, in file order.
    pub subjects: Vec<SubjectRecord>,
}

/// One study participant as recorded in the subjects file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectRecord {
    /// Follow-up duration in study time units.
    pub duration: f64,
    /// Whether the event occurred at `duration` (false = right-censored).
    pub event_observed: bool,
    /// Grouping columns, keyed by column name.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl SubjectRecord {
    /// Returns the subject's time-to-event observation without its labels.
    #[must_use]
    pub fn event_record(&self) -> EventRecord {
        EventRecord::new(self.duration, self.event_observed)
    }
}

impl Cohort {
    /// Returns the number of subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Returns `true` when the cohort has no subjects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Returns the number of subjects with an observed event.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.subjects.iter().filter(|s| s.event_observed).count()
    }

    /// Returns the number of right-censored subjects.
    #[must_use]
    pub fn censored_count(&self) -> usize {
        self.len() - self.event_count()
    }

    /// Returns the distinct values of a label column, sorted.
    ///
    /// Subjects without the column contribute nothing.
    #[must_use]
    pub fn label_values(&self, key: &str) -> Vec<String> {
        self.subjects
            .iter()
            .filter_map(|s| s.labels.get(key).cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Selects the observations of all subjects matching a predicate.
    #[must_use]
    pub fn select<F>(&self, mut predicate: F) -> Vec<EventRecord>
    where
        F: FnMut(&SubjectRecord) -> bool,
    {
        self.subjects
            .iter()
            .filter(|subject| predicate(subject))
            .map(SubjectRecord::event_record)
            .collect()
    }
}
