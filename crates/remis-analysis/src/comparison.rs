//! Multi-group survival comparison
//!
//! This module fans one cohort out into labeled groups, fits a Kaplan-Meier
//! curve per group, and collects the results for side-by-side display.
//!
//! # Overview
//!
//! A comparison takes labeled selections of observations and produces, per
//! label, a fitted curve plus the optional extras the configuration asks for
//! (confidence band, median survival). Groups are independent: a group whose
//! selection matches no records, or whose records fail validation, is
//! reported as a per-label failure while every other group still succeeds.
//! A renderer can draw the healthy curves and list the failed labels next to
//! them.
//!
//! Three entry points cover the common shapes of a comparison:
//!
//! - [`compare_groups`]: caller-prepared `(label, records)` pairs
//! - [`compare_by_labels`]: groups discovered from the distinct values of one
//!   or more label columns (e.g. by treatment, or treatment crossed with sex)
//! - [`compare_selections`]: explicitly requested groups with equality
//!   filters, where an empty match is a reportable failure rather than a
//!   silently missing curve
//!
//! # Failure semantics
//!
//! Per-group data problems never abort the call; they land in
//! [`ComparisonResult::failures`]. The only hard error is a duplicate label
//! within one call, which is a caller bug rather than a data condition.
//!
//! # Examples
//!
//! ```
//! use remis_analysis::comparison::{ComparisonConfig, compare_groups};
//! use remis_stats::sample::EventRecord;
//!
//! let treated = vec![
//!     EventRecord::new(6.0, true),
//!     EventRecord::new(9.0, false),
//!     EventRecord::new(13.0, true),
//! ];
//! let control = vec![EventRecord::new(4.0, true), EventRecord::new(8.0, true)];
//!
//! let result = compare_groups(
//!     [
//!         ("treated".to_string(), treated),
//!         ("control".to_string(), control),
//!     ],
//!     &ComparisonConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.groups.len(), 2);
//! assert!(result.failures.is_empty());
//! assert_eq!(result.groups[0].label, "treated");
//! ```

use std::collections::{BTreeMap, BTreeSet};

use remis_stats::{
    confidence::{ConfidenceBand, ConfidenceLevel},
    median::MedianSurvival,
    sample::{EventRecord, EventSample, InvalidInputError},
    survival::SurvivalCurve,
};
use serde::{Deserialize, Serialize};

use crate::dataset::{Cohort, SubjectRecord};

/// Label used for the single group of an ungrouped comparison.
pub const OVERALL_LABEL: &str = "overall";

/// Axis ranges handed through to the renderer unmodified.
///
/// The comparison itself never reads these; they exist so a caller can pin
/// plots of different groups to one shared coordinate window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AxisLimits {
    /// Left edge of the time axis.
    pub x_min: f64,
    /// Right edge of the time axis.
    pub x_max: f64,
    /// Bottom edge of the probability axis.
    pub y_min: f64,
    /// Top edge of the probability axis.
    pub y_max: f64,
}

/// Display options for one comparison call.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ComparisonConfig {
    /// Compute a pointwise confidence band per group.
    pub show_confidence: bool,
    /// Resolve the median survival time per group.
    pub show_median: bool,
    /// Level for the confidence band (defaults to 0.95).
    pub confidence_level: ConfidenceLevel,
    /// Axis ranges to pass through to the renderer.
    pub axis_limits: Option<AxisLimits>,
}

impl Default for ComparisonConfig {
    /// Bare curves: no band, no median, 95% level if a band is turned on.
    fn default() -> Self {
        Self {
            show_confidence: false,
            show_median: false,
            confidence_level: ConfidenceLevel::default(),
            axis_limits: None,
        }
    }
}

/// Error for a requested group that matched no records at all.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("no records match group '{label}'")]
pub struct DegenerateGroupError {
    /// Label of the empty group.
    pub label: String,
}

/// Why a single group produced no curve.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GroupError {
    /// The group's selection was empty.
    #[display("{_0}")]
    Degenerate(DegenerateGroupError),
    /// The group's records failed sample validation.
    #[display("{_0}")]
    InvalidSample(InvalidInputError),
}

/// Error for two groups submitted under the same label in one call.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("duplicate group label '{label}'")]
pub struct DuplicateLabelError {
    /// The label that appeared more than once.
    pub label: String,
}

/// A successfully fitted group.
#[derive(Debug, Clone)]
pub struct GroupCurve {
    /// The group's label as submitted.
    pub label: String,
    /// Fitted Kaplan-Meier curve.
    pub curve: SurvivalCurve,
    /// Confidence band, present when the config asked for one.
    pub band: Option<ConfidenceBand>,
    /// Median survival, present when the config asked for one.
    pub median: Option<MedianSurvival>,
}

/// A group that produced no curve, kept alongside the successes.
#[derive(Debug)]
pub struct GroupFailure {
    /// The group's label as submitted.
    pub label: String,
    /// What went wrong for this group.
    pub error: GroupError,
}

/// Outcome of one comparison call: fitted groups in submission order plus
/// the per-label failures.
#[derive(Debug)]
pub struct ComparisonResult {
    /// The configuration the comparison ran with.
    pub config: ComparisonConfig,
    /// Fitted groups, in the order they were submitted.
    pub groups: Vec<GroupCurve>,
    /// Groups that failed, in the order they were submitted.
    pub failures: Vec<GroupFailure>,
}

impl ComparisonResult {
    /// Looks up a fitted group by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&GroupCurve> {
        self.groups.iter().find(|group| group.label == label)
    }
}

/// An explicitly requested group: a label plus equality filters over the
/// cohort's label columns.
///
/// Empty filters match every subject, giving an "everyone" group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSelector {
    /// Label under which the group is reported.
    pub label: String,
    /// Column name to required value. All entries must match.
    pub filters: BTreeMap<String, String>,
}

impl GroupSelector {
    /// Returns `true` when the subject satisfies every filter.
    #[must_use]
    pub fn matches(&self, subject: &SubjectRecord) -> bool {
        self.filters
            .iter()
            .all(|(key, value)| subject.labels.get(key) == Some(value))
    }
}

/// Fits one curve per labeled group of records.
///
/// Groups are processed in submission order, and that order is preserved in
/// the result so a caller can pair groups with display colors by position.
/// An empty record list is reported as [`GroupError::Degenerate`], invalid
/// records as [`GroupError::InvalidSample`]; neither stops the other groups.
///
/// # Errors
///
/// Returns [`DuplicateLabelError`] if two groups share a label. No result
/// is produced in that case.
pub fn compare_groups<I>(
    groups: I,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, DuplicateLabelError>
where
    I: IntoIterator<Item = (String, Vec<EventRecord>)>,
{
    let mut seen = BTreeSet::new();
    let mut fitted = Vec::new();
    let mut failures = Vec::new();

    for (label, records) in groups {
        if !seen.insert(label.clone()) {
            return Err(DuplicateLabelError { label });
        }

        if records.is_empty() {
            let error = GroupError::Degenerate(DegenerateGroupError {
                label: label.clone(),
            });
            failures.push(GroupFailure { label, error });
            continue;
        }

        match EventSample::new(records) {
            Ok(sample) => {
                let curve = SurvivalCurve::fit(&sample);
                let band = config
                    .show_confidence
                    .then(|| ConfidenceBand::from_curve(&curve, config.confidence_level));
                let median = config.show_median.then(|| curve.median_survival());
                fitted.push(GroupCurve {
                    label,
                    curve,
                    band,
                    median,
                });
            }
            Err(error) => failures.push(GroupFailure {
                label,
                error: GroupError::InvalidSample(error),
            }),
        }
    }

    Ok(ComparisonResult {
        config: *config,
        groups: fitted,
        failures,
    })
}

/// Compares the groups formed by the distinct values of label columns.
///
/// With one key, each distinct value becomes a group labeled by that value.
/// With several keys, each observed value combination becomes a group
/// labeled `key=value, key=value`. With no keys at all, every subject lands
/// in a single group labeled [`OVERALL_LABEL`].
///
/// Subjects missing any of the keys are skipped; a column absent from the
/// whole cohort therefore yields a result with no groups rather than an
/// error. Discovered groups are submitted in sorted label order. A label
/// value that itself contains the `key=value` join syntax can make two
/// distinct combinations share a label; their records then merge into one
/// group.
///
/// # Errors
///
/// Discovered labels are unique by construction, so unlike the other entry
/// points this one does not produce [`DuplicateLabelError`] in practice;
/// the `Result` keeps the comparison calls interchangeable.
pub fn compare_by_labels(
    cohort: &Cohort,
    keys: &[String],
    config: &ComparisonConfig,
) -> Result<ComparisonResult, DuplicateLabelError> {
    compare_groups(group_records_by_labels(cohort, keys), config)
}

/// Collects the event records of each group formed by the label keys.
///
/// This is the grouping step of [`compare_by_labels`], exposed for callers
/// that want per-group records without fitting curves. With no keys, every
/// subject lands under [`OVERALL_LABEL`].
#[must_use]
pub fn group_records_by_labels(
    cohort: &Cohort,
    keys: &[String],
) -> BTreeMap<String, Vec<EventRecord>> {
    if keys.is_empty() {
        return BTreeMap::from([(OVERALL_LABEL.to_string(), cohort.select(|_| true))]);
    }

    let mut grouped: BTreeMap<String, Vec<EventRecord>> = BTreeMap::new();
    for subject in &cohort.subjects {
        let Some(label) = group_label(subject, keys) else {
            continue;
        };
        grouped.entry(label).or_default().push(subject.event_record());
    }
    grouped
}

/// Compares explicitly requested groups.
///
/// Each selector is matched against the cohort independently. A selector
/// that matches nothing contributes a [`GroupError::Degenerate`] failure
/// under its label; the remaining selectors still produce curves.
///
/// # Errors
///
/// Returns [`DuplicateLabelError`] if two selectors share a label.
pub fn compare_selections(
    cohort: &Cohort,
    selectors: &[GroupSelector],
    config: &ComparisonConfig,
) -> Result<ComparisonResult, DuplicateLabelError> {
    let groups = selectors.iter().map(|selector| {
        let records = cohort.select(|subject| selector.matches(subject));
        (selector.label.clone(), records)
    });
    compare_groups(groups, config)
}

/// Builds the group label for a subject, or `None` if any key is missing.
fn group_label(subject: &SubjectRecord, keys: &[String]) -> Option<String> {
    if let [key] = keys {
        return subject.labels.get(key).cloned();
    }

    let mut parts = Vec::with_capacity(keys.len());
    for key in keys {
        let value = subject.labels.get(key)?;
        parts.push(format!("{key}={value}"));
    }
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(duration: f64, event: bool, labels: &[(&str, &str)]) -> SubjectRecord {
        SubjectRecord {
            duration,
            event_observed: event,
            labels: labels
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    fn trial_cohort() -> Cohort {
        Cohort {
            subjects: vec![
                subject(6.0, true, &[("Rx", "0"), ("sex", "male")]),
                subject(6.0, true, &[("Rx", "0"), ("sex", "female")]),
                subject(9.0, false, &[("Rx", "0"), ("sex", "male")]),
                subject(4.0, true, &[("Rx", "1"), ("sex", "female")]),
                subject(5.0, true, &[("Rx", "1"), ("sex", "male")]),
                subject(8.0, true, &[("Rx", "1"), ("sex", "female")]),
            ],
        }
    }

    fn selector(label: &str, filters: &[(&str, &str)]) -> GroupSelector {
        GroupSelector {
            label: label.to_string(),
            filters: filters
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_empty_selection_fails_only_that_label() {
        let cohort = trial_cohort();
        let selectors = [
            selector("treatment 0", &[("Rx", "0")]),
            selector("treatment 9", &[("Rx", "9")]),
        ];
        let result =
            compare_selections(&cohort, &selectors, &ComparisonConfig::default()).unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].label, "treatment 0");
        assert_eq!(result.groups[0].curve.points().len(), 3);

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].label, "treatment 9");
        assert!(matches!(
            result.failures[0].error,
            GroupError::Degenerate(_)
        ));
        assert_eq!(
            result.failures[0].error.to_string(),
            "no records match group 'treatment 9'"
        );
    }

    #[test]
    fn test_invalid_records_fail_only_that_label() {
        let groups = [
            (
                "good".to_string(),
                vec![EventRecord::new(3.0, true), EventRecord::new(5.0, false)],
            ),
            ("bad".to_string(), vec![EventRecord::new(-1.0, true)]),
        ];
        let result = compare_groups(groups, &ComparisonConfig::default()).unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].label, "good");
        assert_eq!(result.failures.len(), 1);
        assert!(matches!(
            result.failures[0].error,
            GroupError::InvalidSample(InvalidInputError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn test_duplicate_label_is_a_hard_error() {
        let groups = [
            ("arm".to_string(), vec![EventRecord::new(1.0, true)]),
            ("arm".to_string(), vec![EventRecord::new(2.0, true)]),
        ];
        let err = compare_groups(groups, &ComparisonConfig::default()).unwrap_err();
        assert_eq!(err.label, "arm");
        assert_eq!(err.to_string(), "duplicate group label 'arm'");
    }

    #[test]
    fn test_submission_order_preserved() {
        let cohort = trial_cohort();
        let selectors = [
            selector("second treatment", &[("Rx", "1")]),
            selector("first treatment", &[("Rx", "0")]),
        ];
        let result =
            compare_selections(&cohort, &selectors, &ComparisonConfig::default()).unwrap();
        let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["second treatment", "first treatment"]);
    }

    #[test]
    fn test_config_gates_band_and_median() {
        let cohort = trial_cohort();
        let bare = compare_by_labels(&cohort, &[], &ComparisonConfig::default()).unwrap();
        assert!(bare.groups[0].band.is_none());
        assert!(bare.groups[0].median.is_none());

        let config = ComparisonConfig {
            show_confidence: true,
            show_median: true,
            confidence_level: ConfidenceLevel::new(0.9).unwrap(),
            axis_limits: None,
        };
        let full = compare_by_labels(&cohort, &[], &config).unwrap();
        let group = &full.groups[0];
        let band = group.band.as_ref().unwrap();
        assert!((band.level().value() - 0.9).abs() < 1e-12);
        assert_eq!(band.intervals().len(), group.curve.points().len());
        assert!(group.median.is_some());
    }

    #[test]
    fn test_by_single_label_uses_values_as_labels() {
        let cohort = trial_cohort();
        let result = compare_by_labels(
            &cohort,
            &["Rx".to_string()],
            &ComparisonConfig::default(),
        )
        .unwrap();

        let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1"]);

        // Treatment 0 has three subjects, treatment 1 has three
        assert_eq!(result.get("0").unwrap().curve.points()[1].at_risk, 3);
        assert_eq!(result.get("1").unwrap().curve.points()[1].at_risk, 3);
    }

    #[test]
    fn test_by_multiple_labels_builds_cell_groups() {
        let cohort = trial_cohort();
        let result = compare_by_labels(
            &cohort,
            &["Rx".to_string(), "sex".to_string()],
            &ComparisonConfig::default(),
        )
        .unwrap();

        let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Rx=0, sex=female",
                "Rx=0, sex=male",
                "Rx=1, sex=female",
                "Rx=1, sex=male",
            ]
        );
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_by_labels_skips_subjects_missing_a_key() {
        let mut cohort = trial_cohort();
        cohort.subjects.push(subject(12.0, true, &[]));

        let result = compare_by_labels(
            &cohort,
            &["Rx".to_string()],
            &ComparisonConfig::default(),
        )
        .unwrap();

        let total: usize = result
            .groups
            .iter()
            .map(|g| g.curve.points()[1].at_risk)
            .sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_unknown_key_yields_no_groups() {
        let cohort = trial_cohort();
        let result = compare_by_labels(
            &cohort,
            &["dose".to_string()],
            &ComparisonConfig::default(),
        )
        .unwrap();
        assert!(result.groups.is_empty());
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_no_keys_build_overall_group() {
        let cohort = trial_cohort();
        let result = compare_by_labels(&cohort, &[], &ComparisonConfig::default()).unwrap();
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].label, OVERALL_LABEL);
        assert_eq!(result.groups[0].curve.points()[1].at_risk, 6);
    }

    #[test]
    fn test_grouping_exposes_per_group_records() {
        let cohort = trial_cohort();
        let grouped = group_records_by_labels(&cohort, &["sex".to_string()]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["female"].len(), 3);
        assert_eq!(grouped["male"].len(), 3);
    }

    #[test]
    fn test_empty_filters_match_everyone() {
        let cohort = trial_cohort();
        let selectors = [selector("everyone", &[])];
        let result =
            compare_selections(&cohort, &selectors, &ComparisonConfig::default()).unwrap();
        assert_eq!(result.groups[0].curve.points()[1].at_risk, 6);
    }
}
