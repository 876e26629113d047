//! Cohort handling and multi-group survival comparison
//!
//! This crate sits between raw subject data and a display surface. It models
//! labeled cohorts, fans them out into groups, fits a Kaplan-Meier curve per
//! group via [`remis_stats`], and flattens the outcome into plain chart data
//! a renderer can serialize.
//!
//! # Overview
//!
//! ## Comparison Workflow
//!
//! Produce side-by-side survival curves for the groups of a cohort:
//!
//! 1. **Load Subjects** ([`dataset::Cohort`]): Deserialize duration, event
//!    flag, and free-form labels per subject
//! 2. **Form Groups** ([`comparison::compare_by_labels`] or
//!    [`comparison::compare_selections`]): Split by label values, or match
//!    explicit selectors
//! 3. **Flatten** ([`export::ComparisonExport`]): Reduce fitted curves,
//!    confidence traces, and medians to serializable point lists
//!
//! Per-group data problems (an empty selection, an invalid record) are
//! carried as labeled failures next to the successful curves, so one bad
//! group never blanks a whole chart.
//!
//! ## Summary Workflow
//!
//! Describe each group in a table instead of a chart:
//!
//! 1. **Load Subjects** ([`dataset::Cohort`])
//! 2. **Summarize** ([`summary::GroupSummary`]): Counts, censoring rate,
//!    naive and event-only mean durations, Kaplan-Meier median
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use remis_analysis::{
//!     comparison::{ComparisonConfig, compare_by_labels},
//!     dataset::{Cohort, SubjectRecord},
//!     export::ComparisonExport,
//! };
//!
//! let arm = |name: &str| BTreeMap::from([("arm".to_string(), name.to_string())]);
//! let cohort = Cohort {
//!     subjects: vec![
//!         SubjectRecord { duration: 6.0, event_observed: true, labels: arm("treated") },
//!         SubjectRecord { duration: 9.0, event_observed: false, labels: arm("treated") },
//!         SubjectRecord { duration: 4.0, event_observed: true, labels: arm("control") },
//!     ],
//! };
//!
//! let result = compare_by_labels(
//!     &cohort,
//!     &["arm".to_string()],
//!     &ComparisonConfig::default(),
//! )?;
//! let export = ComparisonExport::from_result(&result);
//!
//! assert_eq!(export.groups.len(), 2);
//! assert_eq!(export.groups[0].label, "control");
//! assert_eq!(export.groups[1].label, "treated");
//! # Ok::<(), remis_analysis::comparison::DuplicateLabelError>(())
//! ```

pub mod comparison;
pub mod dataset;
pub mod export;
pub mod summary;
