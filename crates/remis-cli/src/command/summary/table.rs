//! Group summary table display
//!
//! This module provides functions for displaying per-group descriptive
//! statistics in a consistent tabular format.

use remis_analysis::summary::GroupSummary;
use remis_stats::median::MedianSurvival;

/// A row in a group summary table
pub(super) struct SummaryRow {
    /// Label for this row (group label or label-value combination)
    pub label: String,
    /// Descriptive statistics for this row
    pub summary: GroupSummary,
}

/// Print table header
///
/// # Arguments
/// * `label_col` - Name of the label column (e.g., "Group", "Treatment")
fn print_summary_table_header(label_col: &str) {
    println!(
        "  {:<20} {:>8} {:>8} {:>10} {:>12} {:>12} {:>10} {:>12}",
        label_col,
        "Subjects",
        "Events",
        "Censored%",
        "Mean(Evt)",
        "Mean(All)",
        "All/Evt",
        "Median(KM)",
    );
}

/// Print table separator line
fn print_summary_table_separator() {
    // label(20) + subjects(8) + events(8) + censored%(10) + mean_evt(12) + mean_all(12) + all_evt(10) + median(12) + spaces(7)
    println!("  {}", "-".repeat(99));
}

/// Print a single table row
fn print_summary_table_row(row: &SummaryRow) {
    let summary = &row.summary;

    let mean_observed = summary
        .mean_observed
        .map_or("N/A".to_string(), |mean| format!("{mean:.1}"));
    let bias_ratio = summary
        .bias_ratio()
        .map_or("N/A".to_string(), |ratio| format!("{ratio:.2}"));

    println!(
        "  {:<20} {:>8} {:>8} {:>9.1}% {:>12} {:>12.1} {:>10} {:>12}",
        row.label,
        summary.count,
        summary.events,
        summary.censoring_rate(),
        mean_observed,
        summary.mean_naive,
        bias_ratio,
        median_display(summary.median),
    );
}

/// Print a formatted group summary table
///
/// # Arguments
/// * `label_col` - Name of the label column
/// * `rows` - Table rows, one per group
pub(super) fn print_summary_table(label_col: &str, rows: &[SummaryRow]) {
    print_summary_table_header(label_col);
    print_summary_table_separator();

    for row in rows {
        print_summary_table_row(row);
    }
}

/// Render a median survival value for display
pub(super) fn median_display(median: MedianSurvival) -> String {
    match median {
        MedianSurvival::Reached { time } => format!("{time:.1}"),
        MedianSurvival::NotReached => "not reached".to_string(),
    }
}

/// Print legend explaining table columns
pub(super) fn print_legend() {
    println!("Legend:");
    println!("  Censored%   : Share of subjects censored before their event");
    println!("  Mean(Evt)   : Mean duration of observed events only (censored excluded)");
    println!("  Mean(All)   : Naive mean of all durations, censored treated as events");
    println!("  All/Evt     : Ratio of the naive mean to the event-only mean");
    println!("  Median(KM)  : Kaplan-Meier median survival time");
}
