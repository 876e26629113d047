//! Cohort summary command
//!
//! Prints descriptive statistics for a subjects file: overall counts plus a
//! per-group table when grouping keys are given. The naive and event-only
//! mean columns make censoring bias visible next to the Kaplan-Meier median.

mod table;

use std::path::PathBuf;

use clap::Args;
use remis_analysis::{comparison, dataset::Cohort, summary::GroupSummary};

use crate::{command::summary::table::SummaryRow, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    /// Path to the subjects JSON file
    pub subjects: PathBuf,

    /// Label keys to group by (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub by: Vec<String>,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let cohort = util::read_subjects_file(&arg.subjects)?;

    println!("Cohort Summary ({} subjects)", cohort.len());
    println!("==========================================\n");

    table::print_legend();
    println!();

    let overall = GroupSummary::from_records(&cohort.select(|_| true))?;
    print_overall(&overall);

    if !arg.by.is_empty() {
        println!();
        print_group_table(&cohort, &arg.by)?;
    }

    Ok(())
}

fn print_overall(summary: &GroupSummary) {
    let mean_observed = summary
        .mean_observed
        .map_or("N/A".to_string(), |mean| format!("{mean:.1}"));

    println!("Overall Statistics:");
    println!(
        "  Subjects: {} total, {} events ({:.1}%), {} censored ({:.1}%)",
        summary.count,
        summary.events,
        100.0 - summary.censoring_rate(),
        summary.censored,
        summary.censoring_rate(),
    );
    println!(
        "  Mean duration: {:.1} naive, {} events only",
        summary.mean_naive, mean_observed,
    );
    println!(
        "  Median survival (KM): {}",
        table::median_display(summary.median),
    );
}

fn print_group_table(cohort: &Cohort, keys: &[String]) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for (label, records) in comparison::group_records_by_labels(cohort, keys) {
        let summary = GroupSummary::from_records(&records)?;
        rows.push(SummaryRow { label, summary });
    }

    println!("Groups by {}", keys.join(", "));
    table::print_summary_table("Group", &rows);

    Ok(())
}
