//! Group comparison command
//!
//! Fits one Kaplan-Meier curve per group and emits renderer-ready chart
//! data as JSON on stdout (or to `--output`). Progress and a per-group
//! digest go to stderr so the JSON stream stays clean for piping.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use clap::Args;
use remis_analysis::{
    comparison::{self, AxisLimits, ComparisonConfig, ComparisonResult, GroupSelector},
    export::ComparisonExport,
};
use remis_stats::{confidence::ConfidenceLevel, median::MedianSurvival};

use crate::{
    palette,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Path to the subjects JSON file
    pub subjects: PathBuf,

    /// Label keys to group by (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub by: Vec<String>,

    /// Explicit group as LABEL[:key=value,...] (repeatable, alternative to --by)
    #[arg(long)]
    pub group: Vec<String>,

    /// Compute a pointwise confidence band per group
    #[arg(long)]
    pub confidence: bool,

    /// Confidence level for the bands
    #[arg(long, default_value_t = 0.95)]
    pub confidence_level: f64,

    /// Mark the median survival time per group
    #[arg(long)]
    pub median: bool,

    /// Left edge of the time axis for the renderer
    #[arg(long)]
    pub x_min: Option<f64>,

    /// Right edge of the time axis for the renderer
    #[arg(long)]
    pub x_max: Option<f64>,

    /// Bottom edge of the probability axis for the renderer
    #[arg(long)]
    pub y_min: Option<f64>,

    /// Top edge of the probability axis for the renderer
    #[arg(long)]
    pub y_max: Option<f64>,

    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    if !arg.by.is_empty() && !arg.group.is_empty() {
        anyhow::bail!("--by and --group cannot be combined");
    }

    let cohort = util::read_subjects_file(&arg.subjects)?;
    eprintln!(
        "Loaded {} subjects ({} events, {} censored)",
        cohort.len(),
        cohort.event_count(),
        cohort.censored_count()
    );

    let config = build_config(arg)?;
    let result = if arg.group.is_empty() {
        comparison::compare_by_labels(&cohort, &arg.by, &config)?
    } else {
        let selectors = arg
            .group
            .iter()
            .map(|raw| parse_selector(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;
        comparison::compare_selections(&cohort, &selectors, &config)?
    };

    report(&result);

    let mut export = ComparisonExport::from_result(&result);
    for (index, series) in export.groups.iter_mut().enumerate() {
        series.color = Some(palette::color_for(index).to_hex());
    }

    Output::save_json(&export, arg.output.clone())
}

fn build_config(arg: &CompareArg) -> anyhow::Result<ComparisonConfig> {
    let confidence_level =
        ConfidenceLevel::new(arg.confidence_level).context("Invalid --confidence-level")?;

    Ok(ComparisonConfig {
        show_confidence: arg.confidence,
        show_median: arg.median,
        confidence_level,
        axis_limits: build_axis_limits(arg.x_min, arg.x_max, arg.y_min, arg.y_max)?,
    })
}

fn build_axis_limits(
    x_min: Option<f64>,
    x_max: Option<f64>,
    y_min: Option<f64>,
    y_max: Option<f64>,
) -> anyhow::Result<Option<AxisLimits>> {
    match (x_min, x_max, y_min, y_max) {
        (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => Ok(Some(AxisLimits {
            x_min,
            x_max,
            y_min,
            y_max,
        })),
        (None, None, None, None) => Ok(None),
        _ => anyhow::bail!("axis limits require all of --x-min, --x-max, --y-min, and --y-max"),
    }
}

/// Parse a group selector of the form `LABEL[:key=value,...]`
///
/// A selector without filters matches every subject.
fn parse_selector(raw: &str) -> anyhow::Result<GroupSelector> {
    let (label, filter_part) = raw.split_once(':').unwrap_or((raw, ""));
    if label.is_empty() {
        anyhow::bail!("group selector {raw:?} has an empty label");
    }

    let mut filters = BTreeMap::new();
    if !filter_part.is_empty() {
        for pair in filter_part.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                anyhow::bail!("group filter {pair:?} is not key=value (in {raw:?})");
            };
            if key.is_empty() {
                anyhow::bail!("group filter {pair:?} has an empty key (in {raw:?})");
            }
            if filters.insert(key.to_string(), value.to_string()).is_some() {
                anyhow::bail!("group selector {raw:?} repeats filter key {key:?}");
            }
        }
    }

    Ok(GroupSelector {
        label: label.to_string(),
        filters,
    })
}

fn report(result: &ComparisonResult) {
    eprintln!(
        "Fitted {} of {} groups",
        result.groups.len(),
        result.groups.len() + result.failures.len()
    );

    for group in &result.groups {
        let points = group.curve.points();
        let subjects = points.first().map_or(0, |point| point.at_risk);
        let events: usize = points.iter().map(|point| point.events).sum();
        let final_survival = points.last().map_or(1.0, |point| point.survival);

        let median = match group.median {
            Some(MedianSurvival::Reached { time }) => format!(", median {time:.1}"),
            Some(MedianSurvival::NotReached) => ", median not reached".to_string(),
            None => String::new(),
        };
        eprintln!(
            "  {}: {subjects} subjects, {events} events, final survival {final_survival:.3}{median}",
            group.label,
        );
    }

    for failure in &result.failures {
        eprintln!("  {}: no curve ({})", failure.label, failure.error);
    }
}
