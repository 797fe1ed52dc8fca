use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use futures::TryStreamExt;
use tracing::{info, instrument};

use crate::{storage::record_storage::RecordStorage, utils::clock::Clock};

use super::output::{
    chart::ChartRenderer,
    extract_between,
    paint_header,
    report::{format_report, report_header},
    task_tree::TaskTree,
    ExtractConfig, SEPARATOR,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
}

impl Period {
    pub fn days(&self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AnalysisOutcome {
    /// Nothing was recorded during the period.
    NoData,
    Reported {
        total_intervals: usize,
        chart: PathBuf,
    },
}

/// Builds a [TaskTree] out of every day recorded in the `period` that ends with `today`.
pub async fn collect_task_tree(
    storage: impl RecordStorage,
    period: Period,
    today: NaiveDate,
) -> Result<TaskTree> {
    let days = extract_between(storage, ExtractConfig::trailing(today, period.days())).await?;
    days.try_fold(TaskTree::new(), |mut tree, day| async move {
        tree.add_schedule(&day);
        Ok(tree)
    })
    .await
}

/// Command to process `--analyze`. Prints percentage of time spent on every task and sub-task,
/// then renders a chart. The period ends with the current day of `clock`.
#[instrument(skip(storage, renderer, clock))]
pub async fn analyze_period(
    storage: impl RecordStorage,
    renderer: &impl ChartRenderer,
    period: Period,
    clock: &impl Clock,
) -> Result<AnalysisOutcome> {
    let tree = collect_task_tree(storage, period, clock.today()).await?;

    if tree.is_empty() {
        println!("No schedule data found for the specified period.");
        return Ok(AnalysisOutcome::NoData);
    }
    let total_intervals = tree.total_intervals();
    info!("Analyzing {total_intervals} intervals");

    println!("\n{}", paint_header(&report_header(period.days())));
    print!("{}", format_report(&tree));
    println!("{SEPARATOR}");

    let chart = renderer.render(&tree, total_intervals).await?;
    println!("\nVisualizations have been saved to '{}'", chart.display());

    Ok(AnalysisOutcome::Reported {
        total_intervals,
        chart,
    })
}
