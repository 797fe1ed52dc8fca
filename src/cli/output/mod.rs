pub mod chart;
pub mod report;
pub mod task_tree;

use std::{future, io::IsTerminal, sync::Arc};

use ansi_term::Style;
use anyhow::Result;
use chrono::NaiveDate;
use futures::{stream, Stream, StreamExt};
use tracing::{debug, error};

use crate::storage::{entities::DayScheduleEntity, record_storage::RecordStorage};

pub const SEPARATOR: &str = "----------------------------------------";

/// Inclusive range of days to extract.
#[derive(Debug, Clone, Copy)]
pub struct ExtractConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ExtractConfig {
    /// Window of `days` days that ends with `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(chrono::Days::new(days.saturating_sub(1) as u64))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Extracts every stored [DayScheduleEntity] between 2 dates, oldest first. Only days that have a
/// record are loaded.
pub async fn extract_between(
    storage: impl RecordStorage,
    config: ExtractConfig,
) -> Result<impl Stream<Item = Result<DayScheduleEntity>>> {
    let storage = Arc::new(storage);
    let days = storage
        .record_dates()
        .await?
        .into_iter()
        .filter(move |day| config.contains(*day))
        .collect::<Vec<_>>();
    debug!("Found {} records between {} and {}", days.len(), config.start, config.end);

    let result = stream::iter(days)
        .map(move |day| {
            let storage = storage.clone();
            async move { (day, storage.load(day).await) }
        })
        .buffered(4)
        .filter_map(|(day, data)| {
            future::ready(match data {
                Ok(data) => data.map(Ok),
                Err(e) => {
                    error!("Failed to process record {day} {e}");
                    Some(Err(e))
                }
            })
        });

    Ok(result)
}

/// Makes headers stand out when printing into a terminal.
pub fn paint_header(header: &str) -> String {
    if std::io::stdout().is_terminal() {
        Style::new().bold().paint(header).to_string()
    } else {
        header.to_string()
    }
}
