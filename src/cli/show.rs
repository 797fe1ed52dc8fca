use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;

use crate::storage::{entities::DayScheduleEntity, record_storage::RecordStorage};

use super::output::{paint_header, SEPARATOR};

/// Prints a stored day. Returns `false` if nothing was recorded for `date`.
pub async fn show_day(storage: &impl RecordStorage, date: NaiveDate) -> Result<bool> {
    let Some(day) = storage.load(date).await? else {
        println!("No schedule recorded for that date.");
        return Ok(false);
    };
    println!("\n{}", paint_header(&schedule_header(date)));
    print!("{}", format_schedule(&day));
    println!("{SEPARATOR}");
    Ok(true)
}

fn schedule_header(date: NaiveDate) -> String {
    format!("--- Schedule for {date} ---")
}

/// One `time_slot: task` line per interval.
pub fn format_schedule(day: &DayScheduleEntity) -> String {
    let mut result = String::new();
    for interval in &day.schedule {
        // Writing into a String can't fail
        let _ = writeln!(result, "{interval}");
    }
    result
}
