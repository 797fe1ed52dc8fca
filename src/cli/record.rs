use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::{
    config::TrackerConfig,
    storage::{
        entities::{parse_task_input, DayScheduleEntity, IntervalEntity},
        record_storage::RecordStorage,
    },
};

use super::prompt::Prompter;

pub const SLEEP_TASK: &str = "sleep";
const EXIT_COMMAND: &str = "exit";

/// Meaning of a single line typed while recording.
#[derive(Debug, PartialEq, Eq)]
pub enum RecordInput {
    /// Current and every remaining interval of the day is sleep.
    Sleep,
    /// Stop recording, keep what was recorded so far.
    Exit,
    Task(Vec<String>),
}

impl RecordInput {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case(SLEEP_TASK) {
            RecordInput::Sleep
        } else if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            RecordInput::Exit
        } else {
            RecordInput::Task(parse_task_input(input))
        }
    }
}

/// Interactively records a day. If the day already has intervals, recording resumes right after
/// the last stored one. The day is saved even if recording was stopped early.
#[instrument(skip(storage, prompter, config))]
pub async fn record_day(
    storage: &impl RecordStorage,
    prompter: &mut impl Prompter,
    config: &TrackerConfig,
    date: NaiveDate,
) -> Result<DayScheduleEntity> {
    let mut day = match storage.load(date).await? {
        Some(existing) => {
            println!(
                "Resuming schedule for {date} from interval {}...",
                existing.schedule.len() + 1
            );
            existing
        }
        None => DayScheduleEntity::new(date, config.day_start),
    };

    // A resumed day keeps the start it was recorded with, otherwise slots would stop lining up.
    let slots = config.time_slots_from(day.start_time);
    let resume_from = day.schedule.len();
    debug!("Recording {date} from interval {resume_from}");

    for (index, slot) in slots.iter().enumerate().skip(resume_from) {
        let Some(input) = prompter.ask(&format!("{slot}: ")).await? else {
            info!("Input ended at {slot}");
            break;
        };
        match RecordInput::parse(&input) {
            RecordInput::Sleep => {
                day.schedule.extend(
                    slots[index..]
                        .iter()
                        .map(|slot| IntervalEntity::new(*slot, vec![SLEEP_TASK.into()])),
                );
                break;
            }
            RecordInput::Exit => {
                println!("Exiting. Progress saved.");
                break;
            }
            RecordInput::Task(task) => day.schedule.push(IntervalEntity::new(*slot, task)),
        }
    }

    let path = storage.save(date, &day).await?;
    println!("Schedule saved to {}", path.display());
    Ok(day)
}

/// Walks through every stored interval of a day and lets the user replace it. Empty input keeps
/// the previous value. Returns [None] if the day was never recorded.
#[instrument(skip(storage, prompter))]
pub async fn update_day(
    storage: &impl RecordStorage,
    prompter: &mut impl Prompter,
    date: NaiveDate,
) -> Result<Option<DayScheduleEntity>> {
    let Some(mut day) = storage.load(date).await? else {
        println!("No schedule recorded for that date. Use record mode to create one.");
        return Ok(None);
    };

    println!("\n--- Updating schedule for {date} ---");
    for interval in day.schedule.iter_mut() {
        let prompt = format!(
            "{} (previous: {}): ",
            interval.time_slot,
            interval.task_text()
        );
        let Some(input) = prompter.ask(&prompt).await? else {
            info!("Input ended at {}", interval.time_slot);
            break;
        };
        let input = input.trim();
        if !input.is_empty() {
            interval.task = parse_task_input(input);
        }
    }

    let path = storage.save(date, &day).await?;
    println!("Schedule saved to {}", path.display());
    Ok(Some(day))
}
