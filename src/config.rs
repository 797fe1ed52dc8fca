use std::{fmt::Display, path::PathBuf};

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::utils::clock::Clock;

/// Length of a single interval in minutes.
pub const INTERVAL_MINUTES: i64 = 15;

/// Amount of intervals that fit into 24 hours.
pub const INTERVALS_PER_DAY: usize = (24 * 60 / INTERVAL_MINUTES) as usize;

pub const DEFAULT_START_TIME: NaiveTime = match NaiveTime::from_hms_opt(7, 0, 0) {
    Some(v) => v,
    None => panic!("07:00 is a valid time"),
};

pub const DEFAULT_CHART_NAME: &str = "time_analysis.svg";

/// Everything the recorder, the storage and the analysis need to know about how a day is split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Time when a tracked day begins. Anything before it still belongs to the previous day.
    pub day_start: NaiveTime,
    pub interval: Duration,
    pub intervals_per_day: usize,
    pub records_dir: PathBuf,
    pub chart_path: PathBuf,
}

impl TrackerConfig {
    pub fn new(records_dir: PathBuf) -> Self {
        Self {
            day_start: DEFAULT_START_TIME,
            interval: Duration::minutes(INTERVAL_MINUTES),
            intervals_per_day: INTERVALS_PER_DAY,
            records_dir,
            chart_path: PathBuf::from(DEFAULT_CHART_NAME),
        }
    }

    pub fn with_day_start(self, day_start: NaiveTime) -> Self {
        Self { day_start, ..self }
    }

    pub fn with_chart_path(self, chart_path: PathBuf) -> Self {
        Self { chart_path, ..self }
    }

    /// Slots of a day that starts at the configured [TrackerConfig::day_start].
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.time_slots_from(self.day_start)
    }

    /// Slots of a day starting at `start`. Slots wrap around midnight, so the last ones of a day
    /// starting at 07:00 are 06:30-06:45 and 06:45-07:00.
    pub fn time_slots_from(&self, start: NaiveTime) -> Vec<TimeSlot> {
        (0..self.intervals_per_day)
            .map(|index| {
                let start = start + self.interval * index as i32;
                TimeSlot {
                    start,
                    end: start + self.interval,
                }
            })
            .collect()
    }

    /// Returns the day that the current moment of `clock` should be recorded into.
    pub fn tracked_day(&self, clock: &impl Clock) -> NaiveDate {
        let now = clock.now();
        let today = now.date();
        if now.time() < self.day_start {
            today.pred_opt().unwrap_or(today)
        } else {
            today
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
