use std::fmt::Display;

use chrono::NaiveDate;
use chrono::NaiveTime;
use serde::Deserialize;
use serde::Serialize;

use crate::config::TimeSlot;

/// What the user did during a single interval. `task` goes from general to specific, so
/// `["work", "code", "project A"]` is work -> code -> project A.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct IntervalEntity {
    pub time_slot: String,
    #[serde(with = "task_ser")]
    pub task: Vec<String>,
}

impl IntervalEntity {
    pub fn new(slot: TimeSlot, task: Vec<String>) -> Self {
        Self {
            time_slot: slot.to_string(),
            task,
        }
    }

    /// Task in the same form the user types it in.
    pub fn task_text(&self) -> String {
        self.task.join(": ")
    }
}

impl Display for IntervalEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.time_slot, self.task_text())
    }
}

/// The struct stored on the disk for every tracked day.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct DayScheduleEntity {
    pub date: NaiveDate,
    #[serde(with = "clock_time_ser")]
    pub start_time: NaiveTime,
    #[serde(default)]
    pub schedule: Vec<IntervalEntity>,
}

impl DayScheduleEntity {
    pub fn new(date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            schedule: vec![],
        }
    }
}

/// Splits user input like `work: code: project A` into a task hierarchy. Empty segments are
/// dropped.
pub fn parse_task_input(input: &str) -> Vec<String> {
    input
        .split(':')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

mod clock_time_ser {
    use chrono::NaiveTime;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(D::Error::custom)
    }
}

/// Older files might contain a single string instead of a list of tasks.
mod task_ser {
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredTask {
        Hierarchy(Vec<String>),
        Single(String),
    }

    pub fn serialize<S>(task: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        task.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StoredTask::deserialize(deserializer)? {
            StoredTask::Hierarchy(v) => v,
            StoredTask::Single(v) => vec![v],
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{parse_task_input, DayScheduleEntity, IntervalEntity};

    #[test]
    fn test_parse_task_input() {
        assert_eq!(
            parse_task_input("work: code: project A"),
            vec!["work", "code", "project A"]
        );
        assert_eq!(parse_task_input(" reading "), vec!["reading"]);
        assert_eq!(parse_task_input("work:: :code:"), vec!["work", "code"]);
        assert!(parse_task_input("").is_empty());
        assert!(parse_task_input(" : ").is_empty());
    }

    #[test]
    fn test_day_file_format() -> anyhow::Result<()> {
        let json = r#"{
  "date": "2025-03-15",
  "start_time": "07:00",
  "schedule": [
    {
      "time_slot": "07:00-07:15",
      "task": [
        "work",
        "code"
      ]
    }
  ]
}"#;
        let day: DayScheduleEntity = serde_json::from_str(json)?;
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(day.start_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(day.schedule[0].task, vec!["work", "code"]);

        assert_eq!(serde_json::to_string_pretty(&day)?, json);
        Ok(())
    }

    #[test]
    fn test_single_string_task_is_accepted() -> anyhow::Result<()> {
        let interval: IntervalEntity =
            serde_json::from_str(r#"{"time_slot": "07:00-07:15", "task": "reading"}"#)?;
        assert_eq!(interval.task, vec!["reading"]);
        assert_eq!(interval.to_string(), "07:00-07:15: reading");
        Ok(())
    }

    #[test]
    fn test_missing_schedule_is_empty() -> anyhow::Result<()> {
        let day: DayScheduleEntity =
            serde_json::from_str(r#"{"date": "2025-03-15", "start_time": "07:00"}"#)?;
        assert!(day.schedule.is_empty());
        Ok(())
    }
}
