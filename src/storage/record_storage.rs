use std::{
    future::Future,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::fs;
use tracing::{debug, trace};

use crate::{
    fs::operations::{read_locked, write_locked},
    utils::time::{date_to_record_name, record_name_to_date},
};

use super::entities::DayScheduleEntity;

/// Interface for abstracting storage of records.
pub trait RecordStorage {
    /// Retrieves a stored day. [None] means nothing was recorded for that day yet.
    fn load(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<DayScheduleEntity>>> + Send;

    /// Overwrites a day with `schedule`. Returns location of the saved record.
    fn save(
        &self,
        date: NaiveDate,
        schedule: &DayScheduleEntity,
    ) -> impl Future<Output = Result<PathBuf>>;

    /// All days that have a record, in ascending order.
    fn record_dates(&self) -> impl Future<Output = Result<Vec<NaiveDate>>> + Send;
}

impl<T: Deref> RecordStorage for T
where
    T::Target: RecordStorage,
{
    fn load(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<DayScheduleEntity>>> + Send {
        self.deref().load(date)
    }

    fn save(
        &self,
        date: NaiveDate,
        schedule: &DayScheduleEntity,
    ) -> impl Future<Output = Result<PathBuf>> {
        self.deref().save(date, schedule)
    }

    fn record_dates(&self) -> impl Future<Output = Result<Vec<NaiveDate>>> + Send {
        self.deref().record_dates()
    }
}

/// The main realization of [RecordStorage].
pub struct RecordStorageImpl {
    record_dir: PathBuf,
}

impl RecordStorageImpl {
    pub fn new(record_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&record_dir)?;

        Ok(Self { record_dir })
    }

    pub fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.record_dir.join(date_to_record_name(date))
    }

    async fn load_inner(path: &Path) -> Result<Option<DayScheduleEntity>> {
        debug!("Loading {path:?}");
        let Some(contents) = read_locked(path)
            .await
            .with_context(|| format!("Failed to read {path:?}"))?
        else {
            return Ok(None);
        };
        let schedule = serde_json::from_str::<DayScheduleEntity>(&contents)
            .with_context(|| format!("Record {path:?} is not a valid schedule"))?;
        Ok(Some(schedule))
    }
}

impl RecordStorage for RecordStorageImpl {
    async fn load(&self, date: NaiveDate) -> Result<Option<DayScheduleEntity>> {
        let path = self.record_path(date);
        Self::load_inner(&path).await
    }

    async fn save(&self, date: NaiveDate, schedule: &DayScheduleEntity) -> Result<PathBuf> {
        let path = self.record_path(date);
        let data = serde_json::to_vec_pretty(schedule)?;
        write_locked(&path, &data)
            .await
            .with_context(|| format!("Failed to write {path:?}"))?;
        debug!(
            "Saved {} intervals into {path:?}",
            schedule.schedule.len()
        );
        Ok(path)
    }

    async fn record_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut entries = fs::read_dir(&self.record_dir)
            .await
            .with_context(|| format!("Failed to list {:?}", self.record_dir))?;
        let mut dates = vec![];
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            match name.to_str().and_then(record_name_to_date) {
                Some(date) => dates.push(date),
                None => {
                    // Anything that isn't named after a date doesn't belong to us
                    trace!("Skipping {name:?}, not a record file");
                }
            }
        }
        dates.sort();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    use crate::storage::{
        entities::{DayScheduleEntity, IntervalEntity},
        record_storage::{RecordStorage, RecordStorageImpl},
    };

    const TEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2018, 7, 4) {
        Some(v) => v,
        None => panic!("valid date"),
    };

    fn test_schedule() -> DayScheduleEntity {
        DayScheduleEntity {
            date: TEST_DATE,
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            schedule: vec![
                IntervalEntity {
                    time_slot: "07:00-07:15".into(),
                    task: vec!["work".into(), "code".into()],
                },
                IntervalEntity {
                    time_slot: "07:15-07:30".into(),
                    task: vec!["Breakfast".into()],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_record_storage_missing_day() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        assert_eq!(storage.load(TEST_DATE).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_storage_basic() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;

        let path = storage.save(TEST_DATE, &test_schedule()).await?;
        assert_eq!(path, dir.path().join("2018-07-04.json"));

        let stored = storage.load(TEST_DATE).await?;
        assert_eq!(stored, Some(test_schedule()));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_storage_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;

        storage.save(TEST_DATE, &test_schedule()).await?;
        let mut shorter = test_schedule();
        shorter.schedule.truncate(1);
        storage.save(TEST_DATE, &shorter).await?;

        assert_eq!(storage.load(TEST_DATE).await?, Some(shorter));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_storage_corrupted_file() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        fs::write(dir.path().join("2018-07-04.json"), "{ not json")?;

        assert!(storage.load(TEST_DATE).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_dates_skip_unrelated_files() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        storage.save(TEST_DATE, &test_schedule()).await?;
        storage
            .save(TEST_DATE.pred_opt().unwrap(), &test_schedule())
            .await?;
        fs::write(dir.path().join("notes.json"), "{}")?;
        fs::write(dir.path().join("2018-07-99.json"), "{}")?;
        fs::write(dir.path().join("2018-07-05.txt"), "")?;
        fs::create_dir(dir.path().join("backup"))?;

        let dates = storage.record_dates().await?;
        assert_eq!(dates, vec![TEST_DATE.pred_opt().unwrap(), TEST_DATE]);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_dates_ignore_unpadded_names() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        storage.save(date, &test_schedule()).await?;
        fs::write(dir.path().join("2025-3-4.json"), "{}")?;
        fs::write(dir.path().join("2025-3-5.json"), "{}")?;

        let dates = storage.record_dates().await?;
        assert_eq!(dates, vec![date]);
        Ok(())
    }
}
