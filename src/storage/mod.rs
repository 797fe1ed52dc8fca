//!  Storage is organized through [record_storage::RecordStorageImpl].
//!  The basic idea is:
//!   - There is a directory with all the records.
//!   - Every tracked day is a separate `YYYY-MM-DD.json` file.
//!   - A day file is a [entities::DayScheduleEntity], intervals are stored in the order they were
//!     recorded, so the amount of stored intervals tells where recording should resume.

pub mod entities;
pub mod record_storage;
