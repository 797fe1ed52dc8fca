use chrono::{Local, NaiveDate, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
pub trait Clock: Sync + Send + 'static {
    /// Current wall clock time in the local timezone.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock stuck at a single moment.
#[cfg(test)]
pub struct TestClock(pub NaiveDateTime);

#[cfg(test)]
impl Clock for TestClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
