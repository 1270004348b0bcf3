use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Business-day arithmetic over a Mon-Fri work week with an explicit
/// holiday set. The holiday set is supplied once at construction and
/// cached for the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    holidays: HashSet<NaiveDate>,
}

impl BusinessCalendar {
    pub fn new() -> Self {
        Self {
            holidays: HashSet::new(),
        }
    }

    pub fn from_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Add a single holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Add multiple holidays at once
    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    pub fn holidays(&self) -> &HashSet<NaiveDate> {
        &self.holidays
    }

    /// Check if a date counts toward business-day spans
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Count business days from `start` up to but not including `end`.
    /// Negative when `end < start`, zero when equal.
    pub fn business_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if start == end {
            return 0;
        }
        if end < start {
            return -self.business_days_between(end, start);
        }

        let mut count = 0;
        let mut current = start;
        while current < end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }
}
