use crate::calendar::BusinessCalendar;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Immutable per-run context: the reference date every partition and
/// metric compares against, plus the holiday-backed calendar. Captured
/// once at analysis start so all derived views agree on "today".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub today: NaiveDate,
    pub calendar: BusinessCalendar,
}

impl AnalysisContext {
    pub fn new<I>(today: NaiveDate, holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            today,
            calendar: BusinessCalendar::from_holidays(holidays),
        }
    }

    /// Capture the local calendar date as the reference date.
    pub fn for_today<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self::new(Local::now().date_naive(), holidays)
    }
}
