use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::services::AcademicYearDataService;

/// Academic calendar for one year, running 1 August to 31 July.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcademicCalendar {
    start_year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl AcademicCalendar {
    /// Returns `None` when the year is outside chrono's supported range.
    pub fn for_start_year(start_year: i32) -> Option<Self> {
        Some(Self {
            start_year,
            start: NaiveDate::from_ymd_opt(start_year, 8, 1)?,
            end: NaiveDate::from_ymd_opt(start_year + 1, 7, 31)?,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }
}

impl AcademicYearDataService for AcademicCalendar {
    fn start(&self) -> NaiveDate {
        self.start
    }

    fn end(&self) -> NaiveDate {
        self.end
    }

    fn august_31(&self) -> NaiveDate {
        self.start + Duration::days(30)
    }

    fn june_last_friday(&self) -> NaiveDate {
        // 30 June always exists, so walking back at most six days stays in June.
        let mut day = self.end - Duration::days(31);
        while day.weekday() != Weekday::Fri {
            day -= Duration::days(1);
        }
        day
    }

    fn academic_year_of(&self, date: NaiveDate) -> i32 {
        if date.month() >= 8 {
            date.year()
        } else {
            date.year() - 1
        }
    }
}
