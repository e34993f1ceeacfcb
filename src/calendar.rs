use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

// Major Taiwan public holidays, 2024-2026. Lunar-calendar holidays are
// pre-resolved to fixed dates; the list must be extended when the supported
// year range grows, otherwise working-day counts silently ignore the missing
// holidays.
pub const TAIWAN_HOLIDAYS: &[&str] = &[
    // 2024
    "2024-01-01", // New Year
    "2024-02-08",
    "2024-02-09",
    "2024-02-10",
    "2024-02-11",
    "2024-02-12",
    "2024-02-13",
    "2024-02-14", // Lunar New Year
    "2024-02-28", // Peace Memorial Day
    "2024-04-04",
    "2024-04-05", // Children's Day & Tomb Sweeping
    "2024-05-01", // Labor Day
    "2024-06-10", // Dragon Boat Festival
    "2024-09-17", // Moon Festival
    "2024-10-10", // Double Tenth
    // 2025
    "2025-01-01", // New Year
    "2025-01-25",
    "2025-01-26",
    "2025-01-27",
    "2025-01-28",
    "2025-01-29",
    "2025-01-30",
    "2025-01-31",
    "2025-02-01",
    "2025-02-02", // Lunar New Year
    "2025-02-28", // Peace Memorial Day
    "2025-04-03",
    "2025-04-04", // Children's Day & Tomb Sweeping
    "2025-05-01", // Labor Day
    "2025-05-31", // Dragon Boat Festival
    "2025-10-06", // Moon Festival
    "2025-10-10", // Double Tenth
    // 2026 buffer
    "2026-01-01",
];

/// A fixed set of non-working dates. Swapping jurisdictions means building a
/// different value, not changing code.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: dates.into_iter().collect(),
        }
    }

    /// Builds a calendar from ISO `YYYY-MM-DD` strings. Entries that do not
    /// parse are skipped; the table is static data, not user input.
    pub fn from_iso_dates(dates: &[&str]) -> Self {
        Self::new(
            dates
                .iter()
                .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        )
    }

    pub fn taiwan() -> Self {
        Self::from_iso_dates(TAIWAN_HOLIDAYS)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Counts days from `start` through `end` inclusive that are neither a
    /// weekend day nor a listed holiday. Returns 0 when `end` precedes `start`.
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| !is_weekend(*day) && !self.is_holiday(*day))
            .count() as u32
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Statutory minimum notice before resignation, keyed on tenure length.
/// Breakpoints are ordered longest-tenure-first; the first one at or below
/// the given tenure wins.
#[derive(Debug, Clone)]
pub struct NoticePolicy {
    breakpoints: &'static [(i32, u32)],
}

// Taiwan Labor Standards Act notice periods.
pub const TAIWAN_NOTICE_POLICY: NoticePolicy = NoticePolicy {
    breakpoints: &[(36, 30), (12, 20), (3, 10)],
};

impl NoticePolicy {
    pub fn notice_days(&self, tenure_months: i32) -> u32 {
        self.breakpoints
            .iter()
            .find(|(min_months, _)| tenure_months >= *min_months)
            .map(|(_, days)| *days)
            .unwrap_or(0)
    }
}
