//! Month day lists and weekday / holiday classification.

use std::collections::BTreeSet;
use std::ops::Range;

use shift_roster_sdk::{Holiday, MonthKey};
use time::{Date, Duration, Weekday};

/// Days per OT distribution bucket.
pub const WEEK_BUCKET_DAYS: u32 = 7;

/// One displayed column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInfo {
    /// 0-based index within the month.
    pub day_index: u32,
    pub date: Date,
    pub weekday: Weekday,
    pub is_weekend: bool,
}

impl DayInfo {
    /// Day of month, 1-based.
    #[must_use]
    pub const fn day_of_month(&self) -> u8 {
        self.date.day()
    }
}

#[must_use]
pub const fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}

/// Whether the 1-based `day_of_month` is listed as a holiday.
#[must_use]
pub fn is_holiday(day_of_month: u8, holidays: &[Holiday]) -> bool {
    holidays.iter().any(|h| h.date == day_of_month)
}

/// Every day of `month`, in order.
#[must_use]
pub fn month_days(month: MonthKey) -> Vec<DayInfo> {
    let first = month.first_day();
    (0..u32::from(month.days_in_month()))
        .map(|day_index| {
            let date = first + Duration::days(i64::from(day_index));
            let weekday = date.weekday();
            DayInfo {
                day_index,
                date,
                weekday,
                is_weekend: is_weekend(weekday),
            }
        })
        .collect()
}

/// Mon-Fri days of `month` that are not holidays.
///
/// Weekend holidays do not reduce the count and duplicate holiday entries
/// count once.
#[must_use]
pub fn working_days(month: MonthKey, holidays: &[Holiday]) -> u32 {
    let holiday_dates: BTreeSet<u8> = holidays.iter().map(|h| h.date).collect();
    let count = month_days(month)
        .iter()
        .filter(|d| !d.is_weekend && !holiday_dates.contains(&d.day_of_month()))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Consecutive 7-day ranges of day indices covering the month.
#[must_use]
pub fn week_buckets(month: MonthKey) -> Vec<Range<u32>> {
    let days = u32::from(month.days_in_month());
    (0..days)
        .step_by(WEEK_BUCKET_DAYS as usize)
        .map(|start| start..(start + WEEK_BUCKET_DAYS).min(days))
        .collect()
}
