//! Date-window predicates (today, this week, this month).
//!
//! Weeks run Sunday through Saturday, both ends inclusive. A task date that
//! does not parse as `YYYY-MM-DD` is never inside a window.

use crate::model::task::TASK_DATE_FORMAT;
use chrono::{Datelike, Days, Local, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Time window a view is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateWindow {
    /// No restriction.
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
}

impl DateWindow {
    /// Stable name as used by the filter selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::ThisWeek => "week",
            Self::ThisMonth => "month",
        }
    }

    /// Whether `date` falls inside this window as of the local date now.
    pub fn contains(self, date: &str) -> bool {
        self.contains_on(date, local_today())
    }

    /// Whether `date` falls inside this window as of `today`.
    pub fn contains_on(self, date: &str, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Today => parse_task_date(date) == Some(today),
            Self::ThisWeek => parse_task_date(date)
                .zip(week_bounds(today))
                .is_some_and(|(date, (start, end))| start <= date && date <= end),
            Self::ThisMonth => parse_task_date(date).is_some_and(|date| same_month(date, today)),
        }
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown window name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateWindowError(pub String);

impl Display for ParseDateWindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported date window `{}`; expected all|today|week|month",
            self.0
        )
    }
}

impl Error for ParseDateWindowError {}

impl FromStr for DateWindow {
    type Err = ParseDateWindowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::ThisWeek),
            "month" => Ok(Self::ThisMonth),
            other => Err(ParseDateWindowError(other.to_string())),
        }
    }
}

/// Current local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a stored task date; surrounding whitespace is ignored.
///
/// Only the exact `YYYY-MM-DD` shape is accepted: four-digit year, two-digit
/// month and day, no sign.
pub fn parse_task_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, TASK_DATE_FORMAT).ok()
}

pub fn is_today(date: &str) -> bool {
    DateWindow::Today.contains(date)
}

pub fn is_this_week(date: &str) -> bool {
    DateWindow::ThisWeek.contains(date)
}

pub fn is_this_month(date: &str) -> bool {
    DateWindow::ThisMonth.contains(date)
}

fn same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Sunday and Saturday of the week containing `today`.
fn week_bounds(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    let start = today.checked_sub_days(Days::new(offset))?;
    let end = start.checked_add_days(Days::new(6))?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::{parse_task_date, week_bounds, DateWindow};
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-05-15 is a Wednesday.
        let (start, end) = week_bounds(ymd(2024, 5, 15)).expect("bounds in range");
        assert_eq!(start, ymd(2024, 5, 12));
        assert_eq!(end, ymd(2024, 5, 18));

        let (start, _) = week_bounds(ymd(2024, 5, 12)).expect("bounds in range");
        assert_eq!(start, ymd(2024, 5, 12));
    }

    #[test]
    fn week_window_is_inclusive_and_crosses_months() {
        // 2024-07-31 is a Wednesday; its week runs 07-28..08-03.
        let today = ymd(2024, 7, 31);
        assert!(DateWindow::ThisWeek.contains_on("2024-07-28", today));
        assert!(DateWindow::ThisWeek.contains_on("2024-08-03", today));
        assert!(!DateWindow::ThisWeek.contains_on("2024-08-04", today));
        assert!(!DateWindow::ThisWeek.contains_on("2024-07-27", today));
    }

    #[test]
    fn month_window_checks_year_too() {
        let today = ymd(2024, 3, 10);
        assert!(DateWindow::ThisMonth.contains_on("2024-03-31", today));
        assert!(!DateWindow::ThisMonth.contains_on("2023-03-10", today));
    }

    #[test]
    fn unparsable_dates_never_match_a_window() {
        let today = ymd(2024, 3, 10);
        for window in [DateWindow::Today, DateWindow::ThisWeek, DateWindow::ThisMonth] {
            assert!(!window.contains_on("March 10th", today));
            assert!(!window.contains_on("2024-02-30", today));
            assert!(!window.contains_on("2024-3-10", today));
            assert!(!window.contains_on("+2024-03-10", today));
            assert!(!window.contains_on("02024-03-10", today));
            assert!(!window.contains_on("2024/03/10", today));
        }
        assert!(DateWindow::All.contains_on("March 10th", today));
        assert_eq!(parse_task_date(" 2024-03-10 "), Some(today));
    }

    #[test]
    fn window_names_round_trip_through_from_str() {
        for window in [
            DateWindow::All,
            DateWindow::Today,
            DateWindow::ThisWeek,
            DateWindow::ThisMonth,
        ] {
            assert_eq!(window.as_str().parse::<DateWindow>(), Ok(window));
        }
        assert!("fortnight".parse::<DateWindow>().is_err());
    }
}
