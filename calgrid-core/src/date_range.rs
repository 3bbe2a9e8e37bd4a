//! Inclusive date windows for querying events.

use chrono::{Datelike, Days, Duration, NaiveDate};

use crate::constants::DEFAULT_WINDOW_DAYS;
use crate::error::{CalGridError, CalGridResult};
use crate::event::{format_date, parse_date};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> CalGridResult<Self> {
        if start > end {
            return Err(CalGridError::InvalidWindow {
                start: format_date(start),
                end: format_date(end),
            });
        }
        Ok(DateWindow { start, end })
    }

    /// A window covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        DateWindow {
            start: date,
            end: date,
        }
    }

    /// The window shown by a month grid: from the Sunday on or before the
    /// first of the month through the Saturday on or after its last day.
    pub fn month_grid(year: i32, month: u32) -> CalGridResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CalGridError::InvalidDate(format!("{year:04}-{month:02}")))?;
        let last = last_day_of_month(first);

        let lead = u64::from(first.weekday().num_days_from_sunday());
        let trail = 6 - u64::from(last.weekday().num_days_from_sunday());

        let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
        let end = last.checked_add_days(Days::new(trail)).unwrap_or(last);
        Ok(DateWindow { start, end })
    }

    /// Build a window from CLI-style arguments.
    /// - `from`: YYYY-MM-DD, defaults to `today`
    /// - `to`: YYYY-MM-DD, defaults to `from` + DEFAULT_WINDOW_DAYS
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> CalGridResult<Self> {
        let start = match from {
            Some(s) => parse_date(s)?,
            None => today,
        };

        let end = match to {
            Some(s) => parse_date(s)?,
            None => start + Duration::days(DEFAULT_WINDOW_DAYS),
        };

        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Parse "YYYY-MM" into (year, month).
pub fn parse_month(s: &str) -> CalGridResult<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| CalGridError::InvalidDate(s.to_string()))?;
    Ok((first.year(), first.month()))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| last_day_of_month(first).day())
        .unwrap_or(31)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
