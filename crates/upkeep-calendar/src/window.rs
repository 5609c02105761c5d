//! Display windows for calendar views.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use upkeep_core::error::{CoreError, CoreResult};

/// Number of days in a month view: 6 rows of 7 days.
pub const MONTH_VIEW_DAYS: u64 = 42;

/// An inclusive `[start, end]` display window.
///
/// Windows are advisory for expansion: the per-frequency generation cap bounds
/// how many occurrences are produced, not the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Window {
    /// ## Summary
    /// Creates a window from explicit bounds.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if `end` is before `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidInput(format!(
                "window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// ## Summary
    /// The 42-day month grid containing `date`.
    ///
    /// The grid starts at midnight on the Sunday on or before the first of the
    /// month and ends at the last instant of its 42nd day, so midnight of the
    /// following day falls outside it.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the grid falls outside the supported date range.
    pub fn month_view(date: NaiveDate) -> CoreResult<Self> {
        let out_of_range = || CoreError::InvalidInput(format!("no month view for {date}"));

        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(out_of_range)?;
        let leading = u64::from(first.weekday().num_days_from_sunday());
        let grid_start = first
            .checked_sub_days(Days::new(leading))
            .ok_or_else(out_of_range)?;
        let last_day = grid_start
            .checked_add_days(Days::new(MONTH_VIEW_DAYS - 1))
            .ok_or_else(out_of_range)?;
        let end = last_day
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            start: grid_start.and_time(NaiveTime::MIN),
            end,
        })
    }

    /// ## Summary
    /// Parses a `YYYY-MM` month and returns its month view.
    ///
    /// ## Errors
    /// Returns `CoreError::ParseError` if the month is malformed.
    pub fn parse_month(month: &str) -> CoreResult<Self> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
            .map_err(|err| CoreError::ParseError(format!("invalid month {month:?}: {err}")))?;
        Self::month_view(first)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whether `[start, end]` shares at least one instant with this window.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end && end >= self.start
    }
}
