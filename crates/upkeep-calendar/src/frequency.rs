//! Recurrence frequency and its per-frequency step and cap policy.

use chrono::{Days, Months, NaiveDateTime};
use std::fmt;

/// A month view is a 6x7 grid, so at most 42 daily occurrences can be visible.
pub const DAILY_GENERATION_CAP: u32 = 42;
/// At most 6 weeks are visible in a month view.
pub const WEEKLY_GENERATION_CAP: u32 = 6;
/// A month view can touch at most 2 months past the original.
pub const MONTHLY_GENERATION_CAP: u32 = 2;
/// Yearly and unrecognized frequencies only ever generate the next occurrence.
pub const DEFAULT_GENERATION_CAP: u32 = 1;

/// How a calendar event repeats.
///
/// Parsed from the stored `recur_frequency` string. Parsing never fails: a
/// value that is not one of the four recognized names becomes [`Unknown`],
/// which follows the yearly policy.
///
/// [`Unknown`]: RecurFrequency::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurFrequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Unknown,
}

impl RecurFrequency {
    /// ## Summary
    /// Maps the stored frequency value to a variant.
    ///
    /// Matching is case-sensitive. Absent and empty values mean the event does not recur.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::None,
            Some("DAILY") => Self::Daily,
            Some("WEEKLY") => Self::Weekly,
            Some("MONTHLY") => Self::Monthly,
            Some("YEARLY") => Self::Yearly,
            Some(other) => {
                tracing::trace!(
                    frequency = other,
                    "Unrecognized recurrence frequency, using yearly policy"
                );
                Self::Unknown
            }
        }
    }

    /// Returns the stored string for a recognized frequency.
    #[must_use]
    pub const fn as_stored(self) -> Option<&'static str> {
        match self {
            Self::Daily => Some("DAILY"),
            Self::Weekly => Some("WEEKLY"),
            Self::Monthly => Some("MONTHLY"),
            Self::Yearly => Some("YEARLY"),
            Self::None | Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }

    /// ## Summary
    /// Maximum number of generated occurrences, not counting the original.
    ///
    /// The cap is independent of the requested window.
    #[must_use]
    pub const fn generation_cap(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Daily => DAILY_GENERATION_CAP,
            Self::Weekly => WEEKLY_GENERATION_CAP,
            Self::Monthly => MONTHLY_GENERATION_CAP,
            Self::Yearly | Self::Unknown => DEFAULT_GENERATION_CAP,
        }
    }

    /// ## Summary
    /// Advances `from` by `steps` recurrence steps.
    ///
    /// Month and year steps are calendar-aware and clamp to the last valid day
    /// of the target month (Jan 31 + 1 month is Feb 28 or 29). Steps are always
    /// counted from `from`, so Jan 31 + 2 months is Mar 31.
    ///
    /// Returns `None` when the result is outside the representable range, or
    /// when a non-recurring frequency is asked for a non-zero step.
    #[must_use]
    pub fn advance(self, from: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Self::None => (steps == 0).then_some(from),
            Self::Daily => from.checked_add_days(Days::new(u64::from(steps))),
            Self::Weekly => from.checked_add_days(Days::new(u64::from(steps) * 7)),
            Self::Monthly => from.checked_add_months(Months::new(steps)),
            Self::Yearly | Self::Unknown => steps
                .checked_mul(12)
                .and_then(|months| from.checked_add_months(Months::new(months))),
        }
    }
}

impl From<Option<&str>> for RecurFrequency {
    fn from(raw: Option<&str>) -> Self {
        Self::from_stored(raw)
    }
}

impl fmt::Display for RecurFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::Unknown => f.write_str("UNKNOWN"),
            recognized => f.write_str(recognized.as_stored().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid date")
    }

    #[test]
    fn test_from_stored_recognized() {
        assert_eq!(RecurFrequency::from_stored(Some("DAILY")), RecurFrequency::Daily);
        assert_eq!(RecurFrequency::from_stored(Some("WEEKLY")), RecurFrequency::Weekly);
        assert_eq!(RecurFrequency::from_stored(Some("MONTHLY")), RecurFrequency::Monthly);
        assert_eq!(RecurFrequency::from_stored(Some("YEARLY")), RecurFrequency::Yearly);
    }

    #[test]
    fn test_from_stored_empty_and_absent() {
        assert_eq!(RecurFrequency::from_stored(None), RecurFrequency::None);
        assert_eq!(RecurFrequency::from_stored(Some("")), RecurFrequency::None);
    }

    #[test]
    fn test_from_stored_is_case_sensitive() {
        assert_eq!(RecurFrequency::from_stored(Some("daily")), RecurFrequency::Unknown);
        assert_eq!(RecurFrequency::from_stored(Some("FOO")), RecurFrequency::Unknown);
        assert_eq!(RecurFrequency::from_stored(Some(" ")), RecurFrequency::Unknown);
    }

    #[test]
    fn test_unknown_shares_yearly_policy() {
        let start = at(2023, 6, 1);
        assert_eq!(
            RecurFrequency::Unknown.generation_cap(),
            RecurFrequency::Yearly.generation_cap()
        );
        assert_eq!(
            RecurFrequency::Unknown.advance(start, 1),
            RecurFrequency::Yearly.advance(start, 1)
        );
        assert_eq!(RecurFrequency::Unknown.advance(start, 1), Some(at(2024, 6, 1)));
    }

    #[test]
    fn test_caps() {
        assert_eq!(RecurFrequency::None.generation_cap(), 0);
        assert_eq!(RecurFrequency::Daily.generation_cap(), 42);
        assert_eq!(RecurFrequency::Weekly.generation_cap(), 6);
        assert_eq!(RecurFrequency::Monthly.generation_cap(), 2);
        assert_eq!(RecurFrequency::Yearly.generation_cap(), 1);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let jan_31 = at(2024, 1, 31);
        assert_eq!(RecurFrequency::Monthly.advance(jan_31, 1), Some(at(2024, 2, 29)));
        assert_eq!(RecurFrequency::Monthly.advance(jan_31, 2), Some(at(2024, 3, 31)));

        let jan_31_common = at(2023, 1, 31);
        assert_eq!(
            RecurFrequency::Monthly.advance(jan_31_common, 1),
            Some(at(2023, 2, 28))
        );
    }

    #[test]
    fn test_yearly_from_leap_day() {
        assert_eq!(
            RecurFrequency::Yearly.advance(at(2024, 2, 29), 1),
            Some(at(2025, 2, 28))
        );
    }

    #[test]
    fn test_none_only_advances_zero_steps() {
        let start = at(2024, 1, 1);
        assert_eq!(RecurFrequency::None.advance(start, 0), Some(start));
        assert_eq!(RecurFrequency::None.advance(start, 1), None);
    }

    #[test]
    fn test_advance_out_of_range() {
        assert_eq!(RecurFrequency::Daily.advance(NaiveDateTime::MAX, 1), None);
        assert_eq!(RecurFrequency::Yearly.advance(NaiveDateTime::MAX, 1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RecurFrequency::Weekly.to_string(), "WEEKLY");
        assert_eq!(RecurFrequency::None.to_string(), "NONE");
        assert_eq!(RecurFrequency::Unknown.to_string(), "UNKNOWN");
    }
}
