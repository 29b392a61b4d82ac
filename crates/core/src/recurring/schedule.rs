//! Recurrence frequencies and calendar-aware date advancement.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a recurring invoice/expense/income spawns a new instance.
///
/// A non-recurring item has no frequency at all; persistence maps its
/// `none` marker to the absence of a `Frequency`, so this type never has to
/// represent "not recurring".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every calendar day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Every calendar year.
    Yearly,
}

impl Frequency {
    /// Advances a due date by exactly one period.
    ///
    /// Uses chrono's calendar arithmetic rather than fixed second counts:
    /// a monthly item due Jan 31 advances to Feb 28 (or Feb 29 in a leap
    /// year), and a yearly item due Feb 29 advances to Feb 28.
    ///
    /// Returns `None` only if the result would fall outside chrono's
    /// representable date range.
    #[must_use]
    pub fn advance(self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => from.checked_add_days(Days::new(1)),
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }

    /// String form used in API payloads and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("Unknown recurrence frequency: {other}")),
        }
    }
}

/// Whether a recurring item with the given due date should be processed on
/// `today`'s run. The scheduler advances `next_due_date` past `today` in the
/// same transaction that materializes an instance, so a second same-day run
/// finds nothing due.
#[must_use]
pub fn is_due(next_due_date: NaiveDate, today: NaiveDate) -> bool {
    next_due_date <= today
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(Frequency::Daily, date(2024, 3, 14), date(2024, 3, 15))]
    #[case(Frequency::Daily, date(2024, 2, 28), date(2024, 2, 29))] // leap year
    #[case(Frequency::Daily, date(2023, 2, 28), date(2023, 3, 1))]
    #[case(Frequency::Weekly, date(2024, 3, 25), date(2024, 4, 1))]
    #[case(Frequency::Weekly, date(2024, 12, 30), date(2025, 1, 6))]
    #[case(Frequency::Monthly, date(2024, 1, 15), date(2024, 2, 15))]
    #[case(Frequency::Monthly, date(2024, 1, 31), date(2024, 2, 29))] // clamps to month end
    #[case(Frequency::Monthly, date(2023, 1, 31), date(2023, 2, 28))]
    #[case(Frequency::Monthly, date(2024, 12, 31), date(2025, 1, 31))]
    #[case(Frequency::Yearly, date(2024, 6, 1), date(2025, 6, 1))]
    #[case(Frequency::Yearly, date(2024, 2, 29), date(2025, 2, 28))] // leap day
    fn test_advance(
        #[case] frequency: Frequency,
        #[case] from: NaiveDate,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(frequency.advance(from), Some(expected));
    }

    #[test]
    fn test_advance_is_strictly_increasing() {
        let start = date(2024, 1, 31);
        for frequency in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            let next = frequency.advance(start).unwrap();
            assert!(next > start, "{frequency:?} must move the date forward");
        }
    }

    #[test]
    fn test_is_due_includes_today_and_past() {
        let today = date(2024, 2, 1);
        assert!(is_due(date(2024, 1, 31), today));
        assert!(is_due(today, today));
        assert!(!is_due(date(2024, 2, 2), today));
    }

    #[test]
    fn test_advanced_date_is_no_longer_due_same_day() {
        // The non-duplication guarantee: once advanced, the source row is
        // out of the due window for the rest of the day.
        let today = date(2024, 2, 1);
        let next = Frequency::Daily.advance(today).unwrap();
        assert!(!is_due(next, today));
    }

    #[test]
    fn test_frequency_round_trips_through_str() {
        for frequency in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            assert_eq!(Frequency::from_str(frequency.as_str()).unwrap(), frequency);
        }
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        assert!(Frequency::from_str("fortnightly").is_err());
        assert!(Frequency::from_str("none").is_err());
    }
}
