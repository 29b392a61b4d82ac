//! Invoice number formatting.
//!
//! Numbers look like `INV-20240215-042`: the issue date plus a three-digit
//! suffix. The suffix alone does not guarantee uniqueness; the persistence
//! layer enforces a per-company unique index and regenerates on collision.

use chrono::NaiveDate;

/// Number of distinct suffixes per day (000-999).
pub const SUFFIX_SPAN: u16 = 1000;

/// Formats an invoice number for the given issue date and suffix.
///
/// The suffix is reduced modulo [`SUFFIX_SPAN`] so any `u16` source of
/// randomness can be passed straight through.
#[must_use]
pub fn format_invoice_number(issue_date: NaiveDate, suffix: u16) -> String {
    format!(
        "INV-{}-{:03}",
        issue_date.format("%Y%m%d"),
        suffix % SUFFIX_SPAN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(
            format_invoice_number(date(2024, 2, 15), 42),
            "INV-20240215-042"
        );
    }

    #[test]
    fn test_suffix_is_zero_padded() {
        assert_eq!(format_invoice_number(date(2024, 1, 1), 7), "INV-20240101-007");
        assert_eq!(format_invoice_number(date(2024, 1, 1), 0), "INV-20240101-000");
    }

    #[test]
    fn test_suffix_wraps_at_span() {
        assert_eq!(
            format_invoice_number(date(2024, 1, 1), 1042),
            "INV-20240101-042"
        );
    }

    #[test]
    fn test_distinct_days_give_distinct_prefixes() {
        let a = format_invoice_number(date(2024, 1, 1), 5);
        let b = format_invoice_number(date(2024, 1, 2), 5);
        assert_ne!(a, b);
    }
}
