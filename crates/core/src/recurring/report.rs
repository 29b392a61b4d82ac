//! Batch run reporting for the recurrence scheduler.
//!
//! Each due row is processed in its own transaction; a row that fails is
//! recorded here and the batch continues. The report is what the cron
//! surface returns to its caller, so operators see failures instead of a
//! bare log line.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three kinds of recurring-capable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    /// Recurring invoice.
    Invoice,
    /// Recurring expense.
    Expense,
    /// Recurring income.
    Income,
}

impl std::fmt::Display for RecurringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

/// One source row the scheduler failed to process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// Which kind of entity failed.
    pub kind: RecurringKind,
    /// The source row's id.
    pub source_id: Uuid,
    /// Human-readable failure message.
    pub message: String,
}

/// Outcome of one scheduler batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Invoices materialized.
    pub invoices: u32,
    /// Expenses materialized.
    pub expenses: u32,
    /// Income records materialized.
    pub income: u32,
    /// Rows that failed; their `next_due_date` was left untouched, so they
    /// retry on the next run.
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successfully materialized row.
    pub fn record_success(&mut self, kind: RecurringKind) {
        match kind {
            RecurringKind::Invoice => self.invoices += 1,
            RecurringKind::Expense => self.expenses += 1,
            RecurringKind::Income => self.income += 1,
        }
    }

    /// Records one failed row.
    pub fn record_failure(&mut self, kind: RecurringKind, source_id: Uuid, message: String) {
        self.failures.push(RowFailure {
            kind,
            source_id,
            message,
        });
    }

    /// Total rows materialized across all kinds.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.invoices + self.expenses + self.income
    }

    /// Returns true if any row failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = BatchReport::new();
        assert_eq!(report.total(), 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_success_counts_per_kind() {
        let mut report = BatchReport::new();
        report.record_success(RecurringKind::Invoice);
        report.record_success(RecurringKind::Invoice);
        report.record_success(RecurringKind::Expense);
        report.record_success(RecurringKind::Income);

        assert_eq!(report.invoices, 2);
        assert_eq!(report.expenses, 1);
        assert_eq!(report.income, 1);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_failures_do_not_count_toward_total() {
        let mut report = BatchReport::new();
        report.record_success(RecurringKind::Expense);
        report.record_failure(
            RecurringKind::Invoice,
            Uuid::new_v4(),
            "date out of range".to_string(),
        );

        assert_eq!(report.total(), 1);
        assert!(report.has_failures());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, RecurringKind::Invoice);
    }

    #[test]
    fn test_report_serializes_for_the_cron_response() {
        let mut report = BatchReport::new();
        report.record_success(RecurringKind::Income);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["income"], 1);
        assert_eq!(json["failures"].as_array().unwrap().len(), 0);
    }
}
