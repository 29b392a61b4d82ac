//! Recurrence scheduler: materializes due recurring items.
//!
//! One batch run scans invoices, expenses, and income for rows whose
//! `next_due_date` has arrived, and processes each due row in its own
//! database transaction: re-read the source `FOR UPDATE`, re-check it is
//! still due (an overlapping run may have advanced it), insert a concrete
//! non-recurring clone, and advance the source's `next_due_date` by one
//! period. Because the date advances in the same transaction that creates
//! the clone, a row can never double-post; because each row commits
//! independently, a failure on one row leaves the rest of the batch intact
//! and the failed row retries on the next run.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{
    to_frequency, ExpenseStatus, IncomeStatus, InvoiceStatus, RecurringFrequency,
};
use crate::entities::{clients, expenses, income, invoice_items, invoices};
use crate::repositories::numbering::{generate_unique_invoice_number, NumberingError};
use ledgerline_core::quote::{ClientTerms, DEFAULT_PAYMENT_TERMS_DAYS};
use ledgerline_core::recurring::schedule::is_due;
use ledgerline_core::recurring::{BatchReport, RecurringKind};

/// Error types for processing one recurring row.
#[derive(Debug, thiserror::Error)]
pub enum RecurringError {
    /// Advancing the due date left the representable date range.
    #[error("Advanced due date out of range")]
    DateOutOfRange,

    /// Invoice number allocation failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Whether a row was materialized or skipped (no longer due).
enum RowOutcome {
    Materialized,
    Skipped,
}

/// Recurrence scheduler repository.
#[derive(Debug, Clone)]
pub struct RecurringRepository {
    db: DatabaseConnection,
}

impl RecurringRepository {
    /// Creates a new recurring repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Processes every due recurring invoice, expense, and income row.
    ///
    /// Per-row failures are recorded in the report and do not abort the
    /// batch.
    pub async fn process_all(&self, today: NaiveDate) -> BatchReport {
        let mut report = BatchReport::new();

        self.process_invoices(today, &mut report).await;
        self.process_expenses(today, &mut report).await;
        self.process_income(today, &mut report).await;

        report
    }

    async fn process_invoices(&self, today: NaiveDate, report: &mut BatchReport) {
        let due = match invoices::Entity::find()
            .filter(invoices::Column::SoftDelete.eq(false))
            .filter(invoices::Column::Recurring.ne(RecurringFrequency::None))
            .filter(invoices::Column::NextDueDate.lte(today))
            .order_by_asc(invoices::Column::NextDueDate)
            .all(&self.db)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to scan for due recurring invoices");
                return;
            }
        };

        for source in due {
            match self.materialize_invoice(source.id, today).await {
                Ok(RowOutcome::Materialized) => report.record_success(RecurringKind::Invoice),
                Ok(RowOutcome::Skipped) => {
                    debug!(source_id = %source.id, "Recurring invoice no longer due, skipping");
                }
                Err(e) => {
                    warn!(source_id = %source.id, error = %e, "Failed to process recurring invoice");
                    report.record_failure(RecurringKind::Invoice, source.id, e.to_string());
                }
            }
        }
    }

    async fn process_expenses(&self, today: NaiveDate, report: &mut BatchReport) {
        let due = match expenses::Entity::find()
            .filter(expenses::Column::SoftDelete.eq(false))
            .filter(expenses::Column::Recurring.ne(RecurringFrequency::None))
            .filter(expenses::Column::NextDueDate.lte(today))
            .order_by_asc(expenses::Column::NextDueDate)
            .all(&self.db)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to scan for due recurring expenses");
                return;
            }
        };

        for source in due {
            match self.materialize_expense(source.id, today).await {
                Ok(RowOutcome::Materialized) => report.record_success(RecurringKind::Expense),
                Ok(RowOutcome::Skipped) => {
                    debug!(source_id = %source.id, "Recurring expense no longer due, skipping");
                }
                Err(e) => {
                    warn!(source_id = %source.id, error = %e, "Failed to process recurring expense");
                    report.record_failure(RecurringKind::Expense, source.id, e.to_string());
                }
            }
        }
    }

    async fn process_income(&self, today: NaiveDate, report: &mut BatchReport) {
        let due = match income::Entity::find()
            .filter(income::Column::SoftDelete.eq(false))
            .filter(income::Column::Recurring.ne(RecurringFrequency::None))
            .filter(income::Column::NextDueDate.lte(today))
            .order_by_asc(income::Column::NextDueDate)
            .all(&self.db)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to scan for due recurring income");
                return;
            }
        };

        for source in due {
            match self.materialize_income(source.id, today).await {
                Ok(RowOutcome::Materialized) => report.record_success(RecurringKind::Income),
                Ok(RowOutcome::Skipped) => {
                    debug!(source_id = %source.id, "Recurring income no longer due, skipping");
                }
                Err(e) => {
                    warn!(source_id = %source.id, error = %e, "Failed to process recurring income");
                    report.record_failure(RecurringKind::Income, source.id, e.to_string());
                }
            }
        }
    }

    /// Materializes one due recurring invoice in its own transaction.
    async fn materialize_invoice(
        &self,
        source_id: Uuid,
        today: NaiveDate,
    ) -> Result<RowOutcome, RecurringError> {
        let txn = self.db.begin().await?;

        // Re-read under lock; an overlapping run may have advanced the date
        // between the scan and this transaction.
        let Some(source) = invoices::Entity::find_by_id(source_id)
            .filter(invoices::Column::SoftDelete.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };

        let Some((frequency, due)) = recurrence_of(&source.recurring, source.next_due_date) else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };
        if !is_due(due, today) {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        }

        let next_due = frequency.advance(due).ok_or(RecurringError::DateOutOfRange)?;

        // The clone is an ordinary draft invoice issued today, due per the
        // client's payment terms.
        let terms = client_terms(&txn, source.company_id, source.client_id).await?;
        let due_date = today
            .checked_add_days(chrono::Days::new(terms))
            .ok_or(RecurringError::DateOutOfRange)?;
        let invoice_number =
            generate_unique_invoice_number(&txn, source.company_id, today).await?;

        let now = Utc::now().into();
        let clone_id = Uuid::new_v4();
        let clone = invoices::ActiveModel {
            id: Set(clone_id),
            company_id: Set(source.company_id),
            client_id: Set(source.client_id),
            invoice_number: Set(invoice_number),
            status: Set(InvoiceStatus::Draft),
            issue_date: Set(today),
            due_date: Set(due_date),
            subtotal: Set(source.subtotal),
            tax_total: Set(source.tax_total),
            total: Set(source.total),
            currency: Set(source.currency.clone()),
            notes: Set(append_recurring_marker(source.notes.clone())),
            recurring: Set(RecurringFrequency::None),
            next_due_date: Set(None),
            category_id: Set(source.category_id),
            soft_delete: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        clone.insert(&txn).await?;

        // Clone every line item onto the new invoice.
        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(source.id))
            .order_by_asc(invoice_items::Column::CreatedAt)
            .all(&txn)
            .await?;
        for item in items {
            let row = invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(clone_id),
                description: Set(item.description),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                amount: Set(item.amount),
                created_at: Set(now),
            };
            row.insert(&txn).await?;
        }

        // Advance the source; only the date moves.
        let mut source_active: invoices::ActiveModel = source.into();
        source_active.next_due_date = Set(Some(next_due));
        source_active.updated_at = Set(now);
        source_active.update(&txn).await?;

        txn.commit().await?;
        Ok(RowOutcome::Materialized)
    }

    /// Materializes one due recurring expense in its own transaction.
    async fn materialize_expense(
        &self,
        source_id: Uuid,
        today: NaiveDate,
    ) -> Result<RowOutcome, RecurringError> {
        let txn = self.db.begin().await?;

        let Some(source) = expenses::Entity::find_by_id(source_id)
            .filter(expenses::Column::SoftDelete.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };

        let Some((frequency, due)) = recurrence_of(&source.recurring, source.next_due_date) else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };
        if !is_due(due, today) {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        }

        let next_due = frequency.advance(due).ok_or(RecurringError::DateOutOfRange)?;

        let now = Utc::now().into();
        let clone = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(source.company_id),
            vendor_name: Set(source.vendor_name.clone()),
            description: Set(format!("{} (Recurring)", source.description)),
            amount: Set(source.amount),
            currency: Set(source.currency.clone()),
            expense_date: Set(today),
            status: Set(ExpenseStatus::Pending),
            category_id: Set(source.category_id),
            recurring: Set(RecurringFrequency::None),
            next_due_date: Set(None),
            soft_delete: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        clone.insert(&txn).await?;

        let mut source_active: expenses::ActiveModel = source.into();
        source_active.next_due_date = Set(Some(next_due));
        source_active.updated_at = Set(now);
        source_active.update(&txn).await?;

        txn.commit().await?;
        Ok(RowOutcome::Materialized)
    }

    /// Materializes one due recurring income row in its own transaction.
    async fn materialize_income(
        &self,
        source_id: Uuid,
        today: NaiveDate,
    ) -> Result<RowOutcome, RecurringError> {
        let txn = self.db.begin().await?;

        let Some(source) = income::Entity::find_by_id(source_id)
            .filter(income::Column::SoftDelete.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };

        let Some((frequency, due)) = recurrence_of(&source.recurring, source.next_due_date) else {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        };
        if !is_due(due, today) {
            txn.rollback().await?;
            return Ok(RowOutcome::Skipped);
        }

        let next_due = frequency.advance(due).ok_or(RecurringError::DateOutOfRange)?;

        let now = Utc::now().into();
        let clone = income::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(source.company_id),
            source: Set(source.source.clone()),
            description: Set(format!("{} (Recurring)", source.description)),
            amount: Set(source.amount),
            currency: Set(source.currency.clone()),
            income_date: Set(today),
            status: Set(IncomeStatus::Pending),
            category_id: Set(source.category_id),
            recurring: Set(RecurringFrequency::None),
            next_due_date: Set(None),
            soft_delete: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        clone.insert(&txn).await?;

        let mut source_active: income::ActiveModel = source.into();
        source_active.next_due_date = Set(Some(next_due));
        source_active.updated_at = Set(now);
        source_active.update(&txn).await?;

        txn.commit().await?;
        Ok(RowOutcome::Materialized)
    }
}

/// Extracts the active recurrence (frequency + due date) of a source row.
///
/// Returns `None` for non-recurring rows and for recurring rows missing a
/// due date (the schema forbids the latter, but the scheduler skips rather
/// than trusts).
fn recurrence_of(
    stored: &RecurringFrequency,
    next_due_date: Option<NaiveDate>,
) -> Option<(ledgerline_core::recurring::Frequency, NaiveDate)> {
    let frequency = to_frequency(stored)?;
    let due = next_due_date?;
    Some((frequency, due))
}

/// Looks up the client's payment terms for a materialized invoice's due date.
async fn client_terms(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    client_id: Uuid,
) -> Result<u64, RecurringError> {
    let client = clients::Entity::find_by_id(client_id)
        .filter(clients::Column::CompanyId.eq(company_id))
        .one(txn)
        .await?;

    Ok(client.map_or(DEFAULT_PAYMENT_TERMS_DAYS, |c| {
        ClientTerms {
            name: c.name,
            payment_terms_days: c.payment_terms_days.and_then(|d| u32::try_from(d).ok()),
        }
        .effective_terms_days()
    }))
}

/// Appends the recurring marker to notes when present.
fn append_recurring_marker(notes: Option<String>) -> Option<String> {
    notes.map(|n| format!("{n} (Recurring)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::recurring::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_recurrence_of_non_recurring_row() {
        assert!(recurrence_of(&RecurringFrequency::None, Some(date(2024, 1, 1))).is_none());
    }

    #[test]
    fn test_recurrence_of_missing_due_date() {
        assert!(recurrence_of(&RecurringFrequency::Monthly, None).is_none());
    }

    #[test]
    fn test_recurrence_of_active_row() {
        let (frequency, due) =
            recurrence_of(&RecurringFrequency::Monthly, Some(date(2024, 1, 31))).unwrap();
        assert_eq!(frequency, Frequency::Monthly);
        assert_eq!(due, date(2024, 1, 31));
        // The month-end case the scheduler must get right.
        assert_eq!(frequency.advance(due), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_recurring_marker_only_appends_when_present() {
        assert_eq!(append_recurring_marker(None), None);
        assert_eq!(
            append_recurring_marker(Some("Monthly retainer".to_string())),
            Some("Monthly retainer (Recurring)".to_string())
        );
    }
}
