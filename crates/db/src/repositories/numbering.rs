//! Invoice number generation with collision handling.
//!
//! The `INV-YYYYMMDD-NNN` shape only has 1000 suffixes per day, so a busy
//! company can collide. Numbers are checked for existence inside the calling
//! transaction and regenerated a bounded number of times; the per-company
//! unique index on `invoices(company_id, invoice_number)` is the backstop
//! for races the check cannot see.

use chrono::NaiveDate;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::invoices;
use ledgerline_core::quote::number::{format_invoice_number, SUFFIX_SPAN};

/// Attempts before giving up on finding a free number.
const MAX_ATTEMPTS: u8 = 5;

/// Errors from invoice number generation.
#[derive(Debug, thiserror::Error)]
pub enum NumberingError {
    /// Could not find a free number within the attempt budget.
    #[error("Could not allocate a unique invoice number after {MAX_ATTEMPTS} attempts")]
    Exhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Generates an invoice number unique within the company.
///
/// Runs inside the caller's database transaction so the existence check and
/// the eventual insert see the same snapshot.
///
/// # Errors
///
/// Returns `NumberingError::Exhausted` if all attempts collide.
pub async fn generate_unique_invoice_number<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    issue_date: NaiveDate,
) -> Result<String, NumberingError> {
    for _ in 0..MAX_ATTEMPTS {
        let suffix = rand::rng().random_range(0..SUFFIX_SPAN);
        let candidate = format_invoice_number(issue_date, suffix);

        let taken = invoices::Entity::find()
            .filter(invoices::Column::CompanyId.eq(company_id))
            .filter(invoices::Column::InvoiceNumber.eq(candidate.clone()))
            .count(conn)
            .await?
            > 0;

        if !taken {
            return Ok(candidate);
        }
    }

    Err(NumberingError::Exhausted)
}
