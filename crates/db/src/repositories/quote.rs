//! Quote repository: the one-shot quote-to-invoice conversion workflow.
//!
//! Conversion is transactional and idempotent: the quote row is locked, the
//! accepted-status and back-link gates run under the lock, and the new
//! invoice, its items, and the quote's `converted_to_invoice_id` back-link
//! all commit together. Replaying the call on a converted quote fails the
//! gate instead of creating a duplicate invoice.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{clients, invoice_items, invoices, quote_items, quotes};
use crate::entities::sea_orm_active_enums::{InvoiceStatus, RecurringFrequency};
use crate::repositories::numbering::{generate_unique_invoice_number, NumberingError};
use ledgerline_core::quote::{
    ClientTerms, ConversionService, QuoteError, QuoteItemSnapshot, QuoteSnapshot,
};
use ledgerline_shared::types::{ClientId, CompanyId, QuoteId};
use ledgerline_shared::AppError;

/// Error types for quote conversion.
#[derive(Debug, thiserror::Error)]
pub enum QuoteConversionError {
    /// Quote not found (missing, soft-deleted, or other company).
    #[error("Quote not found: {0}")]
    NotFound(Uuid),

    /// The quote's client no longer exists.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// The quote is not in a convertible state.
    #[error(transparent)]
    State(#[from] QuoteError),

    /// Invoice number allocation failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<QuoteConversionError> for AppError {
    fn from(err: QuoteConversionError) -> Self {
        match err {
            QuoteConversionError::NotFound(id) => Self::NotFound(format!("quote {id}")),
            QuoteConversionError::ClientNotFound(id) => Self::NotFound(format!("client {id}")),
            QuoteConversionError::State(e) => Self::InvalidState(e.to_string()),
            QuoteConversionError::Numbering(e) => Self::Conflict(e.to_string()),
            QuoteConversionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// What the caller gets back from a successful conversion.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversionOutcome {
    /// The new invoice's id.
    pub invoice_id: Uuid,
    /// The new invoice's number.
    pub invoice_number: String,
    /// The client the invoice was issued to.
    pub client_name: String,
}

/// Quote repository for the conversion workflow.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    db: DatabaseConnection,
}

impl QuoteRepository {
    /// Creates a new quote repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Converts an accepted quote into a draft invoice, exactly once.
    ///
    /// Inside one database transaction: locks the quote, gates on status and
    /// back-link, allocates a unique invoice number, inserts the invoice and
    /// one item per quote item, and writes `converted_to_invoice_id` on the
    /// quote.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote or client is not found in the company,
    /// the quote is not convertible, number allocation fails, or the
    /// database operation fails.
    pub async fn convert_to_invoice(
        &self,
        company_id: Uuid,
        quote_id: Uuid,
        today: NaiveDate,
    ) -> Result<ConversionOutcome, QuoteConversionError> {
        let txn = self.db.begin().await?;

        let quote = lock_quote(&txn, company_id, quote_id).await?;

        let client = clients::Entity::find_by_id(quote.client_id)
            .filter(clients::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .ok_or(QuoteConversionError::ClientNotFound(quote.client_id))?;

        let items = quote_items::Entity::find()
            .filter(quote_items::Column::QuoteId.eq(quote.id))
            .order_by_asc(quote_items::Column::CreatedAt)
            .all(&txn)
            .await?;

        let invoice_number = generate_unique_invoice_number(&txn, company_id, today).await?;

        let snapshot = QuoteSnapshot {
            id: QuoteId::from_uuid(quote.id),
            company_id: CompanyId::from_uuid(quote.company_id),
            client_id: ClientId::from_uuid(quote.client_id),
            status: quote.status.clone().into(),
            converted_to_invoice_id: quote.converted_to_invoice_id,
            currency: quote.currency.clone(),
            subtotal: quote.subtotal,
            tax_total: quote.tax_total,
            total: quote.total,
            notes: quote.notes.clone(),
        };
        let item_snapshots: Vec<QuoteItemSnapshot> = items
            .iter()
            .map(|item| QuoteItemSnapshot {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount,
            })
            .collect();
        let terms = ClientTerms {
            name: client.name.clone(),
            payment_terms_days: client.payment_terms_days.and_then(|d| u32::try_from(d).ok()),
        };

        let plan =
            ConversionService::plan(&snapshot, &item_snapshots, &terms, today, invoice_number)?;

        let now = Utc::now().into();
        let invoice_id = plan.invoice.id.into_inner();

        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            company_id: Set(plan.invoice.company_id.into_inner()),
            client_id: Set(plan.invoice.client_id.into_inner()),
            invoice_number: Set(plan.invoice.invoice_number.clone()),
            status: Set(InvoiceStatus::Draft),
            issue_date: Set(plan.invoice.issue_date),
            due_date: Set(plan.invoice.due_date),
            subtotal: Set(plan.invoice.subtotal),
            tax_total: Set(plan.invoice.tax_total),
            total: Set(plan.invoice.total),
            currency: Set(plan.invoice.currency.clone()),
            notes: Set(plan.invoice.notes.clone()),
            recurring: Set(RecurringFrequency::None),
            next_due_date: Set(None),
            category_id: Set(None),
            soft_delete: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        invoice.insert(&txn).await?;

        for item in &plan.items {
            let row = invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                amount: Set(item.amount),
                created_at: Set(now),
            };
            row.insert(&txn).await?;
        }

        // The back-link is what makes conversion one-time.
        let mut quote_active: quotes::ActiveModel = quote.into();
        quote_active.converted_to_invoice_id = Set(Some(invoice_id));
        quote_active.updated_at = Set(now);
        quote_active.update(&txn).await?;

        txn.commit().await?;

        Ok(ConversionOutcome {
            invoice_id,
            invoice_number: plan.invoice.invoice_number,
            client_name: client.name,
        })
    }
}

/// Loads a live quote under a row lock, company-scoped.
async fn lock_quote(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    quote_id: Uuid,
) -> Result<quotes::Model, QuoteConversionError> {
    quotes::Entity::find_by_id(quote_id)
        .filter(quotes::Column::CompanyId.eq(company_id))
        .filter(quotes::Column::SoftDelete.eq(false))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(QuoteConversionError::NotFound(quote_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::quote::QuoteStatus;

    #[test]
    fn test_state_errors_map_to_422() {
        let err: AppError =
            QuoteConversionError::State(QuoteError::NotConvertible(QuoteStatus::Draft)).into();
        assert_eq!(err.status_code(), 422);

        let err: AppError =
            QuoteConversionError::State(QuoteError::AlreadyConverted(Uuid::nil())).into();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_not_found_variants_collapse_to_404() {
        let err: AppError = QuoteConversionError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = QuoteConversionError::ClientNotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_numbering_exhaustion_maps_to_conflict() {
        let err: AppError = QuoteConversionError::Numbering(NumberingError::Exhausted).into();
        assert_eq!(err.status_code(), 409);
    }
}
