//! Transaction repository with account balance reconciliation.
//!
//! Every mutation here keeps the owning account's `current_balance` in
//! lockstep with the transaction history: create applies the signed effect,
//! update reverses the old effect and applies the new one, delete (always a
//! soft-delete) reverses the effect. Each mutation runs in a single database
//! transaction with the touched account rows locked `FOR UPDATE`, so
//! concurrent writers serialize instead of losing updates.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{accounts, transactions};
use ledgerline_core::ledger::{
    EntryKind, EntrySnapshot, LedgerError, ReconciliationService,
};
use ledgerline_shared::types::{AccountId, PageRequest, PageResponse};
use ledgerline_shared::AppError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found (missing, soft-deleted, or other company).
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Account not found (missing, soft-deleted, or other company).
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Amount failed validation.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(id) => Self::NotFound(format!("transaction {id}")),
            TransactionError::AccountNotFound(id) => Self::NotFound(format!("account {id}")),
            TransactionError::Validation(e) => Self::Validation(e.to_string()),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Account the entry is posted against.
    pub account_id: Uuid,
    /// Debit or credit.
    pub kind: EntryKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Currency; defaults to the account's currency when omitted.
    pub currency: Option<String>,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional invoice link.
    pub related_invoice_id: Option<Uuid>,
    /// Optional expense link.
    pub related_expense_id: Option<Uuid>,
    /// Optional income link.
    pub related_income_id: Option<Uuid>,
}

/// Input for updating a transaction. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Move the entry to another account.
    pub account_id: Option<Uuid>,
    /// Change the entry kind.
    pub kind: Option<EntryKind>,
    /// Change the amount.
    pub amount: Option<Decimal>,
    /// Change the date.
    pub transaction_date: Option<NaiveDate>,
    /// Change the description.
    pub description: Option<String>,
    /// Change the category.
    pub category_id: Option<Uuid>,
    /// Change the reconciled flag.
    pub reconciled: Option<bool>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Transaction repository for balance-reconciled mutations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction and applies its effect to the account balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is invalid, the account is not found
    /// in the company, or the database operation fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        ReconciliationService::validate_amount(input.amount)?;

        let txn = self.db.begin().await?;

        let account = lock_account(&txn, company_id, input.account_id).await?;
        let currency = input
            .currency
            .clone()
            .unwrap_or_else(|| account.currency.clone());

        let entry = EntrySnapshot {
            account_id: AccountId::from_uuid(input.account_id),
            kind: input.kind,
            amount: input.amount,
        };
        let delta = ReconciliationService::creation_delta(&entry);

        let now = Utc::now().into();
        let model = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            account_id: Set(input.account_id),
            kind: Set(input.kind.into()),
            amount: Set(input.amount),
            currency: Set(currency),
            transaction_date: Set(input.transaction_date),
            description: Set(input.description.clone()),
            category_id: Set(input.category_id),
            related_invoice_id: Set(input.related_invoice_id),
            related_expense_id: Set(input.related_expense_id),
            related_income_id: Set(input.related_income_id),
            reconciled: Set(false),
            soft_delete: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(&txn).await?;

        apply_balance_delta(&txn, account, delta.delta).await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Updates a transaction, reversing the old balance effect and applying
    /// the new one.
    ///
    /// If the account changes, the reversal lands on the old account and the
    /// new effect on the new account; both rows are locked in ascending id
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or an account is not found in the
    /// company, the amount is invalid, or the database operation fails.
    pub async fn update(
        &self,
        company_id: Uuid,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        if let Some(amount) = input.amount {
            ReconciliationService::validate_amount(amount)?;
        }

        let txn = self.db.begin().await?;

        let existing = lock_transaction(&txn, company_id, transaction_id).await?;

        let old = EntrySnapshot {
            account_id: AccountId::from_uuid(existing.account_id),
            kind: existing.kind.clone().into(),
            amount: existing.amount,
        };
        let new = EntrySnapshot {
            account_id: AccountId::from_uuid(input.account_id.unwrap_or(existing.account_id)),
            kind: input.kind.unwrap_or(old.kind),
            amount: input.amount.unwrap_or(old.amount),
        };

        let plan = ReconciliationService::update_plan(&old, &new);

        let mut new_account_currency = None;
        for delta in &plan.deltas {
            let account = lock_account(&txn, company_id, delta.account_id.into_inner()).await?;
            if delta.account_id == new.account_id {
                new_account_currency = Some(account.currency.clone());
            }
            apply_balance_delta(&txn, account, delta.delta).await?;
        }

        let mut active: transactions::ActiveModel = existing.into();
        active.account_id = Set(new.account_id.into_inner());
        active.kind = Set(new.kind.into());
        active.amount = Set(new.amount);
        if old.account_id != new.account_id {
            // The entry moved ledgers; it now trades in the new account's currency.
            if let Some(currency) = new_account_currency {
                active.currency = Set(currency);
            }
        }
        if let Some(date) = input.transaction_date {
            active.transaction_date = Set(date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(reconciled) = input.reconciled {
            active.reconciled = Set(reconciled);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-deletes a transaction and reverses its balance effect.
    ///
    /// A transaction that is already soft-deleted reads as not found, so a
    /// repeated delete can never reverse the balance twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or its account is not found in
    /// the company, or the database operation fails.
    pub async fn soft_delete(
        &self,
        company_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;

        let existing = lock_transaction(&txn, company_id, transaction_id).await?;

        let entry = EntrySnapshot {
            account_id: AccountId::from_uuid(existing.account_id),
            kind: existing.kind.clone().into(),
            amount: existing.amount,
        };
        let delta = ReconciliationService::deletion_delta(&entry);

        let account = lock_account(&txn, company_id, existing.account_id).await?;
        apply_balance_delta(&txn, account, delta.delta).await?;

        let mut active: transactions::ActiveModel = existing.into();
        active.soft_delete = Set(true);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Gets a live transaction by id, company-scoped.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction is missing,
    /// soft-deleted, or owned by another company.
    pub async fn get(
        &self,
        company_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::CompanyId.eq(company_id))
            .filter(transactions::Column::SoftDelete.eq(false))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists live transactions with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id))
            .filter(transactions::Column::SoftDelete.eq(false));

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::TransactionDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::TransactionDate.lte(date_to));
        }

        let total = query.clone().count(&self.db).await?;

        let data = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }
}

/// Loads a live transaction under a row lock, company-scoped.
async fn lock_transaction(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    transaction_id: Uuid,
) -> Result<transactions::Model, TransactionError> {
    transactions::Entity::find_by_id(transaction_id)
        .filter(transactions::Column::CompanyId.eq(company_id))
        .filter(transactions::Column::SoftDelete.eq(false))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(TransactionError::NotFound(transaction_id))
}

/// Loads a live account under a row lock, company-scoped.
async fn lock_account(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    account_id: Uuid,
) -> Result<accounts::Model, TransactionError> {
    accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::CompanyId.eq(company_id))
        .filter(accounts::Column::SoftDelete.eq(false))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(TransactionError::AccountNotFound(account_id))
}

/// Applies a signed delta to a locked account's stored balance.
async fn apply_balance_delta(
    txn: &DatabaseTransaction,
    account: accounts::Model,
    delta: Decimal,
) -> Result<(), TransactionError> {
    let new_balance = account.current_balance + delta;

    let mut active: accounts::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_error_maps_to_400() {
        let err: AppError = TransactionError::Validation(LedgerError::NegativeAmount).into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_not_found_variants_collapse_to_404() {
        let err: AppError = TransactionError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = TransactionError::AccountNotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_update_input_defaults_keep_everything() {
        let input = UpdateTransactionInput::default();
        assert!(input.account_id.is_none());
        assert!(input.kind.is_none());
        assert!(input.amount.is_none());
        assert!(input.reconciled.is_none());
    }

    #[test]
    fn test_create_input_amount_is_validated_before_any_store_access() {
        // The repository validates with the same rules the pure service
        // enforces, so a zero amount never reaches the database.
        assert!(ReconciliationService::validate_amount(dec!(0)).is_err());
    }
}
