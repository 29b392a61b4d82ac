//! Account repository for ledger account database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::{accounts, transactions};
use ledgerline_core::ledger::EntryKind;
use ledgerline_shared::AppError;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found (missing, soft-deleted, or other company).
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(id) => Self::NotFound(format!("account {id}")),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Stored balance versus the balance derived from transaction history.
///
/// The stored counter should always match the derived value; a mismatch
/// means a reconciliation bug or out-of-band write.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BalanceAudit {
    /// The `current_balance` column as stored.
    pub stored: Decimal,
    /// `initial_balance` plus the signed sum of live transactions.
    pub derived: Decimal,
}

impl BalanceAudit {
    /// Returns true if the stored balance matches the derived balance.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.stored == self.derived
    }
}

/// Account repository for lookups and balance auditing.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a live account by id, company-scoped.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account is missing,
    /// soft-deleted, or owned by another company.
    pub async fn get(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::SoftDelete.eq(false))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Lists live accounts for a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, company_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::SoftDelete.eq(false))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Audits an account's stored balance against its transaction history.
    ///
    /// Recomputes `initial_balance + sum(signed effects)` over live
    /// transactions and returns it alongside the stored counter.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account is missing,
    /// soft-deleted, or owned by another company.
    pub async fn audit_balance(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<BalanceAudit, AccountError> {
        let account = self.get(company_id, account_id).await?;

        let live = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .filter(transactions::Column::CompanyId.eq(company_id))
            .filter(transactions::Column::SoftDelete.eq(false))
            .all(&self.db)
            .await?;

        let derived = account.initial_balance
            + live
                .iter()
                .map(|t| EntryKind::from(t.kind.clone()).signed_effect(t.amount))
                .sum::<Decimal>();

        Ok(BalanceAudit {
            stored: account.current_balance,
            derived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_audit_consistency() {
        let audit = BalanceAudit {
            stored: dec!(120.50),
            derived: dec!(120.50),
        };
        assert!(audit.is_consistent());

        let audit = BalanceAudit {
            stored: dec!(120.50),
            derived: dec!(120.49),
        };
        assert!(!audit.is_consistent());
    }

    #[test]
    fn test_not_found_maps_to_app_not_found() {
        let err: AppError = AccountError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);
    }
}
