//! Reconciliation planning for transaction create/update/delete.
//!
//! The stored `current_balance` of an account must always equal its initial
//! balance plus the signed sum of its live (non-soft-deleted) transactions.
//! This module computes the balance deltas a mutation must apply so that the
//! invariant survives the mutation. Applying the deltas to the account rows
//! is the persistence layer's job and must happen in the same database
//! transaction as the row mutation itself.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::EntrySnapshot;
use ledgerline_shared::types::AccountId;

/// A single balance adjustment to apply to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountDelta {
    /// The account whose stored balance changes.
    pub account_id: AccountId,
    /// The signed amount to add to the stored balance.
    pub delta: Decimal,
}

/// The set of balance adjustments for one transaction update.
///
/// Holds one delta when the transaction stays on its account and two when it
/// moves between accounts. Deltas are ordered by ascending account id so
/// callers that lock rows per delta always lock in a consistent order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Balance adjustments, ordered by account id.
    pub deltas: Vec<AccountDelta>,
}

impl UpdatePlan {
    /// Net effect of the plan across all touched accounts.
    #[must_use]
    pub fn net_effect(&self) -> Decimal {
        self.deltas.iter().map(|d| d.delta).sum()
    }
}

/// Stateless service computing reconciliation deltas.
///
/// Contains pure math with no database dependencies; the repository layer
/// feeds it snapshots and applies the resulting deltas under row locks.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Validate a transaction amount before it touches the ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is zero or negative.
    pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        Ok(())
    }

    /// Delta applied when a transaction is created.
    #[must_use]
    pub fn creation_delta(entry: &EntrySnapshot) -> AccountDelta {
        AccountDelta {
            account_id: entry.account_id,
            delta: entry.signed_effect(),
        }
    }

    /// Delta applied when a transaction is soft-deleted.
    ///
    /// Exactly the inverse of the creation delta, so delete-after-create is
    /// balance-neutral.
    #[must_use]
    pub fn deletion_delta(entry: &EntrySnapshot) -> AccountDelta {
        AccountDelta {
            account_id: entry.account_id,
            delta: -entry.signed_effect(),
        }
    }

    /// Plan the balance adjustments for updating a transaction.
    ///
    /// Reverses the old entry's effect and applies the new entry's effect.
    /// When both snapshots share an account the two adjustments collapse into
    /// one delta; when the transaction moves between accounts the reversal
    /// lands on the old account and the new effect on the new account.
    #[must_use]
    pub fn update_plan(old: &EntrySnapshot, new: &EntrySnapshot) -> UpdatePlan {
        let deltas = if old.account_id == new.account_id {
            vec![AccountDelta {
                account_id: old.account_id,
                delta: new.signed_effect() - old.signed_effect(),
            }]
        } else {
            let mut deltas = vec![
                AccountDelta {
                    account_id: old.account_id,
                    delta: -old.signed_effect(),
                },
                AccountDelta {
                    account_id: new.account_id,
                    delta: new.signed_effect(),
                },
            ];
            // Lock-order discipline: ascending account id.
            deltas.sort_by_key(|d| d.account_id.into_inner());
            deltas
        };

        UpdatePlan { deltas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntryKind;
    use rust_decimal_macros::dec;

    fn snapshot(account_id: AccountId, kind: EntryKind, amount: Decimal) -> EntrySnapshot {
        EntrySnapshot {
            account_id,
            kind,
            amount,
        }
    }

    #[test]
    fn test_validate_amount_accepts_positive() {
        assert!(ReconciliationService::validate_amount(dec!(0.01)).is_ok());
    }

    #[test]
    fn test_validate_amount_rejects_zero() {
        assert_eq!(
            ReconciliationService::validate_amount(Decimal::ZERO),
            Err(LedgerError::ZeroAmount)
        );
    }

    #[test]
    fn test_validate_amount_rejects_negative() {
        assert_eq!(
            ReconciliationService::validate_amount(dec!(-5)),
            Err(LedgerError::NegativeAmount)
        );
    }

    #[test]
    fn test_creation_delta_credit_adds() {
        let account = AccountId::new();
        let delta =
            ReconciliationService::creation_delta(&snapshot(account, EntryKind::Credit, dec!(100)));
        assert_eq!(delta.account_id, account);
        assert_eq!(delta.delta, dec!(100));
    }

    #[test]
    fn test_creation_delta_debit_subtracts() {
        let account = AccountId::new();
        let delta =
            ReconciliationService::creation_delta(&snapshot(account, EntryKind::Debit, dec!(100)));
        assert_eq!(delta.delta, dec!(-100));
    }

    #[test]
    fn test_deletion_delta_inverts_creation() {
        let account = AccountId::new();
        let entry = snapshot(account, EntryKind::Debit, dec!(37.25));
        let create = ReconciliationService::creation_delta(&entry);
        let delete = ReconciliationService::deletion_delta(&entry);
        assert_eq!(create.delta + delete.delta, Decimal::ZERO);
    }

    #[test]
    fn test_update_same_account_amount_change() {
        // Credit 100 -> Credit 140 on the same account shifts the balance by +40.
        let account = AccountId::new();
        let old = snapshot(account, EntryKind::Credit, dec!(100));
        let new = snapshot(account, EntryKind::Credit, dec!(140));

        let plan = ReconciliationService::update_plan(&old, &new);
        assert_eq!(plan.deltas.len(), 1);
        assert_eq!(plan.deltas[0].account_id, account);
        assert_eq!(plan.deltas[0].delta, dec!(40));
    }

    #[test]
    fn test_update_same_account_kind_flip() {
        // Debit 60 -> Credit 60 swings the balance by +120.
        let account = AccountId::new();
        let old = snapshot(account, EntryKind::Debit, dec!(60));
        let new = snapshot(account, EntryKind::Credit, dec!(60));

        let plan = ReconciliationService::update_plan(&old, &new);
        assert_eq!(plan.deltas.len(), 1);
        assert_eq!(plan.deltas[0].delta, dec!(120));
    }

    #[test]
    fn test_update_across_accounts_reverses_old_and_applies_new() {
        let old_account = AccountId::new();
        let new_account = AccountId::new();
        let old = snapshot(old_account, EntryKind::Credit, dec!(100));
        let new = snapshot(new_account, EntryKind::Credit, dec!(80));

        let plan = ReconciliationService::update_plan(&old, &new);
        assert_eq!(plan.deltas.len(), 2);

        let old_delta = plan
            .deltas
            .iter()
            .find(|d| d.account_id == old_account)
            .unwrap();
        let new_delta = plan
            .deltas
            .iter()
            .find(|d| d.account_id == new_account)
            .unwrap();
        assert_eq!(old_delta.delta, dec!(-100));
        assert_eq!(new_delta.delta, dec!(80));
    }

    #[test]
    fn test_update_across_accounts_orders_deltas_by_id() {
        let a = AccountId::new();
        let b = AccountId::new();
        let old = snapshot(a, EntryKind::Debit, dec!(10));
        let new = snapshot(b, EntryKind::Debit, dec!(10));

        let plan = ReconciliationService::update_plan(&old, &new);
        assert!(plan.deltas[0].account_id.into_inner() <= plan.deltas[1].account_id.into_inner());
    }

    #[test]
    fn test_net_effect_sums_deltas() {
        let old = snapshot(AccountId::new(), EntryKind::Credit, dec!(100));
        let new = snapshot(AccountId::new(), EntryKind::Credit, dec!(75));

        let plan = ReconciliationService::update_plan(&old, &new);
        assert_eq!(plan.net_effect(), dec!(-25));
    }
}
