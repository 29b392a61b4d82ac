//! Ledger domain types for balance reconciliation.
//!
//! This module defines the types describing how a single transaction touches
//! an account balance. Unlike a full double-entry journal, every transaction
//! here is a single signed entry against exactly one account.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerline_shared::types::AccountId;

/// Entry kind: either Debit or Credit.
///
/// For the bank/cash/credit-card ledgers tracked here:
/// - Credits add to the account balance
/// - Debits subtract from the account balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Debit entry (money out).
    Debit,
    /// Credit entry (money in).
    Credit,
}

impl EntryKind {
    /// Returns the signed effect of an entry of this kind on a balance.
    ///
    /// Credits are positive, debits negative. `amount` is expected to be
    /// non-negative (see [`ReconciliationService::validate_amount`]).
    ///
    /// [`ReconciliationService::validate_amount`]: super::ReconciliationService::validate_amount
    #[must_use]
    pub fn signed_effect(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }

    /// String form used in API payloads and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(format!("Unknown entry kind: {other}")),
        }
    }
}

/// The balance-relevant fields of a transaction at a point in time.
///
/// Reconciliation only ever needs the account, the kind, and the amount;
/// snapshots of the old and new state are enough to plan any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySnapshot {
    /// The account the entry is posted against.
    pub account_id: AccountId,
    /// Whether the entry is a debit or a credit.
    pub kind: EntryKind,
    /// The non-negative entry amount.
    pub amount: Decimal,
}

impl EntrySnapshot {
    /// The signed effect this entry has on its account's balance.
    #[must_use]
    pub fn signed_effect(&self) -> Decimal {
        self.kind.signed_effect(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_credit_effect_is_positive() {
        assert_eq!(EntryKind::Credit.signed_effect(dec!(125.50)), dec!(125.50));
    }

    #[test]
    fn test_debit_effect_is_negative() {
        assert_eq!(EntryKind::Debit.signed_effect(dec!(125.50)), dec!(-125.50));
    }

    #[test]
    fn test_entry_kind_round_trips_through_str() {
        for kind in [EntryKind::Debit, EntryKind::Credit] {
            assert_eq!(EntryKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_entry_kind_is_rejected() {
        assert!(EntryKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_snapshot_effect_matches_kind() {
        let snapshot = EntrySnapshot {
            account_id: AccountId::new(),
            kind: EntryKind::Debit,
            amount: dec!(42),
        };
        assert_eq!(snapshot.signed_effect(), dec!(-42));
    }
}
