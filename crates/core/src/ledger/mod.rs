//! Account balance reconciliation logic.
//!
//! This module keeps an account's stored balance consistent with the signed
//! history of its transactions:
//! - Entry kinds (debits and credits) and their signed effect on a balance
//! - Reversal-then-reapply planning for transaction updates
//! - Amount validation
//! - Error types for reconciliation operations

pub mod error;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod reconcile_props;

pub use error::LedgerError;
pub use reconcile::{AccountDelta, ReconciliationService, UpdatePlan};
pub use types::{EntryKind, EntrySnapshot};
