//! Ledger error types for reconciliation and validation.

use thiserror::Error;

/// Errors that can occur while validating or reconciling transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Transaction amount cannot be negative.
    #[error("Transaction amount cannot be negative")]
    NegativeAmount,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::ZeroAmount.to_string(),
            "Transaction amount cannot be zero"
        );
        assert_eq!(
            LedgerError::NegativeAmount.to_string(),
            "Transaction amount cannot be negative"
        );
    }
}
