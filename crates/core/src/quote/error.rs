//! Quote error types for state and conversion errors.

use thiserror::Error;
use uuid::Uuid;

use super::status::QuoteStatus;

/// Errors that can occur during quote operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// The requested status transition is not allowed.
    #[error("Cannot transition quote from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: QuoteStatus,
        /// Requested status.
        to: QuoteStatus,
    },

    /// Only accepted quotes can be converted to invoices.
    #[error("Only accepted quotes can be converted, quote is {0}")]
    NotConvertible(QuoteStatus),

    /// The quote was already converted; conversion is one-time.
    #[error("Quote was already converted to invoice {0}")]
    AlreadyConverted(Uuid),

    /// The computed due date falls outside the representable date range.
    #[error("Invoice due date out of range")]
    DueDateOutOfRange,
}

impl QuoteError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotConvertible(_) => "QUOTE_NOT_CONVERTIBLE",
            Self::AlreadyConverted(_) => "QUOTE_ALREADY_CONVERTED",
            Self::DueDateOutOfRange => "DUE_DATE_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            QuoteError::NotConvertible(QuoteStatus::Draft).error_code(),
            "QUOTE_NOT_CONVERTIBLE"
        );
        assert_eq!(
            QuoteError::AlreadyConverted(Uuid::nil()).error_code(),
            "QUOTE_ALREADY_CONVERTED"
        );
        assert_eq!(
            QuoteError::InvalidTransition {
                from: QuoteStatus::Draft,
                to: QuoteStatus::Accepted,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
    }

    #[test]
    fn test_error_display() {
        let err = QuoteError::InvalidTransition {
            from: QuoteStatus::Rejected,
            to: QuoteStatus::Sent,
        };
        assert_eq!(err.to_string(), "Cannot transition quote from rejected to sent");

        assert_eq!(
            QuoteError::NotConvertible(QuoteStatus::Sent).to_string(),
            "Only accepted quotes can be converted, quote is sent"
        );
    }
}
