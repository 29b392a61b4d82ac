//! Quote status state machine.
//!
//! The lifecycle is `draft -> sent -> accepted | rejected | expired`, with
//! conversion to an invoice as a separate one-time step recorded through the
//! quote's `converted_to_invoice_id` back-link rather than a status value.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::QuoteError;

/// Status of a quote in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Quote is being drafted and can be modified.
    Draft,
    /// Quote has been sent to the client.
    Sent,
    /// Client accepted the quote; it may be converted to an invoice.
    Accepted,
    /// Client rejected the quote (terminal).
    Rejected,
    /// Quote expired before a decision (terminal, time-based).
    Expired,
}

impl QuoteStatus {
    /// Returns true if this status allows transitioning to `next`.
    ///
    /// The table is explicit so illegal jumps (e.g. `draft -> accepted`,
    /// or anything out of a terminal state) are rejected rather than
    /// silently written.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Sent)
                | (Self::Sent, Self::Accepted | Self::Rejected | Self::Expired)
        )
    }

    /// Validates a transition, returning the new status on success.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError::InvalidTransition` if the transition is not in
    /// the table.
    pub fn transition(self, next: Self) -> Result<Self, QuoteError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(QuoteError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Expired)
    }

    /// String form used in API payloads and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            other => Err(format!("Unknown quote status: {other}")),
        }
    }
}

/// Validates that a quote may be converted to an invoice.
///
/// Conversion requires `accepted` status and no existing back-link; a quote
/// that already points at an invoice is rejected so replaying the conversion
/// can never create a duplicate.
///
/// # Errors
///
/// Returns `QuoteError::NotConvertible` or `QuoteError::AlreadyConverted`.
pub fn ensure_convertible(
    status: QuoteStatus,
    converted_to_invoice_id: Option<Uuid>,
) -> Result<(), QuoteError> {
    if let Some(invoice_id) = converted_to_invoice_id {
        return Err(QuoteError::AlreadyConverted(invoice_id));
    }
    if status != QuoteStatus::Accepted {
        return Err(QuoteError::NotConvertible(status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Accepted,
        QuoteStatus::Rejected,
        QuoteStatus::Expired,
    ];

    #[rstest]
    #[case(QuoteStatus::Draft, QuoteStatus::Sent)]
    #[case(QuoteStatus::Sent, QuoteStatus::Accepted)]
    #[case(QuoteStatus::Sent, QuoteStatus::Rejected)]
    #[case(QuoteStatus::Sent, QuoteStatus::Expired)]
    fn test_legal_transitions(#[case] from: QuoteStatus, #[case] to: QuoteStatus) {
        assert_eq!(from.transition(to), Ok(to));
    }

    #[rstest]
    #[case(QuoteStatus::Draft, QuoteStatus::Accepted)] // cannot skip sending
    #[case(QuoteStatus::Draft, QuoteStatus::Draft)]
    #[case(QuoteStatus::Accepted, QuoteStatus::Accepted)] // no self-loop replay
    #[case(QuoteStatus::Accepted, QuoteStatus::Sent)]
    #[case(QuoteStatus::Rejected, QuoteStatus::Sent)]
    #[case(QuoteStatus::Expired, QuoteStatus::Accepted)]
    fn test_illegal_transitions(#[case] from: QuoteStatus, #[case] to: QuoteStatus) {
        assert_eq!(
            from.transition(to),
            Err(QuoteError::InvalidTransition { from, to })
        );
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL {
            if from.is_terminal() {
                for to in ALL {
                    assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
                }
            }
        }
    }

    #[test]
    fn test_only_accepted_is_convertible() {
        for status in ALL {
            let result = ensure_convertible(status, None);
            if status == QuoteStatus::Accepted {
                assert!(result.is_ok());
            } else {
                assert_eq!(result, Err(QuoteError::NotConvertible(status)));
            }
        }
    }

    #[test]
    fn test_converted_quote_is_never_convertible_again() {
        let invoice_id = Uuid::new_v4();
        // Even in accepted status, an existing back-link wins.
        assert_eq!(
            ensure_convertible(QuoteStatus::Accepted, Some(invoice_id)),
            Err(QuoteError::AlreadyConverted(invoice_id))
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ALL {
            assert_eq!(QuoteStatus::from_str(status.as_str()).unwrap(), status);
        }
    }
}
