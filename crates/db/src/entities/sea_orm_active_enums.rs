//! Database-backed enums and their conversions to core domain enums.

use sea_orm::entity::prelude::*;

use ledgerline_core::ledger::EntryKind as CoreEntryKind;
use ledgerline_core::quote::QuoteStatus as CoreQuoteStatus;
use ledgerline_core::recurring::Frequency;

/// Ledger account kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
pub enum AccountKind {
    /// Bank account.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Credit card.
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Cash on hand.
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// Transaction entry kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
pub enum EntryKind {
    /// Debit entry (money out).
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit entry (money in).
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<EntryKind> for CoreEntryKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Debit => Self::Debit,
            EntryKind::Credit => Self::Credit,
        }
    }
}

impl From<CoreEntryKind> for EntryKind {
    fn from(kind: CoreEntryKind) -> Self {
        match kind {
            CoreEntryKind::Debit => Self::Debit,
            CoreEntryKind::Credit => Self::Credit,
        }
    }
}

/// Recurrence frequency of an invoice/expense/income row.
///
/// `None` marks a non-recurring row; [`to_frequency`] maps it to the absence
/// of a core [`Frequency`].
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "recurring_frequency")]
pub enum RecurringFrequency {
    /// Not recurring.
    #[sea_orm(string_value = "none")]
    None,
    /// Every day.
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Every week.
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every year.
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Maps the stored frequency marker to the core frequency, if recurring.
#[must_use]
pub fn to_frequency(stored: &RecurringFrequency) -> Option<Frequency> {
    match stored {
        RecurringFrequency::None => None,
        RecurringFrequency::Daily => Some(Frequency::Daily),
        RecurringFrequency::Weekly => Some(Frequency::Weekly),
        RecurringFrequency::Monthly => Some(Frequency::Monthly),
        RecurringFrequency::Yearly => Some(Frequency::Yearly),
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent to the client.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Past its due date.
    #[sea_orm(string_value = "overdue")]
    Overdue,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Expense lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
pub enum ExpenseStatus {
    /// Awaiting payment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Income lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "income_status")]
pub enum IncomeStatus {
    /// Expected but not yet received.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Received.
    #[sea_orm(string_value = "received")]
    Received,
}

/// Quote lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quote_status")]
pub enum QuoteStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent to the client.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Accepted by the client.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Rejected by the client.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Expired without a decision.
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl From<QuoteStatus> for CoreQuoteStatus {
    fn from(status: QuoteStatus) -> Self {
        match status {
            QuoteStatus::Draft => Self::Draft,
            QuoteStatus::Sent => Self::Sent,
            QuoteStatus::Accepted => Self::Accepted,
            QuoteStatus::Rejected => Self::Rejected,
            QuoteStatus::Expired => Self::Expired,
        }
    }
}

impl From<CoreQuoteStatus> for QuoteStatus {
    fn from(status: CoreQuoteStatus) -> Self {
        match status {
            CoreQuoteStatus::Draft => Self::Draft,
            CoreQuoteStatus::Sent => Self::Sent,
            CoreQuoteStatus::Accepted => Self::Accepted,
            CoreQuoteStatus::Rejected => Self::Rejected,
            CoreQuoteStatus::Expired => Self::Expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_round_trips_through_core() {
        for kind in [EntryKind::Debit, EntryKind::Credit] {
            let core: CoreEntryKind = kind.clone().into();
            assert_eq!(EntryKind::from(core), kind);
        }
    }

    #[test]
    fn test_quote_status_round_trips_through_core() {
        for status in [
            QuoteStatus::Draft,
            QuoteStatus::Sent,
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
            QuoteStatus::Expired,
        ] {
            let core: CoreQuoteStatus = status.clone().into();
            assert_eq!(QuoteStatus::from(core), status);
        }
    }

    #[test]
    fn test_none_frequency_maps_to_no_frequency() {
        assert_eq!(to_frequency(&RecurringFrequency::None), None);
        assert_eq!(
            to_frequency(&RecurringFrequency::Monthly),
            Some(Frequency::Monthly)
        );
    }
}
