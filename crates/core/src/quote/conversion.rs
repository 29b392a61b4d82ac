//! Conversion planning: building an invoice from an accepted quote.
//!
//! This service is pure: it takes snapshots of the quote, its items, and the
//! client's terms, and produces the full set of rows the persistence layer
//! must insert in one transaction. Totals are carried over verbatim from the
//! quote; the conversion trusts the copied figures rather than re-deriving
//! them from the items.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::QuoteError;
use super::status::{self, QuoteStatus};
use ledgerline_shared::types::{ClientId, CompanyId, InvoiceId, QuoteId};

/// Fallback payment terms when the client has none configured.
pub const DEFAULT_PAYMENT_TERMS_DAYS: u64 = 30;

/// The conversion-relevant fields of a quote.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    /// Quote id.
    pub id: QuoteId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The client the quote was issued to.
    pub client_id: ClientId,
    /// Current lifecycle status.
    pub status: QuoteStatus,
    /// Back-link set by a previous conversion, if any.
    pub converted_to_invoice_id: Option<Uuid>,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Sum of item amounts as stored on the quote.
    pub subtotal: Decimal,
    /// Tax as stored on the quote.
    pub tax_total: Decimal,
    /// Grand total as stored on the quote.
    pub total: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// One quote line item, copied onto the invoice 1:1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteItemSnapshot {
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line amount as stored (quantity x unit price at write time).
    pub amount: Decimal,
}

/// The client fields the conversion needs.
#[derive(Debug, Clone)]
pub struct ClientTerms {
    /// Client display name, returned to the caller with the new invoice.
    pub name: String,
    /// Configured payment terms in days, if any.
    pub payment_terms_days: Option<u32>,
}

impl ClientTerms {
    /// The payment terms to apply: the client's own when configured,
    /// otherwise [`DEFAULT_PAYMENT_TERMS_DAYS`].
    #[must_use]
    pub fn effective_terms_days(&self) -> u64 {
        self.payment_terms_days
            .map_or(DEFAULT_PAYMENT_TERMS_DAYS, u64::from)
    }
}

/// The invoice row to insert.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    /// Pre-generated id for the new invoice.
    pub id: InvoiceId,
    /// Owning company (same as the quote's).
    pub company_id: CompanyId,
    /// Client carried over from the quote.
    pub client_id: ClientId,
    /// Generated invoice number.
    pub invoice_number: String,
    /// Issue date (the conversion day).
    pub issue_date: NaiveDate,
    /// Due date derived from the client's payment terms.
    pub due_date: NaiveDate,
    /// Currency carried over verbatim.
    pub currency: String,
    /// Subtotal carried over verbatim.
    pub subtotal: Decimal,
    /// Tax carried over verbatim.
    pub tax_total: Decimal,
    /// Total carried over verbatim.
    pub total: Decimal,
    /// Notes carried over verbatim.
    pub notes: Option<String>,
}

/// One invoice line item to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceItemDraft {
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line amount.
    pub amount: Decimal,
}

/// Everything the persistence layer inserts for one conversion.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    /// The invoice row.
    pub invoice: InvoiceDraft,
    /// The invoice items, in the same order as the quote items.
    pub items: Vec<InvoiceItemDraft>,
}

/// Stateless service planning quote-to-invoice conversions.
pub struct ConversionService;

impl ConversionService {
    /// Plans the conversion of an accepted quote into a draft invoice.
    ///
    /// Gating: the quote must be `accepted` and must not carry a conversion
    /// back-link. Items are copied 1:1; subtotal, tax, total, notes, and
    /// currency are carried over verbatim.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError` if the quote is not convertible or the due date
    /// would fall outside the representable range.
    pub fn plan(
        quote: &QuoteSnapshot,
        items: &[QuoteItemSnapshot],
        client: &ClientTerms,
        issue_date: NaiveDate,
        invoice_number: String,
    ) -> Result<ConversionPlan, QuoteError> {
        status::ensure_convertible(quote.status, quote.converted_to_invoice_id)?;

        let due_date = issue_date
            .checked_add_days(Days::new(client.effective_terms_days()))
            .ok_or(QuoteError::DueDateOutOfRange)?;

        let invoice = InvoiceDraft {
            id: InvoiceId::new(),
            company_id: quote.company_id,
            client_id: quote.client_id,
            invoice_number,
            issue_date,
            due_date,
            currency: quote.currency.clone(),
            subtotal: quote.subtotal,
            tax_total: quote.tax_total,
            total: quote.total,
            notes: quote.notes.clone(),
        };

        let items = items
            .iter()
            .map(|item| InvoiceItemDraft {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount,
            })
            .collect();

        Ok(ConversionPlan { invoice, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn accepted_quote() -> QuoteSnapshot {
        QuoteSnapshot {
            id: QuoteId::new(),
            company_id: CompanyId::new(),
            client_id: ClientId::new(),
            status: QuoteStatus::Accepted,
            converted_to_invoice_id: None,
            currency: "USD".to_string(),
            subtotal: dec!(250.00),
            tax_total: dec!(25.00),
            total: dec!(275.00),
            notes: Some("Net terms apply".to_string()),
        }
    }

    fn quote_items() -> Vec<QuoteItemSnapshot> {
        vec![
            QuoteItemSnapshot {
                description: "Design work".to_string(),
                quantity: dec!(10),
                unit_price: dec!(20.00),
                amount: dec!(200.00),
            },
            QuoteItemSnapshot {
                description: "Hosting".to_string(),
                quantity: dec!(1),
                unit_price: dec!(50.00),
                amount: dec!(50.00),
            },
        ]
    }

    fn client() -> ClientTerms {
        ClientTerms {
            name: "Acme Corp".to_string(),
            payment_terms_days: None,
        }
    }

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    #[test]
    fn test_plan_copies_totals_verbatim() {
        let quote = accepted_quote();
        let plan = ConversionService::plan(
            &quote,
            &quote_items(),
            &client(),
            issue_date(),
            "INV-20240215-001".to_string(),
        )
        .unwrap();

        assert_eq!(plan.invoice.subtotal, quote.subtotal);
        assert_eq!(plan.invoice.tax_total, quote.tax_total);
        assert_eq!(plan.invoice.total, quote.total);
        assert_eq!(plan.invoice.currency, quote.currency);
        assert_eq!(plan.invoice.notes, quote.notes);
        assert_eq!(plan.invoice.client_id, quote.client_id);
        assert_eq!(plan.invoice.company_id, quote.company_id);
    }

    #[test]
    fn test_plan_copies_items_one_to_one() {
        let items = quote_items();
        let plan = ConversionService::plan(
            &accepted_quote(),
            &items,
            &client(),
            issue_date(),
            "INV-20240215-002".to_string(),
        )
        .unwrap();

        assert_eq!(plan.items.len(), items.len());
        for (source, copy) in items.iter().zip(&plan.items) {
            assert_eq!(copy.description, source.description);
            assert_eq!(copy.quantity, source.quantity);
            assert_eq!(copy.unit_price, source.unit_price);
            assert_eq!(copy.amount, source.amount);
        }
    }

    #[test]
    fn test_plan_allows_empty_quote() {
        let plan = ConversionService::plan(
            &accepted_quote(),
            &[],
            &client(),
            issue_date(),
            "INV-20240215-003".to_string(),
        )
        .unwrap();
        assert!(plan.items.is_empty());
    }

    #[test]
    fn test_default_due_date_is_net_30() {
        let plan = ConversionService::plan(
            &accepted_quote(),
            &[],
            &client(),
            issue_date(),
            "INV-20240215-004".to_string(),
        )
        .unwrap();
        assert_eq!(
            plan.invoice.due_date,
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
        );
    }

    #[test]
    fn test_client_terms_override_the_default() {
        let client = ClientTerms {
            name: "Acme Corp".to_string(),
            payment_terms_days: Some(14),
        };
        let plan = ConversionService::plan(
            &accepted_quote(),
            &[],
            &client,
            issue_date(),
            "INV-20240215-005".to_string(),
        )
        .unwrap();
        assert_eq!(
            plan.invoice.due_date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_non_accepted_quote_is_rejected() {
        let mut quote = accepted_quote();
        quote.status = QuoteStatus::Sent;

        let result = ConversionService::plan(
            &quote,
            &quote_items(),
            &client(),
            issue_date(),
            "INV-20240215-006".to_string(),
        );
        assert_eq!(result.unwrap_err(), QuoteError::NotConvertible(QuoteStatus::Sent));
    }

    #[test]
    fn test_already_converted_quote_is_rejected() {
        let existing = Uuid::new_v4();
        let mut quote = accepted_quote();
        quote.converted_to_invoice_id = Some(existing);

        let result = ConversionService::plan(
            &quote,
            &quote_items(),
            &client(),
            issue_date(),
            "INV-20240215-007".to_string(),
        );
        assert_eq!(result.unwrap_err(), QuoteError::AlreadyConverted(existing));
    }
}
