//! Quote lifecycle and quote-to-invoice conversion.
//!
//! This module implements:
//! - The quote status state machine with an explicit transition table
//! - Conversion planning: building an invoice plus line items from an
//!   accepted quote
//! - Invoice number formatting
//! - Error types for quote operations

pub mod conversion;
pub mod error;
pub mod number;
pub mod status;

pub use conversion::{
    ClientTerms, ConversionPlan, ConversionService, InvoiceDraft, InvoiceItemDraft, QuoteItemSnapshot,
    QuoteSnapshot, DEFAULT_PAYMENT_TERMS_DAYS,
};
pub use error::QuoteError;
pub use number::format_invoice_number;
pub use status::QuoteStatus;
