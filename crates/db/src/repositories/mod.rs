//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every query is scoped by company id; a row owned by another
//! company is indistinguishable from a missing row.

pub mod account;
pub mod api_token;
pub mod numbering;
pub mod quote;
pub mod recurring;
pub mod transaction;

pub use account::{AccountError, AccountRepository, BalanceAudit};
pub use api_token::ApiTokenRepository;
pub use numbering::NumberingError;
pub use quote::{ConversionOutcome, QuoteConversionError, QuoteRepository};
pub use recurring::RecurringRepository;
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
