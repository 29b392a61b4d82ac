//! `SeaORM` entity definitions.
//!
//! Every tenant-owned table carries a `company_id` partition key and a
//! `soft_delete` flag; repository queries must filter on both.

pub mod accounts;
pub mod api_tokens;
pub mod clients;
pub mod companies;
pub mod expenses;
pub mod income;
pub mod invoice_items;
pub mod invoices;
pub mod quote_items;
pub mod quotes;
pub mod sea_orm_active_enums;
pub mod transactions;
