//! Transaction management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::CompanyContext};
use ledgerline_core::ledger::EntryKind;
use ledgerline_db::entities::transactions;
use ledgerline_db::repositories::transaction::{
    CreateTransactionInput, TransactionFilter, TransactionRepository, UpdateTransactionInput,
};
use ledgerline_shared::types::PageRequest;
use ledgerline_shared::AppError;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{transaction_id}", put(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 50, max: 100).
    pub per_page: Option<u32>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Account ID.
    pub account_id: Uuid,
    /// Entry kind: "debit" or "credit".
    pub kind: String,
    /// Amount (positive decimal string).
    pub amount: String,
    /// Optional currency; defaults to the account's.
    pub currency: Option<String>,
    /// Transaction date (YYYY-MM-DD).
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional invoice link.
    pub related_invoice_id: Option<Uuid>,
    /// Optional expense link.
    pub related_expense_id: Option<Uuid>,
    /// Optional income link.
    pub related_income_id: Option<Uuid>,
}

/// Request body for updating a transaction. Omitted fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Move the entry to another account.
    pub account_id: Option<Uuid>,
    /// Entry kind: "debit" or "credit".
    pub kind: Option<String>,
    /// Amount (positive decimal string).
    pub amount: Option<String>,
    /// Transaction date.
    pub transaction_date: Option<NaiveDate>,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Reconciled flag.
    pub reconciled: Option<bool>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Account ID.
    pub account_id: Uuid,
    /// Entry kind.
    pub kind: &'static str,
    /// Amount.
    pub amount: String,
    /// Currency.
    pub currency: String,
    /// Transaction date.
    pub transaction_date: String,
    /// Description.
    pub description: String,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Reconciled flag.
    pub reconciled: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        let kind: EntryKind = model.kind.into();
        Self {
            id: model.id,
            account_id: model.account_id,
            kind: kind.as_str(),
            amount: model.amount.to_string(),
            currency: model.currency,
            transaction_date: model.transaction_date.to_string(),
            description: model.description,
            category_id: model.category_id,
            reconciled: model.reconciled,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

fn parse_kind(kind: &str) -> Result<EntryKind, ApiError> {
    EntryKind::from_str(kind).map_err(|e| ApiError(AppError::Validation(e)))
}

fn parse_amount(amount: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(amount)
        .map_err(|_| ApiError(AppError::Validation(format!("Invalid amount: {amount}"))))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions with filters.
async fn list_transactions(
    State(state): State<AppState>,
    company: CompanyContext,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());

    let filter = TransactionFilter {
        account_id: query.account_id,
        date_from: query.from,
        date_to: query.to,
    };
    let mut page = PageRequest::default();
    if let Some(p) = query.page {
        page.page = p;
    }
    if let Some(per_page) = query.per_page {
        page.per_page = per_page;
    }

    let result = repo.list(company.company_id, filter, page).await?;
    let data: Vec<TransactionResponse> = result
        .data
        .into_iter()
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(json!({ "transactions": data, "meta": result.meta })))
}

/// POST `/transactions` - Create a transaction and apply its balance effect.
async fn create_transaction(
    State(state): State<AppState>,
    company: CompanyContext,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());

    let input = CreateTransactionInput {
        account_id: request.account_id,
        kind: parse_kind(&request.kind)?,
        amount: parse_amount(&request.amount)?,
        currency: request.currency,
        transaction_date: request.transaction_date,
        description: request.description,
        category_id: request.category_id,
        related_invoice_id: request.related_invoice_id,
        related_expense_id: request.related_expense_id,
        related_income_id: request.related_income_id,
    };

    let created = repo.create(company.company_id, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT `/transactions/{transaction_id}` - Update with reversal-then-reapply.
async fn update_transaction(
    State(state): State<AppState>,
    company: CompanyContext,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());

    let input = UpdateTransactionInput {
        account_id: request.account_id,
        kind: request.kind.as_deref().map(parse_kind).transpose()?,
        amount: request.amount.as_deref().map(parse_amount).transpose()?,
        transaction_date: request.transaction_date,
        description: request.description,
        category_id: request.category_id,
        reconciled: request.reconciled,
    };

    let updated = repo
        .update(company.company_id, transaction_id, input)
        .await?;
    Ok(Json(updated.into()))
}

/// DELETE `/transactions/{transaction_id}` - Soft-delete and reverse.
async fn delete_transaction(
    State(state): State<AppState>,
    company: CompanyContext,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());

    repo.soft_delete(company.company_id, transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
