//! Account routes: listing and balance auditing.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::CompanyContext};
use ledgerline_db::entities::accounts;
use ledgerline_db::repositories::account::AccountRepository;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{account_id}/balance", get(audit_balance))
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account name.
    pub name: String,
    /// Currency.
    pub currency: String,
    /// Stored current balance.
    pub current_balance: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            currency: model.currency,
            current_balance: model.current_balance.to_string(),
        }
    }
}

/// GET `/accounts` - List the company's live accounts.
async fn list_accounts(
    State(state): State<AppState>,
    company: CompanyContext,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());

    let accounts = repo.list(company.company_id).await?;
    let data: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();

    Ok(Json(json!({ "accounts": data })))
}

/// GET `/accounts/{account_id}/balance` - Audit the stored balance against
/// the transaction history.
async fn audit_balance(
    State(state): State<AppState>,
    company: CompanyContext,
    Path(account_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());

    let audit = repo.audit_balance(company.company_id, account_id).await?;

    Ok(Json(json!({
        "stored": audit.stored.to_string(),
        "derived": audit.derived.to_string(),
        "consistent": audit.is_consistent(),
    })))
}
