//! Quote routes: the quote-to-invoice conversion endpoint.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::CompanyContext};
use ledgerline_db::repositories::quote::{ConversionOutcome, QuoteRepository};

/// Creates the quote routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/quotes/{quote_id}/convert", post(convert_quote))
}

/// POST `/quotes/{quote_id}/convert` - Convert an accepted quote into a
/// draft invoice, exactly once.
async fn convert_quote(
    State(state): State<AppState>,
    company: CompanyContext,
    Path(quote_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConversionOutcome>), ApiError> {
    let repo = QuoteRepository::new((*state.db).clone());
    let today = Utc::now().date_naive();

    let outcome = repo
        .convert_to_invoice(company.company_id, quote_id, today)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}
