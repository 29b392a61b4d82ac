//! Cron trigger route for the recurrence scheduler.
//!
//! Meant for a trusted internal scheduler, not end users: the caller
//! authenticates with the shared secret from configuration rather than a
//! company token, and the run spans every company with due rows.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::AppState;
use ledgerline_db::RecurringRepository;

/// Header carrying the cron shared secret.
const CRON_KEY_HEADER: &str = "x-cron-key";

/// Creates the cron routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/cron/recurring", post(run_recurring))
}

/// POST `/cron/recurring` - Process all due recurring items.
async fn run_recurring(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let presented = headers
        .get(CRON_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.cron_secret.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_cron_key",
                "message": "Missing or invalid X-Cron-Key header"
            })),
        )
            .into_response();
    }

    let repo = RecurringRepository::new((*state.db).clone());
    let today = Utc::now().date_naive();
    let report = repo.process_all(today).await;

    info!(
        invoices = report.invoices,
        expenses = report.expenses,
        income = report.income,
        failures = report.failures.len(),
        "Recurring batch finished"
    );

    (StatusCode::OK, Json(report)).into_response()
}
