//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the accounting core
//! - Company-token authentication middleware
//! - The single error-to-response mapping site

pub mod middleware;
pub mod routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledgerline_db::repositories::account::AccountError;
use ledgerline_db::repositories::quote::QuoteConversionError;
use ledgerline_db::repositories::transaction::TransactionError;
use ledgerline_shared::AppError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Shared secret guarding the cron trigger endpoint.
    pub cron_secret: Arc<String>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Error wrapper translating `AppError` into an HTTP response.
///
/// This is the only place errors become status codes and JSON bodies, so
/// every handler fails the same way.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details stay in the logs, not the response body.
        let message = match &self.0 {
            AppError::Database(e) | AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        Self(err.into())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self(err.into())
    }
}

impl From<QuoteConversionError> for ApiError {
    fn from(err: QuoteConversionError) -> Self {
        Self(err.into())
    }
}
