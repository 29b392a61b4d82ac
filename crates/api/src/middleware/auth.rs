//! Authentication middleware for company-scoped routes.
//!
//! Callers present a per-company API token as a bearer credential; the
//! middleware resolves it to a company id, which becomes the tenant scope
//! for every repository call the handler makes. Session management is the
//! surrounding application's concern; this layer only answers "which
//! company is calling".

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use ledgerline_db::ApiTokenRepository;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates company API tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Looks up the token hash in the api_tokens table
/// 3. Stores the resolved company context in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    let repo = ApiTokenRepository::new((*state.db).clone());
    match repo.resolve_company(token).await {
        Ok(Some(company_id)) => {
            request.extensions_mut().insert(CompanyContext { company_id });
            next.run(request).await
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_token",
                "message": "Unknown or revoked API token"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Token lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated company context.
///
/// Use this in handlers to get the calling company:
///
/// ```ignore
/// async fn handler(company: CompanyContext) -> impl IntoResponse {
///     let company_id = company.company_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CompanyContext {
    /// The company resolved from the API token.
    pub company_id: Uuid,
}

impl<S> FromRequestParts<S> for CompanyContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().copied().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Authentication required"
                })),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
