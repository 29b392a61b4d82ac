//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod cron;
pub mod health;
pub mod quotes;
pub mod transactions;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Company-scoped routes require a valid API token
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(quotes::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The cron trigger authenticates with its own shared secret, and the
    // health probe is public
    Router::new()
        .merge(health::routes())
        .merge(cron::routes())
        .merge(protected_routes)
}
