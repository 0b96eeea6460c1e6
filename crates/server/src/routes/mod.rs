//! HTTP routes

pub mod redirect;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the router: a single catch-all handler for any method and any
/// path, traced per request.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(redirect::resolve_redirect)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
