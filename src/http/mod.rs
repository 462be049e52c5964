//! HTTP API for the portal.
//!
//! Every `/api` route except login and logout sits behind the session cookie
//! check. Handlers downgrade service errors to short user-facing messages.

pub mod handlers;
pub mod middleware;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // Wire uploads arrive base64-encoded in JSON
    let body_limit = state.config.max_upload_bytes / 3 * 4 + 64 * 1024;

    let protected = Router::new()
        .route("/api/session", get(handlers::current_session))
        .route("/api/deals", get(handlers::list_deals))
        .route("/api/deals/:id", get(handlers::get_deal))
        .route("/api/deals/:id/analysis", get(handlers::deal_analysis))
        .route("/api/deals/:id/engagement", post(handlers::track_engagement))
        .route(
            "/api/deals/:id/offers",
            get(handlers::list_offers).post(handlers::create_offer),
        )
        .route("/api/deals/:id/ready-to-buy", post(handlers::submit_ready_to_buy))
        .route("/api/calculator/flip", post(handlers::flip_calculator))
        .route("/api/calculator/rental", post(handlers::rental_calculator))
        .route("/api/calculator/amortization", post(handlers::amortization_calculator))
        .route("/api/wire/verify", post(handlers::verify_wire))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
