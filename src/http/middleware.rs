use crate::auth::{cookie_value, verify_session_token};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

/// Reject requests without a valid session cookie.
///
/// The verified [`Session`](crate::auth::Session) is stored in the request
/// extensions for handlers.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_config = &state.config.session;

    let token = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| cookie_value(header, &session_config.cookie_name))
        .ok_or_else(ApiError::unauthorized)?;

    let now = chrono::Utc::now().timestamp();
    let session = verify_session_token(session_config, token, now).map_err(|e| {
        debug!("Rejected session: {}", e);
        ApiError::unauthorized()
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
