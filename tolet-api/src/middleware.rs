/// Request authentication for protected routes
///
/// Rejections go through [`ApiError`], so a missing token answers 401 and a
/// rejected one 403 with the usual error body.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tolet_shared::auth::bearer::authenticate;

/// Attaches the caller's [`AuthContext`](tolet_shared::auth::bearer::AuthContext)
/// to the request or rejects it
pub async fn require_account(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let auth_context = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request authentication");
        e
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
