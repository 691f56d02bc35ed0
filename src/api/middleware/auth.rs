//! Bearer authentication and role guard middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::api::AppState;
use crate::config::{ADMIN_REQUIRED_MESSAGE, BEARER_TOKEN_PREFIX};
use crate::errors::AppError;

pub use crate::services::CurrentUser;

/// Bearer authentication middleware.
///
/// Extracts the token from the Authorization header, resolves it to the
/// caller's user record, then injects the [`CurrentUser`] into the request
/// extensions. Runs before any handler or role guard.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let current_user = state.identity.verify(token).await?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn ensure_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(ADMIN_REQUIRED_MESSAGE))
    }
}

/// Role guard for admin-only routes.
///
/// Attach with `route_layer(middleware::from_fn(require_admin))`; must sit
/// inside [`auth_middleware`] so the caller is already resolved.
pub async fn require_admin(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_admin(&user)?;
    Ok(next.run(request).await)
}
