//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated account extracted from a JWT token
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: i32,
    pub email: String,
}

/// JWT authentication middleware.
///
/// Verifies the bearer token's signature and expiry, then re-fetches the
/// account behind the payload: a token stays cryptographically valid after
/// its account is deleted, so possession alone is not enough. The resolved
/// account is injected into the request extensions.
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
        .ok_or(AppError::Unauthorized)?;

    let payload = state.auth_service.verify_token(token)?;

    let account = state
        .auth_service
        .verify_payload(&payload)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let current_account = CurrentAccount {
        id: account.id,
        email: account.email,
    };

    request.extensions_mut().insert(current_account);

    Ok(next.run(request).await)
}
