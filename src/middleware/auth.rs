use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_jwt, AuthError};
use crate::error::ApiError;
use crate::services::accounts;
use crate::state::AppState;

/// Authenticated user context, resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

/// Validates the bearer JWT, loads the user and injects `CurrentUser` into the request
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(ApiError::unauthorized)?;

    let claims = verify_jwt(&token, &state.config.security.jwt_secret).map_err(|e| match e {
        AuthError::TokenExpired => ApiError::unauthorized("Token has expired"),
        _ => ApiError::unauthorized("Invalid token"),
    })?;

    let user = accounts::find_user_by_id(&state.db, &claims.user_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers.get("authorization").ok_or("Not authenticated")?;

    let auth_str = auth_header.to_str().map_err(|_| "Invalid token")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Invalid token"),
        None => Err("Not authenticated"),
    }
}
