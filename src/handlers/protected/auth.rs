// handlers/protected/auth.rs - POST /auth/token-refresh, POST /auth/set-password

use axum::{extract::State, Extension};
use tracing::{error, info};

use crate::error::ApiError;
use crate::handlers::public::auth::login_response;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidJson};
use crate::models::common::IdResponse;
use crate::models::users::{normalize_email, LoginResponse, PasswordLoginRequest};
use crate::services::accounts;
use crate::state::AppState;

/// POST /auth/token-refresh - a fresh token for the caller
pub async fn token_refresh(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<LoginResponse> {
    let response = login_response(&state, &user.id, &user.email).map_err(|e| {
        error!("Error refreshing token for {}: {}", user.id, e);
        ApiError::internal("An error occurred while refreshing the token. Please try again later.")
    })?;
    Ok(ApiResponse::success(response))
}

/// POST /auth/set-password - only for the caller's own email
pub async fn set_password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson { body, .. }: ValidJson<PasswordLoginRequest>,
) -> ApiResult<IdResponse> {
    let email = normalize_email(&body.email);
    if user.email.to_lowercase() != email {
        return Err(ApiError::forbidden_bare());
    }

    accounts::set_password(&state.db, &user.id, body.password.trim())
        .await
        .map_err(|e| {
            error!("Error updating password for user {}: {}", email, e);
            ApiError::internal(format!(
                "An error occurred while setting the password. Please try again later.{}",
                e
            ))
        })?;

    info!("Password updated for user {}", user.id);
    Ok(ApiResponse::success(IdResponse { id: user.id }))
}
